#[macro_use]
extern crate tracing;
#[macro_use]
extern crate serde;

pub mod config;
#[cfg(feature = "smtp")]
pub mod smtp;
#[cfg(feature = "tracer")]
pub mod tracer;
pub mod verification;

mod macros;
