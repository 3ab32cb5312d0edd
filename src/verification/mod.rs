//! Issuing of single-use verification codes and their validation.

pub mod application;
pub mod domain;
pub mod email;
pub mod error;
#[cfg(feature = "smtp")]
pub mod smtp;
pub mod store;
pub mod template;
