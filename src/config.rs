use crate::verification::domain::{CodeAlphabet, ExpiryPolicy};
use once_cell::sync::Lazy;
use std::env;

pub const DEFAULT_SMTP_PORT: u16 = 25;
pub const DEFAULT_EXPIRY: ExpiryPolicy = ExpiryPolicy::Never;

const ENV_SMTP_HOST: &str = "SMTP_HOST";
const ENV_SMTP_PORT: &str = "SMTP_PORT";
const ENV_SMTP_USERNAME: &str = "SMTP_USERNAME";
const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
const ENV_SMTP_ORIGIN: &str = "SMTP_ORIGIN";
const ENV_SMTP_ISSUER: &str = "SMTP_ISSUER";
const ENV_VERIFICATION_ALPHABET: &str = "VERIFICATION_ALPHABET";
const ENV_VERIFICATION_EXPIRY: &str = "VERIFICATION_EXPIRY";

pub static SMTP_HOST: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_HOST).expect("smtp host must be set"));

pub static SMTP_PORT: Lazy<u16> = Lazy::new(|| {
    env::var(ENV_SMTP_PORT)
        .map(|port| port.parse().unwrap())
        .unwrap_or(DEFAULT_SMTP_PORT)
});

pub static SMTP_USERNAME: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_USERNAME).unwrap_or_default());

pub static SMTP_PASSWORD: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_PASSWORD).unwrap_or_default());

pub static SMTP_ORIGIN: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_ORIGIN).expect("smtp origin must be set"));

pub static SMTP_ISSUER: Lazy<String> =
    Lazy::new(|| env::var(ENV_SMTP_ISSUER).unwrap_or_default());

pub static VERIFICATION_ALPHABET: Lazy<CodeAlphabet> = Lazy::new(|| {
    env::var(ENV_VERIFICATION_ALPHABET)
        .map(|alphabet| CodeAlphabet::parse(&alphabet).unwrap())
        .expect("verification alphabet must be set")
});

pub static VERIFICATION_EXPIRY: Lazy<ExpiryPolicy> = Lazy::new(|| {
    env::var(ENV_VERIFICATION_EXPIRY)
        .map(|expiry| ExpiryPolicy::parse(&expiry).unwrap())
        .unwrap_or(DEFAULT_EXPIRY)
});

/// Gathers everything a verifier needs in order to be built. The alphabet has no default and must
/// always be chosen by the caller.
#[derive(Debug, Clone)]
pub struct VerifierConfig<'a> {
    pub host: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a str,
    pub origin: &'a str,
    pub issuer: &'a str,
    pub alphabet: CodeAlphabet,
    pub expiry: ExpiryPolicy,
}

impl<'a> VerifierConfig<'a> {
    pub fn new(host: &'a str, origin: &'a str, alphabet: CodeAlphabet) -> Self {
        Self {
            host,
            port: DEFAULT_SMTP_PORT,
            username: Default::default(),
            password: Default::default(),
            origin,
            issuer: Default::default(),
            alphabet,
            expiry: DEFAULT_EXPIRY,
        }
    }

    #[cfg(feature = "smtp")]
    pub fn smtp_builder(&self) -> crate::smtp::SmtpBuilder<'a> {
        crate::smtp::SmtpBuilder {
            issuer: self.issuer,
            origin: self.origin,
            host: self.host,
            port: self.port,
            username: self.username,
            password: self.password,
        }
    }
}

impl VerifierConfig<'static> {
    /// Builds the configuration from the environment variables.
    pub fn from_env() -> Self {
        Self {
            host: &SMTP_HOST,
            port: *SMTP_PORT,
            username: &SMTP_USERNAME,
            password: &SMTP_PASSWORD,
            origin: &SMTP_ORIGIN,
            issuer: &SMTP_ISSUER,
            alphabet: *VERIFICATION_ALPHABET,
            expiry: *VERIFICATION_EXPIRY,
        }
    }
}
