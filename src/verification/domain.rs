use super::error::{Error, Result};
use rand::{distributions::Uniform, Rng};
use std::time::{Duration, SystemTime};

/// The amount of characters every verification code is made of.
pub const CODE_LENGTH: usize = 6;

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Represents the set of characters a verification code is drawn from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum CodeAlphabet {
    /// Digits from 0 to 9.
    Numeric,
    /// Lowercase and uppercase ascii letters.
    Alphabetic,
    /// The union of both, digits and letters.
    Alphanumeric,
}

impl CodeAlphabet {
    pub fn charset(&self) -> &'static [u8] {
        match self {
            CodeAlphabet::Numeric => DIGITS,
            CodeAlphabet::Alphabetic => LETTERS,
            CodeAlphabet::Alphanumeric => ALPHANUMERIC,
        }
    }

    /// Returns true if, and only if, the given character belongs to the alphabet.
    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.charset().contains(&(c as u8))
    }

    /// Parses the given string into a [CodeAlphabet], failing with [Error::InvalidConfiguration]
    /// if the string does not name any alphabet.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse().map_err(Error::from)
    }
}

/// Represents how long an issued code remains valid.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
pub enum ExpiryPolicy {
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[strum(serialize = "30m")]
    ThirtyMinutes,
    #[strum(serialize = "1h")]
    OneHour,
    #[default]
    #[strum(serialize = "never")]
    Never,
}

impl ExpiryPolicy {
    /// Returns the lifetime of a code under this policy, if any.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            ExpiryPolicy::FiveMinutes => Some(Duration::from_secs(5 * 60)),
            ExpiryPolicy::FifteenMinutes => Some(Duration::from_secs(15 * 60)),
            ExpiryPolicy::ThirtyMinutes => Some(Duration::from_secs(30 * 60)),
            ExpiryPolicy::OneHour => Some(Duration::from_secs(60 * 60)),
            ExpiryPolicy::Never => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        s.parse().map_err(Error::from)
    }
}

/// Represents a verification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(String);

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Code {
    /// Builds a brand new [Code] of [CODE_LENGTH] characters uniformly drawn from the given alphabet.
    pub fn generate(alphabet: CodeAlphabet) -> Self {
        let charset = alphabet.charset();
        let code = rand::thread_rng()
            .sample_iter(Uniform::new(0, charset.len()))
            .take(CODE_LENGTH)
            .map(|index| charset[index] as char)
            .collect();

        Self(code)
    }

    /// Returns true if, and only if, the submitted string is exactly the same as self.
    pub fn matches(&self, submitted: &str) -> bool {
        self.0 == submitted
    }
}

#[cfg(test)]
impl From<&str> for Code {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// Represents a code that has been sent to a recipient and is waiting to be verified.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRecord {
    pub recipient: String,
    pub code: Code,
    pub issued_at: SystemTime,
}

impl VerificationRecord {
    pub fn new(recipient: impl Into<String>, code: Code, issued_at: SystemTime) -> Self {
        Self {
            recipient: recipient.into(),
            code,
            issued_at,
        }
    }

    /// Returns true if, and only if, the lifetime given by the policy has elapsed at the given instant.
    /// A clock reading earlier than the issuing time never expires the record.
    pub fn is_expired(&self, policy: ExpiryPolicy, now: SystemTime) -> bool {
        let Some(lifetime) = policy.duration() else {
            return false;
        };

        now.duration_since(self.issued_at)
            .map(|elapsed| elapsed >= lifetime)
            .unwrap_or_default()
    }
}

/// The result of verifying a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}
