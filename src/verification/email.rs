use super::error::{Error, Result};
use ::regex::Regex;
use once_cell::sync::Lazy;

/// Any non-empty local part made of letters, digits and the rfc 5322 atext symbols, followed by a
/// dot-separated domain of one or more labels.
const PATTERN: &str =
    r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~.-]+@[\p{L}\p{N}-]+(?:\.[\p{L}\p{N}-]+)*$";
static REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(PATTERN).unwrap());

/// Represents the address a verification code is sent to.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Email(String);

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Email {
    type Error = Error;

    /// Builds an [Email] from the given string if, and only if, the string matches the email's regex.
    fn try_from(value: &str) -> Result<Self> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for Email {
    type Error = Error;

    /// Builds an [Email] from the given string if, and only if, the string matches the email's regex.
    fn try_from(email: String) -> Result<Self> {
        REGEX
            .is_match(&email)
            .then_some(Self(email))
            .ok_or(Error::NotAnEmail)
    }
}

#[cfg(test)]
mod tests {
    use super::Email;
    use crate::verification::error::Result;

    #[test]
    fn email_from_str() {
        struct Test<'a> {
            name: &'a str,
            input: &'a str,
            is_valid: bool,
        }

        vec![
            Test {
                name: "plain email",
                input: "a@x.com",
                is_valid: true,
            },
            Test {
                name: "email with sufix",
                input: "username+sufix@server.domain",
                is_valid: true,
            },
            Test {
                name: "email with apostrophe",
                input: "o'brien@example.com",
                is_valid: true,
            },
            Test {
                name: "email with atext symbols",
                input: "a!#$%&*/=?^_`{|}~-b@example.com",
                is_valid: true,
            },
            Test {
                name: "email with non ascii username",
                input: "José@example.com",
                is_valid: true,
            },
            Test {
                name: "email with single label domain",
                input: "admin@localhost",
                is_valid: true,
            },
            Test {
                name: "email with whitespaces",
                input: "user name@server.domain",
                is_valid: false,
            },
            Test {
                name: "email with two at signs",
                input: "user@name@server.domain",
                is_valid: false,
            },
            Test {
                name: "email without username",
                input: "@server.domain",
                is_valid: false,
            },
            Test {
                name: "email without domain",
                input: "username@",
                is_valid: false,
            },
            Test {
                name: "email with empty domain label",
                input: "username@server..domain",
                is_valid: false,
            },
            Test {
                name: "not an email at all",
                input: "<verification_code>",
                is_valid: false,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let result: Result<Email> = test.input.try_into();
            assert_eq!(result.is_ok(), test.is_valid, "{}", test.name);

            let Ok(email) = result else {
                return;
            };

            assert_eq!(email.as_ref(), test.input, "{}", test.name);
        })
    }
}
