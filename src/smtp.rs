//! Smtp implementation for delivering verification messages.

use crate::macros::on_error;
use crate::verification::{application::Body, email::Email};
use lettre::address::AddressError;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// The port smtp servers listen to by default.
pub const WELL_KNOWN_SMTP_PORT: u16 = 25;
/// The port for message submission over implicit tls.
pub const SUBMISSIONS_PORT: u16 = 465;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("smtp host is not valid")]
    NotAHost,
    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("{0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("{0}")]
    Lettre(#[from] lettre::error::Error),
}

/// A builder for the [Smtp] struct.
pub struct SmtpBuilder<'a> {
    pub issuer: &'a str,
    pub origin: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> Default for SmtpBuilder<'a> {
    fn default() -> Self {
        Self {
            issuer: Default::default(),
            origin: Default::default(),
            host: Default::default(),
            port: WELL_KNOWN_SMTP_PORT,
            username: Default::default(),
            password: Default::default(),
        }
    }
}

impl<'a> SmtpBuilder<'a> {
    pub fn build(&self) -> Result<Smtp<'a>> {
        if self.host.is_empty() {
            return Err(Error::NotAHost);
        }

        let transport = if !self.username.is_empty() && !self.password.is_empty() {
            let creds = Credentials::new(self.username.to_string(), self.password.to_string());
            let relay = if self.port == SUBMISSIONS_PORT {
                SmtpTransport::relay(self.host)
            } else {
                SmtpTransport::starttls_relay(self.host)
            };

            relay
                .map_err(on_error!(Error, "creating a smtp transport"))?
                .credentials(creds)
        } else {
            warn!("tls is disabled for smtp");
            SmtpTransport::builder_dangerous(self.host)
        };

        info!(host = self.host, port = self.port, "smtp transport set");

        let mailbox: Mailbox = self.origin.parse().map_err(on_error!(
            AddressError as Error,
            "parsing origin into a mailbox"
        ))?;

        Ok(Smtp {
            issuer: self.issuer,
            origin: mailbox,
            transport: transport.port(self.port).build(),
        })
    }
}

/// Smtp represents an email sender.
pub struct Smtp<'a> {
    pub issuer: &'a str,
    pub origin: Mailbox,
    pub transport: SmtpTransport,
}

impl<'a> Smtp<'a> {
    #[instrument(skip(self, body))]
    pub fn send(&self, from: &str, to: &Email, subject: &str, body: Body) -> Result<()> {
        let formated_subject = self
            .issuer
            .is_empty()
            .then_some(subject.to_string())
            .unwrap_or_else(|| format!("[{}] {subject}", self.issuer));

        let sender = (!from.is_empty())
            .then(|| Mailbox::new(Some(from.to_string()), self.origin.email.clone()))
            .unwrap_or_else(|| self.origin.clone());

        let recipient = to.as_ref();
        let to: Mailbox = recipient.parse().map_err(on_error!(
            AddressError as Error,
            "parsing email destination"
        ))?;

        let part = match body {
            Body::Plain(content) => SinglePart::plain(content.to_string()),
            Body::Html(content) => SinglePart::html(content.to_string()),
        };

        let email = Message::builder()
            .from(sender)
            .to(to)
            .subject(formated_subject)
            .singlepart(part)
            .map_err(on_error!(Error, "building email message"))?;

        self.transport
            .send(&email)
            .map_err(on_error!(Error, "sending email", recipient = recipient))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, SmtpBuilder, WELL_KNOWN_SMTP_PORT};

    #[test]
    fn default_port_is_well_known() {
        assert_eq!(SmtpBuilder::default().port, WELL_KNOWN_SMTP_PORT);
    }

    #[test]
    fn build_smtp() {
        struct Test<'a> {
            name: &'a str,
            builder: SmtpBuilder<'a>,
            is_valid: bool,
        }

        vec![
            Test {
                name: "host and origin",
                builder: SmtpBuilder {
                    host: "localhost",
                    origin: "admin@monkey.com",
                    ..Default::default()
                },
                is_valid: true,
            },
            Test {
                name: "origin with display name",
                builder: SmtpBuilder {
                    host: "localhost",
                    port: 2525,
                    origin: "Monkey <admin@monkey.com>",
                    issuer: "monkey",
                    ..Default::default()
                },
                is_valid: true,
            },
            Test {
                name: "without host",
                builder: SmtpBuilder {
                    origin: "admin@monkey.com",
                    ..Default::default()
                },
                is_valid: false,
            },
            Test {
                name: "without origin",
                builder: SmtpBuilder {
                    host: "localhost",
                    ..Default::default()
                },
                is_valid: false,
            },
        ]
        .into_iter()
        .for_each(|test| {
            let result = test.builder.build();
            assert_eq!(result.is_ok(), test.is_valid, "{}", test.name);
        })
    }

    #[test]
    fn build_smtp_without_host_must_fail() {
        let result = SmtpBuilder {
            origin: "admin@monkey.com",
            ..Default::default()
        }
        .build();

        assert!(matches!(result, Err(Error::NotAHost)));
    }
}
