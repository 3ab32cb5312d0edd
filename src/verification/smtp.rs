use super::{
    application::{Body, MessageSender},
    email::Email,
    error::Result,
};
use crate::smtp::Smtp;

impl<'a> MessageSender for Smtp<'a> {
    fn send(&self, from: &str, subject: &str, to: &Email, body: Body) -> Result<()> {
        Smtp::send(self, from, to, subject, body).map_err(Into::into)
    }
}
