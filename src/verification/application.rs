use super::{
    domain::{CodeAlphabet, ExpiryPolicy, Outcome, VerificationRecord},
    email::Email,
    error::Result,
    store::VerificationStore,
    template::{self, TemplateContext, DEFAULT_TEMPLATE},
};
use crate::config::VerifierConfig;
use std::sync::Arc;
use std::time::SystemTime;

/// The content of a message, either plain text or html.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body<'a> {
    Plain(&'a str),
    Html(&'a str),
}

impl<'a> Body<'a> {
    pub fn content(&self) -> &'a str {
        match *self {
            Body::Plain(content) | Body::Html(content) => content,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, Body::Html(_))
    }
}

/// Represents the service in charge of delivering messages to their recipients.
pub trait MessageSender {
    fn send(&self, from: &str, subject: &str, to: &Email, body: Body) -> Result<()>;
}

/// The outcome of sending a verification message to a single recipient.
#[derive(Debug)]
pub struct Dispatch {
    pub recipient: String,
    pub result: Result<()>,
}

impl Dispatch {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct VerificationApplication<M> {
    pub alphabet: CodeAlphabet,
    pub expiry: ExpiryPolicy,
    pub sender: Arc<M>,
    pub store: VerificationStore,
}

impl<M: MessageSender> VerificationApplication<M> {
    pub fn new(sender: Arc<M>, alphabet: CodeAlphabet, expiry: ExpiryPolicy) -> Self {
        Self {
            alphabet,
            expiry,
            sender,
            store: VerificationStore::default(),
        }
    }

    pub fn with_config(sender: Arc<M>, config: &VerifierConfig) -> Self {
        Self::new(sender, config.alphabet, config.expiry)
    }

    /// Sends a plain text message to each recipient, every one of them with its own verification code
    /// in place of the `<verification_code>` tag of the body.
    #[instrument(skip(self, body))]
    pub fn send_plain(
        &self,
        from: &str,
        subject: &str,
        body: &str,
        recipients: &[&str],
    ) -> Result<Vec<Dispatch>> {
        template::ensure_required_tag(body)?;
        Ok(self.dispatch_all(from, subject, body, None, recipients))
    }

    /// Sends an html message built from the given template to each recipient, every one of them with
    /// its own verification code.
    #[instrument(skip(self, template, context))]
    pub fn send_template(
        &self,
        from: &str,
        subject: &str,
        template: &str,
        context: &TemplateContext,
        recipients: &[&str],
    ) -> Result<Vec<Dispatch>> {
        template::ensure_required_tag(template)?;
        Ok(self.dispatch_all(from, subject, template, Some(context), recipients))
    }

    /// Same as [VerificationApplication::send_template] using the built-in template.
    pub fn send_default_template(
        &self,
        from: &str,
        subject: &str,
        context: &TemplateContext,
        recipients: &[&str],
    ) -> Result<Vec<Dispatch>> {
        self.send_template(from, subject, DEFAULT_TEMPLATE, context, recipients)
    }

    /// Checks the submitted code against the one issued to the recipient, consuming it on success.
    pub fn verify(&self, recipient: &str, code: &str) -> Outcome {
        self.verify_at(recipient, code, SystemTime::now())
    }

    /// Same as [VerificationApplication::verify] for the given clock reading.
    #[instrument(skip(self, code))]
    pub fn verify_at(&self, recipient: &str, code: &str, now: SystemTime) -> Outcome {
        let outcome = self.store.consume(recipient, code, self.expiry, now);
        if outcome.is_success() {
            info!("verification code consumed");
        }

        outcome
    }

    fn dispatch_all(
        &self,
        from: &str,
        subject: &str,
        template: &str,
        context: Option<&TemplateContext>,
        recipients: &[&str],
    ) -> Vec<Dispatch> {
        recipients
            .iter()
            .map(|recipient| {
                let result = self.dispatch(from, subject, template, context, recipient);
                if let Err(error) = &result {
                    warn!(
                        error = error.to_string(),
                        recipient, "sending verification code"
                    );
                }

                Dispatch {
                    recipient: recipient.to_string(),
                    result,
                }
            })
            .collect()
    }

    fn dispatch(
        &self,
        from: &str,
        subject: &str,
        template: &str,
        context: Option<&TemplateContext>,
        recipient: &str,
    ) -> Result<()> {
        let email = Email::try_from(recipient)?;
        let rendered = template::render(template, context, self.alphabet)?;

        let body = match context {
            Some(_) => Body::Html(&rendered.content),
            None => Body::Plain(&rendered.content),
        };

        self.sender.send(from, subject, &email, body)?;

        let record = VerificationRecord::new(email.as_ref(), rendered.code, SystemTime::now());
        if self.store.put(record).is_some() {
            info!(recipient, "pending verification code superseded");
        }

        Ok(())
    }
}
