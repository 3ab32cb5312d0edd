#[macro_use]
extern crate tracing;

use otpmail::config::VerifierConfig;
use otpmail::tracer;
use otpmail::verification::application::VerificationApplication;
use std::env;
use std::error::Error;
use std::io::{self, BufRead};
use std::sync::Arc;

const FROM_LABEL: &str = "Verification";
const SUBJECT: &str = "Your verification code";
const BODY: &str = "Your verification code is <verification_code>";

/// Sends a verification code to every recipient given as argument, then verifies the
/// `<recipient> <code>` lines read from stdin until no code is pending.
fn main() -> Result<(), Box<dyn Error>> {
    let dotenv = dotenv::dotenv();
    tracer::init()?;

    if let Err(err) = dotenv {
        warn!(error = err.to_string(), "processing dotenv file");
    }

    let recipients: Vec<String> = env::args().skip(1).collect();
    if recipients.is_empty() {
        return Err("at least one recipient is required".into());
    }

    let config = VerifierConfig::from_env();
    let smtp = Arc::new(config.smtp_builder().build()?);
    let app = VerificationApplication::with_config(smtp, &config);

    let recipients: Vec<&str> = recipients.iter().map(String::as_str).collect();
    for dispatch in app.send_plain(FROM_LABEL, SUBJECT, BODY, &recipients)? {
        match dispatch.result {
            Ok(()) => info!(
                recipient = dispatch.recipient.as_str(),
                "verification code sent"
            ),
            Err(err) => error!(
                error = err.to_string(),
                recipient = dispatch.recipient.as_str(),
                "verification code not sent"
            ),
        }
    }

    if app.store.is_empty() {
        return Err("no verification code has been sent".into());
    }

    info!("waiting for verification codes");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let (Some(recipient), Some(code)) = (fields.next(), fields.next()) else {
            warn!("expected a recipient followed by a code");
            continue;
        };

        println!("{recipient}: {:?}", app.verify(recipient, code));
        if app.store.is_empty() {
            break;
        }
    }

    Ok(())
}
