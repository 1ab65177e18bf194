//! Contact form endpoint.
//!
//! A submission is validated, composed into a plain-text email and handed to
//! a [`Mailer`] once. There is no retry and nothing is stored.

use crate::config::MailConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

pub const DELIVERY_FAILED: &str = "Failed to send message.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContactError {
    #[error("All fields are required.")]
    MissingField(&'static str),
    #[error("Invalid request body.")]
    Malformed,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("mail is not configured: {0} is empty")]
    NotConfigured(&'static str),
}

/// The form as posted by the contact page script.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Submission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl Submission {
    /// Required fields must hold something other than whitespace.
    pub fn validate(&self) -> Result<(), ContactError> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("message", &self.message),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ContactError::MissingField(*field)),
            None => Ok(()),
        }
    }

    fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Build the message the city office receives.
pub fn compose(submission: &Submission, config: &MailConfig) -> OutgoingEmail {
    let mut text = format!(
        "From: {} <{}>\n",
        submission.full_name(),
        submission.email.trim()
    );
    if let Some(phone) = submission.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        text.push_str(&format!("Phone: {phone}\n"));
    }
    text.push_str(&format!("\nMessage:\n{}", submission.message));

    let subject = match submission.subject.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(subject) => format!("{} | {subject}", config.subject_prefix),
        None => format!(
            "{} | New contact form submission from {}",
            config.subject_prefix,
            submission.full_name()
        ),
    };

    OutgoingEmail {
        from: config.from.clone(),
        to: config.to.clone(),
        subject,
        text,
    }
}

pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Sends through the Resend HTTP API.
pub struct ResendMailer {
    http: reqwest::blocking::Client,
    api_url: String,
    api_key: Option<String>,
}

impl ResendMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl Mailer for ResendMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(MailError::NotConfigured("RESEND_API_KEY"))?;
        if email.from.is_empty() {
            return Err(MailError::NotConfigured("mail.from"));
        }
        if email.to.is_empty() {
            return Err(MailError::NotConfigured("mail.to"));
        }

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(key)
            .json(email)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MailError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Status code and JSON body for one request to the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactReply {
    pub status: u16,
    pub body: Value,
}

impl ContactReply {
    fn ok() -> Self {
        Self {
            status: 200,
            body: json!({ "success": true }),
        }
    }

    fn rejected(err: &ContactError) -> Self {
        let mut body = json!({ "success": false, "error": err.to_string() });
        if let ContactError::MissingField(field) = err {
            body["field"] = json!(field);
        }
        Self { status: 400, body }
    }

    fn failed() -> Self {
        Self {
            status: 500,
            body: json!({ "success": false, "error": DELIVERY_FAILED }),
        }
    }
}

/// Handle a raw request body: parse, validate, send once.
pub fn handle_submission(body: &[u8], mailer: &dyn Mailer, config: &MailConfig) -> ContactReply {
    let submission: Submission = match serde_json::from_slice(body) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("contact body rejected: {e}");
            return ContactReply::rejected(&ContactError::Malformed);
        }
    };
    if let Err(e) = submission.validate() {
        return ContactReply::rejected(&e);
    }

    let email = compose(&submission, config);
    match mailer.send(&email) {
        Ok(()) => {
            log::info!("contact message sent for {}", submission.full_name());
            ContactReply::ok()
        }
        Err(e) => {
            log::error!("contact delivery failed: {e}");
            ContactReply::failed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
    }

    impl Mailer for Recorder {
        fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Status {
                    status: 503,
                    body: "down".into(),
                });
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn mail_config() -> MailConfig {
        MailConfig {
            from: "site@argyle.mn".into(),
            to: "clerk@argyle.mn".into(),
            ..MailConfig::default()
        }
    }

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn complete() -> Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "phone": "218-555-0100",
            "subject": "Water bill",
            "message": "Question about my bill."
        })
    }

    #[test]
    fn empty_first_name_is_rejected_without_sending() {
        let mailer = Recorder::default();
        let mut form = complete();
        form["firstName"] = json!("");
        let reply = handle_submission(&body(form), &mailer, &mail_config());
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["success"], json!(false));
        assert_eq!(reply.body["error"], json!("All fields are required."));
        assert_eq!(reply.body["field"], json!("firstName"));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn whitespace_and_missing_fields_count_as_empty() {
        let form = Submission {
            first_name: "Ada".into(),
            last_name: "  ".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ContactError::MissingField("lastName")));

        let mailer = Recorder::default();
        let reply = handle_submission(br#"{"firstName":"Ada"}"#, &mailer, &mail_config());
        assert_eq!(reply.body["field"], json!("lastName"));
    }

    #[test]
    fn malformed_body_is_a_client_error() {
        let mailer = Recorder::default();
        let reply = handle_submission(b"not json", &mailer, &mail_config());
        assert_eq!(reply.status, 400);
        assert!(reply.body.get("field").is_none());
    }

    #[test]
    fn valid_submission_is_sent_once() {
        let mailer = Recorder::default();
        let reply = handle_submission(&body(complete()), &mailer, &mail_config());
        assert_eq!(reply, ContactReply::ok());
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Argyle | Water bill");
        assert_eq!(sent[0].to, "clerk@argyle.mn");
        assert_eq!(
            sent[0].text,
            "From: Ada Lovelace <ada@example.com>\nPhone: 218-555-0100\n\nMessage:\nQuestion about my bill."
        );
    }

    #[test]
    fn subject_and_phone_are_optional() {
        let mut form = complete();
        form["subject"] = json!("");
        form.as_object_mut().unwrap().remove("phone");
        let submission: Submission = serde_json::from_value(form).unwrap();
        let email = compose(&submission, &mail_config());
        assert_eq!(
            email.subject,
            "Argyle | New contact form submission from Ada Lovelace"
        );
        assert!(!email.text.contains("Phone:"));
    }

    #[test]
    fn delivery_failure_is_generic() {
        let mailer = Recorder {
            fail: true,
            ..Default::default()
        };
        let reply = handle_submission(&body(complete()), &mailer, &mail_config());
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body["error"], json!(DELIVERY_FAILED));
    }

    #[test]
    fn resend_mailer_requires_key() {
        let mailer = ResendMailer::new(&mail_config()).unwrap();
        let email = compose(&serde_json::from_value(complete()).unwrap(), &mail_config());
        assert!(matches!(
            mailer.send(&email),
            Err(MailError::NotConfigured("RESEND_API_KEY"))
        ));
    }
}
