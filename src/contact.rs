//! Contact form state and delivery to the external webhook.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ContactError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Sending,
    Success,
    Error,
}

/// Transport for a JSON POST. Returns the HTTP status of the response.
#[async_trait(?Send)]
pub trait ContactSink {
    async fn post_json(&self, endpoint: &str, body: String) -> Result<u16, ContactError>;
}

pub fn is_ok_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Encode and send one message; any non-2xx answer is an error.
pub async fn deliver(
    sink: &dyn ContactSink,
    endpoint: &str,
    message: &ContactMessage,
) -> Result<(), ContactError> {
    let body = serde_json::to_string(message)?;
    let status = sink.post_json(endpoint, body).await?;
    if is_ok_status(status) {
        Ok(())
    } else {
        Err(ContactError::Status(status))
    }
}

/// Editable inputs of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    status: SubmitStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    /// Move to `Sending` and snapshot the fields. Refused while a request is
    /// already in flight.
    pub fn begin_submit(&mut self) -> Option<ContactMessage> {
        if self.status == SubmitStatus::Sending {
            return None;
        }
        self.status = SubmitStatus::Sending;
        Some(ContactMessage {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        })
    }

    /// Success clears the fields; failure keeps them for another try.
    pub fn finish(&mut self, outcome: Result<(), ContactError>) -> SubmitStatus {
        match outcome {
            Ok(()) => {
                log::info!("contact message delivered");
                self.name.clear();
                self.email.clear();
                self.message.clear();
                self.status = SubmitStatus::Success;
            }
            Err(err) => {
                log::error!("error sending message: {err}");
                self.status = SubmitStatus::Error;
            }
        }
        self.status
    }

    /// Back to an empty form after a success ("send another message").
    pub fn reset_status(&mut self) {
        self.status = SubmitStatus::Idle;
    }

    pub async fn submit(&mut self, sink: &dyn ContactSink, endpoint: &str) -> SubmitStatus {
        let Some(message) = self.begin_submit() else {
            return self.status;
        };
        let outcome = deliver(sink, endpoint, &message).await;
        self.finish(outcome)
    }
}
