//! Notification collaborator interface.
//!
//! The mail transport itself is an external concern; the registration
//! workflow only needs a way to hand a structured payload to "somewhere
//! that delivers it" and to learn whether that failed, because a failed
//! delivery rolls the registration back.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Failure of the notification transport.
#[derive(Debug, Error)]
#[error("notification delivery failed: {message}")]
pub struct NotificationError {
    pub message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl NotificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Delivers a structured notification to an address.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(
        &self,
        address: &str,
        subject: &str,
        payload: Value,
    ) -> Result<(), NotificationError>;
}

/// Payload of the registration notification: who the account belongs to
/// and the generated credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialNotice {
    pub surname: String,
    pub given_name: String,
    pub username: String,
    pub password: String,
}

impl CredentialNotice {
    pub fn into_payload(self) -> Value {
        json!({
            "surname": self.surname,
            "givenName": self.given_name,
            "username": self.username,
            "password": self.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape() {
        let payload = CredentialNotice {
            surname: "Doe".to_string(),
            given_name: "Jane".to_string(),
            username: "2023010101".to_string(),
            password: "s3cr3t".to_string(),
        }
        .into_payload();

        assert_eq!(payload["surname"], "Doe");
        assert_eq!(payload["givenName"], "Jane");
        assert_eq!(payload["username"], "2023010101");
        assert_eq!(payload["password"], "s3cr3t");
    }
}
