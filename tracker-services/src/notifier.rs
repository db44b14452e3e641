//! Alert delivery
//!
//! The volume service only decides whether and what to send. Delivery
//! failures are logged here and never reach the refresh cycle.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

/// Subject line of every volume alert
pub const ALERT_SUBJECT: &str = "CryptoTracker Alert";

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Delivers a message to one recipient
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, subject: &str, body: &str);
}

/// Notifier that only writes alerts to the log
#[derive(Debug, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify(&self, recipient: &str, subject: &str, body: &str) {
        info!(target: "mail", recipient, subject, body, "Sending mail");
    }
}

/// Notifier that sends email through the SendGrid v3 API
pub struct SendGridNotifier {
    http: Client,
    api_key: String,
    from_email: String,
}

impl SendGridNotifier {
    pub fn new(
        api_key: impl Into<String>,
        from_email: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            from_email: from_email.into(),
        })
    }

    fn mail_payload(&self, recipient: &str, subject: &str, body: &str) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": recipient }] }],
            "from": { "email": self.from_email },
            "subject": subject,
            "content": [{ "type": "text/html", "value": body }],
        })
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    async fn notify(&self, recipient: &str, subject: &str, body: &str) {
        let response = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&self.mail_payload(recipient, subject, body))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Sent alert to {}", recipient);
            }
            Ok(resp) => {
                error!(
                    "SendGrid rejected alert to {}: status {}",
                    recipient,
                    resp.status()
                );
            }
            Err(e) => {
                error!("Failed to send alert to {}: {}", recipient, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sendgrid_payload() {
        let notifier = SendGridNotifier::new("key", "alerts@example.com").unwrap();

        let payload = notifier.mail_payload("ops@example.com", ALERT_SUBJECT, "DGB/BTC is trading at 9");

        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "ops@example.com");
        assert_eq!(payload["from"]["email"], "alerts@example.com");
        assert_eq!(payload["subject"], "CryptoTracker Alert");
        assert_eq!(payload["content"][0]["value"], "DGB/BTC is trading at 9");
    }

    #[tokio::test]
    async fn test_logging_notifier_does_not_fail() {
        LoggingNotifier
            .notify("ops@example.com", ALERT_SUBJECT, "XEM/BTC is trading at 300")
            .await;
    }
}
