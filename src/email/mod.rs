//! Outbound order notifications through a transactional-email HTTP API.

pub mod templates;

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::MailConfig;

pub use templates::{OrderEmail, OrderEmailLine};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send one HTML message; a mailer without an API key logs and skips.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::info!(to, subject, "mail delivery disabled, skipping message");
            return Ok(());
        };

        let message = OutgoingMessage {
            from: &self.config.from,
            to: [to],
            subject,
            html,
        };
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        tracing::debug!(to, subject, "mail sent");
        Ok(())
    }

    /// Customer confirmation plus owner notification. Failures are logged, never returned.
    pub async fn send_order_notifications(&self, order: &OrderEmail) {
        let subject = format!("{}: order {} received", order.site_name, order.order_number);
        let html = templates::customer_confirmation(order);
        if let Err(err) = self.send(&order.customer_email, &subject, &html).await {
            tracing::warn!(error = %err, order = %order.order_number, "customer email failed");
        }

        let Some(admin) = self.config.admin_email.as_deref() else {
            return;
        };
        let subject = format!("New order {} from {}", order.order_number, order.customer_name);
        let html = templates::admin_notification(order);
        if let Err(err) = self.send(admin, &subject, &html).await {
            tracing::warn!(error = %err, order = %order.order_number, "admin email failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> MailConfig {
        MailConfig {
            api_url: "http://127.0.0.1:9/emails".into(),
            api_key: api_key.map(str::to_string),
            from: "Shop <shop@example.com>".into(),
            admin_email: None,
            timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn disabled_mailer_skips_delivery() {
        let mailer = Mailer::new(config(None)).unwrap();
        assert!(!mailer.is_enabled());
        mailer
            .send("customer@example.com", "hi", "<p>hi</p>")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn stalled_provider_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer.
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let mut cfg = config(Some("key"));
        cfg.api_url = format!("http://{addr}/emails");
        let mailer = Mailer::new(cfg).unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            mailer.send("customer@example.com", "hi", "<p>hi</p>"),
        )
        .await
        .expect("send must give up on its own");
        assert!(matches!(result, Err(MailError::Http(ref e)) if e.is_timeout()));
        server.abort();
    }

    #[test]
    fn message_serializes_as_provider_payload() {
        let msg = OutgoingMessage {
            from: "a@example.com",
            to: ["b@example.com"],
            subject: "s",
            html: "<p>x</p>",
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["to"][0], "b@example.com");
        assert_eq!(json["html"], "<p>x</p>");
    }
}
