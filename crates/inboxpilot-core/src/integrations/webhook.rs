//! Messaging-channel notifications via webhook (Discord-compatible
//! `{"content": ...}` payload).

use reqwest::Client;
use serde_json::json;

use super::keyring_store;
use super::traits::NotificationChannel;
use crate::integrations::block_on;

pub struct WebhookChannel {
    webhook_url: String,
}

impl WebhookChannel {
    /// Load stored webhook URL from the OS keyring (empty string if absent).
    pub fn new() -> Self {
        let webhook_url = keyring_store::get("webhook_url")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self { webhook_url }
    }

    pub fn with_url(webhook_url: &str) -> Self {
        Self {
            webhook_url: webhook_url.to_string(),
        }
    }

    /// Persist user-provided webhook URL to the OS keyring and update in-memory state.
    pub fn set_credentials(&mut self, webhook_url: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("webhook_url", webhook_url)?;
        self.webhook_url = webhook_url.to_string();
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete("webhook_url")?;
        self.webhook_url.clear();
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

impl Default for WebhookChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    fn send(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>> {
        if self.webhook_url.is_empty() {
            return Err("Webhook URL not configured.".into());
        }

        let payload = json!({ "content": format!("{title}: {body}") });
        let resp = block_on(Client::new().post(&self.webhook_url).json(&payload).send())??;

        if resp.status().is_success() || resp.status().as_u16() == 204 {
            Ok(())
        } else {
            let status = resp.status();
            let text = block_on(resp.text())?.unwrap_or_default();
            Err(format!("Webhook error (HTTP {status}): {text}").into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_content_payload() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/hook")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "content": "Reminder: Exam at 14:30"
            })))
            .with_status(204)
            .create();

        let channel = WebhookChannel::with_url(&format!("{}/hook", server.url()));
        channel.send("Reminder", "Exam at 14:30").unwrap();
        mock.assert();
    }

    #[test]
    fn http_failure_becomes_err() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/hook").with_status(500).create();

        let channel = WebhookChannel::with_url(&format!("{}/hook", server.url()));
        assert!(channel.send("Reminder", "Exam at 14:30").is_err());
    }
}
