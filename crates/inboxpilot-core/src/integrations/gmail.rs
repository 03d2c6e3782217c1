//! Gmail inbox reader.
//!
//! Lists unread messages (capped at 5 per cycle), pulls the first
//! `text/plain` MIME part of each, and marks messages read by removing
//! the UNREAD label.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};

use super::google::GoogleAuth;
use super::traits::{InboxMessage, InboxReader};
use crate::integrations::block_on;

const MAX_RESULTS: u32 = 5;

pub struct GmailInbox {
    auth: GoogleAuth,
    base_url: String,
}

impl GmailInbox {
    pub fn new(auth: GoogleAuth) -> Self {
        Self {
            auth,
            base_url: "https://gmail.googleapis.com".to_string(),
        }
    }

    fn fetch_message(&self, token: &str, id: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let url = format!(
            "{}/gmail/v1/users/me/messages/{id}?format=full",
            self.base_url
        );
        let resp: Value = block_on(async {
            Client::new()
                .get(&url)
                .bearer_auth(token)
                .send()
                .await?
                .json()
                .await
        })??;

        if let Some(err) = resp.get("error") {
            return Err(format!("Gmail API error: {err}").into());
        }
        Ok(resp)
    }
}

impl InboxReader for GmailInbox {
    fn list_unread(&self) -> Result<Vec<InboxMessage>, Box<dyn std::error::Error>> {
        let token = self.auth.access_token()?;
        let url = format!(
            "{}/gmail/v1/users/me/messages?labelIds=UNREAD&maxResults={MAX_RESULTS}",
            self.base_url
        );

        let resp: Value = block_on(async {
            Client::new()
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await?
                .json()
                .await
        })??;

        if let Some(err) = resp.get("error") {
            return Err(format!("Gmail API error: {err}").into());
        }

        let ids: Vec<String> = resp["messages"]
            .as_array()
            .map(|msgs| {
                msgs.iter()
                    .filter_map(|m| m["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        let mut messages = Vec::new();
        for id in ids {
            let full = self.fetch_message(&token, &id)?;
            // Messages without a plain-text part (pure HTML, calendar
            // invites) are skipped, not failed.
            if let Some(body) = plain_text_body(&full["payload"]) {
                messages.push(InboxMessage { id, body });
            } else {
                log::debug!("message {id} has no text/plain part, skipping");
            }
        }
        Ok(messages)
    }

    fn mark_read(&self, id: &str) -> Result<(), Box<dyn std::error::Error>> {
        let token = self.auth.access_token()?;
        let url = format!(
            "{}/gmail/v1/users/me/messages/{id}/modify",
            self.base_url
        );
        let body = json!({ "removeLabelIds": ["UNREAD"] });

        let resp: Value = block_on(async {
            Client::new()
                .post(&url)
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
                .json()
                .await
        })??;

        if let Some(err) = resp.get("error") {
            return Err(format!("Gmail API error: {err}").into());
        }
        Ok(())
    }
}

/// Decode the first `text/plain` part of a Gmail payload. Falls back
/// to the payload's own body for single-part messages.
fn plain_text_body(payload: &Value) -> Option<String> {
    if let Some(parts) = payload["parts"].as_array() {
        for part in parts {
            if part["mimeType"].as_str() == Some("text/plain") {
                if let Some(text) = decode_body(&part["body"]) {
                    return Some(text);
                }
            }
        }
    }
    if payload["mimeType"].as_str() == Some("text/plain") {
        return decode_body(&payload["body"]);
    }
    None
}

/// Gmail bodies are urlsafe base64, usually unpadded.
fn decode_body(body: &Value) -> Option<String> {
    let data = body["data"].as_str()?;
    let bytes = URL_SAFE_NO_PAD.decode(data.trim_end_matches('=')).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> String {
        URL_SAFE_NO_PAD.encode(text.as_bytes())
    }

    #[test]
    fn decodes_first_plain_text_part() {
        let payload = json!({
            "mimeType": "multipart/alternative",
            "parts": [
                { "mimeType": "text/html", "body": { "data": encode("<p>hi</p>") } },
                { "mimeType": "text/plain", "body": { "data": encode("Exam on 05/03/2026") } },
            ]
        });
        assert_eq!(plain_text_body(&payload).as_deref(), Some("Exam on 05/03/2026"));
    }

    #[test]
    fn falls_back_to_single_part_body() {
        let payload = json!({
            "mimeType": "text/plain",
            "body": { "data": encode("Meeting at 5 pm") }
        });
        assert_eq!(plain_text_body(&payload).as_deref(), Some("Meeting at 5 pm"));
    }

    #[test]
    fn html_only_message_yields_none() {
        let payload = json!({
            "mimeType": "text/html",
            "body": { "data": encode("<p>hi</p>") }
        });
        assert_eq!(plain_text_body(&payload), None);
    }

    #[test]
    fn padded_base64_still_decodes() {
        let padded = base64::engine::general_purpose::URL_SAFE.encode("hi!".as_bytes());
        let payload = json!({
            "mimeType": "text/plain",
            "body": { "data": padded }
        });
        assert_eq!(plain_text_body(&payload).as_deref(), Some("hi!"));
    }
}
