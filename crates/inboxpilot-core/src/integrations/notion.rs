//! Notion tracking-board mirror.
//!
//! Creates one database page per scheduled event. The mirror is never
//! authoritative: the scheduler swallows and logs any failure here.

use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde_json::{json, Value};

use super::keyring_store;
use super::traits::TrackingMirror;
use crate::integrations::block_on;

const NOTION_VERSION: &str = "2022-06-28";

pub struct NotionMirror {
    api_token: String,
    database_id: String,
    base_url: String,
}

impl NotionMirror {
    /// Load stored credentials from the OS keyring (empty strings if absent).
    pub fn new() -> Self {
        let api_token = keyring_store::get("notion_token")
            .ok()
            .flatten()
            .unwrap_or_default();
        let database_id = keyring_store::get("notion_database_id")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            api_token,
            database_id,
            base_url: "https://api.notion.com".to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(api_token: &str, database_id: &str, base_url: &str) -> Self {
        Self {
            api_token: api_token.to_string(),
            database_id: database_id.to_string(),
            base_url: base_url.to_string(),
        }
    }

    /// Persist user-provided credentials to the OS keyring and update in-memory state.
    pub fn set_credentials(
        &mut self,
        token: &str,
        database_id: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("notion_token", token)?;
        keyring_store::set("notion_database_id", database_id)?;
        self.api_token = token.to_string();
        self.database_id = database_id.to_string();
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete("notion_token")?;
        keyring_store::delete("notion_database_id")?;
        self.api_token.clear();
        self.database_id.clear();
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.api_token.is_empty() && !self.database_id.is_empty()
    }

    /// Verify the stored token against the users/me endpoint.
    pub fn verify_token(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.api_token.is_empty() {
            return Err("No Notion token stored. Call set_credentials first.".into());
        }
        let url = format!("{}/v1/users/me", self.base_url);
        let resp = block_on(
            Client::new()
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.api_token))
                .header("Notion-Version", NOTION_VERSION)
                .send(),
        )??;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(format!("Notion auth check failed: HTTP {}", resp.status()).into())
        }
    }
}

impl Default for NotionMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingMirror for NotionMirror {
    fn create_record(
        &self,
        title: &str,
        start: DateTime<FixedOffset>,
        status: &str,
        source_note: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_configured() {
            return Err("Notion mirror is not configured.".into());
        }

        let url = format!("{}/v1/pages", self.base_url);
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": {
                "Name": {
                    "title": [{ "text": { "content": title } }]
                },
                "Date": {
                    "date": { "start": start.to_rfc3339() }
                },
                "Status": {
                    "select": { "name": status }
                },
                "Source": {
                    "rich_text": [{ "text": { "content": source_note } }]
                }
            }
        });

        let resp: Value = block_on(async {
            Client::new()
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_token))
                .header("Notion-Version", NOTION_VERSION)
                .json(&body)
                .send()
                .await?
                .json()
                .await
        })??;

        if resp.get("object").and_then(|o| o.as_str()) == Some("error") {
            return Err(format!(
                "Notion API error: {}",
                resp["message"].as_str().unwrap_or("unknown")
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::local_offset;
    use chrono::TimeZone;

    #[test]
    fn create_record_posts_page_payload() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/pages")
            .match_header("notion-version", NOTION_VERSION)
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "parent": { "database_id": "db-1" },
                "properties": {
                    "Name": { "title": [{ "text": { "content": "Exam" } }] },
                    "Status": { "select": { "name": "Pending" } }
                }
            })))
            .with_body(r#"{"object": "page", "id": "page-1"}"#)
            .create();

        let mirror = NotionMirror::with_base_url("secret", "db-1", &server.url());
        let start = local_offset().with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        mirror
            .create_record("Exam", start, "Pending", "Created by inboxpilot (exam)")
            .unwrap();
        mock.assert();
    }

    #[test]
    fn api_error_body_becomes_err() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/v1/pages")
            .with_body(r#"{"object": "error", "message": "database not found"}"#)
            .create();

        let mirror = NotionMirror::with_base_url("secret", "db-1", &server.url());
        let start = local_offset().with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        let err = mirror
            .create_record("Exam", start, "Pending", "note")
            .unwrap_err();
        assert!(err.to_string().contains("database not found"));
    }

    #[test]
    fn unconfigured_mirror_refuses() {
        let mirror = NotionMirror::with_base_url("", "", "http://localhost:1");
        let start = local_offset().with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        assert!(mirror.create_record("Exam", start, "Pending", "note").is_err());
    }
}
