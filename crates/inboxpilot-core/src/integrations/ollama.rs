//! Local LLM classification oracle via the Ollama chat API.
//!
//! Strictly advisory: transport failures and malformed replies both
//! degrade upstream, never abort a cycle.

use reqwest::Client;
use serde_json::{json, Value};

use super::traits::ClassificationOracle;
use crate::integrations::block_on;
use crate::intent::classify::{self, OracleReply};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma:2b";

pub struct OllamaOracle {
    base_url: String,
    model: String,
}

impl OllamaOracle {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn prompt(email_text: &str) -> String {
        format!(
            r#"Classify and extract details.

Return ONLY valid JSON:

{{
  "type": "meeting/exam/task/interview/payment",
  "title": ""
}}

If nothing found:
{{ "type": "none" }}

Email:
{email_text}"#
        )
    }
}

impl Default for OllamaOracle {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL)
    }
}

impl ClassificationOracle for OllamaOracle {
    fn classify(&self, email_text: &str) -> Result<OracleReply, Box<dyn std::error::Error>> {
        let url = format!("{}/api/chat", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": Self::prompt(email_text) }],
            "stream": false,
            "options": { "temperature": 0 }
        });

        let resp: Value = block_on(async {
            Client::new()
                .post(&url)
                .json(&body)
                .send()
                .await?
                .json()
                .await
        })??;

        if let Some(err) = resp.get("error") {
            return Err(format!("Ollama error: {err}").into());
        }

        let content = resp["message"]["content"].as_str().unwrap_or_default();
        Ok(classify::parse_reply(content))
    }
}
