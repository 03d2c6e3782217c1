//! Google Calendar client: duplicate lookup and event insertion on the
//! primary calendar.

use chrono::{DateTime, Duration, FixedOffset};
use reqwest::Client;
use serde_json::{json, Value};

use super::google::GoogleAuth;
use super::traits::CalendarService;
use crate::integrations::block_on;
use crate::intent::IntentKind;

pub struct GoogleCalendar {
    auth: GoogleAuth,
    base_url: String,
}

impl GoogleCalendar {
    pub fn new(auth: GoogleAuth) -> Self {
        Self {
            auth,
            base_url: "https://www.googleapis.com".to_string(),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/calendar/v3/calendars/primary/events", self.base_url)
    }
}

impl CalendarService for GoogleCalendar {
    fn find_existing(
        &self,
        title: &str,
        start: DateTime<FixedOffset>,
        window_minutes: i64,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        let token = self.auth.access_token()?;
        let window = Duration::minutes(window_minutes);
        let url = format!(
            "{}?timeMin={}&timeMax={}&singleEvents=true&orderBy=startTime",
            self.events_url(),
            urlencode((start - window).to_rfc3339()),
            urlencode((start + window).to_rfc3339()),
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
            return Err(format!("Google Calendar API error: {err}").into());
        }

        let found = resp["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .any(|item| item["summary"].as_str() == Some(title))
            })
            .unwrap_or(false);
        Ok(found)
    }

    fn insert_event(
        &self,
        title: &str,
        kind: IntentKind,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let token = self.auth.access_token()?;
        let body = json!({
            "summary": title,
            "description": format!("Created automatically by inboxpilot ({})", kind.label()),
            "start": {
                "dateTime": start.to_rfc3339(),
                "timeZone": "Asia/Kolkata",
            },
            "end": {
                "dateTime": end.to_rfc3339(),
                "timeZone": "Asia/Kolkata",
            },
            "colorId": kind.color_id(),
        });

        let resp: Value = block_on(async {
            Client::new()
                .post(&self.events_url())
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
                .json()
                .await
        })??;

        if let Some(err) = resp.get("error") {
            return Err(format!("Google Calendar API error: {err}").into());
        }
        Ok(())
    }
}

fn urlencode(s: String) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_key_only(&s)
        .finish()
}
