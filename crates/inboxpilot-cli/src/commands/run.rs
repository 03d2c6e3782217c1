use chrono::Utc;

use inboxpilot_core::config::Config;
use inboxpilot_core::integrations::calendar::GoogleCalendar;
use inboxpilot_core::integrations::gmail::GmailInbox;
use inboxpilot_core::integrations::google::GoogleAuth;
use inboxpilot_core::integrations::notion::NotionMirror;
use inboxpilot_core::integrations::ollama::OllamaOracle;
use inboxpilot_core::integrations::toast::DesktopToast;
use inboxpilot_core::integrations::webhook::WebhookChannel;
use inboxpilot_core::integrations::{
    ClassificationOracle, NotificationChannel, TrackingMirror,
};
use inboxpilot_core::intent::local_offset;
use inboxpilot_core::reminder::ReminderEngine;
use inboxpilot_core::schedule::EventScheduler;
use inboxpilot_core::store::EventStore;
use inboxpilot_core::{IntentExtractor, Pipeline};

pub fn run(once: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let auth = GoogleAuth::new();
    if !auth.is_authenticated() {
        return Err("not authenticated with Google; run `inboxpilot auth google login` first".into());
    }

    let inbox = GmailInbox::new(auth.clone());
    let calendar = GoogleCalendar::new(auth);

    let oracle: Option<OllamaOracle> = if config.oracle.enabled {
        Some(OllamaOracle::new(&config.oracle.base_url, &config.oracle.model))
    } else {
        None
    };

    let notion = NotionMirror::new();
    let mirror: Option<&dyn TrackingMirror> = if config.mirror_enabled && notion.is_configured() {
        Some(&notion)
    } else {
        if config.mirror_enabled {
            log::info!("notion mirror not configured, skipping");
        }
        None
    };

    let toast = DesktopToast;
    let webhook = WebhookChannel::new();
    let mut channels: Vec<&dyn NotificationChannel> = Vec::new();
    if config.notifications.desktop_toast {
        channels.push(&toast);
    }
    if config.notifications.webhook && webhook.is_configured() {
        channels.push(&webhook);
    }

    let store = EventStore::open(config.events_path()?);
    let pipeline = Pipeline::new(
        &inbox,
        IntentExtractor::new(oracle.as_ref().map(|o| o as &dyn ClassificationOracle)),
        EventScheduler::new(&calendar, mirror, &store),
        ReminderEngine::new(&store, channels),
    );

    if once {
        let report = pipeline.run_cycle(Utc::now().with_timezone(&local_offset()))?;
        println!(
            "{} messages, {} created, {} duplicates, {} rejected, {} reminders",
            report.messages_seen,
            report.created,
            report.skipped_duplicate,
            report.rejected,
            report.reminders_fired
        );
        return Ok(());
    }

    println!(
        "inboxpilot running: checking every {}s (backoff {}s)",
        config.automation.poll_interval_secs, config.automation.error_backoff_secs
    );
    pipeline.run_forever(&config.automation);
    Ok(())
}
