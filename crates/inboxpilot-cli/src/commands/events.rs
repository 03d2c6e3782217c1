use chrono::Utc;
use clap::Subcommand;

use inboxpilot_core::config::Config;
use inboxpilot_core::intent::local_offset;
use inboxpilot_core::store::{EventStore, ScheduledEvent};

#[derive(Subcommand)]
pub enum EventsAction {
    /// List scheduled events with their status
    List {
        /// Only show events whose title contains this substring
        #[arg(long)]
        filter: Option<String>,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Mark all events with this title as done
    Done { title: String },
    /// Remove exact (title, datetime) duplicates
    Dedup,
}

pub fn run(action: EventsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = EventStore::open(config.events_path()?);

    match action {
        EventsAction::List { filter, json } => {
            let events = store.load()?;
            let filtered: Vec<&ScheduledEvent> = events
                .iter()
                .filter(|e| match &filter {
                    Some(needle) => e.title.to_lowercase().contains(&needle.to_lowercase()),
                    None => true,
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&filtered)?);
                return Ok(());
            }

            if filtered.is_empty() {
                println!("No events found.");
                return Ok(());
            }

            let now = Utc::now().with_timezone(&local_offset());
            let pending = filtered.iter().filter(|e| !e.reminded).count();
            println!("{} events, {} pending reminders\n", filtered.len(), pending);

            for event in filtered {
                let status = if event.reminded {
                    "reminded"
                } else if event.datetime <= now {
                    "elapsed"
                } else {
                    "pending"
                };
                println!(
                    "{}  {:<10} {}",
                    event.datetime.format("%Y-%m-%d %H:%M"),
                    status,
                    event.title
                );
            }
        }
        EventsAction::Done { title } => {
            let changed = store.mark_done(&title)?;
            if changed == 0 {
                println!("No pending events titled '{title}'.");
            } else {
                println!("Marked {changed} event(s) done.");
            }
        }
        EventsAction::Dedup => {
            let before = store.load()?.len();
            let after = store.dedup()?.len();
            println!("Removed {} duplicate(s), {} event(s) remain.", before - after, after);
        }
    }
    Ok(())
}
