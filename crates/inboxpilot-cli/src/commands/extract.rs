use std::io::Read;
use std::path::PathBuf;

use chrono::Utc;

use inboxpilot_core::config::Config;
use inboxpilot_core::integrations::ollama::OllamaOracle;
use inboxpilot_core::integrations::ClassificationOracle;
use inboxpilot_core::intent::local_offset;
use inboxpilot_core::IntentExtractor;

/// Dry-run the extractor on a message body and print the intent.
pub fn run(file: Option<PathBuf>, no_oracle: bool) -> Result<(), Box<dyn std::error::Error>> {
    let body = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = Config::load()?;
    let oracle: Option<OllamaOracle> = if config.oracle.enabled && !no_oracle {
        Some(OllamaOracle::new(&config.oracle.base_url, &config.oracle.model))
    } else {
        None
    };

    let extractor = IntentExtractor::new(oracle.as_ref().map(|o| o as &dyn ClassificationOracle));
    let now = Utc::now().with_timezone(&local_offset());

    match extractor.extract(&body, now) {
        Some(intent) => println!("{}", serde_json::to_string_pretty(&intent)?),
        None => println!("No actionable content."),
    }
    Ok(())
}
