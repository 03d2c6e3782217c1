use clap::Subcommand;

use inboxpilot_core::config::Config;
use inboxpilot_core::store::StreakStore;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print the current streak count
    Show,
    /// Increment the streak by one
    Bump,
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = StreakStore::open(config.streak_path()?);

    match action {
        StreakAction::Show => {
            println!("Streak: {}", store.load()?.count);
        }
        StreakAction::Bump => {
            println!("Streak: {}", store.bump()?);
        }
    }
    Ok(())
}
