use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "inboxpilot", version, about = "Email-driven calendar automation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the automation loop (or a single cycle)
    Run {
        /// Run one cycle and exit instead of looping
        #[arg(long)]
        once: bool,
    },
    /// Scheduled events dashboard
    Events {
        #[command(subcommand)]
        action: commands::events::EventsAction,
    },
    /// Streak counter
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Authentication management for integrations
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Extract an intent from a message body (file or stdin)
    Extract {
        /// Path to a file with the message body; omit to read stdin
        file: Option<std::path::PathBuf>,
        /// Skip the classification oracle, keyword rules only
        #[arg(long)]
        no_oracle: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { once } => commands::run::run(once),
        Commands::Events { action } => commands::events::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Extract { file, no_oracle } => commands::extract::run(file, no_oracle),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
