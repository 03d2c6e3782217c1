use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Google (Gmail + Calendar): login / logout / status
    Google {
        #[command(subcommand)]
        action: AuthOp,
    },
    /// Notion tracking board: login / logout / status
    Notion {
        #[command(subcommand)]
        action: AuthOp,
    },
    /// Notification webhook: login / logout / status
    Webhook {
        #[command(subcommand)]
        action: AuthOp,
    },
}

#[derive(Subcommand)]
pub enum AuthOp {
    /// Authenticate with the service
    Login {
        /// API token (for services that use API keys)
        #[arg(long)]
        token: Option<String>,
        /// Client ID (for OAuth services like Google)
        #[arg(long)]
        client_id: Option<String>,
        /// Client secret (for OAuth services like Google)
        #[arg(long)]
        client_secret: Option<String>,
        /// Database ID (for Notion)
        #[arg(long)]
        database_id: Option<String>,
        /// Webhook URL
        #[arg(long)]
        webhook_url: Option<String>,
    },
    /// Remove credentials
    Logout,
    /// Check authentication status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Google { action: op } => handle_google(op),
        AuthAction::Notion { action: op } => handle_notion(op),
        AuthAction::Webhook { action: op } => handle_webhook(op),
    }
}

fn handle_google(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use inboxpilot_core::integrations::google::GoogleAuth;
    match op {
        AuthOp::Login {
            client_id,
            client_secret,
            ..
        } => {
            let cid = client_id.ok_or("--client-id required for Google")?;
            let csec = client_secret.ok_or("--client-secret required for Google")?;
            GoogleAuth::set_credentials(&cid, &csec)?;
            let auth = GoogleAuth::new();
            auth.authenticate()?;
            println!("Google authenticated");
        }
        AuthOp::Logout => {
            let auth = GoogleAuth::new();
            auth.disconnect()?;
            println!("Google credentials removed");
        }
        AuthOp::Status => {
            let auth = GoogleAuth::new();
            println!(
                "Google: {}",
                if auth.is_authenticated() {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}

fn handle_notion(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use inboxpilot_core::integrations::notion::NotionMirror;
    match op {
        AuthOp::Login {
            token, database_id, ..
        } => {
            let token = token.ok_or("--token required for Notion")?;
            let database_id = database_id.ok_or("--database-id required for Notion")?;
            let mut mirror = NotionMirror::new();
            mirror.set_credentials(&token, &database_id)?;
            mirror.verify_token()?;
            println!("Notion authenticated");
        }
        AuthOp::Logout => {
            let mut mirror = NotionMirror::new();
            mirror.disconnect()?;
            println!("Notion credentials removed");
        }
        AuthOp::Status => {
            let mirror = NotionMirror::new();
            println!(
                "Notion: {}",
                if mirror.is_configured() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
    }
    Ok(())
}

fn handle_webhook(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use inboxpilot_core::integrations::webhook::WebhookChannel;
    match op {
        AuthOp::Login { webhook_url, .. } => {
            let url = webhook_url.ok_or("--webhook-url required")?;
            let mut channel = WebhookChannel::new();
            channel.set_credentials(&url)?;
            println!("Webhook stored");
        }
        AuthOp::Logout => {
            let mut channel = WebhookChannel::new();
            channel.disconnect()?;
            println!("Webhook removed");
        }
        AuthOp::Status => {
            let channel = WebhookChannel::new();
            println!(
                "Webhook: {}",
                if channel.is_configured() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
    }
    Ok(())
}
