use clap::{Parser, Subcommand};
use email_status::{
    config::PollerConfig,
    error::DisplayError,
    models::{EmailCategory, PollStatus, StatusKind, StatusView},
    page::{self, MemoryPage},
    services::{present, HttpStatusClient, StatusDisplay, StatusPoller},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "email-status")]
#[command(about = "Check on asynchronously sent account emails", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the status endpoint for one email until it settles
    Watch {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Email category (verification or password_reset)
        #[arg(short, long, default_value_t = EmailCategory::Verification)]
        category: EmailCategory,
    },

    /// Run the page bootstrap for a URL against a sample login page
    Preview {
        /// Full page URL, e.g. https://shop.example.com/accounts/login/?email=a%40b.com&command=verification&async=true
        #[arg(short, long)]
        url: String,
    },

    /// Print the status message markup for one status
    Render {
        /// pending, sent, failed, not_found, error or timeout
        #[arg(short, long)]
        status: StatusKind,

        /// Error detail reported with a failed send
        #[arg(short, long)]
        detail: Option<String>,

        /// Email category (verification or password_reset)
        #[arg(short, long, default_value_t = EmailCategory::Verification)]
        category: EmailCategory,
    },
}

/// Prints each status change as one line.
struct TerminalDisplay;

impl StatusDisplay for TerminalDisplay {
    fn apply(&self, view: &StatusView) -> Result<(), DisplayError> {
        let marker = match view.status {
            StatusKind::Pending => "⏳",
            StatusKind::Sent => "✅",
            StatusKind::Failed | StatusKind::Timeout => "⚠️",
            StatusKind::NotFound => "ℹ️",
            StatusKind::Error => "❌",
        };

        match &view.note {
            Some(note) => println!("{} {} ({})", marker, view.text, note),
            None => println!("{} {}", marker, view.text),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "email_status=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = PollerConfig::from_env()?;

    match cli.command {
        Commands::Watch { email, category } => {
            let source = Arc::new(HttpStatusClient::from_config(&config)?);
            tracing::info!(endpoint = %source.endpoint(), "Watching email status");

            let poller = StatusPoller::new(
                email,
                category,
                config.poll,
                source,
                Arc::new(TerminalDisplay),
            );
            poller.start();

            tokio::select! {
                _ = poller.stopped() => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, stopping status checks");
                    poller.stop();
                }
            }
        }
        Commands::Preview { url } => {
            let source = Arc::new(HttpStatusClient::from_config(&config)?);
            let login_page = MemoryPage::registration_page();

            match page::bootstrap(&login_page, &url, source, config.poll)? {
                Some(poller) => {
                    println!(
                        "Status checks started for {} ({})",
                        poller.target_email(),
                        poller.category()
                    );
                    poller.stopped().await;
                }
                None => println!("Page URL does not activate email status checks"),
            }

            println!("{}", login_page.markup()?);
        }
        Commands::Render {
            status,
            detail,
            category,
        } => {
            let mut poll_status = PollStatus::new(status);
            poll_status.error_message = detail;

            let view = present(&poll_status, category);
            println!("class: {}", view.message_class());
            println!("spinner: {}", if view.spinner_visible { "shown" } else { "hidden" });
            println!("{}", view.message_html()?);
        }
    }

    Ok(())
}
