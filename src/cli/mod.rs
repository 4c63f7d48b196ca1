use clap::{Parser, Subcommand};

pub mod config;
pub mod run;
pub mod send;
pub mod sign;
pub mod status;
pub mod version;

#[derive(Parser)]
#[command(name = "sigil")]
#[command(author = "Sigil Project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client CLI for a remote notary signing service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a live session (history bootstrap + push channel)
    Run {
        /// Path to config file (default: ~/.local/share/sigil/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Notary base URL (overrides the config file)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Sign a message and record it in the session ledger
    Sign {
        /// Message text to sign
        message: String,

        /// Verify the signature immediately after signing
        #[arg(long)]
        verify: bool,

        /// Path to config file (default: ~/.local/share/sigil/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Sign a message and send it into a counterparty thread
    Send {
        /// Counterparty node to send to
        #[arg(long)]
        to: String,

        /// Message text
        message: String,

        /// Path to config file (default: ~/.local/share/sigil/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Show configuration and notary connectivity
    Status {
        /// Path to config file (default: ~/.local/share/sigil/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run { config, api_url } => run::execute(config, api_url).await,
        Commands::Sign {
            message,
            verify,
            config,
        } => sign::execute(message, verify, config).await,
        Commands::Send {
            to,
            message,
            config,
        } => send::execute(to, message, config).await,
        Commands::Status { config } => status::execute(config).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured
/// level; repeated calls (tests) are no-ops.
pub fn init_logging(config: &config::LoggingConfig) {
    use std::sync::Arc;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(path) = &config.file {
        match std::fs::File::create(path) {
            Ok(file) => {
                let _ = builder
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: could not open log file '{}': {}", path.display(), e)
            }
        }
    }

    let _ = builder.try_init();
}
