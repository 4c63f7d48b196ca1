use super::config::{self, SigilConfig};
use futures::StreamExt;
use sigil::client::SigilClient;
use sigil::snapshot::FsBlobStore;
use sigil::threads::COMPOSE_THREAD;
use sigil::transport::HttpNotary;
use sigil::wire::PushEvent;
use tracing::warn;

/// Run a live session against the notary service
///
/// Restores persisted threads, pulls the server-side message history, and
/// then listens on the push channel until interrupted.
///
/// ## Configuration Loading
///
/// Configuration is loaded from one of these sources (in order of precedence):
/// 1. `--config` flag if provided
/// 2. Default config at `~/.local/share/sigil/config.toml`
///
/// If the config file doesn't exist, a default one is generated. The
/// `--api-url` flag overrides the configured notary URL for this run.
///
/// ## Degraded Modes
///
/// Without a node identity in the config, the session is read-only. If the
/// push channel can't be opened (or closes mid-session), the session keeps
/// running without live updates; request/response operations are unaffected.
pub async fn execute(
    config_path: Option<String>,
    api_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, config_path) = config::resolve(config_path)?;
    apply_api_override(&mut config, api_url);
    super::init_logging(&config.logging);

    println!("🚀 Starting sigil session...");
    println!();
    println!("Config: {}", config_path.display());
    println!("Notary: {}", config.notary.api_url);

    let client = build_client(&config);
    match client.identity() {
        Some(identity) => println!("Node:   {}", identity),
        None => {
            println!("Node:   (not configured)");
            println!();
            println!("⚠️  No node identity set. Running disconnected: threads are");
            println!("   visible, but nothing can be signed, verified, or sent.");
        }
    }
    println!();

    match client.restore_threads().await {
        Ok(true) => println!("📁 Restored persisted threads"),
        Ok(false) => {}
        Err(e) => warn!("Could not restore persisted threads: {}", e),
    }

    match client.load_history().await {
        Ok(()) => {
            let peers = client.counterparties().await;
            let count = peers.iter().filter(|p| p.as_str() != COMPOSE_THREAD).count();
            println!("📊 History loaded: {} thread(s)", count);
        }
        Err(e) => warn!("Could not load message history: {}", e),
    }

    let mut push = if client.is_connected() {
        match client.subscribe().await {
            Ok(stream) => {
                println!("🔔 Push channel open");
                Some(stream)
            }
            Err(e) => {
                warn!("Push channel unavailable, continuing without live updates: {}", e);
                None
            }
        }
    } else {
        None
    };

    println!();
    println!("Press Ctrl-C to exit.");

    loop {
        tokio::select! {
            event = async {
                match push.as_mut() {
                    Some(stream) => stream.next().await,
                    None => futures::future::pending().await,
                }
            } => {
                match event {
                    Some(event) => {
                        match &event {
                            PushEvent::NewMessage(message) => {
                                println!("📨 [{}] {}: {}", message.id, message.author, message.content);
                            }
                        }
                        client.apply_push(event).await;
                    }
                    None => {
                        warn!("Push channel closed, continuing without live updates");
                        push = None;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Shutting down...");
                break;
            }
        }
    }

    Ok(())
}

fn apply_api_override(config: &mut SigilConfig, api_url: Option<String>) {
    if let Some(url) = api_url {
        config.notary.api_url = url;
        // A stale ws_url would point at the old host; re-derive instead.
        config.notary.ws_url = None;
    }
}

fn build_client(config: &SigilConfig) -> SigilClient<HttpNotary> {
    let notary = HttpNotary::new(config.notary.api_url.clone(), config.notary.ws_url.clone());
    let snapshot_dir = config
        .snapshot
        .path
        .clone()
        .unwrap_or_else(config::default_snapshot_path);

    SigilClient::new(notary, config.identity())
        .with_store(Box::new(FsBlobStore::new(snapshot_dir)))
}
