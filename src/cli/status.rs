use super::config;
use sigil::snapshot::{self, FsBlobStore};
use sigil::transport::{HttpNotary, Notary};

/// Check configuration and notary connectivity
///
/// This command displays the effective configuration and probes the
/// notary service:
/// - Config file in use
/// - Notary endpoints (request URL and push URL)
/// - Node identity (or disconnected mode)
/// - Persisted thread snapshot
/// - Whether the notary answers a history request
pub async fn execute(config_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_path) = config::resolve(config_path)?;

    println!("📊 Sigil Status");
    println!();
    println!("Config:   {}", config_path.display());

    let notary = HttpNotary::new(config.notary.api_url.clone(), config.notary.ws_url.clone());
    println!("Notary:   {}", notary.api_url());
    println!("Push:     {}", notary.ws_url());

    match config.identity() {
        Some(identity) => println!("Identity: ✅ {}", identity),
        None => println!("Identity: ⚠️  not configured (disconnected, read-only)"),
    }

    let snapshot_dir = config
        .snapshot
        .path
        .clone()
        .unwrap_or_else(config::default_snapshot_path);
    let store = FsBlobStore::new(snapshot_dir.clone());
    match snapshot::load_threads(&store) {
        Ok(Some(threads)) => println!(
            "Snapshot: ✅ {} thread(s) in {}",
            threads.len(),
            snapshot_dir.display()
        ),
        Ok(None) => println!("Snapshot: none ({})", snapshot_dir.display()),
        Err(e) => println!("Snapshot: ⚠️  unreadable: {}", e),
    }

    println!();
    match notary.fetch_history().await {
        Ok(_) => println!("✅ Notary is reachable"),
        Err(e) => println!("❌ Notary is unreachable: {}", e),
    }

    Ok(())
}
