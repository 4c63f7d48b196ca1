use super::config;
use sigil::client::{ClientError, SigilClient};
use sigil::snapshot::FsBlobStore;
use sigil::transport::HttpNotary;
use tracing::warn;

/// Sign-and-send a message into a counterparty thread
///
/// Opens (or resumes) the thread with the given counterparty, has the
/// notary sign the message, and appends it to the thread once the service
/// accepted it. The updated threads are persisted, so repeated invocations
/// accumulate into the same local history.
///
/// Requires a node identity in the config.
pub async fn execute(
    to: String,
    message: String,
    config_path: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_path) = config::resolve(config_path)?;
    super::init_logging(&config.logging);

    let notary = HttpNotary::new(config.notary.api_url.clone(), config.notary.ws_url.clone());
    let snapshot_dir = config
        .snapshot
        .path
        .clone()
        .unwrap_or_else(config::default_snapshot_path);
    let client = SigilClient::new(notary, config.identity())
        .with_store(Box::new(FsBlobStore::new(snapshot_dir)));

    if !client.is_connected() {
        println!("❌ No node identity configured.");
        println!("   Set [node] name and process in {}", config_path.display());
        return Err(ClientError::Disconnected.into());
    }

    if let Err(e) = client.restore_threads().await {
        warn!("Could not restore persisted threads: {}", e);
    }

    client.start_thread(&to).await?;

    println!("📝 Sending to {} ({} bytes)...", to, message.len());
    client.send_message(&message).await?;

    println!("✅ Sent");
    if let Some(thread) = client.thread(&to).await {
        println!("   Thread with {} now has {} message(s)", to, thread.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_send_refuses_without_identity() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(
            &config_path,
            "[notary]\napi_url = \"http://127.0.0.1:1\"\n",
        )
        .unwrap();

        let result = execute(
            "bob.os".to_string(),
            "hello".to_string(),
            Some(config_path.to_string_lossy().to_string()),
        )
        .await;

        assert!(result.is_err());
    }
}
