use super::config;
use sigil::client::{ClientError, SigilClient};
use sigil::transport::HttpNotary;

/// Sign a message through the notary service
///
/// Submits the message for signing and records the result in a fresh
/// session ledger. With `--verify`, the recorded signature is immediately
/// checked back against the service.
///
/// The ledger is per-session: a one-shot invocation holds exactly the
/// entries it created. Requires a node identity in the config.
pub async fn execute(
    message: String,
    verify: bool,
    config_path: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_path) = config::resolve(config_path)?;
    super::init_logging(&config.logging);

    let notary = HttpNotary::new(config.notary.api_url.clone(), config.notary.ws_url.clone());
    let client = SigilClient::new(notary, config.identity());

    if !client.is_connected() {
        println!("❌ No node identity configured.");
        println!("   Set [node] name and process in {}", config_path.display());
        return Err(ClientError::Disconnected.into());
    }

    println!("📝 Signing message ({} bytes)...", message.len());
    let sequence = client.sign_message(&message).await?;

    println!("✅ Signed. Ledger entry #{}", sequence);
    if let Some(entry) = client.entry(sequence).await {
        if let Some(signature) = &entry.signature {
            println!("   Signature: {}", hex::encode(signature));
        }
    }

    if verify {
        println!("🔍 Verifying signature...");
        if client.verify_entry(sequence).await? {
            println!("✅ Signature verified");
        } else {
            println!("❌ Signature did NOT verify");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sign_refuses_without_identity() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        // Config with a notary but no node identity
        std::fs::write(
            &config_path,
            "[notary]\napi_url = \"http://127.0.0.1:1\"\n",
        )
        .unwrap();

        let result = execute(
            "hello".to_string(),
            false,
            Some(config_path.to_string_lossy().to_string()),
        )
        .await;

        assert!(result.is_err());
    }
}
