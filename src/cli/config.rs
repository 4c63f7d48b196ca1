//! Sigil configuration file handling
//!
//! Provides default configuration generation and loading for the sigil
//! client. Configuration files are TOML format and live in the sigil data
//! directory.
//!
//! The config covers operator concerns only: where the notary service is,
//! which node identity to act as, where thread snapshots go, and logging.
//! Protocol behavior (commit rules, verification semantics) is not
//! configurable.

use serde::{Deserialize, Serialize};
use sigil::identity::Identity;
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default notary URL written into generated configs
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Sigil client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigilConfig {
    /// Notary service endpoints
    pub notary: NotaryConfig,

    /// Local node identity
    #[serde(default)]
    pub node: NodeConfig,

    /// Thread snapshot persistence
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Notary service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotaryConfig {
    /// Base URL of the notary service
    pub api_url: String,

    /// Push channel URL (optional, derived from api_url if not specified)
    pub ws_url: Option<String>,
}

/// Local node identity. Both fields are required for signing and sending;
/// with either missing, sigil runs disconnected (reads only).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeConfig {
    /// Node name (e.g. "alice.os")
    pub name: Option<String>,

    /// Process identifier on the node
    pub process: Option<String>,
}

/// Thread snapshot persistence
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotConfig {
    /// Directory for thread snapshots (optional, defaults to the data dir)
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl SigilConfig {
    /// Create a new configuration pointing at the given notary URL
    pub fn new(api_url: String) -> Self {
        Self {
            notary: NotaryConfig {
                api_url,
                ws_url: None,
            },
            node: NodeConfig::default(),
            snapshot: SnapshotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: SigilConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, contents)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        Ok(())
    }

    /// The configured node identity, when both halves are set
    pub fn identity(&self) -> Option<Identity> {
        Identity::from_parts(self.node.name.clone(), self.node.process.clone())
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(api_url: &str) -> String {
        format!(
            r#"# Sigil Client Configuration
#
# Sigil talks to a remote notary service that signs messages and checks
# signatures. This file controls where that service lives, which node
# identity the client acts as, and where session threads are persisted.

[notary]
# Base URL of the notary service
api_url = "{api_url}"

# Push channel URL (optional)
# Leave commented to derive it from api_url (http -> ws)
# ws_url = "ws://localhost:8080"

[node]
# Node identity. BOTH fields are required for signing and sending.
# Without them sigil starts disconnected: threads are visible, but
# nothing can be signed, verified, or sent.
# name = "alice.os"
# process = "sigil:sigil:template.os"

[snapshot]
# Directory for thread snapshots (optional)
# Defaults to the sigil data directory
# path = "/var/lib/sigil/snapshots"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/sigil/sigil.log"
"#,
            api_url = api_url
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(
        config_path: &Path,
        api_url: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml(api_url);

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Resolve the effective configuration: the explicit path if given, the
/// default location otherwise. A missing config file is created with
/// commented defaults first.
pub fn resolve(
    path_override: Option<String>,
) -> Result<(SigilConfig, PathBuf), Box<dyn std::error::Error>> {
    let config_path = path_override
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let config = if config_path.exists() {
        SigilConfig::load(&config_path)?
    } else {
        println!("📝 No config file found. Creating default configuration...");
        SigilConfig::create_default(&config_path, DEFAULT_API_URL)?;
        println!("   Created: {}", config_path.display());
        println!("   Edit it to point at your notary and set your node identity.");
        SigilConfig::load(&config_path)?
    };

    Ok((config, config_path))
}

/// Sigil data directory (config and snapshots live here)
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sigil")
}

/// Default config file path: ~/.local/share/sigil/config.toml
pub fn default_config_path() -> PathBuf {
    default_data_path().join("config.toml")
}

/// Default snapshot directory: ~/.local/share/sigil/snapshots
pub fn default_snapshot_path() -> PathBuf {
    default_data_path().join("snapshots")
}
