use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            data_dir: PathBuf::from("./data"),
            max_upload_bytes: 256 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Load configuration
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match std::env::var("MATCHLOG_CONFIG_FILE") {
            Ok(path) if Path::new(&path).exists() => {
                tracing::info!("Loading configuration from: {}", path);
                Self::from_file(&path)?
            }
            Ok(path) => {
                tracing::warn!("Config file not found at {}, using defaults", path);
                Self::default()
            }
            Err(_) => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn apply_env(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(bind) = var("MATCHLOG_BIND_ADDRESS") {
            self.bind_address = bind;
        }
        if let Some(dir) = var("MATCHLOG_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(limit) = var("MATCHLOG_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = limit
                .parse()
                .map_err(|e| format!("Invalid MATCHLOG_MAX_UPLOAD_BYTES '{}': {}", limit, e))?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_address.parse()
    }
}
