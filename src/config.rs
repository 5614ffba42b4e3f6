use std::env;
use std::path::PathBuf;

/// Hub configuration derived from environment variables.
///
/// Variable names mirror the hosting platform's dashboard entries so the
/// same env file works for local runs and deployments.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub bind: String,
    pub port: u16,
    /// Bearer token for API auth.  Empty ⇒ auth disabled.
    pub token: String,

    /// Connection URL of the hosted KV store.  Empty ⇒ in-memory store
    /// (local development and tests).
    pub kv_url: String,

    /// Sorted-set key holding the price time series.
    pub prices_key: String,
    /// Key holding the community registration table.
    pub registry_key: String,

    /// Directory with the built frontend bundle, served at the root.
    pub static_dir: PathBuf,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl HubConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env_str("ROSE_BIND", "127.0.0.1"),
            port: env_u16("ROSE_PORT", 8787),
            token: env_str("ROSE_TOKEN", ""),
            kv_url: env_str("ROSE_KV_URL", ""),
            prices_key: env_str("ROSE_PRICES_KEY", "rose_prices"),
            registry_key: env_str("ROSE_REGISTRY_KEY", "registered-addresses"),
            static_dir: PathBuf::from(env_str("ROSE_STATIC_DIR", "frontend/dist")),
        }
    }
}

#[cfg(test)]
impl Default for HubConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 0,
            token: String::new(),
            kv_url: String::new(),
            prices_key: "rose_prices".to_string(),
            registry_key: "registered-addresses".to_string(),
            static_dir: PathBuf::from("frontend/dist"),
        }
    }
}
