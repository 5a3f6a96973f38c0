use std::collections::HashMap;
use std::env;

/// Per-provider secret material. Resolution order for each provider id
/// mirrors the teacher's `RuntimeConfig::from_cli`, which reads
/// `DEFI_FLOW_PRIVATE_KEY` directly or `DEFI_FLOW_PRIVATE_KEY_FILE` for a
/// path to read it from, private key wins if both are set: here the
/// env var `{PROVIDER}_API_KEY` takes precedence over
/// `{PROVIDER}_API_KEY_FILE`.
pub trait Credentials: Send + Sync {
    fn get(&self, provider_id: &str) -> Option<String>;
}

/// Looks up `{PROVIDER_ID_UPPER}_API_KEY` / `_API_KEY_FILE` at construction
/// time and caches the resolved values; a provider with neither set is
/// simply absent, surfaced by adapters as `CoreError::NotConfigured`.
pub struct EnvCredentials {
    resolved: HashMap<String, String>,
}

impl EnvCredentials {
    pub fn from_env(provider_ids: &[&str]) -> Self {
        let mut resolved = HashMap::new();
        for provider_id in provider_ids {
            let upper = provider_id.to_uppercase();
            if let Ok(key) = env::var(format!("{upper}_API_KEY")) {
                resolved.insert(provider_id.to_string(), key);
                continue;
            }
            if let Ok(path) = env::var(format!("{upper}_API_KEY_FILE")) {
                if let Ok(contents) = std::fs::read_to_string(path) {
                    resolved.insert(provider_id.to_string(), contents.trim().to_string());
                }
            }
        }
        EnvCredentials { resolved }
    }

    /// For tests and simulation mode, where no real secret exists.
    pub fn from_map(resolved: HashMap<String, String>) -> Self {
        EnvCredentials { resolved }
    }
}

impl Credentials for EnvCredentials {
    fn get(&self, provider_id: &str) -> Option<String> {
        self.resolved.get(provider_id).cloned()
    }
}
