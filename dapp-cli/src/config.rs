//! Configuration

use std::path::Path;

use dapp_ethereum::{KnownChain, RpcEnvironment};
use serde::{Deserialize, Serialize};

/// Default config file, looked up in the working directory
pub const CONFIG_FILE: &str = "dapp_config.json";

/// Environment variable holding the account's private key
pub const PRIVATE_KEY_VAR: &str = "DAPP_PRIVATE_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DappConfig {
    /// Endpoint of the chain the wallet starts on
    pub rpc_url: String,
    /// Chain the wallet starts on
    pub chain_id: u64,
    #[serde(default = "default_chain_name")]
    pub chain_name: String,
    /// Further networks the wallet already knows
    #[serde(default)]
    pub chains: Vec<KnownChain>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_chain_name() -> String {
    "Sepolia".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.sepolia.org".to_string(),
            chain_id: 11155111,
            chain_name: default_chain_name(),
            chains: vec![KnownChain::new(1, "Ethereum", "https://eth.llamarpc.com")],
            log_filter: default_log_filter(),
        }
    }
}

impl DappConfig {
    /// Reads the config, falling back to defaults when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Command-line values win over file values.
    pub fn apply_overrides(&mut self, rpc_url: Option<String>, log_filter: Option<String>) {
        if let Some(rpc_url) = rpc_url {
            self.rpc_url = rpc_url;
        }
        if let Some(log_filter) = log_filter {
            self.log_filter = log_filter;
        }
    }

    /// Every network the wallet knows; the configured primary chain replaces
    /// a listed chain with the same id.
    pub fn known_chains(&self) -> Vec<KnownChain> {
        let primary = KnownChain::new(self.chain_id, self.chain_name.clone(), self.rpc_url.clone());
        std::iter::once(primary)
            .chain(
                self.chains
                    .iter()
                    .filter(|chain| chain.chain_id != self.chain_id)
                    .cloned(),
            )
            .collect()
    }

    /// Assembles the local-key wallet. Without a key the wallet counts as not installed.
    pub fn environment(
        &self,
        private_key: Option<&str>,
    ) -> Result<RpcEnvironment, dapp_ethereum::Error> {
        let mut builder = RpcEnvironment::builder();
        if let Some(key) = private_key {
            builder.private_key(key);
        }
        for chain in self.known_chains() {
            builder.chain(chain);
        }
        builder.active_chain(self.chain_id).build()
    }
}
