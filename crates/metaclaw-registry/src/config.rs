//! Server configuration from command-line flags and environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// MetaClaw registry server
#[derive(Parser, Debug, Clone)]
#[command(name = "metaclaw-registry")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Listen address
    #[arg(long, env = "REGISTRY_ADDR", default_value = "0.0.0.0:8088")]
    pub addr: SocketAddr,

    /// Catalog snapshot file
    #[arg(long, env = "REGISTRY_DATA", default_value = "./data/registry.json")]
    pub data: PathBuf,

    /// Bearer token required for the write API (empty disables auth)
    #[arg(long, env = "REGISTRY_ADMIN_TOKEN", default_value = "", hide_env_values = true)]
    pub admin_token: String,
}

impl Config {
    /// The admin token, or `None` when blank.
    pub fn admin_token(&self) -> Option<String> {
        let token = self.admin_token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}
