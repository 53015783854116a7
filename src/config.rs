// Configuration management module
// Loads service settings from PROMTRACK_* environment variables
//
// Numan Thabit 2025 Nov

use crate::errors::TrackError;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

const ENV_PREFIX: &str = "PROMTRACK";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds, e.g. 0.0.0.0:8080
    pub listen: String,
    /// Seconds between live task samples
    pub sample_interval_secs: u64,
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl AppConfig {
    pub fn load() -> Result<Self, TrackError> {
        Self::build(environment())
    }

    /// Load from an explicit variable map instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, TrackError> {
        Self::build(environment().source(Some(vars)))
    }

    fn build(env: config::Environment) -> Result<Self, TrackError> {
        let cfg = config::Config::builder()
            .set_default("listen", "0.0.0.0:8080")?
            .set_default("sample_interval_secs", 1)?
            .add_source(env.try_parsing(true))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, TrackError> {
        self.listen
            .parse()
            .map_err(|_| TrackError::InvalidListenAddress(self.listen.clone()))
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_secs.max(1))
    }
}
