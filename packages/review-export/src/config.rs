use anyhow::{Context, Result};
use beds24_client::ClientConfig;
use dotenvy::dotenv;
use std::env;

/// Process configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub beds24: ClientConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let token = env::var("BEDS24_API_TOKEN").context("BEDS24_API_TOKEN must be set")?;
        let mut beds24 = ClientConfig::new(token);
        if let Ok(url) = env::var("BEDS24_API_URL") {
            beds24 = beds24.with_base_url(url);
        }

        Ok(Self { beds24 })
    }
}
