use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TABLE: &str = "JogaJuntoRegistrations";
pub const DEFAULT_GAMES_LISTING_FILE: &str = "games_listing.txt";
pub const DEFAULT_GAMERS_FILE: &str = "gamers.txt";
pub const DEFAULT_CSV_FILE: &str = "registrations.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub aws: AwsConfig,
    pub table_name: String,
    pub outputs: OutputPaths,
}

#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// DynamoDB Local or another compatible endpoint
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub games_listing: PathBuf,
    pub gamers: PathBuf,
    pub csv: PathBuf,
}

impl AwsConfig {
    /// Key id + secret, only when both are present
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(key_id), Some(secret)) => Some((key_id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        OutputPaths {
            games_listing: PathBuf::from(DEFAULT_GAMES_LISTING_FILE),
            gamers: PathBuf::from(DEFAULT_GAMERS_FILE),
            csv: PathBuf::from(DEFAULT_CSV_FILE),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Failed to load .env file"),
        }

        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Build config from any key → value lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let aws = AwsConfig {
            region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            access_key_id: get("AWS_ACCESS_KEY_ID"),
            secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            endpoint_url: get("DYNAMODB_ENDPOINT_URL"),
        };

        let outputs = OutputPaths {
            games_listing: get("GAMES_LISTING_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GAMES_LISTING_FILE)),
            gamers: get("GAMERS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GAMERS_FILE)),
            csv: get("CSV_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILE)),
        };

        Config {
            aws,
            table_name: get("DYNAMODB_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            outputs,
        }
    }
}
