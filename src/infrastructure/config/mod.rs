use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Root of managed storage; audio artifacts live under `<data_dir>/audio`.
    pub data_dir: PathBuf,
    pub environment: Environment,
    pub log_format: LogFormat,
    // MiniMax speech provider
    pub minimax_api_key: String,
    pub minimax_base_url: String,
    pub tts_poll_interval_ms: u64,
    pub tts_poll_max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/voicepaper.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            minimax_api_key: env::var("MINIMAX_API_KEY")?,
            minimax_base_url: env::var("MINIMAX_BASE_URL")
                .unwrap_or_else(|_| "https://api.minimaxi.com".to_string()),
            tts_poll_interval_ms: env::var("TTS_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()?,
            tts_poll_max_attempts: env::var("TTS_POLL_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "150".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Directory holding generated audio artifacts.
    pub fn audio_dir(&self) -> PathBuf {
        self.data_dir.join("audio")
    }
}
