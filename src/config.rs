// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{EngineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ingest: IngestConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    pub limit_per_source: usize,
    pub fetch_timeout_secs: u64,
    pub fetch_full_content: bool,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    pub snippet_max_chars: usize,
    pub max_evidence_snippets: usize,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("THREATLENS")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            ingest: IngestConfig {
                limit_per_source: 15,
                fetch_timeout_secs: 30,
                fetch_full_content: true,
                max_upload_mb: 25,
            },
            extraction: ExtractionConfig {
                snippet_max_chars: 300,
                max_evidence_snippets: 5,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(EngineError::Config("server.port cannot be 0".to_string()));
        }

        if self.ingest.limit_per_source == 0 {
            return Err(EngineError::Config(
                "limit_per_source must be greater than 0".to_string(),
            ));
        }

        if self.ingest.fetch_timeout_secs == 0 {
            return Err(EngineError::Config(
                "fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.extraction.snippet_max_chars == 0 {
            return Err(EngineError::Config(
                "snippet_max_chars must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
