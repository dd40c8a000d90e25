use std::fmt;

use anyhow::{Context, Result};

/// Placeholder value shipped in sample `.env` files. Treated as "no key".
const PLACEHOLDER_API_KEY: &str = "YOUR_GEMINI_API_KEY";

/// A Gemini API key. The value never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Whether a live AI credential is available. Resolved once at startup and
/// injected into the analyzer; `Unconfigured` switches the service to mock mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Configured(ApiKey),
    Unconfigured,
}

impl Credential {
    /// Classifies a raw environment value. Blank values and the sample
    /// placeholder are both unconfigured.
    pub fn from_value(raw: Option<String>) -> Self {
        match raw.map(|v| v.trim().to_string()) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => {
                Credential::Configured(ApiKey(key))
            }
            _ => Credential::Unconfigured,
        }
    }
}

/// What a failed live analysis turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    /// Serve the mock result; the user never sees the failure.
    #[default]
    Mock,
    /// Report the failure so the session lands in its Error phase.
    Surface,
}

impl FallbackMode {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "mock" => Ok(FallbackMode::Mock),
            "surface" => Ok(FallbackMode::Surface),
            other => anyhow::bail!("ANALYSIS_FALLBACK must be 'mock' or 'surface', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub credential: Credential,
    pub fallback: FallbackMode,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let raw_key = std::env::var("API_KEY")
            .ok()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok());

        Ok(Config {
            credential: Credential::from_value(raw_key),
            fallback: FallbackMode::parse(&std::env::var("ANALYSIS_FALLBACK").unwrap_or_default())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
