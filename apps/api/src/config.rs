use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::pipeline::MatchConfig;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unparsable values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub matching: MatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            matching: MatchConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let mut matching = defaults.matching;

        matching.threshold = parse_or(&lookup, "MATCH_THRESHOLD", matching.threshold)?;
        matching.top_k = parse_or(&lookup, "MATCH_TOP_K", matching.top_k)?;
        matching.max_items = parse_or(&lookup, "SELECT_MAX_ITEMS", matching.max_items)?;
        matching.min_responsibility_tokens = parse_or(
            &lookup,
            "MIN_RESPONSIBILITY_TOKENS",
            matching.min_responsibility_tokens,
        )?;
        if let Some(raw) = lookup("STOP_WORDS") {
            matching.stop_words = parse_list(&raw);
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            matching,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

/// Comma-separated list; blank items are skipped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
