use std::sync::Arc;

use crate::config::Config;
use crate::matching::pipeline::{ConfigError, MatchPipeline};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Base pipeline built from the configured matching parameters. Per-request
    /// overrides derive a new pipeline that shares its scorer.
    pub pipeline: Arc<MatchPipeline>,
}

impl AppState {
    /// Fails when the configured matching parameters are out of range.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let pipeline = MatchPipeline::new(config.matching.clone())?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
        })
    }
}
