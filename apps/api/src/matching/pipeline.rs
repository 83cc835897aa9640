//! Match Pipeline — validated configuration plus the per-run chain:
//! split responsibilities → build matrix → select content → coverage report.
//!
//! A pipeline holds no state between runs; distinct jobs can run on separate
//! threads against the same read-only profile.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::matching::content_selector::{rank_content, select_content, SelectionResult};
use crate::matching::coverage::{build_report, CoverageReport};
use crate::matching::jd_parser::extract_responsibilities;
use crate::matching::matrix::{build_matrix, CompatibilityMatrix};
use crate::matching::normalizer::{Normalizer, DEFAULT_STOP_WORDS};
use crate::matching::similarity::{FuzzyScorer, SimilarityScorer};
use crate::models::job::{JobDescription, Responsibility};
use crate::models::profile::{EntryId, Profile};

pub const DEFAULT_THRESHOLD: f64 = 0.6;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_MAX_ITEMS: usize = 8;
pub const DEFAULT_MIN_RESPONSIBILITY_TOKENS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("threshold must be a number within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("{field} must be at least {minimum}, got {value}")]
    CountOutOfRange {
        field: &'static str,
        value: i64,
        minimum: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    pub threshold: f64,
    pub top_k: usize,
    pub max_items: usize,
    pub stop_words: Vec<String>,
    pub min_responsibility_tokens: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            max_items: DEFAULT_MAX_ITEMS,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            min_responsibility_tokens: DEFAULT_MIN_RESPONSIBILITY_TOKENS,
        }
    }
}

/// Per-run overrides as supplied by callers. Signed so that negative counts
/// are reported instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchOverrides {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub top_k: Option<i64>,
    #[serde(default)]
    pub max_items: Option<i64>,
    #[serde(default)]
    pub min_responsibility_tokens: Option<i64>,
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        if self.top_k == 0 {
            return Err(ConfigError::CountOutOfRange {
                field: "top_k",
                value: 0,
                minimum: 1,
            });
        }
        if self.max_items == 0 {
            return Err(ConfigError::CountOutOfRange {
                field: "max_items",
                value: 0,
                minimum: 1,
            });
        }
        Ok(())
    }

    /// Applies overrides on top of this config and validates the result.
    pub fn with_overrides(&self, overrides: &MatchOverrides) -> Result<MatchConfig, ConfigError> {
        let mut config = self.clone();
        if let Some(threshold) = overrides.threshold {
            config.threshold = threshold;
        }
        if let Some(top_k) = overrides.top_k {
            config.top_k = to_count("top_k", top_k, 1)?;
        }
        if let Some(max_items) = overrides.max_items {
            config.max_items = to_count("max_items", max_items, 1)?;
        }
        if let Some(min_tokens) = overrides.min_responsibility_tokens {
            config.min_responsibility_tokens = to_count("min_responsibility_tokens", min_tokens, 0)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn check_count(field: &'static str, value: i64, minimum: i64) -> Result<(), ConfigError> {
    if value < minimum {
        return Err(ConfigError::CountOutOfRange {
            field,
            value,
            minimum,
        });
    }
    Ok(())
}

fn to_count(field: &'static str, value: i64, minimum: i64) -> Result<usize, ConfigError> {
    check_count(field, value, minimum)?;
    usize::try_from(value).map_err(|_| ConfigError::CountOutOfRange {
        field,
        value,
        minimum,
    })
}

/// Everything one (profile, job description) run produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchOutcome {
    pub responsibilities: Vec<Responsibility>,
    pub matrix: CompatibilityMatrix,
    pub selected_entry_ids: Vec<EntryId>,
    pub selection: SelectionResult,
    pub report: CoverageReport,
}

#[derive(Clone)]
pub struct MatchPipeline {
    config: MatchConfig,
    scorer: Arc<dyn SimilarityScorer>,
}

impl std::fmt::Debug for MatchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchPipeline")
            .field("config", &self.config)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl MatchPipeline {
    /// Builds a pipeline with the default fuzzy scorer using the configured stop words.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        let scorer = Arc::new(FuzzyScorer::new(Normalizer::new(&config.stop_words)));
        Self::with_scorer(config, scorer)
    }

    /// Builds a pipeline around an existing scorer. Fails on invalid configuration.
    pub fn with_scorer(
        config: MatchConfig,
        scorer: Arc<dyn SimilarityScorer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, scorer })
    }

    /// Derives a pipeline for one run, sharing this pipeline's scorer.
    pub fn with_overrides(&self, overrides: &MatchOverrides) -> Result<Self, ConfigError> {
        Ok(Self {
            config: self.config.with_overrides(overrides)?,
            scorer: Arc::clone(&self.scorer),
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn scorer(&self) -> &dyn SimilarityScorer {
        self.scorer.as_ref()
    }

    /// Runs the full chain for one job. Never fails: malformed text degrades to
    /// empty responsibilities or empty match lists.
    pub fn run(&self, profile: &Profile, job: &JobDescription) -> MatchOutcome {
        let responsibilities = extract_responsibilities(job, self.config.min_responsibility_tokens);
        if responsibilities.is_empty() {
            warn!(job = %job.title, "No responsibilities extracted from job description");
        }
        if profile.is_empty() {
            warn!(profile = %profile.name, "Profile has no skill or experience entries");
        }

        let matrix = build_matrix(
            &responsibilities,
            profile,
            self.scorer(),
            self.config.threshold,
            self.config.top_k,
        );
        let selected_entry_ids = select_content(&matrix, profile, self.config.max_items);
        let selection = rank_content(&matrix, profile, self.config.max_items);
        let report = build_report(job, &responsibilities, &matrix, profile, self.scorer.name());

        info!(
            job = %job.title,
            responsibilities = responsibilities.len(),
            gaps = matrix.gaps().len(),
            coverage = report.coverage,
            overall_score = report.overall_score,
            selected = selected_entry_ids.len(),
            "Match run complete"
        );

        MatchOutcome {
            selected_entry_ids,
            responsibilities,
            matrix,
            selection,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::fixtures::{profile, software_profile};

    fn job(raw_text: &str) -> JobDescription {
        JobDescription {
            title: "Staff Engineer".to_string(),
            organization: "Acme".to_string(),
            raw_text: raw_text.to_string(),
        }
    }

    #[test]
    fn test_default_config_values() {
        let config = MatchConfig::default();
        assert_eq!(config.threshold, 0.6);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.max_items, 8);
        assert_eq!(config.min_responsibility_tokens, 3);
        assert!(config.stop_words.iter().any(|w| w == "the"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_above_one_rejected_at_construction() {
        let config = MatchConfig {
            threshold: 1.1,
            ..MatchConfig::default()
        };
        let err = MatchPipeline::new(config).unwrap_err();
        assert_eq!(err, ConfigError::ThresholdOutOfRange(1.1));
    }

    #[test]
    fn test_negative_and_nan_thresholds_rejected() {
        for threshold in [-0.1, f64::NAN, f64::INFINITY] {
            let config = MatchConfig {
                threshold,
                ..MatchConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ThresholdOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_boundary_thresholds_accepted() {
        for threshold in [0.0, 1.0] {
            let config = MatchConfig {
                threshold,
                ..MatchConfig::default()
            };
            assert!(MatchPipeline::new(config).is_ok());
        }
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config = MatchConfig {
            top_k: 0,
            ..MatchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CountOutOfRange {
                field: "top_k",
                value: 0,
                minimum: 1
            })
        );
    }

    #[test]
    fn test_huge_counts_accepted() {
        let config = MatchConfig {
            top_k: usize::MAX,
            max_items: usize::MAX,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_override_rejected() {
        let overrides = MatchOverrides {
            max_items: Some(-2),
            ..MatchOverrides::default()
        };
        let err = MatchConfig::default().with_overrides(&overrides).unwrap_err();
        assert!(err.to_string().contains("max_items must be at least 1, got -2"));
    }

    #[test]
    fn test_overrides_applied_and_validated() {
        let overrides = MatchOverrides {
            threshold: Some(0.75),
            top_k: Some(5),
            max_items: None,
            min_responsibility_tokens: Some(0),
        };
        let config = MatchConfig::default().with_overrides(&overrides).unwrap();
        assert_eq!(config.threshold, 0.75);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.max_items, 8);
        assert_eq!(config.min_responsibility_tokens, 0);

        let bad = MatchOverrides {
            threshold: Some(1.5),
            ..MatchOverrides::default()
        };
        assert!(MatchConfig::default().with_overrides(&bad).is_err());
    }

    #[test]
    fn test_pipeline_overrides_keep_base_untouched() {
        let base = MatchPipeline::new(MatchConfig::default()).unwrap();
        let overrides = MatchOverrides {
            top_k: Some(1),
            ..MatchOverrides::default()
        };
        let derived = base.with_overrides(&overrides).unwrap();
        assert_eq!(derived.config().top_k, 1);
        assert_eq!(base.config().top_k, 3);
        assert_eq!(derived.scorer().name(), "fuzzy");
    }

    #[test]
    fn test_run_produces_consistent_outcome() {
        let pipeline = MatchPipeline::new(MatchConfig::default()).unwrap();
        let outcome = pipeline.run(
            &software_profile(),
            &job("- Manage cross-functional engineering teams\n- Perform neurosurgery\n- Design REST APIs"),
        );

        assert_eq!(outcome.responsibilities.len(), 3);
        assert_eq!(outcome.matrix.len(), 3);
        assert_eq!(outcome.matrix.gaps(), vec![1]);
        assert_eq!(outcome.selected_entry_ids, outcome.selection.entry_ids());
        assert!(outcome.selected_entry_ids.contains(&"s-lead".to_string()));
        assert!(outcome.selected_entry_ids.len() <= 8);
        assert_eq!(outcome.report.rows.len(), 3);
    }

    #[test]
    fn test_empty_profile_run_selects_nothing() {
        let pipeline = MatchPipeline::new(MatchConfig::default()).unwrap();
        let outcome = pipeline.run(&profile(vec![], vec![]), &job("- Build APIs\n- Write tests\n"));

        assert_eq!(outcome.matrix.len(), 2);
        assert!(outcome.matrix.iter().all(|(_, m)| m.is_empty()));
        assert!(outcome.selected_entry_ids.is_empty());
    }

    #[test]
    fn test_empty_job_text_is_not_an_error() {
        let pipeline = MatchPipeline::new(MatchConfig::default()).unwrap();
        let outcome = pipeline.run(&software_profile(), &job(""));
        assert!(outcome.responsibilities.is_empty());
        assert!(outcome.matrix.is_empty());
        assert!(outcome.selected_entry_ids.is_empty());
    }

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = MatchPipeline::new(MatchConfig::default()).unwrap();
        let profile = software_profile();
        let job = job("Own REST API design. Lead code reviews for the platform team.");
        assert_eq!(pipeline.run(&profile, &job), pipeline.run(&profile, &job));
    }

    #[test]
    fn test_custom_stop_words_reach_the_scorer() {
        let config = MatchConfig {
            stop_words: vec!["rust".to_string()],
            ..MatchConfig::default()
        };
        let pipeline = MatchPipeline::new(config).unwrap();
        assert_eq!(pipeline.scorer().score("Rust", "Rust"), 0.0);
    }
}
