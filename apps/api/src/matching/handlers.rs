//! Axum route handlers for the Matching API.

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::jd_parser::responsibilities_from_text;
use crate::matching::pipeline::{MatchOutcome, MatchOverrides};
use crate::models::job::{JobDescription, Responsibility};
use crate::models::profile::Profile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResponsibilitiesRequest {
    pub raw_text: String,
    #[serde(default)]
    pub min_responsibility_tokens: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ResponsibilitiesResponse {
    pub responsibilities: Vec<Responsibility>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub profile: Profile,
    pub job: JobDescription,
    #[serde(default)]
    pub overrides: MatchOverrides,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub run_id: Uuid,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Deserialize)]
pub struct BatchMatchRequest {
    pub profile: Profile,
    pub jobs: Vec<JobDescription>,
    #[serde(default)]
    pub overrides: MatchOverrides,
}

#[derive(Debug, Serialize)]
pub struct BatchMatchResponse {
    pub run_id: Uuid,
    pub outcomes: Vec<MatchOutcome>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/responsibilities
///
/// Previews responsibility extraction for a raw job description.
pub async fn handle_split_responsibilities(
    State(state): State<AppState>,
    Json(request): Json<ResponsibilitiesRequest>,
) -> Result<Json<ResponsibilitiesResponse>, AppError> {
    let overrides = MatchOverrides {
        min_responsibility_tokens: request.min_responsibility_tokens,
        ..MatchOverrides::default()
    };
    let pipeline = state.pipeline.with_overrides(&overrides)?;

    let responsibilities =
        responsibilities_from_text(&request.raw_text, pipeline.config().min_responsibility_tokens);

    Ok(Json(ResponsibilitiesResponse { responsibilities }))
}

/// POST /api/v1/match
///
/// Runs the full pipeline for one job: responsibilities → matrix → selection → report.
/// Scoring runs on the blocking pool.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    request.profile.validate()?;
    let pipeline = state.pipeline.with_overrides(&request.overrides)?;

    let run_id = Uuid::new_v4();
    let span = info_span!("match_run", %run_id, job = %request.job.title);
    let MatchRequest { profile, job, .. } = request;
    let outcome = tokio::task::spawn_blocking(move || span.in_scope(|| pipeline.run(&profile, &job)))
        .await
        .context("match task failed")?;

    Ok(Json(MatchResponse { run_id, outcome }))
}

/// POST /api/v1/match/batch
///
/// Matches one profile against many jobs. Each job runs as its own blocking
/// task over a shared read-only profile; outcomes come back in request order.
pub async fn handle_match_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchMatchRequest>,
) -> Result<Json<BatchMatchResponse>, AppError> {
    if request.jobs.is_empty() {
        return Err(AppError::Validation("jobs cannot be empty".to_string()));
    }
    request.profile.validate()?;

    let pipeline = Arc::new(state.pipeline.with_overrides(&request.overrides)?);
    let profile = Arc::new(request.profile);

    let run_id = Uuid::new_v4();
    let job_count = request.jobs.len();
    let span = info_span!("match_batch", %run_id, jobs = job_count);

    let handles: Vec<_> = request
        .jobs
        .into_iter()
        .map(|job| {
            let pipeline = Arc::clone(&pipeline);
            let profile = Arc::clone(&profile);
            let span = span.clone();
            tokio::task::spawn_blocking(move || span.in_scope(|| pipeline.run(&profile, &job)))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(job_count);
    for handle in handles {
        outcomes.push(handle.await.context("match task failed")?);
    }

    span.in_scope(|| info!(jobs = job_count, "Batch match complete"));

    Ok(Json(BatchMatchResponse { run_id, outcomes }))
}
