//! Coverage Report — turns a compatibility matrix into the rows the document
//! stage renders (responsibility → demonstrated evidence) plus a fit summary.

use serde::{Deserialize, Serialize};

use crate::matching::matrix::CompatibilityMatrix;
use crate::models::job::{JobDescription, Responsibility};
use crate::models::profile::{EntryId, EntryKind, Profile};

/// A profile entry cited as evidence for one responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evidence {
    pub entry_id: EntryId,
    pub entry_kind: EntryKind,
    pub text: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub responsibility_index: usize,
    pub responsibility: String,
    pub demonstrated: Vec<Evidence>, // empty = coverage gap
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageReport {
    pub job_title: String,
    pub organization: String,
    pub rows: Vec<ReportRow>,
    pub coverage: f64,      // 0.0 – 1.0
    pub overall_score: u32, // 0 – 100
    pub gaps: Vec<String>,
    pub recommendation: String,
    pub scorer_backend: String,
}

/// Builds the report for one job. Rows follow responsibility order.
///
/// overall_score = mean over responsibilities of the best match score
/// (0 for a gap), scaled to 0–100.
pub fn build_report(
    job: &JobDescription,
    responsibilities: &[Responsibility],
    matrix: &CompatibilityMatrix,
    profile: &Profile,
    scorer_backend: &str,
) -> CoverageReport {
    let mut rows = Vec::with_capacity(responsibilities.len());
    let mut gaps = Vec::new();
    let mut best_score_sum = 0.0_f64;

    for responsibility in responsibilities {
        let matches = matrix.get(responsibility.index).unwrap_or_default();

        let demonstrated: Vec<Evidence> = matches
            .iter()
            .filter_map(|candidate| {
                let entry = profile.find_entry(&candidate.profile_entry_id)?;
                Some(Evidence {
                    entry_id: candidate.profile_entry_id.clone(),
                    entry_kind: candidate.entry_kind,
                    text: entry.text.to_string(),
                    score: candidate.score,
                })
            })
            .collect();

        if demonstrated.is_empty() {
            gaps.push(responsibility.text.clone());
        }
        best_score_sum += demonstrated.first().map_or(0.0, |e| e.score);

        rows.push(ReportRow {
            responsibility_index: responsibility.index,
            responsibility: responsibility.text.clone(),
            demonstrated,
        });
    }

    let overall_score = if responsibilities.is_empty() {
        0
    } else {
        ((best_score_sum / responsibilities.len() as f64) * 100.0)
            .round()
            .clamp(0.0, 100.0) as u32
    };

    let recommendation = build_recommendation(overall_score, &gaps, responsibilities.len());

    CoverageReport {
        job_title: job.title.clone(),
        organization: job.organization.clone(),
        rows,
        coverage: matrix.coverage(),
        overall_score,
        gaps,
        recommendation,
        scorer_backend: scorer_backend.to_string(),
    }
}

/// Builds a human-readable recommendation string from score and gaps.
fn build_recommendation(score: u32, gaps: &[String], responsibility_count: usize) -> String {
    if responsibility_count == 0 {
        return "No responsibilities found in the job description. Nothing to match.".to_string();
    }

    let top_gaps: Vec<&str> = gaps.iter().take(3).map(String::as_str).collect();

    if score >= 80 {
        "Strong fit. Your profile directly covers the key responsibilities.".to_string()
    } else if score >= 60 {
        if top_gaps.is_empty() {
            format!("Moderate fit ({score}/100). Strengthen the wording of your closest entries.")
        } else {
            format!(
                "Moderate fit ({score}/100). Consider adding evidence for: {}.",
                top_gaps.join("; ")
            )
        }
    } else if top_gaps.is_empty() {
        format!("Low fit ({score}/100). Matches are weak across all responsibilities.")
    } else {
        format!(
            "Low fit ({score}/100). Uncovered responsibilities: {}. Consider whether to tailor your profile or apply.",
            top_gaps.join("; ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::matrix::build_matrix;
    use crate::matching::similarity::FuzzyScorer;
    use crate::models::profile::fixtures::software_profile;

    fn job() -> JobDescription {
        JobDescription {
            title: "Engineering Manager".to_string(),
            organization: "Acme".to_string(),
            raw_text: String::new(),
        }
    }

    fn responsibilities(texts: &[&str]) -> Vec<Responsibility> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Responsibility {
                index,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_rows_follow_responsibility_order_with_evidence_text() {
        let resp = responsibilities(&["Manage cross-functional engineering teams", "Perform neurosurgery"]);
        let profile = software_profile();
        let matrix = build_matrix(&resp, &profile, &FuzzyScorer::default(), 0.6, 3);
        let report = build_report(&job(), &resp, &matrix, &profile, "fuzzy");

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].responsibility_index, 0);
        assert!(report.rows[0]
            .demonstrated
            .iter()
            .any(|e| e.text == "Team leadership, cross-functional coordination"));
        assert!(report.rows[1].demonstrated.is_empty());
        assert_eq!(report.gaps, vec!["Perform neurosurgery".to_string()]);
        assert!((report.coverage - 0.5).abs() < f64::EPSILON);
        assert_eq!(report.scorer_backend, "fuzzy");
        assert_eq!(report.job_title, "Engineering Manager");
    }

    #[test]
    fn test_overall_score_bounded_0_to_100() {
        let resp = responsibilities(&["Rust systems programming", "REST API design"]);
        let profile = software_profile();
        let matrix = build_matrix(&resp, &profile, &FuzzyScorer::default(), 0.6, 3);
        let report = build_report(&job(), &resp, &matrix, &profile, "fuzzy");
        // both responsibilities are verbatim skills
        assert_eq!(report.overall_score, 100);
        assert!(report.recommendation.contains("Strong fit"));
    }

    #[test]
    fn test_no_responsibilities_reports_zero() {
        let profile = software_profile();
        let report = build_report(&job(), &[], &CompatibilityMatrix::default(), &profile, "fuzzy");
        assert_eq!(report.overall_score, 0);
        assert_eq!(report.coverage, 0.0);
        assert!(report.rows.is_empty());
        assert!(report.recommendation.contains("No responsibilities"));
    }

    #[test]
    fn test_recommendation_high_score() {
        let rec = build_recommendation(85, &[], 4);
        assert!(rec.contains("Strong fit"));
    }

    #[test]
    fn test_recommendation_moderate_score_lists_gaps() {
        let gaps = vec!["Operate Kafka clusters".to_string()];
        let rec = build_recommendation(65, &gaps, 4);
        assert!(rec.contains("Operate Kafka clusters"));
        assert!(rec.contains("65"));
    }

    #[test]
    fn test_recommendation_low_score_lists_at_most_three_gaps() {
        let gaps: Vec<String> = ["a1", "a2", "a3", "a4"].iter().map(|s| s.to_string()).collect();
        let rec = build_recommendation(30, &gaps, 4);
        assert!(rec.contains("30"));
        assert!(rec.contains("a3"));
        assert!(!rec.contains("a4"));
    }
}
