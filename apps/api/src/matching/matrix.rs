//! Matcher — scores every responsibility against every profile entry and keeps
//! the top-K candidates at or above the threshold.
//!
//! Pure function of its inputs. Profiles are small, so the full cross product is
//! scored without any index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::similarity::SimilarityScorer;
use crate::models::job::Responsibility;
use crate::models::profile::{EntryId, EntryKind, Profile};

/// One scored (responsibility, profile entry) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchCandidate {
    pub responsibility_index: usize,
    pub profile_entry_id: EntryId,
    pub score: f64, // 0.0 – 1.0
    pub entry_kind: EntryKind,
}

/// Responsibility index → ranked matches.
///
/// Every responsibility passed to `build_matrix` has a key, even when its list
/// is empty (a coverage gap). Lists are sorted by non-increasing score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CompatibilityMatrix {
    rows: BTreeMap<usize, Vec<MatchCandidate>>,
}

impl CompatibilityMatrix {
    pub fn get(&self, responsibility_index: usize) -> Option<&[MatchCandidate]> {
        self.rows.get(&responsibility_index).map(Vec::as_slice)
    }

    /// Number of responsibilities (keys), including gaps.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in responsibility order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[MatchCandidate])> {
        self.rows.iter().map(|(index, matches)| (*index, matches.as_slice()))
    }

    pub fn candidates(&self) -> impl Iterator<Item = &MatchCandidate> {
        self.rows.values().flatten()
    }

    /// Responsibilities with no match above threshold.
    pub fn gaps(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, matches)| matches.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    /// Fraction of responsibilities with at least one match. 0.0 when there are none.
    pub fn coverage(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let covered = self.len() - self.gaps().len();
        covered as f64 / self.len() as f64
    }
}

/// Builds the compatibility matrix.
///
/// Algorithm, per responsibility:
/// 1. Score against every skill and experience entry (declaration order)
/// 2. Stable sort by descending score; ties keep declaration order
/// 3. Keep candidates with score ≥ threshold
/// 4. Truncate to top_k
pub fn build_matrix(
    responsibilities: &[Responsibility],
    profile: &Profile,
    scorer: &dyn SimilarityScorer,
    threshold: f64,
    top_k: usize,
) -> CompatibilityMatrix {
    let mut rows = BTreeMap::new();

    for responsibility in responsibilities {
        let mut candidates: Vec<MatchCandidate> = profile
            .entries()
            .map(|entry| MatchCandidate {
                responsibility_index: responsibility.index,
                profile_entry_id: entry.id.to_string(),
                score: scorer.score(&responsibility.text, entry.text),
                entry_kind: entry.kind,
            })
            .collect();

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.retain(|c| c.score >= threshold);
        candidates.truncate(top_k);

        if candidates.is_empty() {
            debug!(
                responsibility = responsibility.index,
                text = %responsibility.text,
                "No profile entry above threshold"
            );
        }

        rows.insert(responsibility.index, candidates);
    }

    CompatibilityMatrix { rows }
}
