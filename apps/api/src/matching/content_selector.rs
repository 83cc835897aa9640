//! Content Selector — ranks matched profile entries for the tailored résumé.
//!
//! Consumes the compatibility matrix only; no rescoring happens here.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::matching::matrix::CompatibilityMatrix;
use crate::models::profile::{EntryId, EntryKind, Profile};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A profile entry chosen for this job, with the evidence behind its rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedEntry {
    pub entry_id: EntryId,
    pub entry_kind: EntryKind,
    pub best_score: f64,
    /// Responsibility indices this entry matched, ascending.
    pub matched_responsibilities: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SelectionResult {
    pub selected: Vec<SelectedEntry>,
    pub excluded: Vec<(EntryId, String)>, // (entry_id, reason)
}

impl SelectionResult {
    pub fn entry_ids(&self) -> Vec<EntryId> {
        self.selected.iter().map(|e| e.entry_id.clone()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selection algorithm
// ────────────────────────────────────────────────────────────────────────────

struct Aggregate {
    kind: EntryKind,
    declaration_index: usize,
    best_score: f64,
    matched: Vec<usize>,
}

/// Ranks every matched entry and splits them into selected and excluded.
///
/// Algorithm:
/// 1. Aggregate matrix candidates per entry id (best score, responsibilities matched)
/// 2. Drop ids that are not declared in the profile
/// 3. Sort by best score desc, then match count desc, then declaration order
/// 4. Keep the first `max_items`; the rest are excluded with a reason
pub fn rank_content(
    matrix: &CompatibilityMatrix,
    profile: &Profile,
    max_items: usize,
) -> SelectionResult {
    let mut aggregates: HashMap<&str, Aggregate> = HashMap::new();

    for candidate in matrix.candidates() {
        let id = candidate.profile_entry_id.as_str();
        let Some(declaration_index) = profile.declaration_index(id) else {
            continue;
        };

        let aggregate = aggregates.entry(id).or_insert_with(|| Aggregate {
            kind: candidate.entry_kind,
            declaration_index,
            best_score: candidate.score,
            matched: Vec::new(),
        });
        aggregate.best_score = aggregate.best_score.max(candidate.score);
        if !aggregate.matched.contains(&candidate.responsibility_index) {
            aggregate.matched.push(candidate.responsibility_index);
        }
    }

    let mut ranked: Vec<(&str, Aggregate)> = aggregates.into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| compare_aggregates(a, b));

    let mut result = SelectionResult::default();
    for (position, (id, mut aggregate)) in ranked.into_iter().enumerate() {
        if position < max_items {
            aggregate.matched.sort_unstable();
            result.selected.push(SelectedEntry {
                entry_id: id.to_string(),
                entry_kind: aggregate.kind,
                best_score: aggregate.best_score,
                matched_responsibilities: aggregate.matched,
            });
        } else {
            let reason = format!("Selection limit reached ({max_items} max)");
            result.excluded.push((id.to_string(), reason));
        }
    }

    result
}

/// Ordered ids of the entries to foreground for this job.
pub fn select_content(
    matrix: &CompatibilityMatrix,
    profile: &Profile,
    max_items: usize,
) -> Vec<EntryId> {
    rank_content(matrix, profile, max_items).entry_ids()
}

fn compare_aggregates(a: &Aggregate, b: &Aggregate) -> Ordering {
    b.best_score
        .total_cmp(&a.best_score)
        .then_with(|| b.matched.len().cmp(&a.matched.len()))
        .then_with(|| a.declaration_index.cmp(&b.declaration_index))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
