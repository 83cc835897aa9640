use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque profile entry identifier, unique within one profile.
pub type EntryId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Skill,
    Experience,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Skill => "skill",
            EntryKind::Experience => "experience",
        }
    }
}

/// Contact fields are carried through untouched for the document stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillEntry {
    pub id: EntryId,
    pub text: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    /// `None` for a current position.
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperienceEntry {
    pub id: EntryId,
    pub text: String,
    pub role: String,
    pub organization: String,
    pub dates: DateRange,
}

/// Borrowed view over either entry kind, in profile declaration order.
#[derive(Debug, Clone, Copy)]
pub struct EntryRef<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub kind: EntryKind,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("entry id must not be empty ({kind} entry at position {position})")]
    EmptyId { kind: &'static str, position: usize },

    #[error("duplicate entry id '{0}'")]
    DuplicateId(EntryId),

    #[error("experience entry '{id}' ends ({end}) before it starts ({start})")]
    InvalidDateRange {
        id: EntryId,
        start: NaiveDate,
        end: NaiveDate,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
}

impl Profile {
    /// Checks the invariants the matcher relies on: non-empty, unique entry ids
    /// and well-ordered date ranges.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for (position, entry) in self.entries().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(ProfileError::EmptyId {
                    kind: entry.kind.as_str(),
                    position,
                });
            }
            if !seen.insert(entry.id) {
                return Err(ProfileError::DuplicateId(entry.id.to_string()));
            }
        }

        for exp in &self.experience {
            if let Some(end) = exp.dates.end {
                if end < exp.dates.start {
                    return Err(ProfileError::InvalidDateRange {
                        id: exp.id.clone(),
                        start: exp.dates.start,
                        end,
                    });
                }
            }
        }

        Ok(())
    }

    /// All entries in declaration order: skills first, then experience.
    pub fn entries(&self) -> impl Iterator<Item = EntryRef<'_>> {
        let skills = self.skills.iter().map(|s| EntryRef {
            id: &s.id,
            text: &s.text,
            kind: EntryKind::Skill,
        });
        let experience = self.experience.iter().map(|e| EntryRef {
            id: &e.id,
            text: &e.text,
            kind: EntryKind::Experience,
        });
        skills.chain(experience)
    }

    pub fn entry_count(&self) -> usize {
        self.skills.len() + self.experience.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    pub fn find_entry(&self, id: &str) -> Option<EntryRef<'_>> {
        self.entries().find(|e| e.id == id)
    }

    /// Position of an entry in declaration order.
    pub fn declaration_index(&self, id: &str) -> Option<usize> {
        self.entries().position(|e| e.id == id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn skill(id: &str, text: &str) -> SkillEntry {
        SkillEntry {
            id: id.to_string(),
            text: text.to_string(),
            category: "general".to_string(),
        }
    }

    pub fn experience(id: &str, text: &str) -> ExperienceEntry {
        ExperienceEntry {
            id: id.to_string(),
            text: text.to_string(),
            role: "Engineer".to_string(),
            organization: "Acme".to_string(),
            dates: DateRange {
                start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                end: None,
            },
        }
    }

    pub fn profile(skills: Vec<SkillEntry>, experience: Vec<ExperienceEntry>) -> Profile {
        Profile {
            name: "Jordan Example".to_string(),
            contact: Contact::default(),
            summary: None,
            skills,
            experience,
        }
    }

    /// A software engineering profile used across matcher tests.
    pub fn software_profile() -> Profile {
        profile(
            vec![
                skill("s-rust", "Rust systems programming"),
                skill("s-lead", "Team leadership, cross-functional coordination"),
                skill("s-api", "REST API design"),
                skill("s-test", "Automated testing and CI pipelines"),
            ],
            vec![
                experience(
                    "e-platform",
                    "Built distributed backend services handling 10k requests per second",
                ),
                experience(
                    "e-mentor",
                    "Mentored 5 junior engineers and ran weekly code reviews",
                ),
            ],
        )
    }
}
