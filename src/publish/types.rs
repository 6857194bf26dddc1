//! Publish records: what was published, when, and with which templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::config::ConfigHasher;
use crate::synth::CloudAssembly;

/// Current version of the record format.
pub const RECORD_VERSION: &str = "1.0";

/// Number of earlier publications kept in a record.
pub const MAX_HISTORY: usize = 20;

/// The last publication of an assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishRecord {
    /// Record format version.
    pub version: String,
    /// Publication id.
    pub id: Uuid,
    /// Stack base name.
    pub stack: String,
    /// When the assembly was published.
    pub published_at: DateTime<Utc>,
    /// Configuration fingerprint from the manifest.
    pub fingerprint: String,
    /// Published stacks keyed by name.
    pub stacks: BTreeMap<String, PublishedStack>,
    /// Earlier publications, oldest first.
    #[serde(default)]
    pub history: Vec<PublishHistoryEntry>,
}

/// A published stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishedStack {
    /// Template file name.
    pub template_file: String,
    /// SHA-256 of the template JSON.
    pub template_hash: String,
    /// Target region.
    #[serde(default)]
    pub region: Option<String>,
}

/// Summary of an earlier publication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishHistoryEntry {
    /// Publication id.
    pub id: Uuid,
    /// When it was published.
    pub published_at: DateTime<Utc>,
    /// Configuration fingerprint.
    pub fingerprint: String,
    /// Stacks it contained.
    pub stacks: Vec<String>,
}

/// How a stack differs from its last publication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StackChange {
    /// Not published before.
    Added,
    /// Template hash differs.
    Modified,
    /// Published before, absent now.
    Removed,
    /// Template hash matches.
    Unchanged,
}

impl PublishRecord {
    /// Creates a record for a freshly synthesized assembly.
    #[must_use]
    pub fn from_assembly(stack: &str, assembly: &CloudAssembly) -> Self {
        let stacks = assembly
            .manifest
            .stacks
            .iter()
            .map(|(name, entry)| {
                (
                    name.clone(),
                    PublishedStack {
                        template_file: entry.template_file.clone(),
                        template_hash: entry.template_hash.clone(),
                        region: entry.region.clone(),
                    },
                )
            })
            .collect();

        Self {
            version: RECORD_VERSION.to_string(),
            id: Uuid::new_v4(),
            stack: stack.to_string(),
            published_at: Utc::now(),
            fingerprint: assembly.manifest.fingerprint.clone(),
            stacks,
            history: Vec::new(),
        }
    }

    /// Carries over the history of a previous record and appends it.
    pub fn inherit_history(&mut self, previous: PublishRecord) {
        let entry = previous.summary();
        self.history = previous.history;
        if self.history.len() >= MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(entry);
    }

    fn summary(&self) -> PublishHistoryEntry {
        PublishHistoryEntry {
            id: self.id,
            published_at: self.published_at,
            fingerprint: self.fingerprint.clone(),
            stacks: self.stacks.keys().cloned().collect(),
        }
    }

    /// Compares an assembly against this record, stack by stack.
    #[must_use]
    pub fn compare(&self, assembly: &CloudAssembly) -> Vec<(String, StackChange)> {
        let current = &assembly.manifest.stacks;
        let mut changes: Vec<(String, StackChange)> = current
            .iter()
            .map(|(name, entry)| {
                let change = match self.stacks.get(name) {
                    None => StackChange::Added,
                    Some(published)
                        if ConfigHasher::hashes_match(
                            &published.template_hash,
                            &entry.template_hash,
                        ) =>
                    {
                        StackChange::Unchanged
                    }
                    Some(_) => StackChange::Modified,
                };
                (name.clone(), change)
            })
            .collect();

        changes.extend(
            self.stacks
                .keys()
                .filter(|name| !current.contains_key(*name))
                .map(|name| (name.clone(), StackChange::Removed)),
        );
        changes
    }

    /// Stacks whose templates differ from this record.
    #[must_use]
    pub fn changed_stacks(&self, assembly: &CloudAssembly) -> Vec<(String, StackChange)> {
        self.compare(assembly)
            .into_iter()
            .filter(|(_, change)| *change != StackChange::Unchanged)
            .collect()
    }
}

impl fmt::Display for StackChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let change = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Unchanged => "unchanged",
        };
        write!(f, "{change}")
    }
}
