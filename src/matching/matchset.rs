//! Match records and the write-once match collection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::concepts::ConceptId;
use crate::core::patterns::PatternId;

/// How a concept was matched to a pattern, in descending priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Concept leaf name equals the pattern's primary name (score 1.0)
    ExactName,
    /// Concept leaf name equals one of the pattern's aliases (score 0.95)
    AliasName,
    /// Cosine similarity of summary and intent embeddings met the threshold
    Semantic,
}

impl MatchType {
    /// Label used in CSV and report output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactName => "exact_name",
            Self::AliasName => "alias_name",
            Self::Semantic => "semantic",
        }
    }

    /// All match types in priority order.
    pub fn all() -> [MatchType; 3] {
        [Self::ExactName, Self::AliasName, Self::Semantic]
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One assertion that a concept instantiates a pattern.
///
/// Ids index into the run's `ConceptStore` and `PatternCatalog`. At most one
/// `Match` exists per (concept, pattern) pair; when several strategies would
/// qualify, the highest-priority one is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Matched concept
    pub concept: ConceptId,
    /// Matched pattern
    pub pattern: PatternId,
    /// Strategy that produced the match
    pub match_type: MatchType,
    /// Confidence in [0, 1]: 1.0 exact, 0.95 alias, cosine similarity for
    /// semantic matches
    pub score: f64,
}

/// Ordered, write-once collection of matches for one run.
///
/// Insertion order follows concept processing order; within one concept,
/// matches are ordered by descending score, ties broken by ascending pattern
/// name. The matcher enforces that ordering before appending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSet {
    matches: Vec<Match>,
}

impl MatchSet {
    /// Create an empty match set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether the set holds no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Append one concept's matches, already ordered by the matcher.
    pub(crate) fn extend_for_concept(&mut self, matches: impl IntoIterator<Item = Match>) {
        self.matches.extend(matches);
    }

    /// Iterate matches in set order.
    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    /// All matches in set order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}
