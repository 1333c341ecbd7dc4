//! The concept-to-pattern matching engine.
//!
//! For every concept in the store, the matcher decides which patterns it
//! instantiates and why, applying three strategies in priority order:
//!
//! 1. **Exact name**: the concept's leaf identifier equals the pattern's
//!    primary name (score 1.0), via the catalog's precomputed index.
//! 2. **Alias name**: the leaf identifier equals one of the pattern's
//!    aliases (score 0.95), unless that pattern already matched exactly.
//! 3. **Semantic**: cosine similarity between the embeddings of the
//!    concept's summary and the pattern's intent text meets the configured
//!    threshold (score = similarity). Only evaluated for pairs with no name
//!    match and a non-empty summary.
//!
//! Each (concept, pattern) pair is recorded at most once with its best
//! match type. A failed embedding suppresses the semantic test for that
//! text only; it never aborts the run.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::concepts::{Concept, ConceptStore};
use crate::core::config::{MatcherConfig, ALIAS_MATCH_SCORE};
use crate::core::errors::{PatlasError, Result};
use crate::core::patterns::{PatternCatalog, PatternId};
use crate::embedding::provider::{cosine_similarity, EmbeddingProvider};
use crate::matching::matchset::{Match, MatchSet, MatchType};

/// Per-run counters for skipped work, reported in the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchDiagnostics {
    /// Distinct texts the embedding provider failed on
    pub embedding_failures: usize,
    /// Concepts whose semantic test was skipped because their summary
    /// failed to embed
    pub concepts_skipped_semantic: usize,
    /// Concepts excluded from semantic matching for having an empty summary
    pub concepts_without_summary: usize,
    /// Patterns excluded from semantic matching (empty or unembeddable
    /// intent text)
    pub patterns_skipped_semantic: usize,
}

/// Cached embedding outcome for one exact text.
enum CachedEmbedding {
    Vector(Vec<f32>),
    Failed,
}

/// Per-run embedding cache keyed on exact text content.
///
/// Each text is sent to the provider at most once per run; failures are
/// cached too so a flaky text is logged exactly once.
struct EmbedCache<'a> {
    embedder: &'a dyn EmbeddingProvider,
    entries: HashMap<String, CachedEmbedding>,
    failures: usize,
}

impl<'a> EmbedCache<'a> {
    fn new(embedder: &'a dyn EmbeddingProvider) -> Self {
        Self {
            embedder,
            entries: HashMap::new(),
            failures: 0,
        }
    }

    /// Embedding for `text`, or `None` if the provider failed on it.
    fn get(&mut self, text: &str) -> Option<&[f32]> {
        if !self.entries.contains_key(text) {
            let outcome = match self.embedder.embed(text) {
                Ok(vector) => CachedEmbedding::Vector(vector),
                Err(error) => {
                    warn!(
                        %error,
                        text = %text.chars().take(60).collect::<String>(),
                        "embedding failed; semantic matching skipped for this text"
                    );
                    self.failures += 1;
                    CachedEmbedding::Failed
                }
            };
            self.entries.insert(text.to_string(), outcome);
        }

        match self.entries.get(text) {
            Some(CachedEmbedding::Vector(vector)) => Some(vector),
            _ => None,
        }
    }
}

/// The matching engine. Holds configuration and per-run diagnostics.
#[derive(Debug)]
pub struct Matcher {
    config: MatcherConfig,
    diagnostics: MatchDiagnostics,
}

impl Matcher {
    /// Create a matcher with the given configuration.
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            config,
            diagnostics: MatchDiagnostics::default(),
        }
    }

    /// Diagnostics from the most recent [`Matcher::match_all`] run.
    pub fn diagnostics(&self) -> &MatchDiagnostics {
        &self.diagnostics
    }

    /// Match every concept against every pattern.
    ///
    /// Returns an empty set for an empty store; an empty catalog is a
    /// configuration error. For identical inputs, config, and embedder
    /// output, two invocations yield identical match sets.
    pub fn match_all(
        &mut self,
        store: &ConceptStore,
        catalog: &PatternCatalog,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<MatchSet> {
        self.config.validate()?;
        if catalog.is_empty() {
            return Err(PatlasError::config("pattern catalog is empty"));
        }

        self.diagnostics = MatchDiagnostics::default();
        let mut matches = MatchSet::new();
        if store.is_empty() {
            return Ok(matches);
        }

        let mut cache = EmbedCache::new(embedder);

        // Embed every non-empty pattern intent up front; a pattern whose
        // intent cannot be embedded is excluded from semantic matching for
        // the whole run.
        let mut intent_ok = vec![false; catalog.len()];
        for (id, pattern) in catalog.iter() {
            if pattern.intent.trim().is_empty() {
                self.diagnostics.patterns_skipped_semantic += 1;
                continue;
            }
            if cache.get(&pattern.intent).is_some() {
                intent_ok[id] = true;
            } else {
                self.diagnostics.patterns_skipped_semantic += 1;
            }
        }

        for (concept_id, concept) in store.iter() {
            let mut candidates: Vec<Match> = Vec::new();
            let mut matched_patterns: Vec<PatternId> = Vec::new();
            let leaf = concept.leaf_name();

            // 1. Exact primary-name match
            if let Some(pattern_id) =
                catalog.find_by_name(leaf, self.config.name_match_case_insensitive)
            {
                candidates.push(Match {
                    concept: concept_id,
                    pattern: pattern_id,
                    match_type: MatchType::ExactName,
                    score: 1.0,
                });
                matched_patterns.push(pattern_id);
            }

            // 2. Alias match. Aliases are case-insensitive by definition;
            // exact name takes priority for the same pattern.
            for &pattern_id in catalog.find_by_alias(leaf) {
                if matched_patterns.contains(&pattern_id) {
                    continue;
                }
                candidates.push(Match {
                    concept: concept_id,
                    pattern: pattern_id,
                    match_type: MatchType::AliasName,
                    score: ALIAS_MATCH_SCORE,
                });
                matched_patterns.push(pattern_id);
            }

            // 3. Semantic match for the remaining patterns
            self.semantic_matches(
                concept_id,
                concept,
                catalog,
                &intent_ok,
                &matched_patterns,
                &mut cache,
                &mut candidates,
            );

            // Descending score, ties by ascending pattern name
            candidates.sort_by(|a, b| {
                b.score.total_cmp(&a.score).then_with(|| {
                    catalog.patterns()[a.pattern]
                        .name
                        .cmp(&catalog.patterns()[b.pattern].name)
                })
            });
            if let Some(cap) = self.config.max_matches_per_concept {
                candidates.truncate(cap);
            }

            debug!(
                concept = %concept.name,
                matches = candidates.len(),
                "concept processed"
            );
            matches.extend_for_concept(candidates);
        }

        self.diagnostics.embedding_failures = cache.failures;
        Ok(matches)
    }

    #[allow(clippy::too_many_arguments)]
    fn semantic_matches(
        &mut self,
        concept_id: usize,
        concept: &Concept,
        catalog: &PatternCatalog,
        intent_ok: &[bool],
        matched_patterns: &[PatternId],
        cache: &mut EmbedCache<'_>,
        candidates: &mut Vec<Match>,
    ) {
        if concept.summary.trim().is_empty() {
            self.diagnostics.concepts_without_summary += 1;
            return;
        }

        let summary_embedding = match cache.get(&concept.summary) {
            Some(vector) => vector.to_vec(),
            None => {
                self.diagnostics.concepts_skipped_semantic += 1;
                return;
            }
        };

        for (pattern_id, pattern) in catalog.iter() {
            if matched_patterns.contains(&pattern_id) || !intent_ok[pattern_id] {
                continue;
            }
            // Intent embeddings are known-good here; a cache miss would be a
            // logic error, not a provider failure.
            let Some(intent_embedding) = cache.get(&pattern.intent) else {
                continue;
            };
            let Some(similarity) = cosine_similarity(&summary_embedding, intent_embedding)
            else {
                continue;
            };
            if similarity >= self.config.semantic_threshold {
                candidates.push(Match {
                    concept: concept_id,
                    pattern: pattern_id,
                    match_type: MatchType::Semantic,
                    score: similarity.clamp(0.0, 1.0),
                });
            }
        }
    }
}
