//! Pattern taxonomy: the closed set of known quantum design patterns.
//!
//! The catalog is loaded once from a static taxonomy file and is immutable
//! for the run. Normalized name and alias indexes are precomputed so the
//! matcher's exact-name test is a hash lookup rather than a scan over the
//! whole catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::errors::{PatlasError, Result};

/// Normalize an identifier for name comparison.
pub(crate) fn normalize_name(name: &str, case_insensitive: bool) -> String {
    let trimmed = name.trim();
    if case_insensitive {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

/// One design pattern from the Pattern Atlas taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Primary pattern name, unique within the catalog
    pub name: String,
    /// Alternate names, compared case-insensitively
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Intent text used for semantic matching
    #[serde(default)]
    pub intent: String,
    /// Longer description, carried for reporting only
    #[serde(default)]
    pub description: String,
}

impl Pattern {
    /// Create a new pattern, deduplicating aliases against each other and
    /// against the primary name (case-insensitive).
    pub fn new(
        name: impl Into<String>,
        aliases: Vec<String>,
        intent: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut seen = vec![name.to_lowercase()];
        let aliases = aliases
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| {
                let key = a.to_lowercase();
                if a.is_empty() || seen.contains(&key) {
                    false
                } else {
                    seen.push(key);
                    true
                }
            })
            .collect();

        Self {
            name,
            aliases,
            intent: intent.into(),
            description: description.into(),
        }
    }
}

/// Index of a pattern within a [`PatternCatalog`], stable for one run.
pub type PatternId = usize;

/// Immutable, validated pattern taxonomy with precomputed name indexes.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
    /// normalized primary name -> pattern id
    name_index: HashMap<String, PatternId>,
    /// normalized alias -> pattern ids carrying it, ascending
    alias_index: HashMap<String, Vec<PatternId>>,
}

impl PatternCatalog {
    /// Build a catalog, validating primary-name uniqueness.
    ///
    /// Aliases may collide with another pattern's primary name; the matcher's
    /// exact-over-alias priority resolves those ties per concept.
    pub fn new(patterns: Vec<Pattern>) -> Result<Self> {
        let mut name_index = HashMap::with_capacity(patterns.len());
        let mut alias_index: HashMap<String, Vec<PatternId>> = HashMap::new();

        for (id, pattern) in patterns.iter().enumerate() {
            if pattern.name.trim().is_empty() {
                return Err(PatlasError::config(format!(
                    "pattern at index {id} has an empty name"
                )));
            }
            let key = normalize_name(&pattern.name, true);
            if name_index.insert(key, id).is_some() {
                return Err(PatlasError::config(format!(
                    "duplicate pattern name '{}'",
                    pattern.name
                )));
            }
            for alias in &pattern.aliases {
                alias_index
                    .entry(normalize_name(alias, true))
                    .or_default()
                    .push(id);
            }
        }

        Ok(Self {
            patterns,
            name_index,
            alias_index,
        })
    }

    /// Number of patterns in the catalog.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the catalog holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern by id.
    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    /// Iterate patterns in catalog order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern)> {
        self.patterns.iter().enumerate()
    }

    /// All patterns in catalog order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Look up a pattern whose primary name equals the given identifier.
    ///
    /// The index is built case-insensitively; when `case_insensitive` is
    /// false the candidate is re-checked against the exact primary name.
    pub fn find_by_name(&self, identifier: &str, case_insensitive: bool) -> Option<PatternId> {
        let id = *self.name_index.get(&normalize_name(identifier, true))?;
        if !case_insensitive && self.patterns[id].name.trim() != identifier.trim() {
            return None;
        }
        Some(id)
    }

    /// Look up every pattern carrying the given identifier as an alias.
    /// Aliases are always compared case-insensitively.
    pub fn find_by_alias(&self, identifier: &str) -> &[PatternId] {
        self.alias_index
            .get(&normalize_name(identifier, true))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PatternCatalog {
        PatternCatalog::new(vec![
            Pattern::new(
                "Basis Change",
                vec!["QFT".to_string(), "Fourier Transform".to_string()],
                "transform a register into the Fourier basis",
                "",
            ),
            Pattern::new(
                "Amplitude Amplification",
                vec!["Grover".to_string()],
                "amplify the amplitude of marked states",
                "",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_primary_names_are_rejected() {
        let result = PatternCatalog::new(vec![
            Pattern::new("QFT", vec![], "", ""),
            Pattern::new("qft", vec![], "", ""),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn name_lookup_is_case_insensitive_by_default() {
        let catalog = catalog();
        assert_eq!(catalog.find_by_name("basis change", true), Some(0));
        assert_eq!(catalog.find_by_name("basis change", false), None);
        assert_eq!(catalog.find_by_name("Basis Change", false), Some(0));
    }

    #[test]
    fn alias_lookup_finds_all_owners() {
        let catalog = catalog();
        assert_eq!(catalog.find_by_alias("qft"), &[0]);
        assert_eq!(catalog.find_by_alias("Grover"), &[1]);
        assert!(catalog.find_by_alias("unknown").is_empty());
    }

    #[test]
    fn aliases_deduplicate_against_primary_name() {
        let pattern = Pattern::new(
            "QFT",
            vec!["qft".to_string(), "QFT".to_string(), "Fourier".to_string()],
            "",
            "",
        );
        assert_eq!(pattern.aliases, vec!["Fourier".to_string()]);
    }

    #[test]
    fn alias_colliding_with_primary_name_is_kept() {
        // "Grover" is both pattern 1's primary name and pattern 0's alias;
        // the matcher resolves the tie via exact-over-alias priority.
        let catalog = PatternCatalog::new(vec![
            Pattern::new("Oracle", vec!["Grover".to_string()], "", ""),
            Pattern::new("Grover", vec![], "", ""),
        ])
        .unwrap();
        assert_eq!(catalog.find_by_name("Grover", true), Some(1));
        assert_eq!(catalog.find_by_alias("Grover"), &[0]);
    }
}
