//! Concept data model: extracted API entities from the source frameworks.
//!
//! A concept is one function or class lifted from a framework's public API
//! together with a short docstring-derived summary. Concepts are immutable
//! for the duration of a run; the store is built once from raw records and
//! never mutated afterwards.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::errors::{PatlasError, Result};

/// The three quantum SDKs whose API surfaces are mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Classiq SDK
    Classiq,
    /// PennyLane SDK
    PennyLane,
    /// Qiskit SDK
    Qiskit,
}

impl Framework {
    /// Canonical lowercase name, also used as the project identifier for
    /// concepts defined by the framework itself.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classiq => "classiq",
            Self::PennyLane => "pennylane",
            Self::Qiskit => "qiskit",
        }
    }

    /// All frameworks, in canonical (alphabetical) order.
    pub fn all() -> [Framework; 3] {
        [Self::Classiq, Self::PennyLane, Self::Qiskit]
    }

    /// Whether `project` names one of the source frameworks rather than an
    /// external target project.
    pub fn is_source_project(project: &str) -> bool {
        Framework::from_str(project).is_ok()
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = PatlasError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classiq" => Ok(Self::Classiq),
            "pennylane" => Ok(Self::PennyLane),
            "qiskit" => Ok(Self::Qiskit),
            other => Err(PatlasError::malformed_concept(format!(
                "unknown framework '{other}'"
            ))),
        }
    }
}

/// One extracted API entity (function or class) with its summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Fully-qualified identifier, unique within a framework
    pub name: String,
    /// Framework whose API the concept belongs to
    pub framework: Framework,
    /// Originating repository; equals the framework name for concepts defined
    /// by the framework itself, differs for target-project concepts
    pub project: String,
    /// Short natural-language description derived from the docstring; may be
    /// empty, in which case the concept is excluded from semantic matching
    #[serde(default)]
    pub summary: String,
    /// Source file the concept was extracted from
    #[serde(default)]
    pub source_path: String,
}

impl Concept {
    /// Create a new concept.
    pub fn new(
        name: impl Into<String>,
        framework: Framework,
        project: impl Into<String>,
        summary: impl Into<String>,
        source_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            framework,
            project: project.into(),
            summary: summary.into(),
            source_path: source_path.into(),
        }
    }

    /// The leaf identifier: the last `/`- or `.`-separated segment of the
    /// fully-qualified name. Used for name and alias matching.
    pub fn leaf_name(&self) -> &str {
        let tail = self.name.rsplit('/').next().unwrap_or(&self.name);
        tail.rsplit('.').next().unwrap_or(tail)
    }

    /// Whether the concept originates from one of the three source frameworks
    /// rather than an external target project.
    pub fn is_source_concept(&self) -> bool {
        Framework::is_source_project(&self.project)
    }
}

/// Index of a concept within a [`ConceptStore`], stable for one run.
pub type ConceptId = usize;

/// Immutable, ordered collection of concepts for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct ConceptStore {
    concepts: Vec<Concept>,
    skipped: usize,
}

impl ConceptStore {
    /// Build a store from already-validated concepts.
    pub fn new(concepts: Vec<Concept>) -> Self {
        Self {
            concepts,
            skipped: 0,
        }
    }

    /// Build a store from raw records, skipping malformed ones.
    ///
    /// A record without a name cannot be matched by any strategy; it is
    /// logged as a warning, counted, and the run continues with the rest.
    pub fn from_records(records: Vec<Concept>) -> Self {
        let total = records.len();
        let concepts: Vec<Concept> = records
            .into_iter()
            .filter(|record| {
                if record.name.trim().is_empty() {
                    warn!(
                        source_path = %record.source_path,
                        "skipping concept record with empty name"
                    );
                    false
                } else {
                    true
                }
            })
            .collect();
        let skipped = total - concepts.len();
        Self { concepts, skipped }
    }

    /// Number of concepts in the store.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Whether the store holds no concepts.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Number of malformed records skipped while building the store.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Account for records already rejected before the store was built.
    pub(crate) fn add_skipped(&mut self, extra: usize) {
        self.skipped += extra;
    }

    /// Concept by id.
    pub fn get(&self, id: ConceptId) -> Option<&Concept> {
        self.concepts.get(id)
    }

    /// Iterate concepts in insertion order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ConceptId, &Concept)> {
        self.concepts.iter().enumerate()
    }

    /// All concepts in insertion order.
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }
}

/// Interface for per-ecosystem AST scanners that produce concepts.
///
/// Implementations live outside this crate; the matcher only depends on the
/// records they produce.
pub trait ConceptExtractor {
    /// Extract all public API concepts under `root`.
    fn extract(&self, root: &Path) -> Result<Vec<Concept>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_parses_case_insensitively() {
        assert_eq!(Framework::from_str("Qiskit").unwrap(), Framework::Qiskit);
        assert_eq!(
            Framework::from_str("PENNYLANE").unwrap(),
            Framework::PennyLane
        );
        assert!(Framework::from_str("cirq").is_err());
    }

    #[test]
    fn leaf_name_takes_last_segment() {
        let concept = Concept::new(
            "qiskit/circuit/library.QFT",
            Framework::Qiskit,
            "qiskit",
            "",
            "",
        );
        assert_eq!(concept.leaf_name(), "QFT");

        let flat = Concept::new("grover", Framework::Classiq, "classiq", "", "");
        assert_eq!(flat.leaf_name(), "grover");
    }

    #[test]
    fn source_project_detection() {
        let source = Concept::new("a/b", Framework::Qiskit, "qiskit", "", "");
        assert!(source.is_source_concept());

        let target = Concept::new("a/b", Framework::Qiskit, "qhack-demos", "", "");
        assert!(!target.is_source_concept());
    }

    #[test]
    fn from_records_skips_nameless_entries() {
        let records = vec![
            Concept::new("qiskit/QFT", Framework::Qiskit, "qiskit", "fourier", ""),
            Concept::new("  ", Framework::Qiskit, "qiskit", "nameless", ""),
            Concept::new("", Framework::Classiq, "classiq", "", ""),
        ];

        let store = ConceptStore::from_records(records);
        assert_eq!(store.len(), 1);
        assert_eq!(store.skipped(), 2);
        assert_eq!(store.get(0).unwrap().name, "qiskit/QFT");
    }
}
