//! Configuration types for matching, reporting, and embedding.
//!
//! All settings are plain serde structs with defaults matching the published
//! analysis, loadable from a YAML file. `validate()` is called once at the
//! start of a run; invalid configuration is fatal before any matching begins.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{PatlasError, Result};

/// Default minimum cosine similarity for accepting a semantic match.
pub const DEFAULT_SEMANTIC_THRESHOLD: f64 = 0.6;

/// Confidence score recorded for alias-name matches.
pub const ALIAS_MATCH_SCORE: f64 = 0.95;

/// Settings for the concept-to-pattern matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum cosine similarity in (0, 1] for a semantic match (inclusive).
    pub semantic_threshold: f64,

    /// Compare concept leaf names and pattern names/aliases case-insensitively.
    pub name_match_case_insensitive: bool,

    /// Cap on recorded matches per concept; `None` means unbounded. Applied
    /// after per-concept ordering, so the highest-scoring matches are kept.
    pub max_matches_per_concept: Option<usize>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
            name_match_case_insensitive: true,
            max_matches_per_concept: None,
        }
    }
}

impl MatcherConfig {
    /// Validate the matcher configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.semantic_threshold > 0.0 && self.semantic_threshold <= 1.0) {
            return Err(PatlasError::config_field(
                format!(
                    "semantic_threshold must be in (0, 1], got {}",
                    self.semantic_threshold
                ),
                "semantic_threshold",
            ));
        }
        if self.max_matches_per_concept == Some(0) {
            return Err(PatlasError::config_field(
                "max_matches_per_concept must be at least 1 when set",
                "max_matches_per_concept",
            ));
        }
        Ok(())
    }
}

/// Settings for statistics and report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of concepts listed in the top-matched-concepts table.
    pub top_concepts: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top_concepts: 20 }
    }
}

impl ReportConfig {
    /// Validate the report configuration.
    pub fn validate(&self) -> Result<()> {
        if self.top_concepts == 0 {
            return Err(PatlasError::config_field(
                "top_concepts must be at least 1",
                "top_concepts",
            ));
        }
        Ok(())
    }
}

/// Settings for the embedding backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Model identifier for the fastembed backend.
    pub model_name: String,

    /// Cache directory for downloaded models.
    pub cache_dir: Option<PathBuf>,

    /// Vector dimension used by the deterministic hashed embedder when no
    /// model backend is enabled.
    pub hashed_dimension: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model_name: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            cache_dir: None,
            hashed_dimension: 256,
        }
    }
}

impl EmbeddingSettings {
    /// Validate the embedding settings.
    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(PatlasError::config_field(
                "model_name must not be empty",
                "model_name",
            ));
        }
        if self.hashed_dimension == 0 {
            return Err(PatlasError::config_field(
                "hashed_dimension must be at least 1",
                "hashed_dimension",
            ));
        }
        Ok(())
    }
}

/// Umbrella configuration for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Matcher settings
    pub matcher: MatcherConfig,

    /// Statistics and report settings
    pub report: ReportConfig,

    /// Embedding backend settings
    pub embedding: EmbeddingSettings,
}

impl AtlasConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PatlasError::io(format!("failed to read config file {}", path.display()), e)
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            PatlasError::serialization(
                format!("failed to parse config file {}", path.display()),
                e,
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PatlasError::serialization("failed to serialize config", e))
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<()> {
        self.matcher.validate()?;
        self.report.validate()?;
        self.embedding.validate()?;
        Ok(())
    }
}
