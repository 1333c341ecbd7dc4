//! High-level engine facade: load inputs, match, aggregate, export.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::concepts::ConceptStore;
use crate::core::config::AtlasConfig;
use crate::core::errors::Result;
use crate::core::patterns::PatternCatalog;
use crate::embedding::provider::EmbeddingProvider;
use crate::io::{exports, loaders};
use crate::matching::matcher::{MatchDiagnostics, Matcher};
use crate::matching::matchset::MatchSet;
use crate::stats::aggregator::summarize;
use crate::stats::summary::StatSummary;

/// Everything produced by one analysis run.
#[derive(Debug)]
pub struct RunResults {
    /// All matches, in deterministic order
    pub matches: MatchSet,
    /// Derived statistics tables
    pub summary: StatSummary,
    /// Malformed concept records skipped during loading
    pub concepts_skipped: usize,
    /// Matcher-side skip counters
    pub diagnostics: MatchDiagnostics,
}

/// Orchestrates one batch analysis run.
pub struct AtlasEngine {
    config: AtlasConfig,
}

impl AtlasEngine {
    /// Create an engine with a validated configuration.
    pub fn new(config: AtlasConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Run matching and aggregation over already-loaded inputs.
    pub fn run(
        &self,
        store: &ConceptStore,
        catalog: &PatternCatalog,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<RunResults> {
        info!(
            concepts = store.len(),
            patterns = catalog.len(),
            threshold = self.config.matcher.semantic_threshold,
            "starting analysis run"
        );

        let mut matcher = Matcher::new(self.config.matcher.clone());
        let matches = matcher.match_all(store, catalog, embedder)?;
        let diagnostics = *matcher.diagnostics();

        let summary = summarize(&matches, catalog, store, &self.config.report);

        info!(
            matches = matches.len(),
            skipped_concepts = store.skipped(),
            embedding_failures = diagnostics.embedding_failures,
            "analysis run complete"
        );
        if store.skipped() > 0 || diagnostics.embedding_failures > 0 {
            warn!(
                skipped_concepts = store.skipped(),
                embedding_failures = diagnostics.embedding_failures,
                "run completed with skipped items; see preceding warnings"
            );
        }

        Ok(RunResults {
            matches,
            summary,
            concepts_skipped: store.skipped(),
            diagnostics,
        })
    }

    /// Load inputs from files, run, and write all artifacts under `out_dir`:
    /// `matches.csv`, `report.md`, and one CSV per statistics table in
    /// `out_dir/tables/`.
    pub fn run_files(
        &self,
        concept_paths: &[PathBuf],
        catalog_path: &Path,
        out_dir: &Path,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<RunResults> {
        let store = loaders::load_concepts(concept_paths)?;
        let catalog = loaders::load_catalog(catalog_path)?;

        let results = self.run(&store, &catalog, embedder)?;

        std::fs::create_dir_all(out_dir).map_err(|e| {
            crate::core::errors::PatlasError::io(
                format!("failed to create {}", out_dir.display()),
                e,
            )
        })?;
        exports::write_matches_csv(out_dir.join("matches.csv"), &results.matches, &store, &catalog)?;
        exports::write_markdown_report(out_dir.join("report.md"), &results.summary)?;
        exports::export_summary_csvs(&results.summary, out_dir.join("tables"))?;

        Ok(results)
    }
}
