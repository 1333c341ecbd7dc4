//! # Patlas-RS: Pattern-Atlas Mining for Quantum SDK APIs
//!
//! A Rust engine for a recurring question in quantum software-engineering
//! research: how often do known quantum design patterns (the "Pattern Atlas")
//! surface in the public APIs of the major SDKs? The library takes extracted
//! API concepts (functions/classes with docstring summaries) from Classiq,
//! PennyLane, and Qiskit, matches them against a fixed pattern taxonomy, and
//! derives reproducible statistics for reporting:
//!
//! - **Name matching**: O(1) exact and alias lookup against the catalog
//! - **Semantic matching**: cosine similarity over text embeddings with a
//!   configurable acceptance threshold
//! - **Deterministic aggregation**: ordered match sets and statistics tables
//!   that are byte-identical across runs with the same inputs
//! - **Artifact export**: per-table CSVs and a markdown report
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        API Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Core Model   │  Matching    │  Statistics  │  I/O          │
//! │               │              │              │               │
//! │ • Concepts    │ • Exact name │ • Summary    │ • Loaders     │
//! │ • Patterns    │ • Aliases    │   tables     │ • CSV export  │
//! │ • Config      │ • Semantic   │ • Top-N      │ • Markdown    │
//! │ • Errors      │   (cosine)   │ • Unmatched  │   report      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use patlas_rs::core::concepts::{Concept, ConceptStore, Framework};
//! use patlas_rs::core::patterns::{Pattern, PatternCatalog};
//! use patlas_rs::core::config::MatcherConfig;
//! use patlas_rs::embedding::hashed::HashedEmbedder;
//! use patlas_rs::matching::matcher::Matcher;
//!
//! fn main() -> patlas_rs::Result<()> {
//!     let store = ConceptStore::new(vec![Concept::new(
//!         "qiskit/circuit/library/QFT",
//!         Framework::Qiskit,
//!         "qiskit",
//!         "Quantum Fourier Transform circuit",
//!         "qiskit/circuit/library/basis_change/qft.py",
//!     )]);
//!     let catalog = PatternCatalog::new(vec![Pattern::new(
//!         "Basis Change",
//!         vec!["QFT".to_string()],
//!         "transform a register into the Fourier basis",
//!         "",
//!     )])?;
//!
//!     let embedder = HashedEmbedder::default();
//!     let mut matcher = Matcher::new(MatcherConfig::default());
//!     let matches = matcher.match_all(&store, &catalog, &embedder)?;
//!     println!("{} matches", matches.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Core data model and configuration
pub mod core {
    //! Core data model, configuration, and error types.

    pub mod concepts;
    pub mod config;
    pub mod errors;
    pub mod patterns;
}

// Text embedding providers
pub mod embedding {
    //! Embedding providers used by the semantic matching strategy.

    pub mod hashed;
    pub mod provider;

    #[cfg(feature = "fastembed-backend")]
    pub mod fastembed;
}

// Concept-to-pattern matching engine
pub mod matching {
    //! The concept-to-pattern matching engine.

    pub mod matcher;
    pub mod matchset;
}

// Statistics aggregation over match sets
pub mod stats {
    //! Statistics aggregation over match sets.

    pub mod aggregator;
    pub mod summary;
}

// Input loading and artifact export
pub mod io {
    //! Input loading and report/CSV export.

    pub mod exports;
    pub mod loaders;
}

// Public API and engine interface
pub mod api {
    //! High-level engine facade.

    pub mod engine;
}

// Re-export primary types for convenience
pub use crate::api::engine::{AtlasEngine, RunResults};
pub use crate::core::config::{AtlasConfig, MatcherConfig, ReportConfig};
pub use crate::core::errors::{PatlasError, Result};
pub use crate::matching::matcher::Matcher;
pub use crate::matching::matchset::{Match, MatchSet, MatchType};
pub use crate::stats::summary::StatSummary;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
