//! Real embedding backend wrapping `fastembed`.
//!
//! The wrapped model downloads on first use (cacheable via
//! `EmbeddingSettings::cache_dir`) and runs inference on CPU. fastembed is
//! deterministic for identical input text, which the matcher relies on.

use std::sync::RwLock;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::core::config::EmbeddingSettings;
use crate::core::errors::{PatlasError, Result};
use crate::embedding::provider::EmbeddingProvider;

/// Embedding provider backed by a fastembed ONNX model.
pub struct FastembedProvider {
    model: RwLock<TextEmbedding>,
}

impl FastembedProvider {
    /// Initialize the backend, downloading the model if needed.
    pub fn new(settings: &EmbeddingSettings) -> Result<Self> {
        let model_kind = resolve_model(&settings.model_name)?;

        let mut init_options =
            InitOptions::new(model_kind).with_show_download_progress(true);
        if let Some(ref cache_dir) = settings.cache_dir {
            init_options = init_options.with_cache_dir(cache_dir.clone());
        }

        info!(model = %settings.model_name, "initializing embedding model");
        let model = TextEmbedding::try_new(init_options).map_err(|e| {
            PatlasError::internal(format!("failed to initialize embedding model: {e}"))
        })?;

        Ok(Self {
            model: RwLock::new(model),
        })
    }
}

/// Map a configured model name onto a fastembed model.
fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sentence-transformers/all-minilm-l6-v2" | "all-minilm-l6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        "baai/bge-small-en-v1.5" | "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
        other => Err(PatlasError::config_field(
            format!("unsupported embedding model '{other}'"),
            "model_name",
        )),
    }
}

impl EmbeddingProvider for FastembedProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = {
            let mut model = self
                .model
                .write()
                .map_err(|_| PatlasError::internal("embedding model lock poisoned"))?;
            model
                .embed(vec![text], None)
                .map_err(|e| PatlasError::embedding(format!("inference failed: {e}"), text))?
        };

        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| PatlasError::embedding("backend returned no vector", text))
    }

    fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = {
            let mut model = self
                .model
                .write()
                .map_err(|_| PatlasError::internal("embedding model lock poisoned"))?;
            model.embed(text_refs, None).map_err(|e| {
                PatlasError::embedding(format!("batch inference failed: {e}"), &texts[0])
            })?
        };

        if embeddings.len() != texts.len() {
            return Err(PatlasError::internal(format!(
                "backend returned {} vectors for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_names_resolve() {
        assert!(resolve_model("sentence-transformers/all-MiniLM-L6-v2").is_ok());
        assert!(resolve_model("BAAI/bge-small-en-v1.5").is_ok());
    }

    #[test]
    fn unknown_model_name_is_a_config_error() {
        let err = resolve_model("text-embedding-3-large").unwrap_err();
        assert!(matches!(err, PatlasError::Config { .. }));
    }
}
