//! Input loading for concept records and the pattern taxonomy.
//!
//! Concept files are JSON arrays produced by the extraction tooling; the
//! taxonomy is a JSON or YAML document. A whole file that fails to parse is
//! a fatal serialization error; an individual concept record missing its
//! name is skipped with a warning and the run continues.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::concepts::{Concept, ConceptStore, Framework};
use crate::core::errors::{PatlasError, Result};
use crate::core::patterns::{Pattern, PatternCatalog};

/// Raw concept record as written by the extraction tooling. All fields but
/// the framework are optional at the file level; validation happens here.
#[derive(Debug, Deserialize)]
struct ConceptRecord {
    #[serde(default)]
    name: String,
    framework: String,
    #[serde(default)]
    project: Option<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    source_path: String,
}

/// Raw taxonomy record.
#[derive(Debug, Deserialize)]
struct PatternRecord {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    intent: String,
    #[serde(default)]
    description: String,
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| PatlasError::io(format!("failed to read {}", path.display()), e))
}

/// Load concept records from one or more JSON files into a single store.
///
/// Records missing a name or carrying an unknown framework are skipped with
/// a warning; the counts appear in the run summary.
pub fn load_concepts(paths: &[impl AsRef<Path>]) -> Result<ConceptStore> {
    let mut concepts = Vec::new();
    let mut skipped = 0usize;

    for path in paths {
        let path = path.as_ref();
        let content = read_file(path)?;
        let records: Vec<ConceptRecord> = serde_json::from_str(&content).map_err(|e| {
            PatlasError::serialization(
                format!("failed to parse concept file {}", path.display()),
                e,
            )
        })?;

        info!(file = %path.display(), records = records.len(), "loaded concept file");

        for record in records {
            if record.name.trim().is_empty() {
                warn!(
                    file = %path.display(),
                    "skipping concept record with empty name"
                );
                skipped += 1;
                continue;
            }
            let framework = match Framework::from_str(&record.framework) {
                Ok(framework) => framework,
                Err(error) => {
                    warn!(
                        file = %path.display(),
                        concept = %record.name,
                        %error,
                        "skipping concept record"
                    );
                    skipped += 1;
                    continue;
                }
            };
            let project = record
                .project
                .unwrap_or_else(|| framework.as_str().to_string());
            concepts.push(Concept::new(
                record.name,
                framework,
                project,
                record.summary,
                record.source_path,
            ));
        }
    }

    // Malformed records were filtered above; route the skip count through
    // the store so it shows up in the run summary.
    let mut store = ConceptStore::from_records(concepts);
    store.add_skipped(skipped);
    Ok(store)
}

/// Load the pattern taxonomy from a JSON (`.json`) or YAML (`.yaml`/`.yml`)
/// file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<PatternCatalog> {
    let path = path.as_ref();
    let content = read_file(path)?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let records: Vec<PatternRecord> = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| {
            PatlasError::serialization(
                format!("failed to parse taxonomy file {}", path.display()),
                e,
            )
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| {
            PatlasError::serialization(
                format!("failed to parse taxonomy file {}", path.display()),
                e,
            )
        })?
    };

    info!(file = %path.display(), patterns = records.len(), "loaded pattern taxonomy");

    let patterns = records
        .into_iter()
        .map(|r| Pattern::new(r.name, r.aliases, r.intent, r.description))
        .collect();
    PatternCatalog::new(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_concepts_and_defaults_project_to_framework() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "concepts.json",
            r#"[
                {"name": "qiskit/QFT", "framework": "qiskit", "summary": "fourier"},
                {"name": "demos/run", "framework": "pennylane", "project": "qhack-demos"}
            ]"#,
        );

        let store = load_concepts(&[path]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().project, "qiskit");
        assert_eq!(store.get(1).unwrap().project, "qhack-demos");
        assert_eq!(store.skipped(), 0);
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "concepts.json",
            r#"[
                {"name": "", "framework": "qiskit"},
                {"name": "cirq/thing", "framework": "cirq"},
                {"name": "qiskit/Sampler", "framework": "qiskit"}
            ]"#,
        );

        let store = load_concepts(&[path]).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.skipped(), 2);
    }

    #[test]
    fn unparseable_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "concepts.json", "not json");
        let result = load_concepts(&[path]);
        assert!(matches!(result, Err(PatlasError::Serialization { .. })));
    }

    #[test]
    fn loads_catalog_from_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json = write_temp(
            &dir,
            "atlas.json",
            r#"[{"name": "Basis Change", "aliases": ["QFT"], "intent": "fourier basis"}]"#,
        );
        let yaml = write_temp(
            &dir,
            "atlas.yaml",
            "- name: Basis Change\n  aliases: [QFT]\n  intent: fourier basis\n",
        );

        for path in [json, yaml] {
            let catalog = load_catalog(&path).unwrap();
            assert_eq!(catalog.len(), 1);
            assert_eq!(catalog.find_by_alias("qft"), &[0]);
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_catalog("/nonexistent/atlas.json");
        assert!(matches!(result, Err(PatlasError::Io { .. })));
    }
}
