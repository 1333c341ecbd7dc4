//! End-to-end pipeline tests: JSON inputs through matching, aggregation, and
//! artifact export.

use std::fs;
use std::path::PathBuf;

use patlas_rs::core::config::AtlasConfig;
use patlas_rs::embedding::hashed::HashedEmbedder;
use patlas_rs::stats::aggregator::tables;
use patlas_rs::AtlasEngine;

const CONCEPTS_JSON: &str = r#"[
    {
        "name": "qiskit/circuit/library/QFT",
        "framework": "qiskit",
        "summary": "Quantum Fourier Transform circuit",
        "source_path": "qiskit/circuit/library/basis_change/qft.py"
    },
    {
        "name": "pennylane/templates/GroverOperator",
        "framework": "pennylane",
        "summary": "Grover diffusion operator for amplitude amplification"
    },
    {
        "name": "demos/search/grover",
        "framework": "pennylane",
        "project": "qhack-demos",
        "summary": "runs Grover search on a toy oracle"
    },
    {
        "name": "",
        "framework": "qiskit",
        "summary": "nameless record that must be skipped"
    }
]"#;

const TAXONOMY_YAML: &str = "\
- name: Basis Change
  aliases: [QFT]
  intent: transform a register into the Fourier basis
- name: Amplitude Amplification
  aliases: [Grover, GroverOperator]
  intent: amplify the amplitude of marked states
- name: Uniform Superposition
  intent: prepare an equal superposition over all basis states
";

struct Fixture {
    _dir: tempfile::TempDir,
    concepts: Vec<PathBuf>,
    taxonomy: PathBuf,
    out_dir: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let concepts = dir.path().join("concepts.json");
    let taxonomy = dir.path().join("atlas.yaml");
    fs::write(&concepts, CONCEPTS_JSON).unwrap();
    fs::write(&taxonomy, TAXONOMY_YAML).unwrap();
    let out_dir = dir.path().join("out");
    Fixture {
        concepts: vec![concepts],
        taxonomy,
        out_dir,
        _dir: dir,
    }
}

#[test]
fn full_pipeline_writes_all_artifacts() {
    let fx = fixture();
    let engine = AtlasEngine::new(AtlasConfig::default()).unwrap();
    let embedder = HashedEmbedder::default();

    let results = engine
        .run_files(&fx.concepts, &fx.taxonomy, &fx.out_dir, &embedder)
        .unwrap();

    // Three valid concepts, each with one alias match; the nameless record
    // is skipped without aborting the run.
    assert_eq!(results.matches.len(), 3);
    assert_eq!(results.concepts_skipped, 1);

    assert!(fx.out_dir.join("matches.csv").exists());
    assert!(fx.out_dir.join("report.md").exists());
    assert!(fx.out_dir.join("tables/match_type_counts.csv").exists());
    assert!(fx.out_dir.join("tables/unmatched_patterns.csv").exists());

    let matches_csv = fs::read_to_string(fx.out_dir.join("matches.csv")).unwrap();
    let mut lines = matches_csv.lines();
    assert_eq!(lines.next().unwrap(), "concept,pattern,match_type,score");
    assert_eq!(
        lines.next().unwrap(),
        "qiskit/circuit/library/QFT,Basis Change,alias_name,0.9500"
    );
    assert_eq!(
        lines.next().unwrap(),
        "pennylane/templates/GroverOperator,Amplitude Amplification,alias_name,0.9500"
    );
    assert_eq!(
        lines.next().unwrap(),
        "demos/search/grover,Amplitude Amplification,alias_name,0.9500"
    );
}

#[test]
fn summary_tables_reflect_the_run() {
    let fx = fixture();
    let engine = AtlasEngine::new(AtlasConfig::default()).unwrap();
    let results = engine
        .run_files(
            &fx.concepts,
            &fx.taxonomy,
            &fx.out_dir,
            &HashedEmbedder::default(),
        )
        .unwrap();

    let unmatched = results.summary.table(tables::UNMATCHED_PATTERNS).unwrap();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched.rows[0]["pattern"].render(), "Uniform Superposition");

    // Source side: qiskit + pennylane framework concepts; adoption side:
    // the qhack-demos concept.
    let source = results
        .summary
        .table(tables::SOURCE_PATTERN_ANALYSIS)
        .unwrap();
    assert_eq!(source.len(), 2);
    let adoption = results
        .summary
        .table(tables::ADOPTION_PATTERN_ANALYSIS)
        .unwrap();
    assert_eq!(adoption.len(), 1);
    assert_eq!(adoption.rows[0]["pattern"].render(), "Amplitude Amplification");
    assert_eq!(adoption.rows[0]["projects"].render(), "qhack-demos");

    let report = fs::read_to_string(fx.out_dir.join("report.md")).unwrap();
    assert!(report.contains("# Pattern Analysis Report"));
    assert!(report.contains("- Uniform Superposition"));
}

#[test]
fn repeated_runs_produce_identical_artifacts() {
    let fx = fixture();
    let engine = AtlasEngine::new(AtlasConfig::default()).unwrap();
    let embedder = HashedEmbedder::default();

    let first = engine
        .run_files(&fx.concepts, &fx.taxonomy, &fx.out_dir, &embedder)
        .unwrap();
    let first_csv = fs::read_to_string(fx.out_dir.join("matches.csv")).unwrap();
    let first_tables = fs::read_to_string(fx.out_dir.join("tables/patterns_by_match_count.csv"))
        .unwrap();

    let second = engine
        .run_files(&fx.concepts, &fx.taxonomy, &fx.out_dir, &embedder)
        .unwrap();
    let second_csv = fs::read_to_string(fx.out_dir.join("matches.csv")).unwrap();
    let second_tables = fs::read_to_string(fx.out_dir.join("tables/patterns_by_match_count.csv"))
        .unwrap();

    assert_eq!(first.matches, second.matches);
    assert_eq!(first_csv, second_csv);
    assert_eq!(first_tables, second_tables);
}

#[test]
fn semantic_matching_applies_across_the_pipeline() {
    // With the hashed embedder, identical summary and intent text embeds to
    // identical vectors, so similarity is 1.0 and passes any threshold.
    let dir = tempfile::tempdir().unwrap();
    let concepts = dir.path().join("concepts.json");
    fs::write(
        &concepts,
        r#"[{"name": "qiskit/transpiler/mapper",
             "framework": "qiskit",
             "summary": "route qubits onto hardware topology"}]"#,
    )
    .unwrap();
    let taxonomy = dir.path().join("atlas.json");
    fs::write(
        &taxonomy,
        r#"[{"name": "Qubit Routing", "intent": "route qubits onto hardware topology"}]"#,
    )
    .unwrap();

    let engine = AtlasEngine::new(AtlasConfig::default()).unwrap();
    let results = engine
        .run_files(
            &[concepts],
            &taxonomy,
            &dir.path().join("out"),
            &HashedEmbedder::default(),
        )
        .unwrap();

    assert_eq!(results.matches.len(), 1);
    let m = results.matches.matches()[0];
    assert_eq!(m.match_type, patlas_rs::MatchType::Semantic);
    assert!((m.score - 1.0).abs() < 1e-6);
}
