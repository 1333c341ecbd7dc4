//! Patlas CLI - pattern-atlas mining over extracted quantum SDK concepts.
//!
//! Loads concept records and the pattern taxonomy, runs the matcher, and
//! writes the match CSV, statistics tables, and markdown report.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use patlas_rs::core::config::AtlasConfig;
use patlas_rs::embedding::hashed::HashedEmbedder;
use patlas_rs::embedding::provider::EmbeddingProvider;
use patlas_rs::AtlasEngine;

#[derive(Parser)]
#[command(name = "patlas", version, about = "Quantum pattern-atlas analysis")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and write artifacts
    Analyze(AnalyzeArgs),
    /// Print the default configuration as YAML
    PrintDefaultConfig,
    /// Validate a configuration file
    ValidateConfig(ValidateConfigArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Concept record files (JSON), one per framework extraction
    #[arg(short, long, required = true, num_args = 1..)]
    concepts: Vec<PathBuf>,

    /// Pattern taxonomy file (JSON or YAML)
    #[arg(short = 't', long)]
    taxonomy: PathBuf,

    /// Output directory for matches.csv, report.md, and tables/
    #[arg(short, long, default_value = "patlas-out")]
    out_dir: PathBuf,

    /// Configuration file (YAML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the semantic similarity threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Override the top-N concept table size
    #[arg(long)]
    top_concepts: Option<usize>,

    /// Use the deterministic hashed embedder instead of the model backend
    #[arg(long)]
    hashed_embedder: bool,
}

#[derive(Args)]
struct ValidateConfigArgs {
    /// Configuration file to validate
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Analyze(args) => analyze(args),
        Commands::PrintDefaultConfig => {
            let yaml = AtlasConfig::default().to_yaml()?;
            print!("{yaml}");
            Ok(())
        }
        Commands::ValidateConfig(args) => {
            AtlasConfig::from_yaml_file(&args.config)
                .with_context(|| format!("invalid configuration {}", args.config.display()))?;
            println!("configuration ok: {}", args.config.display());
            Ok(())
        }
    }
}

fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => AtlasConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => AtlasConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.matcher.semantic_threshold = threshold;
    }
    if let Some(top) = args.top_concepts {
        config.report.top_concepts = top;
    }

    let embedder = build_embedder(&config, args.hashed_embedder)?;
    let engine = AtlasEngine::new(config)?;

    let results = engine.run_files(
        &args.concepts,
        &args.taxonomy,
        &args.out_dir,
        embedder.as_ref(),
    )?;

    println!(
        "analysis complete: {} matches ({} concepts skipped, {} embedding failures)",
        results.matches.len(),
        results.concepts_skipped,
        results.diagnostics.embedding_failures
    );
    println!("artifacts written to {}", args.out_dir.display());
    Ok(())
}

#[cfg(feature = "fastembed-backend")]
fn build_embedder(
    config: &AtlasConfig,
    force_hashed: bool,
) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
    if force_hashed {
        return Ok(Box::new(HashedEmbedder::new(
            config.embedding.hashed_dimension,
        )));
    }
    let provider = patlas_rs::embedding::fastembed::FastembedProvider::new(&config.embedding)
        .context("failed to initialize embedding backend")?;
    Ok(Box::new(provider))
}

#[cfg(not(feature = "fastembed-backend"))]
fn build_embedder(
    config: &AtlasConfig,
    _force_hashed: bool,
) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
    Ok(Box::new(HashedEmbedder::new(
        config.embedding.hashed_dimension,
    )))
}
