//! Artifact export: match CSV, per-table statistics CSVs, and the markdown
//! report consumed by the paper tooling.
//!
//! Rendering is pure string building over already-computed tables; the only
//! I/O is the final `fs::write`. Output is deterministic apart from the
//! generation timestamp in the markdown header.

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::core::concepts::ConceptStore;
use crate::core::errors::{PatlasError, Result};
use crate::core::patterns::PatternCatalog;
use crate::matching::matchset::MatchSet;
use crate::stats::aggregator::tables;
use crate::stats::summary::{StatSummary, Table};

/// Quote a CSV field per RFC 4180 when it contains a delimiter, quote, or
/// newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the match set as CSV with columns `concept,pattern,match_type,score`.
pub fn matches_to_csv(
    matches: &MatchSet,
    store: &ConceptStore,
    catalog: &PatternCatalog,
) -> String {
    let mut out = String::from("concept,pattern,match_type,score\n");
    for m in matches {
        let concept = store.get(m.concept).map(|c| c.name.as_str()).unwrap_or("");
        let pattern = catalog.get(m.pattern).map(|p| p.name.as_str()).unwrap_or("");
        out.push_str(&format!(
            "{},{},{},{:.4}\n",
            csv_escape(concept),
            csv_escape(pattern),
            m.match_type,
            m.score
        ));
    }
    out
}

/// Write the match CSV to a file.
pub fn write_matches_csv(
    path: impl AsRef<Path>,
    matches: &MatchSet,
    store: &ConceptStore,
    catalog: &PatternCatalog,
) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, matches_to_csv(matches, store, catalog))
        .map_err(|e| PatlasError::io(format!("failed to write {}", path.display()), e))?;
    info!(file = %path.display(), rows = matches.len(), "wrote match CSV");
    Ok(())
}

/// Render one statistics table as CSV.
pub fn table_to_csv(table: &Table) -> String {
    let mut out = String::new();
    out.push_str(
        &table
            .columns
            .iter()
            .map(|c| csv_escape(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');
    for row in &table.rows {
        let line = table
            .columns
            .iter()
            .map(|column| {
                row.get(column)
                    .map(|cell| csv_escape(&cell.render()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Write every summary table as `<table_name>.csv` under `dir`.
///
/// Returns the number of files written.
pub fn export_summary_csvs(summary: &StatSummary, dir: impl AsRef<Path>) -> Result<usize> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .map_err(|e| PatlasError::io(format!("failed to create {}", dir.display()), e))?;

    let mut written = 0;
    for (name, table) in summary.iter() {
        let path = dir.join(format!("{name}.csv"));
        fs::write(&path, table_to_csv(table))
            .map_err(|e| PatlasError::io(format!("failed to write {}", path.display()), e))?;
        written += 1;
    }

    info!(dir = %dir.display(), files = written, "exported statistics CSVs");
    Ok(written)
}

/// Render one statistics table as a markdown pipe table.
pub fn table_to_markdown(table: &Table) -> String {
    if table.is_empty() {
        return "*(no rows)*\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("| {} |\n", table.columns.join(" | ")));
    out.push_str(&format!(
        "|{}\n",
        table.columns.iter().map(|_| "---|").collect::<String>()
    ));
    for row in &table.rows {
        let cells = table
            .columns
            .iter()
            .map(|column| {
                row.get(column)
                    .map(|cell| cell.render().replace('|', "\\|"))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&format!("| {cells} |\n"));
    }
    out
}

fn section(out: &mut String, heading: &str, table: Option<&Table>) {
    out.push_str(&format!("\n## {heading}\n\n"));
    if let Some(table) = table {
        out.push_str(&table_to_markdown(table));
    }
}

/// Render the full markdown report over a statistics summary.
pub fn render_markdown_report(summary: &StatSummary) -> String {
    let mut out = String::from("# Pattern Analysis Report\n\n");
    out.push_str(&format!(
        "Generated by patlas {} at {}\n",
        crate::VERSION,
        Utc::now().to_rfc3339()
    ));

    section(
        &mut out,
        "Summary Statistics",
        summary.table(tables::RUN_SUMMARY),
    );
    section(
        &mut out,
        "Match Type Breakdown",
        summary.table(tables::MATCH_TYPE_COUNTS),
    );
    section(
        &mut out,
        "Average Score by Match Type",
        summary.table(tables::AVG_SCORE_BY_TYPE),
    );
    section(
        &mut out,
        "Matches by Source Framework",
        summary.table(tables::MATCHES_BY_FRAMEWORK),
    );
    section(
        &mut out,
        "Matches by Project",
        summary.table(tables::MATCHES_BY_PROJECT),
    );
    section(
        &mut out,
        "Patterns by Match Count",
        summary.table(tables::PATTERNS_BY_MATCH_COUNT),
    );
    section(
        &mut out,
        "Average Score by Pattern",
        summary.table(tables::AVG_SCORE_BY_PATTERN),
    );
    section(
        &mut out,
        "Source Pattern Analysis (where patterns originate)",
        summary.table(tables::SOURCE_PATTERN_ANALYSIS),
    );
    section(
        &mut out,
        "Adoption Pattern Analysis (where patterns are used)",
        summary.table(tables::ADOPTION_PATTERN_ANALYSIS),
    );
    section(
        &mut out,
        "Top Matched Concepts",
        summary.table(tables::TOP_MATCHED_CONCEPTS),
    );

    // Unmatched patterns render as a list, matching the published report
    out.push_str("\n## Unmatched Patterns\n\n");
    match summary.table(tables::UNMATCHED_PATTERNS) {
        Some(table) if !table.is_empty() => {
            out.push_str(&format!(
                "The following {} patterns were not found in any project:\n\n",
                table.len()
            ));
            for row in &table.rows {
                if let Some(cell) = row.get("pattern") {
                    out.push_str(&format!("- {}\n", cell.render()));
                }
            }
        }
        _ => out.push_str("All catalog patterns were matched at least once.\n"),
    }

    out
}

/// Write the markdown report to a file.
pub fn write_markdown_report(path: impl AsRef<Path>, summary: &StatSummary) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_markdown_report(summary))
        .map_err(|e| PatlasError::io(format!("failed to write {}", path.display()), e))?;
    info!(file = %path.display(), "wrote markdown report");
    Ok(())
}
