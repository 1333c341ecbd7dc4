//! Statistics aggregation over a match set.
//!
//! `summarize` is a pure function of the match set, catalog, and concept
//! store: no I/O, no hidden state, and identical inputs produce identical
//! tables. Every grouping goes through sorted maps so row order never
//! depends on hash iteration.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::concepts::{ConceptStore, Framework};
use crate::core::config::ReportConfig;
use crate::core::patterns::PatternCatalog;
use crate::matching::matchset::{MatchSet, MatchType};
use crate::stats::summary::{StatSummary, Table};

/// Table name constants, shared with the export layer.
pub mod tables {
    /// Run-level totals
    pub const RUN_SUMMARY: &str = "run_summary";
    /// Match counts per match type
    pub const MATCH_TYPE_COUNTS: &str = "match_type_counts";
    /// Mean score per match type
    pub const AVG_SCORE_BY_TYPE: &str = "avg_score_by_type";
    /// Match counts per source framework
    pub const MATCHES_BY_FRAMEWORK: &str = "matches_by_framework";
    /// Match counts per originating project
    pub const MATCHES_BY_PROJECT: &str = "matches_by_project";
    /// Distinct matched concepts per pattern, zero-match patterns included
    pub const PATTERNS_BY_MATCH_COUNT: &str = "patterns_by_match_count";
    /// Mean score per pattern
    pub const AVG_SCORE_BY_PATTERN: &str = "avg_score_by_pattern";
    /// Concepts with the most distinct pattern matches
    pub const TOP_MATCHED_CONCEPTS: &str = "top_matched_concepts";
    /// Catalog patterns with zero matches
    pub const UNMATCHED_PATTERNS: &str = "unmatched_patterns";
    /// Matches whose concepts come from the source frameworks themselves
    pub const SOURCE_PATTERN_ANALYSIS: &str = "source_pattern_analysis";
    /// Matches whose concepts come from external target projects
    pub const ADOPTION_PATTERN_ANALYSIS: &str = "adoption_pattern_analysis";
}

/// Derive all reporting tables from a match set.
///
/// Total over any match set, including the empty one.
pub fn summarize(
    matches: &MatchSet,
    catalog: &PatternCatalog,
    store: &ConceptStore,
    report: &ReportConfig,
) -> StatSummary {
    let mut summary = StatSummary::new();

    summary.insert(tables::RUN_SUMMARY, run_summary(matches, catalog, store));
    summary.insert(tables::MATCH_TYPE_COUNTS, match_type_counts(matches));
    summary.insert(tables::AVG_SCORE_BY_TYPE, avg_score_by_type(matches));
    summary.insert(
        tables::MATCHES_BY_FRAMEWORK,
        matches_by_framework(matches, store),
    );
    summary.insert(
        tables::MATCHES_BY_PROJECT,
        matches_by_project(matches, store),
    );
    summary.insert(
        tables::PATTERNS_BY_MATCH_COUNT,
        patterns_by_match_count(matches, catalog),
    );
    summary.insert(
        tables::AVG_SCORE_BY_PATTERN,
        avg_score_by_pattern(matches, catalog),
    );
    summary.insert(
        tables::TOP_MATCHED_CONCEPTS,
        top_matched_concepts(matches, store, report.top_concepts),
    );
    summary.insert(
        tables::UNMATCHED_PATTERNS,
        unmatched_patterns(matches, catalog),
    );
    summary.insert(
        tables::SOURCE_PATTERN_ANALYSIS,
        pattern_partition(matches, catalog, store, true),
    );
    summary.insert(
        tables::ADOPTION_PATTERN_ANALYSIS,
        pattern_partition(matches, catalog, store, false),
    );

    summary
}

fn run_summary(matches: &MatchSet, catalog: &PatternCatalog, store: &ConceptStore) -> Table {
    let mut table = Table::new(&["metric", "value"]);

    let matched_patterns: BTreeSet<usize> = matches.iter().map(|m| m.pattern).collect();
    table.push_row(vec!["total_matches".into(), matches.len().into()]);
    table.push_row(vec![
        "distinct_patterns_matched".into(),
        matched_patterns.len().into(),
    ]);
    table.push_row(vec![
        "unmatched_patterns".into(),
        (catalog.len() - matched_patterns.len()).into(),
    ]);
    if !matches.is_empty() {
        let avg = matches.iter().map(|m| m.score).sum::<f64>() / matches.len() as f64;
        table.push_row(vec!["average_score".into(), avg.into()]);
    }
    table.push_row(vec![
        "concepts_skipped_malformed".into(),
        store.skipped().into(),
    ]);

    table
}

fn match_type_counts(matches: &MatchSet) -> Table {
    let mut table = Table::new(&["match_type", "count"]);
    for match_type in MatchType::all() {
        let count = matches
            .iter()
            .filter(|m| m.match_type == match_type)
            .count();
        if count > 0 {
            table.push_row(vec![match_type.as_str().into(), count.into()]);
        }
    }
    table
}

fn avg_score_by_type(matches: &MatchSet) -> Table {
    let mut table = Table::new(&["match_type", "avg_score"]);
    for match_type in MatchType::all() {
        let scores: Vec<f64> = matches
            .iter()
            .filter(|m| m.match_type == match_type)
            .map(|m| m.score)
            .collect();
        // A type with zero matches is omitted rather than divided by zero
        if !scores.is_empty() {
            let avg = scores.iter().sum::<f64>() / scores.len() as f64;
            table.push_row(vec![match_type.as_str().into(), avg.into()]);
        }
    }
    table
}

/// Count matches per group key, emitting rows sorted by descending count,
/// ties by ascending key.
fn counted_table(columns: &[&str], counts: BTreeMap<String, usize>) -> Table {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut table = Table::new(columns);
    for (key, count) in entries {
        table.push_row(vec![key.into(), count.into()]);
    }
    table
}

fn matches_by_framework(matches: &MatchSet, store: &ConceptStore) -> Table {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for m in matches {
        if let Some(concept) = store.get(m.concept) {
            *counts.entry(concept.framework.to_string()).or_default() += 1;
        }
    }
    counted_table(&["framework", "count"], counts)
}

fn matches_by_project(matches: &MatchSet, store: &ConceptStore) -> Table {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for m in matches {
        if let Some(concept) = store.get(m.concept) {
            *counts.entry(concept.project.clone()).or_default() += 1;
        }
    }
    counted_table(&["project", "count"], counts)
}

fn patterns_by_match_count(matches: &MatchSet, catalog: &PatternCatalog) -> Table {
    // Distinct concepts per pattern; every catalog pattern appears, matched
    // or not.
    let mut concepts_per_pattern: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); catalog.len()];
    for m in matches {
        if let Some(set) = concepts_per_pattern.get_mut(m.pattern) {
            set.insert(m.concept);
        }
    }

    let mut entries: Vec<(&str, usize)> = catalog
        .iter()
        .map(|(id, pattern)| (pattern.name.as_str(), concepts_per_pattern[id].len()))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = Table::new(&["pattern", "concept_count"]);
    for (name, count) in entries {
        table.push_row(vec![name.into(), count.into()]);
    }
    table
}

fn avg_score_by_pattern(matches: &MatchSet, catalog: &PatternCatalog) -> Table {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for m in matches {
        if let Some(pattern) = catalog.get(m.pattern) {
            let entry = sums.entry(pattern.name.as_str()).or_insert((0.0, 0));
            entry.0 += m.score;
            entry.1 += 1;
        }
    }

    let mut entries: Vec<(&str, f64)> = sums
        .into_iter()
        .map(|(name, (sum, count))| (name, sum / count as f64))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = Table::new(&["pattern", "avg_score"]);
    for (name, avg) in entries {
        table.push_row(vec![name.into(), avg.into()]);
    }
    table
}

fn top_matched_concepts(matches: &MatchSet, store: &ConceptStore, top_n: usize) -> Table {
    let mut patterns_per_concept: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for m in matches {
        patterns_per_concept
            .entry(m.concept)
            .or_default()
            .insert(m.pattern);
    }

    let mut entries: Vec<(&str, Framework, usize)> = patterns_per_concept
        .iter()
        .filter_map(|(&concept_id, patterns)| {
            store
                .get(concept_id)
                .map(|c| (c.name.as_str(), c.framework, patterns.len()))
        })
        .collect();
    entries.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));
    entries.truncate(top_n);

    let mut table = Table::new(&["framework", "concept", "matches"]);
    for (name, framework, count) in entries {
        table.push_row(vec![framework.to_string().into(), name.into(), count.into()]);
    }
    table
}

fn unmatched_patterns(matches: &MatchSet, catalog: &PatternCatalog) -> Table {
    let matched: BTreeSet<usize> = matches.iter().map(|m| m.pattern).collect();

    let mut names: Vec<&str> = catalog
        .iter()
        .filter(|(id, _)| !matched.contains(id))
        .map(|(_, pattern)| pattern.name.as_str())
        .collect();
    names.sort_unstable();

    let mut table = Table::new(&["pattern"]);
    for name in names {
        table.push_row(vec![name.into()]);
    }
    table
}

/// Per-pattern totals over one side of the source/adoption partition.
///
/// `source_side` selects matches whose concept originates from one of the
/// three source frameworks; the other side covers external target projects
/// and additionally reports project coverage.
fn pattern_partition(
    matches: &MatchSet,
    catalog: &PatternCatalog,
    store: &ConceptStore,
    source_side: bool,
) -> Table {
    let mut per_pattern: BTreeMap<&str, (usize, BTreeSet<String>)> = BTreeMap::new();
    for m in matches {
        let Some(concept) = store.get(m.concept) else {
            continue;
        };
        if concept.is_source_concept() != source_side {
            continue;
        }
        let Some(pattern) = catalog.get(m.pattern) else {
            continue;
        };
        let entry = per_pattern
            .entry(pattern.name.as_str())
            .or_insert_with(|| (0, BTreeSet::new()));
        entry.0 += 1;
        entry.1.insert(concept.project.clone());
    }

    let mut entries: Vec<(&str, usize, BTreeSet<String>)> = per_pattern
        .into_iter()
        .map(|(name, (count, projects))| (name, count, projects))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = if source_side {
        Table::new(&["pattern", "total_matches", "source_frameworks"])
    } else {
        Table::new(&["pattern", "total_matches", "project_coverage", "projects"])
    };
    for (name, count, projects) in entries {
        let joined = projects.iter().cloned().collect::<Vec<_>>().join(", ");
        if source_side {
            table.push_row(vec![name.into(), count.into(), joined.into()]);
        } else {
            table.push_row(vec![
                name.into(),
                count.into(),
                projects.len().into(),
                joined.into(),
            ]);
        }
    }
    table
}
