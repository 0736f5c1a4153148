/// Fuzzy name matching and ranking.
pub mod matcher;

use std::collections::HashSet;

use tracing::debug;

use crate::model::ProjectContext;
use crate::types::{Symbol, SymbolMatch};

pub use matcher::{levenshtein, matches, rank_by};

/// Searches every symbol the model enumerates, keeping those `accepts`
/// admits and whose name matches `pattern`.
///
/// Results are ranked (exact name first, then edit distance) and cut to
/// `limit`. A blank pattern yields nothing.
pub fn search_symbols(
    ctx: &ProjectContext,
    pattern: &str,
    include_libraries: bool,
    limit: usize,
    accepts: impl Fn(&Symbol) -> bool,
) -> Vec<SymbolMatch> {
    let pattern = pattern.trim();
    if pattern.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut found: Vec<SymbolMatch> = ctx
        .model
        .symbols(include_libraries)
        .iter()
        .filter_map(|id| ctx.symbol(id))
        .filter(|s| accepts(s))
        .filter(|s| matches(&s.name, pattern))
        .map(|s| to_match(ctx, &s))
        .filter(|m| seen.insert(m.identity()))
        .collect();

    debug!(pattern, candidates = found.len(), "symbol search");
    rank_by(&mut found, pattern, |m| m.name.as_str());
    found.truncate(limit);
    found
}

/// Merges per-backend result lists: deduplicates by identity, re-ranks, and
/// cuts to `limit`.
pub fn merge_ranked(
    pattern: &str,
    lists: impl IntoIterator<Item = Vec<SymbolMatch>>,
    limit: usize,
) -> Vec<SymbolMatch> {
    let pattern = pattern.trim();
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<SymbolMatch> = lists
        .into_iter()
        .flatten()
        .filter(|m| seen.insert(m.identity()))
        .collect();
    rank_by(&mut merged, pattern, |m| m.name.as_str());
    merged.truncate(limit);
    merged
}

fn to_match(ctx: &ProjectContext, symbol: &Symbol) -> SymbolMatch {
    let container_name = symbol
        .container
        .as_ref()
        .and_then(|c| ctx.symbol(c))
        .map(|c| c.name);
    SymbolMatch {
        name: symbol.name.clone(),
        qualified_name: symbol.qualified_name.clone(),
        kind: symbol.kind,
        file: symbol.file.clone().unwrap_or_default(),
        line: symbol.start_line.unwrap_or(0),
        container_name,
        language: symbol.language.clone(),
    }
}
