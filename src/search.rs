//! Free-text search over the cleaned table.
//!
//! A query matches a cell when the cell's display text contains the query,
//! ignoring case. Searching is stateless: every call starts from the table it
//! is given and the result is discarded by the caller once rendered.

use std::{fmt, str::FromStr};

use log::{debug, info};
use serde::Serialize;

use crate::{
    aggregate::AggregationResult,
    capability::Requirements,
    data,
    error::Unavailable,
    frame::Table,
};

pub const ALL_COLUMNS: &str = "All Columns";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    AllColumns,
    Column(String),
}

impl SearchTarget {
    pub fn from_option(column: Option<&str>) -> Self {
        match column {
            None => SearchTarget::AllColumns,
            Some(name) if name == ALL_COLUMNS => SearchTarget::AllColumns,
            Some(name) => SearchTarget::Column(name.to_string()),
        }
    }

}

impl FromStr for SearchTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SearchTarget::from_option(Some(s)))
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTarget::AllColumns => f.write_str(ALL_COLUMNS),
            SearchTarget::Column(name) => f.write_str(name),
        }
    }
}

/// Only the empty query disables filtering; `" "` is an ordinary needle.
pub fn is_empty_query(query: &str) -> bool {
    query.is_empty()
}

/// Rows whose cell text contains `query` (case-insensitive). An empty query
/// returns the whole table.
pub fn filter(table: &Table, query: &str, target: &SearchTarget) -> Result<Table, Unavailable> {
    if is_empty_query(query) {
        return Ok(table.clone());
    }
    let needle = query.to_lowercase();
    let matches_cell = |row: usize, column: usize| {
        data::cell_display(table.cell(row, column))
            .to_lowercase()
            .contains(&needle)
    };
    let rows = match target {
        SearchTarget::AllColumns => {
            let width = table.columns().len();
            (0..table.row_count())
                .filter(|&row| (0..width).any(|column| matches_cell(row, column)))
                .collect::<Vec<_>>()
        }
        SearchTarget::Column(name) => {
            Requirements::new().column(name.as_str()).check(table)?;
            let column = table
                .column_index(name)
                .ok_or_else(|| Unavailable::missing([name.as_str()]))?;
            (0..table.row_count())
                .filter(|&row| matches_cell(row, column))
                .collect::<Vec<_>>()
        }
    };
    debug!(
        "Query '{query}' on {target} matched {} of {} row(s)",
        rows.len(),
        table.row_count()
    );
    Ok(table.select_rows(&rows))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub target: SearchTarget,
    #[serde(skip)]
    pub table: Table,
    pub row_count: usize,
    pub aggregations: Vec<ScopedAggregation>,
}

/// An aggregation recomputed over the matching rows, or the reason it could
/// not run there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopedAggregation {
    pub title: String,
    pub outcome: Result<AggregationResult, Unavailable>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was empty; nothing was filtered.
    Unfiltered,
    ColumnUnavailable(Unavailable),
    NoResults { query: String, target: SearchTarget },
    Matches(SearchResult),
}

/// Filters `table` and re-runs `aggregations` over the matching rows.
///
/// Each aggregation is a title plus a closure over the filtered table, so the
/// caller decides which views the search result carries.
pub fn search<F>(
    table: &Table,
    query: &str,
    target: &SearchTarget,
    aggregations: &[(String, F)],
) -> SearchOutcome
where
    F: Fn(&Table) -> Result<AggregationResult, Unavailable>,
{
    if is_empty_query(query) {
        return SearchOutcome::Unfiltered;
    }
    let subset = match filter(table, query, target) {
        Ok(subset) => subset,
        Err(unavailable) => return SearchOutcome::ColumnUnavailable(unavailable),
    };
    if subset.is_empty() {
        info!("No results found for '{query}' in {target}");
        return SearchOutcome::NoResults {
            query: query.to_string(),
            target: target.clone(),
        };
    }
    let aggregations = aggregations
        .iter()
        .map(|(title, run)| ScopedAggregation {
            title: title.clone(),
            outcome: run(&subset),
        })
        .collect();
    info!(
        "Query '{query}' in {target} matched {} row(s)",
        subset.row_count()
    );
    SearchOutcome::Matches(SearchResult {
        query: query.to_string(),
        target: target.clone(),
        row_count: subset.row_count(),
        table: subset,
        aggregations,
    })
}
