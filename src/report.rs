//! Structured dashboard output and its renderers.
//!
//! The pipeline never draws anything itself; it produces a [`Report`] of
//! titled [`Section`]s that a presentation layer can chart. Two renderers ship
//! with the crate: aligned plain text for terminals and pretty JSON.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::{
    aggregate::AggregationResult,
    data,
    error::Unavailable,
    frame::Table,
    table,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    #[serde(flatten)]
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    /// Raw rows, e.g. a data preview or a search match list.
    Rows {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        total_rows: usize,
    },
    /// One measure of an aggregation, drawn as a bar chart.
    Series {
        measure: String,
        unit: Option<String>,
        result: AggregationResult,
    },
    /// A whole aggregation, drawn as a table.
    Aggregate { result: AggregationResult },
    Skipped { reason: String },
    NoData { message: String },
    NoResults { query: String, target: String },
}

impl Section {
    pub fn new(title: impl Into<String>, body: SectionBody) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }

    pub fn rows(title: impl Into<String>, table: &Table, limit: usize) -> Self {
        let shown = if limit == 0 {
            table.clone()
        } else {
            table.head(limit)
        };
        let headers = shown
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let rows = (0..shown.row_count())
            .map(|row| {
                shown
                    .row(row)
                    .into_iter()
                    .map(data::cell_display)
                    .collect()
            })
            .collect();
        Self::new(
            title,
            SectionBody::Rows {
                headers,
                rows,
                total_rows: table.row_count(),
            },
        )
    }

    pub fn series(
        title: impl Into<String>,
        outcome: Result<AggregationResult, Unavailable>,
        measure: &str,
        unit: Option<String>,
    ) -> Self {
        let body = match outcome {
            Ok(result) => SectionBody::Series {
                measure: measure.to_string(),
                unit,
                result,
            },
            Err(unavailable) => SectionBody::Skipped {
                reason: unavailable.to_string(),
            },
        };
        Self::new(title, body)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.body, SectionBody::Skipped { .. })
    }
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => {
                let mut rendered =
                    serde_json::to_string_pretty(self).context("Serializing report as JSON")?;
                rendered.push('\n');
                Ok(rendered)
            }
        }
    }

    pub fn render_text(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}", self.title);
        let _ = writeln!(output, "{}", "=".repeat(self.title.chars().count()));
        for section in &self.sections {
            let _ = writeln!(output);
            let _ = writeln!(output, "### {}", section.title);
            output.push_str(&render_body(&section.body));
        }
        output
    }
}

fn render_body(body: &SectionBody) -> String {
    match body {
        SectionBody::Rows {
            headers,
            rows,
            total_rows,
        } => {
            let mut rendered = table::render_table(headers, rows);
            if rows.len() < *total_rows {
                let _ = writeln!(rendered, "({} of {} rows shown)", rows.len(), total_rows);
            }
            rendered
        }
        SectionBody::Series {
            measure,
            unit,
            result,
        } => {
            let index = result.measure_index(measure).unwrap_or(0);
            let mut rendered = String::new();
            match unit {
                Some(unit) => {
                    let _ = writeln!(rendered, "{} by {} {unit}", measure, result.group_column);
                }
                None => {
                    let _ = writeln!(rendered, "{} by {}", measure, result.group_column);
                }
            }
            if result.is_empty() {
                let _ = writeln!(rendered, "(no groups)");
            } else {
                rendered.push_str(&table::render_bars(&result.series(index)));
            }
            rendered
        }
        SectionBody::Aggregate { result } => {
            table::render_table(&result.headers(), &result.render_rows())
        }
        SectionBody::Skipped { reason } => format!("warning: {reason}\n"),
        SectionBody::NoData { message } => format!("{message}\n"),
        SectionBody::NoResults { query, target } => {
            format!("No results found for '{query}' in {target}.\n")
        }
    }
}
