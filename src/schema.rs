//! Column classification.
//!
//! Columns are classified once, from their raw text, when the file is loaded:
//! a column whose every non-missing token is a number is [`ColumnType::Numeric`],
//! anything else is [`ColumnType::Text`]. [`ColumnType::Categorical`] is never
//! inferred; it is assigned afterwards by [`crate::normalize`] for identifier
//! columns such as `Year` or `NDC` whose numbers are labels, not quantities.

use std::{collections::HashSet, fmt};

use serde::Serialize;

use crate::{
    data::{self, Value},
    frame::Table,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
    Categorical,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a column from its raw tokens.
///
/// A column with no non-missing tokens is numeric: an all-blank column carries
/// no text to preserve, and treating it as numeric keeps it out of mode
/// imputation.
pub fn classify_values<S: AsRef<str>>(raw: &[S]) -> ColumnType {
    let all_numeric = raw
        .iter()
        .map(AsRef::as_ref)
        .filter(|token| !data::is_missing_token(token))
        .all(|token| data::parse_numeric(token).is_some());
    if all_numeric {
        ColumnType::Numeric
    } else {
        ColumnType::Text
    }
}

/// Converts raw tokens to cells according to the column's classification.
///
/// Numeric columns whose values are all integers keep `Integer` cells; a single
/// fractional value promotes the whole column to `Float`.
pub fn parse_column<S: AsRef<str>>(raw: &[S], column_type: ColumnType) -> Vec<Option<Value>> {
    match column_type {
        ColumnType::Numeric => {
            let parsed = raw
                .iter()
                .map(|token| {
                    let token = token.as_ref();
                    if data::is_missing_token(token) {
                        None
                    } else {
                        data::parse_numeric(token)
                    }
                })
                .collect::<Vec<_>>();
            let any_float = parsed.iter().flatten().any(|v| matches!(v, Value::Float(_)));
            if any_float {
                parsed
                    .into_iter()
                    .map(|cell| cell.and_then(|v| v.as_f64()).map(Value::Float))
                    .collect()
            } else {
                parsed
            }
        }
        ColumnType::Text | ColumnType::Categorical => raw
            .iter()
            .map(|token| {
                let token = token.as_ref();
                if data::is_missing_token(token) {
                    None
                } else {
                    Some(Value::String(token.to_string()))
                }
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub column_type: ColumnType,
    pub non_missing: usize,
    pub missing: usize,
    pub distinct: usize,
}

impl ColumnSummary {
    pub fn render_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.column_type.to_string(),
            self.non_missing.to_string(),
            self.missing.to_string(),
            self.distinct.to_string(),
        ]
    }
}

pub fn summarize(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .map(|column| {
            let distinct = column
                .values
                .iter()
                .flatten()
                .map(Value::as_display)
                .collect::<HashSet<_>>()
                .len();
            let missing = column.missing_count();
            ColumnSummary {
                name: column.name.clone(),
                column_type: column.column_type,
                non_missing: column.values.len() - missing,
                missing,
                distinct,
            }
        })
        .collect()
}
