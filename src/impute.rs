//! Missing-value imputation.
//!
//! Numeric gaps are filled with the column median and text gaps with the
//! column mode. Categorical columns are left as they are.

use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    data::Value,
    frame::{Column, Table},
    schema::ColumnType,
};

pub fn impute_missing(table: Table) -> Table {
    if table.is_empty() {
        return table;
    }
    table.map_columns(impute_column)
}

fn impute_column(mut column: Column) -> Column {
    let missing = column.missing_count();
    if missing == 0 {
        return column;
    }
    let fill = match column.column_type {
        ColumnType::Numeric => median_fill(&column.values),
        ColumnType::Text => mode(&column.values).cloned(),
        ColumnType::Categorical => return column,
    };
    match fill {
        Some(value) => {
            debug!(
                "Filling {missing} missing value(s) in '{}' with {value}",
                column.name
            );
            for cell in column.values.iter_mut().filter(|cell| cell.is_none()) {
                *cell = Some(value.clone());
            }
        }
        None => warn!(
            "Column '{}' has no non-missing values; leaving {missing} cell(s) empty",
            column.name
        ),
    }
    column
}

/// Median of the non-missing numeric cells.
pub fn median(values: &[Option<Value>]) -> Option<f64> {
    let mut numbers = values
        .iter()
        .flatten()
        .filter_map(Value::as_f64)
        .collect::<Vec<_>>();
    if numbers.is_empty() {
        return None;
    }
    numbers.sort_by(f64::total_cmp);
    let mid = numbers.len() / 2;
    if numbers.len() % 2 == 0 {
        Some((numbers[mid - 1] + numbers[mid]) / 2.0)
    } else {
        Some(numbers[mid])
    }
}

fn median_fill(values: &[Option<Value>]) -> Option<Value> {
    let median = median(values)?;
    let integer_column = values
        .iter()
        .flatten()
        .all(|value| matches!(value, Value::Integer(_)));
    if integer_column && median.fract() == 0.0 {
        Some(Value::Integer(median as i64))
    } else {
        Some(Value::Float(median))
    }
}

/// Most frequent non-missing value; ties go to the value seen first.
pub fn mode(values: &[Option<Value>]) -> Option<&Value> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        if let Some(value) = value {
            counts
                .entry(value.as_display())
                .or_insert((0, position))
                .0 += 1;
        }
    }
    let (_, first_seen) = counts
        .into_values()
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))?;
    values[first_seen].as_ref()
}
