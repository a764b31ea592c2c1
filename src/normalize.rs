use log::debug;

use crate::{frame::Table, schema::ColumnType};

/// Identifier columns whose values are labels even when they look numeric.
pub const IDENTIFIER_COLUMNS: &[&str] = &[
    "Year",
    "NDC",
    "Labeler Code",
    "Product Code",
    "Package Size",
    "Quarter",
];

/// Retags every present identifier column as categorical. Absent columns are
/// skipped, and applying this twice changes nothing.
pub fn normalize_categoricals(table: Table) -> Table {
    table.map_columns(|mut column| {
        if IDENTIFIER_COLUMNS.contains(&column.name.as_str())
            && column.column_type != ColumnType::Categorical
        {
            debug!(
                "Treating '{}' as categorical (was {})",
                column.name, column.column_type
            );
            column.column_type = ColumnType::Categorical;
        }
        column
    })
}
