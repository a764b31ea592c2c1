//! Column-presence checks shared by the aggregation engine and its callers.
//!
//! Every computation states the columns it needs as [`Requirements`]; the
//! same check decides whether `top_n` runs and whether the dashboard renders a
//! section or a "columns unavailable" notice.

use crate::{error::Unavailable, frame::Table};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    /// Columns that only need to exist (group keys, search targets).
    pub present: Vec<String>,
    /// Columns that must exist and be numeric (summed measures).
    pub numeric: Vec<String>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.present.push(name.into());
        self
    }

    pub fn measure(mut self, name: impl Into<String>) -> Self {
        self.numeric.push(name.into());
        self
    }

    pub fn measures<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn check(&self, table: &Table) -> Result<(), Unavailable> {
        let mut missing = Vec::new();
        let mut non_numeric = Vec::new();
        for name in self.present.iter().chain(&self.numeric) {
            if !table.has_column(name) && !missing.contains(name) {
                missing.push(name.clone());
            }
        }
        for name in &self.numeric {
            if let Some(column) = table.column(name)
                && !column.is_numeric()
                && !non_numeric.contains(name)
            {
                non_numeric.push(name.clone());
            }
        }
        if missing.is_empty() && non_numeric.is_empty() {
            Ok(())
        } else {
            Err(Unavailable {
                missing,
                non_numeric,
            })
        }
    }
}

/// Something that can run against a table once its columns are present.
pub trait Computation {
    fn requirements(&self) -> Requirements;
}

/// Pairs each computation with whether it can run on `table`.
pub fn plan<'a, C: Computation>(
    table: &Table,
    computations: &'a [C],
) -> Vec<(&'a C, Result<(), Unavailable>)> {
    computations
        .iter()
        .map(|computation| (computation, computation.requirements().check(table)))
        .collect()
}
