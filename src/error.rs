use std::path::PathBuf;

use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

/// Failures that end a run before any analysis happens.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV file not found at the specified path: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("An error occurred: {source:#}")]
    Parse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::NotFound { path } | LoadError::Parse { path, .. } => path,
        }
    }
}

/// A computation that cannot run because its columns are absent or unusable.
///
/// This never aborts a run; callers turn it into a skipped section.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", describe_unavailable(.missing, .non_numeric))]
pub struct Unavailable {
    pub missing: Vec<String>,
    pub non_numeric: Vec<String>,
}

impl Unavailable {
    pub fn missing(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            missing: columns.into_iter().map(Into::into).collect(),
            non_numeric: Vec::new(),
        }
    }
}

fn describe_unavailable(missing: &[String], non_numeric: &[String]) -> String {
    let quote = |names: &[String]| {
        names
            .iter()
            .map(|name| format!("'{name}'"))
            .join(" or ")
    };
    match (missing.is_empty(), non_numeric.is_empty()) {
        (false, true) => format!(
            "Columns for {} are not available in the dataset.",
            quote(missing)
        ),
        (true, false) => format!("Columns {} are not numeric.", quote(non_numeric)),
        (false, false) => format!(
            "Columns for {} are not available in the dataset, and {} are not numeric.",
            quote(missing),
            quote(non_numeric)
        ),
        (true, true) => "Columns unavailable.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_message_matches_dashboard_warning() {
        let err = Unavailable::missing([
            "Medicaid Amount Reimbursed",
            "Non Medicaid Amount Reimbursed",
        ]);
        assert_eq!(
            err.to_string(),
            "Columns for 'Medicaid Amount Reimbursed' or 'Non Medicaid Amount Reimbursed' are not available in the dataset."
        );
    }

    #[test]
    fn not_found_message_names_path() {
        let err = LoadError::NotFound {
            path: PathBuf::from("data/missing.csv"),
        };
        assert_eq!(
            err.to_string(),
            "CSV file not found at the specified path: data/missing.csv"
        );
    }
}
