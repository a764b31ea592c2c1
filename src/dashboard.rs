//! The drug-utilization dashboard: cleaning plus the standard set of views.
//!
//! Each view is an [`Analysis`] that declares the columns it needs, so a
//! dataset missing, say, the Medicaid split still gets every other view and a
//! warning in place of the comparison.

use log::{info, warn};

use crate::{
    aggregate::{self, AggregationResult},
    capability::{self, Computation, Requirements},
    config::DashboardConfig,
    error::Unavailable,
    frame::Table,
    impute, normalize,
    report::{Report, Section, SectionBody},
    search::{self, SearchOutcome, SearchTarget},
};

pub const PRODUCT_NAME: &str = "Product Name";
pub const TOTAL_AMOUNT: &str = "Total Amount Reimbursed";
pub const UNITS: &str = "Units Reimbursed";
pub const UTILIZATION_TYPE: &str = "Utilization Type";
pub const MEDICAID_AMOUNT: &str = "Medicaid Amount Reimbursed";
pub const NON_MEDICAID_AMOUNT: &str = "Non Medicaid Amount Reimbursed";

const NO_DATA_MESSAGE: &str = "No data available for EDA.";

/// Imputes gaps and retags identifier columns.
pub fn prepare(table: Table) -> Table {
    let table = impute::impute_missing(table);
    normalize::normalize_categoricals(table)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    TopByReimbursement,
    TopByUnits,
    UnitsByUtilization,
    AmountByUtilization,
    MedicaidComparison,
}

impl Analysis {
    pub const ALL: [Analysis; 5] = [
        Analysis::TopByReimbursement,
        Analysis::TopByUnits,
        Analysis::UnitsByUtilization,
        Analysis::AmountByUtilization,
        Analysis::MedicaidComparison,
    ];

    /// Views that are recomputed over search matches.
    pub const SEARCHABLE: [Analysis; 4] = [
        Analysis::TopByReimbursement,
        Analysis::TopByUnits,
        Analysis::UnitsByUtilization,
        Analysis::AmountByUtilization,
    ];

    pub fn title(&self, config: &DashboardConfig) -> String {
        match self {
            Analysis::TopByReimbursement => {
                format!("Top {} Drugs by Total Reimbursement", config.top_n)
            }
            Analysis::TopByUnits => format!("Top {} Drugs by Units Reimbursed", config.top_n),
            Analysis::UnitsByUtilization => "Total Units Reimbursed by Utilization Type".into(),
            Analysis::AmountByUtilization => "Total Amount Reimbursed by Utilization Type".into(),
            Analysis::MedicaidComparison => "Medicaid vs. Non-Medicaid Amount Comparison".into(),
        }
    }

    fn measure(&self) -> &'static str {
        match self {
            Analysis::TopByReimbursement | Analysis::AmountByUtilization => TOTAL_AMOUNT,
            Analysis::TopByUnits | Analysis::UnitsByUtilization => UNITS,
            Analysis::MedicaidComparison => "Total Amount",
        }
    }

    fn is_scaled(&self) -> bool {
        !matches!(self, Analysis::TopByReimbursement | Analysis::TopByUnits)
    }

    pub fn run(
        &self,
        table: &Table,
        config: &DashboardConfig,
    ) -> Result<AggregationResult, Unavailable> {
        let result = match self {
            Analysis::TopByReimbursement | Analysis::TopByUnits => {
                aggregate::top_n(table, PRODUCT_NAME, self.measure(), config.top_n)
            }
            Analysis::UnitsByUtilization | Analysis::AmountByUtilization => {
                aggregate::trend_by_category(table, UTILIZATION_TYPE, &[self.measure()])
            }
            Analysis::MedicaidComparison => aggregate::column_totals(
                table,
                &[MEDICAID_AMOUNT, NON_MEDICAID_AMOUNT],
                "Reimbursement Type",
                self.measure(),
            ),
        }?;
        Ok(if self.is_scaled() {
            result.scaled(config.scale)
        } else {
            result
        })
    }

    pub fn section(&self, title: String, table: &Table, config: &DashboardConfig) -> Section {
        let unit = self.is_scaled().then(|| config.scale_label()).flatten();
        Section::series(title, self.run(table, config), self.measure(), unit)
    }
}

impl Computation for Analysis {
    fn requirements(&self) -> Requirements {
        match self {
            Analysis::TopByReimbursement | Analysis::TopByUnits => {
                Requirements::new().column(PRODUCT_NAME).measure(self.measure())
            }
            Analysis::UnitsByUtilization | Analysis::AmountByUtilization => Requirements::new()
                .column(UTILIZATION_TYPE)
                .measure(self.measure()),
            Analysis::MedicaidComparison => {
                Requirements::new().measures([MEDICAID_AMOUNT, NON_MEDICAID_AMOUNT])
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub target: SearchTarget,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, target: SearchTarget) -> Self {
        Self {
            query: query.into(),
            target,
        }
    }
}

/// Builds the full dashboard for an already-prepared table.
pub fn build_dashboard(
    table: &Table,
    config: &DashboardConfig,
    search: Option<&SearchRequest>,
) -> Report {
    let mut report = Report::new(config.title.clone());
    if table.is_empty() {
        report.push(Section::new(
            config.overview_title(),
            SectionBody::NoData {
                message: NO_DATA_MESSAGE.to_string(),
            },
        ));
        return report;
    }

    report.push(Section::rows(
        config.overview_title(),
        table,
        config.preview_rows,
    ));
    for (analysis, availability) in capability::plan(table, &Analysis::ALL) {
        let title = analysis.title(config);
        let section = match availability {
            Ok(()) => analysis.section(title, table, config),
            Err(unavailable) => {
                warn!("Skipping '{title}': {unavailable}");
                Section::series(title, Err(unavailable), analysis.measure(), None)
            }
        };
        report.push(section);
    }
    if let Some(request) = search {
        for section in search_sections(table, config, request) {
            report.push(section);
        }
    }
    info!(
        "Dashboard built with {} section(s), {} skipped",
        report.sections.len(),
        report.sections.iter().filter(|s| s.is_skipped()).count()
    );
    report
}

/// Sections for one search: the matching rows followed by the searchable
/// views recomputed over them. An empty query contributes nothing.
pub fn search_sections(
    table: &Table,
    config: &DashboardConfig,
    request: &SearchRequest,
) -> Vec<Section> {
    type View<'a> = Box<dyn Fn(&Table) -> Result<AggregationResult, Unavailable> + 'a>;
    let views = Analysis::SEARCHABLE
        .iter()
        .map(|&analysis| {
            let run: View<'_> = Box::new(move |subset: &Table| analysis.run(subset, config));
            (analysis.title(config), run)
        })
        .collect::<Vec<_>>();

    let heading = format!(
        "Search Results for '{}' in {}",
        request.query, request.target
    );
    match search::search(table, &request.query, &request.target, &views) {
        SearchOutcome::Unfiltered => Vec::new(),
        SearchOutcome::ColumnUnavailable(unavailable) => vec![Section::new(
            heading,
            SectionBody::Skipped {
                reason: unavailable.to_string(),
            },
        )],
        SearchOutcome::NoResults { query, target } => vec![Section::new(
            heading,
            SectionBody::NoResults {
                query,
                target: target.to_string(),
            },
        )],
        SearchOutcome::Matches(result) => {
            let mut sections = vec![Section::rows(heading, &result.table, config.preview_rows)];
            for (analysis, scoped) in Analysis::SEARCHABLE.iter().zip(result.aggregations) {
                let unit = analysis.is_scaled().then(|| config.scale_label()).flatten();
                sections.push(Section::series(
                    format!("{} (search results)", scoped.title),
                    scoped.outcome,
                    analysis.measure(),
                    unit,
                ));
            }
            sections
        }
    }
}
