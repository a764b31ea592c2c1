mod common;

use common::TestWorkspace;
use drug_eda::{
    aggregate,
    config::DashboardConfig,
    dashboard::{self, SearchRequest},
    data::Value,
    error::LoadError,
    frame::{Column, Table},
    impute,
    io_utils,
    load::{self, LoadOptions},
    report::SectionBody,
    schema::ColumnType,
    search::{self, SearchTarget},
};
use encoding_rs::UTF_8;
use proptest::prelude::*;

fn load_full(workspace: &TestWorkspace) -> Table {
    let path = workspace.full_dataset();
    load::load_table(&path, &LoadOptions::default()).expect("load dataset")
}

#[test]
fn loading_classifies_and_marks_missing_tokens() {
    let workspace = TestWorkspace::new();
    let table = load_full(&workspace);
    assert_eq!(table.row_count(), 5);
    assert_eq!(table.columns().len(), 14);

    let amount = table.column("Total Amount Reimbursed").expect("amount");
    assert_eq!(amount.column_type, ColumnType::Numeric);
    assert_eq!(amount.values[3], None);
    assert_eq!(amount.values[1], Some(Value::Float(800.0)));

    let units = table.column("Units Reimbursed").expect("units");
    assert_eq!(units.values[0], Some(Value::Integer(120)));
    assert_eq!(
        table.column("Product Name").expect("product").column_type,
        ColumnType::Text
    );
}

#[test]
fn prepare_fills_gaps_with_column_medians() {
    let workspace = TestWorkspace::new();
    let prepared = dashboard::prepare(load_full(&workspace));

    let amount = prepared.column("Total Amount Reimbursed").expect("amount");
    assert_eq!(amount.values[3], Some(Value::Float(2000.25)));
    let medicaid = prepared
        .column("Medicaid Amount Reimbursed")
        .expect("medicaid");
    assert_eq!(medicaid.values[2], Some(Value::Float(950.125)));
    assert!(prepared.columns().iter().all(|c| c.missing_count() == 0));

    for name in ["Year", "NDC", "Labeler Code", "Product Code", "Package Size", "Quarter"] {
        assert_eq!(
            prepared.column(name).expect("identifier").column_type,
            ColumnType::Categorical,
            "{name} should be categorical"
        );
    }
}

#[test]
fn missing_file_is_a_not_found_error() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("nope.csv");
    let err = load::load_table(&path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert_eq!(err.path(), &path);
}

#[test]
fn ragged_rows_are_parse_errors() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("ragged.csv", "a,b\n1,2\n3\n");
    let err = load::load_table(&path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
    assert!(err.to_string().starts_with("An error occurred:"));
}

#[test]
fn duplicate_headers_are_suffixed() {
    let data = "Units,Units,Name\n1,2,x\n";
    let reader = io_utils::open_csv_reader(data.as_bytes(), b',');
    let table = load::read_table(reader, UTF_8).expect("read table");
    assert_eq!(table.column_names(), vec!["Units", "Units.1", "Name"]);
}

#[test]
fn dashboard_over_partial_dataset_skips_only_comparison() {
    let workspace = TestWorkspace::new();
    let path = workspace.partial_dataset();
    let table = dashboard::prepare(
        load::load_table(&path, &LoadOptions::default()).expect("load partial"),
    );
    let config = DashboardConfig::default();
    let report = dashboard::build_dashboard(
        &table,
        &config,
        Some(&SearchRequest::new("b", SearchTarget::Column("Product Name".into()))),
    );

    let top = report
        .section("Top 10 Drugs by Total Reimbursement")
        .expect("top section");
    let SectionBody::Series { result, .. } = &top.body else {
        panic!("expected series, got {:?}", top.body);
    };
    assert_eq!(
        result.series(0),
        vec![("B".to_string(), 300.0), ("A".to_string(), 150.0)]
    );

    let comparison = report
        .section("Medicaid vs. Non-Medicaid Amount Comparison")
        .expect("comparison section");
    assert!(comparison.is_skipped());
    assert_eq!(report.sections.iter().filter(|s| s.is_skipped()).count(), 1);

    let matches = report
        .section("Search Results for 'b' in Product Name")
        .expect("search section");
    assert!(matches!(matches.body, SectionBody::Rows { total_rows: 1, .. }));
}

fn numeric_table(keys: &[u8], amounts: &[i64]) -> Table {
    Table::new(vec![
        Column::new(
            "Product Name",
            ColumnType::Text,
            keys.iter()
                .map(|k| Some(Value::String(format!("DRUG {k}"))))
                .collect(),
        ),
        Column::new(
            "Total Amount Reimbursed",
            ColumnType::Numeric,
            amounts.iter().map(|a| Some(Value::Integer(*a))).collect(),
        ),
    ])
    .expect("build table")
}

proptest! {
    #[test]
    fn median_matches_sorted_midpoint(values in proptest::collection::vec(-1_000i64..1_000, 1..40)) {
        let cells = values.iter().map(|v| Some(Value::Integer(*v))).collect::<Vec<_>>();
        let mut sorted = values.clone();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        let expected = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
        } else {
            sorted[mid] as f64
        };
        prop_assert_eq!(impute::median(&cells), Some(expected));
    }

    #[test]
    fn imputation_leaves_no_numeric_gaps(
        values in proptest::collection::vec(proptest::option::of(-500i64..500), 1..30)
    ) {
        prop_assume!(values.iter().any(Option::is_some));
        let table = Table::new(vec![Column::new(
            "Units Reimbursed",
            ColumnType::Numeric,
            values.iter().map(|v| v.map(Value::Integer)).collect(),
        )])
        .expect("build table");
        let imputed = impute::impute_missing(table);
        let column = imputed.column("Units Reimbursed").expect("column");
        prop_assert_eq!(column.missing_count(), 0);
        for (before, after) in values.iter().zip(&column.values) {
            if let Some(v) = before {
                prop_assert_eq!(after.as_ref().and_then(Value::as_f64), Some(*v as f64));
            }
        }
    }

    #[test]
    fn top_n_is_bounded_and_descending(
        rows in proptest::collection::vec((0u8..12, 0i64..10_000), 0..60),
        n in 1usize..15
    ) {
        let (keys, amounts): (Vec<u8>, Vec<i64>) = rows.into_iter().unzip();
        let table = numeric_table(&keys, &amounts);
        let result = aggregate::top_n(&table, "Product Name", "Total Amount Reimbursed", n)
            .expect("top n");
        let distinct = keys.iter().collect::<std::collections::HashSet<_>>().len();
        prop_assert_eq!(result.len(), distinct.min(n));
        let sums = result.series(0).into_iter().map(|(_, v)| v).collect::<Vec<_>>();
        prop_assert!(sums.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn filtering_twice_is_filtering_once(
        rows in proptest::collection::vec((0u8..30, 0i64..1_000), 0..40),
        query in "[0-9a-zA-Z ]{0,4}"
    ) {
        let (keys, amounts): (Vec<u8>, Vec<i64>) = rows.into_iter().unzip();
        let table = numeric_table(&keys, &amounts);
        let once = search::filter(&table, &query, &SearchTarget::AllColumns).expect("filter");
        let twice = search::filter(&once, &query, &SearchTarget::AllColumns).expect("filter");
        prop_assert!(once.row_count() <= table.row_count());
        prop_assert_eq!(once, twice);
    }
}
