//! Reads the input file into a classified [`Table`].

use std::{
    collections::HashMap,
    io::{ErrorKind, Read},
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    error::LoadError,
    frame::{Column, Table},
    io_utils, schema,
};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
}

pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let parse_error = |source: anyhow::Error| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let encoding =
        io_utils::resolve_encoding(options.encoding.as_deref()).map_err(parse_error)?;
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    info!(
        "Loading '{}' with delimiter '{}'",
        path.display(),
        io_utils::printable_delimiter(delimiter)
    );
    let reader = match io_utils::open_csv_reader_from_path(path, delimiter) {
        Ok(reader) => reader,
        Err(err) if is_not_found(&err) => {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(parse_error(err)),
    };
    let table = read_table(reader, encoding)
        .with_context(|| format!("Reading {path:?}"))
        .map_err(parse_error)?;
    info!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        table.row_count(),
        table.columns().len(),
        path
    );
    Ok(table)
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == ErrorKind::NotFound)
}

/// Reads headers and records from any CSV reader and classifies each column.
pub fn read_table<R: Read>(
    mut reader: csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Table> {
    let headers = io_utils::reader_headers(&mut reader, encoding).context("Reading header row")?;
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Ok(Table::empty());
    }
    let headers = dedupe_headers(&headers);

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        for (column, value) in raw_columns.iter_mut().zip(decoded) {
            column.push(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| {
            let column_type = schema::classify_values(&raw);
            debug!("Column '{name}' classified as {column_type}");
            let values = schema::parse_column(&raw, column_type);
            Column::new(name, column_type, values)
        })
        .collect();
    Table::new(columns)
}

/// Makes header names unique the way pandas' CSV reader does: an empty name
/// becomes `Unnamed: <index>`, and a repeated `X` becomes `X.1`, `X.2`, ...
/// A generated name that collides with a later header gains a further suffix,
/// so `X, X, X.1` reads as `X, X.1, X.1.1`.
pub fn dedupe_headers(headers: &[String]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::with_capacity(headers.len());
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let mut name = if header.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                header.clone()
            };
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), 1);
            name
        })
        .collect()
}
