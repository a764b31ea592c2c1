//! Plain-text rendering for report sections: aligned tables and horizontal
//! bar charts.
//!
//! Columns whose body cells are all numbers (blank cells allowed) are
//! right-aligned so magnitudes line up; everything else is left-aligned.

use std::borrow::Cow;
use std::fmt::Write as _;

use itertools::Itertools;

use crate::data::{self, format_measure};

const BAR_WIDTH: usize = 40;
const BAR: &str = "█";
const GUTTER: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct Layout {
    widths: Vec<usize>,
    aligns: Vec<Align>,
}

impl Layout {
    fn measure<'a>(headers: &[Cow<'a, str>], rows: &[Vec<Cow<'a, str>>]) -> Self {
        let widths = (0..headers.len())
            .map(|col| {
                rows.iter()
                    .filter_map(|row| row.get(col))
                    .chain(std::iter::once(&headers[col]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let aligns = (0..headers.len())
            .map(|col| {
                let mut body = rows.iter().filter_map(|row| row.get(col)).peekable();
                let numeric = body.peek().is_some()
                    && body.all(|cell| cell.is_empty() || data::parse_numeric(cell).is_some());
                if numeric { Align::Right } else { Align::Left }
            })
            .collect();
        Self { widths, aligns }
    }

    fn line<S: AsRef<str>>(&self, cells: &[S]) -> String {
        let line = self
            .widths
            .iter()
            .zip(&self.aligns)
            .enumerate()
            .map(|(col, (&width, &align))| {
                let text = cells.get(col).map_or("", |cell| cell.as_ref());
                pad(text, width, align)
            })
            .join(GUTTER);
        line.trim_end().to_string()
    }

    fn rule(&self) -> String {
        self.widths.iter().map(|&width| "-".repeat(width)).join(GUTTER)
    }
}

/// Renders `headers` and `rows` as an aligned table with a dashed rule under
/// the header. Cells beyond the header count are dropped.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let headers = headers.iter().map(|h| single_line(h)).collect::<Vec<_>>();
    let rows = rows
        .iter()
        .map(|row| {
            row.iter()
                .take(headers.len())
                .map(|cell| single_line(cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let layout = Layout::measure(&headers, &rows);

    let mut output = String::new();
    let _ = writeln!(output, "{}", layout.line(&headers));
    let _ = writeln!(output, "{}", layout.rule());
    for row in &rows {
        let _ = writeln!(output, "{}", layout.line(row));
    }
    output
}

/// Renders `(label, value)` pairs as bars scaled to the largest magnitude.
pub fn render_bars(series: &[(String, f64)]) -> String {
    let labels = series
        .iter()
        .map(|(label, _)| single_line(label))
        .collect::<Vec<_>>();
    let label_width = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let peak = series
        .iter()
        .map(|(_, value)| value.abs())
        .fold(0.0_f64, f64::max);

    let mut output = String::new();
    for (label, (_, value)) in labels.iter().zip(series) {
        let length = if peak > 0.0 {
            ((value.abs() / peak) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            output,
            "{}{GUTTER}{} {}",
            pad(label, label_width, Align::Left),
            BAR.repeat(length),
            format_measure(*value)
        );
    }
    output
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.chars().count()));
    match align {
        Align::Left => format!("{text}{fill}"),
        Align::Right => format!("{fill}{text}"),
    }
}

/// Line breaks and tabs inside a cell would break the grid.
fn single_line(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
