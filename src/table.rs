//! Typed feature rows and the output table.
//!
//! The column schema belongs to the row type, so a table reports its full
//! schema even when it holds no rows.

use crate::error::Result;
use crate::features::{WindowFeatures, METRIC_COLUMNS, RANDOM_DAY_METRICS};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Write as _;

/// Fixed-hour schema: identifier plus every metric column.
pub const FIXED_HOUR_COLUMNS: [&str; 29] = [
    "id",
    "mean",
    "median",
    "min",
    "max",
    "fq",
    "tq",
    "interdaysd",
    "interdaycv",
    "TOR",
    "TIR",
    "MGE",
    "MGN",
    "J_index",
    "LBGI",
    "HBGI",
    "ADRR",
    "TA140",
    "TA200",
    "TIR_70_180",
    "TA180",
    "TA250",
    "TB70",
    "TB54",
    "TITR",
    "GRI",
    "PA140",
    "PA180",
    "PA200",
];

/// Random-day schema: identifier plus the leading distribution, band and
/// risk metrics.
pub const RANDOM_DAY_COLUMNS: [&str; 19] = [
    "id",
    "mean",
    "median",
    "min",
    "max",
    "fq",
    "tq",
    "interdaysd",
    "interdaycv",
    "TOR",
    "TIR",
    "MGE",
    "MGN",
    "J_index",
    "LBGI",
    "HBGI",
    "ADRR",
    "TA140",
    "TA200",
];

/// A table row with a schema fixed by its type.
pub trait FeatureRow: Clone {
    /// Column names, `id` first.
    const COLUMNS: &'static [&'static str];

    /// Row identifier.
    fn id(&self) -> &str;

    /// Metric cells in `COLUMNS[1..]` order.
    fn cells(&self) -> Vec<Option<f64>>;

    /// First metric column holding a non-finite value, if any. Deliberately
    /// absent cells do not count.
    fn undefined_column(&self) -> Option<&'static str>;
}

/// One accepted fixed-hour window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedHourRow {
    pub id: String,
    #[serde(flatten)]
    pub features: WindowFeatures,
}

impl FixedHourRow {
    /// Row for window `number` of `subject`, labeled `{subject}_win{number}`.
    pub fn new(subject: &str, number: u32, features: WindowFeatures) -> Self {
        Self {
            id: format!("{}_win{}", subject, number),
            features,
        }
    }
}

impl FeatureRow for FixedHourRow {
    const COLUMNS: &'static [&'static str] = &FIXED_HOUR_COLUMNS;

    fn id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<Option<f64>> {
        self.features.cells().to_vec()
    }

    fn undefined_column(&self) -> Option<&'static str> {
        first_non_finite(&self.features.values())
    }
}

/// The single random-day row of a subject. `features` is `None` when no
/// window qualified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomDayRow {
    pub id: String,
    pub features: Option<WindowFeatures>,
}

impl RandomDayRow {
    /// Row for a selected window.
    pub fn new(subject: &str, features: WindowFeatures) -> Self {
        Self {
            id: subject.to_string(),
            features: Some(features),
        }
    }

    /// Placeholder row with every metric absent.
    pub fn empty(subject: &str) -> Self {
        Self {
            id: subject.to_string(),
            features: None,
        }
    }
}

impl FeatureRow for RandomDayRow {
    const COLUMNS: &'static [&'static str] = &RANDOM_DAY_COLUMNS;

    fn id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<Option<f64>> {
        match &self.features {
            Some(features) => features.cells()[..RANDOM_DAY_METRICS].to_vec(),
            None => vec![None; RANDOM_DAY_METRICS],
        }
    }

    fn undefined_column(&self) -> Option<&'static str> {
        self.features
            .as_ref()
            .and_then(|f| first_non_finite(&f.values()[..RANDOM_DAY_METRICS]))
    }
}

fn first_non_finite(values: &[f64]) -> Option<&'static str> {
    values
        .iter()
        .position(|v| !v.is_finite())
        .map(|i| METRIC_COLUMNS[i])
}

/// Ordered rows of one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable<R> {
    rows: Vec<R>,
}

impl<R: FeatureRow> FeatureTable<R> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Column names, `id` first.
    pub fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    /// Append a row.
    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    /// Move every row of `other` to the end of this table.
    pub fn append(&mut self, other: FeatureTable<R>) {
        self.rows.extend(other.rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Row identifiers in order.
    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.id()).collect()
    }

    /// Every cell of a metric column, or `None` for an unknown name (or
    /// `id`, see [`ids`](Self::ids)).
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let index = R::COLUMNS.iter().skip(1).position(|&c| c == name)?;
        Some(self.rows.iter().map(|r| r.cells()[index]).collect())
    }

    /// `{"columns": [...], "rows": [[id, v, ...], ...]}` with `null` for
    /// absent cells.
    pub fn to_json(&self) -> Result<String> {
        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|r| {
                let mut row = vec![Value::from(r.id())];
                row.extend(r.cells().into_iter().map(Value::from));
                Value::Array(row)
            })
            .collect();
        let doc = json!({ "columns": R::COLUMNS, "rows": rows });
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Human-readable table.
    pub fn report(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "Feature table: {} rows x {} columns", self.len(), R::COLUMNS.len());
        let _ = writeln!(report, "{}", R::COLUMNS.join("\t"));

        for row in &self.rows {
            let cells: Vec<String> = row
                .cells()
                .iter()
                .map(|c| match c {
                    Some(v) => format!("{:.3}", v),
                    None => "-".to_string(),
                })
                .collect();
            let _ = writeln!(report, "{}\t{}", row.id(), cells.join("\t"));
        }

        report
    }
}

impl<R: FeatureRow> Default for FeatureTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FeatureRow> FromIterator<R> for FeatureTable<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a, R> IntoIterator for &'a FeatureTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
