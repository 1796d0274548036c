// cgmetrics Testdata - Dataset structures
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Dataset structures and I/O operations.
//!
//! A [`Dataset`] is a flat CGM export: one row per reading with a timestamp,
//! an optional glucose value and an optional subject ID. CSV files use the
//! `Time,Glucose[,ID]` header with `YYYY-MM-DD HH:MM:SS` timestamps.

use cgmetrics::{GlucoseSeries, Sample};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Timestamp format used in CSV files.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Dataset error types.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Empty dataset")]
    Empty,
}

/// A single CGM reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    /// Local clock time of the reading.
    pub time: NaiveDateTime,
    /// Glucose in mg/dL, `None` for a blank cell.
    pub glucose: Option<f64>,
    /// Subject identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl DatasetRow {
    /// Create a new row.
    pub fn new(time: NaiveDateTime, glucose: Option<f64>) -> Self {
        Self {
            time,
            glucose,
            id: None,
        }
    }

    /// Tag the row with a subject.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

/// Dataset metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Dataset name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Generation seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Nominal sample interval in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_interval_secs: Option<u32>,
}

/// A CGM export covering one or more subjects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Data rows.
    pub rows: Vec<DatasetRow>,
    /// Metadata.
    #[serde(default)]
    pub metadata: DatasetMetadata,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row.
    pub fn add_row(&mut self, row: DatasetRow) {
        self.rows.push(row);
    }

    /// Move every row of `other` to the end of this dataset.
    pub fn extend(&mut self, other: Dataset) {
        self.rows.extend(other.rows);
    }

    /// Get all rows.
    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    /// Get number of readings.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with a blank glucose cell.
    pub fn missing_count(&self) -> usize {
        self.rows.iter().filter(|r| r.glucose.is_none()).count()
    }

    /// Subject identifiers in order of first appearance.
    pub fn subject_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.rows.iter().filter_map(|r| r.id.as_deref()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Set name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.metadata.name = Some(name.to_string());
        self
    }

    /// Set description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.metadata.description = Some(description.to_string());
        self
    }

    /// Split into one series per subject, in order of first appearance.
    /// Rows without an ID form a single untagged series.
    pub fn to_series(&self) -> Vec<GlucoseSeries> {
        let mut groups: Vec<(Option<&str>, Vec<Sample>)> = Vec::new();
        for row in &self.rows {
            let id = row.id.as_deref();
            let sample = Sample::new(row.time, row.glucose.unwrap_or(f64::NAN));
            match groups.iter_mut().find(|(g, _)| *g == id) {
                Some((_, samples)) => samples.push(sample),
                None => groups.push((id, vec![sample])),
            }
        }

        groups
            .into_iter()
            .map(|(id, samples)| match id {
                Some(id) => GlucoseSeries::with_subject(id, samples),
                None => GlucoseSeries::new(samples),
            })
            .collect()
    }

    /// Flatten series back into rows.
    pub fn from_series(series: &[GlucoseSeries]) -> Self {
        let mut dataset = Dataset::new();
        for s in series {
            for sample in s.samples() {
                let glucose = sample.is_present().then_some(sample.glucose);
                let mut row = DatasetRow::new(sample.time, glucose);
                row.id = s.subject_id().map(str::to_string);
                dataset.add_row(row);
            }
        }
        dataset
    }

    /// Export to CSV file. The `ID` column is written when any row has one.
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let with_id = self.rows.iter().any(|r| r.id.is_some());

        // Header
        write!(writer, "Time,Glucose")?;
        if with_id {
            write!(writer, ",ID")?;
        }
        writeln!(writer)?;

        // Data rows
        for row in &self.rows {
            write!(writer, "{}", row.time.format(TIME_FORMAT))?;
            match row.glucose {
                Some(v) => write!(writer, ",{}", v)?,
                None => write!(writer, ",")?,
            }
            if with_id {
                write!(writer, ",{}", row.id.as_deref().unwrap_or(""))?;
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Import from CSV file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        // Parse header
        let header = lines.next().ok_or(DatasetError::Empty)??;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let position = |name: &str| columns.iter().position(|&c| c == name);

        let time_col = position("Time").ok_or_else(|| DatasetError::MissingColumn("Time".to_string()))?;
        let glucose_col =
            position("Glucose").ok_or_else(|| DatasetError::MissingColumn("Glucose".to_string()))?;
        let id_col = position("ID");

        let mut dataset = Dataset::new();

        // Parse data rows
        for (line_num, line_result) in lines.enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            let values: Vec<&str> = line.split(',').map(str::trim).collect();
            let cell = |i: usize| values.get(i).copied().unwrap_or("");

            let time = NaiveDateTime::parse_from_str(cell(time_col), TIME_FORMAT).map_err(|e| {
                DatasetError::CsvParse {
                    line: line_num + 2,
                    message: format!("Invalid timestamp: {}", e),
                }
            })?;

            let glucose = match cell(glucose_col) {
                "" => None,
                s => Some(s.parse().map_err(|_| DatasetError::CsvParse {
                    line: line_num + 2,
                    message: format!("Invalid glucose value {:?}", s),
                })?),
            };

            let mut row = DatasetRow::new(time, glucose);
            if let Some(id) = id_col.map(cell).filter(|s| !s.is_empty()) {
                row.id = Some(id.to_string());
            }
            dataset.rows.push(row);
        }

        Ok(dataset)
    }

    /// Export to JSON file.
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Import from JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let dataset = serde_json::from_reader(reader)?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn t(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minutes)
    }

    fn two_subjects() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.add_row(DatasetRow::new(t(0), Some(100.0)).with_id("a"));
        dataset.add_row(DatasetRow::new(t(0), Some(150.0)).with_id("b"));
        dataset.add_row(DatasetRow::new(t(5), None).with_id("a"));
        dataset.add_row(DatasetRow::new(t(5), Some(155.5)).with_id("b"));
        dataset
    }

    #[test]
    fn test_subject_ids_in_order() {
        assert_eq!(two_subjects().subject_ids(), vec!["a", "b"]);
        assert_eq!(two_subjects().missing_count(), 1);
    }

    #[test]
    fn test_to_series() {
        let series = two_subjects().to_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].subject_id(), Some("a"));
        assert_eq!(series[0].len(), 2);
        assert!(!series[0].samples()[1].is_present());
        assert_eq!(series[1].samples()[1].glucose, 155.5);
    }

    #[test]
    fn test_series_roundtrip() {
        let series = two_subjects().to_series();
        let back = Dataset::from_series(&series);
        assert_eq!(back.len(), 4);
        assert_eq!(back.missing_count(), 1);
        assert_eq!(back.subject_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_csv_roundtrip() {
        let dataset = two_subjects();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        dataset.to_csv(path).unwrap();
        let loaded = Dataset::from_csv(path).unwrap();

        assert_eq!(loaded.rows, dataset.rows);
    }

    #[test]
    fn test_csv_without_id_column() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Glucose,Time").unwrap();
        writeln!(temp_file, "101,2024-02-01 00:00:00").unwrap();
        writeln!(temp_file, ",2024-02-01 00:05:00").unwrap();
        temp_file.flush().unwrap();

        let loaded = Dataset::from_csv(temp_file.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.rows[0].glucose, Some(101.0));
        assert_eq!(loaded.rows[1].time, t(5));
        assert!(loaded.subject_ids().is_empty());
        assert_eq!(loaded.to_series()[0].subject_id(), None);
    }

    #[test]
    fn test_csv_errors() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Time,Value").unwrap();
        temp_file.flush().unwrap();
        assert!(matches!(
            Dataset::from_csv(temp_file.path()),
            Err(DatasetError::MissingColumn(_))
        ));

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Time,Glucose").unwrap();
        writeln!(temp_file, "yesterday,100").unwrap();
        temp_file.flush().unwrap();
        assert!(matches!(
            Dataset::from_csv(temp_file.path()),
            Err(DatasetError::CsvParse { line: 2, .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let dataset = two_subjects().with_name("pair");
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        dataset.to_json(path).unwrap();
        let loaded = Dataset::from_json(path).unwrap();

        assert_eq!(loaded.metadata.name, Some("pair".to_string()));
        assert_eq!(loaded.rows, dataset.rows);
    }
}
