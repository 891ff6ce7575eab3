//! Agent results to CSV and back.
//!
//! Agent results are JSON: an array of records, or a single record for
//! per-URL summaries. Each query type has a fixed two-column schema.

use crate::error::{Error, Result};
use jsonschema::error::ValidationErrorKind;
use serde_json::{Map, Value, json};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Timestamp format used in output file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What an agent was asked for; selects task phrasing and CSV columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryType {
    /// Article names and URLs
    Urls,
    /// Article names and summaries
    Summary,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Urls => "urls",
            QueryType::Summary => "summary",
        }
    }

    /// CSV header, in column order.
    pub fn columns(&self) -> [&'static str; 2] {
        match self {
            QueryType::Urls => ["name", "url"],
            QueryType::Summary => ["name", "summary"],
        }
    }

    /// Prefix of the output file name.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            QueryType::Urls => "wiki_articles",
            QueryType::Summary => "wiki_summary",
        }
    }

    /// JSON Schema the parsed agent result must satisfy.
    ///
    /// Columns may be missing from a record but no other keys are allowed.
    fn schema(&self) -> Value {
        let [first, second] = self.columns();
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": { first: {}, second: {} },
                "additionalProperties": false,
            }
        })
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "urls" => Ok(QueryType::Urls),
            "summary" => Ok(QueryType::Summary),
            other => Err(Error::InvalidArgument(format!(
                "query type must be 'urls' or 'summary', got '{}'",
                other
            ))),
        }
    }
}

/// How to pick the most recent CSV file in a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LatestBy {
    /// Greatest file name; relies on zero-padded timestamps in names
    #[default]
    Name,
    /// Newest modification time, ties broken by name
    Modified,
}

/// Current local time formatted for file names.
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `<prefix>_<timestamp>.csv`, or `<prefix>_<timestamp>_<seq>.csv` with a
/// zero-padded sequence number.
pub fn output_file_name(prefix: &str, timestamp: &str, seq: Option<usize>) -> String {
    match seq {
        Some(seq) => format!("{}_{}_{:03}.csv", prefix, timestamp, seq),
        None => format!("{}_{}.csv", prefix, timestamp),
    }
}

/// Parse an agent result into records of the given schema.
///
/// A record with keys outside the schema's columns is a write error; any
/// other shape mismatch is a data format error.
pub fn parse_records(json: &str, query_type: QueryType) -> Result<Vec<Map<String, Value>>> {
    let value: Value = match serde_json::from_str(json)? {
        // Results that were JSON-encoded twice arrive as a string.
        Value::String(inner) => serde_json::from_str(&inner)?,
        value => value,
    };
    let value = match value {
        Value::Object(_) => Value::Array(vec![value]),
        other => other,
    };

    let validator = jsonschema::validator_for(&query_type.schema())
        .map_err(|e| Error::DataFormat(e.to_string()))?;
    let mut unexpected = Vec::new();
    let mut problems = Vec::new();
    for error in validator.iter_errors(&value) {
        match &error.kind {
            ValidationErrorKind::AdditionalProperties { unexpected: keys } => {
                unexpected.extend(keys.iter().cloned())
            }
            _ => problems.push(error.to_string()),
        }
    }
    if !problems.is_empty() {
        return Err(Error::DataFormat(format!(
            "expected {} records: {}",
            query_type,
            problems.join("; ")
        )));
    }
    if !unexpected.is_empty() {
        return Err(Error::Write(format!(
            "record contains fields not in {}: {}",
            query_type.columns().join(", "),
            unexpected.join(", ")
        )));
    }

    let Value::Array(items) = value else {
        return Err(Error::DataFormat("expected an array of records".to_string()));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(Error::DataFormat(format!("expected a record, got {}", other))),
        })
        .collect()
}

fn cell(record: &Map<String, Value>, column: &str) -> String {
    match record.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn write_records(
    path: &Path,
    records: &[Map<String, Value>],
    query_type: QueryType,
) -> std::result::Result<(), csv::Error> {
    let columns = query_type.columns();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;
    for record in records {
        writer.write_record(columns.map(|c| cell(record, c)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write an agent result to `dir/file_name` as CSV.
///
/// Nothing is created when `json` is not a valid result. The directory is
/// created if needed and an existing file of the same name is replaced.
pub fn write_results(
    json: &str,
    dir: &Path,
    file_name: &str,
    query_type: QueryType,
) -> Result<PathBuf> {
    let records = parse_records(json, query_type)?;

    fs::create_dir_all(dir).map_err(|e| Error::Write(e.to_string()))?;
    let path = dir.join(file_name);
    write_records(&path, &records, query_type).map_err(|e| Error::Write(e.to_string()))?;

    tracing::debug!(path = %path.display(), rows = records.len(), "wrote CSV");
    Ok(path)
}

/// Read the `url` column of a CSV file, in row order.
///
/// A file without a `url` column yields no URLs. Rows may have more or fewer
/// fields than the header; a row too short to have a `url` is skipped.
pub fn read_urls(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let Some(index) = reader.headers()?.iter().position(|h| h == "url") else {
        return Ok(Vec::new());
    };

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(url) = record.get(index) {
            urls.push(url.to_string());
        }
    }
    Ok(urls)
}

/// Find the most recent CSV file in `dir`.
///
/// Returns `None` when the directory is missing or holds no CSV files.
pub fn latest_csv(dir: &Path, by: LatestBy) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            let modified = entry.metadata()?.modified()?;
            candidates.push((path, modified));
        }
    }

    let latest = match by {
        LatestBy::Name => candidates.into_iter().max_by(|a, b| a.0.file_name().cmp(&b.0.file_name())),
        LatestBy::Modified => candidates
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.file_name().cmp(&b.0.file_name()))),
    };
    Ok(latest.map(|(path, _)| path))
}
