//! Delimited-text reader for Eurostat extracts.
//!
//! Every extract carries a fixed block of metadata rows before the header
//! row. The reader skips that block, auto-detects the delimiter unless one
//! is configured, and returns the table together with provenance metadata.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{EurofactError, Result};

use super::table::RawTable;

/// Delimiters tried when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Metadata rows before the header row.
    pub skip_rows: usize,
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            skip_rows: 8,
            delimiter: None,
            quote: b'"',
        }
    }
}

/// Provenance metadata for a loaded source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding metadata block and header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the source was loaded.
    pub loaded_at: DateTime<Utc>,
}

/// Reads source extracts into raw tables.
pub struct Reader {
    config: ReaderConfig,
}

impl Reader {
    /// Create a new reader with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a file and return the raw table and its provenance metadata.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<(RawTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| EurofactError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| EurofactError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents, self.config.skip_rows)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let metadata = SourceMetadata {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash,
            size_bytes: contents.len() as u64,
            format,
            row_count: table.row_count(),
            column_count: table.column_count(),
            loaded_at: Utc::now(),
        };

        Ok((table, metadata))
    }

    /// Parse bytes directly: skip the metadata block, take the next row as
    /// the header, pad/truncate data rows to the header width.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(|s| s.to_string()).collect());
        }

        if records.len() <= self.config.skip_rows {
            return Err(EurofactError::EmptyData(format!(
                "no header row after skipping {} metadata rows",
                self.config.skip_rows
            )));
        }

        let mut tail = records.split_off(self.config.skip_rows);
        let headers = tail.remove(0);
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(EurofactError::EmptyData("blank header row".to_string()));
        }

        let expected = headers.len();
        for row in &mut tail {
            row.resize(expected, String::new());
        }

        Ok(RawTable::new(headers, tail))
    }
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter from the lines after the metadata block, which are
/// the only ones with a regular shape.
fn detect_delimiter(bytes: &[u8], skip_rows: usize) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .skip(skip_rows)
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(EurofactError::EmptyData(
            "no lines to analyze after the metadata block".to_string(),
        ));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent per-line counts outrank raw frequency.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
