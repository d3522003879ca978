//! Data loading for survey-style rank tests.
//!
//! This module turns questionnaire exports and literal value lists into the
//! validated sample types of `rankbayes-core`.
//!
//! # Supported Formats
//!
//! - **Likert CSV**: header row of item names, one row per respondent, one
//!   column per item. UTF-8 with or without BOM, `,` or `;` delimited,
//!   empty cells treated as missing.
//! - **Separate files**: two files with one value per line, paired by line.
//! - **Literal lists**: `"1, 2.5, 3"` as typed on the command line.
//!
//! # Example
//!
//! ```ignore
//! use rankbayes::data::{load_likert_csv, LikertScale};
//! use std::path::Path;
//!
//! let table = load_likert_csv(Path::new("responses.csv"), LikertScale::default())?;
//! let sample = table.paired(&["post_1", "post_2"], &["pre_1", "pre_2"])?;
//! println!("{} complete pairs", sample.len());
//! ```

mod csv;

pub use csv::{load_likert_csv, load_separate_files, load_single_column_file, read_likert_csv};

use std::fmt;

use rankbayes_core::{PairedSample, RankTestError};

/// Errors that can occur during data loading.
#[derive(Debug)]
pub enum DataError {
    /// IO error reading file.
    Io(std::io::Error),

    /// Structural problem at a specific line.
    Parse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Description of the parse error.
        message: String,
    },

    /// Requested item is not a column of the table.
    UnknownColumn {
        /// The requested name.
        name: String,
        /// Column names present in the table.
        available: Vec<String>,
    },

    /// A composite was requested over zero items.
    NoItems,

    /// Cell that is neither empty nor a number.
    InvalidValue {
        /// Line number (1-indexed).
        line: usize,
        /// Column name or position.
        column: String,
        /// The offending text.
        value: String,
    },

    /// Number outside the Likert scale.
    OutOfScale {
        /// Line number (1-indexed).
        line: usize,
        /// Column name.
        column: String,
        /// The offending value.
        value: f64,
        /// Scale the value was checked against.
        scale: LikertScale,
    },

    /// The file holds a header but no data rows, or nothing at all.
    EmptyTable,

    /// The loaded values do not form a valid sample.
    Sample(RankTestError),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "IO error: {}", e),
            DataError::Parse { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
            DataError::UnknownColumn { name, available } => {
                write!(f, "Unknown column '{}'. Available columns: {:?}", name, available)
            }
            DataError::NoItems => write!(f, "No items given for composite score"),
            DataError::InvalidValue {
                line,
                column,
                value,
            } => {
                write!(f, "Invalid value at line {}, column {}: '{}'", line, column, value)
            }
            DataError::OutOfScale {
                line,
                column,
                value,
                scale,
            } => {
                write!(
                    f,
                    "Value {} at line {}, column {} is outside the scale {}",
                    value, line, column, scale
                )
            }
            DataError::EmptyTable => write!(f, "Table contains no data rows"),
            DataError::Sample(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(e) => Some(e),
            DataError::Sample(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        DataError::Io(e)
    }
}

impl From<RankTestError> for DataError {
    fn from(e: RankTestError) -> Self {
        DataError::Sample(e)
    }
}

/// Inclusive range of admissible Likert responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct LikertScale {
    /// Lowest response option.
    pub min: i32,
    /// Highest response option.
    pub max: i32,
}

impl LikertScale {
    /// Scale from `min` to `max` inclusive.
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the scale.
    pub fn contains(&self, value: f64) -> bool {
        value >= f64::from(self.min) && value <= f64::from(self.max)
    }
}

impl Default for LikertScale {
    /// Seven-point scale, 1..=7.
    fn default() -> Self {
        Self::new(1, 7)
    }
}

impl fmt::Display for LikertScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// A table of Likert responses: one row per respondent, one column per item.
///
/// Cells are stored as parsed. When a scale is attached, responses are
/// checked against it only for the items actually requested, so identifier
/// or free-numeric columns never trip the check.
#[derive(Debug, Clone)]
pub struct LikertTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
    lines: Vec<usize>,
    scale: Option<LikertScale>,
    source: Option<String>,
}

impl LikertTable {
    /// Build a table from parsed cells. Every row must have one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<f64>>>) -> Result<Self, DataError> {
        if rows.is_empty() {
            return Err(DataError::EmptyTable);
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            return Err(DataError::Parse {
                line: i + 2,
                message: format!("Expected {} columns, got {}", headers.len(), row.len()),
            });
        }
        let lines = (2..rows.len() + 2).collect();
        Ok(Self {
            headers,
            rows,
            lines,
            scale: None,
            source: None,
        })
    }

    /// Check requested items against `scale`.
    pub fn with_scale(mut self, scale: LikertScale) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Source line of every row, for error messages. Ignored unless there
    /// is one line number per row.
    pub(crate) fn with_lines(mut self, lines: Vec<usize>) -> Self {
        if lines.len() == self.rows.len() {
            self.lines = lines;
        }
        self
    }

    /// Attach the name of the file the table came from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of respondents.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Scale responses are checked against, if any.
    pub fn scale(&self) -> Option<LikertScale> {
        self.scale
    }

    /// Where the table was loaded from, if known.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn index_of(&self, name: &str) -> Result<usize, DataError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::UnknownColumn {
                name: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Responses to one item, `None` where missing.
    ///
    /// # Errors
    /// `UnknownColumn` for a name not in the header, `OutOfScale` for the
    /// first present response outside the attached scale.
    pub fn column(&self, name: &str) -> Result<Vec<Option<f64>>, DataError> {
        let idx = self.index_of(name)?;
        self.check_scale(idx)?;
        Ok(self.rows.iter().map(|row| row[idx]).collect())
    }

    fn check_scale(&self, idx: usize) -> Result<(), DataError> {
        let Some(scale) = self.scale else {
            return Ok(());
        };
        let offending = self
            .rows
            .iter()
            .zip(&self.lines)
            .find_map(|(row, &line)| row[idx].filter(|v| !scale.contains(*v)).map(|v| (line, v)));
        match offending {
            Some((line, value)) => Err(DataError::OutOfScale {
                line,
                column: self.headers[idx].clone(),
                value,
                scale,
            }),
            None => Ok(()),
        }
    }

    /// Per-respondent mean over `items`; missing if any item is missing.
    pub fn composite<S: AsRef<str>>(&self, items: &[S]) -> Result<Vec<Option<f64>>, DataError> {
        if items.is_empty() {
            return Err(DataError::NoItems);
        }
        let indices = items
            .iter()
            .map(|name| self.index_of(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        for &idx in &indices {
            self.check_scale(idx)?;
        }
        let k = indices.len() as f64;

        Ok(self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row[i])
                    .sum::<Option<f64>>()
                    .map(|total| total / k)
            })
            .collect())
    }

    /// Paired composites with listwise deletion of incomplete respondents.
    pub fn paired<S: AsRef<str>>(
        &self,
        x_items: &[S],
        y_items: &[S],
    ) -> Result<PairedSample, DataError> {
        let x = self.composite(x_items)?;
        let y = self.composite(y_items)?;

        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .into_iter()
            .zip(y)
            .filter_map(|(a, b)| Some((a?, b?)))
            .unzip();

        let dropped = self.rows.len() - xs.len();
        if dropped > 0 {
            tracing::debug!(dropped, kept = xs.len(), "listwise deletion of incomplete rows");
        }
        Ok(PairedSample::new(xs, ys)?)
    }
}

/// Parse a literal list such as `"1, 2.5, 3"` or `"1 2.5 3"`.
pub fn parse_values(text: &str) -> Result<Vec<f64>, DataError> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, s)| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::InvalidValue {
                    line: 1,
                    column: format!("item {}", i + 1),
                    value: s.to_string(),
                })
        })
        .collect()
}
