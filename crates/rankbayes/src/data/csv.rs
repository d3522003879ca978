//! File parsing for questionnaire exports.
//!
//! Survey tools export Likert responses as spreadsheets saved to CSV, often
//! with a UTF-8 byte-order mark and, in European locales, `;` as the field
//! separator with `,` as the decimal mark. Both variants are accepted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rankbayes_core::PairedSample;

use super::{DataError, LikertScale, LikertTable};

const BOM: char = '\u{feff}';

/// Load a Likert table from a CSV file.
///
/// # Example file content
/// ```csv
/// id,pre_1,pre_2,post_1,post_2
/// 1,3,4,5,5
/// 2,2,,4,6
/// ```
///
/// Fields may be quoted; a quoted field can contain the delimiter.
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `scale` - Admissible response range, checked for each item when it is
///   read through [`LikertTable::column`] or [`LikertTable::composite`].
///   Columns that are never requested, such as respondent ids, are not checked.
///
/// # Errors
/// Returns `DataError` if the file cannot be read, a row has the wrong
/// number of fields, or a cell is not numeric.
pub fn load_likert_csv(path: &Path, scale: LikertScale) -> Result<LikertTable, DataError> {
    let file = File::open(path)?;
    let table = read_likert_csv(BufReader::new(file), scale)?;
    Ok(table.with_source(path.to_string_lossy()))
}

/// Parse a Likert table from any buffered reader.
pub fn read_likert_csv<R: BufRead>(reader: R, scale: LikertScale) -> Result<LikertTable, DataError> {
    let mut lines = reader.lines().enumerate();

    // First non-blank line is the header
    let (headers, delimiter) = loop {
        let Some((_, line_result)) = lines.next() else {
            return Err(DataError::EmptyTable);
        };
        let line = line_result?;
        let line = line.trim_start_matches(BOM).trim();
        if line.is_empty() {
            continue;
        }
        let delimiter = detect_delimiter(line);
        let names: Vec<String> = split_fields(line, delimiter)
            .into_iter()
            .map(|h| unquote(h).to_string())
            .collect();
        break (names, delimiter);
    };

    let mut rows = Vec::new();
    let mut row_lines = Vec::new();
    for (line_num, line_result) in lines {
        let line = line_result?;
        let line = line.trim_end_matches(['\r', '\n']);

        // Skip blank lines
        if line.trim().is_empty() {
            continue;
        }

        let cells = split_fields(line, delimiter);
        if cells.len() != headers.len() {
            return Err(DataError::Parse {
                line: line_num + 1,
                message: format!("Expected {} columns, got {}", headers.len(), cells.len()),
            });
        }

        let row = cells
            .iter()
            .zip(&headers)
            .map(|(cell, column)| parse_cell(cell, delimiter, line_num + 1, column))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
        row_lines.push(line_num + 1);
    }

    Ok(LikertTable::new(headers, rows)?
        .with_lines(row_lines)
        .with_scale(scale))
}

/// Split on `delimiter` outside double quotes.
fn split_fields(line: &str, delimiter: char) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in line.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            fields.push(&line[start..i]);
            start = i + c.len_utf8();
        }
    }
    fields.push(&line[start..]);
    fields
}

/// `;` when the header has more semicolons than commas, `,` otherwise.
fn detect_delimiter(header: &str) -> char {
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas {
        ';'
    } else {
        ','
    }
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
        .trim()
}

fn parse_cell(
    cell: &str,
    delimiter: char,
    line: usize,
    column: &str,
) -> Result<Option<f64>, DataError> {
    let text = unquote(cell);
    if text.is_empty() || text.eq_ignore_ascii_case("na") {
        return Ok(None);
    }

    // Semicolon files use the decimal comma
    let normalized = if delimiter == ';' {
        text.replace(',', ".")
    } else {
        text.to_string()
    };

    let value: f64 = normalized
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| DataError::InvalidValue {
            line,
            column: column.to_string(),
            value: text.to_string(),
        })?;

    Ok(Some(value))
}

/// Load paired values from two separate files, paired by position.
///
/// # Arguments
/// * `x_path` - Path to file containing the first member of each pair
/// * `y_path` - Path to file containing the second member of each pair
///
/// # Errors
/// `DataError::Sample` wrapping `InputLengthMismatch` when the files hold
/// different numbers of values.
pub fn load_separate_files(x_path: &Path, y_path: &Path) -> Result<PairedSample, DataError> {
    let x = load_single_column_file(x_path)?;
    let y = load_single_column_file(y_path)?;
    tracing::debug!(
        x = %x_path.display(),
        y = %y_path.display(),
        n_x = x.len(),
        n_y = y.len(),
        "loaded separate value files"
    );
    Ok(PairedSample::new(x, y)?)
}

/// Load a single-column file of values. Blank lines and `#` comments are skipped.
pub fn load_single_column_file(path: &Path) -> Result<Vec<f64>, DataError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut values = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim_start_matches(BOM).trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        // Skip comments
        if line.starts_with('#') {
            continue;
        }

        let value: f64 = line
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| DataError::InvalidValue {
                line: line_num + 1,
                column: "value".to_string(),
                value: line.to_string(),
            })?;

        values.push(value);
    }

    Ok(values)
}
