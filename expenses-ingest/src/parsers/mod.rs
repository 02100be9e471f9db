//! Per-source adapters turning raw exports into canonical records.
//!
//! Every adapter fails the whole file on the first malformed date or amount
//! and returns its records sorted by date (stable, so same-day rows keep
//! file order).

pub mod amex_cobalt;
pub mod cibc_visa;
pub mod rbc_chequing;
pub mod rbc_mastercard;

use chrono::NaiveDate;
use expenses_core::{Source, Txn};
use std::path::Path;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::types::{RawRow, RawTable};

/// Normalization capability shared by all source formats
pub trait SourceAdapter {
    fn source(&self) -> Source;

    /// Name of the date column, also used to locate the header row
    fn date_column(&self) -> &'static str;

    fn normalize(&self, table: &RawTable) -> Result<Vec<Txn>>;
}

pub fn adapter_for(source: Source) -> &'static dyn SourceAdapter {
    match source {
        Source::RbcChequing => &rbc_chequing::RbcChequing,
        Source::RbcMastercard => &rbc_mastercard::RbcMastercard,
        Source::CibcVisa => &cibc_visa::CibcVisa,
        Source::AmexCobalt => &amex_cobalt::AmexCobalt,
    }
}

/// Normalize an already-loaded table for `source`
pub fn normalize(source: Source, table: &RawTable) -> Result<Vec<Txn>> {
    adapter_for(source).normalize(table)
}

/// Read an export file (CSV or spreadsheet) and normalize it
pub fn load_export(source: Source, path: &Path) -> Result<Vec<Txn>> {
    let adapter = adapter_for(source);
    let table = RawTable::from_path(path, adapter.date_column())?;
    let txns = adapter.normalize(&table)?;
    info!(
        source = %source,
        path = %path.display(),
        rows = table.rows.len(),
        records = txns.len(),
        "normalized export"
    );
    Ok(txns)
}

/// Strict numeric `YYYY?MM?DD` layout
pub(crate) struct YmdFormat {
    pub separator: u8,
    pub chrono: &'static str,
    pub expected: &'static str,
}

pub(crate) const SLASH_YMD: YmdFormat = YmdFormat {
    separator: b'/',
    chrono: "%Y/%m/%d",
    expected: "YYYY/MM/DD",
};

pub(crate) const DASH_YMD: YmdFormat = YmdFormat {
    separator: b'-',
    chrono: "%Y-%m-%d",
    expected: "YYYY-MM-DD",
};

fn has_ymd_shape(value: &str, separator: u8) -> bool {
    let b = value.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == separator,
            _ => c.is_ascii_digit(),
        })
}

pub(crate) fn parse_ymd(
    row: &RawRow,
    col: usize,
    column: &str,
    format: &YmdFormat,
) -> Result<NaiveDate> {
    if let Some(date) = row.date(col) {
        return Ok(date);
    }
    let value = row.cell(col).trim();
    let invalid = || IngestError::InvalidDate {
        row: row.line,
        column: column.to_string(),
        value: value.to_string(),
        expected: format.expected,
    };
    if !has_ymd_shape(value, format.separator) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, format.chrono).map_err(|_| invalid())
}

/// `$1,234.56` / `-12.30` / ` 5 ` -> `Some(Some(f64))`, empty -> `Some(None)`,
/// anything unparseable -> `None`.
fn parse_amount_text(value: &str) -> Option<Option<f64>> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Some(None);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
}

fn invalid_amount(row: &RawRow, column: &str, value: &str) -> IngestError {
    IngestError::InvalidAmount {
        row: row.line,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Required amount cell: empty is as fatal as garbage
pub(crate) fn parse_amount(row: &RawRow, col: usize, column: &str) -> Result<f64> {
    let value = row.cell(col);
    match parse_amount_text(value) {
        Some(Some(v)) => Ok(v),
        _ => Err(invalid_amount(row, column, value)),
    }
}

/// Optional amount cell: a missing column or empty cell counts as zero
pub(crate) fn parse_optional_amount(row: &RawRow, col: Option<usize>, column: &str) -> Result<f64> {
    let Some(col) = col else {
        return Ok(0.0);
    };
    let value = row.cell(col);
    match parse_amount_text(value) {
        Some(v) => Ok(v.unwrap_or(0.0)),
        None => Err(invalid_amount(row, column, value)),
    }
}

pub(crate) fn sort_by_date(txns: &mut [Txn]) {
    txns.sort_by_key(|t| t.date);
}
