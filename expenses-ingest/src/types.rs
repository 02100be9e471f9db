//! Raw tabular exports (CSV or spreadsheet) before any source-specific rules

use calamine::{Data, Reader};
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Spreadsheet,
}

impl ExportKind {
    /// Spreadsheet extensions go through calamine, everything else is read as CSV
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => ExportKind::Spreadsheet,
            _ => ExportKind::Csv,
        }
    }
}

/// One data row with its 1-based position in the source file
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<String>,
    /// Cells the workbook itself typed as dates; always empty for CSV
    pub dates: Vec<Option<NaiveDate>>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self {
            line,
            cells,
            dates: Vec::new(),
        }
    }

    /// The typed date at `idx`, if the workbook stored one there
    pub fn date(&self, idx: usize) -> Option<NaiveDate> {
        self.dates.get(idx).copied().flatten()
    }

    /// Missing trailing cells read as empty text
    pub fn cell(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Header row plus data rows, all cells as decoded text
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Build a table from a grid of cells, numbering rows from 1.
    pub fn from_grid(grid: Vec<Vec<String>>, header_marker: &str) -> Result<Self> {
        let rows = grid
            .into_iter()
            .enumerate()
            .map(|(i, cells)| RawRow::new(i + 1, cells));
        Self::from_rows(rows, header_marker)
    }

    /// Like [`RawTable::from_grid`] for workbook cells, keeping typed dates.
    pub fn from_sheet_rows(grid: Vec<Vec<Data>>, header_marker: &str) -> Result<Self> {
        let rows = grid.into_iter().enumerate().map(|(i, row)| RawRow {
            line: i + 1,
            cells: row.iter().map(cell_text).collect(),
            dates: row.iter().map(cell_date).collect(),
        });
        Self::from_rows(rows, header_marker)
    }

    /// Bank exports often carry preamble rows (account names, blank lines)
    /// above the real header, so the header is the first row holding a cell
    /// equal to `header_marker`. Blank rows after it are dropped.
    pub fn from_rows(
        rows: impl IntoIterator<Item = RawRow>,
        header_marker: &str,
    ) -> Result<Self> {
        let mut rows = rows.into_iter();

        let header = rows
            .by_ref()
            .find(|r| r.cells.iter().any(|c| c.trim() == header_marker))
            .ok_or_else(|| IngestError::HeaderNotFound {
                marker: header_marker.to_string(),
            })?;

        Ok(Self {
            header: header.cells.iter().map(|c| c.trim().to_string()).collect(),
            rows: rows.filter(|r| !r.is_blank()).collect(),
        })
    }

    pub fn from_csv_reader<R: Read>(rdr: R, header_marker: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(rdr);

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            // The csv reader skips empty lines, so keep its own line count.
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 1);
            rows.push(RawRow::new(line, record.iter().map(str::to_string).collect()));
        }
        Self::from_rows(rows, header_marker)
    }

    pub fn from_csv_path(path: &Path, header_marker: &str) -> Result<Self> {
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file, header_marker)
    }

    /// Reads the first worksheet of an xls/xlsx/ods workbook
    pub fn from_spreadsheet_path(path: &Path, header_marker: &str) -> Result<Self> {
        let spreadsheet_err = |message: String| IngestError::Spreadsheet {
            path: path.to_path_buf(),
            message,
        };

        let mut workbook =
            calamine::open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| spreadsheet_err("workbook has no worksheets".to_string()))?
            .map_err(|e| spreadsheet_err(e.to_string()))?;

        let grid = range.rows().map(<[Data]>::to_vec).collect();
        Self::from_sheet_rows(grid, header_marker)
    }

    pub fn from_path(path: &Path, header_marker: &str) -> Result<Self> {
        match ExportKind::from_path(path) {
            ExportKind::Csv => Self::from_csv_path(path, header_marker),
            ExportKind::Spreadsheet => Self::from_spreadsheet_path(path, header_marker),
        }
    }

    pub fn optional_column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn column(&self, name: &str) -> Result<usize> {
        self.optional_column(name)
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                header: self.header.clone(),
            })
    }
}

/// Date-typed cells (Excel serials, ISO 8601 strings from ods) as a calendar date
fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> String {
    if let Some(date) = cell_date(cell) {
        return date.format("%Y-%m-%d").to_string();
    }
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_skips_preamble_and_blank_rows() {
        let text = "\
Amex Cobalt Card
Card Member,J DOE

Date,Description,Amount
5 May 2023,COFFEE,$4.50
,,
6 May. 2023,BOOKS,$20.00
";
        let table = RawTable::from_csv_reader(text.as_bytes(), "Date").unwrap();
        assert_eq!(table.header, vec!["Date", "Description", "Amount"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].line, 5);
        assert_eq!(table.rows[1].line, 7);
        assert_eq!(table.rows[1].cell(1), "BOOKS");
    }

    #[test]
    fn test_missing_cells_read_empty() {
        let text = "Date,Description,Debit,Credit\n2023-03-05,GROCER,12.34\n";
        let table = RawTable::from_csv_reader(text.as_bytes(), "Date").unwrap();
        let credit = table.column("Credit").unwrap();
        assert_eq!(table.rows[0].cell(credit), "");
    }

    #[test]
    fn test_header_not_found() {
        let text = "a,b,c\n1,2,3\n";
        let err = RawTable::from_csv_reader(text.as_bytes(), "Date").unwrap_err();
        assert!(matches!(err, IngestError::HeaderNotFound { .. }));
    }

    #[test]
    fn test_missing_column() {
        let text = "Date,Description\n";
        let table = RawTable::from_csv_reader(text.as_bytes(), "Date").unwrap();
        let err = table.column("Amount").unwrap_err();
        assert!(err.to_string().contains("Amount"));
        assert!(table.optional_column("Amount").is_none());
    }

    #[test]
    fn test_export_kind_by_extension() {
        assert_eq!(ExportKind::from_path(Path::new("a/amex.XLS")), ExportKind::Spreadsheet);
        assert_eq!(ExportKind::from_path(Path::new("a/amex.xlsx")), ExportKind::Spreadsheet);
        assert_eq!(ExportKind::from_path(Path::new("rbc.csv")), ExportKind::Csv);
        assert_eq!(ExportKind::from_path(Path::new("noext")), ExportKind::Csv);
    }

    #[test]
    fn test_from_path_reads_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rbc.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "Date,Description,Amount").unwrap();
        writeln!(f, "2024/01/02,PAYROLL,1500.00").unwrap();
        drop(f);

        let table = RawTable::from_path(&path, "Date").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cell(2), "1500.00");
    }

    #[test]
    fn test_workbook_date_cells_are_typed() {
        use calamine::{ExcelDateTime, ExcelDateTimeType};

        let grid = vec![
            vec![
                Data::String("Date".to_string()),
                Data::String("Description".to_string()),
                Data::String("Debit".to_string()),
            ],
            vec![
                Data::DateTime(ExcelDateTime::new(45051.0, ExcelDateTimeType::DateTime, false)),
                Data::String("LOBLAWS".to_string()),
                Data::Float(12.34),
            ],
            vec![
                Data::DateTimeIso("2023-05-06T00:00:00".to_string()),
                Data::String("BOOKS".to_string()),
                Data::Float(5.0),
            ],
        ];
        let table = RawTable::from_sheet_rows(grid, "Date").unwrap();
        let may5 = NaiveDate::from_ymd_opt(2023, 5, 5).unwrap();

        assert_eq!(table.rows[0].date(0), Some(may5));
        assert_eq!(table.rows[0].cell(0), "2023-05-05");
        assert_eq!(table.rows[0].date(1), None);
        assert_eq!(table.rows[1].date(0), NaiveDate::from_ymd_opt(2023, 5, 6));
        assert_eq!(table.rows[0].line, 2);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = RawTable::from_path(Path::new("/nonexistent/x.csv"), "Date").unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
