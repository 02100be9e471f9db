//! AMEX Cobalt export (CSV or the bank's spreadsheet download)
//!
//! Preamble rows precede the header; the columns used are:
//!   Date,Description,Amount
//!   5 May 2023,STARBUCKS #123,$6.45
//!   12 Jun. 2023,PAYMENT RECEIVED - THANK YOU,-$1,200.00
//!
//! AMEX reports charges as positive, so amounts are negated. The May
//! abbreviation is sometimes written without its trailing period.

use chrono::NaiveDate;
use expenses_core::{Source, Txn};
use regex::Regex;

use super::{SourceAdapter, parse_amount, sort_by_date};
use crate::error::{IngestError, Result};
use crate::types::{RawRow, RawTable};

const DATE_FORMAT: &str = "%d %b. %Y";

pub struct AmexCobalt;

/// `5 May 2023` -> `5 May. 2023`; already-dotted dates are left alone
fn normalize_month(raw: &str, may: &Regex) -> String {
    may.replace_all(raw, "May.").into_owned()
}

fn parse_amex_date(row: &RawRow, col: usize, may: &Regex) -> Result<NaiveDate> {
    if let Some(date) = row.date(col) {
        return Ok(date);
    }
    let raw = row.cell(col).trim();
    let fixed = normalize_month(raw, may);
    NaiveDate::parse_from_str(&fixed, DATE_FORMAT).map_err(|_| IngestError::InvalidDate {
        row: row.line,
        column: "Date".to_string(),
        value: raw.to_string(),
        expected: "D Mon. YYYY",
    })
}

impl SourceAdapter for AmexCobalt {
    fn source(&self) -> Source {
        Source::AmexCobalt
    }

    fn date_column(&self) -> &'static str {
        "Date"
    }

    fn normalize(&self, table: &RawTable) -> Result<Vec<Txn>> {
        let may = Regex::new(r"\bMay\b\.?")?;
        let date_col = table.column("Date")?;
        let desc_col = table.column("Description")?;
        let amount_col = table.column("Amount")?;

        let mut out = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let date = parse_amex_date(row, date_col, &may)?;
            // Charge (positive) -> expense (negative); payment (negative) -> positive.
            let amount = -parse_amount(row, amount_col, "Amount")? + 0.0;
            out.push(Txn::new(date, row.cell(desc_col), amount, Source::AmexCobalt));
        }

        // Exports list newest first.
        sort_by_date(&mut out);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<Txn>> {
        let table = RawTable::from_csv_reader(text.as_bytes(), "Date")?;
        AmexCobalt.normalize(&table)
    }

    #[test]
    fn test_may_without_period() {
        let may = Regex::new(r"\bMay\b\.?").unwrap();
        assert_eq!(normalize_month("5 May 2023", &may), "5 May. 2023");
        assert_eq!(normalize_month("5 May. 2023", &may), "5 May. 2023");
        assert_eq!(normalize_month("12 Jun. 2023", &may), "12 Jun. 2023");
    }

    #[test]
    fn test_signs_are_inverted() {
        let text = "\
Date,Description,Amount
5 May 2023,STARBUCKS #123,125.00
6 May. 2023,PAYMENT RECEIVED - THANK YOU,-50.00
";
        let txns = parse(text).unwrap();
        assert_eq!(txns[0].amount, -125.00);
        assert_eq!(txns[1].amount, 50.00);
        assert_eq!(txns[0].date_text(), "2023/05/05");
        assert_eq!(txns[1].date_text(), "2023/05/06");
    }

    #[test]
    fn test_currency_formatting_and_order() {
        let text = "\
Amex Cobalt Card
Statement,2023

Date,Date Processed,Description,Cardmember,Amount
12 Jun. 2023,13 Jun. 2023,PAYMENT RECEIVED - THANK YOU,J DOE,\"-$1,200.00\"
3 Jun. 2023,4 Jun. 2023,LOBLAWS,J DOE,\"$1,034.56\"
";
        let txns = parse(text).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].description, "LOBLAWS");
        assert_eq!(txns[0].amount, -1034.56);
        assert_eq!(txns[1].amount, 1200.00);
        assert!(txns.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_unparseable_date_is_fatal() {
        let text = "Date,Description,Amount\n2023-05-05,X,1.00\n";
        match parse(text).unwrap_err() {
            IngestError::InvalidDate { value, expected, .. } => {
                assert_eq!(value, "2023-05-05");
                assert_eq!(expected, "D Mon. YYYY");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }
}
