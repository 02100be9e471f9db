//! CIBC Visa export
//!
//! Expected header:
//!   Date,Description,Debit,Credit
//!   2023-03-05,LOBLAWS #1234,12.34,
//!   2023-03-02,PAYMENT THANK YOU,,250.00
//!
//! Charges sit in `Debit`, payments/refunds in `Credit`; either may be blank
//! or missing entirely. Canonical amount = credit - debit.

use expenses_core::{Source, Txn};

use super::{DASH_YMD, SourceAdapter, parse_optional_amount, parse_ymd, sort_by_date};
use crate::error::Result;
use crate::types::RawTable;

pub struct CibcVisa;

impl SourceAdapter for CibcVisa {
    fn source(&self) -> Source {
        Source::CibcVisa
    }

    fn date_column(&self) -> &'static str {
        "Date"
    }

    fn normalize(&self, table: &RawTable) -> Result<Vec<Txn>> {
        let date_col = table.column("Date")?;
        let desc_col = table.column("Description")?;
        let debit_col = table.optional_column("Debit");
        let credit_col = table.optional_column("Credit");

        let mut out = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let date = parse_ymd(row, date_col, "Date", &DASH_YMD)?;
            let debit = parse_optional_amount(row, debit_col, "Debit")?;
            let credit = parse_optional_amount(row, credit_col, "Credit")?;
            // `+ 0.0` folds the -0.0 of an empty row into 0.0
            let amount = -debit + credit + 0.0;
            out.push(Txn::new(date, row.cell(desc_col), amount, Source::CibcVisa));
        }

        // Exports are not reliably ordered.
        sort_by_date(&mut out);
        Ok(out)
    }
}
