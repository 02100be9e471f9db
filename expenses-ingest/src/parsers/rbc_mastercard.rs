//! RBC Mastercard export
//!
//! Expected header:
//!   Transaction Date,Description,Amount
//!   2024/03/09,UBER CANADA/UBERTRIP,-23.41
//!   2024/03/11,PAYMENT - THANK YOU,400.00
//!
//! The date column is read as the canonical date. Amounts are already
//! expense-negative and every row is kept.

use expenses_core::{Source, Txn};

use super::{SLASH_YMD, SourceAdapter, parse_amount, parse_ymd, sort_by_date};
use crate::error::Result;
use crate::types::RawTable;

const DATE_COLUMN: &str = "Transaction Date";

pub struct RbcMastercard;

impl SourceAdapter for RbcMastercard {
    fn source(&self) -> Source {
        Source::RbcMastercard
    }

    fn date_column(&self) -> &'static str {
        DATE_COLUMN
    }

    fn normalize(&self, table: &RawTable) -> Result<Vec<Txn>> {
        let date_col = table.column(DATE_COLUMN)?;
        let desc_col = table.column("Description")?;
        let amount_col = table.column("Amount")?;

        let mut out = table
            .rows
            .iter()
            .map(|row| {
                Ok(Txn::new(
                    parse_ymd(row, date_col, DATE_COLUMN, &SLASH_YMD)?,
                    row.cell(desc_col),
                    parse_amount(row, amount_col, "Amount")?,
                    Source::RbcMastercard,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        sort_by_date(&mut out);
        Ok(out)
    }
}
