//! RBC chequing account export
//!
//! Expected header:
//!   Date,Description,Amount
//!   2024/01/02,PAYROLL DEPOSIT ACME,1500.00
//!   2024/01/03,HYDRO ONE,-82.15
//!
//! Amounts are already expense-negative. Near-zero rows are noise and dropped.

use expenses_core::{Source, Txn};
use tracing::debug;

use super::{SLASH_YMD, SourceAdapter, parse_amount, parse_ymd, sort_by_date};
use crate::error::Result;
use crate::types::RawTable;

/// Rows with `abs(amount)` below this are not real transactions
pub const MIN_ABS_AMOUNT: f64 = 0.01;

pub struct RbcChequing;

impl SourceAdapter for RbcChequing {
    fn source(&self) -> Source {
        Source::RbcChequing
    }

    fn date_column(&self) -> &'static str {
        "Date"
    }

    fn normalize(&self, table: &RawTable) -> Result<Vec<Txn>> {
        let date_col = table.column("Date")?;
        let desc_col = table.column("Description")?;
        let amount_col = table.column("Amount")?;

        let mut out = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let date = parse_ymd(row, date_col, "Date", &SLASH_YMD)?;
            let amount = parse_amount(row, amount_col, "Amount")?;
            if amount.abs() < MIN_ABS_AMOUNT {
                debug!(line = row.line, amount, "dropping zero-value row");
                continue;
            }
            out.push(Txn::new(date, row.cell(desc_col), amount, Source::RbcChequing));
        }

        sort_by_date(&mut out);
        Ok(out)
    }
}
