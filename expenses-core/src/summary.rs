//! Yearly spend per tag over an exported transaction set

use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::record::Txn;

/// Transactions carrying this tag move money between own accounts
pub const TRANSFER_TAG: &str = "transfer";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTagTotal {
    pub year: i32,
    pub tag: String,
    pub total: f64,
}

/// Sum spending per (year, tag).
///
/// Only expenses count, anything tagged `transfer` is skipped, and a record
/// with several tags contributes its full amount to each of them. Rows come
/// out newest year first, then by tag.
pub fn yearly_spend_by_tag(
    txns: &[Txn],
    from_year: Option<i32>,
    to_year: Option<i32>,
) -> Vec<YearTagTotal> {
    let mut cents: BTreeMap<(i32, String), i64> = BTreeMap::new();

    for txn in txns {
        if txn.amount > 0.0 || txn.tags.iter().any(|t| t == TRANSFER_TAG) {
            continue;
        }
        let year = txn.date.year();
        if from_year.is_some_and(|y| year < y) || to_year.is_some_and(|y| year > y) {
            continue;
        }
        let amount = (txn.amount.abs() * 100.0).round() as i64;
        for tag in &txn.tags {
            *cents.entry((year, tag.clone())).or_default() += amount;
        }
    }

    let mut rows: Vec<YearTagTotal> = cents
        .into_iter()
        .map(|((year, tag), c)| YearTagTotal {
            year,
            tag,
            total: c as f64 / 100.0,
        })
        .collect();
    rows.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.tag.cmp(&b.tag)));
    rows
}
