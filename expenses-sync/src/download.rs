//! Bulk-export loop over the store's cursor-paginated read endpoint

use anyhow::{Context, Result};
use expenses_core::StoredTxn;
use expenses_core::fields::{flexible_id_opt, null_as_empty};
use serde::Deserialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::ExportError;

/// One response of `GET /txns?startId=..&limit=..`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TxnPage {
    #[serde(rename = "nextId", default, deserialize_with = "flexible_id_opt::deserialize")]
    pub next_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub txns: Vec<StoredTxn>,
}

pub trait TxnPageSource {
    fn fetch_page(&self, start_id: i64, limit: u32) -> Result<TxnPage>;
}

/// Fetch every stored transaction, page by page, until a page comes back empty.
///
/// Ids must strictly increase within and across pages; otherwise the cursor
/// cannot be trusted and nothing is returned.
pub fn export_all(source: &dyn TxnPageSource, limit: u32) -> Result<Vec<StoredTxn>> {
    let mut out = Vec::new();
    let mut start_id = 0;
    let mut previous: Option<i64> = None;
    let mut iteration = 1;

    loop {
        info!(iteration, start_id, limit, "requesting transactions");
        let page = source
            .fetch_page(start_id, limit)
            .with_context(|| format!("fetching transactions from id {start_id}"))?;
        if page.txns.is_empty() {
            info!(iteration, "received 0 transactions");
            break;
        }
        info!(iteration, count = page.txns.len(), "received transactions");

        let count = page.txns.len();
        for txn in page.txns {
            if let Some(prev) = previous.filter(|p| txn.id <= *p) {
                return Err(ExportError::NonIncreasingId {
                    previous: prev,
                    current: txn.id,
                }
                .into());
            }
            previous = Some(txn.id);
            out.push(txn);
        }

        start_id = page
            .next_id
            .ok_or(ExportError::MissingCursor { start_id, count })?;
        iteration += 1;
    }

    Ok(out)
}

/// Write the exported set as one JSON array, creating parent directories
pub fn write_export(path: &Path, txns: &[StoredTxn]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer(&mut w, txns).with_context(|| format!("write {}", path.display()))?;
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

pub fn read_export(path: &Path) -> Result<Vec<StoredTxn>> {
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse {}", path.display()))
}
