//! HTTP client for the transaction store (`/txns`)

use anyhow::{Context, Result, bail};
use expenses_sync::{NewTxn, StoreReply, TxnPage, TxnPageSource, TxnSink};

use crate::runtime::block_on;

#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    http: reqwest::Client,
}

impl StoreClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn txns_url(&self) -> String {
        format!("{}/txns", self.base_url)
    }

    /// Any HTTP status is a reply; only transport failures are errors here.
    pub async fn post_txn_async(&self, txn: &NewTxn) -> Result<StoreReply> {
        let resp = self
            .http
            .post(self.txns_url())
            .json(txn)
            .send()
            .await
            .context("store POST /txns")?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok(StoreReply { status, body })
    }

    pub async fn fetch_page_async(&self, start_id: i64, limit: u32) -> Result<TxnPage> {
        let resp = self
            .http
            .get(self.txns_url())
            .query(&[("startId", start_id), ("limit", i64::from(limit))])
            .send()
            .await
            .context("store GET /txns")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("store error: {status} {txt}");
        }
        resp.json().await.context("parse store page")
    }
}

impl TxnSink for StoreClient {
    fn post_txn(&self, txn: &NewTxn) -> Result<StoreReply> {
        block_on(self.post_txn_async(txn))?
    }
}

impl TxnPageSource for StoreClient {
    fn fetch_page(&self, start_id: i64, limit: u32) -> Result<TxnPage> {
        block_on(self.fetch_page_async(start_id, limit))?
    }
}
