//! Ingestion loop: embed each description, then post the record to the store

use anyhow::{Context, Result};
use expenses_core::fields::format_amount;
use expenses_core::{Source, Txn};
use serde::Serialize;
use tracing::{error, info};

use crate::error::UploadError;

/// Text -> vector capability (the embedding service)
pub trait Embedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Status and body of the store's answer to one POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReply {
    pub status: u16,
    pub body: String,
}

impl StoreReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Store ingestion endpoint
pub trait TxnSink {
    fn post_txn(&self, txn: &NewTxn) -> Result<StoreReply>;
}

/// JSON body of `POST /txns`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTxn {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub source: Source,
    /// The store expects the vector JSON-encoded inside a string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_embedding: Option<String>,
}

impl NewTxn {
    pub fn from_txn(txn: &Txn) -> Result<Self> {
        let desc_embedding = txn
            .desc_embedding
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("encode description embedding")?;
        Ok(Self {
            date: txn.date_text(),
            description: txn.description.clone(),
            amount: format_amount(txn.amount),
            source: txn.source,
            desc_embedding,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: usize,
    pub embedded: usize,
}

/// Submit records in order, stopping at the first failure.
///
/// With no `embedder` the records are posted without `desc_embedding`.
pub fn upload_all(
    txns: Vec<Txn>,
    embedder: Option<&dyn Embedder>,
    sink: &dyn TxnSink,
) -> Result<UploadReport> {
    let mut report = UploadReport::default();

    for mut txn in txns {
        if let Some(embedder) = embedder {
            let vector = embedder
                .embed(&txn.description)
                .with_context(|| format!("embedding description {:?}", txn.description))?;
            txn.desc_embedding = Some(vector);
            report.embedded += 1;
        }

        let body = NewTxn::from_txn(&txn)?;
        let reply = sink
            .post_txn(&body)
            .with_context(|| format!("posting {} {:?}", body.date, body.description))?;

        if !reply.is_success() {
            error!(
                date = %body.date,
                description = %body.description,
                amount = %body.amount,
                status = reply.status,
                response = %reply.body,
                "store rejected transaction"
            );
            return Err(UploadError::Rejected {
                date: body.date,
                description: body.description,
                amount: body.amount,
                source_name: body.source.to_string(),
                status: reply.status,
                body: reply.body,
            }
            .into());
        }

        info!(
            date = %body.date,
            description = %body.description,
            amount = %body.amount,
            response = %reply.body,
            "uploaded transaction"
        );
        report.uploaded += 1;
    }

    Ok(report)
}
