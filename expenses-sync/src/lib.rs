//! expenses-sync: store boundary loops (record upload and paginated export).

pub mod download;
pub mod error;
pub mod upload;

pub use download::{TxnPage, TxnPageSource, export_all, read_export, write_export};
pub use error::{ExportError, UploadError};
pub use upload::{Embedder, NewTxn, StoreReply, TxnSink, UploadReport, upload_all};
