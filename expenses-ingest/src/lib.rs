//! expenses-ingest: raw bank export loading and per-source normalization.

pub mod error;
pub mod parsers;
pub mod types;

pub use error::IngestError;
pub use parsers::{SourceAdapter, adapter_for, load_export, normalize};
pub use types::{ExportKind, RawRow, RawTable};
