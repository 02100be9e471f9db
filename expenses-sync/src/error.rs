use thiserror::Error;

/// The store broke its pagination contract; the partial export is discarded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error(
        "transactions not in ascending id order, got id {current} after {previous}; \
         cannot paginate over all transactions"
    )]
    NonIncreasingId { previous: i64, current: i64 },

    #[error("page starting at id {start_id} returned {count} transactions but no nextId")]
    MissingCursor { start_id: i64, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("store rejected transaction {date} {description:?} {amount} ({source_name}): HTTP {status}: {body}")]
    Rejected {
        date: String,
        description: String,
        amount: String,
        source_name: String,
        status: u16,
        body: String,
    },
}
