//! expenses-core: canonical transaction records, sources and tag vocabulary

pub mod fields;
pub mod record;
pub mod summary;
pub mod vocabulary;

pub use record::{Source, StoredTxn, Txn, UnknownSource};
pub use summary::{YearTagTotal, yearly_spend_by_tag};
pub use vocabulary::TagVocabulary;
