//! expenses-tagger: language-model tag classification, canonicalization and
//! accuracy evaluation over a closed tag vocabulary.

pub mod canonicalizer;
pub mod chat;
pub mod classifier;
pub mod error;
pub mod evaluation;

pub use canonicalizer::canonicalize;
pub use chat::ChatModel;
pub use classifier::{Classification, ClassificationTrace, TagClassifier, UNKNOWN_TAG};
pub use error::EvalError;
pub use evaluation::{EvalReport, evaluate, sample_labelled};
