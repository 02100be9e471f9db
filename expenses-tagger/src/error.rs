use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("tag vocabulary is empty; no record carries a tag")]
    EmptyVocabulary,

    #[error("sample size must be at least 1")]
    EmptySample,

    #[error("cannot sample {requested} records, only {available} have a ground-truth tag")]
    SampleTooLarge { requested: usize, available: usize },
}
