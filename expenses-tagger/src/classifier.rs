//! Model-backed tag classification over a closed vocabulary

use anyhow::{Context, Result};
use expenses_core::{TagVocabulary, Txn};
use tracing::debug;

use crate::canonicalizer::canonicalize;
use crate::chat::ChatModel;
use crate::error::EvalError;

/// Sentinel for anything the model could not place in the vocabulary
pub const UNKNOWN_TAG: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub tag: String,
    /// The first free-form answer was already a vocabulary member
    pub one_shot: bool,
}

impl Classification {
    pub fn new(tag: impl Into<String>, one_shot: bool) -> Self {
        Self {
            tag: tag.into(),
            one_shot,
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_TAG, false)
    }
}

/// What was asked and what came back on the first model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTrace {
    pub prompt: String,
    pub answer: Option<String>,
}

pub fn classification_prompt(txn: &Txn, vocab: &TagVocabulary) -> String {
    format!(
        "
Classify the following financial transaction into one of the following categories:
{tags}

Details about the transaction:
- Date: {date}
- Description: {description}
- Amount: {amount}
- Account: {account}

Your answer should just be the tag you've categorized it as and nothing else.
",
        tags = vocab.joined(),
        date = txn.date_text(),
        description = txn.description,
        amount = txn.amount_label(),
        account = txn.source.account_description(),
    )
}

pub struct TagClassifier<M> {
    model: M,
}

impl<M: ChatModel> TagClassifier<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Ask the model for a tag, then canonicalize its answer.
    ///
    /// An empty answer short-circuits to `unknown` without a second call.
    pub fn classify(&self, txn: &Txn, vocab: &TagVocabulary) -> Result<Classification> {
        self.classify_traced(txn, vocab).map(|(c, _)| c)
    }

    /// [`TagClassifier::classify`], also returning the prompt and raw first answer
    pub fn classify_traced(
        &self,
        txn: &Txn,
        vocab: &TagVocabulary,
    ) -> Result<(Classification, ClassificationTrace)> {
        if vocab.is_empty() {
            return Err(EvalError::EmptyVocabulary.into());
        }

        let prompt = classification_prompt(txn, vocab);
        let answer = self
            .model
            .chat(&prompt)
            .with_context(|| format!("classifying {:?} on {}", txn.description, txn.date_text()))?;
        debug!(%prompt, ?answer, "classification");

        let result = match answer.as_deref() {
            None => Classification::unknown(),
            Some(answer) => canonicalize(&self.model, Some(answer), vocab)?,
        };
        Ok((result, ClassificationTrace { prompt, answer }))
    }
}
