//! Second-stage repair: force an out-of-vocabulary answer onto a known tag

use anyhow::{Context, Result};
use expenses_core::TagVocabulary;
use tracing::debug;

use crate::chat::ChatModel;
use crate::classifier::Classification;

pub fn canonicalization_prompt(predicted: &str, vocab: &TagVocabulary) -> String {
    format!(
        "
Which of the following words is {predicted} most similar to?
{tags}

Only respond with the single word that is most similar and nothing else.
",
        tags = vocab.joined()
    )
}

/// Map a raw model answer onto the vocabulary.
///
/// A vocabulary hit is returned as a one-shot result without calling the
/// model. Otherwise the model is asked once for the closest entry; an answer
/// that still misses degrades to `unknown`.
pub fn canonicalize<M: ChatModel + ?Sized>(
    model: &M,
    predicted: Option<&str>,
    vocab: &TagVocabulary,
) -> Result<Classification> {
    let Some(predicted) = predicted else {
        return Ok(Classification::unknown());
    };
    if vocab.contains(predicted) {
        return Ok(Classification::new(predicted, true));
    }

    let prompt = canonicalization_prompt(predicted, vocab);
    let answer = model
        .chat(&prompt)
        .with_context(|| format!("canonicalizing tag {predicted:?}"))?;
    debug!(%prompt, ?answer, "tag canonicalization");

    Ok(match answer {
        Some(tag) if vocab.contains(&tag) => Classification::new(tag, false),
        _ => Classification::unknown(),
    })
}
