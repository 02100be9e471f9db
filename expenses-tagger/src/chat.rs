//! Seam between the tagging logic and whatever language model answers it

use anyhow::Result;

/// Single-turn, text-in/text-out model call.
///
/// `Ok(None)` means the service answered without any content. Transport
/// failures are errors.
pub trait ChatModel {
    fn chat(&self, prompt: &str) -> Result<Option<String>>;
}

impl<M: ChatModel + ?Sized> ChatModel for &M {
    fn chat(&self, prompt: &str) -> Result<Option<String>> {
        (**self).chat(prompt)
    }
}
