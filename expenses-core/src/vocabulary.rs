//! Closed tag vocabulary derived from previously tagged transactions

use std::collections::BTreeSet;

use crate::record::Txn;

/// Set of every tag observed on the exported records.
///
/// Kept sorted so prompts built from it are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: BTreeSet<String>,
}

impl TagVocabulary {
    /// Union of all `tags` across `txns`
    pub fn from_txns<'a>(txns: impl IntoIterator<Item = &'a Txn>) -> Self {
        txns.into_iter().flat_map(|t| t.tags.iter().cloned()).collect()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// `a, b, c` listing used inside model prompts
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for TagVocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}
