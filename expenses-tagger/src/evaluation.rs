//! Accuracy harness: score the classifier against ground-truth tags

use anyhow::Result;
use expenses_core::{TagVocabulary, Txn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::chat::ChatModel;
use crate::classifier::TagClassifier;
use crate::error::EvalError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    /// Percentage correct, rounded to one decimal place
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    /// Samples whose first answer was already a vocabulary member
    pub one_shot: usize,
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Accuracy {:.1}, Correct: {} out of {}, One shots: {}",
            self.accuracy, self.correct, self.total, self.one_shot
        )
    }
}

fn accuracy(correct: usize, total: usize) -> f64 {
    (correct as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Deterministically draw `sample_size` records that carry a ground-truth tag.
///
/// Same seed and same input order always yield the same sample.
pub fn sample_labelled(
    txns: &[Txn],
    sample_size: usize,
    seed: u64,
) -> std::result::Result<Vec<&Txn>, EvalError> {
    if sample_size == 0 {
        return Err(EvalError::EmptySample);
    }
    let labelled: Vec<&Txn> = txns.iter().filter(|t| t.primary_tag().is_some()).collect();
    if sample_size > labelled.len() {
        return Err(EvalError::SampleTooLarge {
            requested: sample_size,
            available: labelled.len(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Ok(labelled
        .choose_multiple(&mut rng, sample_size)
        .copied()
        .collect())
}

/// Classify a seeded sample and compare each prediction with `tags[0]`.
pub fn evaluate<M: ChatModel>(
    classifier: &TagClassifier<M>,
    txns: &[Txn],
    vocab: &TagVocabulary,
    sample_size: usize,
    seed: u64,
) -> Result<EvalReport> {
    if vocab.is_empty() {
        return Err(EvalError::EmptyVocabulary.into());
    }
    let sample = sample_labelled(txns, sample_size, seed)?;

    let mut correct = 0;
    let mut one_shot = 0;
    for txn in &sample {
        let (result, trace) = classifier.classify_traced(txn, vocab)?;
        let actual = txn.primary_tag().unwrap_or_default();
        let hit = result.tag == actual;
        if hit {
            correct += 1;
        }
        if result.one_shot {
            one_shot += 1;
        }
        info!(
            date = %txn.date_text(),
            description = %txn.description,
            amount = txn.amount,
            source = %txn.source,
            predicted = %result.tag,
            actual,
            hit,
            one_shot = result.one_shot,
            answer = ?trace.answer,
            prompt = %trace.prompt,
            "evaluated sample"
        );
    }

    let total = sample.len();
    Ok(EvalReport {
        accuracy: accuracy(correct, total),
        correct,
        total,
        one_shot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use expenses_core::Source;

    fn labelled(n: usize) -> Vec<Txn> {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let tag = if i % 2 == 0 { "food" } else { "rent" };
                Txn::new(d, format!("TXN {i}"), -(i as f64), Source::CibcVisa).with_tags([tag])
            })
            .collect()
    }

    #[test]
    fn test_accuracy_rounding() {
        assert_eq!(accuracy(1, 3), 33.3);
        assert_eq!(accuracy(2, 3), 66.7);
        assert_eq!(accuracy(100, 100), 100.0);
        assert_eq!(accuracy(0, 7), 0.0);
    }

    #[test]
    fn test_same_seed_same_sample() {
        let txns = labelled(50);
        let a: Vec<_> = sample_labelled(&txns, 10, 0).unwrap().iter().map(|t| &t.description).collect();
        let b: Vec<_> = sample_labelled(&txns, 10, 0).unwrap().iter().map(|t| &t.description).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_unlabelled_records_are_never_sampled() {
        let mut txns = labelled(3);
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        txns.push(Txn::new(d, "UNTAGGED", -1.0, Source::RbcChequing));
        let sample = sample_labelled(&txns, 3, 7).unwrap();
        assert!(sample.iter().all(|t| t.primary_tag().is_some()));
    }

    #[test]
    fn test_sample_size_bounds() {
        let txns = labelled(3);
        assert_eq!(sample_labelled(&txns, 0, 0).unwrap_err(), EvalError::EmptySample);
        assert_eq!(
            sample_labelled(&txns, 4, 0).unwrap_err(),
            EvalError::SampleTooLarge { requested: 4, available: 3 }
        );
    }

    #[test]
    fn test_report_display() {
        let r = EvalReport {
            accuracy: 42.0,
            correct: 42,
            total: 100,
            one_shot: 30,
        };
        assert_eq!(r.to_string(), "Accuracy 42.0, Correct: 42 out of 100, One shots: 30");
    }
}
