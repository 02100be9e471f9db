//! Canonical transaction records shared by every source adapter and consumer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::fields;

/// Originating bank/account export format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    RbcChequing,
    RbcMastercard,
    CibcVisa,
    AmexCobalt,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source {0:?}, want one of RBC_CHEQUING, RBC_MASTERCARD, CIBC_VISA, AMEX_COBALT")]
pub struct UnknownSource(pub String);

impl Source {
    pub const ALL: [Source; 4] = [
        Source::RbcChequing,
        Source::RbcMastercard,
        Source::CibcVisa,
        Source::AmexCobalt,
    ];

    /// Name used on the wire and in exported files
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::RbcChequing => "RBC_CHEQUING",
            Source::RbcMastercard => "RBC_MASTERCARD",
            Source::CibcVisa => "CIBC_VISA",
            Source::AmexCobalt => "AMEX_COBALT",
        }
    }

    /// Human-readable account description given to the classifier
    pub fn account_description(&self) -> &'static str {
        match self {
            Source::RbcChequing => "Checking account at Royal Bank of Canada",
            Source::RbcMastercard | Source::CibcVisa | Source::AmexCobalt => "Credit Card",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = UnknownSource;

    /// Accepts `AMEX_COBALT`, `amex-cobalt`, `Amex_Cobalt`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        Source::ALL
            .into_iter()
            .find(|src| src.as_str() == wanted)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// One normalized financial transaction.
///
/// Sign convention for every source: expense negative, income/payment positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Txn {
    #[serde(with = "fields::slash_date")]
    pub date: NaiveDate,
    pub description: String,
    #[serde(with = "fields::amount_text")]
    pub amount: f64,
    pub source: Source,
    /// Ground-truth tags, only present on records read back from the store
    #[serde(
        default,
        deserialize_with = "fields::null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    /// Attached during upload, never needed for classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_embedding: Option<Vec<f32>>,
}

impl Txn {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        source: Source,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            source,
            tags: Vec::new(),
            desc_embedding: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Date in the canonical `YYYY/MM/DD` text form
    pub fn date_text(&self) -> String {
        self.date.format(fields::slash_date::FORMAT).to_string()
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// `CREDIT <abs>` for income/payments (including zero), `DEBIT <abs>` otherwise
    pub fn amount_label(&self) -> String {
        let side = if self.amount >= 0.0 { "CREDIT" } else { "DEBIT" };
        format!("{side} {:.2}", self.amount.abs())
    }

    /// The tag evaluation compares predictions against
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

/// A transaction as returned by the store's bulk-read endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredTxn {
    #[serde(with = "fields::flexible_id")]
    pub id: i64,
    #[serde(flatten)]
    pub txn: Txn,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_source_names_round_trip() {
        for src in Source::ALL {
            assert_eq!(src.as_str().parse::<Source>().unwrap(), src);
        }
        assert_eq!("amex-cobalt".parse::<Source>().unwrap(), Source::AmexCobalt);
        assert_eq!("Rbc_Chequing".parse::<Source>().unwrap(), Source::RbcChequing);
        assert!("TD_VISA".parse::<Source>().is_err());
    }

    #[test]
    fn test_account_descriptions() {
        assert_eq!(
            Source::RbcChequing.account_description(),
            "Checking account at Royal Bank of Canada"
        );
        assert_eq!(Source::CibcVisa.account_description(), "Credit Card");
    }

    #[test]
    fn test_amount_label() {
        let debit = Txn::new(date(2024, 1, 2), "COFFEE", -4.5, Source::AmexCobalt);
        assert_eq!(debit.amount_label(), "DEBIT 4.50");
        let credit = Txn::new(date(2024, 1, 2), "PAYMENT", 100.0, Source::AmexCobalt);
        assert_eq!(credit.amount_label(), "CREDIT 100.00");
        let zero = Txn::new(date(2024, 1, 2), "ADJ", 0.0, Source::CibcVisa);
        assert_eq!(zero.amount_label(), "CREDIT 0.00");
    }

    #[test]
    fn test_txn_serializes_store_encoding() {
        let txn = Txn::new(date(2023, 3, 5), "GROCER", -12.3, Source::CibcVisa);
        let v = serde_json::to_value(&txn).unwrap();
        assert_eq!(v["date"], "2023/03/05");
        assert_eq!(v["amount"], "-12.30");
        assert_eq!(v["source"], "CIBC_VISA");
        assert!(v.get("tags").is_none());
        assert!(v.get("desc_embedding").is_none());
    }

    #[test]
    fn test_stored_txn_accepts_string_and_number_ids() {
        let from_store = r#"{"id":"42","date":"2024/02/29","description":"RENT",
            "amount":"-1500.0","source":"RBC_CHEQUING","tags":["rent","home"]}"#;
        let t: StoredTxn = serde_json::from_str(from_store).unwrap();
        assert_eq!(t.id, 42);
        assert_eq!(t.txn.amount, -1500.0);
        assert_eq!(t.txn.primary_tag(), Some("rent"));

        let numeric = r#"{"id":7,"date":"2024/03/01","description":"PAY",
            "amount":12.5,"source":"AMEX_COBALT","tags":null}"#;
        let t: StoredTxn = serde_json::from_str(numeric).unwrap();
        assert_eq!(t.id, 7);
        assert!(t.txn.tags.is_empty());
    }

    #[test]
    fn test_rejects_raw_source_date_format() {
        let raw = r#"{"id":1,"date":"2024-03-01","description":"X","amount":"1","source":"CIBC_VISA"}"#;
        assert!(serde_json::from_str::<StoredTxn>(raw).is_err());
    }
}
