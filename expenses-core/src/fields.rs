//! Serde adapters for the text encodings the transaction store speaks.
//!
//! The store keeps dates as `YYYY/MM/DD`, amounts as decimal strings and
//! hands identifiers back as strings, while older exports carry plain JSON
//! numbers. Readers accept both; writers always emit the store's form.

use serde::{Deserialize, Deserializer};

/// Render an amount the way the store's `<dollars>.<cents>` parser expects.
pub fn format_amount(amount: f64) -> String {
    // Avoid "-0.00" for negated zero amounts.
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("{amount:.2}")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Integer(i64),
    Float(f64),
    Text(String),
}

pub mod slash_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%Y/%m/%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid date {raw:?}, want YYYY/MM/DD: {e}")))
    }
}

pub mod amount_text {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::NumberOrText;

    pub fn serialize<S: Serializer>(amount: &f64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_amount(*amount))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match NumberOrText::deserialize(d)? {
            NumberOrText::Integer(i) => Ok(i as f64),
            NumberOrText::Float(f) => Ok(f),
            NumberOrText::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid amount {s:?}"))),
        }
    }
}

pub mod flexible_id {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::NumberOrText;

    pub fn serialize<S: Serializer>(id: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(*id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match NumberOrText::deserialize(d)? {
            NumberOrText::Integer(i) => Ok(i),
            NumberOrText::Float(f) => Err(D::Error::custom(format!("invalid id {f}, want an integer"))),
            NumberOrText::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid id {s:?}, want an integer"))),
        }
    }
}

/// Like [`flexible_id`] but tolerates `null`, a missing field or `""`.
pub mod flexible_id_opt {
    use serde::{Deserialize, Deserializer, de::Error};

    use super::NumberOrText;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        match Option::<NumberOrText>::deserialize(d)? {
            None => Ok(None),
            Some(NumberOrText::Integer(i)) => Ok(Some(i)),
            Some(NumberOrText::Float(f)) => {
                Err(D::Error::custom(format!("invalid id {f}, want an integer")))
            }
            Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrText::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid id {s:?}, want an integer"))),
        }
    }
}

/// `null` and a missing field both read as an empty list.
pub fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}
