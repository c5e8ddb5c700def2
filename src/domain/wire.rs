//! Lenient serde adapters for the shapes the remote API actually sends.
//!
//! Dates arrive either as `YYYY-MM-DD` or as full ISO timestamps; only the
//! calendar date is kept. Day-of-month fields arrive as numbers or strings.

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};

fn parse_date<E: de::Error>(raw: &str) -> Result<NaiveDate, E> {
    let trimmed = raw.trim();
    let day_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .map_err(|_| E::custom(format!("`{trimmed}` is not a date")))
}

pub mod date {
    use super::*;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw)
    }
}

pub mod option_date {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(value) => serializer.serialize_str(&value.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse_date(&raw).map(Some),
            _ => Ok(None),
        }
    }
}

pub mod option_day {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDay {
        Number(u32),
        Text(String),
    }

    pub fn serialize<S>(day: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match day {
            Some(value) => serializer.serialize_u32(*value),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawDay>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawDay::Number(day)) => Ok(Some(day)),
            Some(RawDay::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<u32>()
                    .map(Some)
                    .map_err(|_| de::Error::custom(format!("`{trimmed}` is not a day of month")))
            }
        }
    }
}
