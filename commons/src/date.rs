//! The single date format used inside stored documents:
//! `yyyy-MM-dd'T'HH:mm:ss.SSSZZZZZ`, for example `2024-03-05T14:07:09.123+01:00`,
//! or `2024-03-05T13:07:09.123Z` when the offset is zero. Offsets that are
//! not whole minutes keep their seconds: `+05:30:15`.
//!
//! Use the module directly on `OffsetDateTime` fields:
//!
//! ```ignore
//! #[serde(with = "commons::date")]
//! placed_at: OffsetDateTime,
//! #[serde(default, with = "commons::date::option")]
//! shipped_at: Option<OffsetDateTime>,
//! ```

use serde::{de::Visitor, Deserializer, Serializer};
use time::{macros::format_description, OffsetDateTime};

pub use time::error::{Format as FormatError, Parse as ParseError};

macro_rules! wire_format {
    () => {
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory]:[offset_minute]"
        )
    };
}

// Offsets with a seconds part, written as `+05:30:15`.
macro_rules! wire_format_with_offset_seconds {
    () => {
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory]:[offset_minute]:[offset_second]"
        )
    };
}

/// Formats with millisecond precision, anything finer is truncated.
pub fn format(value: &OffsetDateTime) -> Result<String, FormatError> {
    let offset = value.offset();
    if offset.is_utc() {
        let text = value.format(wire_format!())?;
        if let Some(head) = text.strip_suffix("+00:00") {
            return Ok(format!("{head}Z"));
        }
        return Ok(text);
    }

    if offset.seconds_past_minute() != 0 {
        value.format(wire_format_with_offset_seconds!())
    } else {
        value.format(wire_format!())
    }
}

/// Parses strictly: exactly three fraction digits and an offset (or `Z`) are required.
pub fn parse(text: &str) -> Result<OffsetDateTime, ParseError> {
    if let Some(head) = text.strip_suffix('Z') {
        return OffsetDateTime::parse(&format!("{head}+00:00"), wire_format!());
    }

    OffsetDateTime::parse(text, wire_format!())
        .or_else(|e| OffsetDateTime::parse(text, wire_format_with_offset_seconds!()).map_err(|_| e))
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = format(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(DateVisitor)
}

struct DateVisitor;

impl<'de> Visitor<'de> for DateVisitor {
    type Value = OffsetDateTime;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a date formatted as yyyy-MM-dd'T'HH:mm:ss.SSSZZZZZ")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        parse(value).map_err(|e| E::custom(format_args!("invalid date {value:?}: {e}")))
    }
}

/// Same format for `Option<OffsetDateTime>` fields, `null` maps to `None`.
pub mod option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use time::OffsetDateTime;

    use crate::Timestamp;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(Timestamp::from).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Timestamp>::deserialize(deserializer)?.map(OffsetDateTime::from))
    }
}
