use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Duration, OffsetDateTime};

use crate::date;

/// A point in time with millisecond precision and a fixed UTC offset,
/// serialized in the document date format (see [`crate::date`]).
#[derive(PartialOrd, PartialEq, Ord, Eq, Hash, Clone, Copy, Debug)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self::from(OffsetDateTime::now_utc())
    }

    pub const fn as_datetime(&self) -> &OffsetDateTime {
        &self.0
    }
}

impl From<OffsetDateTime> for Timestamp {
    /// Truncates to whole milliseconds so the value survives the wire format unchanged.
    fn from(value: OffsetDateTime) -> Self {
        let below_millis = value.nanosecond() % 1_000_000;
        Self(value - Duration::nanoseconds(below_millis.into()))
    }
}

impl From<Timestamp> for OffsetDateTime {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = date::format(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Timestamp {
    type Err = date::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        date::parse(s).map(Self)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        date::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        date::deserialize(deserializer).map(Self)
    }
}
