//! Day-granularity dates and the timeframes built from them.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::params::Params;

const SHORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date without time of day, written as `YYYY-MM-DD`.
///
/// The unset date is encoded as an empty string, which is how Harvest leaves
/// optional date fields blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortDate(Option<NaiveDate>);

impl ShortDate {
    /// Creates a date, or `None` if the components are out of range.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    /// Today's date in UTC.
    pub fn today() -> Self {
        Self::from(Utc::now().date_naive())
    }

    /// The unset date.
    pub fn unset() -> Self {
        Self(None)
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0
    }

    /// Parses `YYYY-MM-DD`; anything else (including `""`) is unset.
    pub fn parse_lenient(s: &str) -> Self {
        Self(NaiveDate::parse_from_str(s.trim(), SHORT_DATE_FORMAT).ok())
    }
}

impl From<NaiveDate> for ShortDate {
    fn from(date: NaiveDate) -> Self {
        Self(Some(date))
    }
}

impl fmt::Display for ShortDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format(SHORT_DATE_FORMAT)),
            None => Ok(()),
        }
    }
}

impl Serialize for ShortDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShortDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(Self::unset()),
            Some(s) => NaiveDate::parse_from_str(s, SHORT_DATE_FORMAT)
                .map(Self::from)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// A closed date range used to filter listings.
///
/// Encodes as `"2014-02-01,2014-04-01"`. If either bound is unset the whole
/// timeframe encodes as `""`, never as half a range.
///
/// ```
/// use harvest::{ShortDate, Timeframe};
///
/// let tf = Timeframe::new(
///     ShortDate::from_ymd(2014, 2, 1).unwrap(),
///     ShortDate::from_ymd(2014, 4, 1).unwrap(),
/// );
/// assert_eq!(tf.to_string(), "2014-02-01,2014-04-01");
/// assert_eq!(Timeframe::default().to_string(), "");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeframe {
    pub start: ShortDate,
    pub end: ShortDate,
}

impl Timeframe {
    pub fn new(start: ShortDate, end: ShortDate) -> Self {
        Self { start, end }
    }

    /// A timeframe from `start` up to and including today.
    pub fn since(start: ShortDate) -> Self {
        Self::new(start, ShortDate::today())
    }

    /// Returns `true` when both bounds are set.
    pub fn is_complete(&self) -> bool {
        !self.start.is_unset() && !self.end.is_unset()
    }

    /// The `from`/`to` query parameters for this timeframe. An incomplete
    /// timeframe yields no parameters.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if self.is_complete() {
            params.set("from", self.start.to_string());
            params.set("to", self.end.to_string());
        }
        params
    }

    fn parse_lenient(s: &str) -> Self {
        let Some((start, end)) = s.split_once(',') else {
            return Self::default();
        };
        let tf = Self::new(ShortDate::parse_lenient(start), ShortDate::parse_lenient(end));
        if tf.is_complete() {
            tf
        } else {
            Self::default()
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complete() {
            write!(f, "{},{}", self.start, self.end)
        } else {
            Ok(())
        }
    }
}

impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse_lenient).unwrap_or_default())
    }
}
