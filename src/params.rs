//! Query parameters for listings.
//!
//! [`Params`] is a multi-valued, key-sorted map. `Params::default()` is an
//! empty, ready to use builder, and every filter helper returns `&mut Self`
//! so calls chain:
//!
//! ```
//! use harvest::{Params, ShortDate, Timeframe};
//!
//! let mut params = Params::new();
//! params
//!     .for_timeframe(&Timeframe::new(
//!         ShortDate::from_ymd(2014, 2, 1).unwrap(),
//!         ShortDate::from_ymd(2014, 4, 1).unwrap(),
//!     ))
//!     .billable(true)
//!     .page(2);
//!
//! assert_eq!(
//!     params.encode(),
//!     "billable=yes&from=2014-02-01&page=2&to=2014-04-01"
//! );
//! ```

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;

use crate::time::Timeframe;

/// Multi-valued query parameters, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first value for `key`, or `""` if there is none.
    pub fn get(&self, key: &str) -> &str {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map_or("", String::as_str)
    }

    /// Returns every value for `key` in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces all values for `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), vec![value.into()]);
        self
    }

    /// Appends `value` to the values for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Removes all values for `key`.
    pub fn del(&mut self, key: &str) -> &mut Self {
        self.values.remove(key);
        self
    }

    /// Appends every value of `other` to `self`. Nothing already in `self` is
    /// replaced.
    pub fn merge(&mut self, other: &Params) -> &mut Self {
        for (key, values) in &other.values {
            self.values
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(key, value)` pairs, keys sorted, values in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
    }

    /// Renders `key=value&...`, URL encoded, sorted by key.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Adds `from` and `to` for a complete timeframe.
    pub fn for_timeframe(&mut self, timeframe: &Timeframe) -> &mut Self {
        self.merge(&timeframe.to_params())
    }

    pub fn billable(&mut self, billable: bool) -> &mut Self {
        self.set("billable", yes_no(billable))
    }

    pub fn only_billed(&mut self) -> &mut Self {
        self.set("only_billed", "yes")
    }

    pub fn only_unbilled(&mut self) -> &mut Self {
        self.set("only_unbilled", "yes")
    }

    pub fn is_closed(&mut self, closed: bool) -> &mut Self {
        self.set("is_closed", yes_no(closed))
    }

    /// Restricts a listing to records changed after `time`, expressed in UTC.
    pub fn updated_since<Tz: TimeZone>(&mut self, time: DateTime<Tz>) -> &mut Self {
        let utc = time.with_timezone(&Utc);
        self.set(
            "updated_since",
            utc.format("%Y-%m-%d %H:%M:%S +0000 UTC").to_string(),
        )
    }

    pub fn page(&mut self, page: u32) -> &mut Self {
        self.set("page", page.to_string())
    }

    pub fn for_project(&mut self, project_id: u64) -> &mut Self {
        self.set("project_id", project_id.to_string())
    }

    pub fn for_user(&mut self, user_id: u64) -> &mut Self {
        self.set("user_id", user_id.to_string())
    }

    pub fn by_client(&mut self, client_id: u64) -> &mut Self {
        self.set("client", client_id.to_string())
    }

    /// Filters invoices by state. The value is passed through unchecked, see
    /// [`InvoiceStatus`] for the ones Harvest understands.
    pub fn status(&mut self, status: impl AsRef<str>) -> &mut Self {
        self.set("status", status.as_ref())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.add(key, value);
        }
        params
    }
}

/// Invoice states recognised by the `status` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    /// Sent to the client, no payment received.
    Open,
    /// A partial payment was recorded.
    Partial,
    /// Not sent and no payments recorded.
    Draft,
    /// Paid in full.
    Paid,
    Unpaid,
    PastDue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Open => "open",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::PastDue => "pastdue",
        }
    }
}

impl AsRef<str> for InvoiceStatus {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
