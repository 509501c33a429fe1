//! The `{"<name>": <body>}` wrapper Harvest puts around every resource body.
//!
//! Encoding takes the key from [`Resource::NAME`]. Decoding is schema-less: it
//! takes whatever single key the object has and keeps the body as raw JSON so
//! the final decode can go straight into the caller's type.

use crate::Resource;
use serde::de::{DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;

/// One named resource body as it travels on the wire.
#[derive(Debug, Clone)]
pub struct Envelope {
    name: String,
    body: Box<RawValue>,
}

impl Envelope {
    /// Wraps `resource` under its declared name.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the resource cannot be encoded.
    pub fn wrap<T: Resource>(resource: &T) -> serde_json::Result<Self> {
        Ok(Self {
            name: T::NAME.to_string(),
            body: serde_json::value::to_raw_value(resource)?,
        })
    }

    /// The envelope key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped body, exactly as it appeared on the wire.
    pub fn body(&self) -> &RawValue {
        &self.body
    }

    /// Deserializes the wrapped body into `T`.
    ///
    /// # Errors
    ///
    /// Fails if the body's shape does not match `T`.
    pub fn into_inner<T: DeserializeOwned>(self) -> serde_json::Result<T> {
        serde_json::from_str(self.body.get())
    }

    fn into_body(self) -> Box<RawValue> {
        self.body
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.body)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EnvelopeVisitor)
    }
}

struct EnvelopeVisitor;

impl<'de> Visitor<'de> for EnvelopeVisitor {
    type Value = Envelope;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a resource envelope object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Envelope, A::Error> {
        // The first key wins. Harvest always sends exactly one; extra keys are
        // skipped and an empty object yields an unnamed `null` body.
        let envelope = match map.next_entry::<String, Box<RawValue>>()? {
            Some((name, body)) => Envelope { name, body },
            None => Envelope {
                name: String::new(),
                body: RawValue::NULL.to_owned(),
            },
        };
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(envelope)
    }
}

/// Encodes `resource` as a request body.
///
/// ```
/// # use harvest::{envelope, Resource};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Serialize, Deserialize)]
/// # struct Widget { id: u64 }
/// # impl Resource for Widget {
/// #     const NAME: &'static str = "widget";
/// #     fn id(&self) -> u64 { self.id }
/// #     fn set_id(&mut self, id: u64) { self.id = id }
/// # }
/// let bytes = envelope::encode(&Widget { id: 3 }).unwrap();
/// assert_eq!(bytes, br#"{"widget":{"id":3}}"#);
/// ```
///
/// # Errors
///
/// Returns the serializer error if the resource cannot be encoded.
pub fn encode<T: Resource>(resource: &T) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&Envelope::wrap(resource)?)
}

/// Parses a single envelope without looking inside its body.
///
/// # Errors
///
/// Fails if `bytes` is not a JSON object.
pub fn decode(bytes: &[u8]) -> serde_json::Result<Envelope> {
    serde_json::from_slice(bytes)
}

/// Parses a single envelope and decodes its body into `T`.
///
/// # Errors
///
/// Fails if `bytes` is not an envelope or the body does not match `T`.
pub fn decode_into<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    decode(bytes)?.into_inner()
}

/// Parses an array of envelopes and decodes their bodies into a `Vec<T>`,
/// preserving order.
///
/// All envelopes are unwrapped first, then the collected bodies are decoded
/// as one JSON array in a single pass.
///
/// # Errors
///
/// Fails if `bytes` is not an array of envelopes or any body does not
/// match `T`.
pub fn decode_list_into<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<Vec<T>> {
    let envelopes: Vec<Envelope> = serde_json::from_slice(bytes)?;
    let bodies: Vec<Box<RawValue>> = envelopes.into_iter().map(Envelope::into_body).collect();
    let joined = serde_json::to_string(&bodies)?;
    serde_json::from_str(&joined)
}
