//! The capabilities the CRUD engine needs from a resource type.

use serde::{de::DeserializeOwned, Serialize};

/// A remote entity the engine can list, fetch, create, update and delete.
///
/// The engine never touches a resource's fields directly. It reads the
/// identifier through [`Resource::id`], assigns server-issued identifiers
/// through [`Resource::set_id`], and wraps the serialized body in an envelope
/// keyed by [`Resource::NAME`].
///
/// # Examples
///
/// ```
/// use harvest::Resource;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Widget {
///     #[serde(default)]
///     id: u64,
///     label: String,
/// }
///
/// impl Resource for Widget {
///     const NAME: &'static str = "widget";
///
///     fn id(&self) -> u64 {
///         self.id
///     }
///
///     fn set_id(&mut self, id: u64) {
///         self.id = id;
///     }
/// }
/// ```
pub trait Resource: Serialize + DeserializeOwned {
    /// The envelope key, the lower-cased type name (`"user"`, `"dayentry"`).
    const NAME: &'static str;

    /// The server-issued identifier, `0` while unsaved.
    fn id(&self) -> u64;

    /// Stores a server-issued identifier.
    fn set_id(&mut self, id: u64);
}

/// A resource with an active/archived flag the server can flip.
pub trait Toggle: Resource {
    /// Returns the current active state.
    fn is_active(&self) -> bool;

    /// Flips the active state and returns the new value.
    fn toggle_active(&mut self) -> bool;
}
