//! Entity trait and the product record served by the demo system.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Trait for entities that flow through the fetch coordinator.
///
/// Entities are immutable once created: there is no update path, only a
/// full window replacement on the cache side.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use fetchrace::FetchEntity;
///
/// #[derive(Clone, Serialize, Deserialize)]
/// pub struct Sku {
///     pub id: String,
///     pub label: String,
/// }
///
/// impl FetchEntity for Sku {
///     fn id(&self) -> &str {
///         &self.id
///     }
/// }
/// ```
pub trait FetchEntity: Send + Sync + Clone + Serialize + DeserializeOwned {
    /// The entity's unique, stable identifier.
    ///
    /// Stable across store and cache representations.
    fn id(&self) -> &str;
}

/// Product record: the entity cached and stored by the reference system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, stable across store and cache.
    pub id: String,
    pub name: String,
    /// Unit price. Non-negative by construction at the seeding boundary.
    pub price: f64,
    pub description: String,
    pub company: String,
    /// Avatar image reference (URL or asset key).
    pub avatar: String,
    /// Material classification.
    pub material: String,
    /// Creation timestamp, milliseconds since epoch.
    pub created_at: i64,
}

impl FetchEntity for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Encode one entity as a cache item (one JSON string per list slot).
///
/// The window is a list of independently decodable items so that a single
/// corrupt slot can be dropped without discarding the rest of the window.
pub fn encode_item<T: FetchEntity>(entity: &T) -> Result<String> {
    serde_json::to_string(entity).map_err(|e| {
        error!("Cache item serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Decode one cache item back into an entity.
pub fn decode_item<T: FetchEntity>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| Error::DeserializationError(e.to_string()))
}
