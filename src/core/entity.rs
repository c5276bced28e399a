//! Entity trait shared by every stored record

use uuid::Uuid;

/// Base trait for records kept in the document store.
///
/// The resource name doubles as the collection name for document backends
/// and as the entity type reported in not-found errors.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name (e.g., "bills", "items")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "bill", "item")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;
}
