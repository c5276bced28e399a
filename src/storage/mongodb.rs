//! MongoDB storage backend using the official MongoDB async driver.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! One collection per entity type, named after `Entity::resource_name()`:
//! `items`, `bills` and `bookings`.
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. UUIDs, calendar dates and timestamps
//! are therefore stored as strings; ISO 8601 dates compare correctly as
//! strings, which is what the equality and range booking queries rely on.
//! Money amounts keep their JSON form and land as BSON doubles, exact to
//! about 15 significant digits.
//! The `id` field is mapped to MongoDB's `_id` convention.

use crate::core::{BillService, BookingService, DocumentStore, Entity, ItemService};
use crate::entities::{Bill, BillDraft, BillStatus, Booking, Item, NewBooking, NewItem};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Database};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain entity convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

fn date_bson(date: NaiveDate) -> Bson {
    Bson::String(date.format("%Y-%m-%d").to_string())
}

/// Same double representation `entity_to_document` produces for amounts
fn amount_bson(amount: Decimal) -> Result<Bson> {
    mongodb::bson::to_bson(&amount).map_err(|e| anyhow!("Failed to convert amount to BSON: {}", e))
}

fn entity_to_document<T: Serialize>(entity: &T) -> Result<Document> {
    let json =
        serde_json::to_value(entity).map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
    json_to_document(json)
}

fn document_to_entity<T: DeserializeOwned>(doc: Document) -> Result<T> {
    serde_json::from_value(document_to_json(doc))
        .map_err(|e| anyhow!("Failed to deserialize entity from document: {}", e))
}

// ---------------------------------------------------------------------------
// MongoStore
// ---------------------------------------------------------------------------

/// Document store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use tent_house::storage::MongoStore;
///
/// let store = MongoStore::connect("mongodb://localhost:27017", "tent_house").await?;
/// let items = store.list_items().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Create a new `MongoStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect to `uri` and use the named database
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| anyhow!("Failed to connect to MongoDB: {}", e))?;
        Ok(Self::new(client.database(database)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection<T: Entity>(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    async fn insert<T: Entity + Serialize>(&self, entity: &T) -> Result<()> {
        self.collection::<T>()
            .insert_one(entity_to_document(entity)?)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", T::resource_name_singular(), e))?;
        Ok(())
    }

    async fn find_by_id<T: Entity + DeserializeOwned>(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection::<T>()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get {}: {}", T::resource_name_singular(), e))?;

        doc.map(document_to_entity).transpose()
    }

    async fn find_all<T: Entity + DeserializeOwned>(
        &self,
        filter: Document,
        sort: Document,
    ) -> Result<Vec<T>> {
        let cursor = self
            .collection::<T>()
            .find(filter)
            .sort(sort)
            .await
            .map_err(|e| anyhow!("Failed to list {}: {}", T::resource_name(), e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect {}: {}", T::resource_name(), e))?;

        docs.into_iter().map(document_to_entity).collect()
    }

    /// `$set` a single field and return the updated record
    async fn set_field<T: Entity + DeserializeOwned>(
        &self,
        id: &Uuid,
        field: &str,
        value: Bson,
    ) -> Result<Option<T>> {
        let doc = self
            .collection::<T>()
            .find_one_and_update(doc! { "_id": uuid_bson(id) }, doc! { "$set": { field: value } })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| anyhow!("Failed to update {}: {}", T::resource_name_singular(), e))?;

        doc.map(document_to_entity).transpose()
    }
}

#[async_trait]
impl ItemService for MongoStore {
    async fn create_item(&self, item: NewItem) -> Result<Item> {
        let item = item.into_item(Uuid::new_v4());
        self.insert(&item).await?;
        Ok(item)
    }

    async fn get_item(&self, id: &Uuid) -> Result<Option<Item>> {
        self.find_by_id(id).await
    }

    /// Sorted in process; a plain `name` sort would be case-sensitive.
    async fn list_items(&self) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self.find_all(doc! {}, doc! { "name": 1 }).await?;
        items.sort_by_cached_key(|item| item.name.to_lowercase());
        Ok(items)
    }

    async fn update_item_rate(&self, id: &Uuid, rate: Decimal) -> Result<Option<Item>> {
        self.set_field(id, "rate", amount_bson(rate)?).await
    }
}

#[async_trait]
impl BillService for MongoStore {
    async fn create_bill(&self, draft: BillDraft) -> Result<Bill> {
        let bill = draft.into_bill(Uuid::new_v4(), Utc::now());
        self.insert(&bill).await?;
        Ok(bill)
    }

    async fn get_bill(&self, id: &Uuid) -> Result<Option<Bill>> {
        self.find_by_id(id).await
    }

    async fn list_bills(&self) -> Result<Vec<Bill>> {
        let mut bills: Vec<Bill> = self.find_all(doc! {}, doc! { "createdAt": -1 }).await?;
        // RFC 3339 strings with differing sub-second precision do not sort lexically
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bills)
    }

    async fn update_bill_status(&self, id: &Uuid, status: BillStatus) -> Result<Option<Bill>> {
        self.set_field(id, "status", Bson::String(status.as_str().to_string()))
            .await
    }

    async fn update_received_amount(&self, id: &Uuid, amount: Decimal) -> Result<Option<Bill>> {
        self.set_field(id, "receivedAmount", amount_bson(amount)?)
            .await
    }
}

#[async_trait]
impl BookingService for MongoStore {
    async fn create_booking(&self, booking: NewBooking) -> Result<Booking> {
        let booking = booking.into_booking(Uuid::new_v4());
        self.insert(&booking).await?;
        Ok(booking)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.find_all(doc! {}, doc! { "date": 1 }).await
    }

    async fn find_bookings_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>> {
        self.find_all(doc! { "date": date_bson(date) }, doc! { "date": 1 })
            .await
    }

    async fn find_bookings_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>> {
        self.find_all(
            doc! { "date": { "$gte": date_bson(start), "$lte": date_bson(end) } },
            doc! { "date": 1 },
        )
        .await
    }
}

impl DocumentStore for MongoStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}
