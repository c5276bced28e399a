//! Store traits for the three collections
//!
//! Each trait covers exactly the access patterns the billing flows need.
//! Implementations are agnostic to the underlying storage mechanism and
//! report failures as `anyhow::Error`; the billing layer wraps them into
//! typed storage errors.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::entities::{Bill, BillDraft, BillStatus, Booking, Item, NewBooking, NewItem};

/// Catalog of rentable items
#[async_trait]
pub trait ItemService: Send + Sync {
    /// Create a new item; the store assigns the id
    async fn create_item(&self, item: NewItem) -> Result<Item>;

    /// Get an item by ID
    async fn get_item(&self, id: &Uuid) -> Result<Option<Item>>;

    /// List all items ordered by name (case-insensitive)
    async fn list_items(&self) -> Result<Vec<Item>>;

    /// Overwrite the rate of one item, returning the updated record
    /// or `None` when no such item exists
    async fn update_item_rate(&self, id: &Uuid, rate: Decimal) -> Result<Option<Item>>;
}

/// Bills, customer-submitted and owner-created alike
#[async_trait]
pub trait BillService: Send + Sync {
    /// Persist a bill; the store assigns the id and creation timestamp
    async fn create_bill(&self, draft: BillDraft) -> Result<Bill>;

    /// Get a bill by ID
    async fn get_bill(&self, id: &Uuid) -> Result<Option<Bill>>;

    /// List all bills, newest first
    async fn list_bills(&self) -> Result<Vec<Bill>>;

    /// Overwrite the status field only
    async fn update_bill_status(&self, id: &Uuid, status: BillStatus) -> Result<Option<Bill>>;

    /// Overwrite the received-amount field only
    async fn update_received_amount(&self, id: &Uuid, amount: Decimal) -> Result<Option<Bill>>;
}

/// Date reservations
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn create_booking(&self, booking: NewBooking) -> Result<Booking>;

    /// List all bookings, earliest date first
    async fn list_bookings(&self) -> Result<Vec<Booking>>;

    /// Bookings whose date equals `date`
    async fn find_bookings_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>>;

    /// Bookings with `start <= date <= end`, earliest date first
    async fn find_bookings_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>>;
}

/// A backend serving all three collections
pub trait DocumentStore: ItemService + BillService + BookingService {
    /// Short backend name used in error reports ("memory", "mongodb")
    fn backend_name(&self) -> &'static str;
}
