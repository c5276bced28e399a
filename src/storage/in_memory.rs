//! In-memory document store for testing and development

use crate::core::{BillService, BookingService, DocumentStore, ItemService};
use crate::entities::{Bill, BillDraft, BillStatus, Booking, Item, NewBooking, NewItem};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory implementation of all three collections
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Clones share the same underlying data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
    bills: Arc<RwLock<HashMap<Uuid, Bill>>>,
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemService for InMemoryStore {
    async fn create_item(&self, item: NewItem) -> Result<Item> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let item = item.into_item(Uuid::new_v4());
        items.insert(item.id, item.clone());

        Ok(item)
    }

    async fn get_item(&self, id: &Uuid) -> Result<Option<Item>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(items.get(id).cloned())
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut list: Vec<Item> = items.values().cloned().collect();
        list.sort_by_cached_key(|item| item.name.to_lowercase());

        Ok(list)
    }

    async fn update_item_rate(&self, id: &Uuid, rate: Decimal) -> Result<Option<Item>> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(items.get_mut(id).map(|item| {
            item.rate = rate;
            item.clone()
        }))
    }
}

#[async_trait]
impl BillService for InMemoryStore {
    async fn create_bill(&self, draft: BillDraft) -> Result<Bill> {
        let mut bills = self
            .bills
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let bill = draft.into_bill(Uuid::new_v4(), Utc::now());
        bills.insert(bill.id, bill.clone());

        Ok(bill)
    }

    async fn get_bill(&self, id: &Uuid) -> Result<Option<Bill>> {
        let bills = self
            .bills
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(bills.get(id).cloned())
    }

    async fn list_bills(&self) -> Result<Vec<Bill>> {
        let bills = self
            .bills
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut list: Vec<Bill> = bills.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(list)
    }

    async fn update_bill_status(&self, id: &Uuid, status: BillStatus) -> Result<Option<Bill>> {
        let mut bills = self
            .bills
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(bills.get_mut(id).map(|bill| {
            bill.status = status;
            bill.clone()
        }))
    }

    async fn update_received_amount(&self, id: &Uuid, amount: Decimal) -> Result<Option<Bill>> {
        let mut bills = self
            .bills
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(bills.get_mut(id).map(|bill| {
            bill.received_amount = Some(amount);
            bill.clone()
        }))
    }
}

#[async_trait]
impl BookingService for InMemoryStore {
    async fn create_booking(&self, booking: NewBooking) -> Result<Booking> {
        let mut bookings = self
            .bookings
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let booking = booking.into_booking(Uuid::new_v4());
        bookings.insert(booking.id, booking.clone());

        Ok(booking)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let bookings = self
            .bookings
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut list: Vec<Booking> = bookings.values().cloned().collect();
        list.sort_by_key(|booking| booking.date);

        Ok(list)
    }

    async fn find_bookings_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>> {
        let bookings = self
            .bookings
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(bookings
            .values()
            .filter(|booking| booking.date == date)
            .cloned()
            .collect())
    }

    async fn find_bookings_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>> {
        let bookings = self
            .bookings
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut list: Vec<Booking> = bookings
            .values()
            .filter(|booking| booking.date >= start && booking.date <= end)
            .cloned()
            .collect();
        list.sort_by_key(|booking| booking.date);

        Ok(list)
    }
}

impl DocumentStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
