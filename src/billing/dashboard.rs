//! Owner dashboard snapshot

use chrono::NaiveDate;
use serde::Serialize;

use super::manager::BillingManager;
use super::schedule::{BillFilter, ScheduledBill, arrange_bills};
use crate::core::error::TentResult;
use crate::entities::{BillStatus, Booking};

/// Everything the owner's landing screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub today: NaiveDate,
    pub pending_count: usize,
    pub approved_count: usize,
    pub today_bookings: Vec<Booking>,
    pub item_count: usize,
    /// Non-rejected bills, arranged around today
    pub bills: Vec<ScheduledBill>,
}

impl BillingManager {
    /// Load bills, bookings and items concurrently and summarize them
    pub async fn dashboard(&self) -> TentResult<DashboardSnapshot> {
        let store = self.store();
        let (bills, bookings, items) =
            tokio::try_join!(store.list_bills(), store.list_bookings(), store.list_items())
                .map_err(self.storage("load dashboard"))?;

        let today = self.today();
        let count = |status: BillStatus| bills.iter().filter(|bill| bill.status == status).count();
        let pending_count = count(BillStatus::Pending);
        let approved_count = count(BillStatus::Approved);

        let today_bookings = bookings
            .into_iter()
            .filter(|booking| booking.date == today)
            .collect();
        let active = bills
            .into_iter()
            .filter(|bill| BillFilter::Active.matches(bill))
            .collect();

        Ok(DashboardSnapshot {
            today,
            pending_count,
            approved_count,
            today_bookings,
            item_count: items.len(),
            bills: arrange_bills(active, today),
        })
    }
}
