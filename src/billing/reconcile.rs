//! Consistency report between bills and bookings
//!
//! Approval writes the bill status and the booking in two separate calls,
//! and owner-created bills skip the date check. This report finds what
//! either gap left behind. It never writes.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use super::manager::BillingManager;
use crate::core::error::TentResult;
use crate::entities::{Bill, Booking};

/// One date carrying more than one booking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateConflict {
    pub date: NaiveDate,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    /// Approved bills with no booking referencing them
    pub unbooked_approved_bills: Vec<Bill>,
    /// Dates booked more than once, earliest first
    pub double_booked_dates: Vec<DateConflict>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.unbooked_approved_bills.is_empty() && self.double_booked_dates.is_empty()
    }
}

/// Compare bills against bookings
pub fn reconcile(bills: &[Bill], bookings: &[Booking]) -> ReconciliationReport {
    let booked: HashSet<_> = bookings.iter().map(|booking| booking.bill_id).collect();
    let unbooked_approved_bills = bills
        .iter()
        .filter(|bill| bill.is_approved() && !booked.contains(&bill.id))
        .cloned()
        .collect();

    let mut by_date: BTreeMap<NaiveDate, Vec<Booking>> = BTreeMap::new();
    for booking in bookings {
        by_date.entry(booking.date).or_default().push(booking.clone());
    }
    let double_booked_dates = by_date
        .into_iter()
        .filter(|(_, bookings)| bookings.len() > 1)
        .map(|(date, bookings)| DateConflict { date, bookings })
        .collect();

    ReconciliationReport {
        unbooked_approved_bills,
        double_booked_dates,
    }
}

impl BillingManager {
    pub async fn reconciliation(&self) -> TentResult<ReconciliationReport> {
        let store = self.store();
        let (bills, bookings) = tokio::try_join!(store.list_bills(), store.list_bookings())
            .map_err(self.storage("load reconciliation"))?;

        let report = reconcile(&bills, &bookings);
        if !report.is_clean() {
            warn!(
                unbooked = report.unbooked_approved_bills.len(),
                double_booked = report.double_booked_dates.len(),
                "bills and bookings disagree"
            );
        }
        Ok(report)
    }
}
