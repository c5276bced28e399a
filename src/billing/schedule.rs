//! Owner-facing ordering of bills around "today"
//!
//! Pending bills come first, in the order given. Everything else is split
//! by event date: past (most recent first), today, upcoming (soonest
//! first). Bills on today's date and bills on the earliest upcoming date
//! among everything listed, pending included, are flagged as nearest.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{Bill, BillStatus};

/// Where a bill lands in the arranged list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Pending,
    Past,
    Today,
    Upcoming,
}

/// A bill with its position in the arranged list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBill {
    #[serde(flatten)]
    pub bill: Bill,
    pub bucket: Bucket,
    pub nearest: bool,
    pub balance: Decimal,
}

impl ScheduledBill {
    fn new(bill: Bill, bucket: Bucket, nearest: bool) -> Self {
        let balance = bill.balance();
        Self {
            bill,
            bucket,
            nearest,
            balance,
        }
    }
}

/// Arrange bills for display relative to `today`
pub fn arrange_bills(bills: Vec<Bill>, today: NaiveDate) -> Vec<ScheduledBill> {
    let mut pending = Vec::new();
    let mut past = Vec::new();
    let mut present = Vec::new();
    let mut upcoming = Vec::new();

    for bill in bills {
        if bill.is_pending() {
            pending.push(bill);
            continue;
        }
        match bill.date.cmp(&today) {
            std::cmp::Ordering::Less => past.push(bill),
            std::cmp::Ordering::Equal => present.push(bill),
            std::cmp::Ordering::Greater => upcoming.push(bill),
        }
    }

    past.sort_by(|a, b| b.date.cmp(&a.date));
    upcoming.sort_by_key(|bill| bill.date);

    let nearest_upcoming = pending
        .iter()
        .map(|bill| bill.date)
        .filter(|date| *date > today)
        .chain(upcoming.first().map(|bill| bill.date))
        .min();
    let is_nearest = |date: NaiveDate| date == today || Some(date) == nearest_upcoming;

    let mut arranged = Vec::with_capacity(pending.len() + past.len() + present.len() + upcoming.len());
    arranged.extend(pending.into_iter().map(|bill| {
        let nearest = is_nearest(bill.date);
        ScheduledBill::new(bill, Bucket::Pending, nearest)
    }));
    arranged.extend(
        past.into_iter()
            .map(|bill| ScheduledBill::new(bill, Bucket::Past, false)),
    );
    arranged.extend(
        present
            .into_iter()
            .map(|bill| ScheduledBill::new(bill, Bucket::Today, true)),
    );
    arranged.extend(upcoming.into_iter().map(|bill| {
        let nearest = is_nearest(bill.date);
        ScheduledBill::new(bill, Bucket::Upcoming, nearest)
    }));
    arranged
}

/// Status filter for bill listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillFilter {
    All,
    /// Everything except rejected bills
    Active,
    Status(BillStatus),
}

impl BillFilter {
    pub fn matches(&self, bill: &Bill) -> bool {
        match self {
            BillFilter::All => true,
            BillFilter::Active => bill.status != BillStatus::Rejected,
            BillFilter::Status(status) => bill.status == *status,
        }
    }
}

impl Default for BillFilter {
    fn default() -> Self {
        BillFilter::Status(BillStatus::Approved)
    }
}

impl FromStr for BillFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(BillFilter::All),
            "active" => Ok(BillFilter::Active),
            other => other.parse().map(BillFilter::Status),
        }
    }
}

/// Number of bills per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally(bills: &[Bill]) -> Self {
        bills.iter().fold(Self::default(), |mut counts, bill| {
            counts.all += 1;
            match bill.status {
                BillStatus::Pending => counts.pending += 1,
                BillStatus::Approved => counts.approved += 1,
                BillStatus::Rejected => counts.rejected += 1,
            }
            counts
        })
    }
}
