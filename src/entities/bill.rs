//! Bills and their line items

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Entity;

/// Lifecycle status of a bill
///
/// Customer submissions start `Pending`; owner-created bills start
/// `Approved`. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Approved,
    Rejected,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Approved => "approved",
            BillStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BillStatus::Pending)
    }

    /// Only `pending -> approved` and `pending -> rejected` are allowed
    pub fn can_transition_to(&self, next: BillStatus) -> bool {
        !self.is_terminal() && next.is_terminal()
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BillStatus::Pending),
            "approved" => Ok(BillStatus::Approved),
            "rejected" => Ok(BillStatus::Rejected),
            other => Err(format!("unknown bill status '{}'", other)),
        }
    }
}

/// Service-type tag on a bill (tent, venue, DJ, lighting, ...)
///
/// The accepted vocabulary comes from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceType(String);

impl ServiceType {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceType {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Snapshot of a catalog item at the moment it was put on a bill
///
/// Later catalog rate changes never reach an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub rate: Decimal,
}

impl LineItem {
    /// `rate × quantity`, or `None` when the product overflows
    pub fn amount(&self) -> Option<Decimal> {
        self.rate.checked_mul(Decimal::from(self.quantity))
    }

    /// Σ rate × quantity over the given lines, or `None` on overflow
    pub fn total_of(lines: &[LineItem]) -> Option<Decimal> {
        lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.amount()?))
    }
}

/// Everything a bill carries except the store-assigned id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total: Decimal,
    pub status: BillStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_amount: Option<Decimal>,
    #[serde(default)]
    pub service_types: Vec<ServiceType>,
    #[serde(default)]
    pub is_quick_bill: bool,
    #[serde(default)]
    pub created_by_owner: bool,
}

impl BillDraft {
    pub fn into_bill(self, id: Uuid, created_at: DateTime<Utc>) -> Bill {
        Bill {
            id,
            customer_name: self.customer_name,
            mobile_number: self.mobile_number,
            date: self.date,
            items: self.items,
            total: self.total,
            status: self.status,
            received_amount: self.received_amount,
            service_types: self.service_types,
            is_quick_bill: self.is_quick_bill,
            created_by_owner: self.created_by_owner,
            created_at,
        }
    }
}

/// A stored bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total: Decimal,
    pub status: BillStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_amount: Option<Decimal>,
    #[serde(default)]
    pub service_types: Vec<ServiceType>,
    #[serde(default)]
    pub is_quick_bill: bool,
    #[serde(default)]
    pub created_by_owner: bool,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// `total - received`, with an absent received amount counted as zero.
    /// Negative when the customer overpaid.
    pub fn balance(&self) -> Decimal {
        self.total - self.received_amount.unwrap_or(Decimal::ZERO)
    }

    /// Total quantity across all lines
    pub fn items_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn is_pending(&self) -> bool {
        self.status == BillStatus::Pending
    }

    pub fn is_approved(&self) -> bool {
        self.status == BillStatus::Approved
    }
}

impl Entity for Bill {
    fn resource_name() -> &'static str {
        "bills"
    }

    fn resource_name_singular() -> &'static str {
        "bill"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
