//! Raw bill-creation input as it arrives from a form
//!
//! Fields stay loosely typed (optional date text, amounts as JSON numbers or
//! strings) so the billing manager can validate them in a fixed order and
//! answer with the message for the first problem found.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One (item, quantity) pair from a selection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub item_id: Uuid,
    pub quantity: i64,
}

impl LineRequest {
    pub fn new(item_id: Uuid, quantity: i64) -> Self {
        Self { item_id, quantity }
    }
}

/// Customer-submitted bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillSubmission {
    pub customer_name: String,
    pub mobile_number: Option<String>,
    pub date: Option<String>,
    pub items: Vec<LineRequest>,
}

impl BillSubmission {
    pub fn new(customer_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            customer_name: customer_name.into(),
            date: Some(date.to_string()),
            ..Self::default()
        }
    }

    pub fn with_line(mut self, item_id: Uuid, quantity: i64) -> Self {
        self.items.push(LineRequest::new(item_id, quantity));
        self
    }

    pub fn with_mobile(mut self, mobile_number: impl Into<String>) -> Self {
        self.mobile_number = Some(mobile_number.into());
        self
    }
}

/// Owner-entered lump-sum bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickBillRequest {
    pub customer_name: String,
    pub mobile_number: Option<String>,
    pub date: Option<String>,
    pub total_amount: Option<Value>,
    pub received_amount: Option<Value>,
    pub service_types: Vec<String>,
}

impl QuickBillRequest {
    pub fn new(customer_name: impl Into<String>, date: NaiveDate, total_amount: Value) -> Self {
        Self {
            customer_name: customer_name.into(),
            date: Some(date.to_string()),
            total_amount: Some(total_amount),
            ..Self::default()
        }
    }

    pub fn with_service_type(mut self, label: impl Into<String>) -> Self {
        self.service_types.push(label.into());
        self
    }

    pub fn with_received(mut self, amount: Value) -> Self {
        self.received_amount = Some(amount);
        self
    }
}

/// Owner-entered itemized bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedBillRequest {
    pub customer_name: String,
    pub mobile_number: Option<String>,
    pub date: Option<String>,
    pub items: Vec<LineRequest>,
    pub received_amount: Option<Value>,
}

impl DetailedBillRequest {
    pub fn new(customer_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            customer_name: customer_name.into(),
            date: Some(date.to_string()),
            ..Self::default()
        }
    }

    pub fn with_line(mut self, item_id: Uuid, quantity: i64) -> Self {
        self.items.push(LineRequest::new(item_id, quantity));
        self
    }

    pub fn with_received(mut self, amount: Value) -> Self {
        self.received_amount = Some(amount);
        self
    }
}
