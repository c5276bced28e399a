//! Shared test harness for document store backends
//!
//! Provides draft builders for items, bills and bookings plus the
//! `document_store_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]

pub mod document_store_tests;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tent_house::entities::{BillDraft, BillStatus, LineItem, NewBooking, NewItem, ServiceType};
use uuid::Uuid;

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("valid decimal literal")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub fn new_item(name: &str, rate: &str) -> NewItem {
    NewItem::new(name, dec(rate))
}

pub fn line(name: &str, quantity: u32, rate: &str) -> LineItem {
    LineItem {
        item_id: Uuid::new_v4(),
        name: name.to_string(),
        quantity,
        rate: dec(rate),
    }
}

/// Pending customer bill with two lines, total 950
pub fn pending_draft(customer: &str, on: NaiveDate) -> BillDraft {
    let items = vec![line("Chair", 10, "15"), line("Shamiana", 2, "400")];
    BillDraft {
        customer_name: customer.to_string(),
        mobile_number: Some("9876543210".to_string()),
        date: on,
        total: LineItem::total_of(&items).expect("small totals fit"),
        items,
        status: BillStatus::Pending,
        received_amount: None,
        service_types: Vec::new(),
        is_quick_bill: false,
        created_by_owner: false,
    }
}

/// Approved owner quick bill
pub fn quick_draft(customer: &str, on: NaiveDate, total: &str) -> BillDraft {
    BillDraft {
        customer_name: customer.to_string(),
        mobile_number: None,
        date: on,
        items: Vec::new(),
        total: dec(total),
        status: BillStatus::Approved,
        received_amount: Some(dec("500")),
        service_types: vec![ServiceType::new("Tent"), ServiceType::new("DJ")],
        is_quick_bill: true,
        created_by_owner: true,
    }
}

pub fn new_booking(customer: &str, on: NaiveDate) -> NewBooking {
    NewBooking {
        date: on,
        bill_id: Uuid::new_v4(),
        customer_name: customer.to_string(),
    }
}
