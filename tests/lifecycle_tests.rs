//! Bill lifecycle tests against the in-memory store
//!
//! "Today" is pinned to 2025-06-15 throughout.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use tent_house::prelude::*;
use uuid::Uuid;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 6, 15)
}

fn manager_on(store: Arc<dyn DocumentStore>) -> BillingManager {
    BillingManager::new(store).with_clock(Arc::new(FixedClock(today())))
}

fn manager() -> BillingManager {
    manager_on(Arc::new(InMemoryStore::new()))
}

async fn seed_items(manager: &BillingManager) -> (Item, Item) {
    let chair = manager.create_item("Chair", &json!(15)).await.unwrap();
    let shamiana = manager.create_item("Shamiana", &json!("400")).await.unwrap();
    (chair, shamiana)
}

async fn quick_bill(manager: &BillingManager, customer: &str, on: NaiveDate) -> BookedBill {
    manager
        .create_quick_bill(
            QuickBillRequest::new(customer, on, json!(1000)).with_service_type("Tent"),
        )
        .await
        .unwrap()
}

fn field_of(err: &TentError) -> Option<&str> {
    match err {
        TentError::Validation(ValidationError::FieldError { field, .. }) => Some(field.as_str()),
        _ => None,
    }
}

fn message_of(err: &TentError) -> String {
    match err {
        TentError::Validation(ValidationError::FieldError { message, .. }) => message.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Customer submission
// ============================================================================

#[tokio::test]
async fn test_itemized_total_is_sum_of_rate_times_quantity() {
    let manager = manager();
    let (chair, shamiana) = seed_items(&manager).await;

    let bill = manager
        .submit_bill(
            BillSubmission::new("Ravi Kumar", date(2025, 7, 1))
                .with_line(chair.id, 10)
                .with_line(shamiana.id, 2),
        )
        .await
        .unwrap();

    let expected: Decimal = bill
        .items
        .iter()
        .map(|line| line.rate * Decimal::from(line.quantity))
        .sum();
    assert_eq!(bill.total, expected);
    assert_eq!(bill.total, dec("950"));
    assert_eq!(bill.items_count(), 12);
    assert_eq!(bill.status, BillStatus::Pending);
    assert!(!bill.created_by_owner);
    assert!(!bill.is_quick_bill);
}

#[tokio::test]
async fn test_submission_creates_no_booking() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;

    manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 1)).with_line(chair.id, 1))
        .await
        .unwrap();

    assert!(manager.list_bookings().await.unwrap().is_empty());
    assert!(!manager.is_date_booked(date(2025, 7, 1)).await.unwrap());
}

#[tokio::test]
async fn test_submission_on_booked_date_is_refused_before_any_write() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;
    quick_bill(&manager, "Owner Entry", date(2025, 7, 1)).await;

    let before = manager.list_bills(BillFilter::All).await.unwrap().bills.len();
    let err = manager
        .submit_bill(BillSubmission::new("Late Customer", date(2025, 7, 1)).with_line(chair.id, 3))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TentError::Validation(ValidationError::DateUnavailable { date: d }) if d == date(2025, 7, 1)
    ));
    assert_eq!(err.error_code(), "DATE_UNAVAILABLE");
    let after = manager.list_bills(BillFilter::All).await.unwrap().bills.len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_availability_is_exact_date_equality() {
    let manager = manager();
    quick_bill(&manager, "Booked", date(2025, 7, 1)).await;

    assert!(manager.is_date_booked(date(2025, 7, 1)).await.unwrap());
    assert!(!manager.is_date_booked(date(2025, 6, 30)).await.unwrap());
    assert!(!manager.is_date_booked(date(2025, 7, 2)).await.unwrap());
}

#[tokio::test]
async fn test_submission_validation_order() {
    let manager = manager();
    quick_bill(&manager, "Booked", date(2025, 7, 1)).await;

    // Name is checked before everything else
    let mut request = BillSubmission::new("   ", date(2025, 7, 1));
    request.date = None;
    let err = manager.submit_bill(request).await.unwrap_err();
    assert_eq!(field_of(&err), Some("customerName"));
    assert_eq!(message_of(&err), "Please enter customer name");

    // Then the date
    let mut request = BillSubmission::new("Ravi", date(2025, 7, 1));
    request.date = None;
    let err = manager.submit_bill(request).await.unwrap_err();
    assert_eq!(field_of(&err), Some("date"));
    assert_eq!(message_of(&err), "Please select a date");

    // Then availability, even with an empty selection
    let err = manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 1)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TentError::Validation(ValidationError::DateUnavailable { .. })
    ));

    // Then the selection
    let err = manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 2)))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("items"));
    assert_eq!(message_of(&err), "Please add at least one item");
}

#[tokio::test]
async fn test_submission_rejects_malformed_date() {
    let manager = manager();
    let mut request = BillSubmission::new("Ravi", date(2025, 7, 1));
    request.date = Some("01/07/2025".to_string());

    let err = manager.submit_bill(request).await.unwrap_err();
    assert_eq!(field_of(&err), Some("date"));
}

#[tokio::test]
async fn test_submission_rejects_unknown_item() {
    let manager = manager();
    let err = manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 1)).with_line(Uuid::new_v4(), 2))
        .await
        .unwrap_err();

    assert_eq!(field_of(&err), Some("items"));
    assert!(message_of(&err).starts_with("Unknown item"));
}

#[tokio::test]
async fn test_submission_with_only_zero_quantities_is_empty() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;

    let err = manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 1)).with_line(chair.id, 0))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("items"));
}

#[tokio::test]
async fn test_submission_rejects_bad_mobile_number() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;

    let err = manager
        .submit_bill(
            BillSubmission::new("Ravi", date(2025, 7, 1))
                .with_line(chair.id, 1)
                .with_mobile("call me"),
        )
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("mobileNumber"));
}

#[tokio::test]
async fn test_later_quantity_for_same_item_wins() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;

    let bill = manager
        .submit_bill(
            BillSubmission::new("Ravi", date(2025, 7, 1))
                .with_line(chair.id, 4)
                .with_line(chair.id, 6),
        )
        .await
        .unwrap();

    assert_eq!(bill.items.len(), 1);
    assert_eq!(bill.items[0].quantity, 6);
    assert_eq!(bill.total, dec("90"));
}

#[tokio::test]
async fn test_line_items_keep_rate_after_catalog_change() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;

    let bill = manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 1)).with_line(chair.id, 10))
        .await
        .unwrap();
    manager.update_item_rate(chair.id, &json!(25)).await.unwrap();

    let stored = manager.get_bill(bill.id).await.unwrap();
    assert_eq!(stored.items[0].rate, dec("15"));
    assert_eq!(stored.total, dec("150"));
}

#[tokio::test]
async fn test_total_too_large_is_refused_without_writing() {
    let manager = manager();
    let palace = manager
        .create_item("Palace", &json!("10000000000000000000000000000"))
        .await
        .unwrap();

    let err = manager
        .submit_bill(BillSubmission::new("Raja", date(2025, 7, 1)).with_line(palace.id, 100))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("items"));
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    let err = manager
        .create_detailed_bill(
            DetailedBillRequest::new("Raja", date(2025, 7, 2))
                .with_line(palace.id, 1)
                .with_line(palace.id, 100),
        )
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("items"));

    assert!(manager.list_bills(BillFilter::All).await.unwrap().bills.is_empty());
    assert!(manager.list_bookings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quantity_above_u32_range_is_refused() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;

    let err = manager
        .submit_bill(
            BillSubmission::new("Ravi", date(2025, 7, 1))
                .with_line(chair.id, i64::from(u32::MAX) + 1),
        )
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("items"));
    assert!(message_of(&err).contains("too large"));
    assert!(manager.list_bills(BillFilter::All).await.unwrap().bills.is_empty());
}

// ============================================================================
// Owner direct creation
// ============================================================================

#[tokio::test]
async fn test_quick_bill_is_approved_booked_and_balanced() {
    let manager = manager();

    let booked = manager
        .create_quick_bill(
            QuickBillRequest::new("Sharma Wedding", date(2025, 11, 20), json!("1000"))
                .with_service_type("tent")
                .with_service_type("DJ")
                .with_received(json!(400)),
        )
        .await
        .unwrap();

    let bill = &booked.bill;
    assert_eq!(bill.status, BillStatus::Approved);
    assert!(bill.is_quick_bill);
    assert!(bill.created_by_owner);
    assert!(bill.items.is_empty());
    assert_eq!(bill.balance(), dec("600"));
    assert_eq!(
        bill.service_types,
        vec![ServiceType::new("Tent"), ServiceType::new("DJ")]
    );

    let bookings = manager.list_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].bill_id, bill.id);
    assert_eq!(bookings[0].date, date(2025, 11, 20));
    assert_eq!(bookings[0].customer_name, "Sharma Wedding");
    assert_eq!(booked.booking, bookings[0]);
}

#[tokio::test]
async fn test_quick_bill_validation() {
    let manager = manager();
    let on = date(2025, 8, 1);

    let err = manager
        .create_quick_bill(QuickBillRequest::new("Ravi", on, json!(0)).with_service_type("Tent"))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("totalAmount"));

    let err = manager
        .create_quick_bill(QuickBillRequest::new("Ravi", on, json!("abc")).with_service_type("Tent"))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("totalAmount"));

    let err = manager
        .create_quick_bill(QuickBillRequest::new("Ravi", on, json!(500)))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("serviceTypes"));
    assert_eq!(message_of(&err), "Please select at least one service type");

    let err = manager
        .create_quick_bill(QuickBillRequest::new("Ravi", on, json!(500)).with_service_type("Catering"))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("serviceTypes"));

    let err = manager
        .create_quick_bill(
            QuickBillRequest::new("Ravi", on, json!(500))
                .with_service_type("Tent")
                .with_received(json!(-5)),
        )
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("receivedAmount"));

    assert!(manager.list_bookings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_owner_creation_skips_date_check() {
    let manager = manager();
    quick_bill(&manager, "First", date(2025, 9, 9)).await;
    quick_bill(&manager, "Second", date(2025, 9, 9)).await;

    let bookings = manager
        .bookings_between(date(2025, 9, 9), date(2025, 9, 9))
        .await
        .unwrap();
    assert_eq!(bookings.len(), 2);
}

#[tokio::test]
async fn test_detailed_bill_gets_default_tag_and_booking() {
    let manager = manager();
    let (chair, shamiana) = seed_items(&manager).await;

    let booked = manager
        .create_detailed_bill(
            DetailedBillRequest::new("Gupta Function", date(2025, 10, 2))
                .with_line(shamiana.id, 1)
                .with_line(chair.id, 20)
                .with_received(json!("")),
        )
        .await
        .unwrap();

    let bill = &booked.bill;
    assert_eq!(bill.status, BillStatus::Approved);
    assert!(!bill.is_quick_bill);
    assert!(bill.created_by_owner);
    assert_eq!(bill.total, dec("700"));
    assert_eq!(bill.received_amount, None);
    assert_eq!(bill.service_types, vec![ServiceType::new("Tent")]);
    assert_eq!(bill.items[0].name, "Shamiana");
    assert_eq!(booked.booking.bill_id, bill.id);
}

#[tokio::test]
async fn test_detailed_bill_requires_items() {
    let manager = manager();
    let err = manager
        .create_detailed_bill(DetailedBillRequest::new("Gupta", date(2025, 10, 2)))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("items"));
}

// ============================================================================
// Approval and rejection
// ============================================================================

#[tokio::test]
async fn test_approve_books_the_date() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;
    let bill = manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 4)).with_line(chair.id, 5))
        .await
        .unwrap();

    let booked = manager.approve_bill(bill.id).await.unwrap();

    assert_eq!(booked.bill.status, BillStatus::Approved);
    assert_eq!(booked.booking.bill_id, bill.id);
    assert_eq!(booked.booking.date, date(2025, 7, 4));
    assert!(manager.is_date_booked(date(2025, 7, 4)).await.unwrap());
}

#[tokio::test]
async fn test_reject_leaves_date_free() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;
    let bill = manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 4)).with_line(chair.id, 5))
        .await
        .unwrap();

    let rejected = manager.reject_bill(bill.id).await.unwrap();

    assert_eq!(rejected.status, BillStatus::Rejected);
    assert!(!manager.is_date_booked(date(2025, 7, 4)).await.unwrap());
}

#[tokio::test]
async fn test_terminal_states_do_not_transition() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;
    let approved = manager
        .submit_bill(BillSubmission::new("A", date(2025, 7, 4)).with_line(chair.id, 1))
        .await
        .unwrap();
    let rejected = manager
        .submit_bill(BillSubmission::new("B", date(2025, 7, 5)).with_line(chair.id, 1))
        .await
        .unwrap();
    manager.approve_bill(approved.id).await.unwrap();
    manager.reject_bill(rejected.id).await.unwrap();

    let err = manager.reject_bill(approved.id).await.unwrap_err();
    assert!(matches!(
        err,
        TentError::Lifecycle(LifecycleError::InvalidTransition {
            from: BillStatus::Approved,
            to: BillStatus::Rejected,
            ..
        })
    ));
    assert_eq!(err.error_code(), "INVALID_TRANSITION");

    let err = manager.approve_bill(rejected.id).await.unwrap_err();
    assert!(matches!(
        err,
        TentError::Lifecycle(LifecycleError::InvalidTransition {
            from: BillStatus::Rejected,
            ..
        })
    ));

    // A second approval creates no second booking
    assert!(manager.approve_bill(approved.id).await.is_err());
    assert_eq!(manager.list_bookings().await.unwrap().len(), 1);
    assert_eq!(
        manager.get_bill(approved.id).await.unwrap().status,
        BillStatus::Approved
    );
    assert_eq!(
        manager.get_bill(rejected.id).await.unwrap().status,
        BillStatus::Rejected
    );
}

#[tokio::test]
async fn test_unknown_bill_is_not_found() {
    let manager = manager();
    let id = Uuid::new_v4();

    for err in [
        manager.get_bill(id).await.unwrap_err(),
        manager.approve_bill(id).await.unwrap_err(),
        manager.reject_bill(id).await.unwrap_err(),
        manager
            .record_received_amount(id, &json!(10))
            .await
            .unwrap_err(),
    ] {
        assert!(matches!(err, TentError::Entity(EntityError::NotFound { .. })));
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }
}

// ============================================================================
// Received amount
// ============================================================================

#[tokio::test]
async fn test_received_amount_accepts_numbers_and_strings() {
    let manager = manager();
    let booked = quick_bill(&manager, "Ravi", date(2025, 8, 8)).await;

    let bill = manager
        .record_received_amount(booked.bill.id, &json!("250.50"))
        .await
        .unwrap();
    assert_eq!(bill.received_amount, Some(dec("250.50")));
    assert_eq!(bill.balance(), dec("749.50"));

    let bill = manager
        .record_received_amount(booked.bill.id, &json!(0))
        .await
        .unwrap();
    assert_eq!(bill.balance(), dec("1000"));
}

#[tokio::test]
async fn test_balance_may_go_negative() {
    let manager = manager();
    let booked = quick_bill(&manager, "Overpaid", date(2025, 8, 8)).await;

    let bill = manager
        .record_received_amount(booked.bill.id, &json!(1500))
        .await
        .unwrap();
    assert_eq!(bill.balance(), dec("-500"));
}

#[tokio::test]
async fn test_received_amount_rules() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;
    let booked = quick_bill(&manager, "Ravi", date(2025, 8, 8)).await;
    let pending = manager
        .submit_bill(BillSubmission::new("Pending", date(2025, 8, 9)).with_line(chair.id, 1))
        .await
        .unwrap();

    let err = manager
        .record_received_amount(booked.bill.id, &json!(-1))
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), Some("receivedAmount"));

    let err = manager
        .record_received_amount(booked.bill.id, &json!("plenty"))
        .await
        .unwrap_err();
    assert_eq!(message_of(&err), "Please enter a valid amount");

    let err = manager
        .record_received_amount(pending.id, &json!(100))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TentError::Lifecycle(LifecycleError::NotApproved {
            status: BillStatus::Pending,
            ..
        })
    ));
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_rules() {
    let manager = manager();

    let item = manager.create_item("  Gadda  ", &json!("35")).await.unwrap();
    assert_eq!(item.name, "Gadda");

    let err = manager.create_item("Pillow", &json!(0)).await.unwrap_err();
    assert_eq!(field_of(&err), Some("rate"));
    let err = manager.create_item(" ", &json!(10)).await.unwrap_err();
    assert_eq!(field_of(&err), Some("name"));

    let updated = manager.update_item_rate(item.id, &json!(0)).await.unwrap();
    assert_eq!(updated.rate, Decimal::ZERO);
    let err = manager.update_item_rate(item.id, &json!(-3)).await.unwrap_err();
    assert_eq!(field_of(&err), Some("rate"));

    let err = manager
        .update_item_rate(Uuid::new_v4(), &json!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, TentError::Entity(EntityError::NotFound { .. })));
}

#[tokio::test]
async fn test_items_listed_by_name_case_insensitive() {
    let manager = manager();
    for name in ["shamiana", "Chair", "bulb", "Dari"] {
        manager.create_item(name, &json!(10)).await.unwrap();
    }

    let names: Vec<String> = manager
        .list_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["bulb", "Chair", "Dari", "shamiana"]);
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_chronological_ordering_around_today() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;

    for on in [
        date(2026, 1, 1),
        date(2025, 1, 1),
        date(2025, 12, 25),
        date(2025, 6, 15),
    ] {
        quick_bill(&manager, &on.to_string(), on).await;
    }
    manager
        .submit_bill(BillSubmission::new("Early Bird", date(2024, 1, 1)).with_line(chair.id, 1))
        .await
        .unwrap();

    let listing = manager.list_bills(BillFilter::All).await.unwrap();
    let order: Vec<(NaiveDate, Bucket, bool)> = listing
        .bills
        .iter()
        .map(|entry| (entry.bill.date, entry.bucket, entry.nearest))
        .collect();

    assert_eq!(
        order,
        vec![
            (date(2024, 1, 1), Bucket::Pending, false),
            (date(2025, 1, 1), Bucket::Past, false),
            (date(2025, 6, 15), Bucket::Today, true),
            (date(2025, 12, 25), Bucket::Upcoming, true),
            (date(2026, 1, 1), Bucket::Upcoming, false),
        ]
    );
    assert_eq!(listing.counts.all, 5);
    assert_eq!(listing.counts.pending, 1);
    assert_eq!(listing.counts.approved, 4);
}

#[tokio::test]
async fn test_nearest_counts_displayed_pending_bills() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;
    manager
        .submit_bill(BillSubmission::new("Pending", date(2025, 6, 16)).with_line(chair.id, 1))
        .await
        .unwrap();
    quick_bill(&manager, "Approved", date(2025, 6, 18)).await;

    let flags = |listing: BillListing| -> Vec<(String, bool)> {
        listing
            .bills
            .into_iter()
            .map(|entry| (entry.bill.customer_name, entry.nearest))
            .collect()
    };

    for filter in [BillFilter::All, BillFilter::Active] {
        let listing = manager.list_bills(filter).await.unwrap();
        assert_eq!(
            flags(listing),
            vec![("Pending".to_string(), true), ("Approved".to_string(), false)]
        );
    }

    let listing = manager.list_bills(BillFilter::default()).await.unwrap();
    assert_eq!(flags(listing), vec![("Approved".to_string(), true)]);
}

#[tokio::test]
async fn test_list_bills_filters_by_status() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;
    let pending = manager
        .submit_bill(BillSubmission::new("Pending", date(2025, 7, 1)).with_line(chair.id, 1))
        .await
        .unwrap();
    let rejected = manager
        .submit_bill(BillSubmission::new("Rejected", date(2025, 7, 2)).with_line(chair.id, 1))
        .await
        .unwrap();
    manager.reject_bill(rejected.id).await.unwrap();
    quick_bill(&manager, "Approved", date(2025, 7, 3)).await;

    let approved = manager.list_bills(BillFilter::default()).await.unwrap();
    assert_eq!(approved.bills.len(), 1);
    assert_eq!(approved.bills[0].bill.customer_name, "Approved");
    assert_eq!(approved.counts.rejected, 1);

    let pending_only = manager
        .list_bills(BillFilter::Status(BillStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending_only.bills.len(), 1);
    assert_eq!(pending_only.bills[0].bill.id, pending.id);

    let active = manager.list_bills(BillFilter::Active).await.unwrap();
    assert_eq!(active.bills.len(), 2);
}

#[tokio::test]
async fn test_bookings_between_is_inclusive_and_ordered() {
    let manager = manager();
    for on in [date(2025, 7, 31), date(2025, 7, 1), date(2025, 8, 1), date(2025, 6, 30)] {
        quick_bill(&manager, "Booked", on).await;
    }

    let july: Vec<NaiveDate> = manager
        .bookings_between(date(2025, 7, 1), date(2025, 7, 31))
        .await
        .unwrap()
        .into_iter()
        .map(|booking| booking.date)
        .collect();
    assert_eq!(july, vec![date(2025, 7, 1), date(2025, 7, 31)]);

    let err = manager
        .bookings_between(date(2025, 8, 1), date(2025, 7, 1))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

// ============================================================================
// Dashboard and reconciliation
// ============================================================================

#[tokio::test]
async fn test_dashboard_snapshot() {
    let manager = manager();
    let (chair, _) = seed_items(&manager).await;
    quick_bill(&manager, "Today", today()).await;
    quick_bill(&manager, "Later", date(2025, 7, 10)).await;
    manager
        .submit_bill(BillSubmission::new("Waiting", date(2025, 7, 11)).with_line(chair.id, 2))
        .await
        .unwrap();
    let rejected = manager
        .submit_bill(BillSubmission::new("Declined", date(2025, 7, 12)).with_line(chair.id, 2))
        .await
        .unwrap();
    manager.reject_bill(rejected.id).await.unwrap();

    let snapshot = manager.dashboard().await.unwrap();

    assert_eq!(snapshot.today, today());
    assert_eq!(snapshot.pending_count, 1);
    assert_eq!(snapshot.approved_count, 2);
    assert_eq!(snapshot.item_count, 2);
    assert_eq!(snapshot.today_bookings.len(), 1);
    assert_eq!(snapshot.today_bookings[0].customer_name, "Today");
    assert_eq!(snapshot.bills.len(), 3);
    assert_eq!(snapshot.bills[0].bucket, Bucket::Pending);
    assert!(
        snapshot
            .bills
            .iter()
            .all(|entry| entry.bill.status != BillStatus::Rejected)
    );
}

#[tokio::test]
async fn test_reconciliation_reports_double_booked_dates() {
    let manager = manager();
    quick_bill(&manager, "First", date(2025, 9, 9)).await;
    quick_bill(&manager, "Second", date(2025, 9, 9)).await;
    quick_bill(&manager, "Alone", date(2025, 9, 10)).await;

    let report = manager.reconciliation().await.unwrap();

    assert!(!report.is_clean());
    assert!(report.unbooked_approved_bills.is_empty());
    assert_eq!(report.double_booked_dates.len(), 1);
    assert_eq!(report.double_booked_dates[0].date, date(2025, 9, 9));
}

// ============================================================================
// Store failures
// ============================================================================

/// In-memory store whose booking writes always fail
struct FailingBookings {
    inner: InMemoryStore,
}

#[async_trait]
impl ItemService for FailingBookings {
    async fn create_item(&self, item: NewItem) -> Result<Item> {
        self.inner.create_item(item).await
    }

    async fn get_item(&self, id: &Uuid) -> Result<Option<Item>> {
        self.inner.get_item(id).await
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        self.inner.list_items().await
    }

    async fn update_item_rate(&self, id: &Uuid, rate: Decimal) -> Result<Option<Item>> {
        self.inner.update_item_rate(id, rate).await
    }
}

#[async_trait]
impl BillService for FailingBookings {
    async fn create_bill(&self, draft: BillDraft) -> Result<Bill> {
        self.inner.create_bill(draft).await
    }

    async fn get_bill(&self, id: &Uuid) -> Result<Option<Bill>> {
        self.inner.get_bill(id).await
    }

    async fn list_bills(&self) -> Result<Vec<Bill>> {
        self.inner.list_bills().await
    }

    async fn update_bill_status(&self, id: &Uuid, status: BillStatus) -> Result<Option<Bill>> {
        self.inner.update_bill_status(id, status).await
    }

    async fn update_received_amount(&self, id: &Uuid, amount: Decimal) -> Result<Option<Bill>> {
        self.inner.update_received_amount(id, amount).await
    }
}

#[async_trait]
impl BookingService for FailingBookings {
    async fn create_booking(&self, _booking: NewBooking) -> Result<Booking> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.inner.list_bookings().await
    }

    async fn find_bookings_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>> {
        self.inner.find_bookings_by_date(date).await
    }

    async fn find_bookings_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>> {
        self.inner.find_bookings_between(start, end).await
    }
}

impl DocumentStore for FailingBookings {
    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn test_booking_failure_after_approval_is_reported() {
    let manager = manager_on(Arc::new(FailingBookings {
        inner: InMemoryStore::new(),
    }));
    let (chair, _) = seed_items(&manager).await;
    let bill = manager
        .submit_bill(BillSubmission::new("Ravi", date(2025, 7, 4)).with_line(chair.id, 1))
        .await
        .unwrap();

    let err = manager.approve_bill(bill.id).await.unwrap_err();
    match &err {
        TentError::Storage(StorageError::BookingNotRecorded { bill_id, message }) => {
            assert_eq!(*bill_id, bill.id);
            assert!(message.contains("connection reset by peer"));
        }
        other => panic!("expected BookingNotRecorded, got {:?}", other),
    }

    // The status write stuck; the gap shows up in the report
    assert_eq!(
        manager.get_bill(bill.id).await.unwrap().status,
        BillStatus::Approved
    );
    let report = manager.reconciliation().await.unwrap();
    assert_eq!(report.unbooked_approved_bills.len(), 1);
    assert_eq!(report.unbooked_approved_bills[0].id, bill.id);
}

#[tokio::test]
async fn test_booking_failure_on_quick_bill_is_reported() {
    let manager = manager_on(Arc::new(FailingBookings {
        inner: InMemoryStore::new(),
    }));

    let err = manager
        .create_quick_bill(
            QuickBillRequest::new("Ravi", date(2025, 7, 4), json!(800)).with_service_type("Palace"),
        )
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "BOOKING_NOT_RECORDED");
    assert_eq!(manager.list_bills(BillFilter::All).await.unwrap().bills.len(), 1);
}
