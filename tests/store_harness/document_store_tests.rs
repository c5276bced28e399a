//! Macro-generated test suite for `DocumentStore` contract validation.
//!
//! The `document_store_tests!` macro generates a test module that validates
//! any `DocumentStore` implementation against the access patterns the
//! billing layer relies on.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! use tent_house::storage::InMemoryStore;
//!
//! document_store_tests!(InMemoryStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Items
//! - `test_create_and_get_item` — store assigns an id, record reads back
//! - `test_get_missing_item` — unknown id returns None
//! - `test_list_items_sorted_by_name` — case-insensitive name order
//! - `test_update_item_rate` — only the rate changes
//! - `test_update_missing_item_rate` — unknown id returns None
//!
//! ## Bills
//! - `test_create_and_get_bill` — every field survives the round trip
//! - `test_list_bills_newest_first` — creation time descending
//! - `test_update_bill_status` — status changes, nothing else does
//! - `test_update_received_amount` — received amount changes, status kept
//! - `test_update_missing_bill` — both single-field updates return None
//!
//! ## Bookings
//! - `test_find_bookings_by_date` — equality on date
//! - `test_list_bookings_by_date` — date ascending
//! - `test_find_bookings_between_inclusive` — both bounds included
//!
//! ## Concurrency
//! - `test_concurrent_bill_creation` — parallel creates from spawned tasks

/// Generate a full `DocumentStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to a fresh, empty store.
/// It is re-evaluated for each test to ensure isolation. For the concurrent
/// test the store must also implement `Clone + 'static`.
#[macro_export]
macro_rules! document_store_tests {
    ($factory:expr) => {
        mod document_store_contract_tests {
            use super::*;
            use tent_house::core::{BillService, BookingService, ItemService};
            use tent_house::entities::BillStatus;
            use uuid::Uuid;

            // ==================================================================
            // Items
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get_item() {
                let store = $factory;
                let created = store.create_item(new_item("Chair", "15.5")).await.unwrap();
                assert_eq!(created.name, "Chair");
                assert_eq!(created.rate, dec("15.5"));

                let fetched = store.get_item(&created.id).await.unwrap().unwrap();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_get_missing_item() {
                let store = $factory;
                assert!(store.get_item(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_items_sorted_by_name() {
                let store = $factory;
                for name in ["shamiana", "Chair", "bulb", "Dari"] {
                    store.create_item(new_item(name, "10")).await.unwrap();
                }

                let names: Vec<String> = store
                    .list_items()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|item| item.name)
                    .collect();
                assert_eq!(names, vec!["bulb", "Chair", "Dari", "shamiana"]);
            }

            #[tokio::test]
            async fn test_update_item_rate() {
                let store = $factory;
                let created = store.create_item(new_item("Chair", "15")).await.unwrap();

                let updated = store
                    .update_item_rate(&created.id, dec("18"))
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(updated.rate, dec("18"));
                assert_eq!(updated.name, "Chair");

                let fetched = store.get_item(&created.id).await.unwrap().unwrap();
                assert_eq!(fetched.rate, dec("18"));
            }

            #[tokio::test]
            async fn test_update_missing_item_rate() {
                let store = $factory;
                let result = store.update_item_rate(&Uuid::new_v4(), dec("1")).await.unwrap();
                assert!(result.is_none());
            }

            // ==================================================================
            // Bills
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get_bill() {
                let store = $factory;
                let pending = store
                    .create_bill(pending_draft("Ravi", date(2025, 6, 20)))
                    .await
                    .unwrap();
                let quick = store
                    .create_bill(quick_draft("Sita", date(2025, 6, 21), "12000"))
                    .await
                    .unwrap();

                let fetched = store.get_bill(&pending.id).await.unwrap().unwrap();
                assert_eq!(fetched, pending);
                assert_eq!(fetched.items.len(), 2);
                assert_eq!(fetched.total, dec("950"));
                assert_eq!(fetched.status, BillStatus::Pending);
                assert_eq!(fetched.mobile_number.as_deref(), Some("9876543210"));

                let fetched = store.get_bill(&quick.id).await.unwrap().unwrap();
                assert_eq!(fetched, quick);
                assert!(fetched.is_quick_bill);
                assert!(fetched.created_by_owner);
                assert_eq!(fetched.received_amount, Some(dec("500")));
                assert_eq!(fetched.service_types.len(), 2);
            }

            #[tokio::test]
            async fn test_list_bills_newest_first() {
                let store = $factory;
                let mut ids = Vec::new();
                for customer in ["first", "second", "third"] {
                    let bill = store
                        .create_bill(pending_draft(customer, date(2025, 6, 20)))
                        .await
                        .unwrap();
                    ids.push(bill.id);
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                }

                let listed: Vec<Uuid> = store
                    .list_bills()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|bill| bill.id)
                    .collect();
                ids.reverse();
                assert_eq!(listed, ids);
            }

            #[tokio::test]
            async fn test_update_bill_status() {
                let store = $factory;
                let bill = store
                    .create_bill(pending_draft("Ravi", date(2025, 6, 20)))
                    .await
                    .unwrap();

                let updated = store
                    .update_bill_status(&bill.id, BillStatus::Approved)
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(updated.status, BillStatus::Approved);
                assert_eq!(updated.total, bill.total);
                assert_eq!(updated.items, bill.items);
                assert_eq!(updated.created_at, bill.created_at);
            }

            #[tokio::test]
            async fn test_update_received_amount() {
                let store = $factory;
                let bill = store
                    .create_bill(quick_draft("Sita", date(2025, 6, 21), "12000"))
                    .await
                    .unwrap();

                let updated = store
                    .update_received_amount(&bill.id, dec("13000"))
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(updated.received_amount, Some(dec("13000")));
                assert_eq!(updated.status, BillStatus::Approved);
                assert_eq!(updated.balance(), dec("-1000"));
            }

            #[tokio::test]
            async fn test_update_missing_bill() {
                let store = $factory;
                let id = Uuid::new_v4();
                assert!(
                    store
                        .update_bill_status(&id, BillStatus::Rejected)
                        .await
                        .unwrap()
                        .is_none()
                );
                assert!(
                    store
                        .update_received_amount(&id, dec("10"))
                        .await
                        .unwrap()
                        .is_none()
                );
            }

            // ==================================================================
            // Bookings
            // ==================================================================

            #[tokio::test]
            async fn test_find_bookings_by_date() {
                let store = $factory;
                let booked = store
                    .create_booking(new_booking("Ravi", date(2025, 6, 20)))
                    .await
                    .unwrap();
                store
                    .create_booking(new_booking("Sita", date(2025, 6, 21)))
                    .await
                    .unwrap();

                let found = store.find_bookings_by_date(date(2025, 6, 20)).await.unwrap();
                assert_eq!(found, vec![booked]);
                assert!(
                    store
                        .find_bookings_by_date(date(2025, 6, 22))
                        .await
                        .unwrap()
                        .is_empty()
                );
            }

            #[tokio::test]
            async fn test_list_bookings_by_date() {
                let store = $factory;
                for day in [25, 3, 14] {
                    store
                        .create_booking(new_booking("x", date(2025, 6, day)))
                        .await
                        .unwrap();
                }

                let dates: Vec<_> = store
                    .list_bookings()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|booking| booking.date)
                    .collect();
                assert_eq!(dates, vec![date(2025, 6, 3), date(2025, 6, 14), date(2025, 6, 25)]);
            }

            #[tokio::test]
            async fn test_find_bookings_between_inclusive() {
                let store = $factory;
                for day in [9, 10, 15, 20, 21] {
                    store
                        .create_booking(new_booking("x", date(2025, 6, day)))
                        .await
                        .unwrap();
                }

                let dates: Vec<_> = store
                    .find_bookings_between(date(2025, 6, 10), date(2025, 6, 20))
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|booking| booking.date)
                    .collect();
                assert_eq!(dates, vec![date(2025, 6, 10), date(2025, 6, 15), date(2025, 6, 20)]);
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_bill_creation() {
                let store = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .create_bill(pending_draft(&format!("customer-{}", i), date(2025, 7, 1)))
                            .await
                            .unwrap()
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                assert_eq!(store.list_bills().await.unwrap().len(), 10);
            }
        }
    };
}
