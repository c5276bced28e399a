//! Billing workflows
//!
//! [`BillingManager`] owns every operation on items, bills and bookings.
//! The submodules hold the pieces it is built from: the line selection
//! cart, the date-relative arrangement of bills, the dashboard snapshot and
//! the bill/booking reconciliation report.

pub mod cart;
pub mod catalog;
pub mod dashboard;
pub mod manager;
pub mod reconcile;
pub mod requests;
pub mod schedule;

pub use cart::LineSelection;
pub use dashboard::DashboardSnapshot;
pub use manager::{BillListing, BillingManager, BookedBill};
pub use reconcile::{DateConflict, ReconciliationReport, reconcile};
pub use requests::{BillSubmission, DetailedBillRequest, LineRequest, QuickBillRequest};
pub use schedule::{BillFilter, Bucket, ScheduledBill, StatusCounts, arrange_bills};
