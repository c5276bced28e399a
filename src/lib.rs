//! # Tent House
//!
//! Bill, booking and catalog service for a tent and event rental business.
//!
//! Customers pick items from the catalog and submit a bill for an event
//! date. The owner approves or rejects it; approval books the date. The
//! owner can also create bills directly, either itemized or as a lump sum,
//! and record what the customer has paid so far.
//!
//! ## Layout
//!
//! - [`entities`]: items, bills and bookings as stored
//! - [`core`]: store traits, errors, auth and validation
//! - [`billing`]: every business operation, via [`billing::BillingManager`]
//! - [`storage`]: in-memory and MongoDB backends
//! - [`export`]: printable bill document and share message
//! - [`identity`]: owner sign-in
//! - [`server`]: axum routes and the `ServerBuilder`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tent_house::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(AppConfig::load()?)
//!     .with_store(InMemoryStore::new())
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod billing;
pub mod config;
pub mod core;
pub mod entities;
pub mod export;
pub mod identity;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        AuthContext, BillService, BookingService, Clock, DocumentStore, Entity,
        FixedClock, IdentityProvider, ItemService, Session, SessionSubscription, SessionUser,
        SystemClock,
    };

    // === Errors ===
    pub use crate::core::error::{
        AuthError, ConfigError, EntityError, LifecycleError, StorageError, TentError, TentResult,
        ValidationError,
    };

    // === Entities ===
    pub use crate::entities::{
        Bill, BillDraft, BillStatus, Booking, Item, LineItem, NewBooking, NewItem, ServiceType,
    };

    // === Billing ===
    pub use crate::billing::{
        BillFilter, BillListing, BillSubmission, BillingManager, BookedBill, Bucket,
        DashboardSnapshot, DetailedBillRequest, LineRequest, LineSelection, QuickBillRequest,
        ReconciliationReport, ScheduledBill, StatusCounts, arrange_bills,
    };

    // === Config, export, identity ===
    pub use crate::config::{AppConfig, CatalogConfig, OwnerConfig, StorageBackend};
    pub use crate::export::{BillExporter, bill_file_name};
    pub use crate::identity::OwnerIdentityProvider;

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoStore;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External re-exports ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use rust_decimal::Decimal;
    pub use uuid::Uuid;
}
