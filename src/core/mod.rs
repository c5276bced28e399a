//! Core module containing fundamental traits and types

pub mod auth;
pub mod clock;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod service;
pub mod validation;

pub use auth::{AuthContext, IdentityProvider, Session, SessionSubscription, SessionUser};
pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{TentError, TentResult};
pub use extractors::{JsonBody, OwnerSession};
pub use service::{BillService, BookingService, DocumentStore, ItemService};
