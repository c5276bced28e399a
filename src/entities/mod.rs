//! Records kept in the document store
//!
//! Three collections back the business: the rentable item catalog, the bills
//! (both customer submissions and owner-created ones) and the bookings that
//! reserve an event date once a bill is accepted.

pub mod bill;
pub mod booking;
pub mod item;

pub use bill::{Bill, BillDraft, BillStatus, LineItem, ServiceType};
pub use booking::{Booking, NewBooking};
pub use item::{Item, NewItem};
