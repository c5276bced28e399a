//! HTTP handlers, one module per resource

pub mod bills;
pub mod bookings;
pub mod dashboard;
pub mod items;
pub mod session;
