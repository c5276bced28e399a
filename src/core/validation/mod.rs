//! Form validation shared by every write path
//!
//! Filters normalize raw input (trimming, empty-to-absent); validators turn
//! it into typed values or a [`ValidationError`](crate::core::error::ValidationError)
//! carrying the user-facing message.

pub mod filters;
pub mod validators;

pub use filters::{non_empty, trimmed};
pub use validators::{parse_amount, parse_date, require_date, require_text, validate_mobile};
