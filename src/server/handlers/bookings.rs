//! `/bookings`

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::manager::MSG_DATE;
use crate::core::OwnerSession;
use crate::core::error::{TentError, ValidationError};
use crate::core::validation::{non_empty, parse_date, require_date};
use crate::entities::Booking;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Availability {
    pub date: NaiveDate,
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Public: can this date still be requested?
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Availability>, TentError> {
    let date = require_date("date", query.date.as_deref(), MSG_DATE)?;
    let booked = state.billing.is_date_booked(date).await?;
    Ok(Json(Availability {
        date,
        available: !booked,
    }))
}

/// All bookings, or those within `from..=to` when both bounds are given
pub async fn list_bookings(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<Booking>>, TentError> {
    let from = non_empty(query.from.as_deref());
    let to = non_empty(query.to.as_deref());

    let bookings = match (from, to) {
        (None, None) => state.billing.list_bookings().await?,
        (Some(from), Some(to)) => {
            let start = parse_date("from", &from)?;
            let end = parse_date("to", &to)?;
            state.billing.bookings_between(start, end).await?
        }
        (Some(_), None) => {
            return Err(ValidationError::field("to", "Both from and to are required").into());
        }
        (None, Some(_)) => {
            return Err(ValidationError::field("from", "Both from and to are required").into());
        }
    };

    Ok(Json(bookings))
}
