//! `/bills`

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::billing::{
    BillFilter, BillListing, BillSubmission, BookedBill, DetailedBillRequest, QuickBillRequest,
};
use crate::core::error::{TentError, ValidationError};
use crate::core::{JsonBody, OwnerSession};
use crate::entities::Bill;
use crate::export::bill_file_name;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedAmountRequest {
    #[serde(default)]
    pub received_amount: Value,
}

/// A bill with its derived figures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDetail {
    #[serde(flatten)]
    pub bill: Bill,
    pub balance: Decimal,
    pub items_count: u64,
}

impl From<Bill> for BillDetail {
    fn from(bill: Bill) -> Self {
        Self {
            balance: bill.balance(),
            items_count: bill.items_count(),
            bill,
        }
    }
}

/// Public: a customer submits a bill for approval
pub async fn submit_bill(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BillSubmission>,
) -> Result<(StatusCode, Json<Value>), TentError> {
    let bill = state.billing.submit_bill(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": bill.id }))))
}

pub async fn create_quick_bill(
    _owner: OwnerSession,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<QuickBillRequest>,
) -> Result<(StatusCode, Json<BookedBill>), TentError> {
    let booked = state.billing.create_quick_bill(request).await?;
    Ok((StatusCode::CREATED, Json(booked)))
}

pub async fn create_detailed_bill(
    _owner: OwnerSession,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DetailedBillRequest>,
) -> Result<(StatusCode, Json<BookedBill>), TentError> {
    let booked = state.billing.create_detailed_bill(request).await?;
    Ok((StatusCode::CREATED, Json(booked)))
}

/// `?status=all|pending|approved|rejected`, approved when omitted
pub async fn list_bills(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<BillListing>, TentError> {
    let filter = match query.status.as_deref() {
        None => BillFilter::default(),
        Some(status) => status
            .parse::<BillFilter>()
            .map_err(|message: String| ValidationError::field("status", message))?,
    };
    Ok(Json(state.billing.list_bills(filter).await?))
}

pub async fn get_bill(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BillDetail>, TentError> {
    Ok(Json(state.billing.get_bill(id).await?.into()))
}

pub async fn approve_bill(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookedBill>, TentError> {
    Ok(Json(state.billing.approve_bill(id).await?))
}

pub async fn reject_bill(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BillDetail>, TentError> {
    Ok(Json(state.billing.reject_bill(id).await?.into()))
}

pub async fn update_received_amount(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<ReceivedAmountRequest>,
) -> Result<Json<BillDetail>, TentError> {
    let bill = state
        .billing
        .record_received_amount(id, &request.received_amount)
        .await?;
    Ok(Json(bill.into()))
}

/// Download the bill as a standalone HTML document
pub async fn export_bill(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, TentError> {
    let bill = state.billing.get_bill(id).await?;
    let html = state.exporter.render_bill_document(&bill, Utc::now())?;
    let disposition = format!("attachment; filename=\"{}\"", bill_file_name(&bill));

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    ))
}

pub async fn share_bill(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, TentError> {
    let bill = state.billing.get_bill(id).await?;
    let message = state.exporter.share_message(&bill)?;
    Ok(Json(json!({
        "message": message,
        "fileName": bill_file_name(&bill),
    })))
}
