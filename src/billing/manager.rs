//! Bill lifecycle: submission, owner creation, approval and payment

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::cart::LineSelection;
use super::requests::{BillSubmission, DetailedBillRequest, LineRequest, QuickBillRequest};
use super::schedule::{BillFilter, ScheduledBill, StatusCounts, arrange_bills};
use crate::config::CatalogConfig;
use crate::core::error::{
    EntityError, LifecycleError, StorageError, TentError, TentResult, ValidationError,
};
use crate::core::validation::{parse_amount, require_date, require_text, validate_mobile};
use crate::core::{Clock, DocumentStore, SystemClock};
use crate::entities::{Bill, BillDraft, BillStatus, Booking, NewBooking, ServiceType};

pub(crate) const MSG_CUSTOMER_NAME: &str = "Please enter customer name";
pub(crate) const MSG_DATE: &str = "Please select a date";
pub(crate) const MSG_ITEMS: &str = "Please add at least one item";
pub(crate) const MSG_TOTAL: &str = "Please enter a valid total amount";
pub(crate) const MSG_SERVICE_TYPE: &str = "Please select at least one service type";
pub(crate) const MSG_AMOUNT: &str = "Please enter a valid amount";

/// An approved bill together with the booking that reserves its date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookedBill {
    pub bill: Bill,
    pub booking: Booking,
}

/// Bills matching a filter plus per-status counts over all bills
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillListing {
    pub bills: Vec<ScheduledBill>,
    pub counts: StatusCounts,
}

/// Entry point for every billing operation
///
/// Validation failures are returned before any store write. Store failures
/// surface as [`StorageError`] with the backend message kept.
#[derive(Clone)]
pub struct BillingManager {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    catalog: CatalogConfig,
}

impl BillingManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            catalog: CatalogConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_catalog(mut self, catalog: CatalogConfig) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Map a store failure for `operation` into a typed storage error
    pub(crate) fn storage<'a>(
        &'a self,
        operation: &'a str,
    ) -> impl Fn(anyhow::Error) -> TentError + 'a {
        move |err| StorageError::backend(self.store.backend_name(), operation, err).into()
    }

    // -----------------------------------------------------------------------
    // Bookings
    // -----------------------------------------------------------------------

    /// True when at least one booking exists on `date`
    pub async fn is_date_booked(&self, date: NaiveDate) -> TentResult<bool> {
        let bookings = self
            .store
            .find_bookings_by_date(date)
            .await
            .map_err(self.storage("find bookings by date"))?;
        Ok(!bookings.is_empty())
    }

    pub async fn list_bookings(&self) -> TentResult<Vec<Booking>> {
        self.store
            .list_bookings()
            .await
            .map_err(self.storage("list bookings"))
    }

    /// Bookings with `start <= date <= end`
    pub async fn bookings_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TentResult<Vec<Booking>> {
        if start > end {
            return Err(rejected(ValidationError::field(
                "from",
                "Start date must not be after end date",
            )));
        }
        self.store
            .find_bookings_between(start, end)
            .await
            .map_err(self.storage("find bookings between"))
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Persist a customer submission as a pending bill
    ///
    /// Checks run in a fixed order: name, date, date availability, items.
    /// No booking is created; that waits for approval.
    #[tracing::instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn submit_bill(&self, request: BillSubmission) -> TentResult<Bill> {
        let customer_name = require_text("customerName", &request.customer_name, MSG_CUSTOMER_NAME)
            .map_err(rejected)?;
        let date = require_date("date", request.date.as_deref(), MSG_DATE).map_err(rejected)?;

        if self.is_date_booked(date).await? {
            return Err(rejected(ValidationError::DateUnavailable { date }));
        }
        if request.items.is_empty() {
            return Err(rejected(ValidationError::field("items", MSG_ITEMS)));
        }
        let mobile_number =
            validate_mobile("mobileNumber", request.mobile_number.as_deref()).map_err(rejected)?;

        let selection = self.select_lines(&request.items).await?;
        if selection.is_empty() {
            return Err(rejected(ValidationError::field("items", MSG_ITEMS)));
        }
        let total = selection.total().map_err(rejected)?;

        let draft = BillDraft {
            customer_name,
            mobile_number,
            date,
            total,
            items: selection.into_lines(),
            status: BillStatus::Pending,
            received_amount: None,
            service_types: Vec::new(),
            is_quick_bill: false,
            created_by_owner: false,
        };

        let bill = self
            .store
            .create_bill(draft)
            .await
            .map_err(self.storage("create bill"))?;

        info!(bill_id = %bill.id, date = %bill.date, total = %bill.total, "bill submitted");
        Ok(bill)
    }

    /// Owner lump-sum bill: approved on creation and booked immediately
    ///
    /// The event date is not checked against existing bookings.
    #[tracing::instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn create_quick_bill(&self, request: QuickBillRequest) -> TentResult<BookedBill> {
        let customer_name = require_text("customerName", &request.customer_name, MSG_CUSTOMER_NAME)
            .map_err(rejected)?;
        let date = require_date("date", request.date.as_deref(), MSG_DATE).map_err(rejected)?;

        let total = request
            .total_amount
            .as_ref()
            .ok_or_else(|| ValidationError::field("totalAmount", MSG_TOTAL))
            .and_then(|value| parse_amount("totalAmount", value, MSG_TOTAL))
            .and_then(|total| {
                if total > Decimal::ZERO {
                    Ok(total)
                } else {
                    Err(ValidationError::field("totalAmount", MSG_TOTAL))
                }
            })
            .map_err(rejected)?;

        let service_types = self
            .resolve_service_types(&request.service_types)
            .map_err(rejected)?;
        let mobile_number =
            validate_mobile("mobileNumber", request.mobile_number.as_deref()).map_err(rejected)?;
        let received_amount =
            optional_received_amount(request.received_amount.as_ref()).map_err(rejected)?;

        let draft = BillDraft {
            customer_name,
            mobile_number,
            date,
            items: Vec::new(),
            total,
            status: BillStatus::Approved,
            received_amount,
            service_types,
            is_quick_bill: true,
            created_by_owner: true,
        };

        self.create_owner_bill(draft).await
    }

    /// Owner itemized bill tagged with the default service type: approved
    /// on creation and booked immediately
    #[tracing::instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn create_detailed_bill(&self, request: DetailedBillRequest) -> TentResult<BookedBill> {
        let customer_name = require_text("customerName", &request.customer_name, MSG_CUSTOMER_NAME)
            .map_err(rejected)?;
        let date = require_date("date", request.date.as_deref(), MSG_DATE).map_err(rejected)?;
        if request.items.is_empty() {
            return Err(rejected(ValidationError::field("items", MSG_ITEMS)));
        }
        let mobile_number =
            validate_mobile("mobileNumber", request.mobile_number.as_deref()).map_err(rejected)?;
        let received_amount =
            optional_received_amount(request.received_amount.as_ref()).map_err(rejected)?;

        let selection = self.select_lines(&request.items).await?;
        if selection.is_empty() {
            return Err(rejected(ValidationError::field("items", MSG_ITEMS)));
        }
        let total = selection.total().map_err(rejected)?;

        let draft = BillDraft {
            customer_name,
            mobile_number,
            date,
            total,
            items: selection.into_lines(),
            status: BillStatus::Approved,
            received_amount,
            service_types: vec![self.catalog.default_tag()],
            is_quick_bill: false,
            created_by_owner: true,
        };

        self.create_owner_bill(draft).await
    }

    async fn create_owner_bill(&self, draft: BillDraft) -> TentResult<BookedBill> {
        let bill = self
            .store
            .create_bill(draft)
            .await
            .map_err(self.storage("create bill"))?;
        info!(bill_id = %bill.id, date = %bill.date, quick = bill.is_quick_bill, "owner bill created");

        let booking = self.record_booking(&bill).await?;
        Ok(BookedBill { bill, booking })
    }

    /// Resolve (item, quantity) pairs against the catalog, applying each as
    /// a quantity update in request order
    async fn select_lines(&self, lines: &[LineRequest]) -> TentResult<LineSelection> {
        let mut selection = LineSelection::new();
        for line in lines {
            let item = self
                .store
                .get_item(&line.item_id)
                .await
                .map_err(self.storage("get item"))?
                .ok_or_else(|| {
                    rejected(ValidationError::field(
                        "items",
                        format!("Unknown item '{}'", line.item_id),
                    ))
                })?;
            selection
                .set_quantity(&item, line.quantity)
                .map_err(rejected)?;
        }
        Ok(selection)
    }

    fn resolve_service_types(&self, labels: &[String]) -> Result<Vec<ServiceType>, ValidationError> {
        let labels: Vec<&str> = labels
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .collect();
        if labels.is_empty() {
            return Err(ValidationError::field("serviceTypes", MSG_SERVICE_TYPE));
        }

        let mut resolved: Vec<ServiceType> = Vec::with_capacity(labels.len());
        for label in labels {
            let tag = self.catalog.resolve(label).ok_or_else(|| {
                ValidationError::field("serviceTypes", format!("Unknown service type '{}'", label))
            })?;
            if !resolved.contains(&tag) {
                resolved.push(tag);
            }
        }
        Ok(resolved)
    }

    async fn record_booking(&self, bill: &Bill) -> TentResult<Booking> {
        match self.store.create_booking(NewBooking::for_bill(bill)).await {
            Ok(booking) => {
                info!(bill_id = %bill.id, date = %booking.date, "date booked");
                Ok(booking)
            }
            Err(err) => {
                error!(bill_id = %bill.id, date = %bill.date, error = %err, "approved bill has no booking");
                Err(StorageError::BookingNotRecorded {
                    bill_id: bill.id,
                    message: err.to_string(),
                }
                .into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub async fn get_bill(&self, id: Uuid) -> TentResult<Bill> {
        self.store
            .get_bill(&id)
            .await
            .map_err(self.storage("get bill"))?
            .ok_or_else(|| EntityError::not_found("bill", id).into())
    }

    /// `pending -> approved`, then book the bill's date
    ///
    /// The status check and the write are separate store calls; two
    /// concurrent approvals of the same bill can both pass the check.
    #[tracing::instrument(skip(self))]
    pub async fn approve_bill(&self, id: Uuid) -> TentResult<BookedBill> {
        let bill = self.transition(id, BillStatus::Approved).await?;
        let booking = self.record_booking(&bill).await?;
        Ok(BookedBill { bill, booking })
    }

    /// `pending -> rejected`; no booking is touched
    #[tracing::instrument(skip(self))]
    pub async fn reject_bill(&self, id: Uuid) -> TentResult<Bill> {
        self.transition(id, BillStatus::Rejected).await
    }

    async fn transition(&self, id: Uuid, next: BillStatus) -> TentResult<Bill> {
        let current = self.get_bill(id).await?;
        if !current.status.can_transition_to(next) {
            debug!(bill_id = %id, from = %current.status, to = %next, "transition refused");
            return Err(LifecycleError::InvalidTransition {
                bill_id: id,
                from: current.status,
                to: next,
            }
            .into());
        }

        let updated = self
            .store
            .update_bill_status(&id, next)
            .await
            .map_err(self.storage("update bill status"))?
            .ok_or_else(|| EntityError::not_found("bill", id))?;

        info!(bill_id = %id, from = %current.status, to = %next, "bill status changed");
        Ok(updated)
    }

    /// Overwrite the received amount of an approved bill
    ///
    /// Accepts a JSON number or numeric string, `>= 0`. Amounts above the
    /// total are accepted and show up as a negative balance.
    #[tracing::instrument(skip(self, amount))]
    pub async fn record_received_amount(&self, id: Uuid, amount: &Value) -> TentResult<Bill> {
        let amount = parse_amount("receivedAmount", amount, MSG_AMOUNT)
            .and_then(non_negative)
            .map_err(rejected)?;

        let bill = self.get_bill(id).await?;
        if !bill.is_approved() {
            return Err(LifecycleError::NotApproved {
                bill_id: id,
                status: bill.status,
            }
            .into());
        }

        let updated = self
            .store
            .update_received_amount(&id, amount)
            .await
            .map_err(self.storage("update received amount"))?
            .ok_or_else(|| EntityError::not_found("bill", id))?;

        info!(bill_id = %id, received = %amount, balance = %updated.balance(), "received amount recorded");
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// Bills matching `filter`, arranged around today
    pub async fn list_bills(&self, filter: BillFilter) -> TentResult<BillListing> {
        let all = self
            .store
            .list_bills()
            .await
            .map_err(self.storage("list bills"))?;

        let counts = StatusCounts::tally(&all);
        let selected: Vec<Bill> = all.into_iter().filter(|bill| filter.matches(bill)).collect();

        Ok(BillListing {
            bills: arrange_bills(selected, self.today()),
            counts,
        })
    }
}

/// Log a validation failure and lift it into the crate error
fn rejected(err: ValidationError) -> TentError {
    debug!(error = %err, "request rejected");
    err.into()
}

fn non_negative(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::field("receivedAmount", MSG_AMOUNT));
    }
    Ok(amount)
}

/// Absent, null and blank-string amounts all mean "not given"
fn optional_received_amount(value: Option<&Value>) -> Result<Option<Decimal>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => parse_amount("receivedAmount", value, MSG_AMOUNT)
            .and_then(non_negative)
            .map(Some),
    }
}
