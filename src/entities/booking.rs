//! Date reservations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Entity;
use crate::entities::Bill;

/// One reserved event date, tied to the bill that reserved it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub date: NaiveDate,
    pub bill_id: Uuid,
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub date: NaiveDate,
    pub bill_id: Uuid,
    pub customer_name: String,
}

impl NewBooking {
    /// Reservation for the bill's event date under the bill's customer name
    pub fn for_bill(bill: &Bill) -> Self {
        Self {
            date: bill.date,
            bill_id: bill.id,
            customer_name: bill.customer_name.clone(),
        }
    }

    pub fn into_booking(self, id: Uuid) -> Booking {
        Booking {
            id,
            date: self.date,
            bill_id: self.bill_id,
            customer_name: self.customer_name,
        }
    }
}

impl Entity for Booking {
    fn resource_name() -> &'static str {
        "bookings"
    }

    fn resource_name_singular() -> &'static str {
        "booking"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
