//! In-progress line selection
//!
//! Lines keep insertion order and the rate captured when the item was first
//! selected, so catalog edits made while a form is open never change it.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::ValidationError;
use crate::entities::{Item, LineItem};

const MSG_TOTAL_TOO_LARGE: &str = "Bill total is too large";

#[derive(Debug, Clone, Default)]
pub struct LineSelection {
    lines: IndexMap<Uuid, LineItem>,
}

impl LineSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity for `item`; zero or less removes the line.
    /// Existing lines keep the rate captured on first selection.
    pub fn set_quantity(&mut self, item: &Item, quantity: i64) -> Result<(), ValidationError> {
        if quantity <= 0 {
            self.lines.shift_remove(&item.id);
            return Ok(());
        }

        let quantity = u32::try_from(quantity).map_err(|_| {
            ValidationError::field("items", format!("Quantity for '{}' is too large", item.name))
        })?;
        self.lines
            .entry(item.id)
            .and_modify(|line| line.quantity = quantity)
            .or_insert_with(|| snapshot(item, quantity));
        Ok(())
    }

    /// Σ rate × quantity using the snapshotted rates
    pub fn total(&self) -> Result<Decimal, ValidationError> {
        self.lines
            .values()
            .try_fold(Decimal::ZERO, |total, line| {
                line.amount().and_then(|amount| total.checked_add(amount))
            })
            .ok_or_else(|| ValidationError::field("items", MSG_TOTAL_TOO_LARGE))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<LineItem> {
        self.lines.into_values().collect()
    }
}

fn snapshot(item: &Item, quantity: u32) -> LineItem {
    LineItem {
        item_id: item.id,
        name: item.name.clone(),
        quantity,
        rate: item.rate,
    }
}
