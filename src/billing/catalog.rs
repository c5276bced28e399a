//! Item catalog maintenance

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::manager::BillingManager;
use crate::core::error::{EntityError, TentResult, ValidationError};
use crate::core::validation::{parse_amount, require_text};
use crate::entities::{Item, NewItem};

const MSG_ITEM_NAME: &str = "Please enter item name";
const MSG_RATE: &str = "Please enter a valid rate";

impl BillingManager {
    /// Add an item to the catalog; the rate must be positive
    #[tracing::instrument(skip(self, rate))]
    pub async fn create_item(&self, name: &str, rate: &Value) -> TentResult<Item> {
        let name = require_text("name", name, MSG_ITEM_NAME)?;
        let rate = parse_amount("rate", rate, MSG_RATE)?;
        if rate <= Decimal::ZERO {
            return Err(ValidationError::field("rate", MSG_RATE).into());
        }

        let item = self
            .store()
            .create_item(NewItem::new(name, rate))
            .await
            .map_err(self.storage("create item"))?;

        info!(item_id = %item.id, name = %item.name, rate = %item.rate, "item created");
        Ok(item)
    }

    /// Catalog ordered by name, case-insensitive
    pub async fn list_items(&self) -> TentResult<Vec<Item>> {
        self.store()
            .list_items()
            .await
            .map_err(self.storage("list items"))
    }

    /// Change an item's rate; existing bills keep the rate they captured
    #[tracing::instrument(skip(self, rate))]
    pub async fn update_item_rate(&self, id: Uuid, rate: &Value) -> TentResult<Item> {
        let rate = parse_amount("rate", rate, MSG_RATE)?;
        if rate < Decimal::ZERO {
            return Err(ValidationError::field("rate", MSG_RATE).into());
        }

        let item = self
            .store()
            .update_item_rate(&id, rate)
            .await
            .map_err(self.storage("update item rate"))?
            .ok_or_else(|| EntityError::not_found("item", id))?;

        info!(item_id = %id, rate = %rate, "item rate updated");
        Ok(item)
    }
}
