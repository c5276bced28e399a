//! Catalog items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Entity;

/// A rentable item with its current per-unit rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub rate: Decimal,
}

/// Item fields supplied by the caller; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub rate: Decimal,
}

impl NewItem {
    pub fn new(name: impl Into<String>, rate: Decimal) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }

    pub fn into_item(self, id: Uuid) -> Item {
        Item {
            id,
            name: self.name,
            rate: self.rate,
        }
    }
}

impl Entity for Item {
    fn resource_name() -> &'static str {
        "items"
    }

    fn resource_name_singular() -> &'static str {
        "item"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
