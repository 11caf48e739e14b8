use serde::{Deserialize, Serialize};

use super::Entity;
use crate::database::store::Kind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoItem {
    pub id: u64,
    pub volume: f64,
    pub item: String,
    pub creation_date: String,
    /// Vessel currently carrying this item, if any
    #[serde(default)]
    pub carrier_id: Option<u64>,
}

/// Attributes a client may set on a cargo item
#[derive(Debug, Clone, PartialEq)]
pub struct CargoFields {
    pub volume: f64,
    pub item: String,
    pub creation_date: String,
}

impl CargoItem {
    /// Cargo is always created unattached
    pub fn new(id: u64, fields: CargoFields) -> Self {
        Self {
            id,
            volume: fields.volume,
            item: fields.item,
            creation_date: fields.creation_date,
            carrier_id: None,
        }
    }

    pub fn apply(&mut self, fields: CargoFields) {
        self.volume = fields.volume;
        self.item = fields.item;
        self.creation_date = fields.creation_date;
    }
}

impl Entity for CargoItem {
    const KIND: Kind = Kind::CargoItems;

    fn id(&self) -> u64 {
        self.id
    }
}
