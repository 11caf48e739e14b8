use serde::{Deserialize, Serialize};

use super::Entity;
use crate::database::store::Kind;

/// A vessel owned by one user (by subject) and carrying zero or more cargo items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: u64,
    pub name: String,
    pub length: f64,
    pub date_built: String,
    pub owner_subject: String,
    /// Carried cargo in insertion order
    #[serde(default)]
    pub cargo_ids: Vec<u64>,
}

/// Attributes a client may set on a vessel
#[derive(Debug, Clone, PartialEq)]
pub struct VesselFields {
    pub name: String,
    pub length: f64,
    pub date_built: String,
}

impl Vessel {
    /// A new vessel starts with no cargo
    pub fn new(id: u64, owner_subject: impl Into<String>, fields: VesselFields) -> Self {
        Self {
            id,
            name: fields.name,
            length: fields.length,
            date_built: fields.date_built,
            owner_subject: owner_subject.into(),
            cargo_ids: Vec::new(),
        }
    }

    pub fn apply(&mut self, fields: VesselFields) {
        self.name = fields.name;
        self.length = fields.length;
        self.date_built = fields.date_built;
    }

    /// Remove every occurrence of `cargo_id`; returns whether any was present
    pub fn remove_cargo(&mut self, cargo_id: u64) -> bool {
        let before = self.cargo_ids.len();
        self.cargo_ids.retain(|id| *id != cargo_id);
        self.cargo_ids.len() != before
    }
}

impl Entity for Vessel {
    const KIND: Kind = Kind::Vessels;

    fn id(&self) -> u64 {
        self.id
    }
}
