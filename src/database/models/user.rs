use serde::{Deserialize, Serialize};

use super::Entity;
use crate::database::store::Kind;

/// Local record of an identity-provider subject and the vessels it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub subject: String,
    pub name: String,
    #[serde(default)]
    pub vessel_ids: Vec<u64>,
}

impl User {
    pub fn owns(&self, vessel_id: u64) -> bool {
        self.vessel_ids.contains(&vessel_id)
    }

    pub fn remove_vessel(&mut self, vessel_id: u64) -> bool {
        let before = self.vessel_ids.len();
        self.vessel_ids.retain(|id| *id != vessel_id);
        self.vessel_ids.len() != before
    }
}

impl Entity for User {
    const KIND: Kind = Kind::Users;

    fn id(&self) -> u64 {
        self.id
    }
}
