//! Response shapes for vessels, cargo and users.
//!
//! Stored documents hold bare ids; responses replace them with summaries of
//! the referenced entity and add `self` links.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;

use super::links::Links;
use crate::database::models::{CargoItem, User, Vessel};
use crate::database::repository::Repository;
use crate::database::store::{DocumentStore, StoreResult};

/// `{id, item, self}` entry in a vessel's cargo list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CargoSummary {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// `{id, name, self}` reference to a vessel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselSummary {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VesselView {
    pub id: u64,
    pub name: String,
    pub length: f64,
    pub date_built: String,
    pub owner: String,
    pub cargo: Vec<CargoSummary>,
    #[serde(rename = "self")]
    pub self_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CargoView {
    pub id: u64,
    pub volume: f64,
    pub item: String,
    pub creation_date: String,
    pub carrier: Option<VesselSummary>,
    #[serde(rename = "self")]
    pub self_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: u64,
    pub subject: String,
    pub name: String,
    pub vessels: Vec<VesselSummary>,
}

/// Builds client representations, resolving references through the store.
///
/// A reference to a missing entity renders as its id alone.
pub struct Representer<'a> {
    vessels: Repository<Vessel>,
    cargo: Repository<CargoItem>,
    links: &'a Links,
}

impl<'a> Representer<'a> {
    pub fn new(store: Arc<dyn DocumentStore>, links: &'a Links) -> Self {
        Self {
            vessels: Repository::new(store.clone()),
            cargo: Repository::new(store),
            links,
        }
    }

    async fn cargo_summary(&self, cargo_id: u64) -> StoreResult<CargoSummary> {
        match self.cargo.select_one(cargo_id).await? {
            Some(cargo) => Ok(CargoSummary {
                id: cargo.id,
                item: Some(cargo.item),
                self_link: Some(self.links.cargo_item(cargo.id)),
            }),
            None => {
                tracing::warn!("Dangling reference to cargo item {}", cargo_id);
                Ok(CargoSummary {
                    id: cargo_id,
                    item: None,
                    self_link: None,
                })
            }
        }
    }

    async fn vessel_summary(&self, vessel_id: u64) -> StoreResult<VesselSummary> {
        match self.vessels.select_one(vessel_id).await? {
            Some(vessel) => Ok(VesselSummary {
                id: vessel.id,
                name: Some(vessel.name),
                self_link: Some(self.links.vessel(vessel.id)),
            }),
            None => {
                tracing::warn!("Dangling reference to vessel {}", vessel_id);
                Ok(VesselSummary {
                    id: vessel_id,
                    name: None,
                    self_link: None,
                })
            }
        }
    }

    pub async fn vessel(&self, vessel: Vessel) -> StoreResult<VesselView> {
        let cargo = try_join_all(vessel.cargo_ids.iter().map(|id| self.cargo_summary(*id))).await?;
        Ok(VesselView {
            self_link: self.links.vessel(vessel.id),
            id: vessel.id,
            name: vessel.name,
            length: vessel.length,
            date_built: vessel.date_built,
            owner: vessel.owner_subject,
            cargo,
        })
    }

    pub async fn vessels(&self, vessels: Vec<Vessel>) -> StoreResult<Vec<VesselView>> {
        try_join_all(vessels.into_iter().map(|v| self.vessel(v))).await
    }

    pub async fn cargo_item(&self, cargo: CargoItem) -> StoreResult<CargoView> {
        let carrier = match cargo.carrier_id {
            Some(vessel_id) => Some(self.vessel_summary(vessel_id).await?),
            None => None,
        };
        Ok(CargoView {
            self_link: self.links.cargo_item(cargo.id),
            id: cargo.id,
            volume: cargo.volume,
            item: cargo.item,
            creation_date: cargo.creation_date,
            carrier,
        })
    }

    pub async fn cargo_items(&self, items: Vec<CargoItem>) -> StoreResult<Vec<CargoView>> {
        try_join_all(items.into_iter().map(|c| self.cargo_item(c))).await
    }

    pub async fn user(&self, user: User) -> StoreResult<UserView> {
        let vessels = try_join_all(user.vessel_ids.iter().map(|id| self.vessel_summary(*id))).await?;
        Ok(UserView {
            id: user.id,
            subject: user.subject,
            name: user.name,
            vessels,
        })
    }

    pub async fn users(&self, users: Vec<User>) -> StoreResult<Vec<UserView>> {
        try_join_all(users.into_iter().map(|u| self.user(u))).await
    }
}
