//! Keeps the vessel↔cargo and user↔vessel links consistent.
//!
//! The store offers no multi-document transactions, so every operation here
//! is a sequence of independent writes. Each sequence lives in exactly one
//! function, and the order is chosen so that an interrupted sequence always
//! leaves the vessel's `cargo_ids` as the side to trust. [`RelationshipEngine::reconcile`]
//! repairs whatever an interrupted sequence left behind.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::database::models::{CargoItem, User, Vessel, VesselFields};
use crate::database::repository::Repository;
use crate::database::store::{DocumentStore, Filter, Kind};

use super::error::{DomainError, DomainResult};

/// Repairs applied by one reconciliation sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub vessels_repaired: usize,
    pub cargo_repaired: usize,
    pub users_repaired: usize,
    /// Vessels whose owner subject has no user record; reported, not fixed
    pub orphaned_vessels: Vec<u64>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.vessels_repaired == 0
            && self.cargo_repaired == 0
            && self.users_repaired == 0
            && self.orphaned_vessels.is_empty()
    }
}

#[derive(Clone)]
pub struct RelationshipEngine {
    vessels: Repository<Vessel>,
    cargo: Repository<CargoItem>,
    users: Repository<User>,
}

impl RelationshipEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            vessels: Repository::new(store.clone()),
            cargo: Repository::new(store.clone()),
            users: Repository::new(store),
        }
    }

    /// Create a vessel and record it in its owner's `vessel_ids`.
    ///
    /// Writes: vessel, then owner.
    pub async fn create_vessel(&self, owner_subject: &str, fields: VesselFields) -> DomainResult<Vessel> {
        let mut owner = self.owner(owner_subject).await?.ok_or_else(|| {
            DomainError::not_found(format!("No user with subject '{}' exists", owner_subject))
        })?;

        let vessel = Vessel::new(self.vessels.next_id().await?, owner_subject, fields);
        self.vessels.save(&vessel).await?;

        owner.vessel_ids.push(vessel.id);
        self.users.save(&owner).await?;

        tracing::info!("Created vessel {} for '{}'", vessel.id, owner_subject);
        Ok(vessel)
    }

    /// Attach cargo to a vessel.
    ///
    /// Writes: cargo, then vessel.
    pub async fn load(&self, vessel_id: u64, cargo_id: u64) -> DomainResult<(Vessel, CargoItem)> {
        let mut vessel = self.vessels.select_404(vessel_id).await?;
        let mut cargo = self.cargo.select_404(cargo_id).await?;

        if let Some(carrier_id) = cargo.carrier_id {
            return Err(DomainError::AlreadyCarried { cargo_id, carrier_id });
        }

        cargo.carrier_id = Some(vessel_id);
        vessel.cargo_ids.push(cargo_id);

        self.cargo.save(&cargo).await?;
        self.vessels.save(&vessel).await?;

        tracing::debug!("Loaded cargo {} onto vessel {}", cargo_id, vessel_id);
        Ok((vessel, cargo))
    }

    /// Attach each cargo id in turn, skipping items that are already carried
    /// or do not exist. Returns the ids that were attached.
    pub async fn load_each(&self, vessel_id: u64, cargo_ids: &[u64]) -> DomainResult<Vec<u64>> {
        let mut attached = Vec::with_capacity(cargo_ids.len());
        for &cargo_id in cargo_ids {
            if self.cargo.select_one(cargo_id).await?.is_none() {
                tracing::warn!("Skipping cargo {} for vessel {}: no such cargo item", cargo_id, vessel_id);
                continue;
            }
            match self.load(vessel_id, cargo_id).await {
                Ok(_) => attached.push(cargo_id),
                Err(DomainError::AlreadyCarried { carrier_id, .. }) => {
                    tracing::warn!(
                        "Skipping cargo {} for vessel {}: already loaded on vessel {}",
                        cargo_id,
                        vessel_id,
                        carrier_id
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(attached)
    }

    /// Detach cargo from a vessel.
    ///
    /// Writes: vessel, then cargo.
    pub async fn unload(&self, vessel_id: u64, cargo_id: u64) -> DomainResult<(Vessel, CargoItem)> {
        let mut vessel = self.vessels.select_404(vessel_id).await?;
        let mut cargo = self.cargo.select_404(cargo_id).await?;

        if !vessel.remove_cargo(cargo_id) {
            return Err(DomainError::not_found(format!(
                "Cargo item {} is not loaded on vessel {}",
                cargo_id, vessel_id
            )));
        }
        cargo.carrier_id = None;

        self.vessels.save(&vessel).await?;
        self.cargo.save(&cargo).await?;

        tracing::debug!("Unloaded cargo {} from vessel {}", cargo_id, vessel_id);
        Ok((vessel, cargo))
    }

    /// Detach every cargo item from `vessel`.
    ///
    /// Writes: vessel with an empty list, then each cargo item.
    pub async fn clear_cargo(&self, vessel: &mut Vessel) -> DomainResult<()> {
        let cargo_ids = std::mem::take(&mut vessel.cargo_ids);
        self.vessels.save(vessel).await?;

        for cargo_id in cargo_ids {
            self.release_cargo(cargo_id, vessel.id).await?;
        }
        Ok(())
    }

    /// Delete a vessel, unlinking its cargo and its owner.
    ///
    /// Writes: each cargo item, then owner, then the vessel delete.
    pub async fn delete_vessel(&self, vessel: Vessel) -> DomainResult<()> {
        for &cargo_id in &vessel.cargo_ids {
            self.release_cargo(cargo_id, vessel.id).await?;
        }

        match self.owner(&vessel.owner_subject).await? {
            Some(mut owner) => {
                if owner.remove_vessel(vessel.id) {
                    self.users.save(&owner).await?;
                }
            }
            None => tracing::warn!(
                "Owner '{}' of vessel {} has no user record",
                vessel.owner_subject,
                vessel.id
            ),
        }

        self.vessels.delete(vessel.id).await?;
        tracing::info!("Deleted vessel {}", vessel.id);
        Ok(())
    }

    /// Delete a cargo item, removing it from its carrier's list first.
    /// A carrier that has vanished is logged and skipped.
    pub async fn delete_cargo(&self, cargo: CargoItem) -> DomainResult<()> {
        if let Some(carrier_id) = cargo.carrier_id {
            match self.vessels.select_one(carrier_id).await? {
                Some(mut vessel) => {
                    if vessel.remove_cargo(cargo.id) {
                        self.vessels.save(&vessel).await?;
                    }
                }
                None => tracing::warn!(
                    "Carrier {} of cargo {} no longer exists",
                    carrier_id,
                    cargo.id
                ),
            }
        }

        self.cargo.delete(cargo.id).await?;
        tracing::info!("Deleted cargo item {}", cargo.id);
        Ok(())
    }

    /// Move `vessel` to the user identified by `new_subject`.
    ///
    /// Writes: new owner, old owner, then vessel.
    pub async fn replace_owner(&self, vessel: &mut Vessel, new_subject: &str) -> DomainResult<()> {
        if vessel.owner_subject == new_subject {
            return Err(DomainError::Conflict(format!(
                "Vessel {} is already owned by '{}'",
                vessel.id, new_subject
            )));
        }

        let mut new_owner = self.owner(new_subject).await?.ok_or_else(|| {
            DomainError::not_found(format!("No user with subject '{}' exists", new_subject))
        })?;

        if !new_owner.owns(vessel.id) {
            new_owner.vessel_ids.push(vessel.id);
        }
        self.users.save(&new_owner).await?;

        match self.owner(&vessel.owner_subject).await? {
            Some(mut old_owner) => {
                if old_owner.remove_vessel(vessel.id) {
                    self.users.save(&old_owner).await?;
                }
            }
            None => tracing::warn!(
                "Previous owner '{}' of vessel {} has no user record",
                vessel.owner_subject,
                vessel.id
            ),
        }

        let previous = std::mem::replace(&mut vessel.owner_subject, new_subject.to_string());
        self.vessels.save(vessel).await?;

        tracing::info!("Vessel {} transferred from '{}' to '{}'", vessel.id, previous, new_subject);
        Ok(())
    }

    /// Sweep all documents and repair one-sided links.
    ///
    /// The vessel's `cargo_ids` wins over the cargo's `carrier_id`, except
    /// that a cargo listed by several vessels stays with the one it names.
    /// A vessel's `owner_subject` wins over users' `vessel_ids`.
    pub async fn reconcile(&self) -> DomainResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        let mut vessels = self.vessels.select_all().await?;
        let cargo_items = self.cargo.select_all().await?;
        let users = self.users.select_all().await?;

        let cargo_by_id: HashMap<u64, &CargoItem> = cargo_items.iter().map(|c| (c.id, c)).collect();

        // Which vessels claim each cargo item, in vessel id order
        let mut listers: HashMap<u64, Vec<u64>> = HashMap::new();
        for vessel in &vessels {
            for &cargo_id in &vessel.cargo_ids {
                let entry = listers.entry(cargo_id).or_default();
                if !entry.contains(&vessel.id) {
                    entry.push(vessel.id);
                }
            }
        }

        let carrier_of = |cargo: &CargoItem| -> Option<u64> {
            let claims = listers.get(&cargo.id)?;
            match cargo.carrier_id {
                Some(named) if claims.contains(&named) => Some(named),
                _ => claims.first().copied(),
            }
        };

        for vessel in vessels.iter_mut() {
            let vessel_id = vessel.id;
            let mut seen = HashSet::new();
            let before = vessel.cargo_ids.clone();
            vessel.cargo_ids.retain(|cargo_id| {
                seen.insert(*cargo_id)
                    && cargo_by_id
                        .get(cargo_id)
                        .is_some_and(|c| carrier_of(c) == Some(vessel_id))
            });
            if vessel.cargo_ids != before {
                tracing::warn!(
                    "Reconcile: vessel {} cargo {:?} -> {:?}",
                    vessel.id,
                    before,
                    vessel.cargo_ids
                );
                self.vessels.save(vessel).await?;
                report.vessels_repaired += 1;
            }
        }

        for cargo in &cargo_items {
            let expected = carrier_of(cargo);
            if cargo.carrier_id != expected {
                tracing::warn!(
                    "Reconcile: cargo {} carrier {:?} -> {:?}",
                    cargo.id,
                    cargo.carrier_id,
                    expected
                );
                let mut fixed = cargo.clone();
                fixed.carrier_id = expected;
                self.cargo.save(&fixed).await?;
                report.cargo_repaired += 1;
            }
        }

        let owned_by: HashMap<u64, &str> = vessels.iter().map(|v| (v.id, v.owner_subject.as_str())).collect();
        let mut known_subjects = HashSet::new();

        for user in &users {
            known_subjects.insert(user.subject.as_str());

            let mut seen = HashSet::new();
            let mut vessel_ids: Vec<u64> = user
                .vessel_ids
                .iter()
                .copied()
                .filter(|id| seen.insert(*id) && owned_by.get(id) == Some(&user.subject.as_str()))
                .collect();
            for vessel in &vessels {
                if vessel.owner_subject == user.subject && !vessel_ids.contains(&vessel.id) {
                    vessel_ids.push(vessel.id);
                }
            }

            if vessel_ids != user.vessel_ids {
                tracing::warn!(
                    "Reconcile: user {} vessels {:?} -> {:?}",
                    user.id,
                    user.vessel_ids,
                    vessel_ids
                );
                let mut fixed = user.clone();
                fixed.vessel_ids = vessel_ids;
                self.users.save(&fixed).await?;
                report.users_repaired += 1;
            }
        }

        for vessel in &vessels {
            if !known_subjects.contains(vessel.owner_subject.as_str()) {
                tracing::warn!(
                    "Reconcile: vessel {} owner '{}' has no user record",
                    vessel.id,
                    vessel.owner_subject
                );
                report.orphaned_vessels.push(vessel.id);
            }
        }

        Ok(report)
    }

    async fn owner(&self, subject: &str) -> DomainResult<Option<User>> {
        Ok(self.users.select_first(Filter::eq("subject", subject)).await?)
    }

    /// Clear `carrier_id` on a cargo item that `vessel_id` no longer lists.
    /// Missing cargo and cargo naming some other carrier are left alone.
    async fn release_cargo(&self, cargo_id: u64, vessel_id: u64) -> DomainResult<()> {
        match self.cargo.select_one(cargo_id).await? {
            Some(mut cargo) if cargo.carrier_id == Some(vessel_id) => {
                cargo.carrier_id = None;
                self.cargo.save(&cargo).await?;
            }
            Some(cargo) => tracing::warn!(
                "Cargo {} listed on vessel {} names carrier {:?}; leaving it",
                cargo_id,
                vessel_id,
                cargo.carrier_id
            ),
            None => tracing::warn!(
                "{} {} listed on vessel {} no longer exists",
                Kind::CargoItems,
                cargo_id,
                vessel_id
            ),
        }
        Ok(())
    }
}
