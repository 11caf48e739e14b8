//! Request bodies accepted by the vessel and cargo endpoints.
//!
//! Bodies deserialize loosely (missing or mistyped attributes are reported
//! by the JSON extractor) and are then validated into model field sets.

use serde::Deserialize;

use crate::database::models::{CargoFields, VesselFields};
use crate::services::{DomainError, DomainResult};

const MISSING_ATTRIBUTES: &str =
    "The request object is missing at least one of the required attributes";

fn text(field: &str, value: String) -> DomainResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(DomainError::invalid_attribute(format!("{} must not be empty", field)));
    }
    Ok(value)
}

fn measure(field: &str, value: f64) -> DomainResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::invalid_attribute(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(value)
}

/// Body of `POST /vessels`; also the attribute part of `PUT /vessels/:id`
#[derive(Debug, Deserialize)]
pub struct VesselInput {
    pub name: Option<String>,
    pub length: Option<f64>,
    pub date_built: Option<String>,
    /// Only honoured on full replace
    #[serde(default)]
    pub owner: Option<String>,
}

impl VesselInput {
    pub fn into_fields(self) -> DomainResult<(VesselFields, Option<String>)> {
        let (Some(name), Some(length), Some(date_built)) = (self.name, self.length, self.date_built) else {
            return Err(DomainError::invalid_attribute(MISSING_ATTRIBUTES));
        };
        let fields = VesselFields {
            name: text("name", name)?,
            length: measure("length", length)?,
            date_built: text("date_built", date_built)?,
        };
        let owner = self.owner.map(|o| text("owner", o)).transpose()?;
        Ok((fields, owner))
    }
}

/// A cargo reference in a PATCH body: either a bare id or `{"id": n}`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum CargoRef {
    Id(u64),
    Object { id: u64 },
}

impl CargoRef {
    pub fn id(self) -> u64 {
        match self {
            CargoRef::Id(id) | CargoRef::Object { id } => id,
        }
    }
}

/// Body of `PATCH /vessels/:id`
#[derive(Debug, Default, Deserialize)]
pub struct VesselPatch {
    pub name: Option<String>,
    pub length: Option<f64>,
    pub date_built: Option<String>,
    pub owner: Option<String>,
    #[serde(alias = "loads", alias = "cargo_ids")]
    pub cargo: Option<Vec<CargoRef>>,
}

impl VesselPatch {
    /// Merge present attributes over `current`
    pub fn merge(&self, current: &VesselFields) -> DomainResult<VesselFields> {
        Ok(VesselFields {
            name: match &self.name {
                Some(name) => text("name", name.clone())?,
                None => current.name.clone(),
            },
            length: match self.length {
                Some(length) => measure("length", length)?,
                None => current.length,
            },
            date_built: match &self.date_built {
                Some(date) => text("date_built", date.clone())?,
                None => current.date_built.clone(),
            },
        })
    }

    pub fn owner(&self) -> DomainResult<Option<String>> {
        self.owner.clone().map(|o| text("owner", o)).transpose()
    }

    pub fn cargo_ids(&self) -> Option<Vec<u64>> {
        self.cargo.as_ref().map(|refs| refs.iter().map(|r| r.id()).collect())
    }
}

/// Body of `POST /cargo_items` and `PUT /cargo_items/:id`
#[derive(Debug, Deserialize)]
pub struct CargoInput {
    pub volume: Option<f64>,
    pub item: Option<String>,
    pub creation_date: Option<String>,
}

impl CargoInput {
    pub fn into_fields(self) -> DomainResult<CargoFields> {
        let (Some(volume), Some(item), Some(creation_date)) = (self.volume, self.item, self.creation_date) else {
            return Err(DomainError::invalid_attribute(MISSING_ATTRIBUTES));
        };
        Ok(CargoFields {
            volume: measure("volume", volume)?,
            item: text("item", item)?,
            creation_date: text("creation_date", creation_date)?,
        })
    }
}

/// Body of `PATCH /cargo_items/:id`.
///
/// The carrier is only changed through the vessel cargo endpoints, so it is
/// rejected here along with any other unknown attribute.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CargoPatch {
    pub volume: Option<f64>,
    pub item: Option<String>,
    pub creation_date: Option<String>,
}

impl CargoPatch {
    pub fn merge(&self, current: &CargoFields) -> DomainResult<CargoFields> {
        Ok(CargoFields {
            volume: match self.volume {
                Some(volume) => measure("volume", volume)?,
                None => current.volume,
            },
            item: match &self.item {
                Some(item) => text("item", item.clone())?,
                None => current.item.clone(),
            },
            creation_date: match &self.creation_date {
                Some(date) => text("creation_date", date.clone())?,
                None => current.creation_date.clone(),
            },
        })
    }
}
