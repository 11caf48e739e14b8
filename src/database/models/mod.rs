pub mod cargo_item;
pub mod user;
pub mod vessel;

pub use cargo_item::{CargoFields, CargoItem};
pub use user::User;
pub use vessel::{Vessel, VesselFields};

use serde::{de::DeserializeOwned, Serialize};

use super::store::Kind;

/// A typed document stored under one kind
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: Kind;

    fn id(&self) -> u64;
}
