use std::sync::Arc;

use url::Url;

use crate::auth::Authenticator;
use crate::config::AppConfig;
use crate::database::models::{CargoItem, Vessel};
use crate::database::repository::Repository;
use crate::database::store::DocumentStore;
use crate::services::{RelationshipEngine, UserDirectory};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub config: Arc<AppConfig>,
    /// Parsed `public_base_url`, used for links when Host is unusable
    pub base_url: Url,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        authenticator: Arc<dyn Authenticator>,
        config: AppConfig,
    ) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(&config.server.public_base_url)?;
        Ok(Self {
            store,
            authenticator,
            config: Arc::new(config),
            base_url,
        })
    }

    pub fn engine(&self) -> RelationshipEngine {
        RelationshipEngine::new(self.store.clone())
    }

    pub fn users(&self) -> UserDirectory {
        UserDirectory::new(self.store.clone())
    }

    pub fn vessels(&self) -> Repository<Vessel> {
        Repository::new(self.store.clone())
    }

    pub fn cargo_items(&self) -> Repository<CargoItem> {
        Repository::new(self.store.clone())
    }
}
