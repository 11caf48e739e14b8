use std::sync::Arc;

use crate::database::models::User;
use crate::database::repository::Repository;
use crate::database::store::{DocumentStore, Filter, Page};

use super::error::DomainResult;

/// Lookup and lazy creation of local user records keyed by subject
#[derive(Clone)]
pub struct UserDirectory {
    users: Repository<User>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: Repository::new(store),
        }
    }

    pub async fn find_by_subject(&self, subject: &str) -> DomainResult<Option<User>> {
        Ok(self.users.select_first(Filter::eq("subject", subject)).await?)
    }

    /// Return the user for `subject`, creating it on first sight.
    ///
    /// Two first requests racing for the same subject can both create a
    /// record; the store has no uniqueness constraint to stop it.
    pub async fn ensure(&self, subject: &str, name: Option<&str>) -> DomainResult<User> {
        if let Some(user) = self.find_by_subject(subject).await? {
            return Ok(user);
        }

        let user = User {
            id: self.users.next_id().await?,
            subject: subject.to_string(),
            name: name.unwrap_or(subject).to_string(),
            vessel_ids: Vec::new(),
        };
        self.users.save(&user).await?;
        tracing::info!("Created user {} for subject '{}'", user.id, subject);
        Ok(user)
    }

    pub async fn list(&self, limit: u64, offset: u64) -> DomainResult<Page<User>> {
        Ok(self.users.select_page(None, limit, offset).await?)
    }
}
