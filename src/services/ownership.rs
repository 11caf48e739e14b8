use crate::database::models::Vessel;

use super::error::{DomainError, DomainResult};

/// Decide whether `subject` may act on `vessel`.
///
/// Only the owning subject is permitted. Cargo addressed directly (outside a
/// vessel path) is not checked here; callers reach this only through vessels.
pub fn authorize(subject: &str, vessel: &Vessel) -> DomainResult<()> {
    if subject != vessel.owner_subject {
        tracing::debug!(
            "Subject '{}' denied access to vessel {} owned by '{}'",
            subject,
            vessel.id,
            vessel.owner_subject
        );
        return Err(DomainError::Forbidden("This vessel is owned by someone else.".to_string()));
    }
    Ok(())
}
