pub mod error;
pub mod ownership;
pub mod relationships;
pub mod users;

pub use error::{DomainError, DomainResult};
pub use ownership::authorize;
pub use relationships::{ReconcileReport, RelationshipEngine};
pub use users::UserDirectory;
