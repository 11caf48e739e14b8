pub mod auth;
pub mod negotiate;

pub use auth::require_subject;
pub use negotiate::require_json_accept;
