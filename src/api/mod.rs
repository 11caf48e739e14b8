pub mod format;
pub mod input;
pub mod json;
pub mod links;
pub mod pagination;

pub use format::Representer;
pub use json::JsonBody;
pub use links::Links;
pub use pagination::{Listing, PageParams, PageWindow};
