// handlers/cargo_items/mod.rs - /cargo_items routes (no authentication)

pub mod collection;
pub mod record;
