//! Shared input types consumed by factories and the admin controller.

mod mapping;
mod select;

pub use mapping::Mapping;
pub use select::{Direction, OrderBy, Selection};
