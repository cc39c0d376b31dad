//! Identifier types shared across the domain and application layers.

mod types;

pub use types::{EntityId, EventId};
