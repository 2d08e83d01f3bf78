//! Request scoping module
//!
//! Everything a call needs before it touches the network:
//!
//! - [`ResourceIdentity`] and [`Scope`] - which resource a call targets
//! - [`PathBuilder`] - identity to URL, one encoded segment at a time
//! - [`QueryOptions`] - OData `$filter`/`$top`/`$skip`/`$select`/`$orderby`/`$count`
//! - [`Validate`] - body checks run before serialization

mod identity;
mod query;
mod validate;

pub use identity::{PathBuilder, ResourceIdentity, ResourceType, Scope};
pub use query::QueryOptions;
pub use validate::{
    require_non_empty, require_range, require_resource_name, NameAvailabilityParameters,
    TrackedResourceParameters, UpdateParameters, Validate,
};

#[cfg(test)]
mod tests;
