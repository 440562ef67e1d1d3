//! Load planning and regulatory compliance engine
//!
//! Everything here is a pure function of its arguments. Reference data comes in
//! through the repository traits, "today" comes in as a date.

pub mod federal;
pub mod model;
pub mod repository;
pub mod service;

pub use model::*;
pub use repository::{GeocodeError, PermitRegistry, StateGeocoder, TrailerCatalog};

#[cfg(test)]
pub(crate) mod test_support;
