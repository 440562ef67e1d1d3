//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod csv_trailer_catalog;
mod layered_permit_registry;

pub use csv_trailer_catalog::CsvTrailerCatalog;
pub use layered_permit_registry::LayeredPermitRegistry;
