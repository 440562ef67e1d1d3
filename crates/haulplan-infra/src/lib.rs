//! Infrastructure layer - catalog import, permit overrides, file-backed repositories

pub mod catalog_csv;
pub mod permit_overrides;
pub mod persistence;

pub use catalog_csv::{load_trailers_from_csv, load_trailers_from_reader, CatalogImportError};
pub use permit_overrides::{load_permit_overrides, parse_permit_overrides};
pub use persistence::{CsvTrailerCatalog, LayeredPermitRegistry};
