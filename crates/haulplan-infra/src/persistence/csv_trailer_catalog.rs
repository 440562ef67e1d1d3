//! File-based implementation of TrailerCatalog

use std::path::{Path, PathBuf};

use haulplan_domain::model::TrailerType;
use haulplan_domain::repository::TrailerCatalog;
use haulplan_types::Error;

use crate::catalog_csv::load_trailers_from_csv;

/// Trailer catalog backed by a CSV file
#[derive(Debug, Clone)]
pub struct CsvTrailerCatalog {
    csv_path: PathBuf,
    trailers: Vec<TrailerType>,
}

impl CsvTrailerCatalog {
    /// Create a new catalog from a CSV file path
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self, Error> {
        let csv_path = csv_path.into();
        let trailers = load_trailers_from_csv(&csv_path)?;
        Ok(Self { csv_path, trailers })
    }

    /// Get the CSV path
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Reload data from the CSV file
    pub fn reload(&mut self) -> Result<(), Error> {
        self.trailers = load_trailers_from_csv(&self.csv_path)?;
        Ok(())
    }
}

impl TrailerCatalog for CsvTrailerCatalog {
    fn trailers(&self) -> &[TrailerType] {
        &self.trailers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "id,name,category,deck_length_ft,deck_height_ft,max_cargo_height_ft,max_cargo_weight_lbs,tare_weight_lbs,axle_groups\n\
        flat-48,Flatbed 48',flatbed,48,5.0,8.5,48000,10500,2@38\n\
        rgn-3,RGN 3 axle,rgn,29,2.0,11.5,60000,20000,3x9@40\n";

    #[test]
    fn test_catalog_lookup_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trailers.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut catalog = CsvTrailerCatalog::new(&path).unwrap();
        assert_eq!(catalog.trailers().len(), 2);
        assert_eq!(catalog.find_trailer("rgn-3").map(|t| t.deck_length_ft), Some(29.0));
        assert!(catalog.find_trailer("lowboy").is_none());

        std::fs::write(&path, CSV.lines().take(2).collect::<Vec<_>>().join("\n")).unwrap();
        catalog.reload().unwrap();
        assert_eq!(catalog.trailers().len(), 1);
        assert_eq!(catalog.csv_path(), path.as_path());
    }

    #[test]
    fn test_invalid_file_is_catalog_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trailers.csv");
        std::fs::write(&path, "id,name\nx,y\n").unwrap();
        assert!(matches!(CsvTrailerCatalog::new(&path), Err(Error::Catalog(_))));
    }
}
