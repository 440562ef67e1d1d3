//! CSV loader for trailer catalogs
//!
//! Expected header (column order is free, optional columns may be left out):
//! `id, name, category, deck_length_ft, deck_width_ft, deck_height_ft,
//! [well_length_ft], [well_height_ft], [well_offset_ft], [max_cargo_length_ft],
//! [max_cargo_width_ft], max_cargo_height_ft, max_cargo_weight_lbs, tare_weight_lbs,
//! [power_unit_weight_lbs], [loading_method], axle_groups, [kingpin_setback_ft],
//! [tie_down_spacing_ft], [popularity_rank]`
//!
//! `axle_groups` lists the trailer-side groups front to rear as
//! `count[xspread]@position`, separated by `;` (e.g. `2@38` or `3x9@42;2x4.1@52`).
//! Positions are measured from the kingpin. Every trailer gets the standard tractor.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use haulplan_domain::model::{
    AxleConfiguration, AxleGroup, AxleGroupKind, LoadingMethod, TrailerCategory, TrailerType,
};
use haulplan_types::Error;

const DEFAULT_POWER_UNIT_LBS: f64 = 19_000.0;
const DEFAULT_KINGPIN_SETBACK_FT: f64 = 3.0;
const DEFAULT_TIE_DOWN_SPACING_FT: f64 = 2.0;
const DEFAULT_DECK_WIDTH_FT: f64 = 8.5;

#[derive(Debug, Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read catalog header: {0}")]
    Header(String),

    #[error("row {row}: {message}")]
    Row { row: usize, message: String },

    #[error("catalog contains no trailers")]
    Empty,
}

impl From<CatalogImportError> for Error {
    fn from(e: CatalogImportError) -> Self {
        Error::Catalog(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct TrailerRow {
    id: String,
    name: String,
    category: String,
    deck_length_ft: f64,
    #[serde(default)]
    deck_width_ft: Option<f64>,
    deck_height_ft: f64,
    #[serde(default)]
    well_length_ft: Option<f64>,
    #[serde(default)]
    well_height_ft: Option<f64>,
    #[serde(default)]
    well_offset_ft: Option<f64>,
    #[serde(default)]
    max_cargo_length_ft: Option<f64>,
    #[serde(default)]
    max_cargo_width_ft: Option<f64>,
    max_cargo_height_ft: f64,
    max_cargo_weight_lbs: f64,
    tare_weight_lbs: f64,
    #[serde(default)]
    power_unit_weight_lbs: Option<f64>,
    #[serde(default)]
    loading_method: Option<String>,
    axle_groups: String,
    #[serde(default)]
    kingpin_setback_ft: Option<f64>,
    #[serde(default)]
    tie_down_spacing_ft: Option<f64>,
    #[serde(default)]
    popularity_rank: Option<u32>,
}

fn default_spread_ft(axle_count: u8) -> f64 {
    match axle_count {
        0 | 1 => 0.0,
        2 => 4.1,
        n => f64::from(n - 1) * 4.5,
    }
}

/// Parse one `count[xspread]@position` entry
fn parse_axle_group(entry: &str, index: usize) -> Result<AxleGroup, String> {
    let (head, position) = entry
        .split_once('@')
        .ok_or_else(|| format!("axle group '{}' is missing '@position'", entry))?;
    let position_ft: f64 = position
        .trim()
        .parse()
        .map_err(|_| format!("axle group '{}' has an invalid position", entry))?;
    let (count, spread) = match head.split_once(['x', 'X']) {
        Some((count, spread)) => (count, Some(spread)),
        None => (head, None),
    };
    let axle_count: u8 = count
        .trim()
        .parse()
        .map_err(|_| format!("axle group '{}' has an invalid axle count", entry))?;
    if axle_count == 0 {
        return Err(format!("axle group '{}' has no axles", entry));
    }
    let spread_ft = match spread {
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("axle group '{}' has an invalid spread", entry))?,
        None => default_spread_ft(axle_count),
    };
    Ok(AxleGroup::new(
        format!("Trailer group {}", index + 1),
        AxleGroupKind::Trailer,
        axle_count,
        spread_ft,
        position_ft,
    ))
}

fn parse_axle_groups(column: &str) -> Result<Vec<AxleGroup>, String> {
    let groups = column
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, s)| parse_axle_group(s, i))
        .collect::<Result<Vec<_>, _>>()?;
    if groups.is_empty() {
        return Err("axle_groups is empty".to_string());
    }
    Ok(groups)
}

fn positive(name: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{} must be positive (got {})", name, value))
    }
}

fn into_trailer(row: TrailerRow, rank: u32) -> Result<TrailerType, String> {
    if row.id.trim().is_empty() {
        return Err("id is empty".to_string());
    }
    let category = TrailerCategory::parse(&row.category)
        .ok_or_else(|| format!("unknown category '{}'", row.category))?;
    let loading_method = match row.loading_method.as_deref().map(str::trim) {
        None | Some("") => LoadingMethod::Crane,
        Some(s) => LoadingMethod::parse(s).ok_or_else(|| format!("unknown loading method '{}'", s))?,
    };
    if row.well_length_ft.is_some() != row.well_height_ft.is_some() {
        return Err("well_length_ft and well_height_ft must be given together".to_string());
    }

    let deck_length_ft = positive("deck_length_ft", row.deck_length_ft)?;
    let deck_width_ft = positive("deck_width_ft", row.deck_width_ft.unwrap_or(DEFAULT_DECK_WIDTH_FT))?;
    let axles = AxleConfiguration::with_standard_tractor(
        parse_axle_groups(&row.axle_groups)?,
        row.kingpin_setback_ft.unwrap_or(DEFAULT_KINGPIN_SETBACK_FT),
    );

    Ok(TrailerType {
        id: row.id.trim().to_string(),
        name: row.name.trim().to_string(),
        category,
        deck_length_ft,
        deck_width_ft,
        deck_height_ft: positive("deck_height_ft", row.deck_height_ft)?,
        well_length_ft: row.well_length_ft,
        well_height_ft: row.well_height_ft,
        well_offset_ft: row.well_offset_ft,
        max_cargo_length_ft: positive(
            "max_cargo_length_ft",
            row.max_cargo_length_ft.unwrap_or(deck_length_ft),
        )?,
        max_cargo_width_ft: positive("max_cargo_width_ft", row.max_cargo_width_ft.unwrap_or(deck_width_ft))?,
        max_cargo_height_ft: positive("max_cargo_height_ft", row.max_cargo_height_ft)?,
        max_cargo_weight_lbs: positive("max_cargo_weight_lbs", row.max_cargo_weight_lbs)?,
        tare_weight_lbs: positive("tare_weight_lbs", row.tare_weight_lbs)?,
        power_unit_weight_lbs: positive(
            "power_unit_weight_lbs",
            row.power_unit_weight_lbs.unwrap_or(DEFAULT_POWER_UNIT_LBS),
        )?,
        legal_cargo_height_override_ft: None,
        loading_method,
        axles,
        tie_down_spacing_ft: positive(
            "tie_down_spacing_ft",
            row.tie_down_spacing_ft.unwrap_or(DEFAULT_TIE_DOWN_SPACING_FT),
        )?,
        popularity_rank: row.popularity_rank.unwrap_or(rank),
    })
}

/// Load a trailer catalog from any CSV source
pub fn load_trailers_from_reader<R: Read>(reader: R) -> Result<Vec<TrailerType>, CatalogImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);
    rdr.headers()
        .map_err(|e| CatalogImportError::Header(e.to_string()))?;

    let mut trailers = Vec::new();
    let mut seen = HashSet::new();
    for (index, result) in rdr.deserialize::<TrailerRow>().enumerate() {
        // Line 1 is the header
        let row_number = index + 2;
        let row_error = |message: String| CatalogImportError::Row {
            row: row_number,
            message,
        };
        let row = result.map_err(|e| row_error(e.to_string()))?;
        let trailer = into_trailer(row, index as u32 + 1).map_err(row_error)?;
        if !seen.insert(trailer.id.clone()) {
            return Err(row_error(format!("duplicate trailer id '{}'", trailer.id)));
        }
        debug!(id = %trailer.id, category = %trailer.category, "trailer imported");
        trailers.push(trailer);
    }

    if trailers.is_empty() {
        return Err(CatalogImportError::Empty);
    }
    trailers.sort_by_key(|t| t.popularity_rank);
    Ok(trailers)
}

/// Load a trailer catalog from a CSV file
pub fn load_trailers_from_csv(path: &Path) -> Result<Vec<TrailerType>, CatalogImportError> {
    let file = std::fs::File::open(path)?;
    let trailers = load_trailers_from_reader(file)?;
    info!(path = %path.display(), count = trailers.len(), "trailer catalog loaded");
    Ok(trailers)
}
