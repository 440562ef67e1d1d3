//! Command handlers

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use haulplan_app::constants::SEASONAL_RESTRICTIONS;
use haulplan_app::{PlannerConfig, PlanningService, ShipmentRequest, StaticReference};
use haulplan_domain::model::{CargoEnvelope, HosStatus, StateSegment, TrailerType};
use haulplan_domain::service::{
    calculate_route_permits_seasonal, check_route_seasonal_restrictions, select_trucks, validate_trip_hos,
    PermitInput, TripHosInput,
};
use haulplan_domain::service::route_permits::SeasonalAdjustment;
use haulplan_domain::{PermitRegistry, TrailerCatalog};
use haulplan_infra::{CsvTrailerCatalog, LayeredPermitRegistry};
use haulplan_types::{Error, OutputFormat, Result, ValidationError};

use crate::cli::{Cli, Commands, EnvelopeArgs};
use crate::output;

/// Built-in catalog or one imported from CSV
pub enum Catalog {
    Builtin(StaticReference),
    Csv(CsvTrailerCatalog),
}

impl TrailerCatalog for Catalog {
    fn trailers(&self) -> &[TrailerType] {
        match self {
            Catalog::Builtin(reference) => reference.trailers(),
            Catalog::Csv(catalog) => catalog.trailers(),
        }
    }
}

pub type Registry = LayeredPermitRegistry<StaticReference>;

fn open_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => Ok(Catalog::Csv(CsvTrailerCatalog::new(path)?)),
        None => Ok(Catalog::Builtin(StaticReference)),
    }
}

fn open_registry(path: Option<&PathBuf>) -> Result<Registry> {
    match path {
        Some(path) => LayeredPermitRegistry::from_file(StaticReference, path),
        None => Ok(LayeredPermitRegistry::new(StaticReference)),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Normalise and check a comma-separated state list
fn route_states(states: &[String], registry: &Registry) -> Result<Vec<String>> {
    let codes: Vec<String> = states
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    if codes.is_empty() {
        return Err(ValidationError::InvalidRequest("at least one state is required".to_string()).into());
    }
    if let Some(unknown) = codes.iter().find(|c| registry.state(c).is_none()) {
        return Err(Error::UnknownState(unknown.clone()));
    }
    Ok(codes)
}

fn check_dimensions(length: f64, width: f64, height: f64, weight: f64) -> Result<()> {
    for (name, value) in [("length", length), ("width", width), ("height", height), ("weight", weight)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::InvalidRequest(format!("{} must be positive", name)).into());
        }
    }
    Ok(())
}

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config = PlannerConfig::load()?;
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Select { envelope, top } => cmd_select(&cli, *envelope, *top, format),

        Commands::Plan { request, date } => cmd_plan(&cli, config, request, *date, format),

        Commands::Permits {
            states,
            length,
            width,
            height,
            weight,
            distance,
            includes_securement,
            date,
        } => {
            check_dimensions(*length, *width, *height, *weight)?;
            let input = PermitInput::new(CargoEnvelope::new(*length, *width, *height, *weight))
                .with_securement_included(*includes_securement)
                .as_of(date.unwrap_or_else(today));
            cmd_permits(&cli, &config, states, input, *distance, format)
        }

        Commands::Seasonal { states, date } => cmd_seasonal(&cli, states, date.unwrap_or_else(today), format),

        Commands::Hos {
            miles,
            speed,
            cycle_used,
        } => cmd_hos(&config, *miles, *speed, *cycle_used, format),

        Commands::States { code } => cmd_states(&cli, code.as_deref(), format),

        Commands::Config { init } => cmd_config(config, *init),
    }
}

fn cmd_select(cli: &Cli, envelope: EnvelopeArgs, top: usize, format: OutputFormat) -> Result<()> {
    check_dimensions(envelope.length, envelope.width, envelope.height, envelope.weight)?;
    let catalog = open_catalog(cli.catalog.as_ref())?;
    let env = CargoEnvelope::new(envelope.length, envelope.width, envelope.height, envelope.weight);
    let mut recommendations = select_trucks(&catalog, &env);
    recommendations.truncate(top.max(1));
    output::print_recommendations(format, &env, &recommendations)
}

fn cmd_plan(
    cli: &Cli,
    config: PlannerConfig,
    path: &Path,
    date: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    let mut request = ShipmentRequest::from_json_file(path)?;
    if date.is_some() {
        request.trip_date = date;
    }
    debug!(items = request.items.len(), routes = request.routes.len(), "request loaded");

    let service = PlanningService::with_reference(
        open_catalog(cli.catalog.as_ref())?,
        open_registry(cli.overrides.as_ref())?,
        config,
    );
    let quote = service.plan_shipment(&request)?;
    output::print_quote(format, &quote)
}

fn cmd_permits(
    cli: &Cli,
    config: &PlannerConfig,
    states: &[String],
    input: PermitInput,
    distance: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let registry = open_registry(cli.overrides.as_ref())?;
    let codes = route_states(states, &registry)?;
    if let Some(miles) = distance {
        if !miles.is_finite() || miles < 0.0 {
            return Err(ValidationError::InvalidRequest("distance must not be negative".to_string()).into());
        }
    }

    let per_state = match distance {
        Some(miles) => miles / codes.len() as f64,
        None => config.permits.minimum_distance_miles,
    };
    let segments: Vec<StateSegment> = codes.iter().map(|c| StateSegment::new(c.as_str(), per_state)).collect();
    let date = input.as_of.unwrap_or_else(today);

    let mut summary = calculate_route_permits_seasonal(
        &registry,
        &segments,
        &input,
        &config.permits,
        &config.escort,
        Some(SeasonalAdjustment {
            date,
            table: &SEASONAL_RESTRICTIONS,
        }),
    );
    if distance.is_none() {
        summary.warnings.push(format!(
            "No distance supplied; distance fees estimated on {:.0} miles per state",
            per_state
        ));
    }
    output::print_route_permits(format, &summary)
}

fn cmd_seasonal(cli: &Cli, states: &[String], date: NaiveDate, format: OutputFormat) -> Result<()> {
    let registry = open_registry(cli.overrides.as_ref())?;
    let codes = route_states(states, &registry)?;
    let check = check_route_seasonal_restrictions(&codes, date, &SEASONAL_RESTRICTIONS);
    output::print_seasonal(format, date, &check)
}

fn cmd_hos(config: &PlannerConfig, miles: f64, speed: Option<f64>, cycle_used: f64, format: OutputFormat) -> Result<()> {
    if !miles.is_finite() || miles < 0.0 {
        return Err(ValidationError::InvalidRequest("miles must not be negative".to_string()).into());
    }
    let mut input = TripHosInput::new(miles).with_start_status(HosStatus {
        cycle_hours: cycle_used.max(0.0),
        ..HosStatus::default()
    });
    if let Some(mph) = speed {
        input = input.with_speed(mph);
    }
    let validation = validate_trip_hos(&input, &config.hos);
    output::print_hos(format, &validation)
}

fn cmd_states(cli: &Cli, code: Option<&str>, format: OutputFormat) -> Result<()> {
    let registry = open_registry(cli.overrides.as_ref())?;
    match code {
        Some(code) => {
            let state = registry
                .state(code)
                .ok_or_else(|| Error::UnknownState(code.to_uppercase()))?;
            output::print_state(format, state)
        }
        None => {
            let states: Vec<_> = registry.codes().iter().filter_map(|c| registry.state(c)).collect();
            output::print_state_list(format, &states)
        }
    }
}

fn cmd_config(config: PlannerConfig, init: bool) -> Result<()> {
    if init {
        let path = PlannerConfig::config_path()?;
        if path.exists() {
            println!("Configuration already exists: {}", path.display());
        } else {
            PlannerConfig::default().save()?;
            println!("Default configuration written to {}", path.display());
        }
        println!("\n{}", PlannerConfig::load()?);
        return Ok(());
    }
    println!("{}", config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_states_normalises_and_rejects_unknown() {
        let registry = open_registry(None).unwrap();
        let codes = route_states(&["tx".to_string(), " ok ".to_string()], &registry).unwrap();
        assert_eq!(codes, vec!["TX", "OK"]);
        assert!(matches!(
            route_states(&["TX".to_string(), "XX".to_string()], &registry),
            Err(Error::UnknownState(code)) if code == "XX"
        ));
        assert!(route_states(&[String::new()], &registry).is_err());
    }

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions(10.0, 6.0, 7.0, 15_000.0).is_ok());
        assert!(check_dimensions(10.0, 0.0, 7.0, 15_000.0).is_err());
        assert!(check_dimensions(f64::NAN, 6.0, 7.0, 15_000.0).is_err());
    }

    #[test]
    fn test_csv_catalog_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trailers.csv");
        std::fs::write(
            &path,
            "id,name,category,deck_length_ft,deck_height_ft,max_cargo_height_ft,max_cargo_weight_lbs,tare_weight_lbs,axle_groups\n\
             only-flat,Only Flatbed,flatbed,48,5.0,8.5,48000,10500,2@38\n",
        )
        .unwrap();
        let catalog = open_catalog(Some(&path)).unwrap();
        assert_eq!(catalog.trailers().len(), 1);
        assert!(open_catalog(None).unwrap().trailers().len() > 1);
    }
}
