//! Planner configuration
//!
//! Config stored at: ~/.config/haulplan/config.toml

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use haulplan_domain::service::{CostPolicy, EscortRates, HosPolicy, PermitPolicy, StackingOptions};
use haulplan_types::{ConfigError, Result};

/// Planner-level switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Evaluate route alternatives on worker threads
    pub parallel: bool,
    /// Trip date used when a request omits one
    pub default_trip_date: Option<NaiveDate>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            default_trip_date: None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub permits: PermitPolicy,
    pub escort: EscortRates,
    pub cost: CostPolicy,
    pub hos: HosPolicy,
    pub stacking: StackingOptions,
    pub planner: PlannerSettings,
}

impl PlannerConfig {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("haulplan");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, or defaults when absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()).into())
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

impl std::fmt::Display for PlannerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Haulplan Configuration")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(f, "Securement allowance:  {} in", self.permits.securement_allowance_inches)?;
        writeln!(f, "Minimum fee distance:  {} mi", self.permits.minimum_distance_miles)?;
        writeln!(f, "Stale data after:      {} days", self.permits.stale_after_days)?;
        writeln!(f, "Escort day rate:       {}", self.escort.escort_daily)?;
        writeln!(f, "Pole car day rate:     {}", self.escort.pole_car_daily)?;
        writeln!(f, "Police hourly rate:    {}", self.escort.police_hourly)?;
        writeln!(f, "Miles per day:         {}", self.escort.average_daily_miles)?;
        writeln!(f, "Truck MPG:             {}", self.cost.truck_mpg)?;
        writeln!(
            f,
            "Diesel price:          {}",
            self.cost
                .diesel_price_override
                .map(|p| p.to_string())
                .unwrap_or_else(|| "(index)".to_string())
        )?;
        writeln!(f, "HOS speed:             {} mph", self.hos.average_speed_mph)?;
        writeln!(f, "HOS cycle:             {}", self.hos.cycle.label())?;
        writeln!(f, "Max stack layers:      {}", self.stacking.max_layers)?;
        writeln!(f, "Parallel routes:       {}", self.planner.parallel)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:           {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulplan_domain::service::HosCycle;
    use haulplan_types::Cents;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = PlannerConfig::from_toml(
            r#"
            [permits]
            securement_allowance_inches = 6.0

            [hos]
            cycle = "60/7"
            "#,
        )
        .unwrap();
        assert_eq!(config.permits.securement_allowance_inches, 6.0);
        assert_eq!(config.permits.minimum_distance_miles, 50.0);
        assert_eq!(config.hos.cycle, HosCycle::SixtyHourSevenDay);
        assert_eq!(config.escort, EscortRates::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = PlannerConfig::default();
        config.cost.diesel_price_override = Some(Cents(415));
        config.planner.parallel = false;
        config.save_to(&path).unwrap();

        let loaded = PlannerConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = PlannerConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, PlannerConfig::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let err = PlannerConfig::from_toml("[permits\nbad").unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
