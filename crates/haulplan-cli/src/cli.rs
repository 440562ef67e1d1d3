//! CLI definition using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use haulplan_types::OutputFormat;

#[derive(Parser)]
#[command(name = "haulplan")]
#[command(version)]
#[command(about = "Heavy-haul load planning, permits and compliance checks")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Trailer catalog CSV replacing the built-in catalog
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// JSON file of state permit records layered over the built-in tables
    #[arg(long, global = true)]
    pub overrides: Option<PathBuf>,
}

/// Cargo envelope in feet and pounds
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct EnvelopeArgs {
    /// Cargo length (ft)
    #[arg(long)]
    pub length: f64,

    /// Cargo width (ft)
    #[arg(long)]
    pub width: f64,

    /// Cargo height (ft)
    #[arg(long)]
    pub height: f64,

    /// Cargo weight (lbs)
    #[arg(long)]
    pub weight: f64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank catalog trailers for one cargo envelope
    Select {
        #[command(flatten)]
        envelope: EnvelopeArgs,

        /// Number of recommendations to show
        #[arg(long, short = 'n', default_value_t = 5)]
        top: usize,
    },

    /// Plan a shipment from a request JSON file
    Plan {
        /// Path to ShipmentRequest JSON
        request: PathBuf,

        /// Trip date (YYYY-MM-DD), overrides the request
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Permit requirements for a transport envelope across states
    Permits {
        /// States in travel order (e.g. TX,OK,KS)
        #[arg(long, value_delimiter = ',', required = true)]
        states: Vec<String>,

        /// Overall length (ft)
        #[arg(long)]
        length: f64,

        /// Transport width (ft)
        #[arg(long)]
        width: f64,

        /// Overall height (ft)
        #[arg(long)]
        height: f64,

        /// Gross weight (lbs)
        #[arg(long)]
        weight: f64,

        /// Total route miles, split evenly across the states
        #[arg(long)]
        distance: Option<f64>,

        /// Width already includes securement hardware
        #[arg(long)]
        includes_securement: bool,

        /// Trip date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Seasonal weight restrictions along a route
    Seasonal {
        /// States on the route (e.g. MN,WI,MI)
        #[arg(long, value_delimiter = ',', required = true)]
        states: Vec<String>,

        /// Trip date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Hours-of-service check for one trip
    Hos {
        /// Trip distance (miles)
        #[arg(long)]
        miles: f64,

        /// Average speed (mph), config value when omitted
        #[arg(long)]
        speed: Option<f64>,

        /// On-duty hours already used in the current cycle
        #[arg(long, default_value_t = 0.0)]
        cycle_used: f64,
    },

    /// Show state permit data
    States {
        /// Two-letter state code; lists every state when omitted
        code: Option<String>,
    },

    /// Show configuration
    Config {
        /// Write a default config file when none exists
        #[arg(long)]
        init: bool,
    },
}
