//! Federal size and weight defaults (23 CFR 658, 49 CFR 393)
//!
//! States may allow more; these are the no-permit values used when a state
//! record is absent and for the `is_legal` flag on planned loads.

/// Maximum vehicle width without a permit
pub const LEGAL_WIDTH_FT: f64 = 8.5;

/// Default overall height without a permit
pub const LEGAL_HEIGHT_FT: f64 = 13.5;

/// Semitrailer length on the National Network
pub const LEGAL_TRAILER_LENGTH_FT: f64 = 53.0;

/// Gross vehicle weight cap on the Interstate System
pub const LEGAL_GROSS_LBS: f64 = 80_000.0;

pub const SINGLE_AXLE_LIMIT_LBS: f64 = 20_000.0;

pub const TANDEM_AXLE_LIMIT_LBS: f64 = 34_000.0;

/// Axles up to this spread (96 in) count as a tandem
pub const TANDEM_MAX_SPREAD_FT: f64 = 8.0;

/// Two tandems at least this far apart may carry 34,000 lb each
pub const TANDEM_PAIR_EXCEPTION_FT: f64 = 36.0;

/// Typical steer tyre rating; exceeding it is a warning, not a legal violation
pub const STEER_TIRE_RATING_LBS: f64 = 12_000.0;

/// Cargo taller than this on the deck is flagged oversize in the legacy format
pub const LEGACY_OVERSIZE_CARGO_HEIGHT_FT: f64 = 10.0;

/// Bridge-analysis trigger when a state publishes none
pub const DEFAULT_BRIDGE_ANALYSIS_WEIGHT_LBS: f64 = 200_000.0;

pub const DEFAULT_BRIDGE_ANALYSIS_WIDTH_FT: f64 = 16.0;

/// Aggregate working load limit must reach this share of cargo weight (49 CFR 393.106)
pub const SECUREMENT_WLL_RATIO: f64 = 0.5;

/// Heavy equipment rule (49 CFR 393.130) threshold
pub const HEAVY_ARTICLE_LBS: f64 = 10_000.0;

pub const HEAVY_ARTICLE_MIN_TIE_DOWNS: u32 = 4;

/// HOS limits (49 CFR 395.3)
pub const HOS_MAX_DRIVING_HOURS: f64 = 11.0;
pub const HOS_DUTY_WINDOW_HOURS: f64 = 14.0;
pub const HOS_BREAK_AFTER_DRIVING_HOURS: f64 = 8.0;
pub const HOS_BREAK_HOURS: f64 = 0.5;
pub const HOS_RESET_HOURS: f64 = 10.0;
pub const HOS_RESTART_HOURS: f64 = 34.0;
