//! Trailer selection and scoring
//!
//! Every catalog trailer is scored against a cargo envelope. Trailers that cannot
//! physically carry the cargo are left out of the result entirely.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::federal::{LEGAL_GROSS_LBS, LEGAL_HEIGHT_FT, LEGAL_WIDTH_FT};
use crate::model::{CargoEnvelope, CargoItem, TrailerCategory, TrailerType};
use crate::repository::TrailerCatalog;

/// Scoring policy
pub mod weights {
    pub const BASE: f64 = 50.0;
    pub const LEGAL_BONUS: f64 = 25.0;
    pub const MAX_WASTE_PENALTY: f64 = 20.0;
    pub const WASTE_LENGTH_SHARE: f64 = 0.7;
    pub const WASTE_WIDTH_SHARE: f64 = 0.3;
    pub const MAX_CATEGORY_BONUS: f64 = 15.0;

    /// Cargo at least this tall favours low decks
    pub const TALL_CARGO_FT: f64 = 8.5;
    /// Cargo above this weight favours heavy-haul trailers
    pub const HEAVY_CARGO_LBS: f64 = 48_000.0;
    pub const VERY_HEAVY_CARGO_LBS: f64 = 100_000.0;
    pub const LONG_CARGO_FT: f64 = 53.0;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub legal_bonus: f64,
    pub waste_penalty: f64,
    pub category_bonus: f64,
    pub fits_legal: bool,
    /// Cargo rides in the well
    pub uses_well: bool,
    /// Why the loaded trailer would need a permit
    #[serde(default)]
    pub permit_reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckRecommendation {
    pub trailer: TrailerType,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Unused share of the trailer's physical length, width and weight capacity
    pub excess_capacity: f64,
}

/// Cargo taller than the upper deck must ride in the well
fn needs_well(trailer: &TrailerType, env: &CargoEnvelope) -> bool {
    trailer.has_well() && env.height_ft > trailer.upper_deck_clearance_ft()
}

fn physically_fits(trailer: &TrailerType, env: &CargoEnvelope) -> bool {
    if env.length_ft > trailer.max_cargo_length_ft
        || env.width_ft > trailer.max_cargo_width_ft
        || env.weight_lbs > trailer.max_cargo_weight_lbs
        || env.height_ft > trailer.max_cargo_height_ft
    {
        return false;
    }
    if needs_well(trailer, env) {
        return env.length_ft <= trailer.well_length_ft.unwrap_or(0.0);
    }
    true
}

/// Reasons the loaded combination exceeds federal no-permit limits
fn permit_reasons(trailer: &TrailerType, env: &CargoEnvelope, uses_well: bool) -> Vec<String> {
    // Cargo that fits the well rides there whenever the trailer has one.
    let in_well = uses_well || (trailer.has_well() && env.length_ft <= trailer.well_length_ft.unwrap_or(0.0));
    let ride_height = if in_well {
        trailer.lowest_deck_height_ft()
    } else {
        trailer.deck_height_ft
    };
    let overall_height = ride_height + env.height_ft;
    let gross = env.weight_lbs + trailer.combination_tare_lbs();

    let mut reasons = Vec::new();
    if env.width_ft > LEGAL_WIDTH_FT {
        reasons.push(format!("width {:.1} ft exceeds {:.1} ft", env.width_ft, LEGAL_WIDTH_FT));
    }
    if overall_height > LEGAL_HEIGHT_FT {
        reasons.push(format!(
            "overall height {:.1} ft exceeds {:.1} ft",
            overall_height, LEGAL_HEIGHT_FT
        ));
    }
    if env.length_ft > trailer.legal_cargo_length_ft() {
        reasons.push(format!(
            "length {:.1} ft exceeds the {:.1} ft legal deck",
            env.length_ft,
            trailer.legal_cargo_length_ft()
        ));
    }
    if gross > LEGAL_GROSS_LBS {
        reasons.push(format!("gross {:.0} lbs exceeds {:.0} lbs", gross, LEGAL_GROSS_LBS));
    }
    reasons
}

fn category_bonus(category: TrailerCategory, env: &CargoEnvelope) -> f64 {
    use TrailerCategory::*;

    let tall = env.height_ft >= weights::TALL_CARGO_FT;
    let heavy = env.weight_lbs > weights::HEAVY_CARGO_LBS;
    let very_heavy = env.weight_lbs > weights::VERY_HEAVY_CARGO_LBS;
    let long = env.length_ft > weights::LONG_CARGO_FT;

    let mut bonus: f64 = 0.0;
    if !tall && !heavy && !long {
        bonus += match category {
            Flatbed => 10.0,
            Conestoga => 6.0,
            StepDeck => 5.0,
            Rgn | Lowboy | MultiAxle | Schnabel | Perimeter => -10.0,
            _ => 0.0,
        };
    }
    if tall {
        bonus += match category {
            Rgn | Lowboy => 15.0,
            DoubleDrop => 12.0,
            StepDeck => 8.0,
            Flatbed | Conestoga => -5.0,
            _ => 0.0,
        };
    }
    if heavy && !very_heavy {
        bonus += match category {
            MultiAxle | Lowboy => 12.0,
            Rgn => 8.0,
            _ => 0.0,
        };
    }
    if very_heavy {
        bonus += match category {
            Schnabel | Perimeter | MultiAxle => 15.0,
            Lowboy => 6.0,
            _ => 0.0,
        };
    }
    if long {
        bonus += match category {
            Stretch => 15.0,
            Schnabel | Perimeter => 8.0,
            _ => 0.0,
        };
    }
    bonus.clamp(-weights::MAX_CATEGORY_BONUS, weights::MAX_CATEGORY_BONUS)
}

fn waste_penalty(trailer: &TrailerType, env: &CargoEnvelope) -> f64 {
    let length_waste = ((trailer.deck_length_ft - env.length_ft) / trailer.deck_length_ft).clamp(0.0, 1.0);
    let width_waste = ((trailer.deck_width_ft - env.width_ft) / trailer.deck_width_ft).clamp(0.0, 1.0);
    weights::MAX_WASTE_PENALTY
        * (weights::WASTE_LENGTH_SHARE * length_waste + weights::WASTE_WIDTH_SHARE * width_waste)
}

fn excess_capacity(trailer: &TrailerType, env: &CargoEnvelope) -> f64 {
    let share = |capacity: f64, used: f64| {
        if capacity > 0.0 {
            ((capacity - used) / capacity).max(0.0)
        } else {
            0.0
        }
    };
    (share(trailer.max_cargo_length_ft, env.length_ft)
        + share(trailer.max_cargo_width_ft, env.width_ft)
        + share(trailer.max_cargo_weight_lbs, env.weight_lbs))
        / 3.0
}

/// Score one trailer, or `None` when it cannot carry the cargo at all
pub fn score_trailer(trailer: &TrailerType, env: &CargoEnvelope) -> Option<TruckRecommendation> {
    if !physically_fits(trailer, env) {
        return None;
    }
    let uses_well = needs_well(trailer, env);
    let reasons = permit_reasons(trailer, env, uses_well);
    let fits_legal = reasons.is_empty();

    let legal_bonus = if fits_legal { weights::LEGAL_BONUS } else { 0.0 };
    let waste = waste_penalty(trailer, env);
    let category = category_bonus(trailer.category, env);
    let score = (weights::BASE + legal_bonus - waste + category).clamp(0.0, 100.0);

    Some(TruckRecommendation {
        trailer: trailer.clone(),
        score,
        breakdown: ScoreBreakdown {
            base: weights::BASE,
            legal_bonus,
            waste_penalty: waste,
            category_bonus: category,
            fits_legal,
            uses_well,
            permit_reasons: reasons,
        },
        excess_capacity: excess_capacity(trailer, env),
    })
}

/// Every physically suitable trailer, best first
pub fn select_trucks<C: TrailerCatalog + ?Sized>(catalog: &C, env: &CargoEnvelope) -> Vec<TruckRecommendation> {
    let mut recommendations: Vec<TruckRecommendation> = catalog
        .trailers()
        .iter()
        .filter_map(|t| score_trailer(t, env))
        .collect();

    recommendations.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.excess_capacity.total_cmp(&b.excess_capacity))
            .then(a.trailer.popularity_rank.cmp(&b.trailer.popularity_rank))
    });

    debug!(
        candidates = catalog.trailers().len(),
        suitable = recommendations.len(),
        top = recommendations.first().map(|r| r.trailer.id.as_str()),
        "scored trailers"
    );
    recommendations
}

/// Top recommendation for a single cargo line
pub fn best_trailer_for<C: TrailerCatalog + ?Sized>(catalog: &C, item: &CargoItem) -> Option<TruckRecommendation> {
    select_trucks(catalog, &CargoEnvelope::from_item(item)).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flatbed_48, rgn, step_deck_48};

    fn catalog() -> Vec<TrailerType> {
        vec![rgn(), step_deck_48(), flatbed_48()]
    }

    #[test]
    fn test_small_cargo_prefers_flatbed() {
        let env = CargoEnvelope::new(10.0, 6.0, 7.0, 15_000.0);
        let recs = select_trucks(&catalog(), &env);
        let top = &recs[0];
        assert_eq!(top.trailer.category, TrailerCategory::Flatbed);
        assert!(top.score > 50.0);
        assert!(top.breakdown.fits_legal);
    }

    #[test]
    fn test_empty_catalog_returns_nothing() {
        let env = CargoEnvelope::new(10.0, 6.0, 7.0, 15_000.0);
        let empty: Vec<TrailerType> = Vec::new();
        assert!(select_trucks(&empty, &env).is_empty());
    }

    #[test]
    fn test_rejected_trailers_are_omitted() {
        // Too heavy for the 48k flatbed and step deck
        let env = CargoEnvelope::new(20.0, 8.0, 8.0, 60_000.0);
        let recs = select_trucks(&catalog(), &env);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].trailer.category, TrailerCategory::Rgn);
    }

    #[test]
    fn test_tall_cargo_must_fit_the_well() {
        // Upper deck clearance is 3.5 + 12.5 − 5 = 11 ft
        let trailer = step_deck_48();
        assert!((trailer.upper_deck_clearance_ft() - 11.0).abs() < 1e-9);
        let short_tall = CargoEnvelope::new(30.0, 8.0, 11.5, 20_000.0);
        let long_tall = CargoEnvelope::new(40.0, 8.0, 11.5, 20_000.0);
        let rec = score_trailer(&trailer, &short_tall).unwrap();
        assert!(rec.breakdown.uses_well);
        assert!(score_trailer(&trailer, &long_tall).is_none());
    }

    #[test]
    fn test_tall_cargo_favours_low_decks() {
        let env = CargoEnvelope::new(24.0, 8.0, 10.0, 30_000.0);
        let recs = select_trucks(&catalog(), &env);
        assert_eq!(recs[0].trailer.category, TrailerCategory::Rgn);
        // 10 ft on a 5 ft flatbed is 15 ft overall
        let flat = recs
            .iter()
            .find(|r| r.trailer.category == TrailerCategory::Flatbed)
            .unwrap();
        assert!(!flat.breakdown.fits_legal);
        assert!(flat.breakdown.permit_reasons.iter().any(|r| r.contains("height")));
    }

    #[test]
    fn test_scores_stay_in_range() {
        for env in [
            CargoEnvelope::new(1.0, 1.0, 1.0, 100.0),
            CargoEnvelope::new(29.0, 16.0, 11.5, 80_000.0),
        ] {
            for rec in select_trucks(&catalog(), &env) {
                assert!((0.0..=100.0).contains(&rec.score));
            }
        }
    }

    #[test]
    fn test_category_bonus_stacks_then_clamps() {
        // Tall and heavy on an RGN earns 15 + 8 before the cap
        let tall_heavy = CargoEnvelope::new(30.0, 8.0, 10.0, 60_000.0);
        assert_eq!(category_bonus(TrailerCategory::Rgn, &tall_heavy), weights::MAX_CATEGORY_BONUS);
        let ordinary = CargoEnvelope::new(10.0, 6.0, 7.0, 15_000.0);
        assert_eq!(category_bonus(TrailerCategory::Flatbed, &ordinary), 10.0);
        assert_eq!(category_bonus(TrailerCategory::Rgn, &ordinary), -10.0);
    }

    #[test]
    fn test_best_trailer_for_item() {
        let item = CargoItem::new("generator", 12.0, 7.0, 6.0, 18_000.0);
        let rec = best_trailer_for(&catalog(), &item).unwrap();
        assert_eq!(rec.trailer.id, "flatbed-48");
    }
}
