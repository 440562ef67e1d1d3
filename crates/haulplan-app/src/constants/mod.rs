//! Reference data tables

pub mod bridges;
pub mod diesel;
pub mod seasonal;
pub mod states;
pub mod trailers;

pub use bridges::LOW_CLEARANCE_BRIDGES;
pub use diesel::DIESEL_PRICE_INDEX;
pub use seasonal::SEASONAL_RESTRICTIONS;
pub use states::{all_state_codes, get_state_by_code, STATE_PERMITS};
pub use trailers::{get_trailer, TRAILER_CATALOG};
