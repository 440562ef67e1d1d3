//! Domain model types

pub mod bridge;
pub mod cargo;
pub mod hos;
pub mod load;
pub mod permit;
pub mod route;
pub mod seasonal;
pub mod trailer;

pub use bridge::{ClearanceConflict, ClearanceReport, LowClearanceBridge};
pub use cargo::{CargoEnvelope, CargoItem};
pub use hos::{DutySegment, DutyStatus, HosStatus, LoadHos, RestKind, RestStop, TripHosValidation};
pub use load::{
    AxleGroupLoad, AxleWeights, ItemPlacement, LoadPlan, Placement3D, PlannedLoad, UnassignedItem,
};
pub use permit::{
    AnnualPermit, BridgeAnalysisEstimate, BridgeAnalysisRule, Dimension, DimensionSurcharge,
    EscortCost, EscortRequirement, EscortRules, FeeLine, GeoBounds, LegalLimits,
    OverweightSchedule, OversizeSchedule, PermitRequirement, RestrictedRoute, RoutePermitSummary,
    SpecialJurisdiction, StatePermitData, SuperloadThresholds, SurchargeModel, TravelRestrictions,
    WeightBracket, WeightLimits,
};
pub use route::{RouteAlternative, RouteCandidate, StateSegment};
pub use seasonal::{ActiveRestriction, MonthDay, SeasonalCheck, SeasonalRestriction, WeightReduction};
pub use trailer::{
    AxleConfiguration, AxleGroup, AxleGroupKind, DeckRegion, LoadingMethod, TrailerCategory,
    TrailerType,
};
