//! Hours-of-service duty clock

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyStatus {
    OffDuty,
    OnDutyNotDriving,
    Driving,
    SleeperBerth,
}

impl DutyStatus {
    pub fn is_on_duty(&self) -> bool {
        matches!(self, DutyStatus::OnDutyNotDriving | DutyStatus::Driving)
    }
}

/// Driver clock at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HosStatus {
    /// Driving since the last 10-hour off-duty period
    pub driving_hours: f64,
    /// Hours since the first on-duty event of the current shift
    pub window_hours: f64,
    /// Driving since the last qualifying 30-minute break
    pub driving_since_break_hours: f64,
    /// On-duty total in the rolling 7/8-day cycle
    pub cycle_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestKind {
    /// 30-minute interruption of driving
    Break,
    /// 10 consecutive hours off duty
    OffDutyReset,
    /// 10 hours in the sleeper berth
    SleeperReset,
    /// 34-hour cycle restart
    Restart,
}

impl RestKind {
    pub fn label(&self) -> &'static str {
        match self {
            RestKind::Break => "30-minute break",
            RestKind::OffDutyReset => "10-hour off-duty reset",
            RestKind::SleeperReset => "10-hour sleeper-berth reset",
            RestKind::Restart => "34-hour restart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestStop {
    pub kind: RestKind,
    pub duration_hours: f64,
    /// Trip clock when the stop begins
    pub at_elapsed_hours: f64,
    pub at_driven_hours: f64,
    pub at_mile: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutySegment {
    pub status: DutyStatus,
    pub start_hours: f64,
    pub duration_hours: f64,
    #[serde(default)]
    pub miles: f64,
}

impl DutySegment {
    pub fn end_hours(&self) -> f64 {
        self.start_hours + self.duration_hours
    }
}

/// Result of simulating one trip against the duty rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripHosValidation {
    pub feasible: bool,
    pub distance_miles: f64,
    pub average_speed_mph: f64,
    pub total_driving_hours: f64,
    pub total_on_duty_hours: f64,
    pub total_elapsed_hours: f64,
    /// Calendar days touched by the trip, counting the start day
    pub days: u32,
    pub rest_stops: Vec<RestStop>,
    pub timeline: Vec<DutySegment>,
    pub final_status: HosStatus,
    #[serde(default)]
    pub infeasible_reason: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl TripHosValidation {
    pub fn stop_count(&self, kind: RestKind) -> usize {
        self.rest_stops.iter().filter(|s| s.kind == kind).count()
    }
}

/// HOS result attached to one planned load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadHos {
    pub load_id: String,
    pub route_id: String,
    pub validation: TripHosValidation,
}
