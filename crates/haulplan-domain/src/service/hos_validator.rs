//! Hours-of-service trip simulation
//!
//! Driving time is consumed greedily. Whenever the next hour of driving would
//! break a rule, the matching rest is taken first: a 30-minute break after 8
//! driving hours, a 10-hour reset when the 11-hour or 14-hour limit is reached,
//! and a 34-hour restart when the cycle is exhausted (if the policy allows it).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::federal::{
    HOS_BREAK_AFTER_DRIVING_HOURS, HOS_BREAK_HOURS, HOS_DUTY_WINDOW_HOURS, HOS_MAX_DRIVING_HOURS,
    HOS_RESET_HOURS, HOS_RESTART_HOURS,
};
use crate::model::{DutySegment, DutyStatus, HosStatus, RestKind, RestStop, TripHosValidation};

const EPS: f64 = 1e-9;
const MAX_STEPS: usize = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HosCycle {
    #[serde(rename = "60/7")]
    SixtyHourSevenDay,
    #[default]
    #[serde(rename = "70/8")]
    SeventyHourEightDay,
}

impl HosCycle {
    pub fn limit_hours(&self) -> f64 {
        match self {
            HosCycle::SixtyHourSevenDay => 60.0,
            HosCycle::SeventyHourEightDay => 70.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HosCycle::SixtyHourSevenDay => "60-hour/7-day",
            HosCycle::SeventyHourEightDay => "70-hour/8-day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HosPolicy {
    /// Oversize moves run slower than legal freight
    pub average_speed_mph: f64,
    pub cycle: HosCycle,
    /// Pre-trip inspection at the start of every shift
    pub inspection_hours_per_shift: f64,
    pub restart_allowed: bool,
    pub use_sleeper_berth: bool,
    /// Caps the daily window for daylight-only permits
    pub daylight_driving_hours: Option<f64>,
}

impl Default for HosPolicy {
    fn default() -> Self {
        Self {
            average_speed_mph: 45.0,
            cycle: HosCycle::default(),
            inspection_hours_per_shift: 0.5,
            restart_allowed: false,
            use_sleeper_berth: false,
            daylight_driving_hours: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripHosInput {
    pub distance_miles: f64,
    /// Provider drive time; derived from distance and speed when absent
    #[serde(default)]
    pub drive_hours: Option<f64>,
    /// Overrides the policy speed
    #[serde(default)]
    pub average_speed_mph: Option<f64>,
    /// Clock carried in from earlier duty
    #[serde(default)]
    pub start_status: HosStatus,
    #[serde(default = "default_start_hour")]
    pub start_hour_of_day: f64,
}

fn default_start_hour() -> f64 {
    6.0
}

impl TripHosInput {
    pub fn new(distance_miles: f64) -> Self {
        Self {
            distance_miles,
            drive_hours: None,
            average_speed_mph: None,
            start_status: HosStatus::default(),
            start_hour_of_day: default_start_hour(),
        }
    }

    pub fn with_speed(mut self, mph: f64) -> Self {
        self.average_speed_mph = Some(mph);
        self
    }

    pub fn with_drive_hours(mut self, hours: f64) -> Self {
        self.drive_hours = Some(hours);
        self
    }

    pub fn with_start_status(mut self, status: HosStatus) -> Self {
        self.start_status = status;
        self
    }
}

struct Simulation {
    speed: f64,
    clock: HosStatus,
    elapsed: f64,
    driven: f64,
    on_duty: f64,
    shift_open: bool,
    rest_stops: Vec<RestStop>,
    timeline: Vec<DutySegment>,
}

impl Simulation {
    fn push(&mut self, status: DutyStatus, hours: f64, miles: f64) {
        self.timeline.push(DutySegment {
            status,
            start_hours: self.elapsed,
            duration_hours: hours,
            miles,
        });
        self.elapsed += hours;
    }

    fn rest(&mut self, kind: RestKind, hours: f64, reason: String) {
        debug!(kind = kind.label(), at = self.elapsed, "rest inserted");
        self.rest_stops.push(RestStop {
            kind,
            duration_hours: hours,
            at_elapsed_hours: self.elapsed,
            at_driven_hours: self.driven,
            at_mile: self.driven * self.speed,
            reason,
        });
        let status = if kind == RestKind::SleeperReset {
            DutyStatus::SleeperBerth
        } else {
            DutyStatus::OffDuty
        };
        self.push(status, hours, 0.0);
        match kind {
            RestKind::Break => {
                self.clock.driving_since_break_hours = 0.0;
                self.clock.window_hours += hours;
            }
            RestKind::OffDutyReset | RestKind::SleeperReset => self.end_shift(),
            RestKind::Restart => {
                self.end_shift();
                self.clock.cycle_hours = 0.0;
            }
        }
    }

    fn end_shift(&mut self) {
        self.clock.driving_hours = 0.0;
        self.clock.window_hours = 0.0;
        self.clock.driving_since_break_hours = 0.0;
        self.shift_open = false;
    }

    fn on_duty_work(&mut self, hours: f64) {
        if hours <= 0.0 {
            return;
        }
        self.push(DutyStatus::OnDutyNotDriving, hours, 0.0);
        self.clock.window_hours += hours;
        self.clock.cycle_hours += hours;
        self.on_duty += hours;
    }

    fn drive(&mut self, hours: f64) {
        self.push(DutyStatus::Driving, hours, hours * self.speed);
        self.clock.driving_hours += hours;
        self.clock.window_hours += hours;
        self.clock.driving_since_break_hours += hours;
        self.clock.cycle_hours += hours;
        self.driven += hours;
        self.on_duty += hours;
    }
}

fn infeasible(distance_miles: f64, speed: f64, reason: String) -> TripHosValidation {
    TripHosValidation {
        feasible: false,
        distance_miles,
        average_speed_mph: speed,
        total_driving_hours: 0.0,
        total_on_duty_hours: 0.0,
        total_elapsed_hours: 0.0,
        days: 0,
        rest_stops: Vec::new(),
        timeline: Vec::new(),
        final_status: HosStatus::default(),
        infeasible_reason: Some(reason),
        warnings: Vec::new(),
    }
}

pub fn validate_trip_hos(input: &TripHosInput, policy: &HosPolicy) -> TripHosValidation {
    let distance = input.distance_miles;
    if !distance.is_finite() || distance < 0.0 {
        return infeasible(distance, 0.0, format!("Trip distance {} is not a valid mileage", distance));
    }

    let (speed, drive_total) = match input.drive_hours {
        Some(hours) if hours.is_finite() && hours > 0.0 && distance > 0.0 => (distance / hours, hours),
        _ => {
            let speed = input.average_speed_mph.unwrap_or(policy.average_speed_mph);
            if !speed.is_finite() || speed <= 0.0 {
                return infeasible(distance, speed, "Average speed must be positive".to_string());
            }
            (speed, distance / speed)
        }
    };

    let window_limit = policy
        .daylight_driving_hours
        .map_or(HOS_DUTY_WINDOW_HOURS, |d| d.min(HOS_DUTY_WINDOW_HOURS));
    let cycle_limit = policy.cycle.limit_hours();
    let reset_kind = if policy.use_sleeper_berth {
        RestKind::SleeperReset
    } else {
        RestKind::OffDutyReset
    };
    if window_limit <= policy.inspection_hours_per_shift + EPS {
        return infeasible(distance, speed, "Daily window leaves no time to drive".to_string());
    }

    let mut sim = Simulation {
        speed,
        clock: input.start_status,
        elapsed: 0.0,
        driven: 0.0,
        on_duty: 0.0,
        shift_open: input.start_status.window_hours > 0.0,
        rest_stops: Vec::new(),
        timeline: Vec::new(),
    };
    let mut warnings = Vec::new();
    let mut infeasible_reason = None;
    let mut remaining = drive_total;

    if drive_total <= EPS {
        warnings.push("No driving required for this trip".to_string());
    }

    let mut steps = 0;
    while remaining > EPS {
        steps += 1;
        if steps > MAX_STEPS {
            infeasible_reason = Some("Duty simulation did not converge".to_string());
            break;
        }

        let start_cost = if sim.shift_open { 0.0 } else { policy.inspection_hours_per_shift };
        if cycle_limit - sim.clock.cycle_hours - start_cost <= EPS {
            if policy.restart_allowed {
                sim.rest(
                    RestKind::Restart,
                    HOS_RESTART_HOURS,
                    format!("{} limit reached", policy.cycle.label()),
                );
                continue;
            }
            infeasible_reason = Some(format!(
                "{} limit reached after {:.1} driving hours with {:.1} hours still to drive; a 34-hour restart is required",
                policy.cycle.label(),
                sim.driven,
                remaining
            ));
            break;
        }

        if !sim.shift_open {
            sim.shift_open = true;
            sim.on_duty_work(policy.inspection_hours_per_shift);
            continue;
        }

        let by_driving = HOS_MAX_DRIVING_HOURS - sim.clock.driving_hours;
        let by_window = window_limit - sim.clock.window_hours;
        if by_driving <= EPS || by_window <= EPS {
            let reason = if by_driving <= EPS {
                "11-hour driving limit reached"
            } else if policy.daylight_driving_hours.is_some() {
                "Daylight travel window closed"
            } else {
                "14-hour duty window closed"
            };
            sim.rest(reset_kind, HOS_RESET_HOURS, reason.to_string());
            continue;
        }

        let by_break = HOS_BREAK_AFTER_DRIVING_HOURS - sim.clock.driving_since_break_hours;
        if by_break <= EPS {
            if by_window - HOS_BREAK_HOURS <= EPS {
                sim.rest(reset_kind, HOS_RESET_HOURS, "Duty window too short for a break".to_string());
            } else {
                sim.rest(
                    RestKind::Break,
                    HOS_BREAK_HOURS,
                    "8 cumulative driving hours without a break".to_string(),
                );
            }
            continue;
        }

        let by_cycle = cycle_limit - sim.clock.cycle_hours;
        let chunk = remaining.min(by_driving).min(by_window).min(by_break).min(by_cycle);
        sim.drive(chunk);
        remaining -= chunk;
    }

    if let Some(reason) = &infeasible_reason {
        warn!(distance, reason = %reason, "trip violates hours of service");
    }

    let end_clock = input.start_hour_of_day + sim.elapsed;
    let days = ((end_clock - EPS).max(0.0) / 24.0).floor() as u32 + 1;

    TripHosValidation {
        feasible: infeasible_reason.is_none(),
        distance_miles: distance,
        average_speed_mph: speed,
        total_driving_hours: sim.driven,
        total_on_duty_hours: sim.on_duty,
        total_elapsed_hours: sim.elapsed,
        days,
        rest_stops: sim.rest_stops,
        timeline: sim.timeline,
        final_status: sim.clock,
        infeasible_reason,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_single_shift_needs_one_break() {
        // 11 hours at 45 mph
        let result = validate_trip_hos(&TripHosInput::new(495.0), &HosPolicy::default());
        assert!(result.feasible);
        assert_eq!(result.stop_count(RestKind::Break), 1);
        assert_eq!(result.stop_count(RestKind::OffDutyReset), 0);
        assert!(close(result.rest_stops[0].at_driven_hours, 8.0));
        assert!(close(result.rest_stops[0].at_mile, 360.0));
        assert!(close(result.total_elapsed_hours, 12.0));
        assert_eq!(result.days, 1);
    }

    #[test]
    fn test_two_day_trip_inserts_reset() {
        // 20 driving hours
        let result = validate_trip_hos(&TripHosInput::new(900.0), &HosPolicy::default());
        assert!(result.feasible);
        let kinds: Vec<RestKind> = result.rest_stops.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![RestKind::Break, RestKind::OffDutyReset, RestKind::Break]);
        assert!(close(result.total_driving_hours, 20.0));
        assert!(close(result.total_on_duty_hours, 21.0));
        assert!(close(result.total_elapsed_hours, 32.0));
        assert_eq!(result.days, 2);
        let reset = &result.rest_stops[1];
        assert!(close(reset.at_driven_hours, 11.0));
        assert!(close(reset.at_elapsed_hours, 12.0));
    }

    #[test]
    fn test_no_shift_exceeds_limits() {
        let result = validate_trip_hos(&TripHosInput::new(2_000.0), &HosPolicy::default());
        assert!(result.feasible);
        let mut driving = 0.0;
        let mut window = 0.0;
        for seg in &result.timeline {
            match seg.status {
                DutyStatus::OffDuty if seg.duration_hours >= HOS_RESET_HOURS => {
                    driving = 0.0;
                    window = 0.0;
                }
                DutyStatus::Driving => {
                    driving += seg.duration_hours;
                    window += seg.duration_hours;
                }
                _ => window += seg.duration_hours,
            }
            assert!(driving <= HOS_MAX_DRIVING_HOURS + 1e-6);
            assert!(window <= HOS_DUTY_WINDOW_HOURS + 1e-6);
        }
    }

    #[test]
    fn test_cycle_exhaustion_infeasible_without_restart() {
        let input = TripHosInput::new(450.0).with_start_status(HosStatus {
            cycle_hours: 55.0,
            ..HosStatus::default()
        });
        let policy = HosPolicy {
            cycle: HosCycle::SixtyHourSevenDay,
            ..HosPolicy::default()
        };
        let result = validate_trip_hos(&input, &policy);
        assert!(!result.feasible);
        assert!(result.infeasible_reason.unwrap().contains("60-hour/7-day"));
        assert!(close(result.total_driving_hours, 4.5));
    }

    #[test]
    fn test_cycle_restart_when_allowed() {
        let input = TripHosInput::new(450.0).with_start_status(HosStatus {
            cycle_hours: 55.0,
            ..HosStatus::default()
        });
        let policy = HosPolicy {
            cycle: HosCycle::SixtyHourSevenDay,
            restart_allowed: true,
            ..HosPolicy::default()
        };
        let result = validate_trip_hos(&input, &policy);
        assert!(result.feasible);
        assert_eq!(result.stop_count(RestKind::Restart), 1);
        assert!(close(result.total_driving_hours, 10.0));
    }

    #[test]
    fn test_daylight_window_and_sleeper() {
        let policy = HosPolicy {
            daylight_driving_hours: Some(10.0),
            use_sleeper_berth: true,
            ..HosPolicy::default()
        };
        let result = validate_trip_hos(&TripHosInput::new(495.0), &policy);
        assert!(result.feasible);
        assert_eq!(result.stop_count(RestKind::SleeperReset), 1);
        assert!(result.rest_stops[1].reason.contains("Daylight"));
        assert!(result.timeline.iter().any(|s| s.status == DutyStatus::SleeperBerth));
    }

    #[test]
    fn test_provider_drive_time_sets_speed() {
        let result = validate_trip_hos(&TripHosInput::new(400.0).with_drive_hours(10.0), &HosPolicy::default());
        assert!(close(result.average_speed_mph, 40.0));
        assert!(close(result.total_driving_hours, 10.0));
    }

    #[test]
    fn test_invalid_speed_is_infeasible() {
        let result = validate_trip_hos(&TripHosInput::new(100.0).with_speed(0.0), &HosPolicy::default());
        assert!(!result.feasible);
        assert!(result.infeasible_reason.is_some());
    }
}
