//! Output formatting module

use chrono::NaiveDate;
use serde::Serialize;

use haulplan_app::ShipmentQuote;
use haulplan_domain::model::{
    CargoEnvelope, RoutePermitSummary, SeasonalCheck, StatePermitData, TripHosValidation,
};
use haulplan_domain::service::TruckRecommendation;
use haulplan_types::{OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_list(title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("\n{}:", title);
    for line in lines {
        println!("  - {}", line);
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

pub fn print_recommendations(
    format: OutputFormat,
    env: &CargoEnvelope,
    recommendations: &[TruckRecommendation],
) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(recommendations);
    }

    println!("\nTrailer Recommendations");
    println!("=======================");
    println!(
        "Cargo: {:.1} x {:.1} x {:.1} ft, {:.0} lbs",
        env.length_ft, env.width_ft, env.height_ft, env.weight_lbs
    );
    if recommendations.is_empty() {
        println!("\nNo catalog trailer can carry this cargo.");
        return Ok(());
    }
    println!();
    println!("{:<4} {:<24} {:<12} {:>6}  {}", "#", "Trailer", "Category", "Score", "Legal");
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:<12} {:>6.1}  {}",
            i + 1,
            rec.trailer.name,
            rec.trailer.category.label(),
            rec.score,
            yes_no(rec.breakdown.fits_legal)
        );
        for reason in &rec.breakdown.permit_reasons {
            println!("{:<4} {}", "", reason);
        }
    }
    Ok(())
}

pub fn print_route_permits(format: OutputFormat, summary: &RoutePermitSummary) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(summary);
    }

    println!("\nRoute Permits");
    println!("=============");
    println!("{:<6} {:>8} {:>10} {:>10} {:>8} {:>12}", "State", "Miles", "Oversize", "Overweight", "Escorts", "Fee");
    for s in &summary.states {
        println!(
            "{:<6} {:>8.0} {:>10} {:>10} {:>8} {:>12}",
            s.state,
            s.distance_miles,
            yes_no(s.oversize_required),
            yes_no(s.overweight_required),
            s.escort.count,
            s.estimated_fee.to_string()
        );
        if s.is_superload {
            println!("       superload: special routing review required");
        }
    }
    println!();
    println!("Permit fees:        {}", summary.total_permit_fees);
    println!(
        "Escort cost:        {} ({} day(s), max {} escort(s){}{})",
        summary.escort_cost.total,
        summary.escort_cost.trip_days,
        summary.max_escort_count,
        if summary.needs_pole_car { ", pole car" } else { "" },
        if summary.needs_police { ", police" } else { "" }
    );
    println!("Total:              {}", summary.total_cost);
    println!("Superload:          {}", yes_no(summary.is_superload));
    println!("Bridge analysis:    {}", yes_no(summary.bridge_analysis_required));

    let restrictions: Vec<String> = summary
        .states
        .iter()
        .flat_map(|s| s.restrictions.iter().map(move |r| format!("{}: {}", s.state, r)))
        .collect();
    print_list("Travel restrictions", &restrictions);

    let mut warnings: Vec<String> = summary
        .states
        .iter()
        .flat_map(|s| s.warnings.iter().map(move |w| format!("{}: {}", s.state, w)))
        .collect();
    warnings.extend(summary.warnings.iter().cloned());
    print_list("Warnings", &warnings);
    Ok(())
}

pub fn print_seasonal(format: OutputFormat, date: NaiveDate, check: &SeasonalCheck) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(check);
    }

    println!("\nSeasonal Restrictions ({})", date);
    println!("==================================");
    if !check.has_restrictions {
        println!("No seasonal restrictions active on this route.");
        return Ok(());
    }
    for a in &check.active {
        println!(
            "{:<4} {:<32} gross {:.0} -> {:.0} lbs",
            a.restriction.state, a.restriction.name, a.legal_gross_lbs, a.adjusted_gross_lbs
        );
    }
    print_list("Warnings", &check.warnings);
    Ok(())
}

pub fn print_hos(format: OutputFormat, validation: &TripHosValidation) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(validation);
    }

    println!("\nHours of Service");
    println!("================");
    println!("Feasible:           {}", yes_no(validation.feasible));
    println!("Distance:           {:.0} mi at {:.0} mph", validation.distance_miles, validation.average_speed_mph);
    println!("Driving:            {:.1} h", validation.total_driving_hours);
    println!("On duty:            {:.1} h", validation.total_on_duty_hours);
    println!("Elapsed:            {:.1} h", validation.total_elapsed_hours);
    println!("Calendar days:      {}", validation.days);
    if let Some(reason) = &validation.infeasible_reason {
        println!("Reason:             {}", reason);
    }

    if !validation.rest_stops.is_empty() {
        println!("\nRest stops:");
        for stop in &validation.rest_stops {
            println!(
                "  {:>7.1} h  mile {:>6.0}  {:<22} {:.1} h  {}",
                stop.at_elapsed_hours,
                stop.at_mile,
                stop.kind.label(),
                stop.duration_hours,
                stop.reason
            );
        }
    }
    print_list("Warnings", &validation.warnings);
    Ok(())
}

pub fn print_state(format: OutputFormat, state: &StatePermitData) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(state);
    }

    let limits = &state.legal_limits;
    println!("\n{} ({})", state.name, state.code);
    println!("{}", "=".repeat(state.name.len() + state.code.len() + 3));
    println!(
        "Legal limits:       {:.1} ft wide, {:.1} ft high, {:.0} ft long",
        limits.max_width_ft, limits.max_height_ft, limits.max_length_ft
    );
    println!(
        "Legal weight:       {:.0} gross, {:.0} single, {:.0} tandem (lbs)",
        limits.weight.gross_lbs, limits.weight.single_axle_lbs, limits.weight.tandem_axle_lbs
    );
    println!("Oversize base fee:  {}", state.oversize.base_fee);
    println!("Overweight base:    {}", state.overweight.base_fee);
    if let Some(rate) = state.overweight.per_mile {
        println!("Per-mile fee:       {}", rate);
    }
    if let Some(rate) = state.overweight.ton_mile {
        println!("Ton-mile fee:       {}", rate);
    }
    if let Some(annual) = &state.oversize.annual {
        println!(
            "Annual permit:      {} (to {:.1} ft wide, {:.1} ft high, {:.0} ft long, {:.0} lbs)",
            annual.fee, annual.max_width_ft, annual.max_height_ft, annual.max_length_ft, annual.max_weight_lbs
        );
    }
    println!(
        "Superload at:       {:.1} ft wide, {:.1} ft high, {:.0} ft long, {:.0} lbs",
        state.superload.width_ft, state.superload.height_ft, state.superload.length_ft, state.superload.weight_lbs
    );
    if let Some(kpra) = state.kpra_limit_ft {
        println!("KPRA limit:         {:.0} ft", kpra);
    }
    println!("Processing time:    {}", state.oversize.processing_time);
    println!("Last verified:      {}", state.last_verified);
    print_list("Travel restrictions", &state.travel.describe());

    let routes: Vec<String> = state
        .restricted_routes
        .iter()
        .map(|r| format!("{}: {}", r.highway, r.notes))
        .collect();
    print_list("Restricted routes", &routes);
    Ok(())
}

pub fn print_state_list(format: OutputFormat, states: &[&StatePermitData]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(states);
    }

    println!("{:<4} {:<22} {:>6} {:>6} {:>6} {:>8} {:>10}", "Code", "Name", "Width", "Height", "Length", "Gross", "OS fee");
    for s in states {
        let l = &s.legal_limits;
        println!(
            "{:<4} {:<22} {:>6.1} {:>6.1} {:>6.0} {:>8.0} {:>10}",
            s.code,
            s.name,
            l.max_width_ft,
            l.max_height_ft,
            l.max_length_ft,
            l.weight.gross_lbs,
            s.oversize.base_fee.to_string()
        );
    }
    Ok(())
}

pub fn print_quote(format: OutputFormat, quote: &ShipmentQuote) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(quote);
    }

    let plan = &quote.plan;
    println!("\nShipment Plan ({})", quote.trip_date);
    println!("==========================");
    println!(
        "Items: {} assigned of {}, {} trailer(s), {:.0} lbs",
        plan.assigned_items,
        plan.total_items,
        plan.trailer_count(),
        plan.total_weight_lbs
    );
    if let Some(analysis) = &quote.route_analysis {
        println!("Recommended route: {}", analysis.shared.recommended_route_id);
        print_list("Route reasoning", &analysis.shared.reasoning);
    }

    for load in &plan.loads {
        println!("\n{} - {}", load.id, load.trailer.name);
        println!(
            "  {} item(s), {:.1} x {:.1} x {:.1} ft overall, {:.0} lbs cargo, legal: {}",
            load.items.len(),
            load.length_ft,
            load.width_ft,
            load.height_ft,
            load.weight_lbs,
            yes_no(load.is_legal)
        );
        if let Some(routing) = quote.routing.iter().find(|r| r.load_id == load.id) {
            println!(
                "  Route {}{}: permits {}, escorts {}",
                routing.route_id,
                if routing.diverges { " (diverges)" } else { "" },
                routing.permits.total_permit_fees,
                routing.permits.escort_cost.total
            );
            for conflict in &routing.clearance.conflicts {
                println!(
                    "  Low clearance: {} ({:.2} ft, short by {:.2} ft)",
                    conflict.bridge.description, conflict.bridge.clearance_ft, conflict.shortfall_ft
                );
            }
            if routing.seasonal.has_restrictions {
                println!("  Seasonal restrictions active ({})", routing.seasonal.active.len());
            }
        }
        if let Some(cost) = plan.cost.as_ref().and_then(|c| c.loads.iter().find(|l| l.load_id == load.id)) {
            println!(
                "  Cost {}: trailer {} ({} day(s)), fuel {}",
                cost.total, cost.trailer_cost, cost.trip_days, cost.fuel_cost
            );
        }
        if let Some(hos) = plan.hos.as_ref().and_then(|h| h.iter().find(|h| h.load_id == load.id)) {
            println!(
                "  HOS: {} ({:.1} h driving, {} day(s))",
                if hos.validation.feasible { "feasible" } else { "infeasible" },
                hos.validation.total_driving_hours,
                hos.validation.days
            );
        }
        for w in &load.warnings {
            println!("  ! {}", w);
        }
    }

    if !plan.unassigned_items.is_empty() {
        println!("\nUnassigned:");
        for u in &plan.unassigned_items {
            println!("  - {}: {}", u.item.label(), u.reason);
        }
    }

    if let Some(cost) = &plan.cost {
        println!();
        println!("Total cost:         {}", cost.total_cost);
        println!("Per item:           {}", cost.average_cost_per_item);
    }

    let mut warnings = plan.warnings.clone();
    warnings.extend(quote.warnings.iter().cloned());
    print_list("Warnings", &warnings);
    Ok(())
}
