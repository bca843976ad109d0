use anyhow::{bail, Context, Result};
use busline_transit::prelude::*;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod catalog;
mod output;

use catalog::{initial_vehicles, read_catalog};
use output::write_snapshot_geojson;

#[derive(Parser, Debug)]
#[command(
    name = "bus-sim",
    author,
    version,
    about = "Simulate bus positions from a route catalog and timetable",
    long_about = "Loads routes, a 12-hour timetable and a fleet from a JSON catalog, then \
                  moves every bus along its route according to the trip scheduled for the \
                  current time of day.\n\n\
                  With --start the clock is virtual and each tick advances it by \
                  --step-seconds without waiting. Otherwise the local wall clock is used and \
                  ticks are --interval-ms apart."
)]
struct Args {
    /// Catalog JSON file with routes, schedule and vehicles
    #[arg(short, long)]
    catalog: PathBuf,

    /// Start a virtual clock at this time of day, e.g. "8:30 AM"
    #[arg(short, long, value_parser = parse_start)]
    start: Option<u32>,

    /// Virtual seconds per tick (with --start)
    #[arg(long, default_value_t = 60)]
    step_seconds: u32,

    /// Milliseconds between real-time ticks (without --start)
    #[arg(long, default_value_t = 5000)]
    interval_ms: u64,

    /// Number of ticks to run. Defaults to 10 with --start, unlimited otherwise
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Only report vehicles on these routes (repeatable)
    #[arg(short, long = "route")]
    routes: Vec<String>,

    /// Report the next stop and ETA for this vehicle after the run
    #[arg(long)]
    vehicle: Option<String>,

    /// List boarding stops near "lat,lon"
    #[arg(long, value_parser = parse_coordinate)]
    near: Option<Coordinate>,

    /// Search radius in meters for --near
    #[arg(long, default_value_t = 500.0)]
    radius: f64,

    /// Print the timetable before simulating
    #[arg(long)]
    timetable: bool,

    /// Timetable search on route number or name
    #[arg(long)]
    search: Option<String>,

    /// Timetable tab
    #[arg(long, value_enum, default_value_t = Tab::All)]
    tab: Tab,

    /// Output GeoJSON file with routes and final vehicle positions
    #[arg(short, long)]
    geojson: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Tab {
    All,
    Upcoming,
    Delayed,
}

impl From<Tab> for TimetableTab {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::All => TimetableTab::All,
            Tab::Upcoming => TimetableTab::Upcoming,
            Tab::Delayed => TimetableTab::Delayed,
        }
    }
}

fn parse_start(s: &str) -> std::result::Result<u32, String> {
    parse_clock_time(s).ok_or_else(|| format!("expected a time like \"8:30 AM\", got {s:?}"))
}

fn parse_coordinate(s: &str) -> std::result::Result<Coordinate, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got {s:?}"))?;

    let latitude: f64 = lat.trim().parse().map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
    let longitude: f64 = lon.trim().parse().map_err(|e| format!("bad longitude {lon:?}: {e}"))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("coordinate out of range: {s:?}"));
    }
    Ok(Coordinate::new(latitude, longitude))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== Bus Simulator ===");
    log::info!("Catalog: {}", args.catalog.display());

    if !args.catalog.exists() {
        bail!("Catalog file does not exist: {}", args.catalog.display());
    }

    let file = read_catalog(&args.catalog)?;
    let catalog = Arc::new(StaticCatalog::from_data(file.routes, file.schedule));
    let vehicles = initial_vehicles(file.vehicles, &catalog).context("Failed to place vehicles")?;

    log::info!(
        "Loaded {} routes, {} trips, {} vehicles",
        catalog.routes().count(),
        catalog.schedule_index().window_count(),
        vehicles.len()
    );

    if args.timetable {
        print_timetable(&catalog, &args);
    }

    if let Some(point) = args.near {
        print_nearby(&catalog, point, args.radius);
    }

    let route_filter: Vec<RouteIdentifier> = args.routes.iter().map(RouteIdentifier::new).collect();
    let report_vehicles = |report: &TickReport, store: &VehicleStore| {
        log::info!(
            "[{}] {} moved, {} held",
            format_clock_time(report.now_seconds),
            report.updated,
            report.held
        );
        for vehicle in store.snapshot_for_routes(&route_filter) {
            log::info!(
                "  {} on {}: ({:.5}, {:.5}) heading {:.0}° at {:.1} km/h, {}{}",
                vehicle.id,
                vehicle.route_id,
                vehicle.coordinate.latitude,
                vehicle.coordinate.longitude,
                vehicle.heading,
                vehicle.speed_kmh,
                vehicle.occupancy,
                if vehicle.is_active { "" } else { " (parked)" }
            );
        }
    };

    let (simulator, ticks) = match args.start {
        Some(start) => {
            log::info!("Virtual clock from {} in {}s steps", format_clock_time(start), args.step_seconds);
            let clock = Arc::new(ManualClock::new(start));
            let mut simulator = Simulator::new(catalog.clone(), vehicles, clock.clone());
            let mut ticker = SteppedTicker::new(clock, args.step_seconds, args.ticks.unwrap_or(10));
            let ticks = simulator.run(&mut ticker, report_vehicles);
            (simulator, ticks)
        }
        None => {
            log::info!("Wall clock, ticking every {} ms", args.interval_ms);
            let mut simulator = Simulator::new(catalog.clone(), vehicles, Arc::new(SystemClock));
            let mut ticker = IntervalTicker::new(Duration::from_millis(args.interval_ms));
            if let Some(limit) = args.ticks {
                ticker = ticker.with_limit(limit);
            }
            let ticks = simulator.run(&mut ticker, report_vehicles);
            (simulator, ticks)
        }
    };

    log::info!("Ran {} ticks", ticks);

    if let Some(id) = &args.vehicle {
        let id = VehicleIdentifier::new(id);
        let next = simulator
            .next_stop(&id)
            .with_context(|| format!("No next stop for vehicle {id}"))?;
        log::info!("Next stop for {}: {} ({})", id, next.name, next.eta);
    }

    if let Some(path) = &args.geojson {
        write_snapshot_geojson(&catalog, &simulator.store().snapshot(), path)
            .context("Failed to write vehicle GeoJSON")?;
    }

    log::info!("Done!");
    Ok(())
}

fn print_timetable(catalog: &StaticCatalog, args: &Args) {
    let filter = TimetableFilter {
        query: args.search.clone(),
        tab: args.tab.into(),
    };
    let entries = catalog.timetable(&filter);

    log::info!("Timetable ({} entries):", entries.len());
    for entry in entries {
        log::info!(
            "  {:<4} {:<40} {:>8} - {:<8} {:?}",
            entry.route_number,
            entry.route_name,
            entry.departure_time,
            entry.arrival_time,
            entry.status
        );
    }
}

fn print_nearby(catalog: &StaticCatalog, point: Coordinate, radius_m: f64) {
    let nearby = catalog.stops_near(point, radius_m);
    if nearby.is_empty() {
        match catalog.nearest_stop(point) {
            Some(nearest) => log::info!(
                "No stops within {:.0} m; nearest is {} on {} at {:.0} m",
                radius_m,
                nearest.node.stop_id,
                nearest.node.route_id,
                nearest.distance_m
            ),
            None => log::warn!("Catalog has no stops"),
        }
        return;
    }

    log::info!("Stops within {:.0} m:", radius_m);
    for stop in nearby {
        log::info!("  {} on {} at {:.0} m", stop.node.stop_id, stop.node.route_id, stop.distance_m);
    }
}
