//! small: a ten-year run over a four-zone study area.
//!
//! ```text
//! small [CONFIG_JSON] [OUTPUT_DIR] [POPULATION_DIR]
//! ```
//!
//! Without arguments the embedded configuration and population are used and
//! output goes to `output/small`.  `POPULATION_DIR` may point at a
//! `population_<year>` directory written by an earlier run.  Set `RUST_LOG`
//! (e.g. `RUST_LOG=debug`) to change log verbosity.

mod inputs;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lu_core::{DwellingId, RunConfig, Year, ZoneId};
use lu_data::{
    DataContainer, Dwelling, DwellingType, DwellingUsage, PopulationSources, load_population,
    load_population_dir,
};
use lu_models::ControlTotalScaler;
use lu_output::{CsvWriter, ExportWriter, ModelOutputObserver};
use lu_sim::{ModelBuilder, ModelObserver, TimeTracker, YearReport};
use lu_spatial::{DijkstraRouter, load_network};
use lu_travel::{CommuteCongestionModel, NetworkState, NetworkTravelTimes, ZoneSystem};

// ── Observer wrapper to print progress ────────────────────────────────────────

struct Progress<W: ExportWriter> {
    inner:   ModelOutputObserver<W>,
    reports: Vec<YearReport>,
}

impl<W: ExportWriter> Progress<W> {
    fn new(inner: ModelOutputObserver<W>) -> Self {
        Self { inner, reports: Vec::new() }
    }
}

impl<W: ExportWriter> ModelObserver for Progress<W> {
    fn on_setup(&mut self, config: &RunConfig, data: &DataContainer) {
        self.inner.on_setup(config, data);
    }

    fn on_year_start(&mut self, year: Year) {
        self.inner.on_year_start(year);
    }

    fn on_summary(&mut self, year: Year, data: &DataContainer) {
        println!(
            "  summary {year}: {} households, {} persons, {} vacant dwellings",
            data.households.len(),
            data.persons.len(),
            data.dwellings.iter().filter(|d| d.is_vacant()).count(),
        );
        self.inner.on_summary(year, data);
    }

    fn on_year_end(&mut self, report: &YearReport) {
        self.reports.push(report.clone());
        self.inner.on_year_end(report);
    }

    fn on_population_export(&mut self, year: Year, data: &DataContainer) {
        self.inner.on_population_export(year, data);
    }

    fn on_run_end(&mut self, final_year: Year, timers: &TimeTracker) {
        self.inner.on_run_end(final_year, timers);
    }
}

// ── Inputs ────────────────────────────────────────────────────────────────────

fn embedded_population() -> Result<DataContainer> {
    let sources = PopulationSources {
        zones:      Cursor::new(inputs::ZONES_CSV),
        dwellings:  Cursor::new(inputs::DWELLINGS_CSV),
        households: Cursor::new(inputs::HOUSEHOLDS_CSV),
        persons:    Cursor::new(inputs::PERSONS_CSV),
        jobs:       Cursor::new(inputs::JOBS_CSV),
        schools:    None,
    };
    Ok(load_population(sources)?)
}

/// New apartments completed in zone 4.
fn overwrites() -> Vec<(Year, Dwelling)> {
    [11, 12]
        .into_iter()
        .map(|id| {
            let dwelling = Dwelling {
                id:          DwellingId(id),
                zone:        ZoneId(4),
                point:       None,
                household:   None,
                kind:        DwellingType::Mf5plus,
                bedrooms:    2,
                quality:     4,
                price:       940.0,
                restriction: 0.0,
                usage:       DwellingUsage::Default,
                year_built:  2014,
            };
            (Year(2014), dwelling)
        })
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. Configuration.
    let config = match args.first() {
        Some(path) => RunConfig::from_json_path(Path::new(path))
            .with_context(|| format!("reading configuration {path}"))?,
        None => RunConfig::from_json_str(inputs::CONFIG_JSON)?,
    };
    let output_dir = args.get(1).map_or_else(|| PathBuf::from("output/small"), PathBuf::from);

    println!("=== small — land-use microsimulation ===");
    println!(
        "Scenario: {}  |  Years: {}..{}  |  Seed: {}",
        config.scenario_name, config.start_year, config.end_year, config.seed
    );

    // 2. Road network and synthetic population.
    let network = load_network(Cursor::new(inputs::NODES_CSV), Cursor::new(inputs::EDGES_CSV))?;
    println!("Road network: {} nodes, {} edges", network.node_count(), network.edge_count());

    let data = match args.get(2) {
        Some(dir) => load_population_dir(Path::new(dir))
            .with_context(|| format!("loading population from {dir}"))?,
        None => embedded_population()?,
    };
    println!(
        "Population: {} households, {} persons, {} dwellings, {} jobs",
        data.households.len(),
        data.persons.len(),
        data.dwellings.len(),
        data.jobs.len(),
    );

    // 3. Travel times over the zone centroids.
    let t0 = Instant::now();
    let zones = ZoneSystem::from_geography(&data.geography);
    let state = NetworkState::free_flow(Arc::new(network));
    let travel = NetworkTravelTimes::new(zones, state, DijkstraRouter, config.number_of_threads)?;
    info!(secs = t0.elapsed().as_secs_f64(), "initial skims built");

    // 4. Model.
    let targets = inputs::HOUSEHOLD_TARGETS.map(|(year, n)| (Year(year), n));
    let mut builder = ModelBuilder::new(config, data, travel)
        .default_event_models()
        .scaler(Box::new(ControlTotalScaler::new(targets)))
        .transport_model(Box::new(CommuteCongestionModel { capacity_vph: 600.0, ..Default::default() }));
    for (year, dwelling) in overwrites() {
        builder = builder.dwelling_overwrite(year, dwelling);
    }
    let mut model = builder.build()?;

    // 5. Output.
    let writer = CsvWriter::new(&output_dir)?;
    let mut obs = Progress::new(ModelOutputObserver::new(writer));

    // 6. Run.
    let t0 = Instant::now();
    let outcome = model.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 7. Summary.
    println!();
    println!(
        "Run {} in {:.3} s (final state {})",
        if outcome.is_completed() { "completed" } else { "stopped" },
        elapsed.as_secs_f64(),
        outcome.final_year(),
    );
    println!("Output written to {}", output_dir.display());
    println!();
    println!("{:<6} {:>8} {:>8} {:>8} {:>8}", "Year", "Events", "Cars", "AVs", "Issues");
    println!("{}", "-".repeat(42));
    for r in &obs.reports {
        println!(
            "{:<6} {:>8} {:>8} {:>8} {:>8}",
            r.year,
            r.events.total_applied(),
            r.counters.car_changes,
            r.counters.av_switches,
            r.issues.total(),
        );
    }

    Ok(())
}
