//! ed-run — command-line driver for the emergency-dispatch simulation.
//!
//! Loads a `DispatchConfig` (defaults, the high-demand preset, or a JSON
//! file), applies flag overrides, runs to the horizon and prints the run
//! summary.  With `--output` the snapshots and summary are also written as
//! CSV.  Logging goes through `env_logger`; set `RUST_LOG=debug` to follow
//! individual calls.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use ed_core::{DispatchConfig, SimTime};
use ed_model::Snapshot;
use ed_output::{CsvWriter, SimOutputObserver};
use ed_sim::{RunSummary, SimBuilder, SimObserver, StopHandle};

#[derive(Parser)]
#[command(name = "ed-run")]
#[command(about = "Emergency-dispatch call-centre simulation")]
struct Cli {
    /// JSON configuration file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from the high-demand preset instead of the defaults
    #[arg(long, conflicts_with = "config")]
    high_demand: bool,

    /// Simulated time to run for
    #[arg(long)]
    horizon: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    ambulances: Option<usize>,

    #[arg(long)]
    call_takers: Option<usize>,

    /// Secondary triage clinicians
    #[arg(long)]
    stcs: Option<usize>,

    #[arg(long)]
    reassessors: Option<usize>,

    /// Directory for snapshots.csv and summary.csv
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pace snapshots at this many simulated time units per wall-clock second
    #[arg(long)]
    speed: Option<f64>,

    /// Stop the run after this many wall-clock seconds
    #[arg(long)]
    wall_limit_secs: Option<f64>,
}

impl Cli {
    fn load_config(&self) -> Result<DispatchConfig> {
        let mut config = match &self.config {
            Some(path) => DispatchConfig::from_json_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None if self.high_demand => DispatchConfig::high_demand(),
            None => DispatchConfig::default(),
        };
        if let Some(h) = self.horizon {
            config.horizon = h;
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        let staffing = &mut config.staffing;
        if let Some(n) = self.ambulances {
            staffing.ambulances = n;
        }
        if let Some(n) = self.call_takers {
            staffing.call_takers = n;
        }
        if let Some(n) = self.stcs {
            staffing.stcs = n;
        }
        if let Some(n) = self.reassessors {
            staffing.reassessors = n;
        }
        config.validate()?;
        Ok(config)
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Fans snapshots out to the CSV writer and paces them against the wall
/// clock when `--speed` is set.
struct RunObserver {
    output: Option<SimOutputObserver<CsvWriter>>,
    pace:   Option<(Instant, f64)>,
}

impl SimObserver for RunObserver {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        if let Some((start, speed)) = self.pace {
            let due = start + Duration::from_secs_f64(snapshot.at.as_f64() / speed);
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
            info!(
                "{}: intake {} | backlog {} | teal {} | ambulances {}/{} busy",
                snapshot.at,
                snapshot.intake,
                snapshot.dispatch_backlog(),
                snapshot.teal,
                snapshot.ambulances.busy,
                snapshot.ambulances.capacity,
            );
        }
        if let Some(out) = &mut self.output {
            out.on_snapshot(snapshot);
        }
    }

    fn on_sim_end(&mut self, summary: &RunSummary) {
        if let Some(out) = &mut self.output {
            out.on_sim_end(summary);
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Some(speed) = cli.speed {
        if !(speed.is_finite() && speed > 0.0) {
            bail!("--speed must be a positive number, got {speed}");
        }
    }
    let config = cli.load_config()?;
    let horizon = SimTime::new(config.horizon);

    let stop = StopHandle::new();
    if let Some(limit) = cli.wall_limit_secs {
        let stop = stop.clone();
        let limit = Duration::try_from_secs_f64(limit)
            .with_context(|| format!("invalid --wall-limit-secs {limit}"))?;
        std::thread::spawn(move || {
            std::thread::sleep(limit);
            stop.request_stop();
        });
    }

    let output = match &cli.output {
        Some(dir) => Some(SimOutputObserver::new(
            CsvWriter::new(dir).with_context(|| format!("opening output in {}", dir.display()))?,
        )),
        None => None,
    };
    let mut observer = RunObserver {
        output,
        pace: cli.speed.map(|s| (Instant::now(), s)),
    };

    let started = Instant::now();
    let mut sim = SimBuilder::new(config).stop_handle(stop).build()?;
    let summary = sim.run_until(horizon, &mut observer)?;
    info!("finished in {:.2?} wall-clock", started.elapsed());

    if let Some(err) = observer.output.as_mut().and_then(|o| o.take_error()) {
        return Err(err).context("writing output");
    }
    print!("{summary}");
    Ok(())
}
