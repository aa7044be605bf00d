use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rocket_launch::config::Config;
use rocket_launch::io::{csv, json};
use rocket_launch::logging::init_logging;
use rocket_launch::sim::{simulate, FlightPhase, RunConfig, Snapshot};
use rocket_launch::vehicle::StageId;

/// Headless run of the launch timeline.
#[derive(Debug, Parser)]
#[command(name = "rocket-launch", version, about)]
struct Args {
    /// RON configuration file; defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Last frame time, s.
    #[arg(long, default_value_t = 30.0)]
    duration: f64,

    /// Frame step, s.
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// Write every frame to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the flight summary to this JSON file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Tracing filter, overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective configuration to this file and exit.
    #[arg(long)]
    write_config: Option<PathBuf>,
}

/// Fold command-line flags over the loaded configuration.
fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(level) = &args.log_level {
        config.debug.log_level = level.clone();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    apply_cli_overrides(&mut config, &args);
    init_logging(&config.debug.log_level);

    if let Some(path) = &args.write_config {
        config
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        return Ok(());
    }

    if !(args.dt > 0.0 && args.dt.is_finite()) {
        anyhow::bail!("--dt must be a positive number, got {}", args.dt);
    }
    if !(args.duration >= 0.0 && args.duration.is_finite()) {
        anyhow::bail!("--duration must be non-negative, got {}", args.duration);
    }

    let timeline = &config.timeline;
    let run = RunConfig { dt: args.dt, duration: args.duration };

    // -----------------------------------------------------------------------
    // Run
    // -----------------------------------------------------------------------
    let (frames, events) = simulate(timeline, &run);
    let summary = json::FlightSummary::from_run(timeline, &frames, &events);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  ROCKET LAUNCH TIMELINE");
    println!("====================================================================");
    println!();
    println!("  Timeline Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  1st separation: {:>7.1} s    2nd separation: {:>7.1} s",
        timeline.first_separation_time, timeline.second_separation_time
    );
    println!(
        "  Orbit start:    {:>7.1} s    Orbit rate:     {:>7.3} rad/s",
        timeline.orbit_start_time, timeline.orbit_rate
    );
    println!(
        "  Ascent speed:   {:>7.2}      Gravity:        {:>7.2}",
        timeline.ascent_velocity().norm(),
        timeline.gravity().norm()
    );
    println!("  Earth radius:   {:>7.0}", timeline.earth_radius);
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if events.is_empty() {
        println!("  (none before t={:.1}s)", run.duration);
    }
    for e in &events {
        println!(
            "  t={:>7.2}s   {:<28}  alt={:>8.2}",
            e.time,
            e.kind.to_string(),
            e.position.z
        );
    }
    println!();

    println!("  Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    for stage in &summary.stages {
        let touchdown = stage
            .touchdown_time_s
            .map_or_else(|| "-".to_string(), |t| format!("{t:.2} s"));
        println!(
            "  {:<13} max alt {:>8.2}   touchdown {:>9}",
            stage.stage, stage.max_altitude, touchdown
        );
    }
    println!("  Payload       max alt {:>8.2}", summary.payload_max_altitude);
    if let Some(orbit) = &summary.orbit {
        println!(
            "  Orbit         radius  {:>8.1}   period    {:>7.2} s",
            orbit.radius, orbit.period_s
        );
    }
    println!();

    // -----------------------------------------------------------------------
    // Frame table (sampled)
    // -----------------------------------------------------------------------
    println!("  Frames");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>9}  {:>9}  {:>7}",
        "t (s)", "first z", "second z", "payload z", "sat z", "thrust"
    );
    println!("  {}", "─".repeat(60));

    let sample_interval = (frames.len() / 30).max(1);
    for (i, s) in frames.iter().enumerate() {
        let print = i % sample_interval == 0
            || i == frames.len() - 1
            || events.iter().any(|e| (e.time - s.time).abs() < run.dt * 0.5);
        if print {
            print_frame(s);
        }
    }

    println!();
    println!("  Run: {} frames, dt={} s", frames.len(), run.dt);
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------
    if let Some(path) = &args.csv {
        csv::write_frames_file(path, &frames)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = frames.len(), "Wrote CSV");
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &summary)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote JSON summary");
    }

    Ok(())
}

fn print_frame(s: &Snapshot) {
    let stage_z = |id: StageId| s.stage(id).0.position.z;
    let sat = match s.phase {
        FlightPhase::Ascent => "-".to_string(),
        FlightPhase::Orbit => format!("{:.1}", s.satellite.position.z),
    };
    println!(
        "  {:>7.2}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}  {:>7}",
        s.time,
        stage_z(StageId::First),
        stage_z(StageId::Second),
        s.payload.position.z,
        sat,
        s.thrust.map_or("-", |t| t.as_str()),
    );
}
