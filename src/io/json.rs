use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::TimelineConfig;
use crate::orbital::CircularOrbit;
use crate::sim::event::{first_time, EventKind, SimEvent};
use crate::sim::timeline::Snapshot;
use crate::vehicle::StageId;

/// Summary statistics computed from a recorded run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlightSummary {
    pub timeline: TimelineConfig,
    pub duration_s: f64,
    pub frames: usize,
    pub stages: Vec<StageSummary>,
    pub payload_max_altitude: f64,
    pub orbit: Option<OrbitSummary>,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StageSummary {
    pub stage: String,
    pub separation_time_s: Option<f64>,
    pub separation_altitude: Option<f64>,
    pub max_altitude: f64,
    pub touchdown_time_s: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrbitSummary {
    pub insertion_time_s: f64,
    pub radius: f64,
    pub period_s: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventRecord {
    pub time_s: f64,
    pub event: String,
    pub position: [f64; 3],
}

impl FlightSummary {
    /// Compute the summary from a run's frames and events.
    pub fn from_run(config: &TimelineConfig, frames: &[Snapshot], events: &[SimEvent]) -> Self {
        let stages = StageId::ALL
            .iter()
            .map(|&id| {
                let separation = events
                    .iter()
                    .find(|e| e.kind == EventKind::Separation { stage: id });
                StageSummary {
                    stage: id.to_string(),
                    separation_time_s: separation.map(|e| e.time),
                    separation_altitude: separation.map(|e| e.position.z),
                    max_altitude: frames
                        .iter()
                        .map(|s| s.stage(id).0.position.z)
                        .fold(0.0_f64, f64::max),
                    touchdown_time_s: first_time(events, |k| *k == EventKind::Touchdown { stage: id }),
                }
            })
            .collect();

        let orbit = events.iter().find_map(|e| match e.kind {
            EventKind::OrbitInsertion { radius } => {
                let circle = CircularOrbit::capture(
                    e.position.z,
                    0.0,
                    config.earth_radius,
                    config.orbit_rate,
                    config.orbit_start_time,
                );
                Some(OrbitSummary {
                    insertion_time_s: e.time,
                    radius,
                    period_s: circle.period(),
                })
            }
            _ => None,
        });

        FlightSummary {
            timeline: config.clone(),
            duration_s: frames.last().map_or(0.0, |s| s.time),
            frames: frames.len(),
            stages,
            payload_max_altitude: frames
                .iter()
                .map(|s| s.payload.position.z)
                .fold(0.0_f64, f64::max),
            orbit,
            events: events
                .iter()
                .map(|e| EventRecord {
                    time_s: e.time,
                    event: e.kind.to_string(),
                    position: e.position.into(),
                })
                .collect(),
        }
    }
}

/// Write the flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write the flight summary JSON to a file.
pub fn write_summary_file(path: &Path, summary: &FlightSummary) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_summary(&mut file, summary)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::runner::{simulate, RunConfig};
    use approx::assert_relative_eq;

    fn default_summary() -> FlightSummary {
        let config = TimelineConfig::default();
        let (frames, events) = simulate(&config, &RunConfig::default());
        FlightSummary::from_run(&config, &frames, &events)
    }

    #[test]
    fn summary_records_stage_history() {
        let s = default_summary();
        assert_eq!(s.stages.len(), 2);
        let first = &s.stages[0];
        assert_eq!(first.stage, "first stage");
        assert_eq!(first.separation_altitude, Some(50.0));
        assert!(first.max_altitude > 50.0 && first.max_altitude < 52.0);
        assert!(first.touchdown_time_s.unwrap() > 13.0);
    }

    #[test]
    fn summary_records_orbit() {
        let s = default_summary();
        let orbit = s.orbit.expect("default run reaches orbit");
        assert_eq!(orbit.radius, 1100.0);
        assert_relative_eq!(orbit.period_s, 4.0 * std::f64::consts::PI, epsilon = 1e-12);
        assert_relative_eq!(s.payload_max_altitude, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn json_output_is_valid() {
        let summary = default_summary();
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["orbit"]["radius"], 1100.0);
        assert_eq!(value["events"].as_array().unwrap().len(), 5);
        assert_eq!(value["timeline"]["first_separation_time"], 10.0);
    }

    #[test]
    fn no_orbit_for_short_run() {
        let config = TimelineConfig::default();
        let (frames, events) = simulate(&config, &RunConfig { dt: 0.1, duration: 5.0 });
        let s = FlightSummary::from_run(&config, &frames, &events);
        assert!(s.orbit.is_none());
        assert!(s.stages.iter().all(|st| st.separation_time_s.is_none()));
    }
}
