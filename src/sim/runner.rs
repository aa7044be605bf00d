use tracing::info;

use crate::config::TimelineConfig;
use super::event::SimEvent;
use super::timeline::{FlightTimeline, Snapshot};

// ---------------------------------------------------------------------------
// Fixed-step headless run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dt: f64,       // frame step, s
    pub duration: f64, // last frame time, s
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,        // 100 frames per simulated second
            duration: 30.0,  // past orbit insertion with the default timeline
        }
    }
}

impl RunConfig {
    /// Number of frames including t = 0 and t = duration.
    pub fn frame_count(&self) -> usize {
        if self.dt <= 0.0 || !self.dt.is_finite() || self.duration < 0.0 {
            return 1;
        }
        (self.duration / self.dt).round() as usize + 1
    }

    /// Frame times computed as `i * dt` so they do not drift.
    pub fn frame_time(&self, i: usize) -> f64 {
        i as f64 * self.dt
    }
}

/// Drive a fresh timeline over `run` and collect every frame and event.
pub fn simulate(config: &TimelineConfig, run: &RunConfig) -> (Vec<Snapshot>, Vec<SimEvent>) {
    let mut timeline = FlightTimeline::new(config.clone());
    let frames = run.frame_count();
    let mut snapshots = Vec::with_capacity(frames.min(1_000_000));
    let mut events = Vec::new();

    info!(dt = run.dt, duration = run.duration, frames, "Starting run");
    for i in 0..frames {
        events.extend(timeline.advance(run.frame_time(i)));
        snapshots.push(timeline.snapshot());
    }
    info!(events = events.len(), "Run finished");

    (snapshots, events)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::event::EventKind;
    use crate::sim::timeline::FlightPhase;
    use crate::vehicle::StageId;

    #[test]
    fn frame_count_includes_both_ends() {
        let run = RunConfig { dt: 0.5, duration: 2.0 };
        assert_eq!(run.frame_count(), 5);
        assert_eq!(run.frame_time(4), 2.0);
    }

    #[test]
    fn degenerate_step_yields_single_frame() {
        assert_eq!(RunConfig { dt: 0.0, duration: 10.0 }.frame_count(), 1);
    }

    #[test]
    fn default_run_reaches_orbit() {
        let (frames, events) = simulate(&TimelineConfig::default(), &RunConfig::default());
        assert_eq!(frames.len(), 3001);
        assert_eq!(frames.last().unwrap().phase, FlightPhase::Orbit);
        assert_eq!(events.len(), 5);
        assert!(matches!(events[4].kind, EventKind::OrbitInsertion { .. }));
    }

    #[test]
    fn each_stage_separates_exactly_once() {
        let (_, events) = simulate(&TimelineConfig::default(), &RunConfig::default());
        for id in StageId::ALL {
            let n = events
                .iter()
                .filter(|e| e.kind == EventKind::Separation { stage: id })
                .count();
            assert_eq!(n, 1, "{id} separated {n} times");
        }
    }

    #[test]
    fn frame_times_are_monotonic() {
        let (frames, _) = simulate(&TimelineConfig::default(), &RunConfig { dt: 0.1, duration: 5.0 });
        assert!(frames.windows(2).all(|w| w[1].time > w[0].time));
    }
}
