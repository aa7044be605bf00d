use nalgebra::Vector3;
use tracing::{info, warn};

use crate::config::TimelineConfig;
use crate::dynamics::state::BodyState;
use crate::orbital::{CircularOrbit, OrbitState};
use crate::physics::ballistic::time_to_ground;
use crate::vehicle::{Stage, StageId, StagePhase, ThrustSource};

use super::event::{EventKind, SimEvent};

// ---------------------------------------------------------------------------
// Per-frame output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Ascent,
    Orbit,
}

impl FlightPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            FlightPhase::Ascent => "ascent",
            FlightPhase::Orbit => "orbit",
        }
    }
}

/// Read-only view of the timeline after an `advance` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub time: f64,
    pub phase: FlightPhase,
    pub first_stage: BodyState,
    pub first_stage_phase: StagePhase,
    pub second_stage: BodyState,
    pub second_stage_phase: StagePhase,
    pub payload: BodyState,
    pub satellite: BodyState,
    /// Body carrying the exhaust plume; `None` once orbiting.
    pub thrust: Option<ThrustSource>,
    pub orbit: Option<OrbitState>,
}

impl Snapshot {
    pub fn stage(&self, id: StageId) -> (&BodyState, StagePhase) {
        match id {
            StageId::First => (&self.first_stage, self.first_stage_phase),
            StageId::Second => (&self.second_stage, self.second_stage_phase),
        }
    }

    /// Position of the body the thrust plume belongs to.
    pub fn thrust_body(&self) -> Option<&BodyState> {
        self.thrust.map(|source| match source {
            ThrustSource::FirstStage => &self.first_stage,
            ThrustSource::SecondStage => &self.second_stage,
            ThrustSource::Payload => &self.payload,
        })
    }
}

// ---------------------------------------------------------------------------
// Flight timeline evaluator
// ---------------------------------------------------------------------------

/// Stateful step function over simulation time.
///
/// Feed it a non-decreasing time once per frame. Stage separations, ground
/// contact and the orbit insertion are one-shot transitions; feeding an
/// earlier time never undoes them.
#[derive(Debug, Clone)]
pub struct FlightTimeline {
    config: TimelineConfig,
    gravity: Vector3<f64>,
    ascent_velocity: Vector3<f64>,
    first: Stage,
    second: Stage,
    payload: BodyState,
    satellite: BodyState,
    orbit: Option<CircularOrbit>,
    time: f64,
    last_time: Option<f64>,
}

impl FlightTimeline {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            gravity: config.gravity(),
            ascent_velocity: config.ascent_velocity(),
            first: Stage::new(StageId::First, config.first_separation_time),
            second: Stage::new(StageId::Second, config.second_separation_time),
            payload: BodyState::default(),
            satellite: BodyState::default(),
            orbit: None,
            time: 0.0,
            last_time: None,
            config,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn stage(&self, id: StageId) -> &Stage {
        match id {
            StageId::First => &self.first,
            StageId::Second => &self.second,
        }
    }

    pub fn payload(&self) -> &BodyState {
        &self.payload
    }

    pub fn satellite(&self) -> &BodyState {
        &self.satellite
    }

    pub fn orbit(&self) -> Option<&CircularOrbit> {
        self.orbit.as_ref()
    }

    pub fn phase(&self) -> FlightPhase {
        if self.orbit.is_some() {
            FlightPhase::Orbit
        } else {
            FlightPhase::Ascent
        }
    }

    pub fn thrust_source(&self) -> Option<ThrustSource> {
        match self.phase() {
            FlightPhase::Ascent => Some(ThrustSource::from_flags(
                self.first.is_separated(),
                self.second.is_separated(),
            )),
            FlightPhase::Orbit => None,
        }
    }

    /// Evaluate every body at time `t`. Returns the transitions fired.
    pub fn advance(&mut self, t: f64) -> Vec<SimEvent> {
        if let Some(prev) = self.last_time {
            if t < prev {
                warn!(from = prev, to = t, "Simulation time moved backwards");
            }
        }
        self.last_time = Some(t);
        self.time = t;

        let mut events = Vec::new();

        if self.orbit.is_none() && t < self.config.orbit_start_time {
            for stage in [&mut self.first, &mut self.second] {
                update_stage(stage, t, &self.ascent_velocity, &self.gravity, &mut events);
            }
            // The payload stays on the stack for the whole ascent.
            self.payload.position = self.payload.ascent_position(&self.ascent_velocity, t);
            self.payload.velocity = self.ascent_velocity;
        } else {
            let captured = self.orbit;
            let orbit = match captured {
                Some(orbit) => orbit,
                None => self.enter_orbit(t, &mut events),
            };
            self.satellite.position = orbit.position_at(t);
            self.satellite.velocity = orbit.velocity_at(t);
        }

        events
    }

    /// Ascent -> orbit transition. Captures the radius from the payload at
    /// exactly `orbit_start_time`; the satellite keeps its own y. Runs once
    /// per timeline.
    fn enter_orbit(&mut self, t: f64, events: &mut Vec<SimEvent>) -> CircularOrbit {
        let start = self.config.orbit_start_time;
        self.payload.position = self.payload.ascent_position(&self.ascent_velocity, start);
        self.payload.velocity = self.ascent_velocity;

        let orbit = CircularOrbit::capture(
            self.payload.position.z,
            self.satellite.position.y,
            self.config.earth_radius,
            self.config.orbit_rate,
            start,
        );
        self.satellite.rebaseline(orbit.anchor(), orbit.velocity_at(start));
        self.orbit = Some(orbit);

        info!(
            time = t,
            radius = orbit.radius,
            altitude = self.payload.position.z,
            "Orbit insertion"
        );
        events.push(SimEvent {
            time: t,
            kind: EventKind::OrbitInsertion { radius: orbit.radius },
            position: self.payload.position,
        });
        orbit
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            phase: self.phase(),
            first_stage: *self.first.body(),
            first_stage_phase: self.first.phase(),
            second_stage: *self.second.body(),
            second_stage_phase: self.second.phase(),
            payload: self.payload,
            satellite: self.satellite,
            thrust: self.thrust_source(),
            orbit: self.orbit.map(|o| o.state_at(self.time)),
        }
    }
}

fn update_stage(
    stage: &mut Stage,
    t: f64,
    ascent_velocity: &Vector3<f64>,
    gravity: &Vector3<f64>,
    events: &mut Vec<SimEvent>,
) {
    let update = stage.update(t, ascent_velocity, gravity);
    let body = stage.body();

    if update.separated {
        let landing_in = time_to_ground(&body.initial_position, &body.initial_velocity, gravity);
        info!(
            stage = %stage.id,
            time = t,
            altitude = body.initial_position.z,
            predicted_touchdown = landing_in.map(|dt| stage.separation_time + dt),
            "Stage separation"
        );
        events.push(SimEvent {
            time: t,
            kind: EventKind::Separation { stage: stage.id },
            position: body.initial_position,
        });
    }

    if update.landed {
        info!(stage = %stage.id, time = t, "Stage touchdown");
        events.push(SimEvent {
            time: t,
            kind: EventKind::Touchdown { stage: stage.id },
            position: body.position,
        });
    }
}
