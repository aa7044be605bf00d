use std::fmt;

use nalgebra::Vector3;

use crate::dynamics::state::BodyState;
use crate::physics::ballistic::{free_fall, has_landed};

// ---------------------------------------------------------------------------
// Stage identity and phase
// ---------------------------------------------------------------------------

/// The two separable stages of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    First,
    Second,
}

impl StageId {
    pub const ALL: [StageId; 2] = [StageId::First, StageId::Second];

    pub fn label(self) -> &'static str {
        match self {
            StageId::First => "first stage",
            StageId::Second => "second stage",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which kinematic branch governs a stage. Transitions only go forward:
/// Attached -> Falling -> Grounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    /// Riding the stack at the constant ascent velocity.
    Attached,
    /// Released at the separation time, in free fall from its baseline.
    Falling,
    /// Reached the ground. Terminal rest state.
    Grounded,
}

impl StagePhase {
    pub fn is_separated(self) -> bool {
        self != StagePhase::Attached
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StagePhase::Attached => "attached",
            StagePhase::Falling => "falling",
            StagePhase::Grounded => "grounded",
        }
    }
}

/// Transitions fired by a single [`Stage::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageUpdate {
    pub separated: bool,
    pub landed: bool,
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Stage {
    pub id: StageId,
    pub separation_time: f64, // s
    body: BodyState,
    phase: StagePhase,
}

impl Stage {
    pub fn new(id: StageId, separation_time: f64) -> Self {
        Self {
            id,
            separation_time,
            body: BodyState::default(),
            phase: StagePhase::Attached,
        }
    }

    pub fn body(&self) -> &BodyState {
        &self.body
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn is_separated(&self) -> bool {
        self.phase.is_separated()
    }

    /// Evaluate the stage at simulation time `t`.
    ///
    /// The separation latch fires once, the first time `t >= separation_time`.
    /// Its baseline is the attached state at exactly `separation_time`, so
    /// position and velocity are continuous across the boundary whatever the
    /// frame timing. The falling branch is evaluated in the same call.
    pub fn update(
        &mut self,
        t: f64,
        ascent_velocity: &Vector3<f64>,
        gravity: &Vector3<f64>,
    ) -> StageUpdate {
        let mut update = StageUpdate::default();

        if self.phase == StagePhase::Attached {
            if t < self.separation_time {
                self.body.position = self.body.ascent_position(ascent_velocity, t);
                self.body.velocity = *ascent_velocity;
                return update;
            }
            let release = self.body.ascent_position(ascent_velocity, self.separation_time);
            self.body.rebaseline(release, *ascent_velocity);
            self.phase = StagePhase::Falling;
            update.separated = true;
        }

        if self.phase == StagePhase::Falling {
            let elapsed = t - self.separation_time;
            let (position, velocity) = free_fall(
                &self.body.initial_position,
                &self.body.initial_velocity,
                gravity,
                elapsed,
            );
            if has_landed(&position) {
                self.body.ground();
                self.phase = StagePhase::Grounded;
                update.landed = true;
            } else {
                self.body.position = position;
                self.body.velocity = velocity;
            }
        }

        update
    }
}
