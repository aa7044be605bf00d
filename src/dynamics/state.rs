use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Scene constants
// ---------------------------------------------------------------------------

pub const GRAVITY: f64 = 9.81; // scene units/s^2, magnitude along +z
pub const EARTH_RADIUS: f64 = 1_000.0; // scene units (planet drawn at (0,0,-R))
pub const ORBIT_RATE: f64 = 0.5; // rad/s

// ---------------------------------------------------------------------------
// Kinematic state of one tracked body
// ---------------------------------------------------------------------------

/// Position and velocity of a body, plus the baseline its closed-form
/// motion is measured from. Frame: x east, y north, z up, origin at the pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub initial_position: Vector3<f64>,
    pub initial_velocity: Vector3<f64>,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl BodyState {
    /// Body sitting at `position` with zero velocity and the same baseline.
    pub fn at_rest(position: Vector3<f64>) -> Self {
        Self {
            initial_position: position,
            initial_velocity: Vector3::zeros(),
            position,
            velocity: Vector3::zeros(),
        }
    }

    /// Replace the baseline with `(position, velocity)` and move the body there.
    pub fn rebaseline(&mut self, position: Vector3<f64>, velocity: Vector3<f64>) {
        self.initial_position = position;
        self.initial_velocity = velocity;
        self.position = position;
        self.velocity = velocity;
    }

    /// Force the body to the rest state at the origin. The baseline is kept.
    pub fn ground(&mut self) {
        self.position = Vector3::zeros();
        self.velocity = Vector3::zeros();
    }

    /// Position along the stack's constant-velocity ascent at time `t`.
    pub fn ascent_position(&self, ascent_velocity: &Vector3<f64>, t: f64) -> Vector3<f64> {
        self.initial_position + ascent_velocity * t
    }

    pub fn altitude(&self) -> f64 {
        self.position.z
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

impl Default for BodyState {
    fn default() -> Self {
        Self::at_rest(Vector3::zeros())
    }
}
