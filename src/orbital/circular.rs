use nalgebra::{Unit, Vector3};

use super::pivot::rotate_about_pivot;

/// Scripted circular orbit around the planet centre.
///
/// Captured once when the payload enters the orbit phase. The radius is the
/// distance from the planet centre to the payload altitude at that moment
/// and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    pub radius: f64,
    pub pivot: Vector3<f64>,   // planet centre, (0, y, -earth_radius)
    pub axis: Unit<Vector3<f64>>,
    pub rate: f64,             // rad/s
    pub start_time: f64,       // s
}

/// Per-frame view of the orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub radius: f64,
    pub angle: f64,
    pub pivot: Vector3<f64>,
}

impl CircularOrbit {
    /// Capture the orbit at the phase boundary.
    ///
    /// `altitude` is the payload height that fixes the radius; `plane_y` is
    /// the satellite's own y, which the orbit keeps. The orbit lies in the
    /// x-z plane at that y, rotating about +y.
    pub fn capture(
        altitude: f64,
        plane_y: f64,
        earth_radius: f64,
        rate: f64,
        start_time: f64,
    ) -> Self {
        Self {
            radius: altitude + earth_radius,
            pivot: Vector3::new(0.0, plane_y, -earth_radius),
            axis: Vector3::y_axis(),
            rate,
            start_time,
        }
    }

    pub fn angle_at(&self, t: f64) -> f64 {
        self.rate * (t - self.start_time)
    }

    /// Point the orbit starts from: straight above the pivot at `radius`.
    pub fn anchor(&self) -> Vector3<f64> {
        self.pivot + Vector3::new(0.0, 0.0, self.radius)
    }

    /// `(R sin a, y, R cos a - earth_radius)` for the default y axis.
    pub fn position_at(&self, t: f64) -> Vector3<f64> {
        rotate_about_pivot(&self.anchor(), &self.pivot, &self.axis, self.angle_at(t))
    }

    /// Tangential velocity: rate * axis x (p - pivot).
    pub fn velocity_at(&self, t: f64) -> Vector3<f64> {
        let rel = self.position_at(t) - self.pivot;
        self.axis.cross(&rel) * self.rate
    }

    pub fn state_at(&self, t: f64) -> OrbitState {
        OrbitState {
            radius: self.radius,
            angle: self.angle_at(t),
            pivot: self.pivot,
        }
    }

    /// Time for one full revolution. Infinite for a zero rate.
    pub fn period(&self) -> f64 {
        if self.rate == 0.0 {
            f64::INFINITY
        } else {
            std::f64::consts::TAU / self.rate.abs()
        }
    }
}
