//! Camera shots, follow mode, and a turntable camera with perspective projection.

use nalgebra::{Isometry3, Perspective3, Point3, Vector2, Vector3};

use crate::sim::timeline::{FlightPhase, Snapshot};

/// Chase cameras sit at this (x, y) off the pad.
const CHASE_EYE_XY: (f64, f64) = (10.0, 15.0);
/// Follow mode holds the launch view until this time, then tracks altitude.
const LIFTOFF_HOLD: f64 = 6.0;
const LIFTOFF_EYE_Z: f64 = 10.0;
/// Satellite close-up offset along x and z.
const SATELLITE_STANDOFF: f64 = 60.0;
/// Follow-mode orbit view distance along -y.
const ORBIT_VIEW_DISTANCE: f64 = 3000.0;

/// Eye, target and up vector of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAt {
    pub eye: Vector3<f64>,
    pub target: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl LookAt {
    pub fn new(eye: Vector3<f64>, target: Vector3<f64>) -> Self {
        Self { eye, target, up: Vector3::z() }
    }
}

/// Views bound to the number keys and `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraShot {
    FirstStage,
    SecondStage,
    Payload,
    Satellite,
    LaunchBase,
}

impl CameraShot {
    pub fn look_at(self, snap: &Snapshot, earth_radius: f64) -> LookAt {
        let (ex, ey) = CHASE_EYE_XY;
        let chase = |p: &Vector3<f64>| LookAt::new(Vector3::new(ex, ey, p.z), *p);
        match self {
            CameraShot::FirstStage => chase(&snap.first_stage.position),
            CameraShot::SecondStage => chase(&snap.second_stage.position),
            CameraShot::Payload => chase(&snap.payload.position),
            CameraShot::Satellite => {
                let p = snap.satellite.position;
                let dx = if p.x > 0.0 { SATELLITE_STANDOFF } else { -SATELLITE_STANDOFF };
                let dz = if p.z > -earth_radius { SATELLITE_STANDOFF } else { -SATELLITE_STANDOFF };
                LookAt::new(Vector3::new(p.x + dx, ey, p.z + dz), p)
            }
            CameraShot::LaunchBase => LookAt::new(
                Vector3::new(ex, ey, 0.0),
                Vector3::new(0.0, 0.0, snap.payload.position.z),
            ),
        }
    }
}

/// View used while follow mode is on.
///
/// Ascent tracks the stack (the payload rides on top of it): a fixed view
/// for liftoff, then an eye that climbs with the rocket. Orbit frames the
/// whole planet from the side.
pub fn follow_look_at(snap: &Snapshot, earth_radius: f64) -> LookAt {
    match snap.phase {
        FlightPhase::Ascent => {
            let (ex, ey) = CHASE_EYE_XY;
            let rocket = snap.payload.position;
            let eye_z = if snap.time >= LIFTOFF_HOLD { rocket.z } else { LIFTOFF_EYE_Z };
            LookAt::new(Vector3::new(ex, ey, eye_z), rocket)
        }
        FlightPhase::Orbit => LookAt::new(
            Vector3::new(0.0, -ORBIT_VIEW_DISTANCE, -earth_radius),
            Vector3::new(0.0, 0.0, -earth_radius),
        ),
    }
}

/// View to apply this frame, if any. Follow mode wins over a requested
/// shot while it is on; otherwise the shot (a held number key or `B`) is
/// used. `None` leaves the turntable camera where the mouse put it.
pub fn frame_view(
    follow: bool,
    requested: Option<CameraShot>,
    snap: &Snapshot,
    earth_radius: f64,
) -> Option<LookAt> {
    if follow {
        Some(follow_look_at(snap, earth_radius))
    } else {
        requested.map(|shot| shot.look_at(snap, earth_radius))
    }
}

// ---------------------------------------------------------------------------
// Turntable camera
// ---------------------------------------------------------------------------

/// Camera orbiting a centre point with z up.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vector3<f64>,
    pub distance: f64,
    pub yaw: f64,   // rad, around +z from +x
    pub pitch: f64, // rad, above the xy plane
    pub fov_y: f64, // rad
    pub near: f64,
    pub far: f64,
}

const MAX_PITCH: f64 = std::f64::consts::FRAC_PI_2 - 0.01;
const MIN_DISTANCE: f64 = 0.1;

impl Default for OrbitCamera {
    fn default() -> Self {
        let mut camera = Self {
            target: Vector3::zeros(),
            distance: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 50f64.to_radians(),
            near: 0.1,
            far: 1.0e7,
        };
        camera.look_at(&LookAt::new(Vector3::new(10.0, 15.0, 10.0), Vector3::zeros()));
        camera
    }
}

impl OrbitCamera {
    pub fn look_at(&mut self, view: &LookAt) {
        let offset = view.eye - view.target;
        let distance = offset.norm();
        self.target = view.target;
        if distance < f64::EPSILON {
            return;
        }
        self.distance = distance.max(MIN_DISTANCE);
        self.yaw = offset.y.atan2(offset.x);
        self.pitch = (offset.z / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn eye(&self) -> Vector3<f64> {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        self.target + Vector3::new(cp * cy, cp * sy, sp) * self.distance
    }

    /// Turn around the target by `(d_yaw, d_pitch)` radians.
    pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Slide the target in the view plane. Offsets are fractions of the
    /// distance to the target.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let rotation = self.view().rotation.inverse();
        let right = rotation * Vector3::x();
        let up = rotation * Vector3::y();
        self.target += (right * dx + up * dy) * self.distance;
    }

    /// Scale the distance by `exp(amount)`; positive moves away.
    pub fn zoom(&mut self, amount: f64) {
        self.distance = (self.distance * amount.exp()).clamp(MIN_DISTANCE, self.far * 0.5);
    }

    /// World -> camera transform.
    pub fn view(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(
            &Point3::from(self.eye()),
            &Point3::from(self.target),
            &Vector3::z(),
        )
    }

    /// Normalized device coordinates in [-1, 1] (y up) for a world point.
    /// `None` when the point is behind the near plane.
    pub fn project(&self, point: &Vector3<f64>, aspect: f64) -> Option<Vector2<f64>> {
        let view_point = self.view().transform_point(&Point3::from(*point));
        if view_point.z > -self.near {
            return None;
        }
        let projection = Perspective3::new(aspect, self.fov_y, self.near, self.far);
        let ndc = projection.project_point(&view_point);
        Some(Vector2::new(ndc.x, ndc.y))
    }

    /// Screen pixels covered by one world unit at `point`, for a viewport
    /// `viewport_height` pixels tall.
    pub fn pixels_per_unit(&self, point: &Vector3<f64>, viewport_height: f64) -> Option<f64> {
        let view_point = self.view().transform_point(&Point3::from(*point));
        let depth = -view_point.z;
        if depth <= self.near {
            return None;
        }
        Some(viewport_height * 0.5 / ((self.fov_y * 0.5).tan() * depth))
    }
}
