//! Static props of the launch site and the placement rules for moving meshes.
//!
//! Coordinates are in scene units with z up. Each rocket mesh is modelled
//! at its stacked height, so a body position is applied as a translation.

use nalgebra::Vector3;

use crate::sim::timeline::Snapshot;
use crate::vehicle::ThrustSource;

/// Stage meshes: (base height, top height, radius).
pub const FIRST_STAGE_MESH: (f64, f64, f64) = (0.0, 5.0, 0.4);
pub const SECOND_STAGE_MESH: (f64, f64, f64) = (5.0, 7.0, 0.4);
/// Payload fairing cone: (base height, height, radius).
pub const PAYLOAD_MESH: (f64, f64, f64) = (7.0, 1.0, 0.6);
/// Satellite cone: (base height, height, radius).
pub const SATELLITE_MESH: (f64, f64, f64) = (7.0, 20.0, 12.0);
/// Exhaust billboard: half width and length below the nozzle.
pub const PLUME_HALF_WIDTH: f64 = 1.2;
pub const PLUME_LENGTH: f64 = 1.6;

pub type Rgb = [u8; 3];

/// Simple shapes the renderer knows how to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Quad([Vector3<f64>; 4]),
    Disc { center: Vector3<f64>, radius: f64 },
    /// Four-sided pyramid: base corners and apex.
    Pyramid { base: [Vector3<f64>; 4], apex: Vector3<f64> },
    /// Axis-aligned box.
    Cuboid { min: Vector3<f64>, max: Vector3<f64> },
    Sphere { center: Vector3<f64>, radius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: &'static str,
    pub shape: Shape,
    pub color: Rgb,
}

fn v(x: f64, y: f64, z: f64) -> Vector3<f64> {
    Vector3::new(x, y, z)
}

/// Planet the orbit phase circles: centred at (0, 0, -earth_radius).
pub fn planet(earth_radius: f64) -> Prop {
    Prop {
        name: "earth",
        shape: Shape::Sphere { center: v(0.0, 0.0, -earth_radius), radius: earth_radius },
        color: [40, 90, 170],
    }
}

/// Launch site props in back-to-front draw order.
pub fn launch_site() -> Vec<Prop> {
    let tower = |dx: f64, dy: f64| Shape::Pyramid {
        base: [
            v(-10.0 + dx, -10.0 + dy, 0.0),
            v(-9.5 + dx, -10.0 + dy, 0.0),
            v(-9.5 + dx, -9.5 + dy, 0.0),
            v(-10.0 + dx, -9.5 + dy, 0.0),
        ],
        apex: v(-9.75 + dx, -9.75 + dy, 10.0),
    };

    vec![
        Prop {
            name: "water",
            shape: Shape::Quad([
                v(10.0, 20.0, -0.01),
                v(10.0, -20.0, -0.01),
                v(-20.0, -20.0, -0.01),
                v(-20.0, 20.0, -0.01),
            ]),
            color: [0, 119, 190],
        },
        Prop {
            name: "ground",
            shape: Shape::Quad([
                v(10.0, 10.0, 0.0),
                v(10.0, -10.0, 0.0),
                v(-10.0, -10.0, 0.0),
                v(-10.0, 10.0, 0.0),
            ]),
            color: [0, 255, 128],
        },
        Prop {
            name: "launch space",
            shape: Shape::Disc { center: v(0.0, 0.0, 0.01), radius: 5.0 },
            color: [132, 104, 112],
        },
        Prop {
            name: "road",
            shape: Shape::Quad([
                v(10.0, -2.5, 0.01),
                v(10.0, 2.5, 0.01),
                v(4.0, 2.5, 0.01),
                v(4.0, -2.5, 0.01),
            ]),
            color: [132, 104, 112],
        },
        Prop {
            name: "launch marker",
            shape: Shape::Disc { center: v(0.0, 0.0, 0.1), radius: 1.0 },
            color: [0, 0, 0],
        },
        Prop {
            name: "launch complex",
            shape: Shape::Cuboid { min: v(-3.0, -1.0, 0.0), max: v(-1.0, 1.0, 7.0) },
            color: [180, 180, 180],
        },
        Prop { name: "tower", shape: tower(0.0, 0.0), color: [200, 200, 200] },
        Prop { name: "tower", shape: tower(0.0, 19.5), color: [200, 200, 200] },
        Prop { name: "tower", shape: tower(19.5, 0.0), color: [200, 200, 200] },
        Prop { name: "tower", shape: tower(19.5, 19.5), color: [200, 200, 200] },
    ]
}

/// Background colour fading from sky blue at liftoff to black at orbit start.
pub fn sky_color(time: f64, orbit_start_time: f64) -> [f32; 3] {
    let r = if orbit_start_time > 0.0 { (time / orbit_start_time) as f32 } else { 1.0 };
    [
        (0.529 - r * 0.529).max(0.0),
        (0.808 - r * 0.888).max(0.0),
        (0.922 - r * 0.922).max(0.0),
    ]
}

/// Where the exhaust billboard sits: at the nozzle of the burning body.
pub fn thrust_anchor(snap: &Snapshot) -> Option<Vector3<f64>> {
    let source = snap.thrust?;
    let body = snap.thrust_body()?;
    let nozzle = match source {
        ThrustSource::FirstStage => FIRST_STAGE_MESH.0,
        ThrustSource::SecondStage => SECOND_STAGE_MESH.0,
        ThrustSource::Payload => PAYLOAD_MESH.0,
    };
    Some(body.position + Vector3::new(0.0, 0.0, nozzle))
}

/// Translation applied to the satellite mesh so its base sits on the orbit path.
pub fn satellite_translation(snap: &Snapshot) -> Vector3<f64> {
    snap.satellite.position - Vector3::new(0.0, 0.0, SATELLITE_MESH.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::sim::timeline::FlightTimeline;
    use approx::assert_relative_eq;

    fn snapshot_at(t: f64) -> Snapshot {
        let mut tl = FlightTimeline::new(TimelineConfig::default());
        tl.advance(t);
        tl.snapshot()
    }

    #[test]
    fn sky_starts_blue_and_ends_black() {
        let start = sky_color(0.0, 20.0);
        assert_relative_eq!(start[0], 0.529);
        assert_relative_eq!(start[2], 0.922);
        assert_eq!(sky_color(20.0, 20.0), [0.0, 0.0, 0.0]);
        assert_eq!(sky_color(100.0, 20.0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn green_channel_fades_first() {
        // 0.808 - 0.888 r hits zero before r = 1
        let c = sky_color(19.0, 20.0);
        assert_eq!(c[1], 0.0);
        assert!(c[0] > 0.0);
    }

    #[test]
    fn plume_follows_burning_stage() {
        let snap = snapshot_at(4.0);
        assert_eq!(thrust_anchor(&snap), Some(Vector3::new(0.0, 0.0, 20.0)));

        let snap = snapshot_at(12.0);
        assert_eq!(thrust_anchor(&snap), Some(Vector3::new(0.0, 0.0, 65.0)));

        let snap = snapshot_at(16.0);
        assert_eq!(thrust_anchor(&snap), Some(Vector3::new(0.0, 0.0, 87.0)));
    }

    #[test]
    fn no_plume_in_orbit() {
        assert_eq!(thrust_anchor(&snapshot_at(25.0)), None);
    }

    #[test]
    fn satellite_mesh_offset_removed() {
        let snap = snapshot_at(20.0);
        assert_relative_eq!(satellite_translation(&snap), Vector3::new(0.0, 0.0, 93.0), epsilon = 1e-9);
    }

    #[test]
    fn site_has_four_towers_and_planet_below_ground() {
        let props = launch_site();
        assert_eq!(props.iter().filter(|p| p.name == "tower").count(), 4);
        match planet(1000.0).shape {
            Shape::Sphere { center, radius } => assert_eq!(center.z + radius, 0.0),
            _ => panic!("planet should be a sphere"),
        }
    }
}
