use nalgebra::Vector3;

/// Closed-form free fall from a baseline under constant gravity.
///
/// `gravity` is the downward acceleration expressed as a vector pointing up
/// (e.g. `(0, 0, 9.81)`), so it is subtracted:
///
///   v = v0 - g*dt
///   p = p0 + v0*dt - g*dt^2/2
///
/// Evaluated directly from elapsed time, so no step error accumulates.
pub fn free_fall(
    p0: &Vector3<f64>,
    v0: &Vector3<f64>,
    gravity: &Vector3<f64>,
    dt: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let velocity = v0 - gravity * dt;
    let position = p0 + v0 * dt - gravity * (0.5 * dt * dt);
    (position, velocity)
}

/// A falling body has reached the ground once its altitude is no longer positive.
pub fn has_landed(position: &Vector3<f64>) -> bool {
    position.z <= 0.0
}

/// Time after the baseline at which a vertical free fall reaches z = 0.
/// `None` when the body never gets there (no downward gravity and no descent).
pub fn time_to_ground(p0: &Vector3<f64>, v0: &Vector3<f64>, gravity: &Vector3<f64>) -> Option<f64> {
    // p0 + v0*t - g/2*t^2 = 0  ->  (g/2) t^2 - v0 t - p0 = 0
    let a = 0.5 * gravity.z;
    let b = -v0.z;
    let c = -p0.z;
    if a.abs() < f64::EPSILON {
        if b.abs() < f64::EPSILON {
            return None;
        }
        let t = -c / b;
        return (t >= 0.0).then_some(t);
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let roots = [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)];
    roots
        .into_iter()
        .filter(|t| *t >= 0.0)
        .fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.min(t))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn g() -> Vector3<f64> {
        Vector3::new(0.0, 0.0, 9.81)
    }

    #[test]
    fn zero_elapsed_returns_baseline() {
        let p0 = Vector3::new(1.0, 2.0, 50.0);
        let v0 = Vector3::new(0.0, 0.0, 5.0);
        let (p, v) = free_fall(&p0, &v0, &g(), 0.0);
        assert_eq!(p, p0);
        assert_eq!(v, v0);
    }

    #[test]
    fn matches_projectile_formula() {
        let p0 = Vector3::new(0.0, 0.0, 50.0);
        let v0 = Vector3::new(0.0, 0.0, 5.0);
        let (p, v) = free_fall(&p0, &v0, &g(), 2.0);
        assert_relative_eq!(v.z, 5.0 - 9.81 * 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 50.0 + 10.0 - 0.5 * 9.81 * 4.0, epsilon = 1e-12);
    }

    #[test]
    fn landed_at_or_below_zero() {
        assert!(has_landed(&Vector3::new(3.0, 0.0, 0.0)));
        assert!(has_landed(&Vector3::new(0.0, 0.0, -0.1)));
        assert!(!has_landed(&Vector3::new(0.0, 0.0, 1e-9)));
    }

    #[test]
    fn time_to_ground_from_first_stage_separation() {
        let p0 = Vector3::new(0.0, 0.0, 50.0);
        let v0 = Vector3::new(0.0, 0.0, 5.0);
        let t = time_to_ground(&p0, &v0, &g()).unwrap();
        let (p, _) = free_fall(&p0, &v0, &g(), t);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
        assert!(t > 3.0 && t < 4.0);
    }

    #[test]
    fn no_ground_contact_without_gravity_when_rising() {
        let p0 = Vector3::new(0.0, 0.0, 10.0);
        let v0 = Vector3::new(0.0, 0.0, 1.0);
        assert!(time_to_ground(&p0, &v0, &Vector3::zeros()).is_none());
    }
}
