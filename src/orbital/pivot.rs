use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};

/// Rigid transform rotating by `angle` around `axis` through `pivot`.
///
/// Built as translate(pivot) * rotate * translate(-pivot): move the pivot to
/// the origin, rotate, move it back.
pub fn pivot_transform(
    pivot: &Vector3<f64>,
    axis: &Unit<Vector3<f64>>,
    angle: f64,
) -> Isometry3<f64> {
    let to_origin = Translation3::from(-pivot);
    let rotation = UnitQuaternion::from_axis_angle(axis, angle);
    let back = Translation3::from(*pivot);
    back * rotation * to_origin
}

/// Rotate `point` by `angle` around `axis` passing through `pivot`.
pub fn rotate_about_pivot(
    point: &Vector3<f64>,
    pivot: &Vector3<f64>,
    axis: &Unit<Vector3<f64>>,
    angle: f64,
) -> Vector3<f64> {
    pivot_transform(pivot, axis, angle)
        .transform_point(&Point3::from(*point))
        .coords
}
