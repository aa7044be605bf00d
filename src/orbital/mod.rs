pub mod circular;
pub mod pivot;

pub use circular::{CircularOrbit, OrbitState};
pub use pivot::{pivot_transform, rotate_about_pivot};
