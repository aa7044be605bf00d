pub mod state;

pub use state::{BodyState, EARTH_RADIUS, GRAVITY, ORBIT_RATE};
