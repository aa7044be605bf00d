pub mod ballistic;

pub use ballistic::{free_fall, has_landed, time_to_ground};
