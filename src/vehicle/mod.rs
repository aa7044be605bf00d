pub mod stage;
pub mod thrust;

pub use stage::{Stage, StageId, StagePhase, StageUpdate};
pub use thrust::ThrustSource;
