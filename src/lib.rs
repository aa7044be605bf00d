//! Flight timeline of a two-stage rocket launch scene: stage separations,
//! ballistic stage returns, and the payload's circular orbit, plus the
//! camera and scene rules the viewer draws them with.

pub mod camera;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod logging;
pub mod orbital;
pub mod physics;
pub mod scene;
pub mod sim;
pub mod vehicle;

pub use config::{Config, TimelineConfig};
pub use error::ConfigError;
pub use sim::{FlightPhase, FlightTimeline, SimEvent, Snapshot};
