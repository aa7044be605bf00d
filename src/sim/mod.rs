pub mod clock;
pub mod event;
pub mod history;
pub mod runner;
pub mod timeline;

pub use clock::ScaledClock;
pub use event::{EventKind, SimEvent};
pub use history::SampleHistory;
pub use runner::{simulate, RunConfig};
pub use timeline::{FlightPhase, FlightTimeline, Snapshot};
