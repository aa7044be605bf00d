use std::fmt;

use nalgebra::Vector3;

use crate::vehicle::StageId;

// ---------------------------------------------------------------------------
// Timeline events
// ---------------------------------------------------------------------------

/// Kinds of one-shot transitions the timeline can fire.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// A stage was released from the stack.
    Separation { stage: StageId },
    /// A falling stage hit the ground and came to rest.
    Touchdown { stage: StageId },
    /// Ascent ended; the orbit radius was captured.
    OrbitInsertion { radius: f64 },
}

/// A transition that occurred during an `advance` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    /// Time of the frame on which the transition was observed, s.
    pub time: f64,
    pub kind: EventKind,
    /// Position of the body involved at the transition.
    pub position: Vector3<f64>,
}

impl SimEvent {
    pub fn stage(&self) -> Option<StageId> {
        match self.kind {
            EventKind::Separation { stage } | EventKind::Touchdown { stage } => Some(stage),
            EventKind::OrbitInsertion { .. } => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Separation { stage } => write!(f, "{stage} separation"),
            EventKind::Touchdown { stage } => write!(f, "{stage} touchdown"),
            EventKind::OrbitInsertion { radius } => write!(f, "orbit insertion (r={radius:.1})"),
        }
    }
}

/// Time of the first event matching `pred`, if any.
pub fn first_time(events: &[SimEvent], pred: impl Fn(&EventKind) -> bool) -> Option<f64> {
    events.iter().find(|e| pred(&e.kind)).map(|e| e.time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(time: f64, kind: EventKind) -> SimEvent {
        SimEvent { time, kind, position: Vector3::zeros() }
    }

    #[test]
    fn stage_of_event() {
        assert_eq!(
            event(10.0, EventKind::Separation { stage: StageId::First }).stage(),
            Some(StageId::First)
        );
        assert_eq!(event(20.0, EventKind::OrbitInsertion { radius: 1100.0 }).stage(), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(
            EventKind::Touchdown { stage: StageId::Second }.to_string(),
            "second stage touchdown"
        );
        assert_eq!(
            EventKind::OrbitInsertion { radius: 1100.0 }.to_string(),
            "orbit insertion (r=1100.0)"
        );
    }

    #[test]
    fn first_time_finds_earliest_match() {
        let events = vec![
            event(10.0, EventKind::Separation { stage: StageId::First }),
            event(13.7, EventKind::Touchdown { stage: StageId::First }),
            event(15.0, EventKind::Separation { stage: StageId::Second }),
        ];
        let t = first_time(&events, |k| matches!(k, EventKind::Separation { stage: StageId::Second }));
        assert_eq!(t, Some(15.0));
        assert_eq!(first_time(&events, |k| matches!(k, EventKind::OrbitInsertion { .. })), None);
    }
}
