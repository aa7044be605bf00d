use std::fmt;

/// Which body the exhaust plume is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrustSource {
    FirstStage,
    SecondStage,
    Payload,
}

impl ThrustSource {
    /// Lowest still-attached stage burns. Depends only on the separation
    /// flags, never on positions.
    pub fn from_flags(first_separated: bool, second_separated: bool) -> Self {
        match (first_separated, second_separated) {
            (false, _) => ThrustSource::FirstStage,
            (true, false) => ThrustSource::SecondStage,
            (true, true) => ThrustSource::Payload,
        }
    }

    /// Stable index used by renderers and exports.
    pub fn index(self) -> usize {
        match self {
            ThrustSource::FirstStage => 0,
            ThrustSource::SecondStage => 1,
            ThrustSource::Payload => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThrustSource::FirstStage => "first",
            ThrustSource::SecondStage => "second",
            ThrustSource::Payload => "payload",
        }
    }
}

impl fmt::Display for ThrustSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_table() {
        assert_eq!(ThrustSource::from_flags(false, false), ThrustSource::FirstStage);
        assert_eq!(ThrustSource::from_flags(true, false), ThrustSource::SecondStage);
        assert_eq!(ThrustSource::from_flags(true, true), ThrustSource::Payload);
    }

    #[test]
    fn second_gone_first_attached_still_fires_first() {
        // Separation order is not validated; the first stage keeps burning.
        assert_eq!(ThrustSource::from_flags(false, true), ThrustSource::FirstStage);
    }

    #[test]
    fn indices_are_distinct() {
        let idx: Vec<usize> = [
            ThrustSource::FirstStage,
            ThrustSource::SecondStage,
            ThrustSource::Payload,
        ]
        .iter()
        .map(|s| s.index())
        .collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }
}
