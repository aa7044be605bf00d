use std::collections::VecDeque;

use super::timeline::Snapshot;

/// Rolling window of snapshots taken at a fixed simulation-time spacing.
///
/// Holds at most `capacity` samples; recording into a full window drops the
/// oldest one, so memory and per-frame plotting cost stay bounded however
/// long the orbit phase runs.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    samples: VecDeque<Snapshot>,
    spacing: f64,    // s
    capacity: usize,
}

impl SampleHistory {
    pub fn new(spacing: f64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            spacing: spacing.max(0.0),
            capacity,
        }
    }

    /// Keep `snap` if at least `spacing` has passed since the last sample.
    /// Returns whether it was kept.
    pub fn record(&mut self, snap: &Snapshot) -> bool {
        let due = self
            .samples
            .back()
            .map_or(true, |last| snap.time - last.time >= self.spacing);
        if !due {
            return false;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(snap.clone());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
