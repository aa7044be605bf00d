/// Simulation clock with a time-scale multiplier.
///
/// Real elapsed time is multiplied by `scale` before being added, so a
/// scale of 0 pauses the flight and 2 plays it at double speed. Negative
/// scales are clamped to 0, which keeps simulation time non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledClock {
    time: f64,
    scale: f64,
}

impl ScaledClock {
    pub fn new(scale: f64) -> Self {
        Self { time: 0.0, scale: sanitize(scale) }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = sanitize(scale);
    }

    pub fn is_paused(&self) -> bool {
        self.scale == 0.0
    }

    /// Advance by `real_dt` seconds of wall time; returns the new simulation time.
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        if real_dt.is_finite() && real_dt > 0.0 {
            self.time += real_dt * self.scale;
        }
        self.time
    }

    /// Back to t = 0, keeping the scale.
    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

impl Default for ScaledClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn sanitize(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.max(0.0)
    } else {
        0.0
    }
}
