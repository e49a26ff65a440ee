use crate::config::CrossfadeConfig;

/// Volumes for one crossfade tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossfadeStep {
    pub outgoing: f64,
    pub incoming: f64,
    pub finished: bool,
}

/// Linear volume ramp between two tracks, advanced once per fixed interval.
#[derive(Debug, Clone)]
pub struct Crossfade {
    step_ms: f64,
    volume: f64,
    total_steps: u32,
    taken: u32,
}

impl Crossfade {
    pub fn new(duration_ms: f64, step_ms: f64, volume: f64) -> Self {
        let total_steps = if step_ms > 0.0 && duration_ms > 0.0 {
            (duration_ms / step_ms).ceil().max(1.0) as u32
        } else {
            1
        };
        Self {
            step_ms,
            volume: volume.clamp(0.0, 1.0),
            total_steps,
            taken: 0,
        }
    }

    pub fn from_config(config: &CrossfadeConfig) -> Self {
        Self::new(config.duration_ms, config.step_ms, config.volume)
    }

    /// Interval between steps, for the timer driving the fade.
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn is_finished(&self) -> bool {
        self.taken >= self.total_steps
    }

    /// Advance one interval. `None` once the fade has completed.
    pub fn step(&mut self) -> Option<CrossfadeStep> {
        if self.is_finished() {
            return None;
        }
        self.taken += 1;
        let t = f64::from(self.taken) / f64::from(self.total_steps);
        Some(CrossfadeStep {
            outgoing: self.volume * (1.0 - t),
            incoming: self.volume * t,
            finished: self.is_finished(),
        })
    }
}
