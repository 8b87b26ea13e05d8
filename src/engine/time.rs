use crate::config::DEFAULT_FIXED_DT;

/// Fixed-step clock service: step length plus accumulated simulation time.
///
/// Frame time from the host is banked in `accumulator` and spent in whole
/// steps, so the control schemes only ever see `dt`.
#[derive(Debug, Clone)]
pub struct FixedClock {
    pub dt: f32,
    pub time: f32,
    pub steps: u64,
    accumulator: f32,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_DT)
    }
}

impl FixedClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            time: 0.0,
            steps: 0,
            accumulator: 0.0,
        }
    }

    /// Bank `frame_dt` seconds and return how many whole steps are due.
    /// A clock without a positive step length never runs a step.
    pub fn accumulate(&mut self, frame_dt: f32) -> usize {
        if !(self.dt > 0.0) {
            return 0;
        }
        self.accumulator += frame_dt.max(0.0);
        let mut due = 0;
        while self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            due += 1;
        }
        due
    }

    /// Record one executed step.
    pub fn advance(&mut self) {
        self.time += self.dt;
        self.steps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_whole_steps() {
        let mut clock = FixedClock::new(0.25);
        assert_eq!(clock.accumulate(0.6), 2);
        assert_eq!(clock.accumulate(0.2), 1);
        assert_eq!(clock.accumulate(-1.0), 0);
    }

    #[test]
    fn zero_step_length_runs_nothing() {
        let mut clock = FixedClock::new(0.0);
        assert_eq!(clock.accumulate(0.016), 0);
        let mut clock = FixedClock::new(-0.5);
        assert_eq!(clock.accumulate(1.0), 0);
        let mut clock = FixedClock::new(f32::NAN);
        assert_eq!(clock.accumulate(1.0), 0);
    }

    #[test]
    fn advance_tracks_time() {
        let mut clock = FixedClock::new(0.5);
        clock.advance();
        clock.advance();
        assert_eq!(clock.time, 1.0);
        assert_eq!(clock.steps, 2);
    }
}
