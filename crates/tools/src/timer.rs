use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of recent frame durations.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    capacity: usize,
    total_frames: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            total_frames: 0,
        }
    }

    pub fn record(&mut self, frame: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(frame);
        self.total_frames += 1;
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn average(&self) -> Option<Duration> {
        let n = u32::try_from(self.samples.len()).ok().filter(|n| *n > 0)?;
        Some(self.samples.iter().sum::<Duration>() / n)
    }

    pub fn min(&self) -> Option<Duration> {
        self.samples.iter().min().copied()
    }

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().max().copied()
    }

    /// Frames per second over the window, 0 when empty.
    pub fn fps(&self) -> f32 {
        match self.average() {
            Some(avg) if !avg.is_zero() => 1.0 / avg.as_secs_f32(),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn empty_timer() {
        let timer = FrameTimer::default();
        assert!(timer.average().is_none());
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    fn averages_the_window() {
        let mut timer = FrameTimer::new(4);
        for n in [10, 20, 30, 40] {
            timer.record(ms(n));
        }
        assert_eq!(timer.average(), Some(ms(25)));
        assert_eq!(timer.min(), Some(ms(10)));
        assert_eq!(timer.max(), Some(ms(40)));
        assert!((timer.fps() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn old_samples_fall_out() {
        let mut timer = FrameTimer::new(2);
        timer.record(ms(100));
        timer.record(ms(10));
        timer.record(ms(10));
        assert_eq!(timer.max(), Some(ms(10)));
        assert_eq!(timer.total_frames(), 3);
    }
}
