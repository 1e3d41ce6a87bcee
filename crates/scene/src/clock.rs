use std::time::{Duration, Instant};

/// Longest delta a single frame may report, so a stall (window drag,
/// breakpoint) does not make animations jump.
const MAX_DELTA: Duration = Duration::from_millis(100);

/// Timing of one frame, handed to [`crate::Scene::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Zero-based frame counter.
    pub frame: u64,
    /// Time since the first frame.
    pub elapsed: Duration,
    /// Time since the previous frame.
    pub delta: Duration,
}

impl FrameTime {
    /// Frame `frame` of a fixed-rate sequence at `fps` frames per second.
    pub fn fixed(frame: u64, fps: f32) -> Self {
        let delta = Duration::from_secs_f32(1.0 / fps.max(f32::EPSILON));
        Self {
            frame,
            elapsed: Duration::try_from_secs_f64(delta.as_secs_f64() * frame as f64)
                .unwrap_or(Duration::MAX),
            delta,
        }
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed.as_secs_f32() * 1000.0
    }
}

/// Wall-clock frame timing for the frame loop.
#[derive(Debug, Default)]
pub struct FrameClock {
    start: Option<Instant>,
    last: Option<Instant>,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now`. The first tick has zero delta and elapsed.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default()
            .min(MAX_DELTA);
        self.last = Some(now);

        let time = FrameTime {
            frame: self.frame,
            elapsed: now.saturating_duration_since(start),
            delta,
        };
        self.frame += 1;
        time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

/// Ring buffer of recent frame durations, for an fps readout.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn recorded(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        self.recorded().iter().sum::<Duration>() / count as u32
    }

    pub fn max(&self) -> Duration {
        self.recorded().iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.recorded().iter().copied().min().unwrap_or_default()
    }

    /// Frames per second over the recorded window, 0 when empty.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_no_delta() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        let first = clock.tick(t0);
        assert_eq!(first.frame, 0);
        assert_eq!(first.delta, Duration::ZERO);

        let second = clock.tick(t0 + Duration::from_millis(16));
        assert_eq!(second.frame, 1);
        assert_eq!(second.delta, Duration::from_millis(16));
        assert_eq!(second.elapsed, Duration::from_millis(16));
    }

    #[test]
    fn stalls_are_clamped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        let late = clock.tick(t0 + Duration::from_secs(3));
        assert_eq!(late.delta, MAX_DELTA);
        assert_eq!(late.elapsed, Duration::from_secs(3));
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn fixed_frames_advance_elapsed() {
        let t = FrameTime::fixed(30, 60.0);
        assert!((t.delta_secs() - 1.0 / 60.0).abs() < 1e-6);
        assert!((t.elapsed_ms() - 500.0).abs() < 0.01);
    }

    #[test]
    fn fixed_elapsed_counts_frames_past_u32() {
        let t = FrameTime::fixed((1 << 32) + 1, 60.0);
        let expected = ((1u64 << 32) + 1) as f64 / 60.0;
        assert!((t.elapsed.as_secs_f64() - expected).abs() < 10.0);

        let t = FrameTime::fixed(u64::MAX, 0.0);
        assert_eq!(t.elapsed, Duration::MAX);
    }

    #[test]
    fn frame_timer_tracks_history() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(10));
        assert!((timer.fps() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30)); // overwrites first

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.max(), Duration::ZERO);
    }
}
