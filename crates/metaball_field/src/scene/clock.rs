//! Host timestamps to animation time.
use rand::Rng;

/// Upper bound for the random start phase used by [`FrameClock::with_random_offset`] callers.
pub const DEFAULT_START_OFFSET_MILLIS: f64 = 40_000.0;

/// Converts host timestamps (e.g. `performance.now()`) into elapsed milliseconds.
///
/// The first finite timestamp becomes time zero plus the start offset. Elapsed
/// time never decreases: a timestamp behind the previous one yields the previous
/// value again. Non-finite timestamps come back as NaN and leave the clock
/// untouched, so the animator can skip that frame.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    origin: Option<f64>,
    offset: f64,
    last: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the animation `offset_millis` into its timeline.
    pub fn with_offset(offset_millis: f64) -> Self {
        Self {
            origin: None,
            offset: offset_millis,
            last: offset_millis,
        }
    }

    /// Starts at a random phase in `[0, max_millis]`, so separate runs do not look alike.
    pub fn with_random_offset(rng: &mut dyn Rng, max_millis: f64) -> Self {
        let unit = rng.next_u32() as f64 / u32::MAX as f64;
        Self::with_offset(unit * max_millis)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Elapsed time of the last accepted timestamp.
    pub fn last(&self) -> f64 {
        self.last
    }

    /// Elapsed milliseconds for host timestamp `now_millis`.
    pub fn elapsed(&mut self, now_millis: f64) -> f64 {
        if !now_millis.is_finite() {
            return f64::NAN;
        }
        let origin = *self.origin.get_or_insert(now_millis);
        let elapsed = now_millis - origin + self.offset;
        if elapsed > self.last {
            self.last = elapsed;
        }
        self.last
    }

    /// Forget the origin; the next timestamp starts the timeline again at the offset.
    pub fn reset(&mut self) {
        self.origin = None;
        self.last = self.offset;
    }
}
