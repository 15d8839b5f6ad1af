use std::time::Duration;

use crate::{
    ease::Ease,
    error::{StarburstError, StarburstResult},
};

/// A fixed-duration animation timeline.
///
/// Holds no running state: progress is recomputed from elapsed time on every
/// sample, so a timeline can be shared and replayed freely.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    duration_ms: u64,
    ease: Ease,
}

impl Timeline {
    pub fn new(duration: Duration, ease: Ease) -> StarburstResult<Self> {
        let duration_ms = duration.as_millis();
        if duration_ms == 0 {
            return Err(StarburstError::animation("timeline duration must be > 0"));
        }
        let duration_ms = u64::try_from(duration_ms)
            .map_err(|_| StarburstError::animation("timeline duration overflows u64 ms"))?;
        Ok(Self { duration_ms, ease })
    }

    pub fn from_millis(duration_ms: u64, ease: Ease) -> StarburstResult<Self> {
        Self::new(Duration::from_millis(duration_ms), ease)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Eased progress in [0,1] at the given elapsed time since the timeline
    /// started. Clamps before the start and after the end.
    pub fn progress_at(&self, elapsed: Duration) -> f64 {
        let t = elapsed.as_secs_f64() / (self.duration_ms as f64 / 1000.0);
        self.ease.apply(t)
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration()
    }
}
