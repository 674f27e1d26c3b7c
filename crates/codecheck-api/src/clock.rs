// Time sources - injectable so throttling and rate-limit math can be tested
use chrono::{DateTime, Utc};

/// Anything that can tell us what time it is
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Plain wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall-clock anchor advanced by tokio's monotonic timer.
///
/// Meant for tests: production code uses [`SystemClock`].
///
/// Under a paused tokio runtime this clock only moves when the runtime's
/// virtual time moves, so sleeps inside the coordinator show up here exactly.
#[derive(Debug, Clone)]
pub struct TokioClock {
    anchor: DateTime<Utc>,
    started: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.started.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.anchor + elapsed
    }
}
