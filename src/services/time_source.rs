//! Clocks used by the viewer
//!
//! Three things depend on time: the cache TTL check, the "Last updated"
//! line and how long a copy notice stays in the status bar. They all read
//! time through [`TimeSource`] so tests can move the clock by hand.

use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Monotonic and wall-clock readings
pub trait TimeSource: Send + Sync + std::fmt::Debug {
    /// Monotonic reading, for measuring how long something has been shown
    fn now(&self) -> Instant;

    /// Wall-clock time in milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;

    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

pub type SharedTimeSource = Arc<dyn TimeSource>;

/// The system clocks
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn shared() -> SharedTimeSource {
        Arc::new(RealTimeSource)
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| since.as_millis() as u64)
    }
}

/// A clock that only moves when told to
///
/// Both readings advance together: `advance(d)` moves `now()` and
/// `now_millis()` by the same amount.
#[derive(Debug)]
pub struct TestTimeSource {
    started: Instant,
    epoch_millis: u64,
    offset_millis: AtomicU64,
}

impl Default for TestTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTimeSource {
    /// 2024-01-01T00:00:00Z
    pub const DEFAULT_EPOCH_MILLIS: u64 = 1_704_067_200_000;

    pub fn new() -> Self {
        Self::starting_at(Self::DEFAULT_EPOCH_MILLIS)
    }

    /// A clock whose wall-clock reading starts at `epoch_millis`
    pub fn starting_at(epoch_millis: u64) -> Self {
        Self {
            started: Instant::now(),
            epoch_millis,
            offset_millis: AtomicU64::new(0),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn advance(&self, by: Duration) {
        self.offset_millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    fn offset(&self) -> Duration {
        Duration::from_millis(self.offset_millis.load(Ordering::SeqCst))
    }
}

impl TimeSource for TestTimeSource {
    fn now(&self) -> Instant {
        self.started + self.offset()
    }

    fn now_millis(&self) -> u64 {
        self.epoch_millis + self.offset_millis.load(Ordering::SeqCst)
    }
}

/// Format a fetch timestamp for the "Last updated" line, in local time
///
/// `None` when chrono cannot represent the timestamp.
pub fn format_local(epoch_millis: u64) -> Option<String> {
    let millis = i64::try_from(epoch_millis).ok()?;
    let fetched = DateTime::from_timestamp_millis(millis)?;
    Some(
        fetched
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    )
}
