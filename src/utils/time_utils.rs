use {
    chrono::{DateTime, Local, Utc},
    std::sync::Mutex,
};

pub struct TimeUtils;

impl TimeUtils {
    pub const CLOCK_FORMAT: &str = "%H:%M:%S";
}

/// Source of "now". Injected wherever a timestamp decides behavior (cache
/// freshness, sample timestamps) so tests can move time by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: std::time::Duration) {
        let by = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

// Time Helper functions

/// Local wall-clock time of a sample, for display (e.g. chart axis labels).
pub fn format_clock_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format(TimeUtils::CLOCK_FORMAT)
        .to_string()
}
