use {
    crate::config::WATCHLIST,
    strum_macros::Display,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FeedMode {
    #[strum(to_string = "live")]
    Live,
    #[strum(to_string = "sample")]
    Sample,
}

/// What a recorded failure did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Counted; still in the same mode.
    Counted { consecutive: u32 },
    /// This failure crossed the threshold. Happens once per session.
    SwitchedToSample,
}

/// Live/sample switch driven by consecutive fetch failures. One way only:
/// nothing but a restart brings a session back to live data.
#[derive(Debug, Clone)]
pub struct DegradationPolicy {
    consecutive_failures: u32,
    mode: FeedMode,
    threshold: u32,
}

impl DegradationPolicy {
    pub fn new(threshold: u32) -> Self {
        Self {
            consecutive_failures: 0,
            mode: FeedMode::Live,
            threshold,
        }
    }

    /// Session that starts on sample data (e.g. `--sample`).
    pub fn sample_only() -> Self {
        Self {
            mode: FeedMode::Sample,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    pub fn is_sample(&self) -> bool {
        self.mode == FeedMode::Sample
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn record_success(&mut self) {
        if self.mode == FeedMode::Live {
            self.consecutive_failures = 0;
        }
    }

    pub fn record_failure(&mut self) -> FailureOutcome {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        if self.mode == FeedMode::Live && self.consecutive_failures >= self.threshold {
            self.mode = FeedMode::Sample;
            log::warn!(
                "Switching to sample data after {} consecutive failures",
                self.consecutive_failures
            );
            return FailureOutcome::SwitchedToSample;
        }

        FailureOutcome::Counted {
            consecutive: self.consecutive_failures,
        }
    }
}

impl Default for DegradationPolicy {
    fn default() -> Self {
        Self::new(WATCHLIST.failure_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_consecutive_failures_switch_to_sample() {
        let mut policy = DegradationPolicy::new(3);
        assert_eq!(policy.record_failure(), FailureOutcome::Counted { consecutive: 1 });
        assert_eq!(policy.record_failure(), FailureOutcome::Counted { consecutive: 2 });
        assert_eq!(policy.mode(), FeedMode::Live);
        assert_eq!(policy.record_failure(), FailureOutcome::SwitchedToSample);
        assert_eq!(policy.mode(), FeedMode::Sample);
    }

    #[test]
    fn success_before_the_third_failure_resets() {
        let mut policy = DegradationPolicy::new(3);
        policy.record_failure();
        policy.record_failure();
        policy.record_success();
        assert_eq!(policy.consecutive_failures(), 0);

        policy.record_failure();
        policy.record_failure();
        assert_eq!(policy.mode(), FeedMode::Live);
    }

    #[test]
    fn sample_mode_is_sticky() {
        let mut policy = DegradationPolicy::new(3);
        for _ in 0..3 {
            policy.record_failure();
        }
        policy.record_success();
        assert_eq!(policy.mode(), FeedMode::Sample);
        // The switch is reported only once
        assert_eq!(policy.record_failure(), FailureOutcome::Counted { consecutive: 4 });
    }

    #[test]
    fn mode_labels() {
        assert_eq!(FeedMode::Live.to_string(), "live");
        assert_eq!(DegradationPolicy::sample_only().mode().to_string(), "sample");
    }
}
