use {
    super::EngineEvent,
    crate::config::DF,
    std::time::Duration,
    tokio::{
        sync::mpsc::UnboundedSender,
        task::JoinHandle,
        time::{MissedTickBehavior, interval},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Active,
}

/// Repeating timer for the watchlist. It only emits [`EngineEvent::Tick`];
/// the controller performs the fetch. Every restart stops the previous timer
/// before a new one is spawned, and bumps the generation so ticks already
/// queued by the old timer can be recognised and dropped.
pub struct LivePoller {
    period: Duration,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl LivePoller {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
            generation: 0,
        }
    }

    /// Tears down the running timer and, if `ids` is non-empty, starts a new
    /// one that ticks immediately and then every `period`.
    pub fn restart(&mut self, ids: Vec<String>, events: UnboundedSender<EngineEvent>) -> PollerState {
        self.stop();
        self.generation += 1;

        if ids.is_empty() {
            return PollerState::Idle;
        }

        let generation = self.generation;
        let period = self.period;

        #[cfg(debug_assertions)]
        if DF.log_poll_ticks {
            log::debug!("Poller gen {} starting for [{}]", generation, ids.join(", "));
        }

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            // A late tick is not worth a burst of catch-up requests
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let tick = EngineEvent::Tick {
                    generation,
                    ids: ids.clone(),
                };
                if events.send(tick).is_err() {
                    break; // controller gone
                }
            }
        }));

        PollerState::Active
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn state(&self) -> PollerState {
        match &self.handle {
            Some(handle) if !handle.is_finished() => PollerState::Active,
            _ => PollerState::Idle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for LivePoller {
    fn drop(&mut self) {
        self.stop();
    }
}
