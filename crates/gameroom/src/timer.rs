use std::time::Duration;
use tokio::time::Instant;

/// Deadlines the orchestrator and session loop race against: a human's
/// decision clock, the pause before showdown reveals, and the animation
/// handshake's per-step fallback.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub decision: Duration,
    pub showdown: Duration,
    pub animation_fallback: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            decision: Duration::from_secs(pcore::DECISION_TIMEOUT_SECS),
            showdown: Duration::from_secs(pcore::SHOWDOWN_TIMEOUT_SECS),
            animation_fallback: Duration::from_millis(pcore::ANIMATION_FALLBACK_MILLIS),
        }
    }
}

/// Tracks a single optional deadline. `EventOrchestrator` keeps one per
/// in-flight animation wait; `SessionLoop` keeps one for idle keepalive.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self { config, deadline: None }
    }

    pub fn with_defaults() -> Self {
        Self::new(TimerConfig::default())
    }

    pub fn start_decision(&mut self) {
        self.deadline = Some(Instant::now() + self.config.decision);
    }

    pub fn start_showdown(&mut self) {
        self.deadline = Some(Instant::now() + self.config.showdown);
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn animation_fallback(&self) -> Duration {
        self.config.animation_fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_starts_cleared() {
        let timer = Timer::with_defaults();
        assert!(timer.deadline().is_none());
        assert!(!timer.expired());
    }

    #[test]
    fn timer_sets_and_clears_a_decision_deadline() {
        let mut timer = Timer::with_defaults();
        timer.start_decision();
        assert!(timer.deadline().is_some());
        timer.clear();
        assert!(timer.deadline().is_none());
    }
}
