//! Polls the status endpoint until an email send settles.
//!
//! A [`StatusPoller`] owns one background task. The task waits
//! [`PollSettings::initial_delay`], queries once, and keeps querying every
//! [`PollSettings::interval`] while the answer is `pending`. Any other answer,
//! a call to [`StatusPoller::stop`], or reaching [`PollSettings::max_attempts`]
//! ends it for good:
//!
//! ```text
//! Idle --start--> InitialDelay --pending--> Polling --terminal / ceiling--> Stopped
//!                      \------------terminal----------------------------------^
//! ```
//!
//! Queries never overlap: the next tick is only awaited once the previous
//! response has been rendered.

use crate::config::PollSettings;
use crate::models::{EmailCategory, PollStatus, StatusKind};
use crate::services::display::StatusDisplay;
use crate::services::presenter::present;
use crate::services::status_client::StatusSource;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollPhase {
    #[default]
    Idle,
    InitialDelay,
    Polling,
    Stopped,
}

#[derive(Debug, Default)]
struct PollerState {
    phase: PollPhase,
    attempt_count: u32,
    /// Present exactly while polling is in progress.
    task: Option<JoinHandle<()>>,
}

struct PollerInner {
    target_email: String,
    category: EmailCategory,
    settings: PollSettings,
    source: Arc<dyn StatusSource>,
    display: Arc<dyn StatusDisplay>,
    cancel: CancellationToken,
    state: Mutex<PollerState>,
}

/// Handle to one email's status checks. Clones share the same task and state.
#[derive(Clone)]
pub struct StatusPoller {
    inner: Arc<PollerInner>,
}

impl StatusPoller {
    pub fn new(
        target_email: impl Into<String>,
        category: EmailCategory,
        settings: PollSettings,
        source: Arc<dyn StatusSource>,
        display: Arc<dyn StatusDisplay>,
    ) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                target_email: target_email.into(),
                category,
                settings,
                source,
                display,
                cancel: CancellationToken::new(),
                state: Mutex::new(PollerState::default()),
            }),
        }
    }

    pub fn target_email(&self) -> &str {
        &self.inner.target_email
    }

    pub fn category(&self) -> EmailCategory {
        self.inner.category
    }

    pub fn settings(&self) -> PollSettings {
        self.inner.settings
    }

    pub fn phase(&self) -> PollPhase {
        self.inner.lock_state().phase
    }

    pub fn attempt_count(&self) -> u32 {
        self.inner.lock_state().attempt_count
    }

    pub fn is_polling(&self) -> bool {
        self.inner.lock_state().task.is_some()
    }

    /// Starts polling in the background.
    ///
    /// Does nothing when a task is already running or the poller has stopped.
    /// Settings with a zero interval or attempt ceiling render `error` and stop.
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut state = self.inner.lock_state();

        if state.task.is_some() {
            tracing::debug!(email = %self.inner.target_email, "Email status checks already running");
            return;
        }
        if state.phase == PollPhase::Stopped {
            tracing::debug!(email = %self.inner.target_email, "Email status poller already stopped");
            return;
        }

        if let Err(e) = self.inner.settings.validate() {
            tracing::error!(email = %self.inner.target_email, "Invalid poll settings: {}", e);
            drop(state);
            self.inner.render(&PollStatus::error(e.to_string()));
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!("Cannot start email status checks outside a tokio runtime: {}", e);
                return;
            }
        };

        tracing::info!(
            email = %self.inner.target_email,
            category = %self.inner.category,
            "Starting email status checks"
        );

        state.phase = PollPhase::InitialDelay;
        let inner = Arc::clone(&self.inner);
        state.task = Some(runtime.spawn(inner.run()));
    }

    /// Stops polling. Safe to call at any time, any number of times.
    ///
    /// A response already in flight is discarded when it arrives. Stopping is
    /// final: an idle poller that is stopped ignores every later `start()`.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Issues one status query. Failures come back as an `error` status.
    pub async fn query_status(&self) -> PollStatus {
        self.inner.query_status().await
    }

    /// Shows `status` on the display, stopping the poller for any terminal status.
    pub fn render(&self, status: &PollStatus) {
        self.inner.render(status);
    }

    /// Resolves once the poller has stopped.
    pub async fn stopped(&self) {
        self.inner.cancel.cancelled().await;
    }
}

impl PollerInner {
    fn lock_state(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop(&self) {
        let mut state = self.lock_state();
        let was_polling = state.task.take().is_some();
        state.phase = PollPhase::Stopped;
        drop(state);

        self.cancel.cancel();

        if was_polling {
            tracing::info!(email = %self.target_email, "Stopped email status checks");
        }
    }

    async fn query_status(&self) -> PollStatus {
        match self
            .source
            .fetch_status(&self.target_email, self.category)
            .await
        {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(email = %self.target_email, "Error checking email status: {}", e);
                PollStatus::error(e.to_string())
            }
        }
    }

    fn render(&self, status: &PollStatus) {
        let view = present(status, self.category);

        if let Err(e) = self.display.apply(&view) {
            tracing::warn!(status = %status.status, "Failed to update email status display: {}", e);
        }

        if view.stops_polling {
            tracing::info!(email = %self.target_email, status = %status.status, "Email status settled");
            self.stop();
        }
    }

    async fn run(self: Arc<Self>) {
        if !self.wait(self.settings.initial_delay).await {
            return;
        }

        match self.poll_once().await {
            Some(StatusKind::Pending) => {}
            _ => return,
        }

        {
            let mut state = self.lock_state();
            if state.phase == PollPhase::InitialDelay {
                state.phase = PollPhase::Polling;
            }
        }

        let period = self.settings.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return,
                _ = ticker.tick() => {}
            }

            let attempt = {
                let mut state = self.lock_state();
                state.attempt_count += 1;
                state.attempt_count
            };

            if attempt >= self.settings.max_attempts {
                tracing::warn!(
                    email = %self.target_email,
                    attempts = attempt,
                    "Gave up waiting for email status"
                );
                self.render_if_live(&PollStatus::timeout());
                return;
            }

            tracing::debug!(email = %self.target_email, attempt, "Checking email status");

            match self.poll_once().await {
                Some(StatusKind::Pending) => {}
                _ => return,
            }
        }
    }

    /// Queries and renders, unless the poller was stopped while the query was in flight.
    async fn poll_once(&self) -> Option<StatusKind> {
        let status = self.query_status().await;

        if !self.render_if_live(&status) {
            return None;
        }
        Some(status.status)
    }

    /// Renders `status` unless the poller has been stopped; false if it was dropped.
    fn render_if_live(&self, status: &PollStatus) -> bool {
        if self.cancel.is_cancelled() {
            tracing::debug!(email = %self.target_email, status = %status.status, "Discarding email status after stop");
            return false;
        }

        self.render(status);
        true
    }

    /// Sleeps for `delay`; false if the poller was stopped first.
    async fn wait(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusQueryError;
    use crate::services::status_client::MockStatusSource;
    use crate::test_utils::test_helpers::RecordingDisplay;
    use mockall::predicate::*;

    fn poller_with(source: MockStatusSource, display: Arc<RecordingDisplay>) -> StatusPoller {
        StatusPoller::new(
            "a@b.com",
            EmailCategory::Verification,
            PollSettings::default(),
            Arc::new(source),
            display,
        )
    }

    #[tokio::test]
    async fn test_query_status_passes_email_and_category() {
        let mut source = MockStatusSource::new();
        source
            .expect_fetch_status()
            .with(eq("a@b.com"), eq(EmailCategory::Verification))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(PollStatus::sent()) }));

        let poller = poller_with(source, Arc::new(RecordingDisplay::default()));
        assert_eq!(poller.query_status().await, PollStatus::sent());
    }

    #[tokio::test]
    async fn test_query_status_turns_failures_into_error_status() {
        let mut source = MockStatusSource::new();
        source
            .expect_fetch_status()
            .times(1)
            .returning(|_, _| Box::pin(async { Err(StatusQueryError::HttpStatus(503)) }));

        let poller = poller_with(source, Arc::new(RecordingDisplay::default()));
        let status = poller.query_status().await;

        assert_eq!(status.status, StatusKind::Error);
        assert_eq!(status.message.as_deref(), Some("HTTP error! status: 503"));
    }

    #[tokio::test]
    async fn test_render_terminal_status_stops_poller() {
        let display = Arc::new(RecordingDisplay::default());
        let poller = poller_with(MockStatusSource::new(), display.clone());

        poller.render(&PollStatus::sent());

        assert_eq!(poller.phase(), PollPhase::Stopped);
        assert!(!poller.is_polling());
        let last = display.last().expect("a view was applied");
        assert_eq!(last.message_class(), "alert alert-success");
        assert!(!last.spinner_visible);
    }

    #[tokio::test]
    async fn test_render_pending_keeps_poller_alive() {
        let display = Arc::new(RecordingDisplay::default());
        let poller = poller_with(MockStatusSource::new(), display.clone());

        poller.render(&PollStatus::pending());

        assert_eq!(poller.phase(), PollPhase::Idle);
        assert!(display.last().expect("a view was applied").spinner_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_terminal_response_skips_interval() {
        let mut source = MockStatusSource::new();
        source
            .expect_fetch_status()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(PollStatus::new(StatusKind::NotFound)) }));

        let display = Arc::new(RecordingDisplay::default());
        let poller = poller_with(source, display.clone());
        poller.start();
        assert_eq!(poller.phase(), PollPhase::InitialDelay);

        poller.stopped().await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(display.statuses(), vec![StatusKind::NotFound]);
        assert_eq!(poller.attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_stopped_poller_drops_late_timeout() {
        let display = Arc::new(RecordingDisplay::default());
        let poller = poller_with(MockStatusSource::new(), display.clone());

        poller.stop();

        assert!(!poller.inner.render_if_live(&PollStatus::timeout()));
        assert!(display.views().is_empty());
    }

    #[tokio::test]
    async fn test_zero_interval_settles_with_error() {
        let display = Arc::new(RecordingDisplay::default());
        let poller = StatusPoller::new(
            "a@b.com",
            EmailCategory::Verification,
            PollSettings {
                initial_delay: Duration::from_secs(1),
                interval: Duration::ZERO,
                max_attempts: 3,
            },
            Arc::new(MockStatusSource::new()),
            display.clone(),
        );

        poller.start();
        tokio::time::timeout(Duration::from_secs(1), poller.stopped())
            .await
            .expect("poller should stop immediately");

        assert!(!poller.is_polling());
        assert_eq!(poller.phase(), PollPhase::Stopped);
        assert_eq!(display.statuses(), vec![StatusKind::Error]);
    }

    #[tokio::test]
    async fn test_start_after_stop_is_ignored() {
        let poller = poller_with(MockStatusSource::new(), Arc::new(RecordingDisplay::default()));
        poller.stop();
        poller.start();

        assert!(!poller.is_polling());
        assert_eq!(poller.phase(), PollPhase::Stopped);
    }
}
