pub mod test_helpers {
    use crate::config::PollSettings;
    use crate::error::{DisplayError, StatusQueryError};
    use crate::models::{EmailCategory, PollStatus, StatusKind, StatusView};
    use crate::services::{StatusDisplay, StatusSource};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    /// Settings short enough for tests that run on the real clock.
    pub fn fast_settings() -> PollSettings {
        PollSettings {
            initial_delay: Duration::from_millis(10),
            interval: Duration::from_millis(20),
            max_attempts: 30,
        }
    }

    /// Display that keeps every view it is given.
    #[derive(Default)]
    pub struct RecordingDisplay {
        views: Mutex<Vec<StatusView>>,
    }

    impl RecordingDisplay {
        pub fn views(&self) -> Vec<StatusView> {
            self.views
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        pub fn statuses(&self) -> Vec<StatusKind> {
            self.views().into_iter().map(|view| view.status).collect()
        }

        pub fn last(&self) -> Option<StatusView> {
            self.views().pop()
        }
    }

    impl StatusDisplay for RecordingDisplay {
        fn apply(&self, view: &StatusView) -> Result<(), DisplayError> {
            self.views
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(view.clone());
            Ok(())
        }
    }

    /// Source that replays a fixed script of answers, repeating the last one
    /// once the script runs out.
    pub struct ScriptedSource {
        script: Mutex<VecDeque<Result<PollStatus, String>>>,
        last: Mutex<Option<Result<PollStatus, String>>>,
        latency: Duration,
        calls: AtomicUsize,
        queried: Mutex<Vec<(String, EmailCategory)>>,
    }

    impl ScriptedSource {
        pub fn new(script: Vec<Result<PollStatus, String>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(None),
                latency: Duration::ZERO,
                calls: AtomicUsize::new(0),
                queried: Mutex::new(Vec::new()),
            }
        }

        pub fn always(status: PollStatus) -> Self {
            Self::new(vec![Ok(status)])
        }

        /// Delays every answer by `latency`.
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn queried(&self) -> Vec<(String, EmailCategory)> {
            self.queried
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        fn next_answer(&self) -> Result<PollStatus, String> {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            let next = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();

            match next {
                Some(answer) => {
                    *last = Some(answer.clone());
                    answer
                }
                None => last
                    .clone()
                    .unwrap_or_else(|| Err("empty script".to_string())),
            }
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch_status(
            &self,
            email: &str,
            category: EmailCategory,
        ) -> Result<PollStatus, StatusQueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queried
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((email.to_string(), category));

            let answer = self.next_answer();
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            answer.map_err(StatusQueryError::Decode)
        }
    }
}
