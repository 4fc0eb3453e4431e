use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Holds at most one armed timer. Arming cancels the previous timer before the
/// new one is spawned; dropping the debouncer cancels whatever is pending.
pub struct Debouncer {
    runtime: Handle,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: None,
        }
    }

    pub fn arm<F>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        let timer = token.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // Marks the timer as spent so `is_armed` reports false.
                    timer.cancel();
                    on_fire();
                }
            }
        });
        self.pending = Some(token);
    }

    /// Returns whether a live timer was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(token) => {
                let was_armed = !token.is_cancelled();
                token.cancel();
                was_armed
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
