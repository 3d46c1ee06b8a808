use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::event::{Event, EventHandler};

/// What to do when a topic handler fails.
///
/// Disabled: the error is returned at once and the message is skipped.
/// Enabled: the handler is called again after a constant interval until it
/// succeeds or the subscription is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeRetry {
    pub enabled: bool,
    pub interval: Duration,
}

impl ConsumeRetry {
    pub async fn deliver(
        &self,
        handler: &EventHandler,
        event: Event,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        let mut attempt: u64 = 1;
        loop {
            let err = match handler(event.clone()).await {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };
            if !self.enabled {
                return Err(err);
            }

            warn!(
                topic = %event.topic,
                attempt,
                error = %err,
                "Handler failed, retrying in {:?}",
                self.interval
            );

            tokio::select! {
                _ = cancel.cancelled() => return Err(err),
                _ = tokio::time::sleep(self.interval) => {}
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::event_handler;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Handler that fails `failures` times, then succeeds.
    fn flaky(failures: usize, calls: Arc<AtomicUsize>) -> EventHandler {
        event_handler(move |_event| {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < failures {
                    anyhow::bail!("attempt {n} failed");
                }
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn test_disabled_returns_first_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let retry = ConsumeRetry {
            enabled: false,
            interval: Duration::from_millis(1),
        };

        let result = retry
            .deliver(
                &flaky(3, Arc::clone(&calls)),
                Event::default(),
                &CancellationToken::new(),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_enabled_retries_until_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let retry = ConsumeRetry {
            enabled: true,
            interval: Duration::from_millis(1),
        };

        retry
            .deliver(
                &flaky(3, Arc::clone(&calls)),
                Event::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_enabled_stops_on_cancel() {
        let calls = Arc::new(AtomicUsize::new(0));
        let retry = ConsumeRetry {
            enabled: true,
            interval: Duration::from_secs(60),
        };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = retry
            .deliver(
                &flaky(usize::MAX, Arc::clone(&calls)),
                Event::default(),
                &cancel,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
