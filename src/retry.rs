//! Bounded retry with a fixed delay.
//!
//! Every failed attempt takes the same path: back off for the fixed delay
//! while attempts remain, otherwise give up. A failure with the backend's
//! rate-limit signature is logged as such but handled identically.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(60),
        }
    }
}

enum RetryState<T> {
    Attempting(u32),
    Backoff(u32),
    Succeeded(T),
    Exhausted,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it yields a value or the attempts are used up.
    ///
    /// `op` receives the 1-based attempt number. `Ok(None)` means the attempt
    /// finished without a result and counts as a failure. Returns `None`
    /// once every attempt has failed.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Option<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut state = RetryState::Attempting(1);

        loop {
            state = match state {
                RetryState::Attempting(attempt) => match op(attempt).await {
                    Ok(Some(value)) => RetryState::Succeeded(value),
                    outcome => {
                        match outcome {
                            Err(e) if e.is_rate_limit() => {
                                warn!(attempt, "Attempt {} failed: {}", attempt, e);
                                warn!("Rate limit hit for {}", label);
                            }
                            Err(e) => warn!(attempt, "Attempt {} failed: {}", attempt, e),
                            _ => warn!(attempt, "Attempt {} returned no result", attempt),
                        }
                        if attempt < max_attempts {
                            RetryState::Backoff(attempt)
                        } else {
                            RetryState::Exhausted
                        }
                    }
                },
                RetryState::Backoff(attempt) => {
                    info!("Retrying in {} seconds...", self.delay.as_secs());
                    tokio::time::sleep(self.delay).await;
                    RetryState::Attempting(attempt + 1)
                }
                RetryState::Succeeded(value) => return Some(value),
                RetryState::Exhausted => {
                    warn!("Failed to process URL after {} attempts: {}", max_attempts, label);
                    return None;
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    const DELAY: Duration = Duration::from_secs(60);

    /// With the clock paused, elapsed time counts the fixed-length sleeps.
    fn assert_sleeps(start: Instant, sleeps: u32) {
        let elapsed = start.elapsed();
        assert!(elapsed >= DELAY * sleeps, "elapsed {:?}", elapsed);
        assert!(elapsed < DELAY * (sleeps + 1), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_twice_then_success() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let start = Instant::now();

        let result = policy
            .run("https://en.wikipedia.org/wiki/Plato", |attempt| {
                calls += 1;
                async move {
                    if attempt < 3 {
                        Err::<Option<&str>, _>(Error::RateLimited("Rate limit reached".to_string()))
                    } else {
                        Ok(Some("summary"))
                    }
                }
            })
            .await;

        assert_eq!(result, Some("summary"));
        assert_eq!(calls, 3);
        assert_sleeps(start, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_exhausts() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let start = Instant::now();

        let result: Option<String> = policy
            .run("url", |_| {
                calls += 1;
                async { Err::<Option<String>, _>(Error::Llm("page did not load".to_string())) }
            })
            .await;

        assert_eq!(result, None);
        assert_eq!(calls, 3);
        assert_sleeps(start, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_is_retried() {
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let result = policy
            .run("url", |attempt| async move {
                Ok::<_, Error>((attempt == 2).then_some(attempt))
            })
            .await;

        assert_eq!(result, Some(2));
        assert_sleeps(start, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_sleep() {
        let policy = RetryPolicy::new(3, Duration::from_secs(5));
        let start = Instant::now();

        let result = policy.run("url", |_| async { Ok::<_, Error>(Some(1)) }).await;

        assert_eq!(result, Some(1));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy::new(0, DELAY);
        let mut calls = 0;

        let result: Option<()> = policy
            .run("url", |_| {
                calls += 1;
                async { Ok::<_, Error>(None) }
            })
            .await;

        assert_eq!(result, None);
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_names_the_url() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let policy = RetryPolicy::new(2, Duration::ZERO);
        let result: Option<String> = policy
            .run("https://en.wikipedia.org/wiki/Plato", |_| async {
                Err::<Option<String>, _>(Error::RateLimited("Rate limit reached".to_string()))
            })
            .await;

        assert_eq!(result, None);
        let output = logs.contents();
        assert!(output.contains("Rate limit hit for https://en.wikipedia.org/wiki/Plato"));
        assert!(
            output.contains("Failed to process URL after 2 attempts: https://en.wikipedia.org/wiki/Plato"),
            "{}",
            output
        );
    }
}
