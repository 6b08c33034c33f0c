//! Sequential retry loop around a single recognition call.

use std::path::Path;
use std::time::Duration;

use super::domain::{RecognitionError, RecognizedTrack};
use super::traits::Recognizer;

/// How often to ask the service and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (0 behaves like 1)
    pub attempts: u32,
    /// Pause between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    fn effective_attempts(&self) -> u32 {
        self.attempts.max(1)
    }
}

/// Ask `recognizer` about `path` until it returns a track or the attempts run out.
///
/// Both errors and empty answers count as failed attempts. The delay is only
/// slept between attempts. A permanent error (missing tool, rejected API key)
/// is returned at once. If every attempt came back empty the result is
/// [`RecognitionError::NoMatch`], otherwise the last error is reported in
/// [`RecognitionError::Exhausted`].
pub async fn recognize_with_retry(
    recognizer: &dyn Recognizer,
    path: &Path,
    policy: RetryPolicy,
) -> Result<RecognizedTrack, RecognitionError> {
    let attempts = policy.effective_attempts();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut last_error: Option<RecognitionError> = None;

    for attempt in 1..=attempts {
        match recognizer.recognize(path).await {
            Ok(Some(track)) => {
                tracing::debug!(
                    "[{}] recognized by {} on attempt {}",
                    file_name,
                    recognizer.name(),
                    attempt
                );
                return Ok(track);
            }
            Ok(None) => {
                tracing::debug!("[{}] attempt {}: no match", file_name, attempt);
            }
            Err(e) if e.is_permanent() => return Err(e),
            Err(e) => {
                tracing::debug!("[{}] attempt {}: {}", file_name, attempt, e);
                last_error = Some(e);
            }
        }

        if attempt < attempts && !policy.delay.is_zero() {
            tokio::time::sleep(policy.delay).await;
        }
    }

    Err(match last_error {
        None => RecognitionError::NoMatch,
        Some(e) => RecognitionError::Exhausted {
            attempts,
            last_error: e.to_string(),
        },
    })
}
