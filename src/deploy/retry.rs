//! Fixed-attempt retry wrapper for deploy calls
//!
//! Kudu-style deploy endpoints fail most often with transient socket
//! timeouts, so failed calls are re-attempted immediately - no backoff, no
//! failure classification. Individual failures are logged at debug level;
//! only the final exhaustion surfaces as a hard error.

use tracing::debug;

use crate::error::{DeployError, StevedoreError, StevedoreResult};

/// Default upper bound on attempts per deploy call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Invoke `op` up to `max_attempts` times, retrying immediately on any
/// failure.
///
/// Returns on the first success. A `max_attempts` of zero is normalized to
/// one attempt. When every attempt fails, the result is
/// [`StevedoreError::DeployExhausted`] carrying the attempt count and the
/// last underlying error as its source.
pub fn with_retry<F>(operation: &str, max_attempts: u32, mut op: F) -> StevedoreResult<()>
where
    F: FnMut() -> Result<(), DeployError>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match op() {
            Ok(()) => return Ok(()),
            Err(err) => {
                debug!(
                    "{} failed: {}, retrying immediately ({}/{})",
                    operation, err, attempt, max_attempts
                );
                if attempt >= max_attempts {
                    return Err(StevedoreError::DeployExhausted {
                        operation: operation.to_string(),
                        attempts: attempt,
                        last: err,
                    });
                }
            }
        }
    }
}
