//! Bounded store I/O
//!
//! Network calls to PostgreSQL and Redis are the only suspension points in
//! the request path. Each one is wrapped here so a stalled backend turns into
//! a transient [`StoreError::Timeout`] instead of a hung request.

use std::future::Future;
use std::time::Duration;

use crate::error::{ConfigError, StoreError, StoreResult};

/// Default bound on a single store round trip
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Read `STORE_TIMEOUT_MS` (default: 3000)
pub fn store_timeout_from_env() -> Result<Duration, ConfigError> {
    let millis = crate::env_or("STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT.as_millis() as u64)?;
    if millis == 0 {
        return Err(ConfigError::new("STORE_TIMEOUT_MS", "must be greater than zero"));
    }
    Ok(Duration::from_millis(millis))
}

/// Run a store operation, failing with [`StoreError::Timeout`] after `limit`
pub async fn bounded<T, F>(limit: Duration, operation: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test(start_paused = true)]
    async fn slow_operations_time_out() {
        let result: StoreResult<()> = bounded(Duration::from_secs(1), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(StoreError::Timeout(d)) if d == Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn fast_operations_pass_through() {
        let value = bounded(Duration::from_secs(1), async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);

        let err = bounded::<(), _>(Duration::from_secs(1), async {
            Err(StoreError::Corrupt("x".into()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    #[serial]
    fn zero_timeout_is_rejected() {
        unsafe {
            std::env::set_var("STORE_TIMEOUT_MS", "0");
        }
        assert!(store_timeout_from_env().is_err());
        unsafe {
            std::env::remove_var("STORE_TIMEOUT_MS");
        }
        assert_eq!(store_timeout_from_env().unwrap(), DEFAULT_STORE_TIMEOUT);
    }
}
