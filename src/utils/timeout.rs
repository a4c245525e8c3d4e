//! Async timeout wrappers and default durations.

use std::future::Future;
use std::time::Duration;

use crate::error::{RconError, Result};

/// Default deadline for connects, the handshake, and individual commands.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Run `fut` under `duration`, mapping expiry to [`RconError::Timeout`].
pub async fn with_timeout<F, T>(fut: F, duration: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(RconError::Timeout),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_before_deadline() {
        let value = with_timeout(async { Ok(5u32) }, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn rejects_after_deadline() {
        let result: Result<()> = with_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            },
            Duration::from_millis(10),
        )
        .await;
        assert!(matches!(result, Err(RconError::Timeout)));
    }
}
