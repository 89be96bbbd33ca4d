use std::{future::Future, time::Duration};

use sqlx::Error;

const MAX_RETRIES: usize = 3;
const INITIAL_BACKOFF_MS: u64 = 50;
const MAX_BACKOFF_MS: u64 = 1_000;

/// Run a write that may hit `SQLITE_BUSY` under concurrent writers,
/// retrying with doubling backoff before giving up.
pub(crate) async fn retry_on_sqlite_busy<T, F, Fut>(mut op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let mut backoff = Duration::from_millis(INITIAL_BACKOFF_MS);
    for attempt in 0..=MAX_RETRIES {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_sqlite_busy(&err) && attempt < MAX_RETRIES => {
                tokio::time::sleep(backoff).await;
                let next_ms = (backoff.as_millis() as u64)
                    .saturating_mul(2)
                    .min(MAX_BACKOFF_MS);
                backoff = Duration::from_millis(next_ms);
            }
            Err(err) => return Err(err),
        }
    }

    unreachable!("retry loop returns on success or error")
}

fn is_sqlite_busy(err: &Error) -> bool {
    let Some(db_err) = err.as_database_error() else {
        return false;
    };

    if let Some(code) = db_err.code() {
        if code == "5" || code == "6" {
            return true;
        }
    }

    let message = db_err.message();
    message.contains("database is locked") || message.contains("database is busy")
}
