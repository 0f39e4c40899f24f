use std::{
    env,
    future::Future,
    sync::OnceLock,
    time::{Duration, Instant},
};

use tracing::Instrument;

const DEBUG_DELAY_ENV: &str = "STOCKMATE_DEBUG_STORE_DELAY_MS";

/// Runs one SDK call inside the given span, logging its duration. Honors the
/// debug delay knob so slow-network behavior can be exercised locally.
pub async fn send_store_request<F, Fut, T, E>(span: tracing::Span, send: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    async move {
        debug_store_delay().await;
        let started = Instant::now();
        let result = send().await;
        match &result {
            Ok(_) => tracing::trace!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request_ok"
            ),
            Err(err) => tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = ?err,
                "request_failed"
            ),
        }
        result
    }
    .instrument(span)
    .await
}

async fn debug_store_delay() {
    if let Some(delay) = debug_store_delay_duration() {
        tracing::trace!(delay_ms = delay.as_millis() as u64, "Applying debug store delay");
        tokio::time::sleep(delay).await;
    }
}

fn debug_store_delay_duration() -> Option<Duration> {
    static DELAY: OnceLock<Option<Duration>> = OnceLock::new();
    *DELAY.get_or_init(|| {
        let Ok(raw) = env::var(DEBUG_DELAY_ENV) else {
            return None;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<u64>() {
            Ok(0) => None,
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => {
                tracing::warn!(
                    env = DEBUG_DELAY_ENV,
                    value = %raw,
                    "Invalid store debug delay"
                );
                None
            }
        }
    })
}
