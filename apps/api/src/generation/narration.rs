//! Generate-or-fallback: every narrated field is produced by trying the LLM
//! first and substituting a deterministic, network-free value on any failure.

use std::future::Future;

use tracing::warn;

use crate::generation::cancel::CancelSignal;
use crate::llm_client::LlmError;

/// Where a narrated value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Narrated<T> {
    pub value: T,
    pub source: NarrationSource,
}

impl<T> Narrated<T> {
    pub fn is_fallback(&self) -> bool {
        self.source == NarrationSource::Fallback
    }
}

/// Runs `primary` under `cancel`; on error or cancellation, returns `fallback()`.
/// Cancellation is treated exactly like any other failure of the primary.
pub async fn attempt_or_fallback<T, F, G>(
    stage: &str,
    cancel: &CancelSignal,
    primary: F,
    fallback: G,
) -> Narrated<T>
where
    F: Future<Output = Result<T, LlmError>>,
    G: FnOnce() -> T,
{
    let outcome = match cancel.run(primary).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::Cancelled),
    };

    match outcome {
        Ok(value) => Narrated {
            value,
            source: NarrationSource::Generated,
        },
        Err(LlmError::Disabled) => Narrated {
            value: fallback(),
            source: NarrationSource::Fallback,
        },
        Err(e) => {
            warn!("{stage} failed, using fallback: {e}");
            Narrated {
                value: fallback(),
                source: NarrationSource::Fallback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_is_generated() {
        let out = attempt_or_fallback(
            "test",
            &CancelSignal::never(),
            async { Ok("llm".to_string()) },
            || "template".to_string(),
        )
        .await;
        assert_eq!(out.value, "llm");
        assert_eq!(out.source, NarrationSource::Generated);
    }

    #[tokio::test]
    async fn test_error_uses_fallback() {
        let out = attempt_or_fallback(
            "test",
            &CancelSignal::never(),
            async { Err::<String, _>(LlmError::EmptyContent) },
            || "template".to_string(),
        )
        .await;
        assert_eq!(out.value, "template");
        assert!(out.is_fallback());
    }

    #[tokio::test]
    async fn test_cancellation_uses_fallback() {
        let (handle, signal) = CancelSignal::manual();
        handle.cancel();
        let out = attempt_or_fallback(
            "test",
            &signal,
            std::future::pending::<Result<String, LlmError>>(),
            || "template".to_string(),
        )
        .await;
        assert_eq!(out.value, "template");
        assert!(out.is_fallback());
    }
}
