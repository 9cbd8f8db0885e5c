//! Clients for the external risk predictor.
//!
//! The model itself is opaque. It is reached either by spawning the
//! predictor script ([`ScriptPredictor`]) or by calling the model service
//! over HTTP ([`HttpPredictor`]). Both sit behind the [`Predictor`] trait so
//! the API layer holds one `Arc<dyn Predictor>`.

pub mod features;
pub mod http;
pub mod script;

use async_trait::async_trait;
use obrisk_core::intake::{IntakeRecord, Variant};
use obrisk_core::risk::RiskAssessment;

pub use http::HttpPredictor;
pub use script::ScriptPredictor;

/// Errors from any predictor backend.
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    /// The configured predictor script does not exist.
    #[error("Predictor script not found: {0}")]
    ScriptNotFound(String),

    /// Spawning or talking to the child process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The predictor did not answer within the configured timeout.
    #[error("Predictor timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The predictor process exited with a non-zero code.
    #[error("Predictor failed with exit code {exit_code}: {stderr}")]
    ExecutionFailed { exit_code: i32, stderr: String },

    /// The predictor answered with something that is not a risk result.
    #[error("Malformed predictor output: {0}")]
    MalformedOutput(String),

    /// The predictor ran but reported an error for this record.
    #[error("Predictor rejected the record: {0}")]
    Rejected(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model service returned a non-2xx status code.
    #[error("Predictor service error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// A risk scoring backend.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Score an accepted intake record for `variant`.
    async fn predict(
        &self,
        variant: Variant,
        record: &IntakeRecord,
    ) -> Result<RiskAssessment, PredictorError>;

    /// Whether the backend can currently take requests. Reported by the
    /// health endpoint; must not score anything.
    async fn ready(&self) -> bool;

    /// Short backend name for logs and the health report.
    fn name(&self) -> &'static str;
}
