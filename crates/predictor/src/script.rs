//! Predictor backed by the model script run as a child process.
//!
//! The script is invoked as `<python> <script> <variant> <record-json>`.
//! It may log freely to stderr and to stdout; the last non-empty stdout
//! line must be a JSON object, either a risk result or `{"error": ...}`.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use obrisk_core::intake::{IntakeRecord, Variant};
use obrisk_core::risk::RiskAssessment;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::{Predictor, PredictorError};

/// Maximum stdout or stderr size captured per stream (1 MiB).
const MAX_OUTPUT_BYTES: u64 = 1024 * 1024;

/// Runs the predictor script once per request.
#[derive(Debug, Clone)]
pub struct ScriptPredictor {
    python_bin: String,
    script_path: PathBuf,
    timeout: Duration,
}

impl ScriptPredictor {
    pub fn new(
        python_bin: impl Into<String>,
        script_path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            python_bin: python_bin.into(),
            script_path: script_path.into(),
            timeout,
        }
    }

}

#[async_trait]
impl Predictor for ScriptPredictor {
    async fn predict(
        &self,
        variant: Variant,
        record: &IntakeRecord,
    ) -> Result<RiskAssessment, PredictorError> {
        if !self.ready().await {
            return Err(PredictorError::ScriptNotFound(
                self.script_path.display().to_string(),
            ));
        }

        let payload = serde_json::to_string(record)
            .map_err(|e| PredictorError::MalformedOutput(e.to_string()))?;

        let mut cmd = Command::new(&self.python_bin);
        cmd.arg(&self.script_path)
            .arg(variant.as_str())
            .arg(payload)
            .env("PYTHONUNBUFFERED", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd.spawn()?;

        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        // On timeout `child` is dropped, which kills the process.
        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_elapsed) => {
                return Err(PredictorError::Timeout {
                    elapsed_ms: start.elapsed().as_millis() as u64,
                })
            }
        };

        let stdout_bytes = stdout_task.await.unwrap_or_default();
        let stderr_bytes = stderr_task.await.unwrap_or_default();
        let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();

        tracing::debug!(
            variant = %variant,
            exit_code = status.code(),
            duration_ms = start.elapsed().as_millis() as u64,
            stderr_len = stderr.len(),
            "Predictor script finished"
        );

        if !status.success() {
            return Err(PredictorError::ExecutionFailed {
                exit_code: status.code().unwrap_or(-1),
                stderr,
            });
        }

        parse_output(&stdout)
    }

    async fn ready(&self) -> bool {
        tokio::fs::metadata(&self.script_path)
            .await
            .is_ok_and(|meta| meta.is_file())
    }

    fn name(&self) -> &'static str {
        "script"
    }
}

/// Parse the script's stdout: the last non-empty line is the result.
pub fn parse_output(stdout: &str) -> Result<RiskAssessment, PredictorError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .ok_or_else(|| PredictorError::MalformedOutput("empty output".to_string()))?;

    let value: Value = serde_json::from_str(line)
        .map_err(|e| PredictorError::MalformedOutput(format!("{e}: {line}")))?;

    if let Some(err) = value.get("error") {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(PredictorError::Rejected(message));
    }

    serde_json::from_value(value).map_err(|e| PredictorError::MalformedOutput(e.to_string()))
}

/// Read an entire output stream, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h.take(MAX_OUTPUT_BYTES).read_to_end(&mut buf).await;
    }
    buf
}
