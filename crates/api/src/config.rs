use std::sync::Arc;
use std::time::Duration;

use obrisk_predictor::{HttpPredictor, Predictor, PredictorError, ScriptPredictor};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Maximum pooled database connections (default: `10`).
    pub database_max_connections: u32,
    /// Risk predictor backend.
    pub predictor: PredictorConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                       |
    ///
    /// Predictor variables are listed on [`PredictorConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let database_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_max_connections,
            predictor: PredictorConfig::from_env(),
        }
    }
}

/// Which predictor implementation to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictorBackend {
    /// Spawn `python_bin script_path <variant> <json>` per request.
    Script {
        python_bin: String,
        script_path: String,
    },
    /// POST to `{url}/predict/{variant}`.
    Http { url: String },
}

#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub backend: PredictorBackend,
    /// Per-prediction timeout in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl PredictorConfig {
    /// Load predictor configuration from environment variables.
    ///
    /// | Env Var                  | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `PREDICTOR_BACKEND`      | `script` (or `http`)             |
    /// | `PYTHON_BIN`             | `python3`                        |
    /// | `PREDICTOR_SCRIPT`       | `ml_model/model_predictor.py`    |
    /// | `PREDICTOR_URL`          | `http://localhost:8000`          |
    /// | `PREDICTOR_TIMEOUT_SECS` | `30`                             |
    pub fn from_env() -> Self {
        let backend = match std::env::var("PREDICTOR_BACKEND")
            .unwrap_or_else(|_| "script".into())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "script" => PredictorBackend::Script {
                python_bin: std::env::var("PYTHON_BIN").unwrap_or_else(|_| "python3".into()),
                script_path: std::env::var("PREDICTOR_SCRIPT")
                    .unwrap_or_else(|_| "ml_model/model_predictor.py".into()),
            },
            "http" => PredictorBackend::Http {
                url: std::env::var("PREDICTOR_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".into()),
            },
            other => panic!("PREDICTOR_BACKEND must be 'script' or 'http', got '{other}'"),
        };

        let timeout_secs: u64 = std::env::var("PREDICTOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("PREDICTOR_TIMEOUT_SECS must be a valid u64");

        Self {
            backend,
            timeout_secs,
        }
    }

    /// Construct the configured predictor.
    pub fn build(&self) -> Result<Arc<dyn Predictor>, PredictorError> {
        let timeout = Duration::from_secs(self.timeout_secs);
        let predictor: Arc<dyn Predictor> = match &self.backend {
            PredictorBackend::Script {
                python_bin,
                script_path,
            } => Arc::new(ScriptPredictor::new(
                python_bin.clone(),
                script_path.clone(),
                timeout,
            )),
            PredictorBackend::Http { url } => Arc::new(HttpPredictor::new(url.clone(), timeout)?),
        };
        Ok(predictor)
    }
}
