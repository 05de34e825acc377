use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "model-forward",
    version,
    about = "Reverse proxy that swaps the model of chat-completion requests"
)]
pub struct RuntimeConfig {
    /// Address to bind
    #[arg(long, env = "MODEL_FORWARD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "MODEL_FORWARD_PORT", default_value_t = 17888)]
    pub port: u16,

    /// Base URL of the upstream chat-completion API
    #[arg(
        long,
        alias = "api_base",
        env = "MODEL_FORWARD_API_BASE",
        default_value = "https://api.openai.com"
    )]
    pub api_base: String,

    /// JSON file mapping requested model ids to the ids sent upstream
    #[arg(
        long,
        alias = "model_table",
        env = "MODEL_FORWARD_MODEL_TABLE",
        default_value = "model_table.json"
    )]
    pub model_table: PathBuf,

    /// Give up on the upstream after this many seconds; waits forever when unset
    #[arg(long, env = "MODEL_FORWARD_UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "MODEL_FORWARD_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Path serving Prometheus metrics; no metrics route when unset
    #[arg(long, env = "MODEL_FORWARD_METRICS_PATH")]
    pub metrics_path: Option<String>,
}

impl RuntimeConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(path) = self.metrics_path.as_deref() else {
            return Ok(());
        };
        let reserved = [
            "/",
            crate::docs::STYLESHEET_PATH,
            crate::upstream::CHAT_COMPLETIONS_PATH,
        ];
        if !path.starts_with('/') || path.contains(['{', '}', '*']) || reserved.contains(&path) {
            return Err(ConfigError::InvalidMetricsPath(path.to_string()));
        }
        Ok(())
    }
}
