//! Server configuration

use clap::Parser;

/// Support ticket analytics dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "support-insights", version, about)]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "INSIGHTS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(long, env = "INSIGHTS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "INSIGHTS_MAX_UPLOAD_BYTES", default_value_t = 16 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Minutes an uploaded dataset stays available
    #[arg(long, env = "INSIGHTS_SESSION_TTL_MINUTES", default_value_t = 120)]
    pub session_ttl_minutes: u64,

    /// Most datasets held in memory at once
    #[arg(long, env = "INSIGHTS_MAX_SESSIONS", default_value_t = 64)]
    pub max_sessions: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
