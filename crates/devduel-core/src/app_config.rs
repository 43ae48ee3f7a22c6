use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub model_request_timeout_secs: u64,
    pub github_token: Option<String>,
    pub github_base_url: String,
    pub github_user_agent: String,
    pub github_request_timeout_secs: u64,
    pub github_max_retries: u32,
    pub github_backoff_base_ms: u64,
    /// Daily ceiling on end-to-end comparison runs. Always > 0.
    pub daily_compare_limit: i64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("gemini_api_key", &"[redacted]")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field(
                "model_request_timeout_secs",
                &self.model_request_timeout_secs,
            )
            .field(
                "github_token",
                &self.github_token.as_ref().map(|_| "[redacted]"),
            )
            .field("github_base_url", &self.github_base_url)
            .field("github_user_agent", &self.github_user_agent)
            .field(
                "github_request_timeout_secs",
                &self.github_request_timeout_secs,
            )
            .field("github_max_retries", &self.github_max_retries)
            .field("github_backoff_base_ms", &self.github_backoff_base_ms)
            .field("daily_compare_limit", &self.daily_compare_limit)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
