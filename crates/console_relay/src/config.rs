use std::env;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub backend_url: String,
    pub bind_addr: String,
}

impl RelayConfig {
    /// Resolves the configuration once at process start. `BACKEND_URL`
    /// falls back to the local development backend when unset.
    pub fn from_env() -> Self {
        let mut backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        while backend_url.ends_with('/') {
            backend_url.pop();
        }
        let bind_addr = env::var("RELAY_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        Self {
            backend_url,
            bind_addr,
        }
    }
}
