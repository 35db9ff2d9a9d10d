//! Common test utilities for integration tests

use frontdesk_core::Config;
use frontdesk_core::context_error::{Result, ResultExt};
use std::sync::Once;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging once per process
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

/// Test configuration builder
///
/// Replies are instant so conversations run at test speed; everything else
/// starts from the production defaults.
pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    /// Create a new test configuration builder
    pub fn new() -> Self {
        let mut config = Config::default();
        config.receptionist.min_reply_delay_ms = 0;
        config.receptionist.max_reply_delay_ms = 0;
        Self { config }
    }

    /// Start with empty stores instead of demo data
    pub fn without_seed(mut self) -> Self {
        self.config.api.seed_demo_data = false;
        self
    }

    /// Make every receptionist request fail
    pub fn with_failures(mut self) -> Self {
        self.config.receptionist.simulate_failures = true;
        self
    }

    /// Expire sessions immediately so cleanup sweeps them
    pub fn with_instant_session_expiry(mut self) -> Self {
        self.config.session.max_age_hours = 0;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve the router on an ephemeral port, returning the base url and the
/// server task handle
pub async fn spawn_server(config: Config) -> Result<(String, JoinHandle<std::io::Result<()>>)> {
    let app = frontdesk_api::build_router(config)?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move { axum::serve(listener, app).await });
    Ok((format!("http://{addr}"), handle))
}

/// Create a test HTTP client
pub fn create_test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

/// GET a url, returning the status and decoded JSON body
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
) -> Result<(reqwest::StatusCode, serde_json::Value)> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?;
    let status = response.status();
    let body = response
        .json()
        .await
        .with_context(|| format!("decoding GET {url} body"))?;
    Ok((status, body))
}

/// POST one chat turn, returning the status and decoded reply
pub async fn send_chat(
    client: &reqwest::Client,
    base_url: &str,
    message: &str,
    session_id: Option<&str>,
) -> Result<(reqwest::StatusCode, serde_json::Value)> {
    let mut payload = serde_json::json!({ "message": message });
    if let Some(sid) = session_id {
        payload["session_id"] = serde_json::Value::String(sid.to_string());
    }

    let response = client
        .post(format!("{base_url}/api/voice/text-chat"))
        .json(&payload)
        .send()
        .await
        .with_context(|| "chat request failed")?;
    let status = response.status();
    let body = response
        .json()
        .await
        .with_context(|| "decoding chat reply")?;
    Ok((status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_instant_replies() {
        let config = TestConfigBuilder::new().build();
        assert_eq!(config.receptionist.min_reply_delay_ms, 0);
        assert_eq!(config.receptionist.max_reply_delay_ms, 0);
        assert!(config.api.seed_demo_data);
    }

    #[test]
    fn builder_switches_compose() {
        let config = TestConfigBuilder::new()
            .without_seed()
            .with_failures()
            .with_instant_session_expiry()
            .build();
        assert!(!config.api.seed_demo_data);
        assert!(config.receptionist.simulate_failures);
        assert_eq!(config.session.max_age_hours, 0);
    }
}
