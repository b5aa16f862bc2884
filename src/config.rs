const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Where the events API lives. Built once and handed to whatever needs it;
/// nothing in this crate reads the environment after construction.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let base_url =
            std::env::var("EVENT_FEED_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self { base_url }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}
