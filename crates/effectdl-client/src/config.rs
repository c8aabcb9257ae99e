//! Client configuration.

use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8081";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_PAGES: u32 = 500;

/// Configuration for [`crate::EffectService`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the effect API, without a trailing path.
    pub base_url: String,
    /// Per-request timeout applied to every remote call.
    pub request_timeout: Duration,
    /// Upper bound on list pages per sync run. The upstream pager is not
    /// trusted to terminate; exceeding this cap is a fatal error.
    pub max_pages: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl ClientConfig {
    /// Returns the default configuration, with the base URL overridden by
    /// the `EFFECTDL_API_URL` environment variable when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("EFFECTDL_API_URL") {
            config.base_url = url;
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub(crate) fn list_url(&self) -> String {
        self.endpoint("get-effect-list")
    }

    pub(crate) fn image_url(&self) -> String {
        self.endpoint("get-effect-image")
    }

    pub(crate) fn change_url(&self) -> String {
        self.endpoint("change-effect")
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}
