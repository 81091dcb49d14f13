//! Dashboard configuration: where the invoice API lives.

/// Env var holding the API base URL.
pub const API_URL_VAR: &str = "BILLING_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    api_url: String,
}

impl DashboardConfig {
    /// Use `value` as the base URL, falling back to [`DEFAULT_API_URL`]
    /// when absent or blank. Trailing slashes are dropped.
    pub fn from_value(value: Option<&str>) -> Self {
        let api_url = value
            .map(|v| v.trim().trim_end_matches('/'))
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string();
        Self { api_url }
    }

    /// Read `BILLING_API_URL`: from the process environment on native
    /// targets, as captured at compile time on wasm32 (the browser has no
    /// process environment).
    pub fn load() -> Self {
        #[cfg(target_arch = "wasm32")]
        let value = option_env!("BILLING_API_URL").map(str::to_string);
        #[cfg(not(target_arch = "wasm32"))]
        let value = std::env::var(API_URL_VAR).ok();

        Self::from_value(value.as_deref())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::from_value(None)
    }
}
