use crate::mocked_http::MockedHttp;
use lazy_static::lazy_static;
use std::env;

pub const MOCK_SWITCH_VARIABLE: &str = "MOCK_SWITCH";
pub const NOT_FOUND_URL: &str = "http://404.com";

lazy_static! {
    static ref MOCK_SWITCH_ENABLED: bool =
        mock_switch_enabled(env::var(MOCK_SWITCH_VARIABLE).ok().as_deref());
}

/// Only the exact value `true` turns interception on.
pub fn mock_switch_enabled(value: Option<&str>) -> bool {
    value == Some("true")
}

#[derive(Debug, Clone)]
pub struct InterceptionConfiguration {
    enabled: bool,
    not_found_url: String,
}

impl InterceptionConfiguration {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            not_found_url: NOT_FOUND_URL.into(),
        }
    }

    /// Configuration driven by `MOCK_SWITCH`, which is read once per process.
    pub fn from_env() -> Self {
        Self::new(*MOCK_SWITCH_ENABLED)
    }

    pub fn set_enabled(&mut self, value: bool) {
        self.enabled = value;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_not_found_url<S: Into<String>>(&mut self, not_found_url: S) {
        self.not_found_url = not_found_url.into();
    }

    pub fn not_found_url(&self) -> &str {
        &self.not_found_url
    }

    pub fn mocked_http(&self) -> MockedHttp {
        MockedHttp::with_not_found_url(self.not_found_url.as_str())
    }
}

impl Default for InterceptionConfiguration {
    fn default() -> Self {
        Self::from_env()
    }
}
