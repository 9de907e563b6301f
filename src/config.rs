//! Widget configuration

use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_WELCOME: &str = "👋 **Welcome!** How can I help you today?";

/// Configuration for the assistant widget and its backend endpoints
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Origin serving `/chat` and `/api/calendar/*`
    pub api_base: String,
    pub request_timeout: Duration,
    pub title: String,
    pub subtitle: String,
    /// Display label for slot times; not used for conversion
    pub timezone: String,
    pub welcome_message: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            title: "Virtual Front Desk".to_string(),
            subtitle: "Book, pricing, providers".to_string(),
            timezone: "America/Denver".to_string(),
            welcome_message: DEFAULT_WELCOME.to_string(),
        }
    }
}

impl WidgetConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: std::env::var("FRONT_DESK_API_BASE").unwrap_or(defaults.api_base),
            request_timeout: std::env::var("FRONT_DESK_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.request_timeout, Duration::from_secs),
            title: std::env::var("FRONT_DESK_TITLE").unwrap_or(defaults.title),
            subtitle: std::env::var("FRONT_DESK_SUBTITLE").unwrap_or(defaults.subtitle),
            timezone: std::env::var("FRONT_DESK_TIMEZONE").unwrap_or(defaults.timezone),
            welcome_message: defaults.welcome_message,
        }
    }

    /// Point the widget at a different origin
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn chat_url(&self) -> String {
        self.endpoint("chat")
    }

    pub fn availability_url(&self) -> String {
        self.endpoint("api/calendar/availability")
    }

    pub fn booking_url(&self) -> String {
        self.endpoint("api/calendar/book")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base.trim_end_matches('/'))
    }
}
