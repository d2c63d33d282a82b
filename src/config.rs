//! Search configuration: upstream endpoints and time budgets.

use std::time::Duration;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_USER_AGENT: &str = "stayfinder/0.3 (hotel-search)";

/// Endpoints, identity and per-call timeouts for one deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub nominatim_url: String,
    pub overpass_url: String,
    pub user_agent: String,
    /// How long the handler waits for the live pipeline.
    pub request_deadline: Duration,
    pub classify_timeout: Duration,
    pub geocode_timeout: Duration,
    pub reverse_timeout: Duration,
    pub overpass_timeout: Duration,
    pub text_search_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_deadline: Duration::from_secs(6),
            classify_timeout: Duration::from_secs(5),
            geocode_timeout: Duration::from_secs(8),
            reverse_timeout: Duration::from_secs(6),
            overpass_timeout: Duration::from_secs(8),
            text_search_timeout: Duration::from_secs(8),
        }
    }
}
