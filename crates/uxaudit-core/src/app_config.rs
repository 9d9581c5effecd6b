#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Process-wide default key; a session key entered at runtime overrides it.
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    /// `None` leaves the transport default in place.
    pub request_timeout_secs: Option<u64>,
    pub stage_interval_ms: u64,
    pub thinking_budget: u32,
    pub top_p: f64,
    pub top_k: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("stage_interval_ms", &self.stage_interval_ms)
            .field("thinking_budget", &self.thinking_budget)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .finish()
    }
}
