use crate::app_config::AppConfig;
use crate::progress::DEFAULT_STAGE_INTERVAL;
use crate::ConfigError;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("UXAUDIT_LOG_LEVEL", "info");

    // Blank values count as unset so an empty `GEMINI_API_KEY=` line in
    // `.env` still lets the session prompt take over.
    let gemini_api_key = ["GEMINI_API_KEY", "API_KEY"]
        .into_iter()
        .filter_map(|var| lookup(var).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty());

    let gemini_base_url = or_default("UXAUDIT_GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
    let gemini_model = or_default("UXAUDIT_GEMINI_MODEL", DEFAULT_GEMINI_MODEL);
    if gemini_model.trim().is_empty() {
        return Err(invalid("UXAUDIT_GEMINI_MODEL", "must not be empty".to_string()));
    }

    let request_timeout_secs = match lookup("UXAUDIT_REQUEST_TIMEOUT_SECS") {
        Ok(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("UXAUDIT_REQUEST_TIMEOUT_SECS", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let default_interval = DEFAULT_STAGE_INTERVAL.as_millis().to_string();
    let stage_interval_ms = parse_u64("UXAUDIT_STAGE_INTERVAL_MS", &default_interval)?;
    if stage_interval_ms == 0 {
        return Err(invalid(
            "UXAUDIT_STAGE_INTERVAL_MS",
            "must be greater than zero".to_string(),
        ));
    }

    let thinking_budget = parse_u32("UXAUDIT_THINKING_BUDGET", "20000")?;
    let top_k = parse_u32("UXAUDIT_TOP_K", "40")?;

    let top_p = or_default("UXAUDIT_TOP_P", "0.95")
        .parse::<f64>()
        .map_err(|e| invalid("UXAUDIT_TOP_P", e.to_string()))?;
    if !(0.0..=1.0).contains(&top_p) {
        return Err(invalid("UXAUDIT_TOP_P", format!("{top_p} is outside [0, 1]")));
    }

    Ok(AppConfig {
        log_level,
        gemini_api_key,
        gemini_base_url,
        gemini_model,
        request_timeout_secs,
        stage_interval_ms,
        thinking_budget,
        top_p,
        top_k,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
