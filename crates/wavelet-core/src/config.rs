use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; API keys are optional and select the
/// offline analyzer / demo catalog when absent.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let env = parse_environment(&or_default("WAVELET_ENV", "development"))?;

    let bind_addr = or_default("WAVELET_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("WAVELET_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("WAVELET_LOG_LEVEL", "info");

    let monitor_interval_minutes = parse_u64("WAVELET_MONITOR_INTERVAL_MINUTES", "30")?;
    if monitor_interval_minutes == 0 {
        return Err(invalid(
            "WAVELET_MONITOR_INTERVAL_MINUTES",
            "must be at least 1".to_string(),
        ));
    }
    let monitor_max_results = or_default("WAVELET_MONITOR_MAX_RESULTS", "5")
        .parse::<u32>()
        .map_err(|e| invalid("WAVELET_MONITOR_MAX_RESULTS", e.to_string()))?;
    let seed_demo_data = parse_bool(
        "WAVELET_SEED_DEMO_DATA",
        &or_default("WAVELET_SEED_DEMO_DATA", "true"),
    )?;

    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_model = or_default("OPENAI_MODEL", "gpt-4o");
    let openai_base_url = or_default("OPENAI_BASE_URL", "https://api.openai.com/v1");
    let youtube_api_key = optional("YOUTUBE_API_KEY");
    let http_timeout_secs = parse_u64("WAVELET_HTTP_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        monitor_interval_minutes,
        monitor_max_results,
        seed_demo_data,
        openai_api_key,
        openai_model,
        openai_base_url,
        youtube_api_key,
        http_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "WAVELET_ENV".to_string(),
            reason: format!("expected development, test, or production, got '{other}'"),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}
