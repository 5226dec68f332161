use std::env;

lazy_static! {
    pub static ref SETTINGS: Settings = Settings::from_env();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub floss_api_url: String,
    pub roamjs_api_url: String,
    pub status_table: String,
    pub launch_function: String,
    pub shutdown_function: String,
    pub product_name: String,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ if lookup("AWS_LAMBDA_FUNCTION_NAME").is_some() => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Settings {
            floss_api_url: trim_url(var("FLOSS_API_URL", "https://api.floss.dev")),
            roamjs_api_url: trim_url(var("ROAMJS_API_URL", "https://api.roamjs.com")),
            status_table: var("WEBSITE_STATUS_TABLE", "RoamJSWebsiteStatuses"),
            launch_function: var("LAUNCH_FUNCTION_NAME", "RoamJS_launch"),
            shutdown_function: var("SHUTDOWN_FUNCTION_NAME", "RoamJS_shutdown"),
            product_name: var("WEBSITE_PRODUCT_NAME", "RoamJS Site"),
            log_filter: var("RUST_LOG", "info"),
            log_format,
        }
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
