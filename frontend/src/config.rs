use std::sync::OnceLock;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;

/// Build-time settings. Values come from `UTILITRACK_API_URL` and
/// `UTILITRACK_LOG_LEVEL` when the wasm bundle is compiled.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: log::Level,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("UTILITRACK_API_URL"),
            option_env!("UTILITRACK_LOG_LEVEL"),
        )
    }

    fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        let log_level = log_level
            .and_then(|level| level.trim().parse::<log::Level>().ok())
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            api_base_url,
            log_level,
        }
    }

    /// Joins a backend path onto the base url with exactly one slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

pub fn config() -> &'static AppConfig {
    static CONFIG: OnceLock<AppConfig> = OnceLock::new();
    CONFIG.get_or_init(AppConfig::from_env)
}

/// Origin of the running page, used for checkout return urls.
pub fn app_origin() -> Option<String> {
    web_sys::window().and_then(|window| window.location().origin().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_values(None, None);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.log_level, log::Level::Info);
    }

    #[test]
    fn trims_trailing_slash_and_parses_level() {
        let config = AppConfig::from_values(Some("https://api.example.com/api/"), Some("debug"));
        assert_eq!(config.api_base_url, "https://api.example.com/api");
        assert_eq!(config.log_level, log::Level::Debug);
    }

    #[test]
    fn blank_url_and_bad_level_fall_back() {
        let config = AppConfig::from_values(Some("  "), Some("loud"));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.log_level, log::Level::Info);
    }

    #[test]
    fn endpoint_joins_with_one_slash() {
        let config = AppConfig::from_values(Some("http://host/api"), None);
        assert_eq!(config.endpoint("/Auth/login"), "http://host/api/Auth/login");
        assert_eq!(config.endpoint("Auth/login"), "http://host/api/Auth/login");
    }
}
