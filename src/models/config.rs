//! Configuration model loaded from external sources.

use serde::Deserialize;
use validator::Validate;

use crate::pagination::WindowPolicy;

fn default_api_timeout_secs() -> u64 {
    10
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub domain: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub port: u16,
    #[validate(length(min = 1))]
    pub templates_dir: String,
    /// Shared with the auth service: signs the session cookie and the JWT.
    #[validate(length(min = 32))]
    pub secret: String,
    #[validate(url)]
    pub auth_service_url: String,
    /// Base url of the university REST API.
    #[validate(url)]
    pub api_base_url: String,
    #[validate(length(min = 1))]
    pub resources_path: String,
    #[serde(default = "default_api_timeout_secs")]
    #[validate(range(min = 1))]
    pub api_timeout_secs: u64,
    #[serde(default)]
    pub pagination_policy: WindowPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            domain: "campus.local".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            templates_dir: "templates/**/*".to_string(),
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            auth_service_url: "http://auth.campus.local".to_string(),
            api_base_url: "http://api.campus.local/v1".to_string(),
            resources_path: "config/resources.json".to_string(),
            api_timeout_secs: 10,
            pagination_policy: WindowPolicy::Overlapping,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn short_secret_and_bad_urls_fail() {
        let mut bad = config();
        bad.secret = "short".to_string();
        bad.api_base_url = "not a url".to_string();

        let errors = bad.validate().expect_err("invalid config");
        let fields = errors.field_errors();

        assert!(fields.contains_key("secret"));
        assert!(fields.contains_key("api_base_url"));
    }
}
