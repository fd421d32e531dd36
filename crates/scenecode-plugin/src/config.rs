//! Deployment configuration for the plugin.

use serde::{Deserialize, Serialize};

use scenecode_backend::{BackendConfig, OAuthConfig};

/// Where the backend API and the web app live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    pub backend: BackendConfig,
    pub oauth: OAuthConfig,
}

impl PluginConfig {
    /// Backend and OAuth endpoints sharing one API origin.
    pub fn new(api_url: impl Into<String>, web_app_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            backend: BackendConfig::new(api_url.clone()),
            oauth: OAuthConfig::new(web_app_url, api_url),
        }
    }

    pub fn web_app_url(&self) -> &str {
        &self.oauth.web_app_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_api_origin() {
        let config = PluginConfig::new("https://api.test", "https://app.test");
        assert_eq!(config.backend.base_url, "https://api.test");
        assert_eq!(config.oauth.api_url, "https://api.test");
        assert_eq!(config.web_app_url(), "https://app.test");
    }

    #[test]
    fn test_deserialize() {
        let config: PluginConfig = serde_json::from_str(
            r#"{
                "backend": {"baseUrl": "https://api.test", "headers": {"x-env": "dev"}},
                "oauth": {"webAppUrl": "https://app.test", "apiUrl": "https://api.test", "clientId": "c", "redirectUri": "figma://cb"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.backend.headers["x-env"], "dev");
        assert_eq!(config.oauth.client_id, "c");
    }
}
