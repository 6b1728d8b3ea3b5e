//! Window configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::DomResult;

/// Host window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Document URL
    pub url: String,
    /// Viewport width in CSS pixels
    pub viewport_width: f64,
    /// Viewport height in CSS pixels
    pub viewport_height: f64,
}

impl WindowConfig {
    /// Parsed document URL
    pub fn parsed_url(&self) -> DomResult<Url> {
        Ok(Url::parse(&self.url)?)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            viewport_width: 1024.0,
            viewport_height: 768.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomError;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: WindowConfig =
            serde_json::from_str(r#"{ "viewport_height": 400 }"#).unwrap();
        assert_eq!(config.viewport_height, 400.0);
        assert_eq!(config.viewport_width, 1024.0);
        assert_eq!(config.url, "about:blank");
    }

    #[test]
    fn test_invalid_url() {
        let config = WindowConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.parsed_url(), Err(DomError::InvalidUrl(_))));
        assert!(WindowConfig::default().parsed_url().is_ok());
    }
}
