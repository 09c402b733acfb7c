use std::path::Path;

use serde::{Deserialize, Serialize};
use tap_urls::DEFAULT_EPHEMERAL_SCHEME;

use crate::error::{SdkError, SdkResult};

/// Process-wide settings, passed explicitly to [`Taproom`](crate::Taproom).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaproomConfig {
    /// Skip check-in validation (cooldown). For local development only.
    pub dev_mode: bool,
    /// URL prefix that marks an image URL as ephemeral.
    pub ephemeral_scheme: String,
    /// Origin embedded in minted `blob:` URLs.
    pub url_origin: String,
    /// Minimum hours between two check-ins by one user at one pub.
    pub check_in_cooldown_hours: u32,
    /// Points for pubs that do not set their own.
    pub points_per_check_in: u32,
}

impl Default for TaproomConfig {
    fn default() -> Self {
        Self {
            dev_mode: false,
            ephemeral_scheme: DEFAULT_EPHEMERAL_SCHEME.to_string(),
            url_origin: "taproom.local".to_string(),
            check_in_cooldown_hours: 24,
            points_per_check_in: 10,
        }
    }
}

impl TaproomConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    fn validate(&self) -> SdkResult<()> {
        if self.ephemeral_scheme.is_empty() {
            return Err(SdkError::Config("ephemeral_scheme must not be empty".into()));
        }
        if self.url_origin.is_empty() {
            return Err(SdkError::Config("url_origin must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = TaproomConfig::default();
        assert!(!c.dev_mode);
        assert_eq!(c.ephemeral_scheme, "blob:");
        assert_eq!(c.check_in_cooldown_hours, 24);
        assert_eq!(c.points_per_check_in, 10);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = TaproomConfig::from_toml_str("dev_mode = true\npoints_per_check_in = 5\n").unwrap();
        assert!(c.dev_mode);
        assert_eq!(c.points_per_check_in, 5);
        assert_eq!(c.url_origin, "taproom.local");
    }

    #[test]
    fn empty_scheme_rejected() {
        let err = TaproomConfig::from_toml_str("ephemeral_scheme = \"\"").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(matches!(
            TaproomConfig::from_toml_str("dev_mode = "),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn load_from_file_roundtrips() {
        let config = TaproomConfig {
            check_in_cooldown_hours: 6,
            ..Default::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes()).unwrap();
        assert_eq!(TaproomConfig::load(file.path()).unwrap(), config);
    }
}
