//! TOML configuration file.
//!
//! ```toml
//! default_country = "DE"
//! catalog = "countries.toml"
//!
//! [factors]
//! car = 0.17
//!
//! [display]
//! locale = "fr"
//! zero_sign = "plus"
//! ```
//!
//! Every key is optional. A relative `catalog` path is resolved against the
//! directory holding the configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calculator::EmissionFactors;
use crate::catalog::Catalog;
use crate::error::FootprintError;
use crate::options::{DisplayOptions, NumberLocale, ZeroSign};
use crate::Result;

/// `[display]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// `plain` or `fr`
    pub locale: Option<String>,
    pub zero_sign: Option<ZeroSign>,
}

/// Settings read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FootprintConfig {
    pub default_country: Option<String>,
    pub catalog: Option<PathBuf>,
    pub factors: EmissionFactors,
    pub display: DisplayConfig,
}

impl FootprintConfig {
    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FootprintError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: FootprintConfig =
            toml::from_str(&text).map_err(|e| FootprintError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if let Some(dir) = path.parent() {
            config.catalog = config
                .catalog
                .take()
                .map(|catalog| if catalog.is_relative() { dir.join(catalog) } else { catalog });
        }
        // Unknown locales are a load error.
        config.display_options().map_err(|e| match e {
            FootprintError::InvalidInput(message) => FootprintError::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Display options described by the `[display]` table.
    pub fn display_options(&self) -> Result<DisplayOptions> {
        let mut options = DisplayOptions::new();
        if let Some(locale) = &self.display.locale {
            let locale = locale
                .parse::<NumberLocale>()
                .map_err(FootprintError::InvalidInput)?;
            options = options.locale(locale);
        }
        if let Some(zero_sign) = self.display.zero_sign {
            options = options.zero_sign(zero_sign);
        }
        Ok(options)
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("footprint.toml");
        fs::write(&path, "").unwrap();

        let config = FootprintConfig::load(&path).unwrap();
        assert_eq!(config, FootprintConfig::default());
        assert_eq!(config.display_options().unwrap(), DisplayOptions::default());
    }

    #[test]
    fn test_full_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("footprint.toml");
        fs::write(
            &path,
            r#"
default_country = "DE"
catalog = "catalog.toml"

[factors]
car = 0.17

[display]
locale = "fr"
zero_sign = "plus"
"#,
        )
        .unwrap();

        let config = FootprintConfig::load(&path).unwrap();
        assert_eq!(config.default_country.as_deref(), Some("DE"));
        assert_eq!(config.catalog, Some(dir.path().join("catalog.toml")));
        assert_eq!(config.factors.car, 0.17);
        assert_eq!(config.factors.bus, EmissionFactors::default().bus);

        let options = config.display_options().unwrap();
        assert_eq!(options.locale, NumberLocale::french());
        assert_eq!(options.zero_sign, ZeroSign::Plus);
    }

    #[test]
    fn test_bad_locale_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("footprint.toml");
        fs::write(&path, "[display]\nlocale = \"xx\"\n").unwrap();

        let err = FootprintConfig::load(&path).unwrap_err();
        assert!(matches!(err, FootprintError::Config { .. }));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("footprint.toml");
        fs::write(&path, "colour = \"green\"\n").unwrap();

        assert!(FootprintConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_optional_none() {
        let config = FootprintConfig::load_optional(None).unwrap();
        assert!(config.catalog.is_none());
        assert!(config.load_catalog().unwrap().country("FR").is_some());
    }

    #[test]
    fn test_missing_file() {
        let err = FootprintConfig::load("/nonexistent/footprint.toml").unwrap_err();
        assert!(matches!(err, FootprintError::FileRead { .. }));
    }
}
