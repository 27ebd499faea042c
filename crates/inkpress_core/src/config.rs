//! Site configuration loading and validation.
//!
//! # Responsibility
//! - Load `inkpress.toml` into a validated `SiteConfig`.
//! - Resolve relative content/output paths against the config location.
//!
//! # Invariants
//! - `base_url` carries a scheme and no trailing slash after load.
//! - Defaulted paths keep the conventional layout: `content/`, `public/`,
//!   `static/images/`.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors surfaced before any pipeline work starts.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for the expected shape.
    Parse(toml::de::Error),
    /// `base_url` is empty or missing a scheme.
    InvalidBaseUrl(String),
    /// `custom_domain` is present but blank.
    EmptyCustomDomain,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidBaseUrl(value) => write!(
                f,
                "invalid base_url `{value}`; expected an http(s) URL"
            ),
            Self::EmptyCustomDomain => write!(f, "custom_domain must not be blank when set"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Validated site configuration consumed by the build pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteConfig {
    /// Site title shown on the index page.
    pub title: String,
    /// Canonical site URL used for absolute links. No trailing slash.
    pub base_url: String,
    /// When set, written verbatim into the `CNAME` marker file.
    #[serde(default)]
    pub custom_domain: Option<String>,
    /// Directory holding the markdown corpus.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    /// Publish directory the build writes into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory image references must resolve under.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    /// Collapse inter-tag whitespace in emitted HTML.
    #[serde(default)]
    pub minify: bool,
    /// Render drafts too. Preview builds only.
    #[serde(default)]
    pub include_drafts: bool,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("static/images")
}

impl SiteConfig {
    /// Loads and validates a config file.
    ///
    /// Relative `content_dir`/`output_dir`/`images_dir` are resolved against
    /// the config file's parent directory.
    ///
    /// # Errors
    /// - `Io` when the file cannot be read.
    /// - `Parse` when the TOML shape is wrong.
    /// - Validation errors per [`SiteConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: SiteConfig = toml::from_str(&raw)?;
        config.validate()?;

        if let Some(root) = path.parent() {
            config.content_dir = resolve(root, &config.content_dir);
            config.output_dir = resolve(root, &config.output_dir);
            config.images_dir = resolve(root, &config.images_dir);
        }
        Ok(config)
    }

    /// Validates field invariants and normalizes `base_url`.
    pub fn validate(&mut self) -> ConfigResult<()> {
        let base_url = self.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();

        if let Some(domain) = &self.custom_domain {
            if domain.trim().is_empty() {
                return Err(ConfigError::EmptyCustomDomain);
            }
        }
        Ok(())
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SiteConfig};
    use std::path::PathBuf;

    fn base() -> SiteConfig {
        SiteConfig {
            title: "blog".to_string(),
            base_url: "https://example.com/".to_string(),
            custom_domain: None,
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("public"),
            images_dir: PathBuf::from("static/images"),
            minify: false,
            include_drafts: false,
        }
    }

    #[test]
    fn validate_strips_trailing_slash() {
        let mut config = base();
        config.validate().expect("valid config");
        assert_eq!(config.base_url, "https://example.com");
    }

    #[test]
    fn validate_rejects_schemeless_base_url() {
        let mut config = base();
        config.base_url = "example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn validate_rejects_blank_custom_domain() {
        let mut config = base();
        config.custom_domain = Some("  ".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyCustomDomain)
        ));
    }

    #[test]
    fn toml_defaults_apply() {
        let config: SiteConfig =
            toml::from_str("title = \"b\"\nbase_url = \"https://b.dev\"\n").expect("parse");
        assert_eq!(config.content_dir, PathBuf::from("content"));
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert!(!config.minify);
    }
}
