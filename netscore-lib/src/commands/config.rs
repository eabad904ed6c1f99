use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked for in the current directory
pub const CONFIG_FILE_NAME: &str = "netscore.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Root of the npm registry
    #[serde(default = "default_npm_registry_url")]
    pub npm_registry_url: String,

    /// Timeout for each HTTP request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Timeout for each git invocation
    #[serde(default = "default_clone_timeout", with = "humantime_serde")]
    pub clone_timeout: Duration,

    /// Time budget for the concurrent scorers of one run
    #[serde(default = "default_scorer_timeout", with = "humantime_serde")]
    pub scorer_timeout: Duration,
}

fn default_github_api_url() -> String {
    crate::facts::github::GITHUB_API_URL.to_string()
}

fn default_npm_registry_url() -> String {
    crate::facts::package_url::NPM_REGISTRY_URL.to_string()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

const fn default_clone_timeout() -> Duration {
    Duration::from_mins(5)
}

const fn default_scorer_timeout() -> Duration {
    Duration::from_mins(10)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicit `config_path` must exist. Otherwise `netscore.toml` in `base_dir`
    /// is used when present, and the built-in defaults when not.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading netscore configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading netscore configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for (name, url) in [("github_api_url", &self.github_api_url), ("npm_registry_url", &self.npm_registry_url)] {
            let _ = url::Url::parse(url).map_err(|e| app_err!("{name} is not a valid URL ('{url}'): {e}"))?;
        }

        for (name, value) in [
            ("request_timeout", self.request_timeout),
            ("clone_timeout", self.clone_timeout),
            ("scorer_timeout", self.scorer_timeout),
        ] {
            if value.is_zero() {
                return Err(app_err!("{name} must be greater than zero"));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
