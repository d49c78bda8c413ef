//! Layered CLI configuration.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `formguard.toml` (or the file passed with `--config`)
//! 3. `RUST_LOG`, then `FORMGUARD_LOG` and `FORMGUARD_LOG_FORMAT`
//! 4. `FORMGUARD_<SECTION>__<KEY>` variables, e.g. `FORMGUARD_VALIDATOR__BATCH_SIZE`

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use formguard_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "formguard.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub validator: ValidatorConfig,
    pub logging: formguard_log::Config,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            validator: ValidatorConfig::default(),
            logging: formguard_log::Config {
                level: "warn".to_string(),
                ..formguard_log::Config::default()
            },
        }
    }
}

impl CliConfig {
    /// The layered figment for `file`.
    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::raw().only(&["RUST_LOG"]).map(|_| "logging.level".into()))
            .merge(Env::raw().only(&["FORMGUARD_LOG"]).map(|_| "logging.level".into()))
            .merge(
                Env::raw()
                    .only(&["FORMGUARD_LOG_FORMAT"])
                    .map(|_| "logging.format".into()),
            )
            .merge(Env::prefixed("FORMGUARD_").split("__"))
    }

    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config: Self = Self::figment(file)
            .extract()
            .with_context(|| format!("invalid configuration (file: {})", file.display()))?;
        config.validator.validate()?;
        Ok(config)
    }
}
