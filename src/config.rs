use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use teburu_models::{ModelSettings, Result};

use crate::DEFAULT_LOG_FILTER;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub models: ModelSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub filter: String,
}

impl AppConfig {
    /// Defaults, then `config/default`, `config/{RUN_MODE}` and
    /// `config/local`, then `TEBURU__*` environment variables
    /// (e.g. `TEBURU__MODELS__SPLIT__TEST_RATIO=0.3`).
    pub fn new() -> std::result::Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("config"), &run_mode)
    }

    pub fn load_from(dir: &Path, run_mode: &str) -> std::result::Result<Self, ConfigError> {
        let file = |name: &str| File::from(dir.join(name)).required(false);
        let defaults = ModelSettings::default();

        let config = Config::builder()
            .set_default("models.split.test_ratio", defaults.split.test_ratio)?
            .set_default("models.split.seed", defaults.split.seed)?
            .set_default("logging.filter", DEFAULT_LOG_FILTER)?
            .add_source(file("default"))
            .add_source(file(run_mode))
            .add_source(file("local"))
            .add_source(
                Environment::with_prefix("TEBURU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Model settings after validation.
    pub fn model_settings(&self) -> Result<ModelSettings> {
        self.models.validate()?;
        Ok(self.models.clone())
    }
}
