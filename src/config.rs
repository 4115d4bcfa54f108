use crate::decoder::{DecodeLimits, LayoutConfig, LayoutRegistry, VoterDecoder, VoterLayout};
use crate::errors::{AppError, AppResult};
use crate::types::RegistrarConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `GOVPOWER__PROCESSING__PARALLEL=false`
pub const ENV_PREFIX: &str = "GOVPOWER";

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub decoding: DecodeLimits,
    /// Registrar constants keyed by realm id
    #[serde(default)]
    pub realms: HashMap<String, RegistrarConfig>,
    /// Voter layouts in addition to the built-in voter-stake-registry one
    #[serde(default)]
    pub layouts: Vec<LayoutConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Local snapshot dump used when `--snapshot` is not given
    pub snapshot: Option<PathBuf>,
    /// Alias file used when `--aliases` is not given
    pub aliases: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Realm used when `--realm` is not given
    pub default_realm: Option<String>,
    /// Build the batch delegation index on the rayon pool
    pub parallel: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            default_realm: None,
            parallel: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> AppResult<Self> {
        let config = Self::builder_with_defaults()?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load from an explicit file, still honouring environment overrides
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config = Self::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse TOML contents over the defaults, without environment overrides
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config = Self::builder_with_defaults()?
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let limits = DecodeLimits::default();
        Config::builder()
            .set_default("processing.parallel", true)?
            .set_default("decoding.max_amount_native", limits.max_amount_native)?
            .set_default("decoding.min_timestamp", limits.min_timestamp)?
            .set_default("decoding.max_timestamp", limits.max_timestamp)
    }

    fn environment() -> Environment {
        // GOVPOWER__PATHS__SNAPSHOT overrides paths.snapshot
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    /// Registrar constants for a realm
    ///
    /// Realm ids are matched exactly first, then case-insensitively.
    pub fn resolve_registrar_config(&self, realm_id: &str) -> AppResult<RegistrarConfig> {
        let config = self
            .realms
            .get(realm_id)
            .or_else(|| {
                self.realms
                    .iter()
                    .find(|(id, _)| id.eq_ignore_ascii_case(realm_id))
                    .map(|(_, config)| config)
            })
            .copied()
            .ok_or_else(|| AppError::MissingRegistrarConfig {
                realm: realm_id.to_string(),
            })?;

        config
            .validate()
            .map_err(|reason| AppError::InvalidRegistrarConfig {
                realm: realm_id.to_string(),
                reason,
            })?;

        Ok(config)
    }

    /// Realm from the command line, falling back to `processing.default_realm`
    pub fn realm_or_default(&self, realm: Option<&str>) -> AppResult<String> {
        realm
            .map(str::to_string)
            .or_else(|| self.processing.default_realm.clone())
            .ok_or_else(|| {
                AppError::Config(
                    "No realm given. Pass --realm or set processing.default_realm in config.toml"
                        .to_string(),
                )
            })
    }

    /// Decoder with the built-in layout, any configured layouts and the
    /// configured plausibility limits
    pub fn decoder(&self) -> AppResult<VoterDecoder> {
        let mut registry = LayoutRegistry::standard();
        for layout in &self.layouts {
            registry.register(VoterLayout::try_from(layout.clone())?)?;
        }
        Ok(VoterDecoder::new(registry, self.decoding))
    }
}
