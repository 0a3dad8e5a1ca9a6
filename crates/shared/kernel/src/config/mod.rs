use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment variables overriding file settings.
pub const ENV_PREFIX: &str = "REGISTRY";

/// Custom error type for config loading.
#[reg_derive::reg_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file overlaid with environment overrides.
///
/// 1. **Base file**: `path` (extension picks the format), defaulting to `registry` in the working
///    directory.
/// 2. **Environment**: variables prefixed with `REGISTRY__`; nested keys are separated by double
///    underscores (`REGISTRY__CACHING__DOMAIN_TTL_SECONDS` maps to `caching.domain_ttl_seconds`).
///
/// # Errors
/// Returns [`ConfigError::Config`] when the file is missing or the merged values do not
/// deserialize into `T`.
///
/// # Example
/// ```rust,no_run
/// use reg_kernel::config::load_config;
/// use reg_kernel::domain::config::RegistryConfig;
///
/// let cfg: RegistryConfig = load_config(Some("config/registry.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from("registry"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
