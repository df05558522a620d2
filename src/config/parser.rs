use crate::config::types::{PartialConfig, RunConfig};
use crate::config::validation::resolve;
use crate::ConfigError;
use std::path::Path;

/// Loads a settings layer from a TOML file
///
/// The file uses the same names as the command-line flags, in kebab-case:
///
/// ```toml
/// sitemap = "https://example.com/sitemap.xml"
/// size = 8
/// delay = 250
/// cache-header = "x-cache"
/// ```
///
/// # Returns
///
/// * `Ok(PartialConfig)` - The parsed (not yet validated) layer
/// * `Err(ConfigError)` - The file could not be read or parsed
pub fn load_config_file(path: &Path) -> Result<PartialConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let partial: PartialConfig = toml::from_str(&content)?;
    Ok(partial)
}

/// Builds the run configuration from an optional config file plus overrides
///
/// Values in `overrides` (normally the command line) win over the file, and
/// built-in defaults fill whatever neither provides.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use precache::config::{load_config, PartialConfig};
///
/// let config = load_config(Some(Path::new("precache.toml")), PartialConfig::default()).unwrap();
/// println!("Concurrency: {}", config.concurrency);
/// ```
pub fn load_config(
    path: Option<&Path>,
    overrides: PartialConfig,
) -> Result<RunConfig, ConfigError> {
    let base = match path {
        Some(path) => load_config_file(path)?,
        None => PartialConfig::default(),
    };

    resolve(base.merge(overrides))
}
