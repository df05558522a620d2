//! Configuration module for precache
//!
//! Settings come from up to three layers: built-in defaults, an optional TOML
//! file, and the command line. The merged result is validated once into an
//! immutable [`RunConfig`].
//!
//! # Example
//!
//! ```no_run
//! use precache::config::{load_config, PartialConfig};
//!
//! let cli = PartialConfig {
//!     sitemap: Some("https://example.com/sitemap.xml".to_string()),
//!     ..Default::default()
//! };
//! let config = load_config(None, cli).unwrap();
//! println!("Warming from {}", config.sitemap_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    PartialConfig, RunConfig, SiteOrigin, DEFAULT_DELAY_MS, DEFAULT_LOG_FILE, DEFAULT_SIZE,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_file};
pub use validation::{parse_origin, resolve};
