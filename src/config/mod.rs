//! Configuration module for the static site stack.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `settings.json` (or YAML)
//! - Validating the stack options into an immutable configuration
//! - Deriving resource identifiers from domains
//! - Computing fingerprints for change detection

mod spec;
mod parser;
mod validator;
mod naming;
mod hash;

pub use spec::{BuildSettings, Credentials, DEFAULT_STACK_NAME, SiteSettings, StackOptions};
pub use parser::{ConfigParser, DEFAULT_CONFIG_FILES, SettingsFormat, find_config_file};
pub use validator::{
    ConfigValidator, DEFAULT_BRANCH, GitHubSource, StackConfiguration, ValidationReport,
    WwwVariant,
};
pub use naming::{base_id, limited_name, to_id, www_id};
pub use hash::ConfigHasher;
