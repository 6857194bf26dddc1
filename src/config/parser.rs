//! Settings parser for loading the site settings file.
//!
//! Settings are read from JSON or YAML (chosen by file extension), then
//! environment overrides are applied on top.

use crate::error::{ConfigError, Result, SiteStackError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::SiteSettings;

/// Settings parser.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<PathBuf>,
}

/// On-disk settings formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// `settings.json`.
    Json,
    /// `settings.yaml` / `settings.yml`.
    Yaml,
}

impl SettingsFormat {
    /// Guesses the format from a file extension, defaulting to JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

impl ConfigParser {
    /// Creates a new settings parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads settings from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<SiteSettings> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());

        if !path.exists() {
            return Err(SiteStackError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SiteStackError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse(&content, SettingsFormat::from_path(path), Some(path))
    }

    /// Parses settings from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid for the format.
    pub fn parse(
        &self,
        content: &str,
        format: SettingsFormat,
        source: Option<&Path>,
    ) -> Result<SiteSettings> {
        debug!("Parsing {format:?} settings");

        let location = || source.map(|p| p.display().to_string());
        let settings: SiteSettings = match format {
            SettingsFormat::Json => serde_json::from_str(content).map_err(|e| {
                SiteStackError::Config(ConfigError::ParseError {
                    message: format!("JSON parse error: {e}"),
                    location: location(),
                })
            })?,
            SettingsFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                SiteStackError::Config(ConfigError::ParseError {
                    message: format!("YAML parse error: {e}"),
                    location: location(),
                })
            })?,
        };

        debug!("Parsed settings for stack: {}", settings.stack_name());
        Ok(settings)
    }

    /// Loads settings with environment variable overrides.
    ///
    /// Recognized variables: `SITESTACK_STACK`, `SITESTACK_DOMAIN`,
    /// `SITESTACK_BASE_DOMAIN`, `SITESTACK_BRANCH`, `SITESTACK_REGION` and
    /// `SITESTACK_ACCOUNT`. When no region or account is configured at all,
    /// `CDK_DEFAULT_REGION`/`AWS_REGION` and `CDK_DEFAULT_ACCOUNT` fill in.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<SiteSettings> {
        let mut settings = self.load_file(path)?;
        Self::apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Applies environment overrides using the given variable lookup.
    pub fn apply_env_overrides<F>(settings: &mut SiteSettings, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut Option<String>); 5] = [
            ("SITESTACK_STACK", &mut settings.stack),
            ("SITESTACK_DOMAIN", &mut settings.domain),
            ("SITESTACK_BASE_DOMAIN", &mut settings.base_domain),
            ("SITESTACK_BRANCH", &mut settings.branch),
            ("SITESTACK_REGION", &mut settings.region),
        ];

        for (name, slot) in overrides {
            if let Some(value) = var(name) {
                debug!("Overriding setting from {name}");
                *slot = Some(value);
            }
        }

        if let Some(account) = var("SITESTACK_ACCOUNT") {
            debug!("Overriding account from SITESTACK_ACCOUNT");
            settings.account = Some(account);
        }

        if settings.region.is_none() {
            settings.region = var("CDK_DEFAULT_REGION").or_else(|| var("AWS_REGION"));
        }

        if settings.account.is_none() {
            settings.account = var("CDK_DEFAULT_ACCOUNT");
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                SiteStackError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default settings file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "settings.json",
    "settings.yaml",
    "settings.yml",
    "sitestack.yaml",
];

/// Finds the settings file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no settings file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found settings file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(SiteStackError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_json_settings() {
        let json = r#"{
            "stack": "BlogStack",
            "domain": "blog.example.com",
            "base_domain": "example.com",
            "region": "eu-west-1",
            "add_cloudfront": true,
            "add_www": false,
            "owner": "octo",
            "repo": "blog",
            "add_basic_auth": true,
            "basic_auth_credentials": { "alice": "secret" },
            "unknown_key": 42
        }"#;
        let settings = ConfigParser::new()
            .parse(json, SettingsFormat::Json, None)
            .unwrap();
        assert_eq!(settings.stack_name(), "BlogStack");
        assert_eq!(settings.domain.as_deref(), Some("blog.example.com"));
        assert!(settings.add_cloudfront);
        assert_eq!(
            settings
                .basic_auth_credentials
                .as_ref()
                .and_then(|c| c.get("alice"))
                .map(String::as_str),
            Some("secret")
        );
    }

    #[test]
    fn test_parse_yaml_settings() {
        let yaml = r"
domain: example.com
base_domain: example.com
owner: octo
repo: site
build:
  node_version: 18
";
        let settings = ConfigParser::new()
            .parse(yaml, SettingsFormat::Yaml, None)
            .unwrap();
        assert_eq!(settings.build.node_version, 18);
        assert_eq!(settings.build.build_command, "npm run build-site");
    }

    #[test]
    fn test_init_template_is_valid() {
        let settings = ConfigParser::new()
            .parse(
                include_str!("../../templates/settings.json"),
                SettingsFormat::Json,
                None,
            )
            .unwrap();
        let report = crate::synth::CloudAssembly::validate(&settings).unwrap();
        assert_eq!(report.configuration.domain(), "www.example.com");
        assert!(report.configuration.add_cloudfront());
        assert!(report.configuration.github().access_token_secret_name.is_none());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = ConfigParser::new().parse("{ not json", SettingsFormat::Json, None);
        assert!(matches!(
            result,
            Err(SiteStackError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SettingsFormat::from_path(Path::new("a/settings.yml")), SettingsFormat::Yaml);
        assert_eq!(SettingsFormat::from_path(Path::new("settings.json")), SettingsFormat::Json);
        assert_eq!(SettingsFormat::from_path(Path::new("settings")), SettingsFormat::Json);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SITESTACK_DOMAIN", "docs.example.com"),
            ("CDK_DEFAULT_REGION", "eu-central-1"),
            ("CDK_DEFAULT_ACCOUNT", "123456789012"),
        ]
        .into_iter()
        .collect();

        let mut settings = SiteSettings {
            domain: Some(String::from("example.com")),
            ..SiteSettings::default()
        };
        ConfigParser::apply_env_overrides(&mut settings, |name| {
            env.get(name).map(|v| (*v).to_string())
        });

        assert_eq!(settings.domain.as_deref(), Some("docs.example.com"));
        assert_eq!(settings.region.as_deref(), Some("eu-central-1"));
        assert_eq!(settings.account.as_deref(), Some("123456789012"));
    }

    #[test]
    fn test_file_region_wins_over_cdk_default() {
        let mut settings = SiteSettings {
            region: Some(String::from("us-west-2")),
            ..SiteSettings::default()
        };
        ConfigParser::apply_env_overrides(&mut settings, |name| {
            (name == "CDK_DEFAULT_REGION").then(|| String::from("eu-central-1"))
        });
        assert_eq!(settings.region.as_deref(), Some("us-west-2"));
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp = tempfile::TempDir::new().unwrap();
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("settings.json"), "{}").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, temp.path().join("settings.json"));
    }
}
