//! Error types for the static site stack synthesizer.
//!
//! This module provides the error hierarchy for every stage of a run:
//! loading settings, validating the stack configuration, checking the WAF
//! rule catalog, synthesizing templates and publishing the cloud assembly.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the synthesizer.
#[derive(Debug, Error)]
pub enum SiteStackError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// WAF rule catalog errors.
    #[error("Rule catalog error: {0}")]
    Rule(#[from] RuleError),

    /// Template synthesis errors.
    #[error("Synthesis error: {0}")]
    Synth(#[from] SynthError),

    /// Assembly publishing errors.
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file was not found.
    #[error("Settings file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The settings file could not be parsed.
    #[error("Failed to parse settings: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// The stack configuration was rejected.
    #[error("Invalid stack configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Maximum number of basic auth credentials baked into the edge function.
pub const MAX_BASIC_AUTH_CREDENTIALS: usize = 10;

/// Stack configuration validation failures, one variant per rule.
///
/// Rules are checked in declaration order and validation stops at the
/// first failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither a domain nor a base domain was provided.
    #[error("Domain is not set")]
    DomainNotSet,

    /// No base domain was provided.
    #[error("Base domain is not set")]
    BaseDomainNotSet,

    /// The domain does not contain the base domain.
    #[error("Domain must be on the base domain: '{domain}' does not contain '{base_domain}'")]
    DomainNotOnBaseDomain {
        /// The configured domain.
        domain: String,
        /// The configured base domain.
        base_domain: String,
    },

    /// GitHub credentials were requested without a secret name.
    #[error("GitHub access token secret name must be set when adding GitHub credentials")]
    MissingAccessTokenSecretName,

    /// The GitHub owner or repository is missing.
    #[error("GitHub owner and repo must be set (owner: {owner:?}, repo: {repo:?})")]
    MissingGitHubRepository {
        /// The configured owner, if any.
        owner: Option<String>,
        /// The configured repository, if any.
        repo: Option<String>,
    },

    /// CloudFront was requested without a WAF ACL reference.
    #[error("A CloudFront WAF ACL reference must be set when adding CloudFront")]
    MissingCloudFrontAclReference,

    /// Basic auth was requested without any credentials.
    #[error("Basic auth credentials must contain at least 1 credential")]
    NoBasicAuthCredentials,

    /// Basic auth was requested with too many credentials.
    #[error("Basic auth credentials must contain at most {max} credentials, found {count}")]
    TooManyBasicAuthCredentials {
        /// Number of credentials supplied.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}

/// WAF rule catalog errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// Two descriptors share a name.
    #[error("Duplicate managed rule name: {name}")]
    DuplicateName {
        /// The duplicated name.
        name: String,
    },

    /// Two descriptors share a priority.
    #[error("Managed rules '{first}' and '{second}' share priority {priority}")]
    DuplicatePriority {
        /// The shared priority.
        priority: i32,
        /// First rule with the priority.
        first: String,
        /// Second rule with the priority.
        second: String,
    },

    /// A descriptor would be evaluated before the rate limit rule.
    #[error("Managed rule '{name}' has priority {priority}, which does not come after the rate limit priority {rate_limit_priority}")]
    ShadowsRateLimit {
        /// Name of the offending rule.
        name: String,
        /// Its priority.
        priority: i32,
        /// The rate limit rule priority.
        rate_limit_priority: i32,
    },
}

/// Template synthesis errors.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A template or manifest could not be serialized.
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// A region is needed to alias DNS records to the S3 website endpoint.
    #[error("A region is required to target the S3 website endpoint of {domain}")]
    MissingRegion {
        /// The domain needing the alias.
        domain: String,
    },

    /// The region has no known S3 website endpoint.
    #[error("No S3 website endpoint known for region {region}")]
    UnsupportedRegion {
        /// The unsupported region.
        region: String,
    },

    /// A CloudFront site stack targets a region other than the one holding
    /// its certificate and web ACL parameter.
    #[error(
        "{stack} targets {region}, but a CloudFront site must be deployed in {required} \
         where its certificate and web ACL live"
    )]
    CloudFrontRegion {
        /// The main stack name.
        stack: String,
        /// The configured region.
        region: String,
        /// The region CloudFront requires.
        required: &'static str,
    },
}

/// Assembly publishing errors.
#[derive(Debug, Error)]
pub enum PublishError {
    /// S3 backend error.
    #[error("S3 publish backend error: {message}")]
    S3 {
        /// Description of the S3 error.
        message: String,
    },

    /// Local backend error.
    #[error("Local publish backend error: {message}")]
    Local {
        /// Description of the filesystem error.
        message: String,
    },

    /// A published object is unreadable.
    #[error("Published assembly is corrupted: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },

    /// Serialization error.
    #[error("Publish record serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },
}

/// Result type alias for synthesizer operations.
pub type Result<T> = std::result::Result<T, SiteStackError>;

impl SiteStackError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<ValidationError> for SiteStackError {
    fn from(err: ValidationError) -> Self {
        Self::Config(ConfigError::Invalid(err))
    }
}

impl ValidationError {
    /// Returns the settings key the failure is about.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::DomainNotSet | Self::DomainNotOnBaseDomain { .. } => "domain",
            Self::BaseDomainNotSet => "base_domain",
            Self::MissingAccessTokenSecretName => "access_token_secret_name",
            Self::MissingGitHubRepository { owner: None, .. } => "owner",
            Self::MissingGitHubRepository { .. } => "repo",
            Self::MissingCloudFrontAclReference => "cloudfront_acl_reference",
            Self::NoBasicAuthCredentials | Self::TooManyBasicAuthCredentials { .. } => {
                "basic_auth_credentials"
            }
        }
    }
}

impl SynthError {
    /// Creates a serialization error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl PublishError {
    /// Creates an S3 error with the given message.
    #[must_use]
    pub fn s3(message: impl Into<String>) -> Self {
        Self::S3 {
            message: message.into(),
        }
    }

    /// Creates a local backend error with the given message.
    #[must_use]
    pub fn local(message: impl Into<String>) -> Self {
        Self::Local {
            message: message.into(),
        }
    }

    /// Creates a serialization error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::DomainNotSet.to_string(), "Domain is not set");
        assert_eq!(ValidationError::BaseDomainNotSet.to_string(), "Base domain is not set");
        let err = ValidationError::DomainNotOnBaseDomain {
            domain: String::from("site.org"),
            base_domain: String::from("example.com"),
        };
        assert!(err.to_string().starts_with("Domain must be on the base domain"));
    }

    #[test]
    fn test_validation_error_fields() {
        assert_eq!(ValidationError::DomainNotSet.field(), "domain");
        assert_eq!(
            ValidationError::MissingGitHubRepository { owner: None, repo: None }.field(),
            "owner"
        );
        assert_eq!(
            ValidationError::MissingGitHubRepository {
                owner: Some(String::from("me")),
                repo: None
            }
            .field(),
            "repo"
        );
    }

    #[test]
    fn test_validation_error_converts_to_config_error() {
        let err: SiteStackError = ValidationError::NoBasicAuthCredentials.into();
        assert!(matches!(
            err,
            SiteStackError::Config(ConfigError::Invalid(ValidationError::NoBasicAuthCredentials))
        ));
    }
}
