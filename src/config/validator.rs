//! Stack configuration validation.
//!
//! Validation runs once, before any resource is declared. It stops at the
//! first violated rule and, on success, produces an immutable
//! [`StackConfiguration`] with all derived values computed.

use crate::error::{MAX_BASIC_AUTH_CREDENTIALS, ValidationError};
use tracing::debug;

use super::naming::{base_id, www_id};
use super::spec::{BuildSettings, Credentials, StackOptions};

/// Branch used when the settings leave it unset.
pub const DEFAULT_BRANCH: &str = "main";

/// Validator for stack options.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Outcome of a successful validation.
#[derive(Debug)]
pub struct ValidationReport {
    /// The validated configuration.
    pub configuration: StackConfiguration,
    /// Non-fatal issues worth surfacing.
    pub warnings: Vec<String>,
}

/// A validated, immutable site stack configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfiguration {
    domain: String,
    base_domain: String,
    base_id: String,
    www: Option<WwwVariant>,
    github: GitHubSource,
    add_cloudfront: bool,
    basic_auth_credentials: Option<Credentials>,
    cloudfront_acl_reference: Option<String>,
    hosted_zone_id: Option<String>,
    region: Option<String>,
    build: BuildSettings,
}

/// The `www.` variant of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WwwVariant {
    /// `www.<domain>`.
    pub domain: String,
    /// Identifier prefix for www resources.
    pub id: String,
}

/// GitHub source of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubSource {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Effective branch.
    pub branch: String,
    /// Secret holding the access token, when credentials are injected.
    pub access_token_secret_name: Option<String>,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates stack options.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self, options: StackOptions) -> Result<ValidationReport, ValidationError> {
        let warnings = Self::collect_warnings(&options);
        let configuration = StackConfiguration::new(options)?;

        debug!(
            "Configuration validation passed for {} ({} warnings)",
            configuration.domain(),
            warnings.len()
        );

        Ok(ValidationReport {
            configuration,
            warnings,
        })
    }

    /// Gathers non-fatal issues. Only meaningful when validation succeeds.
    fn collect_warnings(options: &StackOptions) -> Vec<String> {
        let mut warnings = Vec::new();

        let base_domain = present(options.base_domain.as_ref());
        let domain = present(options.domain.as_ref()).or(base_domain);

        if let (Some(domain), Some(base)) = (domain, base_domain)
            && domain.contains(base.as_str())
            && !is_on_base_domain(domain, base)
        {
            warnings.push(format!(
                "domain: '{domain}' contains '{base}' but is not a subdomain of it"
            ));
        }

        if options.add_basic_auth && !options.add_cloudfront {
            warnings.push(String::from(
                "add_basic_auth: basic auth only applies to the CloudFront distribution, \
                 which is not enabled",
            ));
        }

        if !options.add_basic_auth
            && options
                .basic_auth_credentials
                .as_ref()
                .is_some_and(|c| !c.is_empty())
        {
            warnings.push(String::from(
                "basic_auth_credentials: credentials are ignored because add_basic_auth is false",
            ));
        }

        warnings
    }
}

impl StackConfiguration {
    /// Validates options into a configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule, checked in this order: domain,
    /// base domain, domain containment, GitHub secret, GitHub repository,
    /// CloudFront ACL reference, basic auth credentials.
    pub fn new(options: StackOptions) -> Result<Self, ValidationError> {
        let StackOptions {
            domain,
            base_domain,
            github_add_credentials,
            github_access_token_secret_name,
            github_owner,
            github_repo,
            github_branch,
            add_www,
            add_cloudfront,
            add_basic_auth,
            basic_auth_credentials,
            cloudfront_acl_reference,
            hosted_zone_id,
            region,
            build,
        } = options;

        let base_domain = non_empty(base_domain);
        let domain = non_empty(domain).or_else(|| base_domain.clone());

        let domain = domain.ok_or(ValidationError::DomainNotSet)?;
        let base_domain = base_domain.ok_or(ValidationError::BaseDomainNotSet)?;

        // Substring containment, not a label-aware suffix check.
        if !domain.contains(base_domain.as_str()) {
            return Err(ValidationError::DomainNotOnBaseDomain {
                domain,
                base_domain,
            });
        }

        let access_token_secret_name = non_empty(github_access_token_secret_name);
        if github_add_credentials && access_token_secret_name.is_none() {
            return Err(ValidationError::MissingAccessTokenSecretName);
        }

        let (owner, repo) = match (non_empty(github_owner), non_empty(github_repo)) {
            (Some(owner), Some(repo)) => (owner, repo),
            (owner, repo) => return Err(ValidationError::MissingGitHubRepository { owner, repo }),
        };

        let cloudfront_acl_reference = non_empty(cloudfront_acl_reference);
        if add_cloudfront && cloudfront_acl_reference.is_none() {
            return Err(ValidationError::MissingCloudFrontAclReference);
        }

        let basic_auth_credentials = if add_basic_auth {
            let credentials = basic_auth_credentials.unwrap_or_default();
            if credentials.is_empty() {
                return Err(ValidationError::NoBasicAuthCredentials);
            }
            if credentials.len() > MAX_BASIC_AUTH_CREDENTIALS {
                return Err(ValidationError::TooManyBasicAuthCredentials {
                    count: credentials.len(),
                    max: MAX_BASIC_AUTH_CREDENTIALS,
                });
            }
            Some(credentials)
        } else {
            None
        };

        let www = add_www.then(|| WwwVariant {
            domain: format!("www.{domain}"),
            id: www_id(&domain),
        });

        Ok(Self {
            base_id: base_id(&domain),
            domain,
            base_domain,
            www,
            github: GitHubSource {
                owner,
                repo,
                branch: non_empty(github_branch).unwrap_or_else(|| String::from(DEFAULT_BRANCH)),
                access_token_secret_name: if github_add_credentials {
                    access_token_secret_name
                } else {
                    None
                },
            },
            add_cloudfront,
            basic_auth_credentials,
            cloudfront_acl_reference,
            hosted_zone_id: non_empty(hosted_zone_id),
            region: non_empty(region),
            build,
        })
    }

    /// Site domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Hosted zone domain.
    #[must_use]
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Identifier prefix for the main site resources.
    #[must_use]
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// The www variant, when requested.
    #[must_use]
    pub const fn www(&self) -> Option<&WwwVariant> {
        self.www.as_ref()
    }

    /// GitHub source.
    #[must_use]
    pub const fn github(&self) -> &GitHubSource {
        &self.github
    }

    /// Whether a CloudFront distribution is declared.
    #[must_use]
    pub const fn add_cloudfront(&self) -> bool {
        self.add_cloudfront
    }

    /// Basic auth credentials, when basic auth is enabled.
    #[must_use]
    pub const fn basic_auth_credentials(&self) -> Option<&Credentials> {
        self.basic_auth_credentials.as_ref()
    }

    /// SSM parameter name holding the WAF ACL ARN.
    #[must_use]
    pub fn cloudfront_acl_reference(&self) -> Option<&str> {
        self.cloudfront_acl_reference.as_deref()
    }

    /// Hosted zone id, when known.
    #[must_use]
    pub fn hosted_zone_id(&self) -> Option<&str> {
        self.hosted_zone_id.as_deref()
    }

    /// Deployment region, when known.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Build settings.
    #[must_use]
    pub const fn build(&self) -> &BuildSettings {
        &self.build
    }

    /// Subdomain part of the domain relative to the base domain.
    ///
    /// Removes the first occurrence of the base domain and a trailing dot,
    /// so `blog.example.com` on `example.com` yields `blog` and the apex
    /// yields an empty string.
    #[must_use]
    pub fn sub_domain(&self) -> String {
        let mut sub = self.domain.replacen(self.base_domain.as_str(), "", 1);
        if sub.ends_with('.') {
            sub.pop();
        }
        sub
    }
}

/// Whether `domain` equals `base` or is a dot-separated subdomain of it.
fn is_on_base_domain(domain: &str, base: &str) -> bool {
    domain == base || domain.ends_with(&format!(".{base}"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn present(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(count: usize) -> Credentials {
        (0..count)
            .map(|i| (format!("user{i}"), format!("password{i}")))
            .collect()
    }

    fn valid_options() -> StackOptions {
        StackOptions {
            domain: Some(String::from("sub.example.com")),
            base_domain: Some(String::from("example.com")),
            github_owner: Some(String::from("octo")),
            github_repo: Some(String::from("site")),
            ..StackOptions::default()
        }
    }

    #[test]
    fn test_valid_configuration() {
        let config = StackConfiguration::new(valid_options()).unwrap();
        assert_eq!(config.domain(), "sub.example.com");
        assert_eq!(config.base_id(), "BaseSubExampleCom");
        assert_eq!(config.github().branch, "main");
        assert!(config.www().is_none());
        assert!(config.basic_auth_credentials().is_none());
    }

    #[test]
    fn test_missing_domain_and_base_domain() {
        let options = StackOptions {
            domain: None,
            base_domain: None,
            ..valid_options()
        };
        assert_eq!(
            StackConfiguration::new(options).unwrap_err(),
            ValidationError::DomainNotSet
        );
    }

    #[test]
    fn test_domain_defaults_to_base_domain() {
        let options = StackOptions {
            domain: None,
            ..valid_options()
        };
        let config = StackConfiguration::new(options).unwrap();
        assert_eq!(config.domain(), "example.com");
        assert_eq!(config.base_id(), "BaseExampleCom");
        assert_eq!(config.sub_domain(), "");
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let options = StackOptions {
            domain: Some(String::new()),
            base_domain: Some(String::new()),
            ..valid_options()
        };
        assert_eq!(
            StackConfiguration::new(options).unwrap_err(),
            ValidationError::DomainNotSet
        );
    }

    #[test]
    fn test_missing_base_domain() {
        let options = StackOptions {
            base_domain: None,
            ..valid_options()
        };
        assert_eq!(
            StackConfiguration::new(options).unwrap_err(),
            ValidationError::BaseDomainNotSet
        );
    }

    #[test]
    fn test_domain_not_on_base_domain() {
        let options = StackOptions {
            domain: Some(String::from("site.org")),
            ..valid_options()
        };
        assert!(matches!(
            StackConfiguration::new(options),
            Err(ValidationError::DomainNotOnBaseDomain { .. })
        ));
    }

    #[test]
    fn test_containment_is_substring_not_suffix() {
        // "notexample.com" is not a subdomain of "example.com" but contains it.
        let options = StackOptions {
            domain: Some(String::from("notexample.com")),
            ..valid_options()
        };
        let report = ConfigValidator::new().validate(options).unwrap();
        assert_eq!(report.configuration.domain(), "notexample.com");
        assert!(report.warnings.iter().any(|w| w.contains("not a subdomain")));
    }

    #[test]
    fn test_github_credentials_need_secret() {
        let options = StackOptions {
            github_add_credentials: true,
            ..valid_options()
        };
        assert_eq!(
            StackConfiguration::new(options).unwrap_err(),
            ValidationError::MissingAccessTokenSecretName
        );

        let options = StackOptions {
            github_add_credentials: true,
            github_access_token_secret_name: Some(String::from("github-token")),
            ..valid_options()
        };
        let config = StackConfiguration::new(options).unwrap();
        assert_eq!(
            config.github().access_token_secret_name.as_deref(),
            Some("github-token")
        );
    }

    #[test]
    fn test_missing_repository() {
        let options = StackOptions {
            github_repo: None,
            ..valid_options()
        };
        let err = StackConfiguration::new(options).unwrap_err();
        assert_eq!(err.field(), "repo");
        assert_eq!(
            err,
            ValidationError::MissingGitHubRepository {
                owner: Some(String::from("octo")),
                repo: None
            }
        );
    }

    #[test]
    fn test_cloudfront_needs_acl_reference() {
        let options = StackOptions {
            add_cloudfront: true,
            ..valid_options()
        };
        assert_eq!(
            StackConfiguration::new(options).unwrap_err(),
            ValidationError::MissingCloudFrontAclReference
        );
    }

    #[test]
    fn test_basic_auth_credential_bounds() {
        for (count, ok) in [(0, false), (1, true), (10, true), (11, false)] {
            let options = StackOptions {
                add_basic_auth: true,
                basic_auth_credentials: Some(credentials(count)),
                ..valid_options()
            };
            assert_eq!(StackConfiguration::new(options).is_ok(), ok, "count {count}");
        }

        let options = StackOptions {
            add_basic_auth: true,
            basic_auth_credentials: None,
            ..valid_options()
        };
        assert_eq!(
            StackConfiguration::new(options).unwrap_err(),
            ValidationError::NoBasicAuthCredentials
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let options = StackOptions {
            github_owner: None,
            add_cloudfront: true,
            add_basic_auth: true,
            ..valid_options()
        };
        assert!(matches!(
            StackConfiguration::new(options),
            Err(ValidationError::MissingGitHubRepository { .. })
        ));
    }

    #[test]
    fn test_www_variant_and_branch() {
        let options = StackOptions {
            add_www: true,
            github_branch: Some(String::from("release")),
            ..valid_options()
        };
        let config = StackConfiguration::new(options).unwrap();
        let www = config.www().unwrap();
        assert_eq!(www.domain, "www.sub.example.com");
        assert_eq!(www.id, "WwwSubExampleCom");
        assert_eq!(config.github().branch, "release");
        assert_eq!(config.sub_domain(), "sub");
    }

    #[test]
    fn test_basic_auth_without_cloudfront_warns() {
        let options = StackOptions {
            add_basic_auth: true,
            basic_auth_credentials: Some(credentials(1)),
            ..valid_options()
        };
        let report = ConfigValidator::new().validate(options).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("add_basic_auth"));
    }
}
