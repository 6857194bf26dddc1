//! Settings types for the static site stack.
//!
//! [`SiteSettings`] maps one-to-one onto the `settings.json` file. The site
//! stack itself is driven by [`StackOptions`], which is derived from the
//! settings once the WAF ACL reference is known.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Basic auth credentials, username to password.
pub type Credentials = BTreeMap<String, String>;

/// Stack name used when the settings leave it unset.
pub const DEFAULT_STACK_NAME: &str = "AwsStaticSiteStack";

/// The root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteSettings {
    /// Base name for the synthesized stacks.
    #[serde(default)]
    pub stack: Option<String>,
    /// Fully qualified site domain (e.g. `blog.example.com`).
    #[serde(default)]
    pub domain: Option<String>,
    /// Domain of the Route 53 hosted zone (e.g. `example.com`).
    #[serde(default)]
    pub base_domain: Option<String>,
    /// Deployment region of the site stack.
    #[serde(default)]
    pub region: Option<String>,
    /// Deployment account of the site stack.
    #[serde(default)]
    pub account: Option<String>,
    /// Whether to put a CloudFront distribution in front of the bucket.
    #[serde(default)]
    pub add_cloudfront: bool,
    /// Whether to also serve `www.<domain>`.
    #[serde(default)]
    pub add_www: bool,
    /// Whether to register GitHub source credentials with CodeBuild.
    #[serde(default)]
    pub add_github_credentials: bool,
    /// Secrets Manager secret holding the GitHub access token.
    #[serde(default)]
    pub access_token_secret_name: Option<String>,
    /// GitHub repository owner.
    #[serde(default)]
    pub owner: Option<String>,
    /// GitHub repository name.
    #[serde(default)]
    pub repo: Option<String>,
    /// Branch whose pushes trigger a build.
    #[serde(default)]
    pub branch: Option<String>,
    /// Whether to protect the distribution with HTTP basic auth.
    #[serde(default)]
    pub add_basic_auth: bool,
    /// Basic auth credentials.
    #[serde(default)]
    pub basic_auth_credentials: Option<Credentials>,
    /// Hosted zone id, used for automatic certificate validation records.
    #[serde(default)]
    pub hosted_zone_id: Option<String>,
    /// Build pipeline settings.
    #[serde(default)]
    pub build: BuildSettings,
}

/// CodeBuild settings for the site pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildSettings {
    /// Node.js runtime version installed in the build container.
    #[serde(default = "default_node_version")]
    pub node_version: u32,
    /// Command producing the site artifacts.
    #[serde(default = "default_build_command")]
    pub build_command: String,
    /// Directory holding the built site, relative to the repository root.
    #[serde(default = "default_artifact_directory")]
    pub artifact_directory: String,
    /// CodeBuild image.
    #[serde(default = "default_build_image")]
    pub image: String,
}

/// Options for a single static site stack.
///
/// These are the raw, unvalidated inputs; see
/// [`StackConfiguration`](super::StackConfiguration) for the validated form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackOptions {
    /// Site domain.
    pub domain: Option<String>,
    /// Hosted zone domain.
    pub base_domain: Option<String>,
    /// Whether to add GitHub source credentials.
    pub github_add_credentials: bool,
    /// Secret holding the GitHub access token.
    pub github_access_token_secret_name: Option<String>,
    /// GitHub owner.
    pub github_owner: Option<String>,
    /// GitHub repository.
    pub github_repo: Option<String>,
    /// GitHub branch.
    pub github_branch: Option<String>,
    /// Whether to serve the www variant.
    pub add_www: bool,
    /// Whether to add a CloudFront distribution.
    pub add_cloudfront: bool,
    /// Whether to add basic auth.
    pub add_basic_auth: bool,
    /// Basic auth credentials.
    pub basic_auth_credentials: Option<Credentials>,
    /// SSM parameter name holding the WAF ACL ARN.
    pub cloudfront_acl_reference: Option<String>,
    /// Hosted zone id for certificate validation.
    pub hosted_zone_id: Option<String>,
    /// Deployment region.
    pub region: Option<String>,
    /// Build settings.
    pub build: BuildSettings,
}

// Default value functions

const fn default_node_version() -> u32 {
    14
}

fn default_build_command() -> String {
    String::from("npm run build-site")
}

fn default_artifact_directory() -> String {
    String::from("./site/dist")
}

fn default_build_image() -> String {
    String::from("aws/codebuild/standard:5.0")
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            node_version: default_node_version(),
            build_command: default_build_command(),
            artifact_directory: default_artifact_directory(),
            image: default_build_image(),
        }
    }
}

impl SiteSettings {
    /// Returns the stack base name.
    #[must_use]
    pub fn stack_name(&self) -> &str {
        self.stack
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STACK_NAME)
    }

    /// Builds the site stack options, wiring in the WAF ACL reference.
    #[must_use]
    pub fn stack_options(&self, cloudfront_acl_reference: Option<String>) -> StackOptions {
        StackOptions {
            domain: self.domain.clone(),
            base_domain: self.base_domain.clone(),
            github_add_credentials: self.add_github_credentials,
            github_access_token_secret_name: self.access_token_secret_name.clone(),
            github_owner: self.owner.clone(),
            github_repo: self.repo.clone(),
            github_branch: self.branch.clone(),
            add_www: self.add_www,
            add_cloudfront: self.add_cloudfront,
            add_basic_auth: self.add_basic_auth,
            basic_auth_credentials: self.basic_auth_credentials.clone(),
            cloudfront_acl_reference,
            hosted_zone_id: self.hosted_zone_id.clone(),
            region: self.region.clone(),
            build: self.build.clone(),
        }
    }
}
