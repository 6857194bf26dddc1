//! Cloud assembly: every stack of a site plus a manifest.
//!
//! With CloudFront, the assembly holds a WAF stack in `us-east-1` and the
//! main stack depending on it. Without CloudFront, only the main stack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{ConfigHasher, ConfigValidator, SiteSettings, ValidationReport};
use crate::error::{Result, SynthError};
use crate::site::StaticSiteStack;
use crate::waf::{CLOUDFRONT_ACL_REGION, MANAGED_RULES, WafStack, WafStackPurpose};

use super::template::Template;

/// Default output directory of `synth`.
pub const DEFAULT_OUTPUT_DIR: &str = "cdk.out";

/// Manifest file name inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Current version of the manifest format.
pub const MANIFEST_VERSION: &str = "1.0";

/// One stack of the assembly.
#[derive(Debug, Clone)]
pub struct AssemblyStack {
    /// Stack name.
    pub name: String,
    /// Target region, if pinned.
    pub region: Option<String>,
    /// Target account, if pinned.
    pub account: Option<String>,
    /// The template.
    pub template: Template,
    /// Stacks that must be deployed first.
    pub dependencies: Vec<String>,
}

/// Manifest entry for one stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackManifest {
    /// Template file name relative to the output directory.
    pub template_file: String,
    /// Target region.
    #[serde(default)]
    pub region: Option<String>,
    /// Target account.
    #[serde(default)]
    pub account: Option<String>,
    /// Stacks that must be deployed first.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// SHA-256 of the template JSON.
    pub template_hash: String,
}

/// The assembly manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Manifest format version.
    pub version: String,
    /// When the assembly was synthesized.
    pub created_at: DateTime<Utc>,
    /// Fingerprint of the validated configuration.
    pub fingerprint: String,
    /// Stacks keyed by name.
    pub stacks: BTreeMap<String, StackManifest>,
}

/// A synthesized cloud assembly.
#[derive(Debug, Clone)]
pub struct CloudAssembly {
    /// Stacks in deployment order.
    pub stacks: Vec<AssemblyStack>,
    /// The manifest.
    pub manifest: Manifest,
    /// Warnings raised while synthesizing.
    pub warnings: Vec<String>,
}

impl AssemblyStack {
    /// Template file name, `<name>.template.json`.
    #[must_use]
    pub fn template_file(&self) -> String {
        format!("{}.template.json", self.name)
    }
}

impl CloudAssembly {
    /// Synthesizes every stack for the given settings.
    ///
    /// The main stack configuration is validated before any stack is built,
    /// so an invalid configuration never yields a partial assembly.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, rule assembly or synthesis fails.
    pub fn synthesize(settings: &SiteSettings) -> Result<Self> {
        let waf_name = waf_stack_name(settings);
        let main_name = main_stack_name(settings);

        let report = Self::validate(settings)?;
        let config = report.configuration;
        let warnings = report.warnings;

        let domain = config.domain().to_string();
        let mut stacks = Vec::new();
        let mut dependencies = Vec::new();

        if config.add_cloudfront() {
            let waf = WafStack::build(
                &waf_name,
                format!("Stack for WAFv2 ACL for {domain}"),
                WafStackPurpose::CloudFront,
                MANAGED_RULES,
            )?;
            stacks.push(AssemblyStack {
                name: waf_name.clone(),
                region: Some(String::from(CLOUDFRONT_ACL_REGION)),
                account: settings.account.clone(),
                template: waf.template,
                dependencies: Vec::new(),
            });
            dependencies.push(waf_name);
        }

        let site = StaticSiteStack::build(&config, format!("Stack for hosting static site for {domain}"))?;
        stacks.push(AssemblyStack {
            name: main_name,
            region: config
                .region()
                .map(String::from)
                .or_else(|| config.add_cloudfront().then(|| String::from(CLOUDFRONT_ACL_REGION))),
            account: settings.account.clone(),
            template: site.template,
            dependencies,
        });

        for warning in &warnings {
            warn!("{warning}");
        }

        let hasher = ConfigHasher::new();
        let mut manifest_stacks = BTreeMap::new();
        for stack in &stacks {
            let template_hash = hasher.hash_template(&stack.template)?;
            debug!("Stack {} hashes to {}", stack.name, hasher.short_hash(&template_hash));
            manifest_stacks.insert(
                stack.name.clone(),
                StackManifest {
                    template_file: stack.template_file(),
                    region: stack.region.clone(),
                    account: stack.account.clone(),
                    dependencies: stack.dependencies.clone(),
                    template_hash,
                },
            );
        }

        let manifest = Manifest {
            version: String::from(MANIFEST_VERSION),
            created_at: Utc::now(),
            fingerprint: hasher.hash_configuration(&config),
            stacks: manifest_stacks,
        };

        info!("Synthesized {} stack(s) for {domain}", stacks.len());

        Ok(Self {
            stacks,
            manifest,
            warnings,
        })
    }

    /// Validates the main stack configuration the way `synthesize` does,
    /// wiring in the ACL parameter of the WAF stack when CloudFront is on.
    ///
    /// The certificate and the `{{resolve:ssm:...}}` ACL lookup of a
    /// CloudFront site only work in `us-east-1`, so a main stack pinned
    /// elsewhere is rejected. An unpinned one is pinned there by `synthesize`.
    ///
    /// # Errors
    ///
    /// Returns the first violated validation rule, or
    /// [`SynthError::CloudFrontRegion`].
    pub fn validate(settings: &SiteSettings) -> Result<ValidationReport> {
        let acl_reference = settings
            .add_cloudfront
            .then(|| WafStack::parameter_name_for(&waf_stack_name(settings)));
        let report = ConfigValidator::new().validate(settings.stack_options(acl_reference))?;

        let config = &report.configuration;
        if config.add_cloudfront()
            && let Some(region) = config.region()
            && region != CLOUDFRONT_ACL_REGION
        {
            return Err(SynthError::CloudFrontRegion {
                stack: main_stack_name(settings),
                region: region.to_string(),
                required: CLOUDFRONT_ACL_REGION,
            }
            .into());
        }

        Ok(report)
    }

    /// Looks up a stack by name.
    #[must_use]
    pub fn stack(&self, name: &str) -> Option<&AssemblyStack> {
        self.stacks.iter().find(|s| s.name == name)
    }

    /// The site stack, always the last one.
    #[must_use]
    pub fn main_stack(&self) -> Option<&AssemblyStack> {
        self.stacks.last()
    }

    /// Total number of resources across all stacks.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.stacks.iter().map(|s| s.template.resources.len()).sum()
    }

    /// Renders every file of the assembly as `(file name, contents)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a template or the manifest cannot be serialized.
    pub fn files(&self) -> Result<Vec<(String, String)>> {
        let mut files = Vec::with_capacity(self.stacks.len() + 1);
        for stack in &self.stacks {
            let contents = serde_json::to_string_pretty(&stack.template).map_err(|e| {
                SynthError::serialization(format!("Failed to serialize {}: {e}", stack.name))
            })?;
            files.push((stack.template_file(), contents));
        }

        let manifest = serde_json::to_string_pretty(&self.manifest)
            .map_err(|e| SynthError::serialization(format!("Failed to serialize manifest: {e}")))?;
        files.push((String::from(MANIFEST_FILE), manifest));

        Ok(files)
    }

    /// Writes the assembly into a directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a file cannot be written.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for (name, contents) in self.files()? {
            let path = dir.join(name);
            fs::write(&path, contents)?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        info!("Wrote cloud assembly to {}", dir.display());
        Ok(written)
    }
}

/// Name of the WAF stack, `<stack>Waf`.
#[must_use]
pub fn waf_stack_name(settings: &SiteSettings) -> String {
    format!("{}Waf", settings.stack_name())
}

/// Name of the site stack, `<stack>Main`.
#[must_use]
pub fn main_stack_name(settings: &SiteSettings) -> String {
    format!("{}Main", settings.stack_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, SiteStackError, ValidationError};
    use tempfile::TempDir;

    fn settings() -> SiteSettings {
        SiteSettings {
            domain: Some(String::from("example.com")),
            base_domain: Some(String::from("example.com")),
            owner: Some(String::from("acme")),
            repo: Some(String::from("site")),
            region: Some(String::from("us-east-1")),
            ..SiteSettings::default()
        }
    }

    #[test]
    fn test_main_stack_only_without_cloudfront() {
        let assembly = CloudAssembly::synthesize(&settings()).unwrap();

        assert_eq!(assembly.stacks.len(), 1);
        let main = assembly.main_stack().unwrap();
        assert_eq!(main.name, "AwsStaticSiteStackMain");
        assert!(main.dependencies.is_empty());
        assert_eq!(
            main.template.description.as_deref(),
            Some("Stack for hosting static site for example.com")
        );
    }

    #[test]
    fn test_waf_stack_with_cloudfront() {
        let assembly = CloudAssembly::synthesize(&SiteSettings {
            stack: Some(String::from("Blog")),
            add_cloudfront: true,
            ..settings()
        })
        .unwrap();

        assert_eq!(assembly.stacks.len(), 2);
        let waf = assembly.stack("BlogWaf").unwrap();
        assert_eq!(waf.region.as_deref(), Some("us-east-1"));
        assert_eq!(
            waf.template.description.as_deref(),
            Some("Stack for WAFv2 ACL for example.com")
        );

        let main = assembly.stack("BlogMain").unwrap();
        assert_eq!(main.dependencies, ["BlogWaf"]);
        let distribution = main
            .template
            .resources_of_type("AWS::CloudFront::Distribution")
            .next()
            .unwrap()
            .1;
        assert_eq!(
            distribution.property("/DistributionConfig/WebACLId").unwrap(),
            "{{resolve:ssm:BlogWafAclArn}}"
        );
        assert_eq!(assembly.manifest.stacks["BlogMain"].dependencies, ["BlogWaf"]);
    }

    #[test]
    fn test_cloudfront_outside_us_east_1_is_rejected() {
        let eu = SiteSettings {
            add_cloudfront: true,
            region: Some(String::from("eu-west-1")),
            ..settings()
        };

        for result in [
            CloudAssembly::validate(&eu).map(|_| ()),
            CloudAssembly::synthesize(&eu).map(|_| ()),
        ] {
            match result {
                Err(SiteStackError::Synth(SynthError::CloudFrontRegion {
                    stack,
                    region,
                    required,
                })) => {
                    assert_eq!(stack, "AwsStaticSiteStackMain");
                    assert_eq!(region, "eu-west-1");
                    assert_eq!(required, "us-east-1");
                }
                other => panic!("expected a region error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unpinned_cloudfront_site_is_pinned_to_us_east_1() {
        let assembly = CloudAssembly::synthesize(&SiteSettings {
            add_cloudfront: true,
            region: None,
            ..settings()
        })
        .unwrap();
        let main = assembly.main_stack().unwrap();
        assert_eq!(main.region.as_deref(), Some("us-east-1"));
        assert_eq!(
            assembly.manifest.stacks["AwsStaticSiteStackMain"].region.as_deref(),
            Some("us-east-1")
        );
    }

    #[test]
    fn test_regional_site_without_cloudfront_keeps_its_region() {
        let assembly = CloudAssembly::synthesize(&SiteSettings {
            region: Some(String::from("eu-west-1")),
            ..settings()
        })
        .unwrap();
        assert_eq!(assembly.main_stack().unwrap().region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_invalid_settings_build_nothing() {
        let result = CloudAssembly::synthesize(&SiteSettings {
            owner: None,
            ..settings()
        });
        assert!(matches!(
            result,
            Err(SiteStackError::Config(ConfigError::Invalid(
                ValidationError::MissingGitHubRepository { .. }
            )))
        ));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = TempDir::new().unwrap();
        let assembly = CloudAssembly::synthesize(&SiteSettings {
            add_cloudfront: true,
            ..settings()
        })
        .unwrap();

        let written = assembly.write_to_dir(dir.path().join(DEFAULT_OUTPUT_DIR)).unwrap();
        assert_eq!(written.len(), 3);

        let manifest: Manifest = serde_json::from_str(
            &fs::read_to_string(dir.path().join(DEFAULT_OUTPUT_DIR).join(MANIFEST_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest, assembly.manifest);
        assert_eq!(
            manifest.stacks["AwsStaticSiteStackWaf"].template_file,
            "AwsStaticSiteStackWaf.template.json"
        );
    }

    #[test]
    fn test_template_hashes_are_stable() {
        let first = CloudAssembly::synthesize(&settings()).unwrap();
        let second = CloudAssembly::synthesize(&settings()).unwrap();
        assert_eq!(first.manifest.stacks, second.manifest.stacks);
        assert_eq!(first.manifest.fingerprint, second.manifest.fingerprint);
    }
}
