//! Fingerprints for configurations and synthesized templates.
//!
//! Fingerprints are recorded in the assembly manifest and in publish
//! records, so that a later run can tell which stacks changed.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{Result, SynthError};
use crate::synth::Template;

use super::validator::StackConfiguration;

/// Hasher for computing configuration and template fingerprints.
#[derive(Debug, Default)]
pub struct ConfigHasher;

impl ConfigHasher {
    /// Creates a new hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a fingerprint of a validated configuration.
    ///
    /// Passwords are left out; only usernames contribute.
    #[must_use]
    pub fn hash_configuration(&self, config: &StackConfiguration) -> String {
        let mut hasher = Sha256::new();

        let mut field = |value: &str| {
            hasher.update(value.as_bytes());
            hasher.update([0u8]);
        };

        field(config.domain());
        field(config.base_domain());
        field(config.www().map_or("", |w| w.domain.as_str()));

        let github = config.github();
        field(&github.owner);
        field(&github.repo);
        field(&github.branch);
        field(github.access_token_secret_name.as_deref().unwrap_or(""));

        field(if config.add_cloudfront() { "cloudfront" } else { "" });
        field(config.cloudfront_acl_reference().unwrap_or(""));
        field(config.hosted_zone_id().unwrap_or(""));
        field(config.region().unwrap_or(""));

        // Credentials are a BTreeMap, so usernames come out sorted.
        if let Some(credentials) = config.basic_auth_credentials() {
            for user in credentials.keys() {
                field(user);
            }
        }

        let build = config.build();
        field(&build.node_version.to_string());
        field(&build.build_command);
        field(&build.artifact_directory);
        field(&build.image);

        hex::encode(hasher.finalize())
    }

    /// Computes a fingerprint of a template's JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be serialized.
    pub fn hash_template(&self, template: &Template) -> Result<String> {
        let bytes = serde_json::to_vec(template).map_err(|e| {
            SynthError::serialization(format!("Failed to serialize template: {e}"))
        })?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// Computes a short hash (first 8 characters) for display purposes.
    #[must_use]
    pub fn short_hash(&self, hash: &str) -> String {
        hash.chars().take(8).collect()
    }

    /// Compares two hashes to determine if they are equal.
    #[must_use]
    pub fn hashes_match(hash1: &str, hash2: &str) -> bool {
        hash1.as_bytes().ct_eq(hash2.as_bytes()).into()
    }
}
