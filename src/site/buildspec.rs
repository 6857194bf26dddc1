//! CodeBuild buildspec for the site pipeline.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::BuildSettings;
use crate::error::{Result, SynthError};

/// Environment variable carrying the distribution id into the build.
pub const DISTRIBUTION_ID_VARIABLE: &str = "DISTRIBUTION_ID";

/// Buildspec document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BuildSpec {
    version: f64,
    phases: Phases,
    artifacts: Artifacts,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct Phases {
    install: Phase,
    build: Phase,
    post_build: Phase,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct Phase {
    #[serde(rename = "runtime-versions", skip_serializing_if = "Option::is_none")]
    runtime_versions: Option<BTreeMap<String, u32>>,
    commands: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct Artifacts {
    #[serde(rename = "base-directory")]
    base_directory: String,
    files: String,
}

impl BuildSpec {
    /// Buildspec that installs, builds and, with a distribution, invalidates
    /// the CDN cache after the artifacts are uploaded.
    #[must_use]
    pub fn for_site(build: &BuildSettings, invalidate_distribution: bool) -> Self {
        let mut post_build = vec![String::from("echo \"Starting post build\"")];
        if invalidate_distribution {
            post_build.push(format!(
                "aws cloudfront create-invalidation --distribution-id \"${{{DISTRIBUTION_ID_VARIABLE}}}\" --paths \"/*\""
            ));
        }

        Self {
            version: 0.2,
            phases: Phases {
                install: Phase {
                    runtime_versions: Some(BTreeMap::from([(
                        String::from("nodejs"),
                        build.node_version,
                    )])),
                    commands: vec![
                        String::from("echo \"Installing dependencies\""),
                        String::from("node -v"),
                        String::from("npm -v"),
                        String::from("npm i"),
                    ],
                },
                build: Phase {
                    runtime_versions: None,
                    commands: vec![
                        String::from("echo \"Starting build\""),
                        build.build_command.clone(),
                    ],
                },
                post_build: Phase {
                    runtime_versions: None,
                    commands: post_build,
                },
            },
            artifacts: Artifacts {
                base_directory: build.artifact_directory.clone(),
                files: String::from("**/*"),
            },
        }
    }

    /// Renders the buildspec as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            SynthError::serialization(format!("Failed to render buildspec: {e}")).into()
        })
    }
}
