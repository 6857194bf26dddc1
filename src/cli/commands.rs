//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::synth::DEFAULT_OUTPUT_DIR;

/// sitestack - Validated CloudFormation synthesis for static sites.
#[derive(Parser, Debug)]
#[command(name = "sitestack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(short, long, global = true, env = "SITESTACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new site project.
    Init {
        /// Directory to initialize (defaults to current directory).
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Force overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the site settings.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Synthesize the cloud assembly.
    Synth {
        /// Output directory.
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        out: PathBuf,
    },

    /// Show the web ACL rules.
    Rules,

    /// Basic auth edge function tools.
    Auth {
        /// Auth subcommand.
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Manage published assemblies.
    Assembly {
        /// Assembly subcommand.
        #[command(subcommand)]
        command: AssemblyCommands,

        /// S3 bucket to publish to (local `.sitestack/` when omitted).
        #[arg(long, global = true, env = "SITESTACK_BUCKET")]
        bucket: Option<String>,

        /// Key prefix inside the bucket.
        #[arg(long, global = true)]
        prefix: Option<String>,

        /// Region of the bucket.
        #[arg(long, global = true)]
        region: Option<String>,
    },
}

/// Basic auth subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Print the edge function code with credentials baked in.
    Render,

    /// Dry-run a request against the configured credentials.
    Check {
        /// Value of the `Authorization` header.
        #[arg(long)]
        header: Option<String>,

        /// Request URI.
        #[arg(long, default_value = "/")]
        uri: String,
    },
}

/// Assembly publishing subcommands.
#[derive(Subcommand, Debug)]
pub enum AssemblyCommands {
    /// Synthesize and publish the assembly.
    Publish,

    /// Show the last publish record.
    Show,

    /// Compare the current settings against the last publication.
    Status,

    /// Delete the published assembly.
    Delete {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_synth() {
        let cli = Cli::try_parse_from(["sitestack", "-c", "site.yaml", "synth", "--out", "build"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("site.yaml")));
        assert!(matches!(cli.command, Commands::Synth { out } if out == PathBuf::from("build")));
    }

    #[test]
    fn test_parse_auth_check() {
        let cli =
            Cli::try_parse_from(["sitestack", "auth", "check", "--header", "Basic abc"]).unwrap();
        match cli.command {
            Commands::Auth {
                command: AuthCommands::Check { header, uri },
            } => {
                assert_eq!(header.as_deref(), Some("Basic abc"));
                assert_eq!(uri, "/");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_assembly_publish_to_bucket() {
        let cli = Cli::try_parse_from([
            "sitestack", "assembly", "publish", "--bucket", "deploys", "--prefix", "blog",
        ])
        .unwrap();
        match cli.command {
            Commands::Assembly {
                command: AssemblyCommands::Publish,
                bucket,
                prefix,
                region,
            } => {
                assert_eq!(bucket.as_deref(), Some("deploys"));
                assert_eq!(prefix.as_deref(), Some("blog"));
                assert!(region.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
