// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Static Site Stack
//!
//! Synthesizes the infrastructure for a static website on AWS as
//! CloudFormation templates.
//!
//! ## Overview
//!
//! From one settings file the crate produces:
//!
//! - A site bucket configured for website hosting, plus an optional `www` redirect bucket
//! - An optional CloudFront distribution with a certificate and a basic-auth viewer function
//! - A WAFv2 web ACL built from AWS managed rule groups and a rate-limit rule
//! - A CodeBuild project that builds the site from GitHub and deploys it to the bucket
//!
//! ## Architecture
//!
//! 1. **Settings**: `settings.json` (or YAML) with environment overrides
//! 2. **Validation**: settings become an immutable [`config::StackConfiguration`]
//! 3. **Synthesis**: the WAF stack and the main stack are written as a cloud assembly
//! 4. **Publishing**: assemblies are recorded locally or in S3 for change tracking
//!
//! ## Modules
//!
//! - [`config`]: Settings parsing and validation
//! - [`waf`]: Managed rule catalog and the web ACL stack
//! - [`edge`]: The basic-auth CloudFront function
//! - [`site`]: The main hosting stack
//! - [`synth`]: Template model and cloud assembly output
//! - [`publish`]: Publish backends (local, S3)
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```json
//! {
//!   "domain": "www.example.com",
//!   "base_domain": "example.com",
//!   "owner": "acme",
//!   "repo": "website",
//!   "add_cloudfront": true,
//!   "add_basic_auth": true,
//!   "basic_auth_credentials": { "preview": "s3cret" }
//! }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod edge;
pub mod error;
pub mod publish;
pub mod site;
pub mod synth;
pub mod waf;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigHasher, ConfigParser, ConfigValidator, SiteSettings, StackConfiguration};
pub use edge::BasicAuthInterceptor;
pub use error::{Result, SiteStackError};
pub use publish::{AssemblyStore, LocalAssemblyStore, PublishRecord, S3AssemblyStore};
pub use site::StaticSiteStack;
pub use synth::{CloudAssembly, Template};
pub use waf::{WafRule, WafStack, make_rules};
