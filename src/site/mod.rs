//! Site module: the main stack hosting the static site.

mod buildspec;
mod endpoints;
mod stack;

pub use buildspec::{BuildSpec, DISTRIBUTION_ID_VARIABLE};
pub use endpoints::{CLOUDFRONT_HOSTED_ZONE_ID, WebsiteEndpoint, s3_website_endpoint};
pub use stack::{
    CACHING_OPTIMIZED_POLICY_ID, FUNCTION_RUNTIME, MAX_FUNCTION_NAME_LENGTH, StaticSiteStack,
    record_name,
};
