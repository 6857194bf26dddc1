//! Alias targets for Route 53 records.

/// Hosted zone of every CloudFront distribution domain.
pub const CLOUDFRONT_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// S3 website endpoints: region, hosted zone id, and whether the endpoint
/// uses the older `s3-website-<region>` form.
const S3_WEBSITE_ENDPOINTS: &[(&str, &str, bool)] = &[
    ("us-east-1", "Z3AQBSTGFYJSTF", true),
    ("us-east-2", "Z2O1EMRO9K5GLX", false),
    ("us-west-1", "Z2F56UZL2M1ACD", true),
    ("us-west-2", "Z3BJ6K6RIION7M", true),
    ("ca-central-1", "Z1QDHH18159H29", false),
    ("eu-west-1", "Z1BKCTXD74EZPE", true),
    ("eu-west-2", "Z3GKZC51ZF0DB4", false),
    ("eu-west-3", "Z3R1K369G5AVDG", false),
    ("eu-central-1", "Z21DNDUVLTQW6Q", false),
    ("eu-north-1", "Z3BAZG2TWCNX0D", false),
    ("ap-south-1", "Z11RGJOFQNVJUP", false),
    ("ap-northeast-1", "Z2M4EHUR26P7ZW", true),
    ("ap-northeast-2", "Z3W03O7B5YMIYP", false),
    ("ap-southeast-1", "Z3O0J2DXBE1FTB", true),
    ("ap-southeast-2", "Z1WCIGYICN2BYD", true),
    ("sa-east-1", "Z7KQH4QJS55SO", true),
];

/// The S3 website endpoint of a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteEndpoint {
    /// Endpoint DNS name.
    pub dns_name: String,
    /// Hosted zone of the endpoint.
    pub hosted_zone_id: &'static str,
}

/// Looks up the S3 website endpoint for a region.
#[must_use]
pub fn s3_website_endpoint(region: &str) -> Option<WebsiteEndpoint> {
    S3_WEBSITE_ENDPOINTS
        .iter()
        .find(|(name, _, _)| *name == region)
        .map(|&(name, zone, dashed)| WebsiteEndpoint {
            dns_name: if dashed {
                format!("s3-website-{name}.amazonaws.com")
            } else {
                format!("s3-website.{name}.amazonaws.com")
            },
            hosted_zone_id: zone,
        })
}
