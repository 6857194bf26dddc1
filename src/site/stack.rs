//! The main site stack.
//!
//! Resources are declared in dependency order: buckets, certificate, edge
//! function and distribution, DNS records, then the build pipeline that
//! publishes into the site bucket.

use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::{StackConfiguration, limited_name};
use crate::edge::{encode_credentials, render_function_code};
use crate::error::{Result, SynthError};
use crate::synth::{
    RemovalPolicy, Resource, Template, cfn_ref, get_att, resolve_secret, resolve_ssm, sub,
    website_host,
};

use super::buildspec::{BuildSpec, DISTRIBUTION_ID_VARIABLE};
use super::endpoints::{CLOUDFRONT_HOSTED_ZONE_ID, s3_website_endpoint};

/// Managed `CachingOptimized` cache policy.
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

/// Runtime of the viewer-request function.
pub const FUNCTION_RUNTIME: &str = "cloudfront-js-1.0";

/// Longest name CloudFront accepts for a function.
pub const MAX_FUNCTION_NAME_LENGTH: usize = 64;

/// A synthesized site stack.
#[derive(Debug, Clone)]
pub struct StaticSiteStack {
    /// Logical id of the site bucket.
    pub bucket_id: String,
    /// Logical id of the distribution, when one is declared.
    pub distribution_id: Option<String>,
    /// Logical id of the build project.
    pub project_id: String,
    /// The template.
    pub template: Template,
}

/// Where an A record points.
enum AliasTarget<'a> {
    Distribution(&'a str),
    Website,
}

impl StaticSiteStack {
    /// Builds the site stack from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when DNS records must target an S3 website endpoint
    /// and the region is missing or unknown, or when the buildspec cannot be
    /// rendered.
    pub fn build(config: &StackConfiguration, description: impl Into<String>) -> Result<Self> {
        let mut template = Template::new(description);
        let base = config.base_id();

        let bucket_id = add_site_bucket(&mut template, config);
        if let Some(www) = config.www() {
            add_redirect_bucket(&mut template, config.domain(), &www.domain, &www.id);
        }

        let distribution_id = if config.add_cloudfront() {
            Some(add_distribution(&mut template, config, &bucket_id))
        } else {
            None
        };

        let target = match &distribution_id {
            Some(id) => AliasTarget::Distribution(id),
            None => AliasTarget::Website,
        };
        add_records(&mut template, config, &target)?;

        let role_id = add_build_role(&mut template, base, &bucket_id, distribution_id.as_deref());
        let credential_id = config
            .github()
            .access_token_secret_name
            .as_deref()
            .map(|secret| add_source_credential(&mut template, base, secret));
        let project_id = add_build_project(
            &mut template,
            config,
            &bucket_id,
            &role_id,
            distribution_id.as_deref(),
            credential_id.as_deref(),
        )?;

        template.add_output("BucketName", cfn_ref(&bucket_id), "Site bucket");
        template.add_output(
            "WebsiteURL",
            get_att(&bucket_id, "WebsiteURL"),
            "S3 website endpoint of the site bucket",
        );
        if let Some(id) = &distribution_id {
            template.add_output("DistributionId", cfn_ref(id), "CloudFront distribution id");
            template.add_output(
                "DistributionDomainName",
                get_att(id, "DomainName"),
                "CloudFront distribution domain",
            );
        }
        template.add_output("BuildProject", cfn_ref(&project_id), "Site build project");

        info!(
            "Built site stack for {} with {} resources",
            config.domain(),
            template.resources.len()
        );

        Ok(Self {
            bucket_id,
            distribution_id,
            project_id,
            template,
        })
    }
}

/// Fully qualified record name for a record relative to the base domain.
#[must_use]
pub fn record_name(record: &str, base_domain: &str) -> String {
    if record.is_empty() {
        format!("{base_domain}.")
    } else {
        format!("{record}.{base_domain}.")
    }
}

fn website_cors() -> Value {
    json!({
        "CorsRules": [{ "AllowedOrigins": ["*"], "AllowedMethods": ["GET"] }]
    })
}

fn public_access() -> Value {
    json!({
        "BlockPublicAcls": false,
        "BlockPublicPolicy": false,
        "IgnorePublicAcls": false,
        "RestrictPublicBuckets": false,
    })
}

fn add_public_read_policy(template: &mut Template, bucket_id: &str) {
    template.add_resource(
        &format!("{bucket_id}Policy"),
        Resource::new(
            "AWS::S3::BucketPolicy",
            json!({
                "Bucket": cfn_ref(bucket_id),
                "PolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": { "AWS": "*" },
                        "Action": "s3:GetObject",
                        "Resource": { "Fn::Join": ["", [get_att(bucket_id, "Arn"), "/*"]] },
                    }],
                },
            }),
        ),
    );
}

fn add_site_bucket(template: &mut Template, config: &StackConfiguration) -> String {
    let bucket_id = template.add_resource(
        &format!("{}Bucket", config.base_id()),
        Resource::new(
            "AWS::S3::Bucket",
            json!({
                "BucketName": config.domain(),
                "WebsiteConfiguration": {
                    "IndexDocument": "index.html",
                    "ErrorDocument": "index.html",
                },
                "CorsConfiguration": website_cors(),
                "PublicAccessBlockConfiguration": public_access(),
            }),
        )
        .with_removal_policy(RemovalPolicy::Delete),
    );
    add_public_read_policy(template, &bucket_id);
    debug!("Declared site bucket {bucket_id}");
    bucket_id
}

fn add_redirect_bucket(template: &mut Template, domain: &str, www_domain: &str, www_id: &str) {
    let bucket_id = template.add_resource(
        &format!("{www_id}Bucket"),
        Resource::new(
            "AWS::S3::Bucket",
            json!({
                "BucketName": www_domain,
                "WebsiteConfiguration": {
                    "RedirectAllRequestsTo": { "HostName": domain, "Protocol": "https" },
                },
                "CorsConfiguration": website_cors(),
                "PublicAccessBlockConfiguration": public_access(),
            }),
        )
        .with_removal_policy(RemovalPolicy::Delete),
    );
    add_public_read_policy(template, &bucket_id);
    debug!("Declared redirect bucket {bucket_id} for {www_domain}");
}

fn site_aliases(config: &StackConfiguration) -> Vec<String> {
    let mut aliases = vec![config.domain().to_string()];
    if let Some(www) = config.www() {
        aliases.push(www.domain.clone());
    }
    aliases
}

fn add_distribution(template: &mut Template, config: &StackConfiguration, bucket_id: &str) -> String {
    let base = config.base_id();
    let aliases = site_aliases(config);

    let mut certificate = json!({
        "DomainName": config.domain(),
        "SubjectAlternativeNames": aliases,
        "ValidationMethod": "DNS",
    });
    if let Some(zone) = config.hosted_zone_id() {
        certificate["DomainValidationOptions"] = aliases
            .iter()
            .map(|name| json!({ "DomainName": name, "HostedZoneId": zone }))
            .collect();
    }
    let certificate_id = template.add_resource(
        &format!("{base}Certificate"),
        Resource::new("AWS::CertificateManager::Certificate", certificate),
    );

    let function_id = config.basic_auth_credentials().map(|credentials| {
        template.add_resource(
            &format!("{base}AuthFunction"),
            Resource::new(
                "AWS::CloudFront::Function",
                json!({
                    "Name": limited_name(&format!("{base}AuthFunction"), MAX_FUNCTION_NAME_LENGTH),
                    "AutoPublish": true,
                    "FunctionCode": render_function_code(&encode_credentials(credentials)),
                    "FunctionConfig": {
                        "Comment": format!(
                            "HTTP Basic Authorizer function for {} CloudFront distribution",
                            config.domain()
                        ),
                        "Runtime": FUNCTION_RUNTIME,
                    },
                }),
            ),
        )
    });

    let origin_id = format!("{base}Origin");
    let mut cache_behavior = json!({
        "TargetOriginId": origin_id,
        "ViewerProtocolPolicy": "redirect-to-https",
        "CachePolicyId": CACHING_OPTIMIZED_POLICY_ID,
        "Compress": true,
    });
    if let Some(function_id) = &function_id {
        cache_behavior["FunctionAssociations"] = json!([{
            "EventType": "viewer-request",
            "FunctionARN": get_att(function_id, "FunctionARN"),
        }]);
    }

    let mut distribution = json!({
        "Enabled": true,
        "Comment": format!("Distribution for hosting {}", config.domain()),
        "Aliases": aliases,
        "HttpVersion": "http2",
        "IPV6Enabled": true,
        "Origins": [{
            "Id": origin_id,
            "DomainName": website_host(bucket_id),
            "CustomOriginConfig": { "OriginProtocolPolicy": "http-only" },
        }],
        "DefaultCacheBehavior": cache_behavior,
        "ViewerCertificate": {
            "AcmCertificateArn": cfn_ref(&certificate_id),
            "SslSupportMethod": "sni-only",
            "MinimumProtocolVersion": "TLSv1.2_2021",
        },
    });
    if let Some(acl) = config.cloudfront_acl_reference() {
        distribution["WebACLId"] = Value::String(resolve_ssm(acl));
    }

    let distribution_id = template.add_resource(
        &format!("{base}Distribution"),
        Resource::new(
            "AWS::CloudFront::Distribution",
            json!({ "DistributionConfig": distribution }),
        ),
    );
    debug!(
        "Declared distribution {distribution_id} with basic auth {}",
        if function_id.is_some() { "enabled" } else { "disabled" }
    );
    distribution_id
}

fn alias_target(config: &StackConfiguration, target: &AliasTarget<'_>) -> Result<Value> {
    match target {
        AliasTarget::Distribution(id) => Ok(json!({
            "DNSName": get_att(id, "DomainName"),
            "HostedZoneId": CLOUDFRONT_HOSTED_ZONE_ID,
        })),
        AliasTarget::Website => {
            let region = config.region().ok_or_else(|| SynthError::MissingRegion {
                domain: config.domain().to_string(),
            })?;
            let endpoint = s3_website_endpoint(region).ok_or_else(|| {
                SynthError::UnsupportedRegion {
                    region: region.to_string(),
                }
            })?;
            Ok(json!({
                "DNSName": endpoint.dns_name,
                "HostedZoneId": endpoint.hosted_zone_id,
            }))
        }
    }
}

fn add_records(
    template: &mut Template,
    config: &StackConfiguration,
    target: &AliasTarget<'_>,
) -> Result<()> {
    let alias = alias_target(config, target)?;
    let (zone_key, zone) = match config.hosted_zone_id() {
        Some(id) => ("HostedZoneId", id.to_string()),
        None => ("HostedZoneName", format!("{}.", config.base_domain())),
    };
    let sub_domain = config.sub_domain();

    let mut record = |id: &str, name: String, comment: String| {
        let mut properties = json!({
            "Name": name,
            "Type": "A",
            "Comment": comment,
            "AliasTarget": alias,
        });
        properties[zone_key] = Value::String(zone.clone());
        template.add_resource(id, Resource::new("AWS::Route53::RecordSet", properties));
    };

    record(
        &format!("{}DNS", config.base_id()),
        record_name(&sub_domain, config.base_domain()),
        format!("Site record for {}", config.domain()),
    );

    if let Some(www) = config.www() {
        let www_record = if sub_domain.is_empty() {
            String::from("www")
        } else {
            format!("www.{sub_domain}")
        };
        record(
            &format!("{}DNS", www.id),
            record_name(&www_record, config.base_domain()),
            format!("Site record for {}", www.domain),
        );
    }

    Ok(())
}

fn add_build_role(
    template: &mut Template,
    base: &str,
    bucket_id: &str,
    distribution_id: Option<&str>,
) -> String {
    let mut statements = vec![
        json!({
            "Effect": "Allow",
            "Action": ["logs:CreateLogGroup", "logs:CreateLogStream", "logs:PutLogEvents"],
            "Resource": sub(
                "arn:${AWS::Partition}:logs:${AWS::Region}:${AWS::AccountId}:log-group:/aws/codebuild/*"
            ),
        }),
        json!({
            "Effect": "Allow",
            "Action": [
                "s3:GetObject",
                "s3:PutObject",
                "s3:DeleteObject",
                "s3:ListBucket",
                "s3:GetBucketLocation",
            ],
            "Resource": [
                get_att(bucket_id, "Arn"),
                { "Fn::Join": ["", [get_att(bucket_id, "Arn"), "/*"]] },
            ],
        }),
    ];

    if let Some(id) = distribution_id {
        statements.push(json!({
            "Effect": "Allow",
            "Action": "cloudfront:CreateInvalidation",
            "Resource": sub(&format!(
                "arn:${{AWS::Partition}}:cloudfront::${{AWS::AccountId}}:distribution/${{{id}}}"
            )),
        }));
    }

    template.add_resource(
        &format!("{base}CodeBuildRole"),
        Resource::new(
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": { "Service": "codebuild.amazonaws.com" },
                        "Action": "sts:AssumeRole",
                    }],
                },
                "Policies": [{
                    "PolicyName": format!("{base}CodeBuildPolicy"),
                    "PolicyDocument": { "Version": "2012-10-17", "Statement": statements },
                }],
            }),
        ),
    )
}

fn add_source_credential(template: &mut Template, base: &str, secret_name: &str) -> String {
    template.add_resource(
        &format!("{base}CodeBuildGitHubCreds"),
        Resource::new(
            "AWS::CodeBuild::SourceCredential",
            json!({
                "AuthType": "PERSONAL_ACCESS_TOKEN",
                "ServerType": "GITHUB",
                "Token": resolve_secret(secret_name),
            }),
        ),
    )
}

fn add_build_project(
    template: &mut Template,
    config: &StackConfiguration,
    bucket_id: &str,
    role_id: &str,
    distribution_id: Option<&str>,
    credential_id: Option<&str>,
) -> Result<String> {
    let github = config.github();
    let build = config.build();
    let buildspec = BuildSpec::for_site(build, distribution_id.is_some()).to_yaml()?;

    let variables: Vec<Value> = distribution_id
        .map(|id| {
            json!({
                "Name": DISTRIBUTION_ID_VARIABLE,
                "Type": "PLAINTEXT",
                "Value": cfn_ref(id),
            })
        })
        .into_iter()
        .collect();

    let mut project = Resource::new(
        "AWS::CodeBuild::Project",
        json!({
            "Description": format!("Build and deploy {} from GitHub", config.domain()),
            "ServiceRole": get_att(role_id, "Arn"),
            "ConcurrentBuildLimit": 1,
            "Source": {
                "Type": "GITHUB",
                "Location": format!("https://github.com/{}/{}.git", github.owner, github.repo),
                "BuildSpec": buildspec,
                "ReportBuildStatus": true,
            },
            "Triggers": {
                "Webhook": true,
                "BuildType": "BUILD",
                "FilterGroups": [[
                    { "Type": "EVENT", "Pattern": "PUSH" },
                    { "Type": "HEAD_REF", "Pattern": format!("^refs/heads/{}$", github.branch) },
                ]],
            },
            "Environment": {
                "Type": "LINUX_CONTAINER",
                "ComputeType": "BUILD_GENERAL1_SMALL",
                "Image": build.image,
                "PrivilegedMode": false,
                "EnvironmentVariables": variables,
            },
            "Artifacts": {
                "Type": "S3",
                "Location": cfn_ref(bucket_id),
                "Name": "/",
                "NamespaceType": "NONE",
                "Packaging": "NONE",
                "EncryptionDisabled": true,
                "OverrideArtifactName": false,
            },
        }),
    );
    if let Some(credential_id) = credential_id {
        project = project.depends_on(credential_id);
    }

    let project_id = template.add_resource(&format!("{}Build", config.base_id()), project);
    debug!(
        "Declared build project {project_id} for {}/{} on {}",
        github.owner, github.repo, github.branch
    );
    Ok(project_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, StackOptions};
    use crate::error::SiteStackError;

    fn options() -> StackOptions {
        StackOptions {
            domain: Some(String::from("blog.example.com")),
            base_domain: Some(String::from("example.com")),
            github_owner: Some(String::from("acme")),
            github_repo: Some(String::from("blog")),
            region: Some(String::from("eu-west-1")),
            ..StackOptions::default()
        }
    }

    fn cdn_options() -> StackOptions {
        StackOptions {
            add_cloudfront: true,
            add_www: true,
            cloudfront_acl_reference: Some(String::from("SiteWafAclArn")),
            ..options()
        }
    }

    fn build(options: StackOptions) -> Result<StaticSiteStack> {
        let config = StackConfiguration::new(options)?;
        StaticSiteStack::build(&config, "test")
    }

    #[test]
    fn test_bucket_only_site() {
        let stack = build(options()).unwrap();
        let template = &stack.template;

        assert!(stack.distribution_id.is_none());
        assert_eq!(template.resources_of_type("AWS::CloudFront::Distribution").count(), 0);
        assert_eq!(template.resources_of_type("AWS::CertificateManager::Certificate").count(), 0);

        let bucket = template.resource("BaseBlogExampleComBucket").unwrap();
        assert_eq!(bucket.property("/BucketName").unwrap(), "blog.example.com");
        assert_eq!(bucket.deletion_policy, Some(RemovalPolicy::Delete));

        let record = template.resource("BaseBlogExampleComDNS").unwrap();
        assert_eq!(record.property("/Name").unwrap(), "blog.example.com.");
        assert_eq!(record.property("/HostedZoneName").unwrap(), "example.com.");
        assert_eq!(
            record.property("/AliasTarget/DNSName").unwrap(),
            "s3-website-eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn test_pipeline_without_distribution() {
        let stack = build(options()).unwrap();
        let project = stack.template.resource(&stack.project_id).unwrap();

        let variables = project.property("/Environment/EnvironmentVariables").unwrap();
        assert_eq!(variables.as_array().map(Vec::len), Some(0));
        assert!(!project
            .property("/Source/BuildSpec")
            .and_then(Value::as_str)
            .unwrap()
            .contains("create-invalidation"));
        assert_eq!(
            project.property("/Triggers/FilterGroups/0/1/Pattern").unwrap(),
            "^refs/heads/main$"
        );
        assert_eq!(project.property("/ConcurrentBuildLimit").unwrap(), 1);

        let role = stack.template.resource("BaseBlogExampleComCodeBuildRole").unwrap();
        let statements = role.property("/Policies/0/PolicyDocument/Statement").unwrap();
        assert_eq!(statements.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_missing_region_without_distribution() {
        let result = build(StackOptions {
            region: None,
            ..options()
        });
        assert!(matches!(
            result,
            Err(SiteStackError::Synth(SynthError::MissingRegion { .. }))
        ));

        let result = build(StackOptions {
            region: Some(String::from("mars-north-1")),
            ..options()
        });
        assert!(matches!(
            result,
            Err(SiteStackError::Synth(SynthError::UnsupportedRegion { .. }))
        ));
    }

    #[test]
    fn test_distribution_site() {
        let stack = build(cdn_options()).unwrap();
        let template = &stack.template;
        let distribution = template
            .resource(stack.distribution_id.as_deref().unwrap())
            .unwrap();

        assert_eq!(
            distribution.property("/DistributionConfig/Aliases").unwrap(),
            &json!(["blog.example.com", "www.blog.example.com"])
        );
        assert_eq!(
            distribution.property("/DistributionConfig/WebACLId").unwrap(),
            "{{resolve:ssm:SiteWafAclArn}}"
        );
        assert!(distribution
            .property("/DistributionConfig/DefaultCacheBehavior/FunctionAssociations")
            .is_none());

        let www = template.resource("WwwBlogExampleComDNS").unwrap();
        assert_eq!(www.property("/Name").unwrap(), "www.blog.example.com.");
        assert_eq!(
            www.property("/AliasTarget/HostedZoneId").unwrap(),
            CLOUDFRONT_HOSTED_ZONE_ID
        );

        let redirect = template.resource("WwwBlogExampleComBucket").unwrap();
        assert_eq!(
            redirect.property("/WebsiteConfiguration/RedirectAllRequestsTo/HostName").unwrap(),
            "blog.example.com"
        );

        let project = template.resource(&stack.project_id).unwrap();
        assert_eq!(
            project.property("/Environment/EnvironmentVariables/0/Name").unwrap(),
            "DISTRIBUTION_ID"
        );
        let role = template.resource("BaseBlogExampleComCodeBuildRole").unwrap();
        assert_eq!(
            role.property("/Policies/0/PolicyDocument/Statement/2/Action").unwrap(),
            "cloudfront:CreateInvalidation"
        );
    }

    #[test]
    fn test_www_alias_only_when_requested() {
        let stack = build(StackOptions {
            add_www: false,
            ..cdn_options()
        })
        .unwrap();
        let distribution = stack
            .template
            .resource(stack.distribution_id.as_deref().unwrap())
            .unwrap();
        assert_eq!(
            distribution.property("/DistributionConfig/Aliases").unwrap(),
            &json!(["blog.example.com"])
        );
        assert!(stack.template.resource("WwwBlogExampleComBucket").is_none());
    }

    #[test]
    fn test_basic_auth_function() {
        let stack = build(StackOptions {
            add_basic_auth: true,
            basic_auth_credentials: Some(Credentials::from([(
                String::from("user"),
                String::from("password"),
            )])),
            ..cdn_options()
        })
        .unwrap();

        let function = stack.template.resource("BaseBlogExampleComAuthFunction").unwrap();
        assert_eq!(function.property("/FunctionConfig/Runtime").unwrap(), FUNCTION_RUNTIME);
        assert!(function
            .property("/FunctionCode")
            .and_then(Value::as_str)
            .unwrap()
            .contains("dXNlcjpwYXNzd29yZA=="));

        let distribution = stack
            .template
            .resource(stack.distribution_id.as_deref().unwrap())
            .unwrap();
        assert_eq!(
            distribution
                .property("/DistributionConfig/DefaultCacheBehavior/FunctionAssociations/0/EventType")
                .unwrap(),
            "viewer-request"
        );
    }

    #[test]
    fn test_function_name_fits_cloudfront_limit() {
        let credentials = Some(Credentials::from([(
            String::from("user"),
            String::from("password"),
        )]));
        let short = build(StackOptions {
            add_basic_auth: true,
            basic_auth_credentials: credentials.clone(),
            ..cdn_options()
        })
        .unwrap();
        assert_eq!(
            short
                .template
                .resource("BaseBlogExampleComAuthFunction")
                .and_then(|f| f.property("/Name"))
                .unwrap(),
            "BaseBlogExampleComAuthFunction"
        );

        let domain = format!("{}.example.com", "preview-environment".repeat(3));
        let long = build(StackOptions {
            domain: Some(domain),
            add_basic_auth: true,
            basic_auth_credentials: credentials,
            ..cdn_options()
        })
        .unwrap();
        let (_, function) = long
            .template
            .resources_of_type("AWS::CloudFront::Function")
            .next()
            .unwrap();
        let name = function.property("/Name").and_then(Value::as_str).unwrap();
        assert_eq!(name.len(), MAX_FUNCTION_NAME_LENGTH);
        assert!(name.starts_with("BasePreviewEnvironment"));
    }

    #[test]
    fn test_certificate_validation_options_with_zone() {
        let stack = build(StackOptions {
            hosted_zone_id: Some(String::from("Z123")),
            ..cdn_options()
        })
        .unwrap();
        let certificate = stack.template.resource("BaseBlogExampleComCertificate").unwrap();
        assert_eq!(
            certificate.property("/DomainValidationOptions/1/DomainName").unwrap(),
            "www.blog.example.com"
        );
        let record = stack.template.resource("BaseBlogExampleComDNS").unwrap();
        assert_eq!(record.property("/HostedZoneId").unwrap(), "Z123");
        assert!(record.property("/HostedZoneName").is_none());
    }

    #[test]
    fn test_source_credential() {
        let stack = build(StackOptions {
            github_add_credentials: true,
            github_access_token_secret_name: Some(String::from("github-token")),
            ..options()
        })
        .unwrap();
        let credential = stack
            .template
            .resource("BaseBlogExampleComCodeBuildGitHubCreds")
            .unwrap();
        assert_eq!(
            credential.property("/Token").unwrap(),
            "{{resolve:secretsmanager:github-token}}"
        );
        let project = stack.template.resource(&stack.project_id).unwrap();
        assert_eq!(project.depends_on, ["BaseBlogExampleComCodeBuildGitHubCreds"]);
    }

    #[test]
    fn test_record_names() {
        assert_eq!(record_name("", "example.com"), "example.com.");
        assert_eq!(record_name("www.blog", "example.com"), "www.blog.example.com.");
    }
}
