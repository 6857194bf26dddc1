//! WAF stack: a web ACL plus an SSM parameter publishing its ARN.

use serde_json::json;
use std::fmt;
use tracing::{debug, info};

use crate::error::Result;
use crate::synth::{Resource, Template, cfn_ref, get_att};

use super::rules::{ManagedRuleDescriptor, RuleCatalog, VisibilityConfig, make_rules};

/// Region CloudFront-scoped web ACLs must live in.
pub const CLOUDFRONT_ACL_REGION: &str = "us-east-1";

/// What the web ACL protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WafStackPurpose {
    /// A CloudFront distribution.
    CloudFront,
    /// A regional API Gateway.
    ApiGateway,
}

impl WafStackPurpose {
    /// Web ACL scope for this purpose.
    #[must_use]
    pub const fn scope(self) -> &'static str {
        match self {
            Self::CloudFront => "CLOUDFRONT",
            Self::ApiGateway => "REGIONAL",
        }
    }
}

impl fmt::Display for WafStackPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CloudFront => write!(f, "CLOUDFRONT"),
            Self::ApiGateway => write!(f, "APIGATEWAY"),
        }
    }
}

/// A synthesized WAF stack.
#[derive(Debug, Clone)]
pub struct WafStack {
    /// ACL name, `<stack id>Acl`.
    pub acl_name: String,
    /// SSM parameter holding the ACL ARN, `<acl name>Arn`.
    pub ssm_parameter_name: String,
    /// The template.
    pub template: Template,
}

impl WafStack {
    /// SSM parameter name the stack with the given id publishes.
    ///
    /// Known before the stack is built, so dependents can be validated first.
    #[must_use]
    pub fn parameter_name_for(stack_id: &str) -> String {
        format!("{}Arn", Self::acl_name_for(stack_id))
    }

    fn acl_name_for(stack_id: &str) -> String {
        format!("{stack_id}Acl")
    }

    /// Builds the WAF stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule catalog violates its invariants.
    pub fn build(
        stack_id: &str,
        description: impl Into<String>,
        purpose: WafStackPurpose,
        catalog: &[ManagedRuleDescriptor],
    ) -> Result<Self> {
        RuleCatalog::new(catalog).validate()?;

        let acl_name = Self::acl_name_for(stack_id);
        let ssm_parameter_name = Self::parameter_name_for(stack_id);
        let rules = make_rules(catalog);
        debug!("Assembled {} web ACL rules for {acl_name}", rules.len());

        let mut template = Template::new(description);

        let acl_id = template.add_resource(
            &acl_name,
            Resource::new(
                "AWS::WAFv2::WebACL",
                json!({
                    "Name": acl_name,
                    "Description": "WAFv2 ACL for CloudFront",
                    "DefaultAction": { "Allow": {} },
                    "Scope": purpose.scope(),
                    "VisibilityConfig": VisibilityConfig::enabled(acl_name.as_str()),
                    "Rules": rules,
                    "Tags": [
                        { "Key": "CreatedBy", "Value": "CloudFormation" },
                        { "Key": "Name", "Value": acl_name },
                        { "Key": "Purpose", "Value": purpose.to_string() },
                    ],
                }),
            ),
        );

        let parameter_id = template.add_resource(
            &ssm_parameter_name,
            Resource::new(
                "AWS::SSM::Parameter",
                json!({
                    "Name": ssm_parameter_name,
                    "Type": "String",
                    "Value": get_att(&acl_id, "Arn"),
                }),
            ),
        );

        template.add_output("AclArn", get_att(&acl_id, "Arn"), "ARN of the web ACL");
        template.add_output(
            "AclArnParameter",
            cfn_ref(&parameter_id),
            "SSM parameter holding the web ACL ARN",
        );

        info!("Built WAF stack {stack_id} with ACL {acl_name}");

        Ok(Self {
            acl_name,
            ssm_parameter_name,
            template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RuleError, SiteStackError};
    use crate::waf::MANAGED_RULES;

    #[test]
    fn test_waf_stack_resources() {
        let stack = WafStack::build(
            "SiteWaf",
            "Stack for WAFv2 ACL for example.com",
            WafStackPurpose::CloudFront,
            MANAGED_RULES,
        )
        .unwrap();

        assert_eq!(stack.acl_name, "SiteWafAcl");
        assert_eq!(stack.ssm_parameter_name, "SiteWafAclArn");
        assert_eq!(WafStack::parameter_name_for("SiteWaf"), "SiteWafAclArn");

        let acl = stack.template.resource("SiteWafAcl").unwrap();
        assert_eq!(acl.resource_type, "AWS::WAFv2::WebACL");
        assert_eq!(acl.property("/Scope").unwrap(), "CLOUDFRONT");
        assert_eq!(acl.property("/Rules").unwrap().as_array().unwrap().len(), 7);
        assert_eq!(acl.property("/Rules/6/Name").unwrap(), "RateLimit100");

        let parameter = stack.template.resource("SiteWafAclArn").unwrap();
        assert_eq!(parameter.property("/Name").unwrap(), "SiteWafAclArn");
    }

    #[test]
    fn test_regional_scope() {
        let stack =
            WafStack::build("ApiWaf", "api", WafStackPurpose::ApiGateway, MANAGED_RULES).unwrap();
        let acl = stack.template.resource("ApiWafAcl").unwrap();
        assert_eq!(acl.property("/Scope").unwrap(), "REGIONAL");
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let catalog = [MANAGED_RULES[0].clone(), MANAGED_RULES[0].clone()];
        let result = WafStack::build("SiteWaf", "x", WafStackPurpose::CloudFront, &catalog);
        assert!(matches!(
            result,
            Err(SiteStackError::Rule(RuleError::DuplicateName { .. }))
        ));
    }
}
