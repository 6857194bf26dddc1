//! Managed rule catalog and rule assembly for the WAF web ACL.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::RuleError;

/// Vendor of the managed rule groups in the catalog.
pub const MANAGED_RULE_VENDOR: &str = "AWS";

/// Name of the synthetic rate limit rule.
pub const RATE_LIMIT_RULE_NAME: &str = "RateLimit100";

/// Priority of the synthetic rate limit rule.
pub const RATE_LIMIT_PRIORITY: i32 = 1;

/// Requests per evaluation window before a source IP is blocked.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Override action applied to a managed rule group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrideActionKind {
    /// Keep the group's own actions.
    #[default]
    None,
    /// Downgrade the group's actions to count.
    Count,
}

/// A named managed rule group with its evaluation priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedRuleDescriptor {
    /// Managed rule group name.
    pub name: &'static str,
    /// Evaluation priority; lower evaluates first.
    pub priority: i32,
    /// Override action.
    pub override_action: OverrideActionKind,
    /// Sub-rules excluded from the group.
    pub excluded_rules: &'static [&'static str],
}

impl ManagedRuleDescriptor {
    const fn managed(name: &'static str, priority: i32) -> Self {
        Self {
            name,
            priority,
            override_action: OverrideActionKind::None,
            excluded_rules: &[],
        }
    }
}

/// The managed rule groups attached to every site ACL.
pub const MANAGED_RULES: &[ManagedRuleDescriptor] = &[
    ManagedRuleDescriptor::managed("AWSManagedRulesCommonRuleSet", 10),
    ManagedRuleDescriptor::managed("AWSManagedRulesAmazonIpReputationList", 20),
    ManagedRuleDescriptor::managed("AWSManagedRulesKnownBadInputsRuleSet", 30),
    ManagedRuleDescriptor::managed("AWSManagedRulesAnonymousIpList", 40),
    ManagedRuleDescriptor::managed("AWSManagedRulesLinuxRuleSet", 50),
    ManagedRuleDescriptor::managed("AWSManagedRulesUnixRuleSet", 60),
];

/// Invariant checks over a descriptor catalog.
#[derive(Debug, Clone, Copy)]
pub struct RuleCatalog<'a> {
    descriptors: &'a [ManagedRuleDescriptor],
}

impl<'a> RuleCatalog<'a> {
    /// Wraps a descriptor list.
    #[must_use]
    pub const fn new(descriptors: &'a [ManagedRuleDescriptor]) -> Self {
        Self { descriptors }
    }

    /// Returns the wrapped descriptors.
    #[must_use]
    pub const fn descriptors(&self) -> &'a [ManagedRuleDescriptor] {
        self.descriptors
    }

    /// Checks that names and priorities are unique and that every
    /// descriptor is evaluated after the rate limit rule.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in catalog order.
    pub fn validate(&self) -> Result<(), RuleError> {
        let mut names: HashSet<&str> = HashSet::new();
        let mut priorities: HashMap<i32, &str> = HashMap::new();

        for descriptor in self.descriptors {
            if !names.insert(descriptor.name) {
                return Err(RuleError::DuplicateName {
                    name: descriptor.name.to_string(),
                });
            }

            if let Some(first) = priorities.insert(descriptor.priority, descriptor.name) {
                return Err(RuleError::DuplicatePriority {
                    priority: descriptor.priority,
                    first: first.to_string(),
                    second: descriptor.name.to_string(),
                });
            }

            if descriptor.priority <= RATE_LIMIT_PRIORITY {
                return Err(RuleError::ShadowsRateLimit {
                    name: descriptor.name.to_string(),
                    priority: descriptor.priority,
                    rate_limit_priority: RATE_LIMIT_PRIORITY,
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// Web ACL rule declarations
// ============================================================================

/// Empty JSON object used as the payload of action variants.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}

/// A web ACL rule as declared in `AWS::WAFv2::WebACL`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct WafRule {
    /// Rule name.
    pub name: String,
    /// Evaluation priority.
    pub priority: i32,
    /// Override action, for rule group references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_action: Option<OverrideAction>,
    /// Action, for plain rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    /// Match statement.
    pub statement: Statement,
    /// Metrics and sampling.
    pub visibility_config: VisibilityConfig,
}

/// Override action of a rule group reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OverrideAction {
    /// `{"None": {}}`.
    None(Empty),
    /// `{"Count": {}}`.
    Count(Empty),
}

/// Action of a plain rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RuleAction {
    /// `{"Allow": {}}`.
    Allow(Empty),
    /// `{"Block": {}}`.
    Block(Empty),
    /// `{"Count": {}}`.
    Count(Empty),
}

/// Rule match statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Statement {
    /// Reference to a vendor-managed rule group.
    ManagedRuleGroupStatement(ManagedRuleGroupStatement),
    /// Per-key request rate limit.
    RateBasedStatement(RateBasedStatement),
}

/// Managed rule group reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ManagedRuleGroupStatement {
    /// Group name.
    pub name: String,
    /// Group vendor.
    pub vendor_name: String,
    /// Excluded sub-rules.
    pub excluded_rules: Vec<ExcludedRule>,
}

/// An excluded sub-rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ExcludedRule {
    /// Sub-rule name.
    pub name: String,
}

/// Rate-based match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RateBasedStatement {
    /// Requests allowed per evaluation window.
    pub limit: u64,
    /// What requests are aggregated by.
    pub aggregate_key_type: AggregateKeyType,
}

/// Aggregation keys for rate-based rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateKeyType {
    /// Source IP address.
    Ip,
    /// IP from a forwarding header.
    ForwardedIp,
}

/// Metrics and request sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct VisibilityConfig {
    /// Whether sampled requests are kept.
    pub sampled_requests_enabled: bool,
    /// Whether CloudWatch metrics are emitted.
    pub cloud_watch_metrics_enabled: bool,
    /// Metric name.
    pub metric_name: String,
}

impl VisibilityConfig {
    /// Sampling and metrics enabled under the given metric name.
    #[must_use]
    pub fn enabled(metric_name: impl Into<String>) -> Self {
        Self {
            sampled_requests_enabled: true,
            cloud_watch_metrics_enabled: true,
            metric_name: metric_name.into(),
        }
    }
}

impl From<OverrideActionKind> for OverrideAction {
    fn from(kind: OverrideActionKind) -> Self {
        match kind {
            OverrideActionKind::None => Self::None(Empty {}),
            OverrideActionKind::Count => Self::Count(Empty {}),
        }
    }
}

impl WafRule {
    /// Builds the rule referencing a managed rule group.
    #[must_use]
    pub fn managed(descriptor: &ManagedRuleDescriptor) -> Self {
        Self {
            name: descriptor.name.to_string(),
            priority: descriptor.priority,
            override_action: Some(descriptor.override_action.into()),
            action: None,
            statement: Statement::ManagedRuleGroupStatement(ManagedRuleGroupStatement {
                name: descriptor.name.to_string(),
                vendor_name: String::from(MANAGED_RULE_VENDOR),
                excluded_rules: descriptor
                    .excluded_rules
                    .iter()
                    .map(|name| ExcludedRule {
                        name: (*name).to_string(),
                    })
                    .collect(),
            }),
            visibility_config: VisibilityConfig::enabled(descriptor.name),
        }
    }

    /// Builds the rate limit rule.
    #[must_use]
    pub fn rate_limit() -> Self {
        Self {
            name: String::from(RATE_LIMIT_RULE_NAME),
            priority: RATE_LIMIT_PRIORITY,
            override_action: None,
            action: Some(RuleAction::Block(Empty {})),
            statement: Statement::RateBasedStatement(RateBasedStatement {
                limit: RATE_LIMIT_REQUESTS,
                aggregate_key_type: AggregateKeyType::Ip,
            }),
            visibility_config: VisibilityConfig::enabled(RATE_LIMIT_RULE_NAME),
        }
    }

    /// Short label of the rule's effect, for display.
    #[must_use]
    pub fn effect(&self) -> String {
        match (&self.action, &self.override_action) {
            (Some(RuleAction::Allow(_)), _) => String::from("allow"),
            (Some(RuleAction::Block(_)), _) => String::from("block"),
            (Some(RuleAction::Count(_)), _) | (None, Some(OverrideAction::Count(_))) => {
                String::from("count")
            }
            (None, Some(OverrideAction::None(_))) => String::from("group"),
            (None, None) => String::from("none"),
        }
    }
}

/// Assembles the web ACL rules.
///
/// Descriptors are emitted in the order given, with their priorities
/// untouched, followed by the rate limit rule. No sorting or validation
/// happens here; see [`RuleCatalog::validate`].
#[must_use]
pub fn make_rules(descriptors: &[ManagedRuleDescriptor]) -> Vec<WafRule> {
    descriptors
        .iter()
        .map(WafRule::managed)
        .chain(std::iter::once(WafRule::rate_limit()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_produces_seven_rules() {
        let rules = make_rules(MANAGED_RULES);
        assert_eq!(rules.len(), 7);

        let last = rules.last().unwrap();
        assert_eq!(last.name, "RateLimit100");
        assert_eq!(last.priority, 1);
        assert_eq!(last.effect(), "block");
        assert_eq!(
            last.statement,
            Statement::RateBasedStatement(RateBasedStatement {
                limit: 100,
                aggregate_key_type: AggregateKeyType::Ip,
            })
        );
    }

    #[test]
    fn test_rules_keep_input_order_and_priorities() {
        let descriptors = [
            ManagedRuleDescriptor::managed("B", 30),
            ManagedRuleDescriptor::managed("A", 10),
        ];
        let rules = make_rules(&descriptors);
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        let priorities: Vec<i32> = rules.iter().map(|r| r.priority).collect();
        assert_eq!(names, ["B", "A", "RateLimit100"]);
        assert_eq!(priorities, [30, 10, 1]);
    }

    #[test]
    fn test_empty_catalog_still_rate_limits() {
        let rules = make_rules(&[]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, RATE_LIMIT_RULE_NAME);
    }

    #[test]
    fn test_managed_rule_json_shape() {
        let rule = WafRule::managed(&MANAGED_RULES[0]);
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "Name": "AWSManagedRulesCommonRuleSet",
                "Priority": 10,
                "OverrideAction": { "None": {} },
                "Statement": {
                    "ManagedRuleGroupStatement": {
                        "Name": "AWSManagedRulesCommonRuleSet",
                        "VendorName": "AWS",
                        "ExcludedRules": []
                    }
                },
                "VisibilityConfig": {
                    "SampledRequestsEnabled": true,
                    "CloudWatchMetricsEnabled": true,
                    "MetricName": "AWSManagedRulesCommonRuleSet"
                }
            })
        );
    }

    #[test]
    fn test_rate_limit_json_shape() {
        let value = serde_json::to_value(WafRule::rate_limit()).unwrap();
        assert_eq!(value["Action"], json!({ "Block": {} }));
        assert_eq!(value["Statement"]["RateBasedStatement"]["Limit"], 100);
        assert_eq!(value["Statement"]["RateBasedStatement"]["AggregateKeyType"], "IP");
        assert!(value.get("OverrideAction").is_none());
    }

    #[test]
    fn test_shipped_catalog_is_valid() {
        assert!(RuleCatalog::new(MANAGED_RULES).validate().is_ok());
    }

    #[test]
    fn test_catalog_rejects_priority_before_rate_limit() {
        let descriptors = [ManagedRuleDescriptor::managed("Early", 0)];
        assert_eq!(
            RuleCatalog::new(&descriptors).validate(),
            Err(RuleError::ShadowsRateLimit {
                name: String::from("Early"),
                priority: 0,
                rate_limit_priority: 1,
            })
        );
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let same_name = [
            ManagedRuleDescriptor::managed("A", 10),
            ManagedRuleDescriptor::managed("A", 20),
        ];
        assert!(matches!(
            RuleCatalog::new(&same_name).validate(),
            Err(RuleError::DuplicateName { .. })
        ));

        let same_priority = [
            ManagedRuleDescriptor::managed("A", 10),
            ManagedRuleDescriptor::managed("B", 10),
        ];
        assert!(matches!(
            RuleCatalog::new(&same_priority).validate(),
            Err(RuleError::DuplicatePriority { priority: 10, .. })
        ));
    }
}
