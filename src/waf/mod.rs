//! WAF module: managed rule catalog, rule assembly and the web ACL stack.

mod rules;
mod stack;

pub use rules::{
    AggregateKeyType, Empty, ExcludedRule, MANAGED_RULE_VENDOR, MANAGED_RULES,
    ManagedRuleDescriptor, ManagedRuleGroupStatement, OverrideAction, OverrideActionKind,
    RATE_LIMIT_PRIORITY, RATE_LIMIT_REQUESTS, RATE_LIMIT_RULE_NAME, RateBasedStatement,
    RuleAction, RuleCatalog, Statement, VisibilityConfig, WafRule, make_rules,
};
pub use stack::{CLOUDFRONT_ACL_REGION, WafStack, WafStackPurpose};
