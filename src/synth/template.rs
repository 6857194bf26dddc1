//! CloudFormation template model.
//!
//! Only the parts of the template format that the site and WAF stacks need
//! are modelled. Resource properties stay untyped JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Template format version emitted in every template.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// A CloudFormation template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    /// Template format version.
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    /// Stack description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Template metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
    /// Resources keyed by logical id.
    pub resources: BTreeMap<String, Resource>,
    /// Stack outputs keyed by logical id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

/// A single template resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    /// Resource type, e.g. `AWS::S3::Bucket`.
    #[serde(rename = "Type")]
    pub resource_type: String,
    /// Resource properties.
    pub properties: Value,
    /// Explicit dependencies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Policy applied when the resource is removed from the stack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<RemovalPolicy>,
    /// Policy applied when an update replaces the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<RemovalPolicy>,
}

/// Removal policies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Delete the physical resource.
    Delete,
    /// Keep the physical resource.
    Retain,
}

/// A stack output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    /// Output value.
    pub value: Value,
    /// Output description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Template {
    /// Creates an empty template with a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: String::from(TEMPLATE_FORMAT_VERSION),
            description: Some(description.into()),
            metadata: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Adds a resource and returns its logical id.
    ///
    /// Characters that are not ASCII alphanumeric are stripped from the id.
    pub fn add_resource(&mut self, logical_id: &str, resource: Resource) -> String {
        let id = logical_id_of(logical_id);
        self.resources.insert(id.clone(), resource);
        id
    }

    /// Adds an output.
    pub fn add_output(&mut self, logical_id: &str, value: Value, description: impl Into<String>) {
        self.outputs.insert(
            logical_id_of(logical_id),
            Output {
                value,
                description: Some(description.into()),
            },
        );
    }

    /// Looks up a resource by logical id.
    #[must_use]
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Iterates over resources of a given type.
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
    }
}

impl Resource {
    /// Creates a resource with the given type and properties.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
            deletion_policy: None,
            update_replace_policy: None,
        }
    }

    /// Applies a removal policy to both deletion and replacement.
    #[must_use]
    pub const fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self.update_replace_policy = Some(policy);
        self
    }

    /// Adds an explicit dependency.
    #[must_use]
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    /// Returns a property by JSON pointer, e.g. `/DistributionConfig/Aliases`.
    #[must_use]
    pub fn property(&self, pointer: &str) -> Option<&Value> {
        self.properties.pointer(pointer)
    }
}

/// Strips characters CloudFormation does not accept in logical ids.
#[must_use]
pub fn logical_id_of(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// `{"Ref": id}`.
#[must_use]
pub fn cfn_ref(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [id, attribute]}`.
#[must_use]
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::Sub": template}`.
#[must_use]
pub fn sub(template: &str) -> Value {
    json!({ "Fn::Sub": template })
}

/// Host part of a bucket's website URL.
#[must_use]
pub fn website_host(bucket_logical_id: &str) -> Value {
    json!({
        "Fn::Select": [
            "2",
            { "Fn::Split": ["/", get_att(bucket_logical_id, "WebsiteURL")] }
        ]
    })
}

/// Dynamic reference to an SSM string parameter.
#[must_use]
pub fn resolve_ssm(parameter_name: &str) -> String {
    format!("{{{{resolve:ssm:{parameter_name}}}}}")
}

/// Dynamic reference to a Secrets Manager secret.
#[must_use]
pub fn resolve_secret(secret_name: &str) -> String {
    format!("{{{{resolve:secretsmanager:{secret_name}}}}}")
}
