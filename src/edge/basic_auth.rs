//! HTTP basic auth for the CloudFront viewer-request function.
//!
//! CloudFront Functions have no configuration channel, so the accepted
//! credentials are baked into the function source at synthesis time as
//! `;`-separated base64 `user:password` tokens. [`BasicAuthInterceptor`]
//! evaluates the same predicate in Rust so requests can be dry-run locally.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;

use crate::config::Credentials;

/// Source of the viewer-request function.
pub const FUNCTION_SOURCE: &str = include_str!("../../resources/basic-auth.js");

/// Placeholder in [`FUNCTION_SOURCE`] replaced by the baked tokens.
pub const CREDENTIALS_PLACEHOLDER: &str = "\"\";// HTTP_BASIC_AUTH_CREDS";

/// Realm presented in the authentication challenge.
pub const REALM: &str = "Enter credentials for this site!";

/// Separator between baked tokens.
pub const TOKEN_SEPARATOR: char = ';';

/// Encodes one credential as a basic auth token.
#[must_use]
pub fn encode_token(user: &str, password: &str) -> String {
    general_purpose::STANDARD.encode(format!("{user}:{password}"))
}

/// Encodes all credentials as the baked token string.
#[must_use]
pub fn encode_credentials(credentials: &Credentials) -> String {
    credentials
        .iter()
        .map(|(user, password)| encode_token(user, password))
        .collect::<Vec<_>>()
        .join(&TOKEN_SEPARATOR.to_string())
}

/// Renders the function source with the tokens baked in.
#[must_use]
pub fn render_function_code(tokens: &str) -> String {
    FUNCTION_SOURCE.replacen(CREDENTIALS_PLACEHOLDER, &format!("\"{tokens}\";"), 1)
}

/// A header value as CloudFront Functions represent it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderValue {
    /// The raw value.
    pub value: String,
    /// Every value of a repeated header.
    #[serde(rename = "multiValue", default, skip_serializing_if = "Option::is_none")]
    pub multi_value: Option<Vec<HeaderValue>>,
}

impl HeaderValue {
    /// A single-valued header.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            multi_value: None,
        }
    }
}

/// A viewer-request event. Fields other than `request` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerRequestEvent {
    /// The incoming request.
    pub request: ViewerRequest,
}

/// The request part of a viewer-request event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewerRequest {
    /// HTTP method.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    /// Request URI.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// Headers, keyed by lowercase name.
    #[serde(default)]
    pub headers: BTreeMap<String, HeaderValue>,
    /// Everything else (query string, cookies), passed through untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A response generated at the edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// HTTP status text.
    pub status_description: String,
    /// Response headers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, HeaderValue>,
}

/// Result of running the interceptor.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum EdgeOutcome {
    /// The request continues to the origin unmodified.
    Forward(ViewerRequest),
    /// The edge answers directly.
    Respond(ViewerResponse),
}

/// Evaluates basic auth the way the deployed function does.
#[derive(Debug, Clone, Default)]
pub struct BasicAuthInterceptor {
    expected: Vec<String>,
}

impl BasicAuthInterceptor {
    /// Builds an interceptor from a baked token string.
    ///
    /// An empty string means no credentials are configured.
    #[must_use]
    pub fn from_tokens(tokens: &str) -> Self {
        let expected = if tokens.is_empty() {
            Vec::new()
        } else {
            tokens
                .split(TOKEN_SEPARATOR)
                .map(|token| format!("Basic {token}"))
                .collect()
        };
        Self { expected }
    }

    /// Builds an interceptor from plain credentials.
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::from_tokens(&encode_credentials(credentials))
    }

    /// Whether any credentials are configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.expected.is_empty()
    }

    /// Usernames recoverable from the configured tokens.
    #[must_use]
    pub fn usernames(&self) -> Vec<String> {
        self.expected
            .iter()
            .filter_map(|header| header.strip_prefix("Basic "))
            .filter_map(|token| general_purpose::STANDARD.decode(token).ok())
            .filter_map(|bytes| String::from_utf8(bytes).ok())
            .filter_map(|pair| pair.split_once(':').map(|(user, _)| user.to_string()))
            .collect()
    }

    /// Handles one viewer request.
    #[must_use]
    pub fn handle(&self, event: ViewerRequestEvent) -> EdgeOutcome {
        if !self.is_configured() {
            debug!("No basic auth credentials baked in, failing closed");
            return EdgeOutcome::Respond(ViewerResponse {
                status_code: 502,
                status_description: String::from("Bad Gateway"),
                headers: BTreeMap::new(),
            });
        }

        let authorized = event
            .request
            .headers
            .get("authorization")
            .is_some_and(|header| self.accepts(&header.value));

        if authorized {
            return EdgeOutcome::Forward(event.request);
        }

        debug!("Rejecting request for {} with a basic auth challenge", event.request.uri);
        EdgeOutcome::Respond(ViewerResponse {
            status_code: 401,
            status_description: String::from("Unauthorized"),
            headers: BTreeMap::from([(
                String::from("www-authenticate"),
                HeaderValue::new(format!("Basic realm=\"{REALM}\"")),
            )]),
        })
    }

    /// Checks a header value against every expected value.
    fn accepts(&self, value: &str) -> bool {
        self.expected
            .iter()
            .fold(Choice::from(0), |matched, expected| {
                matched | expected.as_bytes().ct_eq(value.as_bytes())
            })
            .into()
    }
}

impl ViewerRequestEvent {
    /// Builds a `GET` event for a URI with an optional `Authorization` header.
    #[must_use]
    pub fn get(uri: impl Into<String>, authorization: Option<&str>) -> Self {
        let headers = authorization
            .map(|value| {
                BTreeMap::from([(
                    String::from("authorization"),
                    HeaderValue::new(value),
                )])
            })
            .unwrap_or_default();

        Self {
            request: ViewerRequest {
                method: String::from("GET"),
                uri: uri.into(),
                headers,
                other: Map::new(),
            },
        }
    }
}
