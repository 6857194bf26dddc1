//! Edge module: code that runs in CloudFront on each viewer request.

mod basic_auth;

pub use basic_auth::{
    BasicAuthInterceptor, CREDENTIALS_PLACEHOLDER, EdgeOutcome, FUNCTION_SOURCE, HeaderValue,
    REALM, TOKEN_SEPARATOR, ViewerRequest, ViewerRequestEvent, ViewerResponse, encode_credentials,
    encode_token, render_function_code,
};
