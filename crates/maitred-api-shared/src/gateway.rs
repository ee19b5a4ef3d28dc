//! API Gateway proxy event and response envelopes.
//!
//! The Lambdas sit behind an API Gateway proxy integration with an
//! external-identity authorizer. Only the fields this backend reads are
//! modeled; everything else in the event is ignored.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::error;

use crate::problem::ProblemDetails;

/// The subset of an API Gateway proxy event this backend consumes.
///
/// The gateway sends explicit `null` for absent maps and contexts, so
/// every optional section tolerates both `null` and a missing key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayRequest {
    pub http_method: String,
    pub path: String,
    pub body: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub path_parameters: HashMap<String, String>,
    #[serde(deserialize_with = "null_default")]
    pub query_string_parameters: HashMap<String, String>,
    #[serde(deserialize_with = "null_default")]
    pub request_context: RequestContext,
}

/// Request-scoped context attached by the gateway.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    pub request_id: String,
    #[serde(deserialize_with = "null_default")]
    pub authorizer: Authorizer,
}

/// Authorizer output; claims come from the upstream identity provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Authorizer {
    #[serde(deserialize_with = "null_default")]
    pub claims: HashMap<String, serde_json::Value>,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GatewayRequest {
    /// Parse the JSON body into a typed request.
    pub fn json_body<T: DeserializeOwned>(
        &self,
        request_id: &str,
    ) -> Result<T, Box<ProblemDetails>> {
        let body = self.body.as_deref().unwrap_or_default();
        if body.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "Request body is required",
                request_id,
            )));
        }
        serde_json::from_str(body).map_err(|e| {
            Box::new(ProblemDetails::bad_request(
                format!("Invalid request body: {}", e),
                request_id,
            ))
        })
    }

    /// A query-string parameter, if present and non-empty.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// A path parameter, if present and non-empty.
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The gateway's request id, empty when the event carried none.
    pub fn request_id(&self) -> &str {
        &self.request_context.request_id
    }
}

/// Authenticated caller identity resolved by the upstream authorizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    /// Extract the caller identity from authorizer claims.
    ///
    /// Reads `cognito:username`, falling back to `username`. Returns
    /// `None` when the request carries no usable identity; callers must
    /// treat that as an authorization failure, checked before any
    /// request validation.
    pub fn from_request(request: &GatewayRequest) -> Option<Self> {
        let claims = &request.request_context.authorizer.claims;
        claims
            .get("cognito:username")
            .or_else(|| claims.get("username"))
            .and_then(|value| value.as_str())
            .filter(|username| !username.is_empty())
            .map(|username| Self {
                username: username.to_string(),
            })
    }
}

/// Proxy-integration response envelope returned to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl GatewayResponse {
    /// A 200 response with a JSON payload.
    pub fn ok<T: Serialize>(payload: &T) -> Self {
        Self {
            status_code: 200,
            headers: json_headers("application/json"),
            body: encode(payload),
        }
    }

    /// An error response carrying the problem as its body; the status
    /// code comes from the problem itself.
    pub fn problem(problem: ProblemDetails) -> Self {
        Self {
            status_code: problem.status,
            headers: json_headers("application/problem+json"),
            body: encode(&problem),
        }
    }
}

fn json_headers(content_type: &str) -> HashMap<String, String> {
    HashMap::from([("Content-Type".to_string(), content_type.to_string())])
}

fn encode<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|e| {
        error!(error = %e, "failed to encode response body");
        r#"{"message":"Internal error"}"#.to_string()
    })
}
