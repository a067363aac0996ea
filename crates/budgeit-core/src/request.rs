//! Outbound request and inbound response descriptors.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/users/login";

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "/users/refresh";

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the budge-it API, built by callers and decorated with the
/// session's access token before transmission.
///
/// # Example
///
/// ```
/// use budgeit_core::{ApiRequest, Method};
///
/// let request = ApiRequest::put("pockets/42")
///     .json(&serde_json::json!({ "name": "Rent" }))
///     .unwrap();
/// assert_eq!(request.method(), Method::Put);
/// assert_eq!(request.path(), "/pockets/42");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl ApiRequest {
    /// Create a request for `path`, relative to the API base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };

        Self {
            method,
            path,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Add a header. `Authorization` is managed by the session client and
    /// is overwritten when a session is active.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a raw JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn json_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns true if this request targets the token refresh endpoint.
    pub fn is_refresh(&self) -> bool {
        self.endpoint() == REFRESH_PATH
    }

    /// The path without query string or trailing slash.
    fn endpoint(&self) -> &str {
        let path = self.path.split('?').next().unwrap_or_default();
        path.trim_end_matches('/')
    }
}

/// Per-request state threaded through the refresh-and-retry flow.
///
/// A retry is issued with a fresh context from [`RequestContext::retry`];
/// the request itself is never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    retried: bool,
}

impl RequestContext {
    /// Context for the first attempt of a logical request.
    pub fn initial() -> Self {
        Self::default()
    }

    /// Context for the single permitted retry.
    pub fn retry(self) -> Self {
        Self { retried: true }
    }

    /// Returns true if this attempt is already the retry.
    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

/// A successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    /// Create a new response.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Decode the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.body)?)
    }

    /// Decode the body into `T`, consuming the response.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_gets_leading_slash() {
        assert_eq!(ApiRequest::get("pockets").path(), "/pockets");
        assert_eq!(ApiRequest::get("/pockets").path(), "/pockets");
    }

    #[test]
    fn recognizes_refresh_endpoint() {
        assert!(ApiRequest::post("/users/refresh").is_refresh());
        assert!(ApiRequest::post("users/refresh/").is_refresh());
        assert!(!ApiRequest::post("/users/refreshments").is_refresh());
        assert!(!ApiRequest::post("/users/login").is_refresh());
    }

    #[test]
    fn retry_context_is_a_new_value() {
        let initial = RequestContext::initial();
        let retried = initial.retry();
        assert!(!initial.is_retried());
        assert!(retried.is_retried());
    }

    #[test]
    fn json_body_is_serialized() {
        let request = ApiRequest::post("/users/tags")
            .json(&json!({ "tag": "groceries" }))
            .unwrap();
        assert_eq!(request.json_body(), Some(&json!({ "tag": "groceries" })));
    }

    #[test]
    fn response_decodes_typed_body() {
        #[derive(serde::Deserialize)]
        struct Named {
            name: String,
        }

        let response = ApiResponse::new(200, json!({ "name": "Rent" }));
        let named: Named = response.json().unwrap();
        assert_eq!(named.name, "Rent");

        let bad = ApiResponse::new(200, json!([1, 2, 3]));
        assert!(bad.json::<Named>().is_err());
    }
}
