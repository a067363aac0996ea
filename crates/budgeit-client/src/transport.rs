//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use budgeit_core::error::{Error, InvalidInputError, ProtocolError, TransportError};
use budgeit_core::{AccessToken, ApiRequest, ApiResponse, ApiUrl, Method, Result, Transport};

use crate::config::ClientConfig;

/// Header carrying the application API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Maximum length of a non-JSON error body kept in error messages.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// HTTP transport for the budge-it API.
///
/// Clone is cheap; `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: ApiUrl,
    api_key: Option<String>,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            request_timeout: config.request_timeout,
        })
    }

    /// Returns the API base URL this transport sends to.
    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    /// Build the headers for one request. The bearer token always wins over
    /// a caller-supplied `Authorization` header.
    fn headers(&self, request: &ApiRequest, bearer: Option<&AccessToken>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if request.json_body().is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(ref key) = self.api_key {
            headers.insert(API_KEY_HEADER, header_value(API_KEY_HEADER, key)?);
        }

        for (name, value) in request.headers() {
            let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                InvalidInputError::Header {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(header, header_value(name, value)?);
        }

        if let Some(token) = bearer {
            let mut value = header_value("authorization", &token.bearer())?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> Error {
        let err = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        Error::Transport(err)
    }

    /// Turn a response into an [`ApiResponse`] or a protocol error.
    async fn handle_response(&self, response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status();
        trace!(status = %status, "API response");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if status.is_success() {
            Ok(ApiResponse::new(status.as_u16(), parse_success_body(&bytes)))
        } else {
            Err(Error::Protocol(parse_error_body(status.as_u16(), &bytes)))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request, bearer), fields(method = %request.method(), path = request.path()))]
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&AccessToken>,
    ) -> Result<ApiResponse> {
        let url = self.base_url.endpoint(request.path());
        debug!(authenticated = bearer.is_some(), "API request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), &url)
            .headers(self.headers(request, bearer)?);

        if let Some(body) = request.json_body() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        self.handle_response(response).await
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        InvalidInputError::Header {
            name: name.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Parse a success body. Empty bodies are `Null`; bodies that are not JSON
/// are kept as a string.
fn parse_success_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Parse an error body. JSON bodies may carry `error` and `message`;
/// anything else is kept as a truncated message.
fn parse_error_body(status: u16, bytes: &[u8]) -> ProtocolError {
    if let Ok(body) = serde_json::from_slice::<Value>(bytes) {
        let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_string);
        return ProtocolError::new(status, field("error"), field("message"));
    }

    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        return ProtocolError::new(status, None, None);
    }

    let message = if text.len() <= MAX_ERROR_BODY_LENGTH {
        text.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &text[..end], text.len())
    };
    ProtocolError::new(status, None, Some(message))
}
