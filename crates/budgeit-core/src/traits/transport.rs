//! Transport trait.

use async_trait::async_trait;

use crate::Result;
use crate::request::{ApiRequest, ApiResponse};
use crate::tokens::AccessToken;

/// Sends one decorated request to the API.
///
/// Implementations return `Ok` only for 2xx responses; any other status is
/// reported as [`Error::Protocol`](crate::Error::Protocol) so the session
/// client can recognize authorization failures.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Transmit `request`, attaching `bearer` as the `Authorization` header
    /// when present.
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&AccessToken>,
    ) -> Result<ApiResponse>;
}
