//! budgeit-core - Core types and traits for the budge-it API client.
//!
//! This crate holds everything the session client and its front ends share:
//! the error taxonomy, the in-memory [`Session`] record, request/response
//! descriptors, the finance models passed through the API, and the
//! collaborator traits ([`Transport`], [`SecureStore`]).

pub mod credentials;
pub mod error;
pub mod models;
pub mod request;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use request::{ApiRequest, ApiResponse, Method, RequestContext};
pub use session::{Session, SessionSnapshot};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{SecureStore, Transport};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
