//! budgeit-client - Session-managing client for the budge-it API.
//!
//! All calls flow through a [`SessionClient`], which attaches the current
//! access token, applies token pairs found in responses, and transparently
//! refreshes and retries once when the API answers `401 Unauthorized`.
//!
//! # Example
//!
//! ```no_run
//! use budgeit_client::{ClientConfig, SessionClient};
//! use budgeit_core::{ApiUrl, Credentials};
//!
//! # async fn example() -> Result<(), budgeit_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("https://api.budgeit.app")?);
//! let client = SessionClient::new(config)?;
//!
//! let user = client.login(&Credentials::new("alice@example.com", "hunter2")).await?;
//! println!("Hello, {}", user.first_name);
//!
//! for pocket in client.list_pockets().await? {
//!     println!("{}: {}", pocket.name, pocket.amount);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod endpoints;
mod session_client;
mod transport;

pub use config::{API_KEY_ENV, API_URL_ENV, ClientConfig};
pub use session_client::SessionClient;
pub use transport::HttpTransport;
