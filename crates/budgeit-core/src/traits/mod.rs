//! Collaborator traits the session client and front ends plug into.

mod store;
mod transport;

pub use store::{SecureStore, USER_CREDENTIALS_KEY};
pub use transport::Transport;
