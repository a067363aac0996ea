//! Typed wrappers over [`SessionClient::send`](crate::SessionClient::send).
//!
//! Each wrapper builds one request, sends it through the session client, and
//! decodes the body into a model from `budgeit_core::models`.

mod groups;
mod pockets;
mod transactions;
mod users;
