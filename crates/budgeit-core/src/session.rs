//! In-memory session record.
//!
//! A [`Session`] is either empty or holds a complete set of credentials:
//! account identifier, access token and refresh token. The three are always
//! set together and cleared together.

use std::fmt;

use crate::tokens::{AccessToken, RefreshToken, TokenPair};

/// The credential state of one API client.
///
/// Every mutation bumps [`Session::epoch`], which lets concurrent requests
/// tell whether the session changed since they read it.
#[derive(Clone, Default)]
pub struct Session {
    established: Option<Established>,
    epoch: u64,
}

#[derive(Clone)]
struct Established {
    account: String,
    tokens: TokenPair,
}

/// A point-in-time view of the session used to decorate one request.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Epoch of the session when the snapshot was taken.
    pub epoch: u64,
    /// Access token to attach, if any.
    pub access_token: Option<AccessToken>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole credential set atomically.
    pub fn apply(&mut self, account: impl Into<String>, tokens: TokenPair) {
        self.established = Some(Established {
            account: account.into(),
            tokens,
        });
        self.epoch += 1;
    }

    /// Replace the token pair, keeping the current account identifier.
    ///
    /// Returns false (and leaves the session untouched) when there is no
    /// account to attach the tokens to.
    pub fn rotate(&mut self, tokens: TokenPair) -> bool {
        match self.established.as_ref().map(|e| e.account.clone()) {
            Some(account) => {
                self.apply(account, tokens);
                true
            }
            None => false,
        }
    }

    /// Drop all credentials.
    pub fn clear(&mut self) {
        self.established = None;
        self.epoch += 1;
    }

    /// Returns true if an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.established.is_some()
    }

    /// Returns the account identifier (the login email).
    pub fn account(&self) -> Option<&str> {
        self.established.as_ref().map(|e| e.account.as_str())
    }

    /// Returns the current access token.
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.established.as_ref().map(|e| &e.tokens.access_token)
    }

    /// Returns the current refresh token.
    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.established.as_ref().map(|e| &e.tokens.refresh_token)
    }

    /// Returns the mutation counter.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Take a snapshot for decorating an outbound request.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            epoch: self.epoch,
            access_token: self.access_token().cloned(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account())
            .field("tokens", &"[REDACTED]")
            .field("epoch", &self.epoch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.account().is_none());
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert_eq!(session.epoch(), 0);
    }

    #[test]
    fn apply_sets_all_fields_together() {
        let mut session = Session::new();
        session.apply("alice@example.com", TokenPair::new("a1", "r1"));

        assert_eq!(session.account(), Some("alice@example.com"));
        assert_eq!(session.access_token().unwrap().as_str(), "a1");
        assert_eq!(session.refresh_token().unwrap().as_str(), "r1");
        assert_eq!(session.epoch(), 1);
    }

    #[test]
    fn clear_drops_all_fields_together() {
        let mut session = Session::new();
        session.apply("alice@example.com", TokenPair::new("a1", "r1"));
        session.clear();

        assert!(!session.is_authenticated());
        assert!(session.account().is_none());
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert_eq!(session.epoch(), 2);
    }

    #[test]
    fn rotate_keeps_account() {
        let mut session = Session::new();
        session.apply("alice@example.com", TokenPair::new("a1", "r1"));
        assert!(session.rotate(TokenPair::new("a2", "r2")));

        assert_eq!(session.account(), Some("alice@example.com"));
        assert_eq!(session.access_token().unwrap().as_str(), "a2");
        assert_eq!(session.refresh_token().unwrap().as_str(), "r2");
    }

    #[test]
    fn rotate_without_account_is_rejected() {
        let mut session = Session::new();
        assert!(!session.rotate(TokenPair::new("a2", "r2")));
        assert!(!session.is_authenticated());
        assert_eq!(session.epoch(), 0);
    }

    #[test]
    fn snapshot_carries_epoch_and_token() {
        let mut session = Session::new();
        assert!(session.snapshot().access_token.is_none());

        session.apply("alice@example.com", TokenPair::new("a1", "r1"));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.epoch, 1);
        assert_eq!(snapshot.access_token.unwrap().as_str(), "a1");
    }

    #[test]
    fn debug_hides_tokens() {
        let mut session = Session::new();
        session.apply("alice@example.com", TokenPair::new("secret-a", "secret-r"));
        let debug = format!("{:?}", session);
        assert!(debug.contains("alice@example.com"));
        assert!(!debug.contains("secret-a"));
        assert!(!debug.contains("secret-r"));
    }
}
