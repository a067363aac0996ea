//! Persisted key-value store trait.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;

/// Key used to remember login credentials for replay.
pub const USER_CREDENTIALS_KEY: &str = "userCredentials";

/// An encrypted key-value store for small JSON values.
///
/// Front ends use it to remember login credentials across process restarts.
/// The session client never touches it.
pub trait SecureStore {
    /// Read the raw value stored under `key`.
    fn get_value(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_value(&self, key: &str, value: Value) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Read and decode the value stored under `key`.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get_value(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Encode and store `value` under `key`.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.set_value(key, serde_json::to_value(value)?)
    }
}
