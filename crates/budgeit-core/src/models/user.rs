//! User account models.

use serde::{Deserialize, Serialize};

use crate::tokens::TokenPair;

use super::Pocket;

/// A budge-it account as returned by the API.
///
/// The server echoes the stored password hash on some endpoints; it is
/// deliberately not deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Money not yet assigned to any pocket.
    #[serde(default)]
    pub unallocated: f64,
    #[serde(default)]
    pub pockets: Vec<Pocket>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body for account registration.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegister {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for UserRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRegister")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body for renaming a tag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameTag {
    pub old_tag: String,
    pub new_tag: String,
}

/// Response from login and registration: the user plus a fresh token pair.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    #[serde(default)]
    pub tokens: Option<TokenPair>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_ignores_password_field() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "firstName": "Alice",
            "lastName": "Ng",
            "email": "alice@example.com",
            "password": "$2b$10$hash",
            "unallocated": 120.5,
            "pockets": [],
            "tags": ["rent", "food"]
        }))
        .unwrap();

        assert_eq!(user.full_name(), "Alice Ng");
        assert_eq!(user.tags, vec!["rent", "food"]);
        assert!(!serde_json::to_string(&user).unwrap().contains("hash"));
    }

    #[test]
    fn register_debug_hides_password() {
        let register = UserRegister {
            first_name: "Alice".into(),
            last_name: "Ng".into(),
            email: "alice@example.com".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", register).contains("hunter2"));
        assert_eq!(
            serde_json::to_value(&register).unwrap()["firstName"],
            json!("Alice")
        );
    }
}
