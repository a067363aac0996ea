//! Endpoint paths and wire types shared by the session client and the
//! typed API wrappers.

use serde::Serialize;
use serde_json::Value;

use budgeit_core::{ApiRequest, TokenPair};

pub(crate) use budgeit_core::request::{LOGIN_PATH, REFRESH_PATH};

/// POST: register a new account.
pub(crate) const USERS: &str = "/users";

/// POST: add a tag, PUT: rename a tag.
pub(crate) const USER_TAGS: &str = "/users/tags";

pub(crate) const POCKETS: &str = "/pockets";

pub(crate) const POCKET_GROUPS: &str = "/pocketGroups";

pub(crate) const TRANSACTIONS: &str = "/transactions";

/// Path of a single resource in a collection.
pub(crate) fn item(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, id)
}

/// Request body for the refresh call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub email: &'a str,
    pub refresh_token: &'a str,
}

/// Request body for adding a tag.
#[derive(Debug, Serialize)]
pub(crate) struct AddTagRequest<'a> {
    pub tag: &'a str,
}

/// A token pair found in a response body.
#[derive(Debug)]
pub(crate) struct TokenGrant {
    pub tokens: TokenPair,
    /// Account the tokens belong to; `None` keeps the session's account.
    pub account: Option<String>,
}

/// Look for a token pair in the response to `request`.
///
/// Any endpoint may return `{ user: { email }, tokens: { accessToken,
/// refreshToken } }`. The refresh endpoint returns the pair at the top level.
pub(crate) fn token_grant(request: &ApiRequest, body: &Value) -> Option<TokenGrant> {
    if let Some(tokens) = body.get("tokens") {
        let tokens: TokenPair = serde_json::from_value(tokens.clone()).ok()?;
        let account = body
            .get("user")
            .and_then(|user| user.get("email"))
            .and_then(Value::as_str)
            .map(str::to_string);
        return Some(TokenGrant { tokens, account });
    }

    if request.is_refresh() {
        let tokens: TokenPair = serde_json::from_value(body.clone()).ok()?;
        return Some(TokenGrant {
            tokens,
            account: None,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_shaped_body_carries_account() {
        let body = json!({
            "user": { "id": "u1", "email": "alice@example.com" },
            "tokens": { "accessToken": "a1", "refreshToken": "r1" }
        });
        let grant = token_grant(&ApiRequest::post(LOGIN_PATH), &body).unwrap();
        assert_eq!(grant.tokens.access_token.as_str(), "a1");
        assert_eq!(grant.tokens.refresh_token.as_str(), "r1");
        assert_eq!(grant.account.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn tokens_detected_on_any_endpoint() {
        let body = json!({
            "id": "p1",
            "tokens": { "accessToken": "a2", "refreshToken": "r2" }
        });
        let grant = token_grant(&ApiRequest::get(POCKETS), &body).unwrap();
        assert_eq!(grant.tokens.access_token.as_str(), "a2");
        assert!(grant.account.is_none());
    }

    #[test]
    fn flat_pair_only_counts_on_refresh() {
        let body = json!({ "accessToken": "a3", "refreshToken": "r3" });
        assert!(token_grant(&ApiRequest::post(REFRESH_PATH), &body).is_some());
        assert!(token_grant(&ApiRequest::get(POCKETS), &body).is_none());
    }

    #[test]
    fn incomplete_pair_is_ignored() {
        let body = json!({ "tokens": { "accessToken": "a4" } });
        assert!(token_grant(&ApiRequest::post(LOGIN_PATH), &body).is_none());
    }

    #[test]
    fn plain_bodies_have_no_grant() {
        let request = ApiRequest::get(POCKETS);
        assert!(token_grant(&request, &json!([{ "id": "p1" }])).is_none());
        assert!(token_grant(&request, &Value::Null).is_none());
    }

    #[test]
    fn refresh_body_is_camel_case() {
        let body = serde_json::to_value(RefreshRequest {
            email: "alice@example.com",
            refresh_token: "r1",
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "email": "alice@example.com", "refreshToken": "r1" })
        );
    }

    #[test]
    fn item_path() {
        assert_eq!(item(POCKETS, "42"), "/pockets/42");
    }
}
