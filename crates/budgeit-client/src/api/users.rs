use serde::Deserialize;
use tracing::{info, instrument};

use budgeit_core::error::AuthError;
use budgeit_core::models::{LoginResponse, RenameTag, User, UserRegister};
use budgeit_core::{ApiRequest, Credentials, Result, Transport};

use crate::endpoints::{AddTagRequest, LOGIN_PATH, USER_TAGS, USERS};
use crate::session_client::SessionClient;

impl<T: Transport> SessionClient<T> {
    /// Log in with email and password.
    ///
    /// The token pair in the response establishes the session.
    #[instrument(skip(self, credentials), fields(email = credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let request = ApiRequest::post(LOGIN_PATH).json(credentials)?;
        let response: LoginResponse = self.send(request).await?.into_json()?;

        if response.tokens.is_none() {
            return Err(AuthError::InvalidCredentials(
                "login response carried no token pair".to_string(),
            )
            .into());
        }

        info!("Logged in");
        Ok(response.user)
    }

    /// Create an account. A token pair in the response logs the new user in.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &UserRegister) -> Result<User> {
        let request = ApiRequest::post(USERS).json(user)?;
        let body = self.send(request).await?.body;
        let user = match body.get("user") {
            Some(user) => User::deserialize(user)?,
            None => User::deserialize(&body)?,
        };
        Ok(user)
    }

    /// Add a tag to the current user.
    #[instrument(skip(self))]
    pub async fn add_tag(&self, tag: &str) -> Result<User> {
        let request = ApiRequest::post(USER_TAGS).json(&AddTagRequest { tag })?;
        self.send(request).await?.into_json()
    }

    /// Rename one of the current user's tags.
    #[instrument(skip(self))]
    pub async fn rename_tag(&self, old_tag: &str, new_tag: &str) -> Result<User> {
        let body = RenameTag {
            old_tag: old_tag.to_string(),
            new_tag: new_tag.to_string(),
        };
        let request = ApiRequest::put(USER_TAGS).json(&body)?;
        self.send(request).await?.into_json()
    }
}
