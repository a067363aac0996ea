//! The session client: token decoration, refresh-and-retry, session clearing.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, instrument, warn};

use budgeit_core::error::{AuthError, Error, TransportError};
use budgeit_core::{
    AccessToken, ApiRequest, ApiResponse, RequestContext, Result, Session, Transport,
};

use crate::config::ClientConfig;
use crate::endpoints::{REFRESH_PATH, RefreshRequest, token_grant};
use crate::transport::HttpTransport;

/// Mediates every call to the budge-it API.
///
/// The client owns one [`Session`]. Requests are decorated with its access
/// token; token pairs in responses replace it; a `401` triggers one refresh
/// and one retry. A failed refresh clears the session, after which requests
/// go out without an `Authorization` header until the next login.
///
/// # Concurrency
///
/// Clones share the session. Refreshes are single-flight: when several
/// requests hit `401` at once, the first performs the refresh and the others
/// wait for it, then retry with the resulting token pair. The refresh runs
/// on its own task, so cancelling the request that started it does not
/// abandon the refresh.
pub struct SessionClient<T = HttpTransport> {
    inner: Arc<ClientInner<T>>,
}

impl<T> Clone for SessionClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ClientInner<T> {
    transport: T,
    session: RwLock<Session>,
    /// Held by the refresh task for the duration of a refresh call.
    refresh_gate: Arc<tokio::sync::Mutex<()>>,
    refresh_timeout: Duration,
}

impl SessionClient<HttpTransport> {
    /// Create a client talking HTTP to the configured API.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.refresh_timeout))
    }
}

impl<T: Transport> SessionClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: T, refresh_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                session: RwLock::new(Session::new()),
                refresh_gate: Arc::new(tokio::sync::Mutex::new(())),
                refresh_timeout,
            }),
        }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Returns true if the session holds an access token.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session().is_authenticated()
    }

    /// Returns the account identifier of the current session.
    pub fn account(&self) -> Option<String> {
        self.inner.session().account().map(str::to_string)
    }

    /// Export the current access token.
    ///
    /// # Security
    ///
    /// Handle the returned token securely. It grants access to the account.
    pub fn export_access_token(&self) -> Option<AccessToken> {
        self.inner.session().access_token().cloned()
    }

    /// Drop the session. Subsequent requests are sent unauthenticated.
    pub fn logout(&self) {
        info!("Clearing session on logout");
        self.inner.session_mut().clear();
    }

    /// Send a request, refreshing and retrying once on `401`.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.send_with_context(request, RequestContext::initial())
            .await
    }

    /// Send a request under an explicit context.
    ///
    /// A context that is already retried never triggers a refresh; its
    /// failures are returned as they are.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn send_with_context(
        &self,
        request: ApiRequest,
        mut context: RequestContext,
    ) -> Result<ApiResponse> {
        loop {
            let (result, sent_epoch) = self.attempt(&request, context).await;

            let err = match result {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            if request.is_refresh() || context.is_retried() || !err.is_unauthorized() {
                return Err(err);
            }

            debug!("Unauthorized, refreshing session before retry");
            if let Err(refresh_err) = self.recover(sent_epoch).await {
                warn!(error = %refresh_err, "Session refresh failed, surfacing original error");
                return Err(err);
            }

            context = context.retry();
        }
    }

    /// Refresh the token pair now.
    ///
    /// Fails with [`AuthError::NotAuthenticated`] when there is no session.
    /// Any other failure clears the session.
    pub async fn refresh(&self) -> Result<()> {
        let gate = Arc::clone(&self.inner.refresh_gate).lock_owned().await;
        self.spawn_refresh(gate).await
    }

    /// One transmission of `request` under the current session.
    ///
    /// Returns the outcome and the session epoch the request was sent under.
    async fn attempt(
        &self,
        request: &ApiRequest,
        context: RequestContext,
    ) -> (Result<ApiResponse>, u64) {
        let snapshot = self.inner.session().snapshot();
        debug!(
            retried = context.is_retried(),
            authenticated = snapshot.access_token.is_some(),
            "Sending request"
        );

        let result = self
            .inner
            .transport
            .execute(request, snapshot.access_token.as_ref())
            .await;

        match result {
            Ok(response) => {
                self.inner.absorb_tokens(request, &response);
                (Ok(response), snapshot.epoch)
            }
            Err(err) => {
                if request.is_refresh() {
                    warn!(error = %err, "Refresh endpoint failed, clearing session");
                    self.inner.session_mut().clear();
                }
                (Err(err), snapshot.epoch)
            }
        }
    }

    /// Make the session usable again after a `401` seen at `sent_epoch`.
    ///
    /// If the session changed while this request was in flight or waiting
    /// for the gate, another request already refreshed (or cleared) it and
    /// no refresh call is made.
    async fn recover(&self, sent_epoch: u64) -> Result<()> {
        let gate = Arc::clone(&self.inner.refresh_gate).lock_owned().await;

        {
            let session = self.inner.session();
            if session.epoch() != sent_epoch {
                return if session.is_authenticated() {
                    debug!("Session already refreshed by a concurrent request");
                    Ok(())
                } else {
                    Err(AuthError::NotAuthenticated.into())
                };
            }
        }

        self.spawn_refresh(gate).await
    }

    /// Run the refresh call on its own task.
    ///
    /// The task owns the gate, so dropping the caller leaves the refresh
    /// running and the next waiter sees its result instead of refreshing
    /// again with a spent refresh token.
    async fn spawn_refresh(&self, gate: OwnedMutexGuard<()>) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let _gate = gate;
            inner.refresh().await
        });

        task.await.map_err(|e| {
            Error::from(AuthError::RefreshFailed {
                reason: format!("refresh task failed: {}", e),
            })
        })?
    }
}

impl<T: Transport> ClientInner<T> {
    /// Perform the refresh call. The caller holds the refresh gate.
    async fn refresh(&self) -> Result<()> {
        let (account, refresh_token, start_epoch) = {
            let session = self.session();
            match (session.account(), session.refresh_token()) {
                (Some(account), Some(token)) => {
                    (account.to_string(), token.clone(), session.epoch())
                }
                _ => return Err(AuthError::NotAuthenticated.into()),
            }
        };

        info!("Refreshing session");

        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest {
            email: &account,
            refresh_token: refresh_token.as_str(),
        })?;

        let outcome =
            tokio::time::timeout(self.refresh_timeout, self.transport.execute(&request, None))
                .await;

        let failure = match outcome {
            Ok(Ok(response)) => match token_grant(&request, &response.body) {
                Some(grant) => {
                    let mut session = self.session_mut();
                    if session.epoch() != start_epoch {
                        debug!("Session replaced during refresh, keeping newer credentials");
                        return Ok(());
                    }
                    session.apply(grant.account.unwrap_or(account), grant.tokens);
                    debug!("Session refreshed successfully");
                    return Ok(());
                }
                None => AuthError::RefreshFailed {
                    reason: "response carried no token pair".to_string(),
                }
                .into(),
            },
            Ok(Err(err)) => AuthError::RefreshFailed {
                reason: err.to_string(),
            }
            .into(),
            Err(_) => TransportError::Timeout {
                duration_ms: u64::try_from(self.refresh_timeout.as_millis()).unwrap_or(u64::MAX),
            }
            .into(),
        };

        let mut session = self.session_mut();
        if session.epoch() == start_epoch {
            warn!(error = %failure, "Session refresh failed, clearing session");
            session.clear();
        }
        Err(failure)
    }

    /// Apply a token pair carried by a successful response.
    fn absorb_tokens(&self, request: &ApiRequest, response: &ApiResponse) {
        let Some(grant) = token_grant(request, &response.body) else {
            return;
        };

        let mut session = self.session_mut();
        match grant.account {
            Some(account) => {
                debug!("Response carried a token pair, replacing session");
                session.apply(account, grant.tokens);
            }
            None => {
                if !session.rotate(grant.tokens) {
                    warn!("Ignoring token pair without an account to attach it to");
                }
            }
        }
    }

    fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for SessionClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("refresh_timeout", &self.inner.refresh_timeout)
            .field("session", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use budgeit_core::error::{Error, ProtocolError};
    use serde_json::{Value, json};

    /// Transport that replays scripted outcomes and records what it saw.
    #[derive(Default)]
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<ApiResponse>>>,
        seen: Mutex<Vec<(String, Option<String>)>>,
    }

    impl ScriptedTransport {
        fn push_ok(&self, body: Value) {
            self.script
                .lock()
                .unwrap()
                .push_back(Ok(ApiResponse::new(200, body)));
        }

        fn push_status(&self, status: u16) {
            self.script
                .lock()
                .unwrap()
                .push_back(Err(ProtocolError::new(status, None, None).into()));
        }

        fn seen(&self) -> Vec<(String, Option<String>)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(
            &self,
            request: &ApiRequest,
            bearer: Option<&AccessToken>,
        ) -> Result<ApiResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((request.path().to_string(), bearer.map(|t| t.as_str().to_string())));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted request")
        }
    }

    fn client() -> SessionClient<ScriptedTransport> {
        SessionClient::with_transport(ScriptedTransport::default(), Duration::from_secs(5))
    }

    fn login_body(access: &str, refresh: &str) -> Value {
        json!({
            "user": { "id": "u1", "email": "alice@example.com" },
            "tokens": { "accessToken": access, "refreshToken": refresh }
        })
    }

    async fn logged_in() -> SessionClient<ScriptedTransport> {
        let client = client();
        client.transport().push_ok(login_body("a1", "r1"));
        client.send(ApiRequest::post("/users/login")).await.unwrap();
        client
    }

    #[tokio::test]
    async fn login_response_populates_session() {
        let client = logged_in().await;
        assert!(client.is_authenticated());
        assert_eq!(client.account().as_deref(), Some("alice@example.com"));
        assert_eq!(client.export_access_token().unwrap().as_str(), "a1");
    }

    #[tokio::test]
    async fn retried_context_never_refreshes() {
        let client = logged_in().await;
        client.transport().push_status(401);

        let err = client
            .send_with_context(ApiRequest::get("/pockets"), RequestContext::initial().retry())
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(client.transport().seen().len(), 2);
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn refresh_without_session_is_not_authenticated() {
        let client = client();
        let err = client.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::NotAuthenticated)));
        assert!(client.transport().seen().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_without_session_skips_refresh_call() {
        let client = client();
        client.transport().push_status(401);

        let err = client.send(ApiRequest::get("/pockets")).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(client.transport().seen(), vec![("/pockets".to_string(), None)]);
    }

    #[tokio::test]
    async fn refresh_response_without_tokens_clears_session() {
        let client = logged_in().await;
        client.transport().push_ok(json!({ "ok": true }));

        let err = client.refresh().await.unwrap_err();

        assert!(matches!(err, Error::Auth(AuthError::RefreshFailed { .. })));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn tokens_without_any_account_are_ignored() {
        let client = client();
        client
            .transport()
            .push_ok(json!({ "tokens": { "accessToken": "a9", "refreshToken": "r9" } }));

        client.send(ApiRequest::get("/pockets")).await.unwrap();

        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let client = logged_in().await;
        client.logout();
        assert!(!client.is_authenticated());
        assert!(client.account().is_none());
        assert!(client.export_access_token().is_none());
    }

    #[tokio::test]
    async fn debug_hides_session() {
        let client = logged_in().await;
        let debug = format!("{:?}", client);
        assert!(!debug.contains("a1"));
        assert!(debug.contains("[REDACTED]"));
    }
}
