//! The session client facade.
//!
//! Composes the authenticator, transport, classifier, and the single-flight
//! refresh protocol behind one `send` call. A caller cannot tell "succeeded
//! first try" from "succeeded after a transparent token refresh".

use std::sync::Arc;

use lumen_domain::{RequestSpec, ResponseSpec, TokenGrant};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::auth::{
    CancellationToken, Enrollment, RefreshCoordinator, RequestAuthenticator, TokenStore,
};
use crate::classify::{Classification, classify_response, classify_transport};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::ports::{AuthApi, Clock, CredentialStorage, HttpTransport, SessionBus, SessionSignal};

/// Outcome of a single authenticated attempt, before any recovery.
enum Attempt {
    /// Success or a terminal failure; recovery does not apply.
    Done(SessionResult<ResponseSpec>),
    /// The credential was rejected.
    Unauthorized,
}

/// HTTP client that transparently maintains the authenticated session.
///
/// One instance owns one session: its credential store, its refresh
/// coordinator, and its signal bus. Construct a second instance to get a
/// fully isolated session (tests do exactly that).
pub struct SessionClient {
    transport: Arc<dyn HttpTransport>,
    auth_api: Arc<dyn AuthApi>,
    bus: Arc<dyn SessionBus>,
    clock: Arc<dyn Clock>,
    tokens: TokenStore,
    authenticator: RequestAuthenticator,
    coordinator: RefreshCoordinator,
}

impl SessionClient {
    /// Wires a client from its collaborators.
    #[must_use]
    pub fn new(
        config: &SessionConfig,
        transport: Arc<dyn HttpTransport>,
        auth_api: Arc<dyn AuthApi>,
        storage: Arc<dyn CredentialStorage>,
        clock: Arc<dyn Clock>,
        bus: Arc<dyn SessionBus>,
    ) -> Self {
        let tokens = TokenStore::new(storage, clock.clone());
        let authenticator = RequestAuthenticator::new(tokens.clone(), config.auth_scheme.clone());
        Self {
            transport,
            auth_api,
            bus,
            clock,
            tokens,
            authenticator,
            coordinator: RefreshCoordinator::new(),
        }
    }

    /// The credential store owned by this session.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Observes session signals (the cross-tab login/logout contract).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.bus.subscribe()
    }

    /// Sends a request, recovering from token expiry transparently.
    ///
    /// # Errors
    ///
    /// Rejects with a classified [`SessionError`]; recoverable unauthorized
    /// responses are absorbed and never surface here.
    pub async fn send(&self, request: RequestSpec) -> SessionResult<ResponseSpec> {
        self.send_with_token(request, CancellationToken::new()).await
    }

    /// Like [`send`](Self::send), with an explicit cancellation token.
    ///
    /// Cancellation applies only while the request is queued behind a
    /// refresh; an in-flight network call is not interrupted.
    ///
    /// # Errors
    ///
    /// Additionally rejects with [`SessionError::Cancelled`] if the token
    /// was cancelled while the request was queued.
    pub async fn send_with_token(
        &self,
        request: RequestSpec,
        cancellation: CancellationToken,
    ) -> SessionResult<ResponseSpec> {
        match self.attempt(&request).await {
            Attempt::Done(result) => result,
            Attempt::Unauthorized => self.recover(request, cancellation).await,
        }
    }

    /// Hands off a grant from a completed login and signals other observers.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the credentials could not be durably
    /// stored; the session is then unauthenticated.
    pub async fn establish(&self, grant: TokenGrant) -> SessionResult<()> {
        let credentials = grant.into_credentials(self.clock.now());
        self.tokens
            .set(&credentials)
            .await
            .map_err(|e| SessionError::storage(&e))?;
        self.bus.emit(SessionSignal::LoggedIn);
        Ok(())
    }

    /// Ends the session: best-effort server-side logout, local clear, signal.
    ///
    /// A failing logout endpoint never blocks the local clear.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the local record could not be removed.
    pub async fn logout(&self) -> SessionResult<()> {
        if let Ok(Some(credentials)) = self.tokens.get().await {
            if let Err(error) = self.auth_api.logout(&credentials.refresh_token).await {
                warn!(%error, "logout request failed; clearing local session anyway");
            }
        }
        let cleared = self.tokens.clear().await;
        self.bus.emit(SessionSignal::LoggedOut);
        cleared.map_err(|e| SessionError::storage(&e))
    }

    /// One authenticated attempt with no recovery.
    async fn attempt(&self, request: &RequestSpec) -> Attempt {
        let authenticated = self.authenticator.apply(request.clone()).await;
        match self.transport.execute(&authenticated).await {
            Err(error) => Attempt::Done(Err(classify_transport(&error))),
            Ok(response) => match classify_response(&response) {
                Classification::Success => Attempt::Done(Ok(response)),
                Classification::Failure(error) => Attempt::Done(Err(error)),
                Classification::Unauthorized => Attempt::Unauthorized,
            },
        }
    }

    /// Replays a queued request with the refreshed token.
    async fn replay(&self, request: &RequestSpec) -> SessionResult<ResponseSpec> {
        match self.attempt(request).await {
            Attempt::Done(result) => result,
            // A rejection of the freshly refreshed credential is terminal;
            // it must not re-enter the refresh flow.
            Attempt::Unauthorized => {
                debug!(request_id = %request.id, "replayed request rejected again; surfacing");
                Err(SessionError::expired("credentials rejected after refresh"))
            }
        }
    }

    /// Runs the refresh/queue protocol for a 401-failed request.
    async fn recover(
        &self,
        request: RequestSpec,
        cancellation: CancellationToken,
    ) -> SessionResult<ResponseSpec> {
        let request_id = request.id;
        match self.coordinator.enroll(request, cancellation) {
            Enrollment::Follower(waiter) => {
                debug!(%request_id, "queued behind in-flight token refresh");
                waiter.outcome().await
            }
            Enrollment::Leader(waiter) => {
                debug!(%request_id, "token rejected; leading refresh cycle");
                let outcome = self.run_refresh().await;
                let batch = self.coordinator.settle();
                match outcome {
                    Ok(()) => {
                        debug!(parked = batch.len(), "replaying parked requests");
                        for entry in batch {
                            if entry.cancellation.is_cancelled() {
                                entry.settle(Err(SessionError::Cancelled));
                                continue;
                            }
                            let result = self.replay(&entry.request).await;
                            entry.settle(result);
                        }
                    }
                    Err(error) => {
                        warn!(parked = batch.len(), %error, "refresh cycle failed; rejecting parked requests");
                        for entry in batch {
                            entry.settle(Err(error.clone()));
                        }
                    }
                }
                waiter.outcome().await
            }
        }
    }

    /// Performs the actual refresh: token exchange plus credential rotation.
    ///
    /// On any failure the stored credentials are cleared and a logged-out
    /// signal is emitted; the session is over.
    async fn run_refresh(&self) -> SessionResult<()> {
        let credentials = match self.tokens.get().await {
            Ok(credentials) => credentials,
            Err(error) => {
                self.end_session().await;
                return Err(SessionError::storage(&error));
            }
        };

        let Some(credentials) = credentials else {
            // Nothing to present to the refresh endpoint; no network call.
            debug!("no refresh token available; ending session");
            self.end_session().await;
            return Err(SessionError::expired("no refresh token available"));
        };

        match self.auth_api.refresh(&credentials.refresh_token).await {
            Ok(grant) => {
                let fresh = grant.into_credentials(self.clock.now());
                if let Err(error) = self.tokens.set(&fresh).await {
                    warn!(%error, "refreshed credentials could not be stored");
                    self.end_session().await;
                    return Err(SessionError::storage(&error));
                }
                debug!("access token refreshed");
                Ok(())
            }
            Err(error) => {
                warn!(%error, "token refresh failed");
                self.end_session().await;
                Err(SessionError::expired(error.to_string()))
            }
        }
    }

    /// Clears credentials and tells every observer the session ended.
    async fn end_session(&self) {
        if let Err(error) = self.tokens.clear().await {
            warn!(%error, "failed to clear stored credentials");
        }
        self.bus.emit(SessionSignal::LoggedOut);
    }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}
