//! Authentication orchestrator: login, restore, refresh and logout.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use tourdesk_core::config::SessionConfig;
use tourdesk_core::error::{AppError, ErrorKind};
use tourdesk_core::events::{DomainEvent, SessionEndReason, SessionEvent};
use tourdesk_core::result::AppResult;
use tourdesk_core::types::HttpMethod;
use tourdesk_entity::auth::{LoginRequest, RegisterRequest};
use tourdesk_entity::user::{AuthorizedUser, User};

use crate::api::{IdentityApi, RequestAuth};
use crate::csrf::CsrfManager;
use crate::rbac::{AuthorizationGate, Capability};
use crate::token::TokenStore;

use super::monitor::{ActivityMonitor, MonitorCheck};
use super::state::AuthState;
use super::timer::{TickControl, TimerHandle};

/// Notice shown when the identity API cannot be reached at startup.
pub const UNREACHABLE_NOTICE: &str = "Unable to reach the server. Please try again.";

/// Owns the session lifecycle and publishes [`AuthState`].
///
/// Every login and logout bumps a session generation. Network calls
/// capture the generation before they start and drop their result if it
/// changed in the meantime, so a refresh or login completing after a
/// logout can never bring the session back.
#[derive(Debug, Clone)]
pub struct AuthOrchestrator {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api: Arc<dyn IdentityApi>,
    tokens: Arc<TokenStore>,
    csrf: Arc<CsrfManager>,
    monitor: Arc<ActivityMonitor>,
    gate: AuthorizationGate,
    config: SessionConfig,
    state: watch::Sender<AuthState>,
    events: broadcast::Sender<DomainEvent>,
    generation: AtomicU64,
    timers: Mutex<SessionTimers>,
}

#[derive(Debug, Default)]
struct SessionTimers {
    refresh: Option<TimerHandle>,
    activity: Option<TimerHandle>,
}

impl SessionTimers {
    fn stop(self) {
        if let Some(timer) = self.refresh {
            timer.stop();
        }
        if let Some(timer) = self.activity {
            timer.stop();
        }
    }
}

impl AuthOrchestrator {
    /// Creates an orchestrator in the `Initializing` state.
    pub fn new(
        api: Arc<dyn IdentityApi>,
        tokens: Arc<TokenStore>,
        csrf: Arc<CsrfManager>,
        monitor: Arc<ActivityMonitor>,
        events: broadcast::Sender<DomainEvent>,
        config: SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::Initializing);
        Self {
            inner: Arc::new(Inner {
                api,
                tokens,
                csrf,
                monitor,
                gate: AuthorizationGate::new(),
                config,
                state,
                events,
                generation: AtomicU64::new(0),
                timers: Mutex::new(SessionTimers::default()),
            }),
        }
    }

    /// The current state.
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Receive session events.
    pub fn events(&self) -> broadcast::Receiver<DomainEvent> {
        self.inner.events.subscribe()
    }

    /// The signed-in user.
    pub fn current_user(&self) -> Option<AuthorizedUser> {
        self.inner.current_user()
    }

    /// The notice of the current unauthenticated state.
    pub fn notice(&self) -> Option<String> {
        self.state().notice().map(str::to_owned)
    }

    /// Restore a cached session at startup.
    ///
    /// Without a cached token this settles on `Unauthenticated` without any
    /// network traffic, carrying the expiry notice when a stale token was
    /// purged. A server that cannot be reached leaves the cached
    /// tokens in place so a later retry can still restore the session.
    pub async fn initialize(&self) -> AuthState {
        let inner = &self.inner;
        inner.publish(AuthState::Initializing);
        let generation = inner.generation();

        let had_record = inner.tokens.record().is_some();
        let Some(bearer) = inner.tokens.access_token() else {
            let notice = if had_record {
                info!("Cached session expired while the client was away");
                SessionEndReason::Expired.notice().map(str::to_owned)
            } else {
                debug!("No cached session");
                None
            };
            inner.publish(AuthState::Unauthenticated { notice });
            return self.state();
        };

        let auth = RequestAuth {
            bearer: Some(bearer),
            csrf: None,
        };
        let result = inner.api.current_user(&auth).await;

        if inner.generation() != generation {
            debug!("Session changed during startup check; discarding result");
            return self.state();
        }

        match result {
            Ok(user) => {
                let user = AuthorizedUser::from_identity_api(user);
                info!(user_id = %user.id(), "Restored cached session");
                inner.emit(SessionEvent::Restored { user_id: user.id() });
                Inner::enter_authenticated(inner, user);
            }
            Err(e) if e.is(ErrorKind::ServiceUnavailable) => {
                warn!(error = %e, "Identity API unreachable; keeping cached session");
                inner.publish(AuthState::Unauthenticated {
                    notice: Some(UNREACHABLE_NOTICE.to_string()),
                });
            }
            Err(e) => {
                info!(error = %e, "Cached session rejected");
                inner.tokens.clear();
                inner.publish(AuthState::Unauthenticated {
                    notice: SessionEndReason::Expired.notice().map(str::to_owned),
                });
            }
        }

        self.state()
    }

    /// Sign in with email and password.
    ///
    /// On failure the state returns to `Unauthenticated` carrying the error
    /// message, and the error is also returned.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthorizedUser> {
        let inner = &self.inner;
        let generation = inner.begin_transition();
        if inner.tokens.record().is_some() {
            inner.tokens.clear();
        }
        inner.publish(AuthState::Authenticating);

        let api = &inner.api;
        let request = &request;
        let result = inner
            .csrf
            .execute(HttpMethod::Post, |csrf| async move {
                api.login(request, &RequestAuth::anonymous().with_csrf(csrf))
                    .await
            })
            .await;

        if inner.generation() != generation {
            debug!("Session changed during login; discarding result");
            return Err(AppError::session_expired("Sign-in was cancelled"));
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(email = %request.email, error = %e, "Login failed");
                return Err(inner.fail_login(e));
            }
        };

        let Some(access_token) = response.access_token.as_deref() else {
            return Err(inner.fail_login(AppError::internal(
                "Identity API did not issue an access token",
            )));
        };
        if let Err(e) = inner
            .tokens
            .set_tokens(access_token, response.refresh_token.as_deref())
        {
            return Err(inner.fail_login(e));
        }

        let user = AuthorizedUser::from_identity_api(response.user);
        info!(user_id = %user.id(), role = %user.role(), "User logged in");
        inner.emit(SessionEvent::LoggedIn { user_id: user.id() });
        Inner::enter_authenticated(inner, user.clone());

        Ok(user)
    }

    /// Create a staff account on behalf of the signed-in user.
    ///
    /// Requires the `register_users` capability; without it no request is
    /// sent. The current session is left as it is.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        let inner = &self.inner;
        inner
            .gate
            .require(inner.current_user().as_ref(), Capability::RegisterUsers)?;

        let api = &inner.api;
        let request = &request;
        let user = self
            .execute(HttpMethod::Post, |auth| async move {
                api.register(request, &auth).await
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "Registered staff account");
        Ok(user)
    }

    /// Sign out. The server is told on a best-effort basis; local state is
    /// cleared whatever it answers.
    pub async fn logout(&self) {
        self.inner.end_session(SessionEndReason::Logout).await;
    }

    /// Exchange the refresh token for a new access token now.
    ///
    /// An unreachable server keeps the session; any other failure ends it.
    pub async fn refresh_now(&self) -> AppResult<()> {
        self.inner.refresh().await
    }

    /// Run an authenticated request.
    ///
    /// Attaches the bearer token and, for state-changing methods, the
    /// forgery token (with one replay if the server rejects it). A missing
    /// token or a `SessionExpired` answer ends the session.
    pub async fn execute<T, F, Fut>(&self, method: HttpMethod, mut request: F) -> AppResult<T>
    where
        F: FnMut(RequestAuth) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let inner = &self.inner;
        let generation = inner.generation();
        let Some(bearer) = inner.tokens.access_token() else {
            inner.end_session(SessionEndReason::Expired).await;
            return Err(AppError::session_expired("Your session has expired"));
        };

        let result = inner
            .csrf
            .execute(method, |csrf| {
                request(RequestAuth {
                    bearer: Some(bearer.clone()),
                    csrf,
                })
            })
            .await;

        if let Err(e) = &result {
            if e.kind.ends_session() {
                if inner.generation() == generation {
                    inner.end_session(SessionEndReason::Expired).await;
                } else {
                    debug!("Rejected request belonged to an earlier session; ignoring");
                }
            }
        }
        result
    }
}

impl Inner {
    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidate in-flight results and stop the current session's timers.
    fn begin_transition(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.stop_timers();
        self.monitor.detach();
        generation
    }

    fn current_user(&self) -> Option<AuthorizedUser> {
        self.state.borrow().user().cloned()
    }

    fn publish(&self, state: AuthState) {
        self.state.send_replace(state);
    }

    fn emit(&self, payload: SessionEvent) {
        let _ = self.events.send(DomainEvent::new(payload));
    }

    fn fail_login(&self, error: AppError) -> AppError {
        self.publish(AuthState::Unauthenticated {
            notice: Some(error.message.clone()),
        });
        error
    }

    fn enter_authenticated(this: &Arc<Self>, user: AuthorizedUser) {
        this.stop_timers();
        this.publish(AuthState::Authenticated(user));
        this.monitor.attach();

        let weak = Arc::downgrade(this);
        let refresh = TimerHandle::start(
            "session-refresh",
            this.config.refresh_interval(),
            move || {
                let weak = weak.clone();
                async move {
                    let Some(inner) = weak.upgrade() else {
                        return TickControl::Stop;
                    };
                    if let Err(e) = inner.refresh().await {
                        debug!(error = %e, "Background refresh did not complete");
                    }
                    inner.tick_control()
                }
            },
        );

        let weak = Arc::downgrade(this);
        let activity = TimerHandle::start(
            "activity-check",
            this.config.activity_check_interval(),
            move || {
                let weak = weak.clone();
                async move {
                    let Some(inner) = weak.upgrade() else {
                        return TickControl::Stop;
                    };
                    match inner.monitor.check() {
                        MonitorCheck::Expired => {
                            inner.end_session(SessionEndReason::IdleTimeout).await;
                            TickControl::Stop
                        }
                        MonitorCheck::Detached => TickControl::Stop,
                        MonitorCheck::Active { .. } | MonitorCheck::Warning { .. } => {
                            TickControl::Continue
                        }
                    }
                }
            },
        );

        *this.lock_timers() = SessionTimers {
            refresh: Some(refresh),
            activity: Some(activity),
        };
    }

    fn tick_control(&self) -> TickControl {
        if self.state.borrow().is_authenticated() {
            TickControl::Continue
        } else {
            TickControl::Stop
        }
    }

    async fn refresh(&self) -> AppResult<()> {
        let generation = self.generation();
        let Some(user) = self.current_user() else {
            return Err(AppError::session_expired("Not signed in"));
        };
        let Some(bearer) = self.tokens.access_token() else {
            self.end_session(SessionEndReason::Expired).await;
            return Err(AppError::session_expired("Your session has expired"));
        };
        let refresh_token = self.tokens.refresh_token();

        let api = &self.api;
        let refresh_token = refresh_token.as_deref();
        let bearer = &bearer;
        let result = self
            .csrf
            .execute(HttpMethod::Post, |csrf| async move {
                let auth = RequestAuth {
                    bearer: Some(bearer.clone()),
                    csrf,
                };
                api.refresh(refresh_token, &auth).await
            })
            .await;

        if self.generation() != generation {
            debug!("Session changed during refresh; discarding result");
            return Err(AppError::session_expired("Session ended during refresh"));
        }

        match result {
            Ok(response) => {
                let replaced = self
                    .tokens
                    .replace_access_token(&response.access_token, response.refresh_token.as_deref())?;
                if !replaced {
                    self.end_session(SessionEndReason::Expired).await;
                    return Err(AppError::session_expired("Your session has expired"));
                }
                info!(user_id = %user.id(), "Session refreshed");
                self.emit(SessionEvent::Refreshed { user_id: user.id() });
                Ok(())
            }
            Err(e) if e.is(ErrorKind::ServiceUnavailable) => {
                warn!(user_id = %user.id(), error = %e, "Refresh failed; server unreachable, keeping session");
                Err(e)
            }
            Err(e) => {
                warn!(user_id = %user.id(), error = %e, "Refresh rejected; ending session");
                self.end_session(SessionEndReason::RefreshFailed).await;
                Err(e)
            }
        }
    }

    /// Tear the session down. Only an explicit logout notifies the server.
    async fn end_session(&self, reason: SessionEndReason) {
        let user = self.current_user();
        let generation = self.begin_transition();

        if user.is_none() && reason != SessionEndReason::Logout {
            // Nothing was signed in; just drop whatever is cached.
            self.tokens.clear();
            return;
        }

        if reason == SessionEndReason::Logout {
            if let Some(bearer) = self.tokens.access_token() {
                let api = &self.api;
                let bearer = &bearer;
                let result = self
                    .csrf
                    .execute(HttpMethod::Post, |csrf| async move {
                        let auth = RequestAuth {
                            bearer: Some(bearer.clone()),
                            csrf,
                        };
                        api.logout(&auth).await
                    })
                    .await;
                if let Err(e) = result {
                    warn!(error = %e, "Server logout failed; clearing local session anyway");
                }
            }
            if self.generation() != generation {
                debug!("A new session started during logout; leaving it in place");
                return;
            }
        }

        self.tokens.clear();
        self.publish(AuthState::Unauthenticated {
            notice: reason.notice().map(str::to_owned),
        });

        let user_id = user.as_ref().map(AuthorizedUser::id);
        match user_id {
            Some(id) => info!(user_id = %id, reason = ?reason, "Session ended"),
            None => info!(reason = ?reason, "Session ended"),
        }
        self.emit(SessionEvent::Ended { user_id, reason });
    }

    fn stop_timers(&self) {
        let timers = std::mem::take(&mut *self.lock_timers());
        timers.stop();
    }

    fn lock_timers(&self) -> std::sync::MutexGuard<'_, SessionTimers> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }
}
