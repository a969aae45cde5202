//! Per-client wiring of the session components.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use tourdesk_core::config::ClientConfig;
use tourdesk_core::result::AppResult;
use tourdesk_core::traits::{Clock, SystemClock};
use tourdesk_entity::user::Role;
use tourdesk_store::StoreManager;

use crate::api::IdentityApi;
use crate::csrf::CsrfManager;
use crate::rbac::{AuthorizationGate, Capability, GateDecision, authorize_route};
use crate::session::{ActivityMonitor, AuthOrchestrator};
use crate::token::TokenStore;

const EVENT_CAPACITY: usize = 64;

/// Everything one client instance needs to manage its session.
///
/// Built once and shared by reference; cloning is cheap.
#[derive(Debug, Clone)]
pub struct SessionContext {
    config: ClientConfig,
    store: StoreManager,
    csrf: Arc<CsrfManager>,
    tokens: Arc<TokenStore>,
    monitor: Arc<ActivityMonitor>,
    orchestrator: AuthOrchestrator,
    gate: AuthorizationGate,
}

impl SessionContext {
    /// Wire the session components over `store`, reading time from `clock`.
    pub fn new(
        config: ClientConfig,
        api: Arc<dyn IdentityApi>,
        store: StoreManager,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        config.session.validate()?;

        let provider = store.provider();
        let keys = store.keys().clone();

        let csrf = Arc::new(CsrfManager::new(
            api.clone(),
            provider.clone(),
            keys.clone(),
            clock.clone(),
            &config.csrf,
        ));
        let tokens = Arc::new(TokenStore::new(
            provider,
            keys,
            clock,
            &config.session,
            csrf.clone(),
        ));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let monitor = Arc::new(ActivityMonitor::new(
            tokens.clone(),
            config.session.warning_window(),
            events.clone(),
        ));
        let orchestrator = AuthOrchestrator::new(
            api,
            tokens.clone(),
            csrf.clone(),
            monitor.clone(),
            events,
            config.session.clone(),
        );

        info!(
            store = %config.storage.provider,
            access_lifetime_minutes = config.session.access_lifetime_minutes,
            "Session context ready"
        );

        Ok(Self {
            config,
            store,
            csrf,
            tokens,
            monitor,
            orchestrator,
            gate: AuthorizationGate::new(),
        })
    }

    /// Wire the session components with the configured store and the
    /// system clock.
    pub fn with_defaults(config: ClientConfig, api: Arc<dyn IdentityApi>) -> AppResult<Self> {
        let store = StoreManager::new(&config.storage)?;
        Self::new(config, api, store, Arc::new(SystemClock))
    }

    /// The configuration the context was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The key-value store.
    pub fn store(&self) -> &StoreManager {
        &self.store
    }

    /// The authentication orchestrator.
    pub fn orchestrator(&self) -> &AuthOrchestrator {
        &self.orchestrator
    }

    /// The token store.
    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// The forgery-protection manager.
    pub fn csrf(&self) -> &Arc<CsrfManager> {
        &self.csrf
    }

    /// The idle monitor.
    pub fn monitor(&self) -> &Arc<ActivityMonitor> {
        &self.monitor
    }

    /// The authorization gate.
    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }

    /// Gate decision for the signed-in user.
    pub fn authorize(&self, capability: Option<Capability>, roles: Option<&[Role]>) -> GateDecision {
        let user = self.orchestrator.current_user();
        self.gate.decide(user.as_ref(), capability, roles)
    }

    /// Gate decision for navigating to `path` as the signed-in user.
    pub fn authorize_route(&self, path: &str) -> GateDecision {
        let user = self.orchestrator.current_user();
        authorize_route(&self.gate, user.as_ref(), path)
    }
}
