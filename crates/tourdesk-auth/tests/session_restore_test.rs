//! Integration tests for restoring a session from the file store.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tourdesk_auth::{AuthState, SessionContext};
use tourdesk_core::config::{ClientConfig, StorageConfig};
use tourdesk_core::events::SessionEndReason;
use tourdesk_core::traits::ManualClock;
use tourdesk_entity::auth::LoginRequest;
use tourdesk_entity::user::Role;
use tourdesk_store::StoreManager;

fn file_config(dir: &tempfile::TempDir) -> ClientConfig {
    ClientConfig {
        storage: StorageConfig {
            provider: "file".into(),
            path: dir.path().join("session.json").display().to_string(),
            ..StorageConfig::default()
        },
        ..ClientConfig::default()
    }
}

fn context(
    config: &ClientConfig,
    api: &Arc<helpers::FakeIdentityService>,
    clock: &Arc<ManualClock>,
) -> SessionContext {
    let store = StoreManager::new(&config.storage).expect("Failed to open file store");
    SessionContext::new(config.clone(), api.clone(), store, clock.clone())
        .expect("Failed to build session context")
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);
    let api = Arc::new(helpers::FakeIdentityService::new(Role::WebDeveloper));
    let clock = Arc::new(ManualClock::starting_now());

    let first = context(&config, &api, &clock);
    first
        .orchestrator()
        .login(LoginRequest::new("dev@agency.test", "correct-password"))
        .await
        .unwrap();
    let fetches = api.csrf_fetches.load(Ordering::SeqCst);
    drop(first);

    clock.advance(Duration::from_secs(10 * 60));
    let second = context(&config, &api, &clock);
    let state = second.orchestrator().initialize().await;

    assert!(state.is_authenticated());
    assert_eq!(state.user().unwrap().role(), Role::WebDeveloper);

    // The persisted forgery token is reused rather than refetched.
    second.csrf().token().await.unwrap();
    assert_eq!(api.csrf_fetches.load(Ordering::SeqCst), fetches);
}

#[tokio::test]
async fn test_expired_session_is_not_restored() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);
    let api = Arc::new(helpers::FakeIdentityService::new(Role::WebDeveloper));
    let clock = Arc::new(ManualClock::starting_now());

    let first = context(&config, &api, &clock);
    first
        .orchestrator()
        .login(LoginRequest::new("dev@agency.test", "correct-password"))
        .await
        .unwrap();
    drop(first);

    clock.advance(Duration::from_secs(61 * 60));
    let second = context(&config, &api, &clock);

    assert_eq!(
        second.orchestrator().initialize().await,
        AuthState::Unauthenticated {
            notice: SessionEndReason::Expired.notice().map(str::to_owned),
        }
    );
    assert!(second.tokens().record().is_none());
}

#[tokio::test]
async fn test_unknown_store_provider_is_rejected() {
    let config = ClientConfig {
        storage: StorageConfig {
            provider: "cookies".into(),
            ..StorageConfig::default()
        },
        ..ClientConfig::default()
    };
    let api = Arc::new(helpers::FakeIdentityService::new(Role::WebDeveloper));

    let err = SessionContext::with_defaults(config, api).unwrap_err();
    assert!(err.is(tourdesk_core::error::ErrorKind::Configuration));
}
