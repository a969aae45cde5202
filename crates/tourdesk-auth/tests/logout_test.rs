//! Integration tests for logout, including logout racing a refresh.

mod helpers;

use std::sync::atomic::Ordering;

use tourdesk_auth::AuthState;
use tourdesk_core::error::ErrorKind;
use tourdesk_entity::user::Role;

#[tokio::test]
async fn test_logout_during_refresh_ends_unauthenticated() {
    let app = helpers::TestApp::new(Role::Administrator);
    app.login().await;
    app.api.hold_next_refresh();

    let orchestrator = app.context.orchestrator().clone();
    let refresh = tokio::spawn(async move { orchestrator.refresh_now().await });
    app.api.refresh_entered.notified().await;

    app.context.orchestrator().logout().await;
    app.api.refresh_release.notify_one();

    let result = refresh.await.expect("refresh task panicked");
    assert!(result.unwrap_err().is(ErrorKind::SessionExpired));

    assert_eq!(
        app.context.orchestrator().state(),
        AuthState::Unauthenticated { notice: None }
    );
    assert!(app.context.tokens().access_token().is_none());
    assert!(app.context.tokens().refresh_token().is_none());
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_logout_survives_server_failure() {
    let app = helpers::TestApp::new(Role::Administrator);
    app.login().await;
    app.api.reject_all_csrf(true);

    app.context.orchestrator().logout().await;

    assert_eq!(app.api.logout_calls.load(Ordering::SeqCst), 2);
    assert!(!app.context.orchestrator().state().is_authenticated());
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_logout_without_session_skips_server() {
    let app = helpers::TestApp::new(Role::Administrator);

    app.context.orchestrator().logout().await;

    assert_eq!(app.api.logout_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        app.context.orchestrator().state(),
        AuthState::Unauthenticated { notice: None }
    );
}

#[tokio::test]
async fn test_login_after_logout_starts_fresh_session() {
    let app = helpers::TestApp::new(Role::Administrator);
    let first = app.login().await;
    app.context.orchestrator().logout().await;

    let second = app.login().await;

    assert_eq!(first.id(), second.id());
    assert!(app.context.orchestrator().state().is_authenticated());
    assert!(app.context.tokens().access_token().is_some());
}
