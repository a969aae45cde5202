//! Integration tests for route and capability authorization.

mod helpers;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use tourdesk_auth::rbac::{DenyReason, RedirectTarget};
use tourdesk_auth::{Capability, GateDecision};
use tourdesk_entity::user::Role;

#[tokio::test]
async fn test_role_without_user_management_is_sent_to_unauthorized() {
    let app = helpers::TestApp::new(Role::CustomerServiceRepresentative);
    app.login().await;

    let decision = app.context.authorize_route("/users");

    assert_eq!(
        decision,
        GateDecision::Deny {
            redirect: RedirectTarget::Unauthorized,
            reason: DenyReason::MissingCapability {
                role: Role::CustomerServiceRepresentative,
                capability: Capability::AccessUserManagement,
            },
        }
    );
}

#[tokio::test]
async fn test_signed_out_user_is_sent_to_login() {
    let app = helpers::TestApp::new(Role::SuperAdmin);
    app.context.orchestrator().initialize().await;

    for path in ["/dashboard", "/users", "/profile"] {
        assert_eq!(
            app.context.authorize_route(path).redirect(),
            Some(RedirectTarget::Login),
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_department_views() {
    let app = helpers::TestApp::new(Role::VisaDepartment);
    app.login().await;

    assert!(app.context.authorize_route("/visa").is_allowed());
    assert!(app.context.authorize_route("/customers").is_allowed());
    assert!(!app.context.authorize_route("/bookings").is_allowed());
    assert!(!app.context.authorize_route("/tours/new").is_allowed());
    assert!(
        app.context
            .authorize(Some(Capability::ManageVisaStatus), None)
            .is_allowed()
    );
}

#[tokio::test]
async fn test_token_claims_never_grant_access() {
    let app = helpers::TestApp::new(Role::CustomerServiceRepresentative);
    let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"1","role":"super_admin"}"#);
    app.api
        .issue_access_token(format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2ln"));
    app.login().await;

    let claims = app.context.tokens().claims().expect("claims should decode");
    assert_eq!(claims.role.as_deref(), Some("super_admin"));

    assert_eq!(
        app.context.authorize_route("/settings").redirect(),
        Some(RedirectTarget::Unauthorized)
    );
}

#[tokio::test]
async fn test_register_is_limited_to_account_administrators() {
    use tourdesk_entity::auth::RegisterRequest;

    let request = || RegisterRequest {
        email: "new.hire@agency.test".into(),
        password: "correct-horse-battery".into(),
        full_name: "New Hire".into(),
        role: Role::BookingDepartment,
        phone: Some("+1 555 0100".into()),
    };

    let csr = helpers::TestApp::new(Role::CustomerServiceRepresentative);
    csr.login().await;
    let err = csr
        .context
        .orchestrator()
        .register(request())
        .await
        .unwrap_err();
    assert!(err.is(tourdesk_core::error::ErrorKind::PermissionDenied));

    let admin = helpers::TestApp::new(Role::Administrator);
    let me = admin.login().await;
    let created = admin
        .context
        .orchestrator()
        .register(request())
        .await
        .unwrap();
    assert_eq!(created.role, Role::BookingDepartment);
    assert_eq!(admin.context.orchestrator().current_user(), Some(me));
}
