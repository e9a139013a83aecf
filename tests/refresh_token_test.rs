mod common;

use auth_core::models::RefreshToken;
use auth_core::store::AuthStore;
use auth_core::AuthError;
use chrono::{Duration, Utc};
use common::{meta, TestApp};

#[tokio::test]
async fn test_refresh_mints_new_access_and_echoes_refresh_value() {
    let app = TestApp::spawn();
    app.seed_principal("jane@example.com", "pw").await;

    let pair = app
        .sessions
        .login("jane@example.com", "pw", &meta())
        .await
        .expect("Login failed");

    let refreshed = app
        .sessions
        .refresh(&pair.refresh_token, &meta())
        .await
        .expect("Refresh failed");

    // The refresh value is not rotated on use.
    assert_eq!(refreshed.refresh_token, pair.refresh_token);
    assert!(app
        .sessions
        .verify_access_token(&refreshed.access_token)
        .is_ok());

    // The same refresh token keeps working.
    assert!(app.sessions.refresh(&pair.refresh_token, &meta()).await.is_ok());
}

#[tokio::test]
async fn test_unknown_refresh_value_fails_invalid() {
    let app = TestApp::spawn();
    let result = app.sessions.refresh("no-such-token", &meta()).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_expired_wins_over_revoked() {
    let app = TestApp::spawn();
    let principal = app.seed_principal("jane@example.com", "pw").await;

    // A token both expired and revoked reports Expired.
    let mut row = RefreshToken::new(principal.principal_id, "stale".to_string(), 7);
    row.expiry_utc = Utc::now() - Duration::minutes(1);
    row.active = false;
    app.store
        .insert_refresh_token(&row)
        .await
        .expect("Seed insert failed");

    let result = app.sessions.refresh("stale", &meta()).await;
    assert!(matches!(result, Err(AuthError::Expired)));
}

#[tokio::test]
async fn test_logout_revokes_and_is_idempotent() {
    let app = TestApp::spawn();
    app.seed_principal("jane@example.com", "pw").await;

    let pair = app
        .sessions
        .login("jane@example.com", "pw", &meta())
        .await
        .expect("Login failed");

    app.sessions
        .logout(&pair.refresh_token, &meta())
        .await
        .expect("Logout failed");

    let result = app.sessions.refresh(&pair.refresh_token, &meta()).await;
    assert!(matches!(result, Err(AuthError::Revoked)));

    // Logging out again, or with a token that never existed, still succeeds.
    assert!(app.sessions.logout(&pair.refresh_token, &meta()).await.is_ok());
    assert!(app.sessions.logout("never-issued", &meta()).await.is_ok());
}

#[tokio::test]
async fn test_deactivation_gates_outstanding_refresh_tokens() {
    let app = TestApp::spawn();
    let principal = app.seed_principal("jane@example.com", "pw").await;

    let pair = app
        .sessions
        .login("jane@example.com", "pw", &meta())
        .await
        .expect("Login failed");

    app.sessions
        .set_principal_active(principal.principal_id, false, &meta())
        .await
        .expect("Deactivation failed");

    let result = app.sessions.refresh(&pair.refresh_token, &meta()).await;
    assert!(matches!(result, Err(AuthError::AccountDeactivated)));

    // Reactivation restores the untouched token.
    app.sessions
        .set_principal_active(principal.principal_id, true, &meta())
        .await
        .expect("Activation failed");
    assert!(app.sessions.refresh(&pair.refresh_token, &meta()).await.is_ok());
}

#[tokio::test]
async fn test_multiple_devices_hold_independent_tokens() {
    let app = TestApp::spawn();
    app.seed_principal("jane@example.com", "pw").await;

    let laptop = app
        .sessions
        .login("jane@example.com", "pw", &meta())
        .await
        .expect("First login failed");
    let phone = app
        .sessions
        .login("jane@example.com", "pw", &meta())
        .await
        .expect("Second login failed");

    assert_ne!(laptop.refresh_token, phone.refresh_token);

    // Logging out one device leaves the other session intact.
    app.sessions
        .logout(&laptop.refresh_token, &meta())
        .await
        .expect("Logout failed");

    assert!(matches!(
        app.sessions.refresh(&laptop.refresh_token, &meta()).await,
        Err(AuthError::Revoked)
    ));
    assert!(app.sessions.refresh(&phone.refresh_token, &meta()).await.is_ok());
}
