//! Service-level tests for signup and login orchestration.
//!
//! Every test runs the real bcrypt hasher and HS256 issuer wrapped in
//! recording fakes, so assertions can cover both outcomes and which
//! collaborators were (or were not) called.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<operation>_<scenario>_<expected_result>`

use auth_service::errors::AuthError;
use auth_service::models::TokenPayload;
use auth_test_utils::*;
use common::secret::ExposeSecret;

// ============================================================================
// Signup
// ============================================================================

/// Signing up alice against an empty store hands the store a bcrypt hash,
/// gets back `u1`, and issues a token for `{alice, u1}`.
#[tokio::test]
async fn test_signup_alice_empty_store_issues_token_for_u1() -> Result<(), anyhow::Error> {
    // Arrange
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    let input = TestUserBuilder::alice().build();

    // Act
    let token = service.signup(&input).await?;

    // Assert
    let requests = fakes.store.create_requests();
    assert_eq!(requests.len(), 1, "store should receive exactly one create");
    let sent = requests.first().expect("one create request");
    assert_eq!(sent.username, TEST_USERNAME_ALICE);
    assert_eq!(sent.email, TEST_EMAIL_ALICE);
    assert_eq!(sent.password_hash.as_str().len(), 60);
    assert_ne!(sent.password_hash.as_str(), TEST_PASSWORD_ALICE);

    assert_eq!(
        fakes.issuer.payloads(),
        vec![TokenPayload {
            username: TEST_USERNAME_ALICE.to_string(),
            subject: TEST_FIRST_USER_ID.into(),
        }]
    );

    token
        .as_str()
        .assert_valid_jwt()
        .assert_for_username(TEST_USERNAME_ALICE)
        .assert_for_subject(TEST_FIRST_USER_ID)
        .assert_expires_in(TEST_JWT_EXPIRY_SECONDS);

    Ok(())
}

/// The plaintext never reaches the store, and the caller's input is left as
/// it was.
#[tokio::test]
async fn test_signup_store_never_sees_plaintext() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    let input = TestUserBuilder::bob().with_first_name("Bob").build();

    service.signup(&input).await?;

    let sent = fakes.store.create_requests();
    let debug = format!("{:?}", sent);
    assert!(
        !debug.contains(TEST_PASSWORD_BOB),
        "create request must not carry the plaintext"
    );
    let hash = sent.first().expect("one create request").password_hash.as_str();
    assert!(hash.starts_with("$2b$10$"), "expected bcrypt cost 10, got {}", hash);
    assert_eq!(input.password.expose_secret(), TEST_PASSWORD_BOB);

    Ok(())
}

/// Profile fields pass through to the store.
#[tokio::test]
async fn test_signup_profile_fields_forwarded() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    let input = TestUserBuilder::alice()
        .with_first_name("Alice")
        .with_last_name("Liddell")
        .with_avatar("https://example.com/alice.png")
        .build();

    service.signup(&input).await?;

    let sent = fakes.store.create_requests();
    let sent = sent.first().expect("one create request");
    assert_eq!(sent.first_name.as_deref(), Some("Alice"));
    assert_eq!(sent.last_name.as_deref(), Some("Liddell"));
    assert_eq!(sent.avatar.as_deref(), Some("https://example.com/alice.png"));

    Ok(())
}

/// A store that produces no record yields `CreationFailed` and the issuer is
/// never reached.
#[tokio::test]
async fn test_signup_store_declines_creation_failed_without_token() {
    let fakes = Fakes::with_store(RecordingUserStore::declining());
    let service = fakes.auth_service();

    let result = service.signup(&TestUserBuilder::alice().build()).await;

    assert!(
        matches!(result, Err(AuthError::CreationFailed)),
        "expected CreationFailed, got {:?}",
        result
    );
    assert_eq!(fakes.store.create_calls(), 1);
    assert_eq!(fakes.issuer.sign_calls(), 0);
}

/// Duplicate email and duplicate username are both creation failures.
#[tokio::test]
async fn test_signup_duplicates_creation_failed() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    service.signup(&TestUserBuilder::alice().build()).await?;

    let same_email = TestUserBuilder::bob().with_email(TEST_EMAIL_ALICE).build();
    let same_username = TestUserBuilder::bob()
        .with_username(TEST_USERNAME_ALICE)
        .build();

    assert!(matches!(
        service.signup(&same_email).await,
        Err(AuthError::CreationFailed)
    ));
    assert!(matches!(
        service.signup(&same_username).await,
        Err(AuthError::CreationFailed)
    ));
    assert_eq!(fakes.store.user_count().await, 1);
    assert_eq!(fakes.issuer.sign_calls(), 1);

    Ok(())
}

/// Issuer errors propagate unchanged after the record was created.
#[tokio::test]
async fn test_signup_issuer_failure_propagates() {
    let fakes = Fakes::new();
    let service = auth_service::services::AuthService::new(
        fakes.store.clone(),
        fakes.hasher.clone(),
        std::sync::Arc::new(FailingTokenIssuer),
    );

    let result = service.signup(&TestUserBuilder::alice().build()).await;

    assert!(matches!(result, Err(AuthError::Crypto(ref m)) if m == "signing backend unavailable"));
    assert_eq!(fakes.store.user_count().await, 1);
}

/// Store errors propagate unchanged from both operations, and nothing is
/// signed.
#[tokio::test]
async fn test_store_failure_propagates_unchanged() {
    let fakes = Fakes::new();
    let service = auth_service::services::AuthService::new(
        std::sync::Arc::new(FailingUserStore),
        fakes.hasher.clone(),
        fakes.issuer.clone(),
    );

    let signup = service.signup(&TestUserBuilder::alice().build()).await;
    let login = service.login(&TestUserBuilder::alice().login()).await;

    assert!(matches!(signup, Err(AuthError::Database(ref m)) if m == FAILING_STORE_DETAIL));
    assert!(matches!(login, Err(AuthError::Database(ref m)) if m == FAILING_STORE_DETAIL));
    assert_eq!(fakes.issuer.sign_calls(), 0);
}

// ============================================================================
// Login
// ============================================================================

/// Correct credentials return a token built from exactly the stored username
/// and record id.
#[tokio::test]
async fn test_login_correct_credentials_token_for_record() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    let alice = TestUserBuilder::alice();
    let bob = TestUserBuilder::bob();
    service.signup(&alice.clone().build()).await?;
    service.signup(&bob.clone().build()).await?;

    let token = service.login(&bob.login()).await?;

    assert_eq!(
        fakes.issuer.payloads().last(),
        Some(&TokenPayload {
            username: TEST_USERNAME_BOB.to_string(),
            subject: TEST_SECOND_USER_ID.into(),
        })
    );
    let claims = fakes.issuer.issuer().decode(token.as_str())?;
    assert_eq!(claims.username, TEST_USERNAME_BOB);
    assert_eq!(claims.sub, TEST_SECOND_USER_ID);

    Ok(())
}

/// Wrong password for alice rejects with `InvalidPassword` and issues nothing.
#[tokio::test]
async fn test_login_wrong_password_invalid_password() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    service.signup(&TestUserBuilder::alice().build()).await?;
    let issued_before = fakes.issuer.sign_calls();

    let result = service
        .login(&login_input(TEST_EMAIL_ALICE, TEST_WRONG_PASSWORD))
        .await;

    assert!(
        matches!(result, Err(AuthError::InvalidPassword)),
        "expected InvalidPassword, got {:?}",
        result
    );
    assert_eq!(fakes.issuer.sign_calls(), issued_before);
    assert_eq!(fakes.hasher.verify_calls(), 1);

    Ok(())
}

/// Unknown email against an empty store rejects with `InvalidEmail` and
/// neither the hasher nor the issuer runs.
#[tokio::test]
async fn test_login_ghost_email_invalid_email_no_hasher_no_issuer() {
    let fakes = Fakes::new();
    let service = fakes.auth_service();

    let result = service.login(&login_input(TEST_EMAIL_GHOST, "x")).await;

    assert!(
        matches!(result, Err(AuthError::InvalidEmail)),
        "expected InvalidEmail, got {:?}",
        result
    );
    assert_eq!(fakes.store.lookups(), vec![TEST_EMAIL_GHOST.to_string()]);
    assert_eq!(fakes.hasher.total_calls(), 0);
    assert_eq!(fakes.issuer.sign_calls(), 0);
}

/// Login writes nothing to the store on any branch.
#[tokio::test]
async fn test_login_never_creates_records() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    let alice = TestUserBuilder::alice();
    service.signup(&alice.clone().build()).await?;

    let _ = service.login(&alice.login()).await;
    let _ = service
        .login(&login_input(TEST_EMAIL_ALICE, TEST_WRONG_PASSWORD))
        .await;
    let _ = service.login(&login_input(TEST_EMAIL_GHOST, "x")).await;

    assert_eq!(fakes.store.create_calls(), 1);
    assert_eq!(fakes.store.user_count().await, 1);

    Ok(())
}

/// Login is an exact email match.
#[tokio::test]
async fn test_login_email_case_mismatch_invalid_email() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    service.signup(&TestUserBuilder::alice().build()).await?;

    let result = service
        .login(&login_input("A@X.COM", TEST_PASSWORD_ALICE))
        .await;

    assert!(matches!(result, Err(AuthError::InvalidEmail)));
    Ok(())
}

/// Two logins for the same user mint two independently valid tokens.
#[tokio::test]
async fn test_login_repeated_each_issues_token() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service();
    let alice = TestUserBuilder::alice();
    service.signup(&alice.clone().build()).await?;

    let first = service.login(&alice.login()).await?;
    let second = service.login(&alice.login()).await?;

    for token in [first, second] {
        fakes.issuer.issuer().decode(token.as_str())?;
    }
    assert_eq!(fakes.issuer.sign_calls(), 3);

    Ok(())
}

// ============================================================================
// Login timing equalization
// ============================================================================

/// With equalization on, an unknown email costs one verification against the
/// decoy and still issues nothing.
#[tokio::test]
async fn test_login_equalized_unknown_email_verifies_decoy() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service().with_login_timing_equalization().await?;
    assert_eq!(fakes.hasher.hash_calls(), 1, "decoy is hashed once up front");

    let result = service.login(&login_input(TEST_EMAIL_GHOST, "x")).await;

    assert!(matches!(result, Err(AuthError::InvalidEmail)));
    assert_eq!(fakes.hasher.verify_calls(), 1);
    assert_eq!(fakes.issuer.sign_calls(), 0);

    Ok(())
}

/// Equalization does not change the outcome of real logins.
#[tokio::test]
async fn test_login_equalized_known_user_unaffected() -> Result<(), anyhow::Error> {
    let fakes = Fakes::new();
    let service = fakes.auth_service().with_login_timing_equalization().await?;
    let alice = TestUserBuilder::alice();
    service.signup(&alice.clone().build()).await?;

    service.login(&alice.login()).await?;
    let wrong = service
        .login(&login_input(TEST_EMAIL_ALICE, TEST_WRONG_PASSWORD))
        .await;

    assert!(matches!(wrong, Err(AuthError::InvalidPassword)));
    Ok(())
}
