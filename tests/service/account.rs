//! Tests for AuthService and Principal.

use quanlyso::{model::api::LoginDto, Error};
use quanlyso_test_utils::{
    constant::{TEST_ACCOUNT_ID, TEST_LOGIN, TEST_PASSWORD, TEST_TOKEN},
    prelude::*,
};
use serde_json::json;

fn credentials() -> LoginDto {
    LoginDto {
        username: TEST_LOGIN.to_string(),
        password: TEST_PASSWORD.to_string(),
        remember_me: false,
    }
}

/// Tests signing in.
///
/// Verifies that the credentials are posted, the issued token is sent with the account
/// request and the account becomes the cached identity.
///
/// Expected: Ok with the signed-in account
#[tokio::test]
async fn login_sets_token_and_identity() -> Result<(), TestError> {
    let mut test = TestSetup::new().await?;
    let authenticate = test
        .server
        .mock("POST", "/api/authenticate")
        .match_body(mockito::Matcher::Json(json!({
            "username": TEST_LOGIN,
            "password": TEST_PASSWORD,
            "rememberMe": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id_token": TEST_TOKEN }).to_string())
        .create();
    let account = test
        .server
        .mock("GET", "/api/account")
        .match_header("authorization", format!("Bearer {TEST_TOKEN}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&quanlyso_test_utils::setup::test_account())?)
        .create();

    let result = test.ctx.auth().login(&credentials()).await?;

    assert_eq!(result.login, TEST_LOGIN);
    assert_eq!(test.ctx.api.token().as_deref(), Some(TEST_TOKEN));
    assert!(test.ctx.principal.is_authenticated());
    assert!(test.ctx.principal.has_any_authority(&["ROLE_USER"]));
    assert_eq!(test.ctx.principal.account_id(), Some(TEST_ACCOUNT_ID));
    authenticate.assert();
    account.assert();

    Ok(())
}

/// Tests signing in with wrong credentials.
///
/// Expected: Err(Api) with status 401 and no token
#[tokio::test]
async fn login_rejected() -> Result<(), TestError> {
    let mut test = TestSetup::new().await?;
    let endpoint = test
        .api()
        .create_error_endpoint("POST", "/api/authenticate", 401, "", 1);

    let result = test.ctx.auth().login(&credentials()).await;

    assert!(matches!(result, Err(Error::Api { status: 401, .. })));
    assert!(test.ctx.api.token().is_none());
    assert!(!test.ctx.principal.is_authenticated());
    endpoint.assert();

    Ok(())
}

/// Tests resolving the identity twice.
///
/// Verifies that the account is fetched once and then served from cache until forced.
///
/// Expected: Ok with the account, two requests over three calls
#[tokio::test]
async fn identity_is_cached_until_forced() -> Result<(), TestError> {
    let mut test = TestSetup::new().await?;
    let endpoint = test.api().create_account_endpoint(None, 2);

    let first = test.ctx.principal.identity(false).await?;
    let second = test.ctx.principal.identity(false).await?;
    let forced = test.ctx.principal.identity(true).await?;

    assert_eq!(first.map(|a| a.login), Some(TEST_LOGIN.to_string()));
    assert_eq!(second, forced);
    endpoint.assert();

    Ok(())
}

/// Tests resolving the identity when nobody is signed in.
///
/// Expected: Ok(None)
#[tokio::test]
async fn unauthorized_identity_is_none() -> Result<(), TestError> {
    let mut test = TestSetup::new().await?;
    let endpoint = test.api().create_unauthorized_account_endpoint(1);

    let identity = test.ctx.principal.identity(false).await?;

    assert!(identity.is_none());
    assert!(!test.ctx.principal.is_authenticated());
    endpoint.assert();

    Ok(())
}

/// Tests signing out.
///
/// Expected: token and identity cleared
#[tokio::test]
async fn logout_clears_token_and_identity() -> Result<(), TestError> {
    let test = TestSetup::with_user().await?;
    test.ctx.api.set_token(Some(TEST_TOKEN.to_string()));

    test.ctx.auth().logout();

    assert!(test.ctx.api.token().is_none());
    assert!(!test.ctx.principal.is_authenticated());

    Ok(())
}
