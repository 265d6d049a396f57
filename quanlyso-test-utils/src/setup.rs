use mockito::{Mock, Server, ServerGuard};
use quanlyso::{
    client::{http::ApiClient, AppContext},
    model::Account,
};

use crate::{
    constant::{TEST_ACCOUNT_ID, TEST_LOGIN},
    error::TestError,
};

/// A mock API server and a client context pointed at it.
pub struct TestSetup {
    pub server: ServerGuard,
    pub ctx: AppContext,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;
        let api = ApiClient::new(server.url())?;

        Ok(TestSetup {
            server,
            ctx: AppContext::new(api),
            mocks: Vec::new(),
        })
    }

    /// Like [`TestSetup::new`], with the mock account already signed in.
    pub async fn with_user() -> Result<Self, TestError> {
        let setup = Self::new().await?;
        setup.ctx.principal.authenticate(Some(test_account()));

        Ok(setup)
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

/// The account returned by the mock account endpoint.
pub fn test_account() -> Account {
    Account {
        id: Some(TEST_ACCOUNT_ID),
        login: TEST_LOGIN.to_string(),
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
        email: Some("user@localhost".to_string()),
        activated: true,
        lang_key: Some("vi".to_string()),
        authorities: vec!["ROLE_USER".to_string()],
    }
}
