//! Placeholder values shared by the tests. None of them are real credentials.

/// Login name of the mock account.
pub static TEST_LOGIN: &str = "user";

/// Password sent by login tests.
pub static TEST_PASSWORD: &str = "user";

/// Bearer token issued by the mock authenticate endpoint.
pub static TEST_TOKEN: &str = "test-id-token";

/// ID of the mock account, used as `clientsId` on new transactions.
pub static TEST_ACCOUNT_ID: i64 = 7;
