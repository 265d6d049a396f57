//! Mock endpoints of the quanlyso REST API.
//!
//! Every endpoint is registered on the setup's mockito server and verifies it was called
//! exactly `expected_requests` times when asserted.

use mockito::{Matcher, Mock};
use quanlyso::model::{api::TokenDto, Account, EntityKind};
use serde::Serialize;

use crate::{constant::TEST_TOKEN, fixtures::ApiFixtures, setup::test_account};

impl<'a> ApiFixtures<'a> {
    /// GET `/api/<resource>` without query parameters.
    ///
    /// # Arguments
    /// - `kind` - Entity kind whose resource is mocked
    /// - `items` - Records returned as the JSON body
    /// - `total_count` - Value of the `X-Total-Count` header, if any
    /// - `expected_requests` - Number of times this endpoint should be called
    pub fn create_list_endpoint<T: Serialize>(
        &mut self,
        kind: EntityKind,
        items: &[T],
        total_count: Option<u64>,
        expected_requests: usize,
    ) -> Mock {
        let mut mock = self
            .setup
            .server
            .mock("GET", format!("/api/{}", kind.resource()).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(items).unwrap())
            .expect(expected_requests);

        if let Some(total_count) = total_count {
            mock = mock.with_header("X-Total-Count", &total_count.to_string());
        }

        mock.create()
    }

    /// GET `/api/<resource>` with exactly the given query parameters.
    ///
    /// The response carries an `X-Total-Count` header and a `Link` header pointing at the
    /// next page.
    pub fn create_paged_list_endpoint<T: Serialize>(
        &mut self,
        kind: EntityKind,
        query: &[(&str, &str)],
        items: &[T],
        total_count: u64,
        next_page: usize,
        expected_requests: usize,
    ) -> Mock {
        let resource = kind.resource();
        let matchers = query
            .iter()
            .map(|(key, value)| Matcher::UrlEncoded(key.to_string(), value.to_string()))
            .collect();
        let link = format!("</api/{resource}?page={next_page}&size=20>; rel=\"next\"");

        self.setup
            .server
            .mock("GET", format!("/api/{resource}").as_str())
            .match_query(Matcher::AllOf(matchers))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("X-Total-Count", &total_count.to_string())
            .with_header("Link", &link)
            .with_body(serde_json::to_string(items).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// GET `/api/<resource>/{id}`.
    pub fn create_find_endpoint<T: Serialize>(
        &mut self,
        kind: EntityKind,
        id: i64,
        body: &T,
        expected_requests: usize,
    ) -> Mock {
        let path = format!("/api/{}/{}", kind.resource(), id);
        self.create_json_endpoint("GET", &path, 200, body, expected_requests)
    }

    /// POST `/api/<resource>` answering 201 with `created`.
    ///
    /// Only requests whose body contains `expected_body` match.
    pub fn create_create_endpoint<T: Serialize>(
        &mut self,
        kind: EntityKind,
        expected_body: serde_json::Value,
        created: &T,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", format!("/api/{}", kind.resource()).as_str())
            .match_body(Matcher::PartialJson(expected_body))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(created).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// PUT `/api/<resource>` answering 200 with `updated`.
    pub fn create_update_endpoint<T: Serialize>(
        &mut self,
        kind: EntityKind,
        updated: &T,
        expected_requests: usize,
    ) -> Mock {
        let path = format!("/api/{}", kind.resource());
        self.create_json_endpoint("PUT", &path, 200, updated, expected_requests)
    }

    /// DELETE `/api/<resource>/{id}` answering 200 with an empty body.
    pub fn create_delete_endpoint(
        &mut self,
        kind: EntityKind,
        id: i64,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("DELETE", format!("/api/{}/{}", kind.resource(), id).as_str())
            .with_status(200)
            .expect(expected_requests)
            .create()
    }

    /// Any method and path answering `status` with a raw `body`.
    pub fn create_error_endpoint(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: &str,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock(method, path)
            .with_status(status)
            .with_body(body)
            .expect(expected_requests)
            .create()
    }

    /// GET `/api/channels/day/{day}`.
    pub fn create_channels_by_day_endpoint<T: Serialize>(
        &mut self,
        day: &str,
        channels: &[T],
        expected_requests: usize,
    ) -> Mock {
        let path = format!("/api/channels/day/{day}");
        self.create_json_endpoint("GET", &path, 200, &channels, expected_requests)
    }

    /// GET `/api/cost-factors/style/{id}`.
    pub fn create_cost_factors_by_style_endpoint<T: Serialize>(
        &mut self,
        style_id: i64,
        cost_factors: &[T],
        expected_requests: usize,
    ) -> Mock {
        let path = format!("/api/cost-factors/style/{style_id}");
        self.create_json_endpoint("GET", &path, 200, &cost_factors, expected_requests)
    }

    /// GET `/api/account` returning `account`, or the test account when `None`.
    pub fn create_account_endpoint(
        &mut self,
        account: Option<Account>,
        expected_requests: usize,
    ) -> Mock {
        let account = account.unwrap_or_else(test_account);
        self.create_json_endpoint("GET", "/api/account", 200, &account, expected_requests)
    }

    /// GET `/api/account` answering 401.
    pub fn create_unauthorized_account_endpoint(&mut self, expected_requests: usize) -> Mock {
        self.create_error_endpoint("GET", "/api/account", 401, "", expected_requests)
    }

    /// POST `/api/authenticate` issuing the test token.
    pub fn create_authenticate_endpoint(&mut self, expected_requests: usize) -> Mock {
        let token = TokenDto {
            id_token: TEST_TOKEN.to_string(),
        };
        self.create_json_endpoint("POST", "/api/authenticate", 200, &token, expected_requests)
    }

    fn create_json_endpoint<T: Serialize + ?Sized>(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: &T,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(body).unwrap())
            .expect(expected_requests)
            .create()
    }
}
