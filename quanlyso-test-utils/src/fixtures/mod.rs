//! Test fixtures: entity factories and mock API endpoints.
//!
//! - `factory` - Entities populated with fixed test values
//! - `api` - Mock endpoints of the quanlyso REST API

pub mod api;
pub mod factory;

use crate::TestSetup;

impl TestSetup {
    pub fn api<'a>(&'a mut self) -> ApiFixtures<'a> {
        ApiFixtures { setup: self }
    }
}

pub struct ApiFixtures<'a> {
    setup: &'a mut TestSetup,
}
