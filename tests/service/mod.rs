//! Tests for the entity services and sign-in against a mock API.

mod account;
mod cost_factor;
