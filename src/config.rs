use std::str::FromStr;

use dioxus_logger::tracing::Level;

use crate::error::config::ConfigError;

/// Default number of records requested per list page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

pub struct Config {
    pub api_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub items_per_page: usize,
    pub remember_me: bool,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: required("QUANLYSO_API_URL")?,
            username: optional("QUANLYSO_USERNAME"),
            password: optional("QUANLYSO_PASSWORD"),
            items_per_page: parse_or("QUANLYSO_ITEMS_PER_PAGE", DEFAULT_ITEMS_PER_PAGE)?,
            remember_me: parse_or("QUANLYSO_REMEMBER_ME", false)?,
            log_level: parse_or("QUANLYSO_LOG_LEVEL", Level::INFO)?,
        })
    }

    /// Login credentials, when both a username and a password are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn optional(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

fn parse_or<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(var) {
        Some(value) => parse_value(var, &value),
        None => Ok(default),
    }
}

fn parse_value<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: e.to_string(),
        })
}
