use serde::{Deserialize, Serialize};

/// The signed-in user, as returned by `GET api/account`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Option<i64>,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub activated: bool,
    pub lang_key: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl Account {
    /// Whether the account holds at least one of `authorities`.
    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        authorities
            .iter()
            .any(|wanted| self.authorities.iter().any(|held| held == wanted))
    }
}
