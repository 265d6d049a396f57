use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error(transparent)]
    Quanlyso(#[from] quanlyso::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
