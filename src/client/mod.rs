pub mod alert;
pub mod component;
pub mod context;
pub mod event;
pub mod http;
pub mod lookup;
pub mod pagination;
pub mod router;
pub mod service;

pub use context::AppContext;
