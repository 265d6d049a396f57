//! Wire models shared by the services and view controllers.

pub mod account;
pub mod api;
pub mod channel;
pub mod code;
pub mod entity;
pub mod factor_rate;
pub mod reference;
pub mod transaction;

pub use account::Account;
pub use channel::Channel;
pub use code::Code;
pub use entity::{Entity, EntityKind, NameRef};
pub use factor_rate::{CostFactor, ProfitFactor};
pub use reference::{Factor, Style, Types};
pub use transaction::{TransactionDetails, Transactions};
