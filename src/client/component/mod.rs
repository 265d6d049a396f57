//! View controllers.
//!
//! Each controller owns the state one screen renders and talks to the API through the
//! shared [`AppContext`](crate::client::AppContext). Controllers never share records; they
//! stay in sync by publishing and consuming change events.

pub mod detail;
pub mod dialog;
pub mod list;
pub mod tool;

pub use detail::EntityDetail;
pub use dialog::{DeleteDialog, EntityDialog};
pub use list::{EntityList, ListState};
pub use tool::{LineKey, ToolComponent};
