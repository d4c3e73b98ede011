//! Client-side dashboard logic, independent of any rendering framework.
//!
//! Everything a tile grid front end needs lives here: color math, search and
//! view ordering, the color suggestion heuristic, favicon fallback, drag
//! reorder, the command palette, keyboard shortcuts, import/export, and the
//! persistence client with optimistic updates. `app::Dashboard` composes them.

pub mod app;
pub mod client;
pub mod colors;
pub mod config;
pub mod error;
pub mod favicon;
pub mod palette;
pub mod pinyin;
pub mod reorder;
pub mod search;
pub mod shortcuts;
pub mod store;
pub mod suggestion;
pub mod transfer;

pub use app::Dashboard;
pub use error::DashboardError;
