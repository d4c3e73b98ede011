//! The `services` module provides a high-level API for interacting with the datastore.
//! HTTP handlers work with domain models (`Tile`, `ColorMeanings`) and never see the
//! blob rows directly.
//!
//! Every write replaces a whole logical blob. Read-modify-write operations are two
//! independent round trips with no transaction around them, so concurrent writers
//! race and the last write wins.

pub mod blob_service;
pub mod color_meaning_service;
pub mod migration_service;
pub mod tile_service;

pub use blob_service::*;
pub use color_meaning_service::*;
pub use migration_service::*;
pub use tile_service::*;
