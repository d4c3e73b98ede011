//! SeaORM Entity Crate
//!
//! Defines the SeaORM entities that map to database tables.

pub mod blob;
pub mod legacy_kv;

// Prelude module for easy importing of all entities and their related types
pub mod prelude {
    pub use super::blob::Entity as Blob;
    pub use super::blob::Model as BlobModel;
    pub use super::blob::ActiveModel as BlobActiveModel;
    pub use super::blob::Column as BlobColumn;

    pub use super::legacy_kv::Entity as LegacyKv;
    pub use super::legacy_kv::Model as LegacyKvModel;
    pub use super::legacy_kv::ActiveModel as LegacyKvActiveModel;
    pub use super::legacy_kv::Column as LegacyKvColumn;
}
