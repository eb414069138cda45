//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` input DTOs for the create endpoint
//!
//! JSON field names are PascalCase to match the public wire format.

pub mod category;
pub mod video;
pub mod video_category;
pub mod video_class;
pub mod video_group;
pub mod video_url;
