//! Video class: type / parent-type descriptor attached to a video.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vcat_core::types::{DbId, Timestamp};

/// A row from the `video_class` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoClass {
    pub id: DbId,
    pub type_id: DbId,
    pub type_name: String,
    pub type_pid: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A top-level class with the classes whose `type_pid` points at it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoClassTree {
    #[serde(flatten)]
    pub class: VideoClass,
    pub video_class_son: Vec<VideoClass>,
}

/// Class supplied with a create request. Upserted by `type_id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VideoClassInput {
    pub type_id: DbId,
    pub type_name: String,
    pub type_pid: DbId,
}
