//! Video groups: a named bucket (e.g. a series title) shared by episodes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vcat_core::types::{DbId, Timestamp};

/// Visibility flag stored on new groups (2 = visible).
pub const GROUP_VISIBLE: i16 = 2;

/// A row from the `video_group` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoGroup {
    pub id: DbId,
    pub title: String,
    pub is_hide: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VideoGroupInput {
    pub title: String,
    pub is_hide: Option<i16>,
}
