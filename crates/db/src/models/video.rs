//! Video entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vcat_core::search::{KeywordPlan, Pagination};
use vcat_core::types::{DbId, Timestamp};

use super::category::CategoryGroupInput;
use super::video_class::VideoClassInput;
use super::video_group::VideoGroupInput;
use super::video_url::{VideoUrl, VideoUrlInput};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `video` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Video {
    pub id: DbId,
    pub title: String,
    pub alias: String,
    pub describe: String,
    pub connection: Option<i16>,
    pub url: String,
    pub cover: String,
    pub video_group_id: DbId,
    /// 1 movie, 2 series.
    #[sqlx(rename = "type")]
    #[serde(rename = "Type")]
    pub kind: Option<i16>,
    /// Comma-separated search keywords.
    pub keywords: String,
    pub type_pid: DbId,
    pub type_id: DbId,
    pub browse: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Detail view: the video, its playback URLs and the episodes of its group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: Video,
    pub video_url_arr: Vec<VideoUrl>,
    pub video_list: Vec<Video>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Scalar fields written by [`crate::repositories::VideoRepo::upsert_by_title`].
///
/// `None` leaves the stored value untouched on update and uses the column
/// default on insert.
#[derive(Debug, Clone, Default)]
pub struct UpsertVideo {
    pub title: String,
    pub alias: Option<String>,
    pub describe: Option<String>,
    pub connection: Option<i16>,
    pub url: Option<String>,
    pub cover: Option<String>,
    pub video_group_id: Option<DbId>,
    pub kind: Option<i16>,
    pub keywords: Option<String>,
    pub type_pid: DbId,
    pub type_id: Option<DbId>,
}

/// Body of `POST /api/v1/video/create`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateVideoRequest {
    pub title: String,
    pub alias: String,
    pub describe: String,
    pub connection: Option<i16>,
    pub url: String,
    pub cover: String,
    #[serde(rename = "Type")]
    pub kind: Option<i16>,
    pub keywords: String,
    pub type_pid: DbId,
    pub type_id: DbId,
    pub category: Vec<CategoryGroupInput>,
    pub video_group: Option<VideoGroupInput>,
    pub video_class: Option<VideoClassInput>,
    pub video_url: Option<VideoUrlInput>,
}

/// Resolved filters for [`crate::repositories::VideoRepo::list`].
#[derive(Debug, Clone)]
pub struct VideoSearch {
    pub plan: KeywordPlan,
    /// Every listed category must be linked to a returned video.
    pub category_ids: Vec<DbId>,
    pub type_pid: Option<DbId>,
    pub pagination: Pagination,
}

/// One page of list results plus the total number of matches.
#[derive(Debug, Clone, Default)]
pub struct VideoPage {
    pub videos: Vec<Video>,
    pub total: i64,
}

impl VideoPage {
    /// Id of the last video on the page, 0 when the page is empty.
    pub fn last_id(&self) -> DbId {
        self.videos.last().map_or(0, |v| v.id)
    }
}

/// Body of `POST /api/v1/video/delete`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteVideoRequest {
    pub id: DbId,
}
