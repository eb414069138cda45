//! Playback URL variants attached to a video.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vcat_core::types::{DbId, Timestamp};

/// A row from the `video_url` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoUrl {
    pub id: DbId,
    pub video_id: DbId,
    pub url: String,
    pub proxy: String,
    pub proxy_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// URL variant supplied with a create request. Upserted by `(video_id, proxy_name)`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VideoUrlInput {
    pub url: String,
    pub proxy: String,
    pub proxy_name: String,
}

impl VideoUrlInput {
    /// Both the URL and the proxy prefix are required for a usable variant.
    pub fn is_usable(&self) -> bool {
        !self.url.trim().is_empty() && !self.proxy.trim().is_empty()
    }
}
