//! Video/category junction rows.

use serde::Serialize;
use sqlx::FromRow;
use vcat_core::types::{DbId, Timestamp};

/// A row from the `video_category` junction table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoCategory {
    pub id: DbId,
    pub video_id: DbId,
    pub category_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Number of junction rows written by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReconcileOutcome {
    pub created: u64,
    pub deleted: u64,
}
