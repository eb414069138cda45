//! Category tree model and DTOs.
//!
//! Categories form a two-level tree: dimension nodes (`parent_id = 0`, e.g.
//! `地区`) and leaf labels pointing at a dimension (e.g. `香港`). Leaves
//! carry a `video_count` usage counter maintained by the taxonomy builder.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vcat_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `category` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub parent_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "Type")]
    pub kind: i16,
    pub is_hide: Option<i16>,
    pub type_id: DbId,
    pub type_pid: DbId,
    pub video_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A dimension node with (a subset of) its leaves.
///
/// Dimensions that do not exist yet are represented by a placeholder with
/// `id = 0` so the response shape stays fixed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryTree {
    pub id: DbId,
    pub name: String,
    pub parent_id: DbId,
    #[serde(rename = "Type")]
    pub kind: i16,
    pub video_count: i32,
    pub son_category: Vec<Category>,
}

impl CategoryTree {
    pub fn new(node: Category, son_category: Vec<Category>) -> Self {
        Self {
            id: node.id,
            name: node.name,
            parent_id: node.parent_id,
            kind: node.kind,
            video_count: node.video_count,
            son_category,
        }
    }

    pub fn placeholder(name: &str, kind: i16) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            parent_id: 0,
            kind,
            video_count: 0,
            son_category: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// One raw label inside a dimension group, e.g. `{"Name": "动作,喜剧"}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CategoryLabelInput {
    pub name: String,
}

/// A dimension group supplied with a create request.
///
/// ```json
/// {"Name": "类型", "Type": 1, "Category": [{"Name": "动作,喜剧"}]}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CategoryGroupInput {
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: Option<i16>,
    pub category: Vec<CategoryLabelInput>,
}

/// Denormalized class ids stamped onto type-dimension leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassStamp {
    pub type_id: DbId,
    pub type_pid: DbId,
}
