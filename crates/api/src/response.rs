//! Shared response envelope types for API handlers.
//!
//! The catalog clients expect PascalCase envelopes (`{"Data": ...}`), so
//! every handler returns one of these instead of ad-hoc `json!` bodies.

use serde::Serialize;
use vcat_core::types::DbId;
use vcat_db::models::category::CategoryTree;

/// Standard `{ "Data": T }` response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// List envelope: `{ "Data": [...], "LastId": n, "Total": n }`.
///
/// `LastId` is the id of the last row on the page (0 for an empty page) so
/// clients can request the next page in cursor mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    pub last_id: DbId,
    pub total: i64,
}

/// Detail envelope: `{ "Data": T, "Category": [...] }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetailResponse<T: Serialize> {
    pub data: T,
    pub category: Vec<CategoryTree>,
}
