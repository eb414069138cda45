//! Query parameter types for the catalog endpoints.
//!
//! Numeric parameters arrive as raw strings and are parsed here so that a
//! malformed value produces the JSON error envelope (400) rather than the
//! extractor's plain-text rejection. Empty values count as absent.

use serde::Deserialize;
use vcat_core::search::{parse_id_list, KeywordPlan, Pagination};
use vcat_core::types::DbId;
use vcat_db::models::video::VideoSearch;

use crate::error::{AppError, AppResult};

/// `GET /api/v1/video/list?Page=&PageSize=&Id=&KeyWord=&CategoryId=&TypeId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub id: Option<String>,
    pub key_word: Option<String>,
    pub category_id: Option<String>,
    pub type_id: Option<String>,
}

impl VideoListParams {
    /// Validate and resolve into repository search filters.
    pub fn into_search(self) -> AppResult<VideoSearch> {
        let page = parse_opt_i64("Page", self.page.as_deref())?;
        let page_size = parse_opt_i64("PageSize", self.page_size.as_deref())?;
        let cursor = parse_opt_i64("Id", self.id.as_deref())?;
        let type_pid = parse_opt_i64("TypeId", self.type_id.as_deref())?;

        let category_ids = match self.category_id.as_deref() {
            Some(raw) => parse_id_list(raw)?,
            None => Vec::new(),
        };

        Ok(VideoSearch {
            plan: KeywordPlan::from_keyword(self.key_word.as_deref().unwrap_or_default()),
            category_ids,
            type_pid,
            pagination: Pagination::resolve(page, page_size, cursor),
        })
    }
}

/// `?Id=` for single-video endpoints. Required.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdParams {
    pub id: Option<String>,
}

impl IdParams {
    pub fn id(&self) -> AppResult<DbId> {
        parse_opt_i64("Id", self.id.as_deref())?
            .ok_or_else(|| AppError::BadRequest("Id is required".to_string()))
    }
}

/// `?TypeId=` for the category home trees. Optional, 0 when absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeIdParams {
    pub type_id: Option<String>,
}

impl TypeIdParams {
    pub fn type_id(&self) -> AppResult<DbId> {
        Ok(parse_opt_i64("TypeId", self.type_id.as_deref())?.unwrap_or(0))
    }
}

/// Parse an optional integer parameter; blank values are treated as absent.
fn parse_opt_i64(name: &str, raw: Option<&str>) -> AppResult<Option<i64>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{name} must be an integer, got '{s}'"))),
    }
}
