//! Search planning for the video list endpoint.
//!
//! A free-text keyword is routed to one of two strategies:
//!
//! - **Substring**: `ILIKE '%kw%'` across title, alias and keywords. Used for
//!   Han text (no word boundaries for the full-text parser) and for very
//!   short ASCII input, where stemming and prefix search add nothing.
//! - **Token**: a PostgreSQL `tsquery` built from the keyword, where every
//!   surviving token is a required prefix, combined with the substring
//!   checks as a fallback.
//!
//! This module lives in `core` (zero internal deps) so the planner rules can
//! be unit tested without a database.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::text::contains_han;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Relevance weights
// ---------------------------------------------------------------------------

/// Bonus for an exact title match.
pub const SCORE_EXACT_TITLE: i32 = 200;

/// Bonus for a title substring match.
pub const SCORE_TITLE_MATCH: i32 = 80;

/// Bonus for an alias substring match.
pub const SCORE_ALIAS_MATCH: i32 = 60;

/// Bonus for a keywords substring match.
pub const SCORE_KEYWORDS_MATCH: i32 = 30;

/// Multiplier applied to `ts_rank` in token mode.
pub const FULLTEXT_RANK_WEIGHT: i32 = 3;

/// Tokens shorter than this never become tsquery terms.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Text search configuration used for both indexing and querying.
pub const TS_CONFIG: &str = "simple";

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of videos per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of videos per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Common English words dropped from token queries.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "of", "to", "in", "on", "for",
    "with", "by", "at", "from", "as", "is", "are", "was", "were", "be", "been", "being", "this",
    "that", "these", "those", "it", "its", "into", "over", "under", "about", "between", "through",
    "during", "before", "after",
];

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]+").expect("valid regex"));

// ---------------------------------------------------------------------------
// Keyword planning
// ---------------------------------------------------------------------------

/// A full-text query and the PostgreSQL function that parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsQuery {
    /// Pre-built `term:* & term:*` expression, parsed with `to_tsquery`.
    Prefix(String),
    /// Raw user text, parsed with `plainto_tsquery`.
    Plain(String),
}

impl TsQuery {
    /// Name of the SQL function that accepts [`TsQuery::text`].
    pub fn sql_function(&self) -> &'static str {
        match self {
            Self::Prefix(_) => "to_tsquery",
            Self::Plain(_) => "plainto_tsquery",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Prefix(s) | Self::Plain(s) => s,
        }
    }
}

/// How the keyword filter and score are built for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordPlan {
    /// No keyword: no text filter, no score.
    None,
    /// Substring matching, score is the best matching tier.
    Substring { keyword: String, pattern: String },
    /// Full-text matching, score adds rank, exact bonus and tier bonus.
    Token {
        keyword: String,
        pattern: String,
        tsquery: TsQuery,
    },
}

impl KeywordPlan {
    /// Classify a raw keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcat_core::search::KeywordPlan;
    ///
    /// assert!(matches!(KeywordPlan::from_keyword(""), KeywordPlan::None));
    /// assert!(matches!(KeywordPlan::from_keyword("a"), KeywordPlan::Substring { .. }));
    /// assert!(matches!(KeywordPlan::from_keyword("avengers"), KeywordPlan::Token { .. }));
    /// ```
    pub fn from_keyword(raw: &str) -> Self {
        let keyword = raw.trim();
        if keyword.is_empty() {
            return Self::None;
        }

        let pattern = like_pattern(keyword);
        if uses_substring_mode(keyword) {
            Self::Substring {
                keyword: keyword.to_string(),
                pattern,
            }
        } else {
            Self::Token {
                keyword: keyword.to_string(),
                pattern,
                tsquery: build_prefix_tsquery(keyword),
            }
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Han text, or ASCII text whose tokens are all shorter than three characters.
pub fn uses_substring_mode(keyword: &str) -> bool {
    contains_han(keyword) || is_short_ascii_query(keyword)
}

/// ASCII input where every whitespace-delimited token is shorter than
/// [`MIN_TOKEN_CHARS`].
pub fn is_short_ascii_query(keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return true;
    }
    if !keyword.is_ascii() {
        return false;
    }
    keyword
        .split_whitespace()
        .all(|token| token.len() < MIN_TOKEN_CHARS)
}

fn is_stop_word(token: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(&token)
}

/// Build a tsquery where every meaningful token is a required prefix.
///
/// Punctuation is stripped, stop words and tokens shorter than
/// [`MIN_TOKEN_CHARS`] are dropped. When nothing survives, the raw keyword
/// is returned for `plainto_tsquery`.
///
/// # Examples
///
/// ```
/// use vcat_core::search::{build_prefix_tsquery, TsQuery};
///
/// assert_eq!(
///     build_prefix_tsquery("The Dark Knight"),
///     TsQuery::Prefix("dark:* & knight:*".to_string())
/// );
/// assert_eq!(build_prefix_tsquery("of the"), TsQuery::Plain("of the".to_string()));
/// ```
pub fn build_prefix_tsquery(keyword: &str) -> TsQuery {
    let keyword = keyword.trim();
    let cleaned = NON_WORD_RE.replace_all(keyword, " ");

    let terms: Vec<String> = cleaned
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| !is_stop_word(t))
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(|t| format!("{t}:*"))
        .collect();

    if terms.is_empty() {
        TsQuery::Plain(keyword.to_string())
    } else {
        TsQuery::Prefix(terms.join(" & "))
    }
}

/// Wrap a keyword in `%` for `ILIKE`, escaping LIKE metacharacters.
pub fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// ---------------------------------------------------------------------------
// Filters and pagination
// ---------------------------------------------------------------------------

/// Parse a `CategoryId` query value: comma-separated ids, optionally quoted.
///
/// Duplicates are removed so the intersection filter can compare the number
/// of distinct matches with the number of requested ids.
pub fn parse_id_list(raw: &str) -> Result<Vec<DbId>, CoreError> {
    let strip = |s: &str| s.trim().trim_matches(|c: char| c == '"' || c == '\'').trim().to_string();

    let cleaned = strip(raw);
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for part in cleaned.split(',') {
        let part = strip(part);
        if part.is_empty() {
            continue;
        }
        let id: DbId = part
            .parse()
            .map_err(|_| CoreError::Validation(format!("invalid category id '{part}'")))?;
        if seen.insert(id) {
            ids.push(id);
        }
    }

    Ok(ids)
}

/// Resolved paging window for one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    /// `id > cursor` floor; `None` in offset mode.
    pub cursor: Option<DbId>,
}

impl Pagination {
    /// Pick one paging strategy per request.
    ///
    /// A positive `cursor` selects cursor mode (no offset); otherwise the
    /// window is `(page - 1) * page_size`, saturating at `i64::MAX`. Page size is clamped to
    /// `1..=MAX_PAGE_SIZE` and page floors at 1.
    pub fn resolve(page: Option<i64>, page_size: Option<i64>, cursor: Option<DbId>) -> Self {
        let limit = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        match cursor.filter(|c| *c > 0) {
            Some(cursor) => Self {
                limit,
                offset: 0,
                cursor: Some(cursor),
            },
            None => {
                let page = page.unwrap_or(1).max(1);
                Self {
                    limit,
                    offset: (page - 1).saturating_mul(limit),
                    cursor: None,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- mode selection ------------------------------------------------------

    #[test]
    fn empty_keyword_has_no_plan() {
        assert_eq!(KeywordPlan::from_keyword("   "), KeywordPlan::None);
        assert!(!KeywordPlan::from_keyword("").is_active());
    }

    #[test]
    fn single_ascii_letter_uses_substring() {
        assert!(matches!(
            KeywordPlan::from_keyword("a"),
            KeywordPlan::Substring { .. }
        ));
    }

    #[test]
    fn han_keyword_uses_substring() {
        let plan = KeywordPlan::from_keyword("复仇者联盟");
        assert_eq!(
            plan,
            KeywordPlan::Substring {
                keyword: "复仇者联盟".to_string(),
                pattern: "%复仇者联盟%".to_string(),
            }
        );
    }

    #[test]
    fn long_ascii_keyword_uses_tokens() {
        let plan = KeywordPlan::from_keyword("  avengers ");
        assert_eq!(
            plan,
            KeywordPlan::Token {
                keyword: "avengers".to_string(),
                pattern: "%avengers%".to_string(),
                tsquery: TsQuery::Prefix("avengers:*".to_string()),
            }
        );
    }

    #[test]
    fn all_short_ascii_tokens_use_substring() {
        assert!(is_short_ascii_query("x y zz"));
        assert!(!is_short_ascii_query("x y zzz"));
    }

    #[test]
    fn non_ascii_non_han_uses_tokens() {
        assert!(!uses_substring_mode("été"));
        assert!(matches!(
            KeywordPlan::from_keyword("amélie"),
            KeywordPlan::Token { .. }
        ));
    }

    // -- tsquery -------------------------------------------------------------

    #[test]
    fn tsquery_drops_stop_words_and_short_tokens() {
        assert_eq!(
            build_prefix_tsquery("Lord of the Rings 2"),
            TsQuery::Prefix("lord:* & rings:*".to_string())
        );
    }

    #[test]
    fn tsquery_strips_punctuation() {
        assert_eq!(
            build_prefix_tsquery("spider-man: homecoming!"),
            TsQuery::Prefix("spider:* & man:* & homecoming:*".to_string())
        );
    }

    #[test]
    fn tsquery_falls_back_to_raw_keyword() {
        let q = build_prefix_tsquery(" to be ");
        assert_eq!(q, TsQuery::Plain("to be".to_string()));
        assert_eq!(q.sql_function(), "plainto_tsquery");
    }

    #[test]
    fn prefix_query_uses_to_tsquery() {
        let q = build_prefix_tsquery("matrix");
        assert_eq!(q.sql_function(), "to_tsquery");
        assert_eq!(q.text(), "matrix:*");
    }

    // -- like pattern --------------------------------------------------------

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%_off"), r"%100\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    // -- id list -------------------------------------------------------------

    #[test]
    fn id_list_accepts_quotes_and_spaces() {
        assert_eq!(parse_id_list("\"5, 7\"").unwrap(), vec![5, 7]);
        assert_eq!(parse_id_list("'5','7',").unwrap(), vec![5, 7]);
        assert_eq!(parse_id_list("12").unwrap(), vec![12]);
    }

    #[test]
    fn id_list_dedups_and_allows_empty() {
        assert_eq!(parse_id_list("3,3,4").unwrap(), vec![3, 4]);
        assert!(parse_id_list("").unwrap().is_empty());
    }

    #[test]
    fn id_list_rejects_garbage() {
        assert!(matches!(
            parse_id_list("5,abc"),
            Err(CoreError::Validation(_))
        ));
    }

    // -- pagination ----------------------------------------------------------

    #[test]
    fn second_page_offsets_by_page_size() {
        let p = Pagination::resolve(Some(2), Some(10), None);
        assert_eq!(
            p,
            Pagination {
                limit: 10,
                offset: 10,
                cursor: None
            }
        );
    }

    #[test]
    fn cursor_mode_ignores_offset() {
        let p = Pagination::resolve(Some(3), Some(10), Some(42));
        assert_eq!(p.offset, 0);
        assert_eq!(p.cursor, Some(42));
    }

    #[test]
    fn zero_cursor_means_offset_mode() {
        let p = Pagination::resolve(Some(1), Some(10), Some(0));
        assert_eq!(p.cursor, None);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn page_size_and_page_are_clamped() {
        let p = Pagination::resolve(Some(0), Some(10_000), None);
        assert_eq!(p.limit, MAX_PAGE_SIZE);
        assert_eq!(p.offset, 0);

        let p = Pagination::resolve(None, Some(-5), None);
        assert_eq!(p.limit, 1);

        let p = Pagination::resolve(None, None, None);
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let p = Pagination::resolve(Some(i64::MAX), Some(20), None);
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, i64::MAX);
        assert_eq!(p.cursor, None);
    }
}
