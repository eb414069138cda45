//! Category label parsing for the two-level category tree.
//!
//! Incoming videos describe their categories as dimension groups (for example
//! `地区` with raw labels like `"中国香港/美国"`). This module turns those raw
//! labels into clean leaf names. The repository layer then upserts the leaves
//! under their dimension node.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::text::contains_han;

/// Dimension name for genre/type labels.
pub const DIMENSION_TYPE: &str = "类型";

/// Dimension name for release year labels.
pub const DIMENSION_YEAR: &str = "年代";

/// Dimension name for region labels.
pub const DIMENSION_REGION: &str = "地区";

/// Dimension name for cast labels.
pub const DIMENSION_ACTOR: &str = "演员";

/// Delimiters tried in order; the first one present in a label wins.
pub const LABEL_DELIMITERS: &[char] = &[
    ',', '/', '、', '，', '.', ':', '：', ';', '；', '\\',
];

/// Known region aliases collapsed to a canonical label.
const REGION_ALIASES: &[(&str, &str)] = &[
    ("中国香港", "香港"),
    ("国香港", "香港"),
    ("中国大陆中国香港", "香港"),
    ("香港地区", "香港"),
    ("中国台湾", "台湾"),
    ("中国大陆中国台湾", "台湾"),
];

/// Required length (in characters) of a year label.
const YEAR_LABEL_LEN: usize = 4;

/// Dimension-specific splitting and filtering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Type,
    Year,
    Region,
    Actor,
    Other,
}

impl Dimension {
    /// Classify a dimension node by its exact name.
    pub fn from_name(name: &str) -> Self {
        match name {
            DIMENSION_TYPE => Self::Type,
            DIMENSION_YEAR => Self::Year,
            DIMENSION_REGION => Self::Region,
            DIMENSION_ACTOR => Self::Actor,
            _ => Self::Other,
        }
    }

    /// Only type leaves carry the denormalized `type_id` / `type_pid` of the video class.
    pub fn stamps_class(self) -> bool {
        matches!(self, Self::Type)
    }
}

/// What to do when a single leaf upsert fails while building the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaxonomyPolicy {
    /// Abort the whole build and roll back.
    #[default]
    FailFast,
    /// Log the failure, skip the label and keep going.
    BestEffort,
}

impl FromStr for TaxonomyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_fast" | "fail-fast" | "strict" => Ok(Self::FailFast),
            "best_effort" | "best-effort" | "lenient" => Ok(Self::BestEffort),
            other => Err(format!("unknown taxonomy policy '{other}'")),
        }
    }
}

impl fmt::Display for TaxonomyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail_fast"),
            Self::BestEffort => f.write_str("best_effort"),
        }
    }
}

/// Split one raw label into pieces (untrimmed, possibly empty).
///
/// # Examples
///
/// ```
/// use vcat_core::taxonomy::{split_label, Dimension};
///
/// assert_eq!(split_label(Dimension::Type, "动作,喜剧"), vec!["动作", "喜剧"]);
/// assert_eq!(split_label(Dimension::Region, "美国 英国"), vec!["美国", "英国"]);
/// ```
pub fn split_label(dimension: Dimension, raw: &str) -> Vec<&str> {
    for delimiter in LABEL_DELIMITERS {
        if raw.contains(*delimiter) {
            return raw.split(*delimiter).collect();
        }
    }

    let split_on_whitespace = match dimension {
        Dimension::Region => true,
        Dimension::Actor => contains_han(raw),
        _ => false,
    };

    if split_on_whitespace {
        raw.split(char::is_whitespace).collect()
    } else {
        vec![raw]
    }
}

/// Map a region label to its canonical spelling.
pub fn normalize_region(name: &str) -> &str {
    REGION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Trim and filter one split piece. Returns `None` when it must be dropped.
fn clean_token(dimension: Dimension, piece: &str) -> Option<String> {
    let token = piece.trim();
    if token.is_empty() {
        return None;
    }

    match dimension {
        Dimension::Year if token.chars().count() != YEAR_LABEL_LEN => None,
        Dimension::Region => Some(normalize_region(token).to_string()),
        _ => Some(token.to_string()),
    }
}

/// Trim and filter split pieces, dropping duplicates while keeping
/// first-seen order.
///
/// # Examples
///
/// ```
/// use vcat_core::taxonomy::{normalize_tokens, Dimension};
///
/// assert_eq!(normalize_tokens(Dimension::Year, &["2019", " 90s ", "2019"]), vec!["2019"]);
/// assert_eq!(normalize_tokens(Dimension::Region, &["中国台湾"]), vec!["台湾"]);
/// ```
pub fn normalize_tokens(dimension: Dimension, pieces: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    pieces
        .iter()
        .filter_map(|piece| clean_token(dimension, piece))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Turn all raw labels of one dimension group into leaf names.
///
/// Splits each label, then normalizes the pieces of the whole group
/// together so a leaf appears at most once.
pub fn labels_to_tokens<S: AsRef<str>>(dimension: Dimension, raw_labels: &[S]) -> Vec<String> {
    let pieces: Vec<&str> = raw_labels
        .iter()
        .flat_map(|raw| split_label(dimension, raw.as_ref()))
        .collect();
    normalize_tokens(dimension, &pieces)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- split_label ---------------------------------------------------------

    #[test]
    fn comma_split_yields_two_tokens() {
        assert_eq!(
            labels_to_tokens(Dimension::Type, &["动作,喜剧"]),
            vec!["动作", "喜剧"]
        );
    }

    #[test]
    fn first_present_delimiter_wins() {
        // Comma beats slash, so the slash stays inside the token.
        assert_eq!(
            split_label(Dimension::Other, "a/b,c"),
            vec!["a/b", "c"]
        );
    }

    #[test]
    fn full_width_delimiters_split() {
        assert_eq!(split_label(Dimension::Other, "剧情，爱情"), vec!["剧情", "爱情"]);
        assert_eq!(split_label(Dimension::Other, "剧情、爱情"), vec!["剧情", "爱情"]);
        assert_eq!(split_label(Dimension::Other, "剧情；爱情"), vec!["剧情", "爱情"]);
        assert_eq!(split_label(Dimension::Other, "剧情：爱情"), vec!["剧情", "爱情"]);
        assert_eq!(split_label(Dimension::Other, r"剧情\爱情"), vec!["剧情", "爱情"]);
    }

    #[test]
    fn no_delimiter_keeps_whole_string() {
        assert_eq!(split_label(Dimension::Type, "科幻 动作"), vec!["科幻 动作"]);
    }

    #[test]
    fn region_falls_back_to_whitespace() {
        assert_eq!(
            labels_to_tokens(Dimension::Region, &["美国  英国"]),
            vec!["美国", "英国"]
        );
    }

    #[test]
    fn actor_whitespace_split_requires_han() {
        assert_eq!(
            labels_to_tokens(Dimension::Actor, &["周星驰 吴孟达"]),
            vec!["周星驰", "吴孟达"]
        );
        assert_eq!(
            labels_to_tokens(Dimension::Actor, &["Tom Hanks"]),
            vec!["Tom Hanks"]
        );
    }

    // -- filters -------------------------------------------------------------

    #[test]
    fn year_keeps_four_character_tokens() {
        assert_eq!(labels_to_tokens(Dimension::Year, &["2005"]), vec!["2005"]);
    }

    #[test]
    fn year_discards_other_lengths() {
        assert!(labels_to_tokens(Dimension::Year, &["99"]).is_empty());
        assert_eq!(
            labels_to_tokens(Dimension::Year, &["1999,20001,05,2010"]),
            vec!["1999", "2010"]
        );
    }

    #[test]
    fn region_aliases_are_normalized() {
        assert_eq!(labels_to_tokens(Dimension::Region, &["中国香港"]), vec!["香港"]);
        assert_eq!(
            labels_to_tokens(Dimension::Region, &["中国台湾/中国大陆"]),
            vec!["台湾", "中国大陆"]
        );
    }

    #[test]
    fn region_normalization_only_applies_to_region() {
        assert_eq!(labels_to_tokens(Dimension::Other, &["中国香港"]), vec!["中国香港"]);
    }

    #[test]
    fn empty_and_blank_tokens_are_dropped() {
        assert_eq!(
            labels_to_tokens(Dimension::Type, &["动作, ,喜剧,", "   "]),
            vec!["动作", "喜剧"]
        );
    }

    #[test]
    fn duplicate_tokens_collapse_across_labels() {
        assert_eq!(
            labels_to_tokens(Dimension::Region, &["香港", "中国香港,美国"]),
            vec!["香港", "美国"]
        );
    }

    // -- Dimension / policy --------------------------------------------------

    #[test]
    fn dimension_from_name() {
        assert_eq!(Dimension::from_name("类型"), Dimension::Type);
        assert_eq!(Dimension::from_name("年代"), Dimension::Year);
        assert_eq!(Dimension::from_name("地区"), Dimension::Region);
        assert_eq!(Dimension::from_name("演员"), Dimension::Actor);
        assert_eq!(Dimension::from_name("导演"), Dimension::Other);
        assert!(Dimension::Type.stamps_class());
        assert!(!Dimension::Region.stamps_class());
    }

    #[test]
    fn policy_parses_known_values() {
        assert_eq!("fail_fast".parse::<TaxonomyPolicy>(), Ok(TaxonomyPolicy::FailFast));
        assert_eq!("Best-Effort".parse::<TaxonomyPolicy>(), Ok(TaxonomyPolicy::BestEffort));
        assert!("sometimes".parse::<TaxonomyPolicy>().is_err());
        assert_eq!(TaxonomyPolicy::default(), TaxonomyPolicy::FailFast);
    }
}
