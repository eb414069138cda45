//! Script detection shared by the taxonomy builder and the search planner.

use std::sync::LazyLock;

use regex::Regex;

static HAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Han}").expect("valid regex"));

/// Whether the string contains at least one Han (CJK ideograph) character.
pub fn contains_han(s: &str) -> bool {
    HAN_RE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn han_detected_in_mixed_text() {
        assert!(contains_han("复仇者联盟"));
        assert!(contains_han("Avengers 复仇者"));
    }

    #[test]
    fn latin_and_punctuation_are_not_han() {
        assert!(!contains_han("avengers"));
        assert!(!contains_han("Café, 2005 / déjà-vu"));
        assert!(!contains_han(""));
    }

    #[test]
    fn full_width_punctuation_is_not_han() {
        assert!(!contains_han("，：；、"));
    }
}
