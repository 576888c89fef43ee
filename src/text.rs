use regex::Regex;

/// Escapes every regex metacharacter in `term` so it matches literally.
pub fn escape_term(term: &str) -> String {
    regex::escape(term)
}

/// Lowercases and trims a search term.
pub fn normalize_term(term: &str) -> String {
    term.to_lowercase().trim().to_string()
}

pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive match of a term bounded by word boundaries on both sides.
#[derive(Debug, Clone)]
pub struct WholeWordMatcher {
    pattern: Regex,
}

impl WholeWordMatcher {
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", escape_term(term)))?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_metacharacters() {
        assert_eq!(escape_term("a.b"), r"a\.b");
        assert_eq!(escape_term("c++"), r"c\+\+");
        assert_eq!(escape_term("(x|y)"), r"\(x\|y\)");
        assert_eq!(escape_term("[1-9]*?"), r"\[1\-9\]\*\?");
        assert_eq!(escape_term(r"^$\{}"), r"\^\$\\\{\}");
    }

    #[test]
    fn escape_leaves_plain_text() {
        assert_eq!(escape_term("state of the art"), "state of the art");
        assert_eq!(escape_term("educação"), "educação");
    }

    #[test]
    fn escaped_terms_always_compile() {
        for term in ["(", "[", "*", "\\", "a{2,", "?+", "|"] {
            assert!(WholeWordMatcher::new(term).is_ok(), "failed on {term}");
        }
    }

    #[test]
    fn whole_word_respects_boundaries() {
        let m = WholeWordMatcher::new("art").unwrap();
        assert!(!m.is_match("A review article"));
        assert!(m.is_match("state of the art review"));
        assert!(m.is_match("ART and science"));
        assert!(m.is_match("art."));
    }

    #[test]
    fn whole_word_handles_accents() {
        let m = WholeWordMatcher::new("educação").unwrap();
        assert!(m.is_match("Inteligência Artificial na Educação"));
        assert!(!m.is_match("Reeducação física"));
    }

    #[test]
    fn metacharacters_match_literally() {
        let m = WholeWordMatcher::new("c.b").unwrap();
        assert!(m.is_match("the c.b method"));
        assert!(!m.is_match("the cab method"));
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_term("  Silva "), "silva");
        assert_eq!(normalize_term(""), "");
    }

    #[test]
    fn folded_containment() {
        assert!(contains_folded("João Silva", "silva"));
        assert!(contains_folded("João Silva", "JOÃO"));
        assert!(!contains_folded("João Silva", "costa"));
    }
}
