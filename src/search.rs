//! Filtering and search over a parsed listing.
//!
//! Every filter returns a fresh vector that keeps the input's relative order.
//! An empty string criterion is the same as an absent one.

use crate::models::{Publication, YearRange};
use crate::text::{contains_folded, normalize_term, WholeWordMatcher};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Optional constraints for [`search`], combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Exact type label
    pub publication_type: Option<String>,
    /// Exact year; `0` imposes no constraint
    pub year: Option<i32>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    pub year_range: Option<YearRange>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn publication_type(mut self, publication_type: impl Into<String>) -> Self {
        self.publication_type = Some(publication_type.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn year_range(mut self, min: i32, max: i32) -> Self {
        self.year_range = Some(YearRange::new(min, max));
        self
    }

    fn matches(&self, p: &Publication) -> bool {
        if let Some(author) = non_empty(&self.author) {
            if !contains_folded(&p.author, author) {
                return false;
            }
        }
        if let Some(t) = non_empty(&self.publication_type) {
            if p.publication_type != t {
                return false;
            }
        }
        if let Some(year) = self.year.filter(|&y| y != 0) {
            if p.year != year {
                return false;
            }
        }
        if let Some(title) = non_empty(&self.title) {
            if !contains_folded(&p.title, title) {
                return false;
            }
        }
        if let Some(range) = self.year_range {
            if !range.contains(p.year) {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub fn search(publications: &[Publication], criteria: &SearchCriteria) -> Vec<Publication> {
    publications
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitleFilterOptions {
    /// Author must equal the trimmed, lowercased search name
    pub exact_author_match: bool,
    /// Title must equal the trimmed, lowercased term; wins over `whole_words`
    pub exact_title_match: bool,
    /// Term must appear as a whole word in the title
    pub whole_words: bool,
}

impl TitleFilterOptions {
    pub fn exact_author_match(mut self, yes: bool) -> Self {
        self.exact_author_match = yes;
        self
    }

    pub fn exact_title_match(mut self, yes: bool) -> Self {
        self.exact_title_match = yes;
        self
    }

    pub fn whole_words(mut self, yes: bool) -> Self {
        self.whole_words = yes;
        self
    }
}

enum TitleRule {
    Any,
    Exact(String),
    WholeWord(WholeWordMatcher),
    Contains(String),
}

impl TitleRule {
    fn build(term: &str, options: &TitleFilterOptions) -> Self {
        if term.is_empty() {
            return TitleRule::Any;
        }
        let normalized = normalize_term(term);
        if options.exact_title_match {
            return TitleRule::Exact(normalized);
        }
        if options.whole_words {
            match WholeWordMatcher::new(&normalized) {
                Ok(m) => return TitleRule::WholeWord(m),
                Err(e) => {
                    warn!(term = %normalized, error = %e, "Whole-word pattern rejected, using substring match");
                }
            }
        }
        TitleRule::Contains(normalized)
    }

    fn matches(&self, title: &str) -> bool {
        match self {
            TitleRule::Any => true,
            TitleRule::Exact(term) => title.to_lowercase() == *term,
            TitleRule::WholeWord(m) => m.is_match(title),
            TitleRule::Contains(term) => title.to_lowercase().contains(term.as_str()),
        }
    }
}

/// Records whose author matches `author_name` and whose title matches `title_term`.
///
/// With both terms empty the input comes back unchanged.
pub fn filter_by_author_and_title(
    publications: &[Publication],
    author_name: &str,
    title_term: &str,
    options: &TitleFilterOptions,
) -> Vec<Publication> {
    if author_name.is_empty() && title_term.is_empty() {
        return publications.to_vec();
    }

    let author = (!author_name.is_empty()).then(|| normalize_term(author_name));
    let title_rule = TitleRule::build(title_term, options);

    publications
        .iter()
        .filter(|p| {
            let author_ok = match &author {
                None => true,
                Some(wanted) => {
                    let got = p.author.to_lowercase();
                    if options.exact_author_match {
                        got == *wanted
                    } else {
                        got.contains(wanted.as_str())
                    }
                }
            };
            author_ok && title_rule.matches(&p.title)
        })
        .cloned()
        .collect()
}

/// How the entries of a name or term list combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchLogic {
    /// Every entry must match
    And,
    /// At least one entry must match
    #[default]
    Or,
}

impl MatchLogic {
    fn combine<'a>(self, mut items: impl Iterator<Item = &'a String>, haystack: &str) -> bool {
        match self {
            MatchLogic::And => items.all(|item| haystack.contains(item.as_str())),
            MatchLogic::Or => items.any(|item| haystack.contains(item.as_str())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown match logic '{0}', expected AND or OR")]
pub struct ParseLogicError(pub String);

impl FromStr for MatchLogic {
    type Err = ParseLogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(MatchLogic::And),
            "OR" => Ok(MatchLogic::Or),
            _ => Err(ParseLogicError(s.to_string())),
        }
    }
}

impl fmt::Display for MatchLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchLogic::And => f.write_str("AND"),
            MatchLogic::Or => f.write_str("OR"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiFilterOptions {
    pub author_logic: MatchLogic,
    pub title_logic: MatchLogic,
    pub case_sensitive: bool,
}

impl MultiFilterOptions {
    pub fn author_logic(mut self, logic: MatchLogic) -> Self {
        self.author_logic = logic;
        self
    }

    pub fn title_logic(mut self, logic: MatchLogic) -> Self {
        self.title_logic = logic;
        self
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }
}

/// Substring filter over several author names and title terms.
///
/// An empty list does not constrain its field; with both empty the input
/// comes back unchanged.
pub fn filter_by_multiple_authors_and_terms<S: AsRef<str>>(
    publications: &[Publication],
    author_names: &[S],
    title_terms: &[S],
    options: &MultiFilterOptions,
) -> Vec<Publication> {
    if author_names.is_empty() && title_terms.is_empty() {
        return publications.to_vec();
    }

    let fold = |s: &str| {
        if options.case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    };
    let authors: Vec<String> = author_names.iter().map(|s| fold(s.as_ref())).collect();
    let terms: Vec<String> = title_terms.iter().map(|s| fold(s.as_ref())).collect();

    publications
        .iter()
        .filter(|p| {
            let author_ok =
                authors.is_empty() || options.author_logic.combine(authors.iter(), &fold(&p.author));
            let title_ok =
                terms.is_empty() || options.title_logic.combine(terms.iter(), &fold(&p.title));
            author_ok && title_ok
        })
        .cloned()
        .collect()
}

/// Result of [`author_publications`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPublications {
    pub author: String,
    /// Author matches narrowed by the title filter
    pub publications: Vec<Publication>,
    pub filtered_count: usize,
    /// Author matches before the title filter
    pub total_count: usize,
    /// `None` when no title filter was applied
    pub title_filter: Option<String>,
}

impl AuthorPublications {
    fn empty() -> Self {
        Self {
            author: String::new(),
            publications: Vec::new(),
            filtered_count: 0,
            total_count: 0,
            title_filter: None,
        }
    }
}

/// Publications whose author contains `author_name`, optionally narrowed by a
/// title substring.
pub fn author_publications(
    publications: &[Publication],
    author_name: &str,
    title_filter: &str,
) -> AuthorPublications {
    if author_name.is_empty() {
        return AuthorPublications::empty();
    }

    let by_author: Vec<&Publication> = publications
        .iter()
        .filter(|p| contains_folded(&p.author, author_name))
        .collect();
    let total_count = by_author.len();

    let filtered: Vec<Publication> = by_author
        .into_iter()
        .filter(|p| title_filter.is_empty() || contains_folded(&p.title, title_filter))
        .cloned()
        .collect();

    AuthorPublications {
        author: author_name.to_string(),
        filtered_count: filtered.len(),
        publications: filtered,
        total_count,
        title_filter: (!title_filter.is_empty()).then(|| title_filter.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Publication> {
        vec![
            Publication::new("artigo", "João Silva", 2023, "Inteligência Artificial na Educação"),
            Publication::new("congresso", "Maria Santos", 2022, "Sustentabilidade em Projetos"),
            Publication::new("artigo", "Pedro Costa", 2021, "A review article on sensors"),
            Publication::new("artigo", "Ana Silva Costa", 2020, "State of the art review"),
            Publication::new("livro", "João Silva", 2018, "Tecnologia e Inovação"),
            Publication::new("artigo", "Maria Santos", 0, "Educação Ambiental"),
        ]
    }

    fn titles(pubs: &[Publication]) -> Vec<&str> {
        pubs.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn search_without_criteria_returns_everything() {
        let pubs = catalog();
        assert_eq!(search(&pubs, &SearchCriteria::new()), pubs);
    }

    #[test]
    fn search_author_and_range() {
        let pubs = catalog();
        let found = search(&pubs, &SearchCriteria::new().author("joão").year_range(2020, 2023));
        assert_eq!(titles(&found), vec!["Inteligência Artificial na Educação"]);
    }

    #[test]
    fn search_type_is_exact() {
        let pubs = catalog();
        assert_eq!(search(&pubs, &SearchCriteria::new().publication_type("artigo")).len(), 4);
        assert!(search(&pubs, &SearchCriteria::new().publication_type("Artigo")).is_empty());
    }

    #[test]
    fn search_year_and_title() {
        let pubs = catalog();
        let found = search(&pubs, &SearchCriteria::new().year(2022).title("PROJETOS"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].author, "Maria Santos");
        assert!(search(&pubs, &SearchCriteria::new().year(2022).title("sensors")).is_empty());
    }

    #[test]
    fn search_treats_empty_and_zero_as_absent() {
        let pubs = catalog();
        let criteria = SearchCriteria::new().author("").title("").publication_type("").year(0);
        assert_eq!(search(&pubs, &criteria).len(), pubs.len());
    }

    #[test]
    fn search_range_can_select_unknown_years() {
        let pubs = catalog();
        let found = search(&pubs, &SearchCriteria::new().year_range(0, 0));
        assert_eq!(titles(&found), vec!["Educação Ambiental"]);
    }

    #[test]
    fn author_and_title_both_empty_is_identity() {
        let pubs = catalog();
        let out = filter_by_author_and_title(&pubs, "", "", &TitleFilterOptions::default());
        assert_eq!(out, pubs);
    }

    #[test]
    fn author_substring_is_case_insensitive() {
        let pubs = catalog();
        let out = filter_by_author_and_title(&pubs, "  SILVA ", "", &TitleFilterOptions::default());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn exact_author_match_requires_full_name() {
        let pubs = catalog();
        let opts = TitleFilterOptions::default().exact_author_match(true);
        assert!(filter_by_author_and_title(&pubs, "silva", "", &opts).is_empty());
        assert_eq!(filter_by_author_and_title(&pubs, " joão silva ", "", &opts).len(), 2);
    }

    #[test]
    fn whole_words_rejects_partial_words() {
        let pubs = catalog();
        let opts = TitleFilterOptions::default().whole_words(true);
        let out = filter_by_author_and_title(&pubs, "", "art", &opts);
        assert_eq!(titles(&out), vec!["State of the art review"]);

        let loose = filter_by_author_and_title(&pubs, "", "art", &TitleFilterOptions::default());
        assert_eq!(loose.len(), 3);
    }

    #[test]
    fn exact_title_wins_over_whole_words() {
        let pubs = catalog();
        let opts = TitleFilterOptions::default()
            .exact_title_match(true)
            .whole_words(true);
        assert!(filter_by_author_and_title(&pubs, "", "review", &opts).is_empty());
        let out = filter_by_author_and_title(&pubs, "", "state of the ART review ", &opts);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn author_and_title_combine_with_and() {
        let pubs = catalog();
        let out = filter_by_author_and_title(&pubs, "Silva", "educação", &TitleFilterOptions::default());
        assert_eq!(titles(&out), vec!["Inteligência Artificial na Educação"]);
    }

    #[test]
    fn whole_word_metacharacters_do_not_error() {
        let pubs = vec![Publication::new("a", "X", 2020, "Notes on C++ (revised)")];
        let opts = TitleFilterOptions::default().whole_words(true);
        assert_eq!(filter_by_author_and_title(&pubs, "", "(revised)", &opts).len(), 0);
        assert_eq!(filter_by_author_and_title(&pubs, "", "notes on c", &opts).len(), 1);
        assert!(filter_by_author_and_title(&pubs, "", "[", &opts).is_empty());
    }

    #[test]
    fn multiple_empty_lists_is_identity() {
        let pubs = catalog();
        let none: [&str; 0] = [];
        let out = filter_by_multiple_authors_and_terms(&pubs, &none, &none, &MultiFilterOptions::default());
        assert_eq!(out, pubs);
    }

    #[test]
    fn multiple_authors_or() {
        let pubs = catalog();
        let out = filter_by_multiple_authors_and_terms(
            &pubs,
            &["Santos", "costa"],
            &[],
            &MultiFilterOptions::default(),
        );
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn multiple_authors_and_needs_every_name() {
        let pubs = catalog();
        let opts = MultiFilterOptions::default().author_logic(MatchLogic::And);
        let out = filter_by_multiple_authors_and_terms(&pubs, &["Silva", "Costa"], &[], &opts);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].author, "Ana Silva Costa");
    }

    #[test]
    fn title_terms_and() {
        let pubs = catalog();
        let opts = MultiFilterOptions::default().title_logic(MatchLogic::And);
        let out = filter_by_multiple_authors_and_terms(&pubs, &["joão"], &["inteligência", "educação"], &opts);
        assert_eq!(out.len(), 1);

        let out = filter_by_multiple_authors_and_terms(&pubs, &["joão"], &["inteligência", "inovação"], &opts);
        assert!(out.is_empty());
    }

    #[test]
    fn case_sensitive_terms() {
        let pubs = catalog();
        let opts = MultiFilterOptions::default().case_sensitive(true);
        let empty: [&str; 0] = [];
        assert_eq!(filter_by_multiple_authors_and_terms(&pubs, &empty, &["Ambiental"], &opts).len(), 1);
        assert!(filter_by_multiple_authors_and_terms(&pubs, &empty, &["ambiental"], &opts).is_empty());
        assert!(filter_by_multiple_authors_and_terms(&pubs, &["silva"], &empty, &opts).is_empty());
    }

    #[test]
    fn match_logic_parses() {
        assert_eq!("AND".parse::<MatchLogic>(), Ok(MatchLogic::And));
        assert_eq!(" or ".parse::<MatchLogic>(), Ok(MatchLogic::Or));
        assert!("XOR".parse::<MatchLogic>().is_err());
        assert_eq!(MatchLogic::default(), MatchLogic::Or);
    }

    #[test]
    fn author_publications_with_title_filter() {
        let pubs = catalog();
        let res = author_publications(&pubs, "joão silva", "inteligência");
        assert_eq!(res.author, "joão silva");
        assert_eq!(res.total_count, 2);
        assert_eq!(res.filtered_count, 1);
        assert_eq!(res.publications.len(), 1);
        assert_eq!(res.title_filter.as_deref(), Some("inteligência"));
    }

    #[test]
    fn author_publications_without_title_filter() {
        let pubs = catalog();
        let res = author_publications(&pubs, "Santos", "");
        assert_eq!(res.total_count, 2);
        assert_eq!(res.filtered_count, 2);
        assert_eq!(res.title_filter, None);
    }

    #[test]
    fn author_publications_empty_name_short_circuits() {
        let res = author_publications(&catalog(), "", "anything");
        assert_eq!(res.author, "");
        assert!(res.publications.is_empty());
        assert_eq!(res.filtered_count, 0);
        assert_eq!(res.total_count, 0);
    }
}
