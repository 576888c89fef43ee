use crate::group::{group_by_author, group_by_type, group_by_year};
use crate::models::{AuthorSummary, Keyed, Publication, PublicationStats, TypeSummary, YearSummary};
use crate::parser::parse_publications_with_report;
use crate::stats::compute_statistics;
use serde::Serialize;
use std::collections::BTreeMap;

/// A parsed listing with every derived view computed up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationCatalog {
    pub publications: Vec<Publication>,
    pub by_author: Keyed<AuthorSummary>,
    pub by_type: Keyed<TypeSummary>,
    pub by_year: BTreeMap<i32, YearSummary>,
    pub statistics: PublicationStats,
    /// Data lines dropped for having fewer than four fields
    pub skipped_lines: usize,
}

impl PublicationCatalog {
    pub fn from_csv(text: &str) -> Self {
        let report = parse_publications_with_report(text);
        let mut catalog = Self::from_publications(report.publications);
        catalog.skipped_lines = report.skipped_lines;
        catalog
    }

    pub fn from_publications(publications: Vec<Publication>) -> Self {
        Self {
            by_author: group_by_author(&publications),
            by_type: group_by_type(&publications),
            by_year: group_by_year(&publications),
            statistics: compute_statistics(&publications),
            publications,
            skipped_lines: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.publications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }
}
