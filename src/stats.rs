use crate::config::{RECENT_YEAR_THRESHOLD, TOP_AUTHORS_LIMIT};
use crate::models::{Counts, Publication, PublicationStats, YearSpan};
use std::collections::BTreeMap;

/// Statistics snapshot over the whole listing.
pub fn compute_statistics(publications: &[Publication]) -> PublicationStats {
    let mut publication_types = Counts::new();
    let mut author_counts = Counts::new();
    let mut recent_years = BTreeMap::new();
    let mut span = YearSpan::default();

    for p in publications {
        publication_types.increment(&p.publication_type);
        author_counts.increment(&p.author);
        span.observe(p.year);
        if p.year >= RECENT_YEAR_THRESHOLD {
            *recent_years.entry(p.year).or_insert(0) += 1;
        }
    }

    let unique_authors = author_counts.len();

    PublicationStats {
        total_publications: publications.len(),
        unique_authors,
        publication_types,
        year_range: span.finish(),
        top_authors: top_authors(author_counts, TOP_AUTHORS_LIMIT),
        recent_years,
    }
}

/// Highest counts first. The sort is stable, so ties keep first-seen order.
fn top_authors(counts: Counts, limit: usize) -> Counts {
    let mut entries = counts.into_entries();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries.into_iter().collect()
}
