//! Single-pass grouping of a listing by author, type, and year.

use crate::models::{AuthorSummary, Counts, Keyed, Publication, TypeSummary, YearSpan, YearSummary};
use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, BTreeSet};

/// Authors hold their years in a set until the pass is over.
struct AuthorAcc {
    summary: AuthorSummary,
    years: BTreeSet<i32>,
}

struct TypeAcc {
    summary: TypeSummary,
    seen_authors: FxHashSet<String>,
    span: YearSpan,
}

struct YearAcc {
    summary: YearSummary,
    seen_authors: FxHashSet<String>,
}

/// Groups by exact (case-sensitive) author name, in first-seen order.
pub fn group_by_author(publications: &[Publication]) -> Keyed<AuthorSummary> {
    let mut groups: Keyed<AuthorAcc> = Keyed::new();

    for p in publications {
        let acc = groups.get_or_insert_with(&p.author, || AuthorAcc {
            summary: AuthorSummary {
                name: p.author.clone(),
                publications: Vec::new(),
                total_publications: 0,
                publications_by_type: Counts::new(),
                publications_by_year: BTreeMap::new(),
                years_active: Vec::new(),
            },
            years: BTreeSet::new(),
        });

        let s = &mut acc.summary;
        s.publications.push(p.clone());
        s.total_publications += 1;
        s.publications_by_type.increment(&p.publication_type);
        *s.publications_by_year.entry(p.year).or_insert(0) += 1;
        acc.years.insert(p.year);
    }

    groups
        .into_entries()
        .into_iter()
        .map(|(name, mut acc)| {
            acc.summary.years_active = acc.years.into_iter().collect();
            (name, acc.summary)
        })
        .collect()
}

pub fn group_by_type(publications: &[Publication]) -> Keyed<TypeSummary> {
    let mut groups: Keyed<TypeAcc> = Keyed::new();

    for p in publications {
        let acc = groups.get_or_insert_with(&p.publication_type, || TypeAcc {
            summary: TypeSummary {
                publication_type: p.publication_type.clone(),
                publications: Vec::new(),
                total_count: 0,
                authors: Vec::new(),
                year_range: Default::default(),
            },
            seen_authors: FxHashSet::default(),
            span: YearSpan::default(),
        });

        acc.summary.publications.push(p.clone());
        acc.summary.total_count += 1;
        if acc.seen_authors.insert(p.author.clone()) {
            acc.summary.authors.push(p.author.clone());
        }
        acc.span.observe(p.year);
    }

    groups
        .into_entries()
        .into_iter()
        .map(|(key, mut acc)| {
            acc.summary.year_range = acc.span.finish();
            (key, acc.summary)
        })
        .collect()
}

/// Groups by year, ascending. Unknown years land under `0`.
pub fn group_by_year(publications: &[Publication]) -> BTreeMap<i32, YearSummary> {
    let mut groups: BTreeMap<i32, YearAcc> = BTreeMap::new();

    for p in publications {
        let acc = groups.entry(p.year).or_insert_with(|| YearAcc {
            summary: YearSummary {
                year: p.year,
                publications: Vec::new(),
                total_count: 0,
                authors: Vec::new(),
                publication_types: Counts::new(),
            },
            seen_authors: FxHashSet::default(),
        });

        acc.summary.publications.push(p.clone());
        acc.summary.total_count += 1;
        if acc.seen_authors.insert(p.author.clone()) {
            acc.summary.authors.push(p.author.clone());
        }
        acc.summary.publication_types.increment(&p.publication_type);
    }

    groups
        .into_iter()
        .map(|(year, acc)| (year, acc.summary))
        .collect()
}
