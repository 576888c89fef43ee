//! Collaboration network: authors are nodes, and two authors are linked when
//! both list the same title.

use crate::graph::{
    create_edges, create_nodes, EdgeOptions, EdgeSpec, GraphError, GraphSink, NodeOptions,
    NodeSpec,
};
use crate::models::{Keyed, Publication};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::debug;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    pub source: String,
    pub target: String,
    pub shared_titles: usize,
}

#[derive(Debug, Clone)]
pub struct NetworkOptions {
    /// Applied to every author node
    pub node: NodeOptions,
    /// Applied to every edge; the weight is replaced by the shared title count
    pub edge: EdgeOptions,
    /// Pairs sharing fewer titles than this are left out
    pub min_shared: usize,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            node: NodeOptions::default(),
            edge: EdgeOptions::default(),
            min_shared: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub authors: usize,
    pub collaborations: usize,
}

/// Title key used to spot the same work listed under different authors.
pub fn title_key(title: &str) -> String {
    WHITESPACE.replace_all(title.trim(), " ").to_lowercase()
}

/// Author pairs that share at least one title, in the order each pair was first seen.
/// `source` is always the author who appeared first in the listing.
pub fn collaborations(publications: &[Publication]) -> Vec<Collaboration> {
    let mut author_order: FxHashMap<&str, usize> = FxHashMap::default();
    let mut by_title: Keyed<Vec<&str>> = Keyed::new();

    for p in publications {
        let next = author_order.len();
        author_order.entry(p.author.as_str()).or_insert(next);

        let authors = by_title.get_or_insert_with(&title_key(&p.title), Vec::new);
        if !authors.contains(&p.author.as_str()) {
            authors.push(p.author.as_str());
        }
    }

    let mut pairs: Vec<Collaboration> = Vec::new();
    let mut pair_index: FxHashMap<(&str, &str), usize> = FxHashMap::default();

    for authors in by_title.values() {
        for (i, a) in authors.iter().enumerate() {
            for b in &authors[i + 1..] {
                let (first, second) = if author_order[a] <= author_order[b] {
                    (*a, *b)
                } else {
                    (*b, *a)
                };
                match pair_index.get(&(first, second)) {
                    Some(&idx) => pairs[idx].shared_titles += 1,
                    None => {
                        pair_index.insert((first, second), pairs.len());
                        pairs.push(Collaboration {
                            source: first.to_string(),
                            target: second.to_string(),
                            shared_titles: 1,
                        });
                    }
                }
            }
        }
    }

    pairs
}

/// Feeds one node per distinct author and one edge per collaboration into `graph`.
pub fn build_network<G: GraphSink + ?Sized>(
    graph: &mut G,
    publications: &[Publication],
    options: &NetworkOptions,
) -> Result<NetworkSummary, GraphError> {
    let mut authors: Vec<&str> = Vec::new();
    let mut seen = FxHashSet::default();
    for p in publications {
        if seen.insert(p.author.as_str()) {
            authors.push(p.author.as_str());
        }
    }

    let nodes: Vec<NodeSpec> = authors
        .iter()
        .map(|name| NodeSpec::configured(*name, options.node.clone()))
        .collect();
    create_nodes(graph, &nodes)?;

    let edges: Vec<EdgeSpec> = collaborations(publications)
        .into_iter()
        .filter(|c| c.shared_titles >= options.min_shared)
        .map(|c| {
            EdgeSpec::new(c.source, c.target)
                .with_options(options.edge.clone().weight(c.shared_titles as f64))
        })
        .collect();
    create_edges(graph, &edges)?;

    debug!(authors = nodes.len(), edges = edges.len(), "Collaboration network built");

    Ok(NetworkSummary {
        authors: nodes.len(),
        collaborations: edges.len(),
    })
}
