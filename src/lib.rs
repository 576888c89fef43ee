//! pubgraph: publication listings to queryable catalogs and collaboration graphs
//!
//! This crate reads the pipe-delimited `Type|Author|Year|Title` listings used by
//! research group pages, and provides two independent toolkits on top:
//!
//! 1. **Catalog** -- Parse the listing into [`models::Publication`] records, group
//!    them by author, type and year, compute a statistics snapshot, and filter
//!    them with combinable author/title criteria
//! 2. **Graph** -- Create styled nodes and edges on any [`graph::GraphSink`], with
//!    an in-memory sink, a CSV sink, and a collaboration network builder
//!
//! # Key Modules
//!
//! - [`parser`] -- Listing parser with a skipped-line report
//! - [`group`] -- Author, type and year aggregates
//! - [`stats`] -- Statistics snapshot (totals, year range, top authors)
//! - [`search`] -- Criteria search and author/title filters
//! - [`text`] -- Term escaping and whole-word matching
//! - [`graph`] -- Node/edge defaults, validation, and the in-memory graph
//! - [`export`] -- `nodes.csv` / `edges.csv` writer
//! - [`network`] -- Author collaboration network from shared titles
//! - [`catalog`] -- Records bundled with every derived view
//! - [`loader`] -- Async fetch from a URL or local path
//! - [`models`] -- Core data types
//! - [`config`] -- Defaults and limits
//!
//! # Example Usage
//!
//! ```bash
//! # Summary statistics
//! pubgraph stats publicacoesPorMembro.csv
//!
//! # Whole-word title filter for one author
//! pubgraph match publicacoesPorMembro.csv --author Silva --title educação --whole-words
//!
//! # Collaboration graph as CSV
//! pubgraph graph https://example.org/publicacoes.csv -o output/
//! ```

pub mod catalog;
pub mod config;
pub mod export;
pub mod graph;
pub mod group;
pub mod loader;
pub mod models;
pub mod network;
pub mod parser;
pub mod search;
pub mod stats;
pub mod text;
