use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;
use pubgraph::catalog::PublicationCatalog;
use pubgraph::export::CsvGraphWriter;
use pubgraph::graph::NodeOptions;
use pubgraph::loader::{Loader, LoaderConfig};
use pubgraph::network::{build_network, NetworkOptions};
use pubgraph::search::{
    author_publications, filter_by_author_and_title, filter_by_multiple_authors_and_terms,
    search, MatchLogic, MultiFilterOptions, SearchCriteria, TitleFilterOptions,
};
use serde::Serialize;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "pubgraph")]
#[command(about = "Query publication listings and build collaboration graphs")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// HTTP timeout in seconds for remote sources
    #[arg(long, default_value_t = pubgraph::config::HTTP_TIMEOUT_SECS, global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statistics snapshot
    Stats(SourceArgs),
    /// Search by author, type, year, title, and year range
    Search(SearchArgs),
    /// Filter by several author names and title terms
    Filter(FilterArgs),
    /// Filter by one author name and one title term
    Match(MatchArgs),
    /// Publications of one author, optionally narrowed by title
    Author(AuthorArgs),
    /// Write the author collaboration network as nodes.csv / edges.csv
    Graph(GraphArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Path or http(s) URL of the pipe-delimited listing
    source: String,
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    input: SourceArgs,

    /// Case-insensitive author substring
    #[arg(long)]
    author: Option<String>,

    /// Exact publication type
    #[arg(long = "type")]
    publication_type: Option<String>,

    /// Exact year
    #[arg(long)]
    year: Option<i32>,

    /// Case-insensitive title substring
    #[arg(long)]
    title: Option<String>,

    /// Lower bound of the year range (inclusive)
    #[arg(long, requires = "year_max")]
    year_min: Option<i32>,

    /// Upper bound of the year range (inclusive)
    #[arg(long, requires = "year_min")]
    year_max: Option<i32>,
}

#[derive(Args)]
struct FilterArgs {
    #[command(flatten)]
    input: SourceArgs,

    /// Author name to match (repeatable)
    #[arg(long = "author")]
    authors: Vec<String>,

    /// Title term to match (repeatable)
    #[arg(long = "term")]
    terms: Vec<String>,

    /// How author names combine (AND or OR)
    #[arg(long, default_value_t = MatchLogic::Or)]
    author_logic: MatchLogic,

    /// How title terms combine (AND or OR)
    #[arg(long, default_value_t = MatchLogic::Or)]
    title_logic: MatchLogic,

    #[arg(long)]
    case_sensitive: bool,
}

#[derive(Args)]
struct MatchArgs {
    #[command(flatten)]
    input: SourceArgs,

    #[arg(long, default_value = "")]
    author: String,

    #[arg(long, default_value = "")]
    title: String,

    /// Require the full author name
    #[arg(long)]
    exact_author: bool,

    /// Require the full title
    #[arg(long)]
    exact_title: bool,

    /// Match the title term as a whole word
    #[arg(long)]
    whole_words: bool,
}

#[derive(Args)]
struct AuthorArgs {
    #[command(flatten)]
    input: SourceArgs,

    /// Author name (case-insensitive substring)
    name: String,

    /// Title substring
    #[arg(long, default_value = "")]
    title: String,
}

#[derive(Args)]
struct GraphArgs {
    #[command(flatten)]
    input: SourceArgs,

    /// Output directory for nodes.csv and edges.csv
    #[arg(short, long)]
    output: String,

    /// Minimum number of shared titles for an edge
    #[arg(long, default_value_t = 1)]
    min_shared: usize,

    /// Folder prefix of node images
    #[arg(long, default_value = pubgraph::config::DEFAULT_IMAGE_FOLDER)]
    image_folder: String,

    /// File extension of node images
    #[arg(long, default_value = pubgraph::config::DEFAULT_IMAGE_EXTENSION)]
    image_extension: String,
}

async fn load(loader: &Loader, source: &str) -> Result<PublicationCatalog> {
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {source}"));
    pb.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let result = loader.load(source).await;
    pb.finish_and_clear();

    let catalog = result.with_context(|| format!("Failed to load publications from: {source}"))?;
    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        publications = catalog.len(),
        "Listing loaded"
    );
    Ok(catalog)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

async fn run(command: Commands, loader: Loader) -> Result<()> {
    match command {
        Commands::Stats(args) => {
            let catalog = load(&loader, &args.source).await?;
            print_json(&catalog.statistics)
        }
        Commands::Search(args) => {
            let catalog = load(&loader, &args.input.source).await?;
            let criteria = SearchCriteria {
                author: args.author,
                publication_type: args.publication_type,
                year: args.year,
                title: args.title,
                year_range: match (args.year_min, args.year_max) {
                    (Some(min), Some(max)) => Some(pubgraph::models::YearRange::new(min, max)),
                    _ => None,
                },
            };
            print_json(&search(&catalog.publications, &criteria))
        }
        Commands::Filter(args) => {
            let catalog = load(&loader, &args.input.source).await?;
            let options = MultiFilterOptions::default()
                .author_logic(args.author_logic)
                .title_logic(args.title_logic)
                .case_sensitive(args.case_sensitive);
            print_json(&filter_by_multiple_authors_and_terms(
                &catalog.publications,
                &args.authors,
                &args.terms,
                &options,
            ))
        }
        Commands::Match(args) => {
            let catalog = load(&loader, &args.input.source).await?;
            let options = TitleFilterOptions::default()
                .exact_author_match(args.exact_author)
                .exact_title_match(args.exact_title)
                .whole_words(args.whole_words);
            print_json(&filter_by_author_and_title(
                &catalog.publications,
                &args.author,
                &args.title,
                &options,
            ))
        }
        Commands::Author(args) => {
            let catalog = load(&loader, &args.input.source).await?;
            print_json(&author_publications(
                &catalog.publications,
                &args.name,
                &args.title,
            ))
        }
        Commands::Graph(args) => {
            let catalog = load(&loader, &args.input.source).await?;
            let options = NetworkOptions {
                node: NodeOptions::default()
                    .image_folder(args.image_folder)
                    .image_extension(args.image_extension),
                min_shared: args.min_shared,
                ..NetworkOptions::default()
            };

            let mut writer = CsvGraphWriter::create(&args.output)
                .with_context(|| format!("Failed to create graph output in: {}", args.output))?;
            let network = build_network(&mut writer, &catalog.publications, &options)
                .context("Failed to build collaboration network")?;
            let written = writer.finish().context("Failed to flush graph CSV files")?;

            println!();
            println!("=== Summary ===");
            println!("Publications:       {}", catalog.len());
            println!("Skipped lines:      {}", catalog.skipped_lines);
            println!("Authors (nodes):    {}", network.authors);
            println!("Collaborations:     {}", network.collaborations);
            println!("Rows written:       {} nodes, {} edges", written.nodes, written.edges);
            Ok(())
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let loader = Loader::new(LoaderConfig {
        timeout: Duration::from_secs(cli.timeout),
        ..LoaderConfig::default()
    })?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("pubgraph-worker")
        .enable_io()
        .enable_time()
        .build()?;
    rt.block_on(run(cli.command, loader))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = execute(cli);

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
