//! Co-authorship graph builder - Entry Point
//!
//! Searches PubMed for each name and prints a collaboration report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use coauthor_graph::formatters::{
    author_detail_json, counts_json, format_author_detail_markdown, format_counts_markdown,
    format_report_markdown, format_skipped_markdown, report_json,
};
use coauthor_graph::error::GraphError;
use coauthor_graph::graph::IdentityStrategy;
use coauthor_graph::{
    AffiliationMarkers, BreakdownMode, BuildOptions, CollaborationAnalyzer, Config, EntrezClient,
    GraphBuilder,
};

#[derive(Parser, Debug)]
#[command(name = "coauthor-graph")]
#[command(about = "Build a co-authorship graph from PubMed author searches")]
#[command(version)]
struct Cli {
    /// Author names to search for ("First Middle Last" or "Last, First Middle")
    names: Vec<String>,

    /// Read additional names from a file, one per line
    #[arg(long)]
    names_file: Option<PathBuf>,

    /// What to print
    #[arg(long, default_value = "report")]
    output: Output,

    /// Output format
    #[arg(long, default_value = "markdown")]
    format: Format,

    /// Maximum records per name
    #[arg(long, default_value_t = coauthor_graph::config::defaults::MAX_RESULTS)]
    max_results: u32,

    /// Whose affiliation the collaborator breakdown counts
    #[arg(long, default_value = "collaborator")]
    breakdown: BreakdownMode,

    /// How name variants are merged into one author
    #[arg(long, default_value = "short-name")]
    identity: IdentityStrategy,

    /// Affiliation text that marks the home institution
    #[arg(long, default_value = coauthor_graph::config::defaults::INSTITUTION)]
    institution: String,

    /// Report label for the home institution
    #[arg(long, default_value = coauthor_graph::config::defaults::INSTITUTION_LABEL)]
    institution_label: String,

    /// Affiliation text that marks the home department
    #[arg(long, default_value = coauthor_graph::config::defaults::DEPARTMENT)]
    department: String,

    /// Report label for the home department
    #[arg(long, default_value = coauthor_graph::config::defaults::DEPARTMENT_LABEL)]
    department_label: String,

    /// NCBI API key (optional, enables higher rate limits)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// Contact email sent with every request
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Log raw response bodies at debug level
    #[arg(long)]
    debug_responses: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Output {
    /// Collaboration statistics per author
    #[default]
    Report,
    /// Record counts per author, without fetching records
    Counts,
    /// Collaborators and articles per author
    Detail,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Format {
    /// Markdown tables
    #[default]
    Markdown,
    /// Pretty-printed JSON
    Json,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so stdout carries only the report.
    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// Names from the command line followed by names from the file, blank lines skipped.
fn collect_names(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut names = cli.names.clone();

    if let Some(ref path) = cli.names_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading names from {}", path.display()))?;
        names.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }

    Ok(names)
}

/// Attach a wait hint when the run ended on a rate limit.
fn explain(error: GraphError) -> anyhow::Error {
    match error.retry_after() {
        Some(wait) => anyhow::Error::new(error)
            .context(format!("PubMed rate limit reached, retry in {}s", wait.as_secs())),
        None => error.into(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let names = collect_names(&cli)?;
    anyhow::ensure!(!names.is_empty(), "no author names supplied");

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        names = names.len(),
        output = ?cli.output,
        "Starting co-authorship graph builder"
    );

    let mut config = Config::new(cli.api_key.clone());
    config.email = cli.email.clone();
    config.debug_responses = cli.debug_responses;
    let client = EntrezClient::new(config)?;

    let options = BuildOptions { max_results: cli.max_results, ..BuildOptions::default() };
    let builder =
        GraphBuilder::new(Arc::new(client), options).with_resolver(cli.identity.resolver());

    let markers = AffiliationMarkers {
        institution: cli.institution.clone(),
        institution_label: cli.institution_label.clone(),
        department: cli.department.clone(),
        department_label: cli.department_label.clone(),
    };
    let analyzer = CollaborationAnalyzer::new(markers, cli.breakdown);

    let progress = |done: usize, total: usize| eprintln!("{done}/{total} authors processed");

    let rendered = match cli.output {
        Output::Counts => {
            let counts = builder
                .article_counts(names.as_slice(), Some(&progress))
                .await
                .map_err(explain)?;
            match cli.format {
                Format::Markdown => format_counts_markdown(&counts),
                Format::Json => serde_json::to_string_pretty(&counts_json(&counts))?,
            }
        }
        Output::Report => {
            let graph =
                builder.build(names.as_slice(), Some(&progress)).await.map_err(explain)?;
            let report = analyzer.summarize(&graph);
            match cli.format {
                Format::Markdown => {
                    let mut text = format_report_markdown(&report);
                    let skipped = format_skipped_markdown(graph.skipped());
                    if !skipped.is_empty() {
                        text.push('\n');
                        text.push_str(&skipped);
                    }
                    text
                }
                Format::Json => serde_json::to_string_pretty(&report_json(&report))?,
            }
        }
        Output::Detail => {
            let graph =
                builder.build(names.as_slice(), Some(&progress)).await.map_err(explain)?;
            match cli.format {
                Format::Markdown => format_author_detail_markdown(&graph, &analyzer),
                Format::Json => {
                    serde_json::to_string_pretty(&author_detail_json(&graph, &analyzer))?
                }
            }
        }
    };

    println!("{rendered}");
    Ok(())
}
