//! # Jurisprudence Search Main Driver
//!
//! ## Purpose
//! Command-line entry point for the jurisprudence search engine. Orchestrates
//! configuration loading, logging initialization, and dispatch to the index
//! rebuild or search operations.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file, command line arguments, environment
//!   variables
//! - **Output**: A rebuilt index on disk, or ranked search results on stdout
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Dispatch: `index` rebuilds the collection; `search` loads it and
//!    evaluates the criteria assembled from the flags
//! 4. Exit non-zero on any unrecovered error

use clap::{Arg, ArgMatches, Command};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use jurisprudence_search::{
    config::Config,
    errors::{Result, SearchError},
    search::{format_results, search, Criteria},
    storage, DocumentIndexer,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error [{}]: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = Command::new("juris")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Metadata extraction and multi-criterion search over criminal appellate rulings")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("juris.toml")
                .global(true),
        )
        .subcommand(
            Command::new("index")
                .about("Rebuild the metadata collection from the documents directory"),
        )
        .subcommand(
            Command::new("search")
                .about("Search the indexed collection")
                .arg(
                    Arg::new("appeal-type")
                        .long("appeal-type")
                        .value_name("TYPE")
                        .help("Fuzzy-matched appeal type (e.g. \"APELAÇÃO CRIMINAL\")"),
                )
                .arg(
                    Arg::new("subject")
                        .long("subject")
                        .value_name("TOPIC")
                        .action(clap::ArgAction::Append)
                        .help("Fuzzy-matched subject matter; repeatable"),
                )
                .arg(
                    Arg::new("outcome")
                        .long("outcome")
                        .value_name("OUTCOME")
                        .help("Exact outcome label (accent- and case-insensitive)"),
                )
                .arg(
                    Arg::new("appellant")
                        .long("appellant")
                        .value_name("PARTY")
                        .help("Exact appellant label (accent- and case-insensitive)"),
                )
                .arg(
                    Arg::new("judging-body")
                        .long("judging-body")
                        .value_name("CHAMBER")
                        .help("Fuzzy-matched judging body"),
                )
                .arg(
                    Arg::new("keyword")
                        .long("keyword")
                        .value_name("WORD")
                        .action(clap::ArgAction::Append)
                        .help("Substring-matched keyword; repeatable"),
                )
                .arg(
                    Arg::new("case-number")
                        .long("case-number")
                        .value_name("NUMBER")
                        .help("Substring of the formatted case number"),
                )
                .arg(
                    Arg::new("query")
                        .long("query")
                        .value_name("JSON")
                        .help("Criteria as a JSON object; merged over the flags")
                        .conflicts_with_all(["appeal-type", "subject", "outcome", "appellant", "judging-body", "keyword", "case-number"]),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_name("N")
                        .value_parser(clap::value_parser!(usize))
                        .help("Number of results to display"),
                ),
        )
        .subcommand_required(true)
        .get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("juris.toml");
    let config = Config::from_file(config_path)?;

    init_logging(&config)?;
    info!("Configuration loaded from: {}", config_path);

    match matches.subcommand() {
        Some(("index", _)) => run_index(&config),
        Some(("search", sub)) => run_search(&config, sub),
        _ => unreachable!("subcommand_required"),
    }
}

/// Initialize logging based on configuration
fn init_logging(config: &Config) -> Result<()> {
    let log_level: tracing::Level =
        config
            .logging
            .level
            .parse()
            .map_err(|_| SearchError::Config {
                message: format!("Invalid log level: {}", config.logging.level),
            })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .json()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_filter(filter),
            )
            .init();
    }

    Ok(())
}

fn run_index(config: &Config) -> Result<()> {
    let indexer = DocumentIndexer::new(config)?;
    let collection = indexer.rebuild()?;
    println!(
        "Indexed {} document(s) into {}",
        collection.total_documents,
        config.indexing.index_path.display()
    );
    Ok(())
}

fn run_search(config: &Config, matches: &ArgMatches) -> Result<()> {
    let criteria = criteria_from_matches(matches)?;
    if criteria.is_empty() {
        println!("No search criteria given; nothing to match.");
        return Ok(());
    }

    let collection = storage::load_collection(&config.indexing.index_path)?;
    info!(
        documents = collection.total_documents,
        "Collection loaded"
    );

    let results = search(&collection, &criteria);
    let limit = matches
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(config.search.display_limit);
    print!(
        "{}",
        format_results(&results, limit, config.search.explanation_display_limit)
    );

    Ok(())
}

/// Assemble criteria from either the `--query` JSON object or the individual
/// flags
fn criteria_from_matches(matches: &ArgMatches) -> Result<Criteria> {
    if let Some(raw) = matches.get_one::<String>("query") {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        return Criteria::from_json_value(&value);
    }

    let many = |name: &str| -> Vec<String> {
        matches
            .get_many::<String>(name)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    };

    Ok(Criteria {
        appeal_type: matches.get_one::<String>("appeal-type").cloned(),
        subject_matters: many("subject"),
        outcome: matches.get_one::<String>("outcome").cloned(),
        appellant: matches.get_one::<String>("appellant").cloned(),
        judging_body: matches.get_one::<String>("judging-body").cloned(),
        keywords: many("keyword"),
        case_number: matches.get_one::<String>("case-number").cloned(),
    })
}
