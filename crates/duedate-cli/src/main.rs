//! `duedate`: resolve compliance due dates from the command line.

mod display;
mod input;
mod ledger;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use duedate_core::ledger::summarize_batch;
use duedate_core::{ComplianceItem, DueDateResult, SourceDocument, TextExtractor, parse_date};
use duedate_engine::{
    HistoricalAnalyzer, RegulatoryDatabase, ResolveContext, Resolver, ResolverConfig,
};
use duedate_llm::{LlmConfig, LlmExtractor};
use serde::Serialize;
use tracing::{info, warn};

use crate::input::ItemInput;

#[derive(Parser)]
#[command(name = "duedate")]
#[command(about = "Resolve compliance due dates with a confidence-gated strategy ladder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve due dates for one item or a JSON batch
    Resolve(ResolveArgs),

    /// List resolved items stored in a Parquet ledger
    Ledger {
        /// Ledger file
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Item title, e.g. "ISO 9001 Certification"
    #[arg(long, required_unless_present = "items", conflicts_with = "items")]
    title: Option<String>,

    /// Application date (YYYY-MM-DD and common variants)
    #[arg(long, value_parser = parse_date_arg, requires = "title")]
    application_date: Option<NaiveDate>,

    /// Free-text description
    #[arg(long, default_value = "")]
    description: String,

    /// JSON array of items, each with optional inline `sources`
    #[arg(long)]
    items: Option<PathBuf>,

    /// JSON array of search results shared by every item
    #[arg(long)]
    sources: Option<PathBuf>,

    /// JSON array of past items with completion dates
    #[arg(long)]
    history: Option<PathBuf>,

    /// JSON object of extra regulatory entries keyed by standard, e.g. "ISO 14001"
    #[arg(long)]
    regulatory_db: Option<PathBuf>,

    /// JSON resolver configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// OpenAI-compatible base URL; extraction is disabled when unset
    #[arg(long, env = "DUEDATE_LLM_URL")]
    llm_url: Option<String>,

    #[arg(long, env = "DUEDATE_LLM_MODEL", default_value = "llama-3.3-70b-versatile")]
    llm_model: String,

    #[arg(long, env = "DUEDATE_LLM_API_KEY", hide_env_values = true)]
    llm_api_key: Option<String>,

    #[arg(long, env = "DUEDATE_LLM_TIMEOUT_SECS", default_value_t = 30)]
    llm_timeout_secs: u64,

    /// Print results as JSON instead of cards
    #[arg(long)]
    json: bool,

    /// Append results to this Parquet ledger
    #[arg(long)]
    ledger: Option<PathBuf>,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Ledger { path } => cmd_ledger(path),
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    item: &'a ComplianceItem,
    #[serde(flatten)]
    result: &'a DueDateResult,
    urgency: &'static str,
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let items = gather_items(&args, today)?;

    let shared_sources = match &args.sources {
        Some(path) => input::load_sources(path)?,
        None => Vec::new(),
    };
    let history = match &args.history {
        Some(path) => input::load_history(path)?,
        None => Vec::new(),
    };
    let resolver = build_resolver(&args)?;

    let mut resolved = Vec::with_capacity(items.len());
    for input in &items {
        let sources: Vec<SourceDocument> = input
            .sources
            .iter()
            .chain(&shared_sources)
            .cloned()
            .collect();
        let ctx = ResolveContext {
            sources: &sources,
            history: &history,
        };
        let (result, trail) = resolver.resolve_with_trail(&input.item, &ctx);
        if !args.json {
            display::print_result_card(&input.item, &result, &trail, today);
        }
        resolved.push((input.item.clone(), result));
    }

    if args.json {
        let rows: Vec<JsonRow<'_>> = resolved
            .iter()
            .map(|(item, result)| JsonRow {
                item,
                result,
                urgency: duedate_core::Urgency::for_due_date(result.due_date, today).as_str(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }

    if let Some(path) = &args.ledger {
        ledger::append_to_ledger(path, &resolved)?;
    }
    Ok(())
}

fn gather_items(args: &ResolveArgs, today: NaiveDate) -> anyhow::Result<Vec<ItemInput>> {
    if let Some(path) = &args.items {
        let items = input::load_items(path)?;
        info!(count = items.len(), "loaded items");
        return Ok(items);
    }
    let title = args.title.clone().context("either --title or --items is required")?;
    let mut item = ComplianceItem::new(title, args.application_date.unwrap_or(today));
    item.description = args.description.clone();
    Ok(vec![ItemInput {
        item,
        sources: Vec::new(),
    }])
}

fn build_resolver(args: &ResolveArgs) -> anyhow::Result<Resolver> {
    let mut regulatory = RegulatoryDatabase::builtin();
    if let Some(path) = &args.regulatory_db {
        regulatory.extend(input::load_regulatory(path)?);
    }
    info!(entries = regulatory.len(), "regulatory database ready");

    let config = match &args.config {
        Some(path) => input::load_config(path)?,
        None => ResolverConfig::default(),
    };

    let extractor: Option<Box<dyn TextExtractor>> = match &args.llm_url {
        Some(url) => {
            let mut llm = LlmConfig::new(url.as_str(), args.llm_model.as_str());
            llm.api_key = args.llm_api_key.clone();
            llm.timeout = Duration::from_secs(args.llm_timeout_secs);
            Some(Box::new(LlmExtractor::new(llm)?))
        }
        None => {
            warn!("no LLM endpoint configured, extraction consensus disabled");
            None
        }
    };

    Ok(Resolver::new(
        regulatory,
        HistoricalAnalyzer::default(),
        extractor,
        config,
    ))
}

fn cmd_ledger(path: PathBuf) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let batches = ledger::read_ledger(&path)?;
    let mut count = 0;
    for batch in &batches {
        for (title, due, method, confidence) in summarize_batch(batch)? {
            display::print_ledger_row(&title, due, &method, confidence, today);
            count += 1;
        }
    }
    println!();
    println!("{count} item(s) in {}", path.display());
    Ok(())
}
