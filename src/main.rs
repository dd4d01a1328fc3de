//! deck_harvest - EDHREC decklist harvester
//!
//! Fetches the most recent decks for a commander, counts their cards,
//! classifies them with Scryfall metadata and writes text reports. Every
//! network artifact is cached, so re-runs only fetch what is missing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use deck_harvest::analysis;
use deck_harvest::edhrec::{filter_deck_hashes, normalize_commander_name};
use deck_harvest::fetcher::FetchOutcome;
use deck_harvest::harvester::Harvester;
use deck_harvest::report::{self, RunInfo};
use deck_harvest::scryfall::CardMetadata;

/// EDHREC deck harvester - fetches commander decklists and enriches them
/// with Scryfall card metadata
#[derive(Parser, Debug)]
#[command(name = "deck_harvest")]
#[command(version, about, long_about = None)]
struct Args {
    /// Commander name, free text (e.g. "Atraxa, Praetors' Voice")
    commander: String,

    /// How many of the most recent decks to harvest
    #[arg(long, default_value_t = 20)]
    max_decks: usize,

    /// Lowest accepted deck price (inclusive)
    #[arg(long, default_value_t = 0.0)]
    min_price: f64,

    /// Highest accepted deck price (inclusive)
    #[arg(long, default_value_t = 500.0)]
    max_price: f64,

    /// Cache directory for deck documents and card metadata
    #[arg(long, default_value_t = default_cache_dir())]
    cache_dir: String,

    /// Directory reports are written under
    #[arg(long, default_value = "./output")]
    output_dir: String,
}

/// Returns the default cache root: ~/.cache/deck_harvest
fn default_cache_dir() -> String {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deck_harvest")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let commander = normalize_commander_name(&args.commander);
    if commander.is_empty() {
        log::error!(
            "Commander name {:?} normalizes to an empty identifier",
            args.commander
        );
        std::process::exit(1);
    }
    log::info!("Harvesting decks for {}", commander);

    let harvester = match Harvester::new(Path::new(&args.cache_dir)) {
        Ok(harvester) => Arc::new(harvester),
        Err(e) => {
            log::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    // Resolve the build id up front; every deck fetch reuses the memoized value
    if let Err(e) = harvester.build_id().await {
        log::error!("Failed to resolve EDHREC build id: {}", e);
        std::process::exit(1);
    }

    let index = match harvester.deck_index(&commander).await {
        Ok(index) => index,
        Err(e) => {
            log::error!("Failed to fetch deck index: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Deck index lists {} decks", index.table.len());

    let hashes = match filter_deck_hashes(&index, args.max_decks, args.min_price, args.max_price)
    {
        Ok(hashes) => hashes,
        Err(e) => {
            log::error!("Failed to select decks: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Selected {} decks priced {} to {}",
        hashes.len(),
        args.min_price,
        args.max_price
    );

    let mut decks = Vec::new();
    let mut deck_failures = 0usize;
    let mut batch = harvester.fetch_decks_with_progress(hashes);
    while let Some(progress) = batch.next().await {
        match progress.outcome {
            FetchOutcome::Fetched(deck) => {
                log::info!(
                    "[{}/{}] deck fetched ({} cards)",
                    progress.completed,
                    progress.total,
                    deck.cards.len()
                );
                decks.push(deck);
            }
            FetchOutcome::Failed { key, error } => {
                log::warn!(
                    "[{}/{}] deck {} failed: {}",
                    progress.completed,
                    progress.total,
                    key,
                    error
                );
                deck_failures += 1;
            }
        }
    }

    let counts = analysis::count_cards(&decks);
    log::info!(
        "Counted {} distinct cards across {} decks",
        counts.len(),
        decks.len()
    );

    let names: Vec<String> = counts.keys().cloned().collect();
    let mut metadata: HashMap<String, CardMetadata> = HashMap::new();
    let mut metadata_failures = 0usize;
    let mut batch = harvester.fetch_card_metadata_with_progress(names);
    while let Some(progress) = batch.next().await {
        match progress.outcome {
            FetchOutcome::Fetched((name, meta)) => {
                log::debug!(
                    "[{}/{}] metadata for {}",
                    progress.completed,
                    progress.total,
                    name
                );
                metadata.insert(name, meta);
            }
            FetchOutcome::Failed { key, error } => {
                log::warn!(
                    "[{}/{}] metadata for {} failed: {}",
                    progress.completed,
                    progress.total,
                    key,
                    error
                );
                metadata_failures += 1;
            }
        }
    }

    let groups = analysis::group_by_type(&counts, &metadata);

    let output_dir = match report::clean_output_dir(Path::new(&args.output_dir), &commander) {
        Ok(dir) => dir,
        Err(e) => {
            log::error!("Failed to prepare output directory: {}", e);
            std::process::exit(1);
        }
    };

    let info = RunInfo {
        commander: args.commander.clone(),
        max_decks: args.max_decks,
        min_price: args.min_price,
        max_price: args.max_price,
    };
    let header = report::run_header(&info);

    if let Err(e) = report::write_master_counts(&counts, &output_dir, &header) {
        log::error!("Failed to write master counts: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = report::write_type_lists(&groups, &output_dir, &header) {
        log::error!("Failed to write type lists: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = report::write_decklists(&decks, &output_dir, &commander, &header) {
        log::error!("Failed to write decklists: {}", e);
        std::process::exit(1);
    }

    log::info!(
        "Harvest complete: {} decks fetched, {} deck failures, {} distinct cards, {} metadata failures",
        decks.len(),
        deck_failures,
        counts.len(),
        metadata_failures
    );
}
