//! Text reports for a harvest run
//!
//! Writes the output layout downstream tooling reads: a master count list,
//! one file per card type and the combined decklists, all under
//! `<output root>/<commander>/edhrec-decklists/` with a run metadata header
//! at the top of every file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::analysis::CardType;
use crate::edhrec::Deck;
use crate::error::Result;

/// Run parameters echoed into every report header
pub struct RunInfo {
    pub commander: String,
    pub max_decks: usize,
    pub min_price: f64,
    pub max_price: f64,
}

/// Header block for report files: run timestamp and parameters
pub fn run_header(info: &RunInfo) -> String {
    let mut header = String::new();
    header.push_str("Commander Run Metadata\n");
    header.push_str("======================\n\n");
    header.push_str(&format!(
        "Timestamp: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    header.push_str(&format!("Commander: {}\n", info.commander));
    header.push_str(&format!("Max Decks: {}\n", info.max_decks));
    header.push_str(&format!("Min Price: {}\n", info.min_price));
    header.push_str(&format!("Max Price: {}\n", info.max_price));
    header.push_str("\nResults\n======\n");
    header
}

/// Counts as report lines: highest count first, ties alphabetical
fn sorted_by_count(counts: &HashMap<String, u32>) -> Vec<(&str, u32)> {
    let mut entries: Vec<(&str, u32)> = counts
        .iter()
        .map(|(name, count)| (name.as_str(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    entries
}

/// Write the master count file covering every card seen in the run
pub fn write_master_counts(
    counts: &HashMap<String, u32>,
    output_dir: &Path,
    header: &str,
) -> Result<PathBuf> {
    let mut content = String::from(header);
    content.push('\n');
    for (name, count) in sorted_by_count(counts) {
        content.push_str(&format!("{}  {}\n", count, name));
    }

    let path = output_dir.join("master_card_counts.txt");
    fs::write(&path, content)?;
    log::info!("Wrote master card counts: {}", path.display());
    Ok(path)
}

/// Write one count file per non-empty card type bucket
pub fn write_type_lists(
    groups: &HashMap<CardType, HashMap<String, u32>>,
    output_dir: &Path,
    header: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for card_type in CardType::all() {
        let counts = match groups.get(card_type) {
            Some(counts) if !counts.is_empty() => counts,
            _ => continue,
        };

        let mut content = String::from(header);
        content.push('\n');
        for (name, count) in sorted_by_count(counts) {
            content.push_str(&format!("{}  {}\n", count, name));
        }

        let path = output_dir.join(format!(
            "cards_{}.txt",
            card_type.as_str().to_lowercase()
        ));
        fs::write(&path, content)?;
        written.push(path);
    }
    log::info!("Wrote {} card type lists", written.len());
    Ok(written)
}

/// Write every harvested decklist into one file, decks separated by a
/// blank line
pub fn write_decklists(
    decks: &[Deck],
    output_dir: &Path,
    commander: &str,
    header: &str,
) -> Result<PathBuf> {
    let mut content = String::from(header);
    content.push('\n');
    for deck in decks {
        for line in &deck.cards {
            content.push_str(line);
            content.push('\n');
        }
        content.push('\n');
    }

    let path = output_dir.join(format!("{}-decklists.txt", commander));
    fs::write(&path, content)?;
    log::info!("Wrote {} decklists: {}", decks.len(), path.display());
    Ok(path)
}

/// Empty (or create) the per-commander report directory and return it.
/// Only files directly inside it are removed; subdirectories are left alone.
pub fn clean_output_dir(output_root: &Path, commander: &str) -> Result<PathBuf> {
    let dir = output_root.join(commander).join("edhrec-decklists");

    if dir.exists() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Err(e) = fs::remove_file(&path) {
                    log::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
    } else {
        fs::create_dir_all(&dir)?;
    }

    log::info!("Output directory ready: {}", dir.display());
    Ok(dir)
}
