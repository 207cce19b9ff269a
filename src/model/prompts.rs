//! Prompt builders and reply parsers for the LLM-backed handlers.
//!
//! Model output is free text; everything here is deterministic so the
//! parsing side can be tested without a model.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::ClueId;

/// Line prefix marking an extracted clue
pub const CLUE_PREFIX: &str = "Clue:";

static FLAG_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"!(\d+)!").expect("invalid flag regex"));

static CLUSTER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Cluster (\d+): \[(.*?)\]").expect("invalid cluster regex"));

pub fn extraction_prompt(raw_text: &str, found: &[String]) -> String {
    format!(
        "You are a Clue Meister for SAR operations. Extract a clue from the text below.\n\n\
         Please list each clue on its own line prefaced by '{CLUE_PREFIX}'. If no new clues, reply 'No New Clues'.\n\n\
         Raw Text:\n{raw_text}\n\n\
         Clues Already Found:\n{found:?}\n"
    )
}

pub fn flagging_prompt(clue_text: &str) -> String {
    format!(
        "You are a Clue Meister for SAR operations.\n\
         Apply rules to flag related clues. Surround their IDs with exclamation marks, e.g. !3!.\n\n\
         {clue_text}\n"
    )
}

pub fn clustering_prompt(clues: &BTreeMap<ClueId, String>) -> String {
    let block = clues
        .iter()
        .map(|(id, text)| format!("{id}: {text}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a Clue Meister. Group the following clues into clusters by similarity. List as:\n\
         Cluster 1: [1,2,5]\n\
         Cluster 2: [3,4]\n\n\
         Clues:\n{block}\n"
    )
}

/// Whether the reply still carries extracted clues
pub fn has_clues(reply: &str) -> bool {
    reply.contains(CLUE_PREFIX)
}

/// Trimmed, non-empty clue texts from lines starting with `Clue:`
pub fn parse_extracted(reply: &str) -> Vec<String> {
    reply
        .lines()
        .filter_map(|line| line.strip_prefix(CLUE_PREFIX))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Clue ids wrapped in `!id!` markers, in reply order
pub fn parse_flagged(reply: &str) -> Vec<ClueId> {
    FLAG_MARKER
        .captures_iter(reply)
        .filter_map(|caps| caps[1].parse::<ClueId>().ok())
        .collect()
}

/// `Cluster n: [ids]` lines; ids that are not plain digits are skipped
pub fn parse_clusters(reply: &str) -> BTreeMap<u32, Vec<ClueId>> {
    let mut clusters = BTreeMap::new();

    for line in reply.lines() {
        let Some(caps) = CLUSTER_LINE.captures(line) else {
            continue;
        };
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };

        let ids = caps[2]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
            .filter_map(|s| s.parse::<ClueId>().ok())
            .collect();

        clusters.insert(number, ids);
    }

    clusters
}
