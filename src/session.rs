use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{ClueId, Coordinate};

pub const STATUS_INITIALIZED: &str = "initialized";
pub const STATUS_PATH_UPDATED: &str = "path updated";

/// Caller-owned conversation state: status, rescue path and last clusters.
///
/// The agent borrows it mutably per request, so path updates and ranking
/// on one session never interleave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClueSession {
    pub status: String,
    path: Vec<Coordinate>,
    clusters: BTreeMap<u32, Vec<ClueId>>,
}

impl ClueSession {
    pub fn new() -> Self {
        Self {
            status: STATUS_INITIALIZED.to_string(),
            path: Vec::new(),
            clusters: BTreeMap::new(),
        }
    }

    /// Replace the rescue path wholesale; returns the new length
    pub fn set_path(&mut self, path: Vec<Coordinate>) -> usize {
        self.path = path;
        self.status = STATUS_PATH_UPDATED.to_string();
        self.path.len()
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn set_clusters(&mut self, clusters: BTreeMap<u32, Vec<ClueId>>) {
        self.clusters = clusters;
    }

    pub fn clusters(&self) -> &BTreeMap<u32, Vec<ClueId>> {
        &self.clusters
    }
}

impl Default for ClueSession {
    fn default() -> Self {
        Self::new()
    }
}
