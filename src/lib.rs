//! # Clue Meister
//!
//! Search-and-rescue clue agent with:
//! - Deterministic clue ranking (type points + proximity to the rescue path)
//! - SQLite knowledge base for clues, tags and operator queries
//! - LLM-backed clue extraction, flagging and clustering (Gemini)
//! - Rule-based triage against search grid and survey coverage
//! - Multiple interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clue_meister::{ClueMeister, ClueSession, SqliteKnowledgeBase, KnowledgeBase};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let kb = Arc::new(SqliteKnowledgeBase::new("clues.db").await?);
//!     kb.add_clue("red hat at 45.2,-121.3").await?;
//!
//!     let agent = ClueMeister::new(kb);
//!     let mut session = ClueSession::new();
//!
//!     agent.process_request(&mut session, &json!({"update_path": [[45.0, -121.0]]})).await;
//!     let ranked = agent.process_request(&mut session, &json!({"rank_clues": true})).await;
//!
//!     println!("{}", serde_json::to_string_pretty(&ranked)?);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod core;
pub mod coverage;
pub mod error;
pub mod knowledge;
pub mod message;
pub mod model;
pub mod ranking;
pub mod rules;
pub mod session;

// Re-export primary types
pub use agent::ClueMeister;
pub use config::ClueMeisterConfig;
pub use core::{parse_clue, ClueId, ClueType, Coordinate, ParsedClue, RankedClue, TriagedClue};
pub use error::{ClueMeisterError, Result};
pub use knowledge::{KnowledgeBase, SqliteKnowledgeBase};
pub use message::{ClueMessage, ClueResponse};
pub use ranking::{ClueRanker, RankingMethod, SegmentRanker, VertexRanker};
pub use session::ClueSession;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
