use rusqlite::{Connection, params, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::{ClueId, Coordinate};
use crate::error::{Result, ClueMeisterError};
use crate::knowledge::{HumanQuery, KnowledgeBase, KnowledgeStats, SearchGrid, AI_FLAGGED_TAG};

/// SQLite-backed knowledge base
///
/// Schema:
/// ```sql
/// CREATE TABLE clues (id INTEGER PRIMARY KEY AUTOINCREMENT, description TEXT NOT NULL, created_at TEXT NOT NULL);
/// CREATE TABLE clue_tags (clue_id INTEGER NOT NULL, tag TEXT NOT NULL, PRIMARY KEY (clue_id, tag));
/// CREATE TABLE human_queries (id INTEGER PRIMARY KEY AUTOINCREMENT, query TEXT NOT NULL, asked_at TEXT NOT NULL);
/// CREATE TABLE search_grid (id INTEGER PRIMARY KEY CHECK (id = 1), min_lat REAL, min_lon REAL, max_lat REAL, max_lon REAL);
/// CREATE TABLE interview_sightings (lat REAL NOT NULL, lon REAL NOT NULL, radius REAL NOT NULL);
/// ```
pub struct SqliteKnowledgeBase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKnowledgeBase {
    /// Open (or create) the knowledge base at `db_path`; `":memory:"` for tests
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS clues (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS clue_tags (
                clue_id INTEGER NOT NULL,
                tag TEXT NOT NULL,
                PRIMARY KEY (clue_id, tag)
            );
            CREATE TABLE IF NOT EXISTS human_queries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL,
                asked_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS search_grid (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                min_lat REAL NOT NULL,
                min_lon REAL NOT NULL,
                max_lat REAL NOT NULL,
                max_lon REAL NOT NULL
            );
            CREATE TABLE IF NOT EXISTS interview_sightings (
                lat REAL NOT NULL,
                lon REAL NOT NULL,
                radius REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_clue_tags_tag ON clue_tags(tag);",
        )?;

        tracing::debug!("Knowledge base opened at {}", db_path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ClueMeisterError::KnowledgeBase("connection lock poisoned".to_string()))
    }

    fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[async_trait]
impl KnowledgeBase for SqliteKnowledgeBase {
    async fn add_clue(&self, description: &str) -> Result<ClueId> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO clues (description, created_at) VALUES (?1, ?2)",
            params![description, Utc::now().to_rfc3339()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    async fn get_clues(&self) -> Result<BTreeMap<ClueId, String>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare("SELECT id, description FROM clues")?;
        let clues = stmt
            .query_map([], |row| Ok((row.get::<_, ClueId>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;

        Ok(clues)
    }

    async fn add_clue_tag(&self, clue_id: ClueId, tag: &str) -> Result<()> {
        let conn = self.conn()?;

        let exists = conn
            .query_row("SELECT 1 FROM clues WHERE id = ?", params![clue_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Err(ClueMeisterError::ClueNotFound(clue_id));
        }

        conn.execute(
            "INSERT OR IGNORE INTO clue_tags (clue_id, tag) VALUES (?1, ?2)",
            params![clue_id, tag],
        )?;

        Ok(())
    }

    async fn clue_tags(&self, tag: &str) -> Result<Vec<ClueId>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare("SELECT clue_id FROM clue_tags WHERE tag = ? ORDER BY clue_id")?;
        let ids = stmt
            .query_map(params![tag], |row| row.get::<_, ClueId>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    async fn add_query(&self, query: &str) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO human_queries (query, asked_at) VALUES (?1, ?2)",
            params![query, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }

    async fn pending_queries(&self) -> Result<Vec<HumanQuery>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare("SELECT id, query, asked_at FROM human_queries ORDER BY id")?;
        let queries = stmt
            .query_map([], |row| {
                let asked_at: String = row.get(2)?;
                Ok(HumanQuery {
                    id: row.get(0)?,
                    query: row.get(1)?,
                    asked_at: Self::parse_timestamp(&asked_at).unwrap_or_else(Utc::now),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(queries)
    }

    async fn set_search_grid(&self, grid: SearchGrid) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO search_grid (id, min_lat, min_lon, max_lat, max_lon)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![grid.min_lat, grid.min_lon, grid.max_lat, grid.max_lon],
        )?;

        Ok(())
    }

    async fn is_within_grid(&self, coordinate: Coordinate) -> Result<bool> {
        let conn = self.conn()?;

        let grid = conn
            .query_row(
                "SELECT min_lat, min_lon, max_lat, max_lon FROM search_grid WHERE id = 1",
                [],
                |row| {
                    Ok(SearchGrid {
                        min_lat: row.get(0)?,
                        min_lon: row.get(1)?,
                        max_lat: row.get(2)?,
                        max_lon: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(grid.map_or(true, |g| g.contains(coordinate)))
    }

    async fn add_interview_sighting(&self, coordinate: Coordinate, radius: f64) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO interview_sightings (lat, lon, radius) VALUES (?1, ?2, ?3)",
            params![coordinate.lat, coordinate.lon, radius],
        )?;

        Ok(())
    }

    async fn interview_supports_path(&self, coordinate: Coordinate) -> Result<bool> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare("SELECT lat, lon, radius FROM interview_sightings")?;
        let sightings = stmt
            .query_map([], |row| {
                Ok((Coordinate::new(row.get(0)?, row.get(1)?), row.get::<_, f64>(2)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sightings
            .iter()
            .any(|(point, radius)| coordinate.distance_to(point) <= *radius))
    }

    async fn stats(&self) -> Result<KnowledgeStats> {
        let conn = self.conn()?;

        let total_clues: u64 = conn.query_row("SELECT COUNT(*) FROM clues", [], |row| row.get(0))?;

        let flagged_clues: u64 = conn.query_row(
            "SELECT COUNT(*) FROM clue_tags WHERE tag = ?",
            params![AI_FLAGGED_TAG],
            |row| row.get(0),
        )?;

        let pending_queries: u64 =
            conn.query_row("SELECT COUNT(*) FROM human_queries", [], |row| row.get(0))?;

        let interview_sightings: u64 =
            conn.query_row("SELECT COUNT(*) FROM interview_sightings", [], |row| row.get(0))?;

        let newest_clue = conn
            .query_row("SELECT MAX(created_at) FROM clues", [], |row| {
                row.get::<_, Option<String>>(0)
            })?
            .and_then(|s| Self::parse_timestamp(&s));

        Ok(KnowledgeStats {
            total_clues,
            flagged_clues,
            pending_queries,
            interview_sightings,
            newest_clue,
        })
    }
}
