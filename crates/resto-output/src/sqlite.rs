//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `transitions`, `summary`, and `pools`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, PoolRow, SummaryRow, TransitionRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS transitions (
                 entity_id INTEGER NOT NULL,
                 channel   TEXT    NOT NULL,
                 stage     TEXT    NOT NULL,
                 time      REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS summary (
                 run            INTEGER PRIMARY KEY,
                 generated      INTEGER NOT NULL,
                 served         INTEGER NOT NULL,
                 balked         INTEGER NOT NULL,
                 pending        INTEGER NOT NULL,
                 average_wait   REAL    NOT NULL,
                 max_wait       REAL    NOT NULL,
                 balk_rate      REAL    NOT NULL,
                 dine_in_served INTEGER NOT NULL,
                 takeout_served INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS pools (
                 run              INTEGER NOT NULL,
                 pool             TEXT    NOT NULL,
                 capacity         INTEGER NOT NULL,
                 grants           INTEGER NOT NULL,
                 queued_grants    INTEGER NOT NULL,
                 mean_queue_delay REAL    NOT NULL,
                 max_queue_len    INTEGER NOT NULL,
                 utilisation      REAL    NOT NULL,
                 PRIMARY KEY (run, pool)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

// SQLite integers are signed; counts and seeds are stored bit-for-bit as i64.
impl OutputWriter for SqliteWriter {
    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO transitions (entity_id, channel, stage, time) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.entity_id as i64,
                    row.channel,
                    row.stage,
                    row.time,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO summary \
             (run, generated, served, balked, pending, average_wait, max_wait, \
              balk_rate, dine_in_served, takeout_served) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.run as i64,
                row.generated as i64,
                row.served as i64,
                row.balked as i64,
                row.pending as i64,
                row.average_wait,
                row.max_wait,
                row.balk_rate,
                row.dine_in_served as i64,
                row.takeout_served as i64,
            ],
        )?;
        Ok(())
    }

    fn write_pools(&mut self, rows: &[PoolRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO pools \
                 (run, pool, capacity, grants, queued_grants, mean_queue_delay, \
                  max_queue_len, utilisation) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.run as i64,
                    row.pool,
                    row.capacity,
                    row.grants as i64,
                    row.queued_grants as i64,
                    row.mean_queue_delay,
                    row.max_queue_len as i64,
                    row.utilisation,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
