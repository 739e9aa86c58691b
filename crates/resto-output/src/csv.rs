//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `transitions.csv`
//! - `summary.csv`
//! - `pools.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, PoolRow, SummaryRow, TransitionRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    transitions: Writer<File>,
    summary:     Writer<File>,
    pools:       Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut transitions = Writer::from_path(dir.join("transitions.csv"))?;
        transitions.write_record(["entity_id", "channel", "stage", "time"])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record([
            "run",
            "generated",
            "served",
            "balked",
            "pending",
            "average_wait",
            "max_wait",
            "balk_rate",
            "dine_in_served",
            "takeout_served",
        ])?;

        let mut pools = Writer::from_path(dir.join("pools.csv"))?;
        pools.write_record([
            "run",
            "pool",
            "capacity",
            "grants",
            "queued_grants",
            "mean_queue_delay",
            "max_queue_len",
            "utilisation",
        ])?;

        Ok(Self { transitions, summary, pools, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()> {
        for row in rows {
            self.transitions.write_record(&[
                row.entity_id.to_string(),
                row.channel.to_owned(),
                row.stage.to_owned(),
                row.time.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.run.to_string(),
            row.generated.to_string(),
            row.served.to_string(),
            row.balked.to_string(),
            row.pending.to_string(),
            row.average_wait.to_string(),
            row.max_wait.to_string(),
            row.balk_rate.to_string(),
            row.dine_in_served.to_string(),
            row.takeout_served.to_string(),
        ])?;
        Ok(())
    }

    fn write_pools(&mut self, rows: &[PoolRow]) -> OutputResult<()> {
        for row in rows {
            self.pools.write_record(&[
                row.run.to_string(),
                row.pool.clone(),
                row.capacity.to_string(),
                row.grants.to_string(),
                row.queued_grants.to_string(),
                row.mean_queue_delay.to_string(),
                row.max_queue_len.to_string(),
                row.utilisation.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.transitions.flush()?;
        self.summary.flush()?;
        self.pools.flush()?;
        Ok(())
    }
}
