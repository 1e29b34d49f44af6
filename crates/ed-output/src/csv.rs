//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `snapshots.csv`
//! - `summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{OutputResult, SnapshotRow, SummaryRow};
use crate::writer::OutputWriter;

const SNAPSHOT_HEADER: [&str; 17] = [
    "time", "intake", "purple", "red", "orange", "yellow", "teal", "reassessment",
    "call_takers_busy", "stcs_busy", "ambulances_busy", "reassessors_busy",
    "calls_created", "dispatched", "closed", "cancelled", "teal_bounced",
];

const SUMMARY_HEADER: [&str; 29] = [
    "outcome", "end_time", "calls_created", "calls_triaged", "dispatched",
    "closed_by_clinician", "cancelled_by_reassessment", "teal_bounced", "teal_deferred",
    "reassessments_started", "reassessments_completed", "open_calls",
    "mean_to_dispatch", "mean_to_close", "mean_to_cancel",
    "purple_wait_mean", "purple_wait_max", "red_wait_mean", "red_wait_max",
    "orange_wait_mean", "orange_wait_max", "yellow_wait_mean", "yellow_wait_max",
    "teal_wait_mean", "teal_wait_max",
    "call_takers_mean_busy", "stcs_mean_busy", "ambulances_mean_busy", "reassessors_mean_busy",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summary:   Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files in it and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(SUMMARY_HEADER)?;

        Ok(Self {
            snapshots,
            summary,
            finished: false,
        })
    }
}

/// Empty cell for a mean that has no samples.
fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.3}")).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_snapshot(&mut self, row: &SnapshotRow) -> OutputResult<()> {
        self.snapshots.write_record(&[
            format!("{:.3}", row.time),
            row.intake.to_string(),
            row.purple.to_string(),
            row.red.to_string(),
            row.orange.to_string(),
            row.yellow.to_string(),
            row.teal.to_string(),
            row.reassessment.to_string(),
            row.call_takers_busy.to_string(),
            row.stcs_busy.to_string(),
            row.ambulances_busy.to_string(),
            row.reassessors_busy.to_string(),
            row.calls_created.to_string(),
            row.dispatched.to_string(),
            row.closed.to_string(),
            row.cancelled.to_string(),
            row.teal_bounced.to_string(),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        let mut record = vec![
            row.outcome.to_string(),
            format!("{:.3}", row.end_time),
            row.calls_created.to_string(),
            row.calls_triaged.to_string(),
            row.dispatched.to_string(),
            row.closed_by_clinician.to_string(),
            row.cancelled_by_reassessment.to_string(),
            row.teal_bounced.to_string(),
            row.teal_deferred.to_string(),
            row.reassessments_started.to_string(),
            row.reassessments_completed.to_string(),
            row.open_calls.to_string(),
            opt(row.mean_to_dispatch),
            opt(row.mean_to_close),
            opt(row.mean_to_cancel),
        ];
        for (mean, max) in row.dispatch_wait {
            record.push(opt(mean));
            record.push(opt(max));
        }
        record.push(opt(row.teal_wait_mean));
        record.push(opt(row.teal_wait_max));
        for busy in [
            row.call_takers_mean_busy,
            row.stcs_mean_busy,
            row.ambulances_mean_busy,
            row.reassessors_mean_busy,
        ] {
            record.push(format!("{busy:.3}"));
        }
        self.summary.write_record(&record)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
