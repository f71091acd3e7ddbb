//! CSV trace of a run.
//!
//! Creates two files in the output directory:
//!
//! | File                   | One row per                          |
//! |------------------------|--------------------------------------|
//! | `hauler_snapshots.csv` | agent per snapshot tick              |
//! | `tick_summaries.csv`   | tick (count of agents not idle)      |

use std::fs::File;
use std::path::Path;

use csv::Writer;
use tracing::warn;

use hl_core::Tick;

use crate::{HaulerSnapshot, SimError, SimObserver, SimResult};

pub const SNAPSHOT_FILE: &str = "hauler_snapshots.csv";
pub const SUMMARY_FILE: &str = "tick_summaries.csv";

/// A [`SimObserver`] writing snapshots and tick summaries as CSV.
///
/// `SimObserver` methods cannot fail, so the first write error is stored and
/// later writes are skipped.  Check [`take_error`][Self::take_error] after
/// `sim.run()` returns.
pub struct CsvTraceObserver {
    snapshots:  Writer<File>,
    summaries:  Writer<File>,
    finished:   bool,
    last_error: Option<SimError>,
}

impl CsvTraceObserver {
    /// Create (or truncate) both files in `dir` and write their headers.
    pub fn new(dir: &Path) -> SimResult<Self> {
        let mut snapshots = Writer::from_path(dir.join(SNAPSHOT_FILE))?;
        snapshots.write_record([
            "tick", "agent", "state", "display", "x", "y", "z",
            "open_site", "carrying_kind", "carrying_count", "cooldown",
        ])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record(["tick", "busy_agents"])?;

        Ok(Self { snapshots, summaries, finished: false, last_error: None })
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush both files.  Calling it again is a no-op.
    pub fn finish(&mut self) -> SimResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }

    fn write_snapshots(&mut self, tick: Tick, rows: &[HaulerSnapshot]) -> SimResult<()> {
        for row in rows {
            let open_site = row.open_site.map(|p| p.to_string()).unwrap_or_default();
            let (kind, count) = row
                .carrying
                .map(|s| (s.kind.0.to_string(), s.count.to_string()))
                .unwrap_or_default();
            self.snapshots.write_record(&[
                tick.0.to_string(),
                row.agent.0.to_string(),
                row.state.as_str().to_string(),
                row.display.as_str().to_string(),
                format!("{:.2}", row.position.x),
                format!("{:.2}", row.position.y),
                format!("{:.2}", row.position.z),
                open_site,
                kind,
                count,
                row.cooldown.to_string(),
            ])?;
        }
        Ok(())
    }

    fn store_err(&mut self, result: SimResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                warn!(error = %e, "trace write failed, later rows are dropped");
                self.last_error = Some(e);
            }
        }
    }
}

impl SimObserver for CsvTraceObserver {
    fn on_tick_end(&mut self, tick: Tick, busy: usize) {
        if self.last_error.is_some() {
            return;
        }
        let result = self
            .summaries
            .write_record(&[tick.0.to_string(), busy.to_string()])
            .map_err(SimError::from);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, haulers: &[HaulerSnapshot]) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.write_snapshots(tick, haulers);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.finish();
        self.store_err(result);
    }
}
