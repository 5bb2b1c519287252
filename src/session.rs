//! End-to-end flows: the dialog-driven run and the `--src`/`--dst` run.
//!
//! Both return the process exit status. Fatal conditions (missing tool,
//! empty selection, count mismatch) yield [`EXIT_FAILURE`]; a finished
//! batch yields [`EXIT_OK`] even when individual pairs failed.

use std::io::Write;
use std::path::{Path, PathBuf};
use log::{info, warn};
use crate::copier::bulk::{BatchReport, BulkCopier};
use crate::copier::pairing::{PairList, AUDIO_EXTENSIONS};
use crate::dialog::Dialogs;
use crate::kid3::tool::TagTool;
use crate::utils::reporting::Reporter;
use crate::utils::run_log::{ConsoleRunLog, RunLog, TempRunLog};
use crate::{Result, TagCopyError};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

fn missing_tool_message(err: &TagCopyError) -> String {
    format!("ERROR: {}. Please install kid3-cli.", err)
}

fn write_report(report: &BatchReport, path: Option<&Path>, log: &mut dyn RunLog) -> Result<()> {
    if let Some(path) = path {
        if let Err(e) = Reporter::new().generate_batch_report(report, path) {
            warn!("Report not written: {}", e);
            log.error(&format!("Could not write report {}: {}", path.display(), e))?;
        }
    }
    Ok(())
}

/// Dialog-driven run: pick sources, pick destinations, copy, summarize.
///
/// The run log lives in a temp file shown by a live viewer. The viewer is
/// declared after the log so it is closed before the file is removed.
pub fn run_interactive<T: TagTool>(
    dialogs: &dyn Dialogs,
    tool: Result<T>,
    report_path: Option<&Path>,
) -> Result<u8> {
    let tool = match tool {
        Ok(tool) => tool,
        Err(e) => {
            dialogs.error(&missing_tool_message(&e))?;
            return Ok(EXIT_FAILURE);
        }
    };

    let mut log = TempRunLog::new()?;
    let _viewer = match dialogs.spawn_log_viewer(log.path()) {
        Ok(viewer) => Some(viewer),
        Err(e) => {
            warn!("Live log viewer unavailable: {}", e);
            None
        }
    };
    info!("Run log at {}", log.path().display());

    let sources = dialogs.pick_files("Select source files (tags are copied from)", AUDIO_EXTENSIONS)?;
    if sources.is_empty() {
        log.error(&TagCopyError::NoFilesSelected("source").to_string())?;
        return Ok(EXIT_FAILURE);
    }

    let destinations =
        dialogs.pick_files("Select destination files (tags are written to)", AUDIO_EXTENSIONS)?;
    if destinations.is_empty() {
        log.error(&TagCopyError::NoFilesSelected("destination").to_string())?;
        return Ok(EXIT_FAILURE);
    }

    let pairs = match PairList::new(sources, destinations) {
        Ok(pairs) => pairs,
        Err(e) => {
            log.error(&e.to_string())?;
            dialogs.error(&e.to_string())?;
            return Ok(EXIT_FAILURE);
        }
    };

    let report = BulkCopier::new(&tool).run(&pairs, &mut log)?;
    write_report(&report, report_path, &mut log)?;

    dialogs.info(&format!(
        "Tag copying completed.\n{} copied, {} failed.",
        report.succeeded(),
        report.failed()
    ))?;
    Ok(EXIT_OK)
}

/// Non-interactive run. Log lines go to `out`, fatal errors to stderr.
pub fn run_batch<T: TagTool, W: Write>(
    tool: Result<T>,
    sources: Vec<PathBuf>,
    destinations: Vec<PathBuf>,
    out: W,
    report_path: Option<&Path>,
) -> Result<u8> {
    let tool = match tool {
        Ok(tool) => tool,
        Err(e) => {
            eprintln!("{}", missing_tool_message(&e));
            return Ok(EXIT_FAILURE);
        }
    };

    let mut log = ConsoleRunLog::new(out);
    let pairs = match PairList::new(sources, destinations) {
        Ok(pairs) => pairs,
        Err(e) => {
            log.error(&e.to_string())?;
            return Ok(EXIT_FAILURE);
        }
    };

    let report = BulkCopier::new(&tool).run(&pairs, &mut log)?;
    write_report(&report, report_path, &mut log)?;
    Ok(EXIT_OK)
}
