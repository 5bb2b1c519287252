use std::path::Path;
use csv::Writer;
use crate::copier::bulk::BatchReport;
use crate::Result;

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// One CSV row per pair: index, source, destination, status, detail.
    pub fn generate_batch_report(&self, report: &BatchReport, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path_ref = output_path.as_ref();
        let mut writer = Writer::from_path(output_path_ref)?;

        if report.outcomes.is_empty() {
            writer.write_record(["index", "source", "destination", "status", "detail"])?;
        }
        for outcome in &report.outcomes {
            writer.serialize(outcome.row())?;
        }

        writer.flush()?;
        println!("Report generated: {}", output_path_ref.display());
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
