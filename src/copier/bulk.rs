use serde::Serialize;
use crate::copier::pairing::{FilePair, PairList};
use crate::kid3::script::Kid3Script;
use crate::kid3::tool::TagTool;
use crate::utils::run_log::RunLog;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub index: usize,
    pub pair: FilePair,
    pub success: bool,
    pub detail: String,
}

/// Flattened row used for the CSV report.
#[derive(Debug, Serialize)]
pub struct OutcomeRow<'a> {
    pub index: usize,
    pub source: String,
    pub destination: String,
    pub status: &'static str,
    pub detail: &'a str,
}

impl PairOutcome {
    pub fn row(&self) -> OutcomeRow<'_> {
        OutcomeRow {
            index: self.index,
            source: self.pair.source.display().to_string(),
            destination: self.pair.destination.display().to_string(),
            status: if self.success { "ok" } else { "error" },
            detail: &self.detail,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<PairOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Copies tags pair by pair, in order. A failed pair is logged and the
/// batch moves on to the next one.
pub struct BulkCopier<'a, T: TagTool + ?Sized> {
    tool: &'a T,
}

impl<'a, T: TagTool + ?Sized> BulkCopier<'a, T> {
    pub fn new(tool: &'a T) -> Self {
        Self { tool }
    }

    pub fn run(&self, pairs: &PairList, log: &mut dyn RunLog) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        for (index, pair) in pairs.iter().enumerate() {
            log.ok(&format!(
                "Copying tags from {} to {}",
                pair.source.display(),
                pair.destination.display()
            ))?;

            let copied = match Kid3Script::copy_paste(pair) {
                Ok(script) => {
                    log.ok(&format!("Running: {}", self.tool.describe(&script)))?;
                    self.copy_pair(pair, &script)
                }
                Err(e) => Err(format!("Cannot build kid3-cli commands: {}", e)),
            };
            let (success, detail) = match copied {
                Ok(detail) => (true, detail),
                Err(detail) => (false, detail),
            };
            if success {
                log.ok(&detail)?;
            } else {
                log.error(&detail)?;
            }

            report.outcomes.push(PairOutcome {
                index,
                pair: pair.clone(),
                success,
                detail,
            });
        }

        println!(
            "Processed {} pair(s): {} copied, {} failed",
            report.outcomes.len(),
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    fn copy_pair(&self, pair: &FilePair, script: &Kid3Script) -> std::result::Result<String, String> {
        let outcome = self
            .tool
            .run_script(script)
            .map_err(|e| format!("Failed to run kid3-cli for {}: {}", pair.destination.display(), e))?;

        if outcome.success {
            Ok(format!("Tags copied to {}", pair.destination.display()))
        } else {
            let code = outcome
                .code
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let stderr = outcome.stderr.trim();
            let mut detail = format!(
                "Copying tags to {} failed (exit status {})",
                pair.destination.display(),
                code
            );
            if !stderr.is_empty() {
                detail.push_str(": ");
                detail.push_str(stderr);
            }
            Err(detail)
        }
    }
}
