use std::path::PathBuf;

pub mod cli;
pub mod copier;
pub mod dialog;
pub mod kid3;
pub mod package;
pub mod session;
pub mod utils;

/// Default name of the external tag tool looked up on `PATH`.
pub const KID3_CLI: &str = "kid3-cli";

#[derive(Debug, thiserror::Error)]
pub enum TagCopyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Download error: {0}")]
    Download(#[from] Box<ureq::Error>),
    #[error("{0} not found in PATH")]
    ToolNotFound(String),
    #[error("No {0} files selected")]
    NoFilesSelected(&'static str),
    #[error("Source and destination counts do not match ({sources} vs {destinations})")]
    CountMismatch { sources: usize, destinations: usize },
    #[error("Dialog error: {0}")]
    Dialog(String),
    #[error("Invalid version string: {0}")]
    InvalidVersion(String),
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("{program} exited with status {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl From<ureq::Error> for TagCopyError {
    fn from(err: ureq::Error) -> Self {
        TagCopyError::Download(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, TagCopyError>;

// Re-exports for convenience
pub use copier::bulk::{BatchReport, BulkCopier, PairOutcome};
pub use copier::pairing::{FilePair, PairList};
pub use kid3::script::{Kid3Command, Kid3Script};
pub use kid3::tool::{Kid3Cli, TagTool, ToolOutcome};
pub use utils::run_log::{ConsoleRunLog, LogEntry, LogStatus, RunLog, TempRunLog};
