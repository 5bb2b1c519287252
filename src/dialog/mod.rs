//! User-facing dialogs. The flows in `session` only talk to the
//! [`Dialogs`] trait, so they can run against a scripted fake in tests.

use std::path::{Path, PathBuf};
use crate::Result;

pub mod native;
pub mod viewer;

pub use native::NativeDialogs;
pub use viewer::TailLogViewer;

/// A running live view of the run log. Dropping the handle closes it.
pub trait LogViewer {}

pub trait Dialogs {
    /// Blocking error message.
    fn error(&self, message: &str) -> Result<()>;

    /// Blocking informational message.
    fn info(&self, message: &str) -> Result<()>;

    /// Multi-select open-file dialog. An empty vec means the user cancelled
    /// or picked nothing.
    fn pick_files(&self, title: &str, extensions: &[&str]) -> Result<Vec<PathBuf>>;

    /// Start a non-blocking window that follows `log_path` as it grows.
    fn spawn_log_viewer(&self, log_path: &Path) -> Result<Box<dyn LogViewer>>;
}
