use std::ffi::OsString;
use std::path::{Path, PathBuf};
use log::debug;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use crate::dialog::viewer::{TailLogViewer, ZENITY};
use crate::dialog::{Dialogs, LogViewer};
use crate::Result;

const TITLE: &str = "Kid3 Tag Copy";

/// Native file and message dialogs, plus a zenity window for the live log.
pub struct NativeDialogs {
    viewer_program: OsString,
}

impl NativeDialogs {
    pub fn new() -> Self {
        Self {
            viewer_program: OsString::from(ZENITY),
        }
    }

    fn message(&self, level: MessageLevel, message: &str) {
        MessageDialog::new()
            .set_level(level)
            .set_title(TITLE)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

impl Default for NativeDialogs {
    fn default() -> Self {
        Self::new()
    }
}

/// A cancelled picker yields no files.
pub fn selection_or_empty(picked: Option<Vec<PathBuf>>) -> Vec<PathBuf> {
    picked.unwrap_or_default()
}

impl Dialogs for NativeDialogs {
    fn error(&self, message: &str) -> Result<()> {
        self.message(MessageLevel::Error, message);
        Ok(())
    }

    fn info(&self, message: &str) -> Result<()> {
        self.message(MessageLevel::Info, message);
        Ok(())
    }

    fn pick_files(&self, title: &str, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        debug!("Opening file dialog: {}", title);
        let picked = FileDialog::new()
            .set_title(title)
            .add_filter("Audio files", extensions)
            .pick_files();
        Ok(selection_or_empty(picked))
    }

    fn spawn_log_viewer(&self, log_path: &Path) -> Result<Box<dyn LogViewer>> {
        let viewer = TailLogViewer::spawn(&self.viewer_program, log_path)?;
        Ok(Box::new(viewer))
    }
}
