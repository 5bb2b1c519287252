use std::ffi::OsStr;
use std::path::Path;
use std::process::{Child, Stdio};
use log::{debug, warn};
use crate::dialog::LogViewer;
use crate::utils::process::Invocation;
use crate::{Result, TagCopyError};

pub const ZENITY: &str = "zenity";
const TITLE: &str = "Kid3 Tag Copy log";

/// `tail` replays the log from its first line and keeps following it.
pub fn tail_invocation(log_path: &Path) -> Invocation {
    Invocation::new("tail").args(["-n", "+1", "-f"]).arg(log_path)
}

/// The text window reads lines from stdin and scrolls as they arrive.
pub fn text_info_invocation(program: &OsStr) -> Invocation {
    Invocation::new(program)
        .arg("--text-info")
        .arg(format!("--title={}", TITLE))
        .arg("--auto-scroll")
        .arg("--width=800")
        .arg("--height=500")
}

/// `tail -f <log> | zenity --text-info`, both terminated on drop.
pub struct TailLogViewer {
    tail: Child,
    window: Child,
}

impl TailLogViewer {
    pub fn spawn(program: &OsStr, log_path: &Path) -> Result<Self> {
        let mut tail = tail_invocation(log_path)
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let Some(feed) = tail.stdout.take() else {
            stop(&mut tail, "log tail");
            return Err(TagCopyError::Dialog("log tail has no output pipe".to_string()));
        };

        let window = text_info_invocation(program)
            .to_command()
            .stdin(Stdio::from(feed))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match window {
            Ok(window) => {
                debug!("Log viewer started (tail pid {}, window pid {})", tail.id(), window.id());
                Ok(Self { tail, window })
            }
            Err(e) => {
                stop(&mut tail, "log tail");
                Err(e.into())
            }
        }
    }
}

fn stop(child: &mut Child, what: &str) {
    let pid = child.id();
    if let Err(e) = child.kill() {
        // Already gone, e.g. the user closed the window
        debug!("{} {} not killed: {}", what, pid, e);
    }
    if let Err(e) = child.wait() {
        warn!("Failed to reap {} {}: {}", what, pid, e);
    }
}

impl LogViewer for TailLogViewer {}

impl Drop for TailLogViewer {
    fn drop(&mut self) {
        stop(&mut self.window, "log window");
        stop(&mut self.tail, "log tail");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_starts_from_first_line_and_follows() {
        let inv = tail_invocation(Path::new("/tmp/run.log"));
        assert_eq!(inv.program, "tail");
        assert_eq!(inv.args, ["-n", "+1", "-f", "/tmp/run.log"]);
    }

    #[test]
    fn window_reads_stdin_instead_of_a_file() {
        let inv = text_info_invocation(OsStr::new(ZENITY));
        assert_eq!(inv.args[0], "--text-info");
        assert!(inv.args.iter().any(|a| *a == "--auto-scroll"));
        assert!(!inv.args.iter().any(|a| *a == "--filename"));
    }

    #[test]
    fn missing_window_program_stops_the_tail() {
        let log = tempfile::NamedTempFile::new().unwrap();
        let result = TailLogViewer::spawn(OsStr::new("/nonexistent/zenity"), log.path());
        assert!(matches!(result, Err(TagCopyError::Io(_))));
    }
}
