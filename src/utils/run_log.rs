use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Ok,
    Error,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Ok => "OK",
            LogStatus::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub status: LogStatus,
    pub message: String,
}

impl LogEntry {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { status: LogStatus::Ok, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: LogStatus::Error, message: message.into() }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_str(), self.message)
    }
}

/// Append-only sink for the `[OK]` / `[ERROR]` lines of one run.
pub trait RunLog {
    fn append(&mut self, entry: LogEntry) -> Result<()>;

    fn ok(&mut self, message: &str) -> Result<()> {
        self.append(LogEntry::ok(message))
    }

    fn error(&mut self, message: &str) -> Result<()> {
        self.append(LogEntry::error(message))
    }
}

fn mirror(entry: &LogEntry) {
    match entry.status {
        LogStatus::Ok => log::info!("{}", entry.message),
        LogStatus::Error => log::error!("{}", entry.message),
    }
}

/// Run log backed by a uniquely named temporary file. The file is
/// removed when the log is dropped.
pub struct TempRunLog {
    file: NamedTempFile,
}

impl TempRunLog {
    pub fn new() -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("kid3-tag-copy-")
            .suffix(".log")
            .tempfile()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl RunLog for TempRunLog {
    fn append(&mut self, entry: LogEntry) -> Result<()> {
        mirror(&entry);
        let file = self.file.as_file_mut();
        writeln!(file, "{}", entry)?;
        file.flush()?;
        Ok(())
    }
}

/// Run log that writes lines to any writer, stdout in the
/// non-interactive mode.
pub struct ConsoleRunLog<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRunLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RunLog for ConsoleRunLog<W> {
    fn append(&mut self, entry: LogEntry) -> Result<()> {
        mirror(&entry);
        writeln!(self.out, "{}", entry)?;
        self.out.flush()?;
        Ok(())
    }
}
