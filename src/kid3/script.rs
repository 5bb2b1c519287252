use std::fmt;
use std::path::Path;
use crate::copier::pairing::FilePair;
use crate::{Result, TagCopyError};

/// One kid3-cli sub-command, passed to the tool as a `-c <text>` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kid3Command {
    Cd(String),
    Select(String),
    Copy,
    Paste,
    Save,
}

impl Kid3Command {
    pub fn name(&self) -> &'static str {
        match self {
            Kid3Command::Cd(_) => "cd",
            Kid3Command::Select(_) => "select",
            Kid3Command::Copy => "copy",
            Kid3Command::Paste => "paste",
            Kid3Command::Save => "save",
        }
    }

    /// The text kid3-cli parses for this command, with any argument quoted.
    pub fn render(&self) -> String {
        match self {
            Kid3Command::Cd(dir) => format!("cd {}", quote(dir)),
            Kid3Command::Select(name) => format!("select {}", quote(name)),
            Kid3Command::Copy | Kid3Command::Paste | Kid3Command::Save => self.name().to_string(),
        }
    }
}

impl fmt::Display for Kid3Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Wrap an argument in double quotes, backslash-escaping `\` and `"`.
pub fn quote(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// An ordered list of sub-commands sent to kid3-cli in one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kid3Script {
    commands: Vec<Kid3Command>,
}

impl Kid3Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, command: Kid3Command) -> Self {
        self.commands.push(command);
        self
    }

    /// cd/select the source, copy, cd/select the destination, paste, save.
    pub fn copy_paste(pair: &FilePair) -> Result<Self> {
        let (src_dir, src_name) = split(&pair.source)?;
        let (dst_dir, dst_name) = split(&pair.destination)?;

        Ok(Self::new()
            .push(Kid3Command::Cd(src_dir))
            .push(Kid3Command::Select(src_name))
            .push(Kid3Command::Copy)
            .push(Kid3Command::Cd(dst_dir))
            .push(Kid3Command::Select(dst_name))
            .push(Kid3Command::Paste)
            .push(Kid3Command::Save))
    }

    pub fn commands(&self) -> &[Kid3Command] {
        &self.commands
    }

    /// Argument vector for the tool: `-c <cmd>` for each command.
    pub fn to_args(&self) -> Vec<String> {
        self.commands
            .iter()
            .flat_map(|cmd| ["-c".to_string(), cmd.render()])
            .collect()
    }
}

/// Directory and file name of `path`, both of which must be valid UTF-8
/// since kid3-cli receives them as command text.
fn split(path: &Path) -> Result<(String, String)> {
    let invalid = || TagCopyError::InvalidPath(path.to_path_buf());
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let dir = parent.to_str().ok_or_else(invalid)?;
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    Ok((dir.to_string(), name.to_string()))
}
