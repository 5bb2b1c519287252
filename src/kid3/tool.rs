use std::path::{Path, PathBuf};
use log::debug;
use crate::kid3::script::Kid3Script;
use crate::utils::process::{find_on_path, Invocation, Runner, SystemRunner};
use crate::{Result, TagCopyError};

/// Result of one tag-tool invocation. Only the exit status decides success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

/// The external engine that reads and writes tags.
pub trait TagTool {
    fn run_script(&self, script: &Kid3Script) -> Result<ToolOutcome>;

    /// Command line shown in the run log before `script` is run.
    fn describe(&self, script: &Kid3Script) -> String {
        format!("{} {}", crate::KID3_CLI, script.to_args().join(" "))
    }
}

impl<T: TagTool + ?Sized> TagTool for &T {
    fn run_script(&self, script: &Kid3Script) -> Result<ToolOutcome> {
        (**self).run_script(script)
    }

    fn describe(&self, script: &Kid3Script) -> String {
        (**self).describe(script)
    }
}

pub struct Kid3Cli<R: Runner = SystemRunner> {
    program: PathBuf,
    runner: R,
}

impl Kid3Cli<SystemRunner> {
    /// Resolve `program` on `PATH`, failing with `ToolNotFound` if it is absent.
    pub fn locate(program: impl AsRef<Path>) -> Result<Self> {
        let program = program.as_ref();
        let resolved = find_on_path(program)
            .ok_or_else(|| TagCopyError::ToolNotFound(program.display().to_string()))?;
        debug!("Using tag tool at {}", resolved.display());
        Ok(Self::with_runner(resolved, SystemRunner))
    }
}

impl<R: Runner> Kid3Cli<R> {
    pub fn with_runner(program: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    pub fn invocation(&self, script: &Kid3Script) -> Invocation {
        Invocation::new(&self.program).args(script.to_args())
    }
}

impl<R: Runner> TagTool for Kid3Cli<R> {
    fn run_script(&self, script: &Kid3Script) -> Result<ToolOutcome> {
        let invocation = self.invocation(script);
        let output = self.runner.run(&invocation)?;
        Ok(ToolOutcome {
            success: output.success,
            code: output.code,
            stderr: output.stderr,
        })
    }

    fn describe(&self, script: &Kid3Script) -> String {
        self.invocation(script).to_string()
    }
}
