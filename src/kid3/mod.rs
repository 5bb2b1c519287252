//! The kid3-cli sub-command model and the process wrapper that runs it.

pub mod script;
pub mod tool;
