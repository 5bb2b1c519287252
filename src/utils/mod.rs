pub mod file_ops;
pub mod process;
pub mod reporting;
pub mod run_log;
