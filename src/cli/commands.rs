use clap::{Parser, Subcommand};
use std::path::PathBuf;
use crate::package::method::BundleMethod;

#[derive(Parser)]
#[command(name = "kid3-tag-copy")]
#[command(version = "1.0")]
#[command(about = "Copy tags from source to destination files using kid3-cli", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Source files, copied from in order
    #[arg(long, num_args = 1.., requires = "dst")]
    pub src: Vec<PathBuf>,

    /// Destination files, written to in order
    #[arg(long, num_args = 1.., requires = "src")]
    pub dst: Vec<PathBuf>,

    /// kid3-cli executable name or path
    #[arg(long = "kid3-cli", env = "KID3_CLI", default_value = crate::KID3_CLI)]
    pub kid3_cli: PathBuf,

    /// Write a CSV summary of every pair to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Dialog mode runs when neither file list was given.
    pub fn is_interactive(&self) -> bool {
        self.src.is_empty() && self.dst.is_empty()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a portable AppImage of the GUI front end
    Package {
        /// Version embedded in the artifact name
        #[arg(default_value = "1.0")]
        version: String,

        /// Bundling backend
        #[arg(long, value_enum, default_value_t = BundleMethod::AppImageTool)]
        method: BundleMethod,

        /// Application entry point to bundle
        #[arg(long, default_value = "kid3-tag-copy.py")]
        entry: PathBuf,

        /// Working directory for the venv and staging directory
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,

        /// Directory receiving the final artifact
        #[arg(short = 'o', long, default_value = "dist")]
        output_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_dialog_mode() {
        let cli = Cli::try_parse_from(["kid3-tag-copy"]).unwrap();
        assert!(cli.is_interactive());
        assert!(cli.command.is_none());
    }

    #[test]
    fn src_and_dst_take_multiple_files() {
        let cli = Cli::try_parse_from([
            "kid3-tag-copy", "--src", "a1.mp3", "a2.mp3", "--dst", "b1.flac", "b2.flac",
        ])
        .unwrap();
        assert!(!cli.is_interactive());
        assert_eq!(cli.src, vec![PathBuf::from("a1.mp3"), PathBuf::from("a2.mp3")]);
        assert_eq!(cli.dst.len(), 2);
    }

    #[test]
    fn src_without_dst_is_a_usage_error() {
        assert!(Cli::try_parse_from(["kid3-tag-copy", "--src", "a1.mp3"]).is_err());
    }

    #[test]
    fn package_defaults() {
        let cli = Cli::try_parse_from(["kid3-tag-copy", "package"]).unwrap();
        match cli.command {
            Some(Commands::Package { version, method, .. }) => {
                assert_eq!(version, "1.0");
                assert_eq!(method, BundleMethod::AppImageTool);
            }
            None => panic!("expected package subcommand"),
        }
    }

    #[test]
    fn package_method_uses_equals_form() {
        let cli = Cli::try_parse_from(["kid3-tag-copy", "package", "2.1", "--method=briefcase"]).unwrap();
        match cli.command {
            Some(Commands::Package { version, method, .. }) => {
                assert_eq!(version, "2.1");
                assert_eq!(method, BundleMethod::Briefcase);
            }
            None => panic!("expected package subcommand"),
        }
    }
}
