use std::process::ExitCode;
use clap::Parser;
use kid3_tag_copy::{
    cli::commands::{Cli, Commands},
    dialog::NativeDialogs,
    package::{HttpDownloader, PackageBuilder, PackageConfig},
    session::{self, EXIT_FAILURE},
    utils::process::SystemRunner,
    Kid3Cli,
};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let interactive = cli.is_interactive();

    let result = match cli.command {
        Some(Commands::Package { version, method, entry, build_dir, output_dir }) => {
            let config = PackageConfig { version, method, entry, build_dir, output_dir };
            PackageBuilder::new(config, SystemRunner, HttpDownloader)
                .build()
                .map(|_| session::EXIT_OK)
        }
        None if interactive => session::run_interactive(
            &NativeDialogs::new(),
            Kid3Cli::locate(&cli.kid3_cli),
            cli.report.as_deref(),
        ),
        None => session::run_batch(
            Kid3Cli::locate(&cli.kid3_cli),
            cli.src,
            cli.dst,
            std::io::stdout(),
            cli.report.as_deref(),
        ),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
