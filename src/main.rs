use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use stickerkit::cli::{Cli, Commands};
use stickerkit::output::Printer;
use stickerkit::{Settings, StickerError};

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "stickerkit=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli_config: Option<&std::path::Path>) -> stickerkit::Result<Settings> {
    let cwd = std::env::current_dir().map_err(StickerError::from)?;
    Settings::discover(cli_config, &cwd)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let printer = Printer::new().with_verbose(cli.verbose);
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Clean(args) => {
            stickerkit::cli::clean::run(args, &load_settings(config)?, &printer)?;
        }
        Commands::Split(args) => {
            stickerkit::cli::split::run(args, &load_settings(config)?, &printer)?;
        }
        Commands::Compose(args) => {
            stickerkit::cli::compose::run(args, &load_settings(config)?, &printer)?;
        }
        Commands::Process(args) => {
            stickerkit::cli::process::run(args, &load_settings(config)?, &printer)?;
        }
        Commands::Completions(args) => {
            stickerkit::cli::completions::run(args, &mut std::io::stdout())?;
        }
    }

    Ok(())
}
