use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod pairing;
mod parsing;
mod recovery;
mod source;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("bin_reads=debug,info")
    } else {
        EnvFilter::new("bin_reads=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Run(args) => {
            cli::run::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Pair(args) => {
            cli::pair::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Missing(args) => {
            cli::missing::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
