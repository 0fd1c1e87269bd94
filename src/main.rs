use clap::Parser;
use tracing_subscriber::EnvFilter;

use interlinear::catalog::corpus::Corpus;
use interlinear::{cli, web};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("interlinear=debug,info")
    } else {
        EnvFilter::new("interlinear=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let corpus = Corpus::open(&cli.corpus);
    tracing::debug!("Using corpus at {}", cli.corpus.display());

    match cli.command {
        cli::Commands::Link(args) => {
            cli::link::run(args, cli.format, &corpus, cli.verbose)?;
        }
        cli::Commands::Compose(args) => {
            cli::compose::run(args, cli.format, &corpus, cli.verbose)?;
        }
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, cli.format, &corpus, cli.verbose)?;
        }
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, cli.format, &corpus, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args, corpus)?;
        }
    }

    Ok(())
}
