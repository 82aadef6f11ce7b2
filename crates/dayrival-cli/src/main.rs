use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = dayrival_cli::Cli::parse();
    dayrival_cli::run_cli(cli)
}
