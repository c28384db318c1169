use clap::Parser;
use rask_logger::app;
use rask_logger::config::cli::Args;

fn main() -> anyhow::Result<()> {
    app::run(Args::parse())
}
