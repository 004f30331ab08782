use airquality_processor::cli::{init_logging, run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level(), cli.log_file.as_deref())?;
    run(cli)
}
