mod commands;
mod disk_cache;
mod logging;
mod model_selector;

use clap::Parser;
use commands::Commands;

/// hubtok: download pretrained tokenizers from a model hub.
#[derive(clap::Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
