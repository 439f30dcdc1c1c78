mod inspect;
mod list;
mod save;

/// Subcommands for hubtok
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Download a tokenizer, and save it to a directory.
    Save(save::SaveArgs),

    /// List the tokenizer files of a model.
    #[clap(visible_alias = "ls")]
    List(list::ListArgs),

    /// Summarize a saved tokenizer.
    Inspect(inspect::InspectArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Save(cmd) => cmd.run(),
            Commands::List(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
        }
    }
}
