use std::path::PathBuf;

use hubtok::validate::inspect_dir;

use crate::logging::LogArgs;

/// Args for the inspect command.
#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Directory holding a saved `tokenizer.json`.
    dir: PathBuf,

    #[clap(flatten)]
    logging: LogArgs,
}

impl InspectArgs {
    /// Run the inspect command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let summary = inspect_dir(&self.dir)?;

        println!("vocab_size: {}", summary.vocab_size);
        println!("added_tokens: {}", summary.added_tokens.len());
        for token in &summary.added_tokens {
            println!(
                "  {:>8} {:?}{}",
                token.id,
                token.content,
                if token.special { " (special)" } else { "" }
            );
        }

        Ok(())
    }
}
