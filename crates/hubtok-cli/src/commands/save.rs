use std::path::PathBuf;

use hubtok::save::SaveOptions;

use crate::{disk_cache::DiskCacheArgs, logging::LogArgs, model_selector::ModelSelectorArgs};

/// Args for the save command.
#[derive(clap::Args, Debug)]
pub struct SaveArgs {
    #[command(flatten)]
    model_selector: ModelSelectorArgs,

    /// Output directory; created if missing.
    #[arg(long, default_value = "./")]
    output: PathBuf,

    /// Leave existing files in the output directory untouched.
    #[arg(long)]
    no_clobber: bool,

    /// Re-serialize `tokenizer.json` with indentation.
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,

    #[clap(flatten)]
    logging: LogArgs,
}

impl SaveArgs {
    /// Run the save command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let fetch_options = self.model_selector.fetch_options()?;
        let save_options = SaveOptions::default()
            .with_clobber(!self.no_clobber)
            .with_pretty(self.pretty);

        let mut disk_cache = self.disk_cache.init_disk_cache()?;
        let (bundle, saved) = hubtok::download_tokenizer(
            &mut disk_cache,
            &fetch_options,
            &self.output,
            save_options,
        )?;

        if let Some(commit) = &bundle.commit {
            log::info!("{}@{} is {commit}", bundle.model, bundle.revision);
        }
        for path in &saved.written {
            println!("{}", path.display());
        }

        Ok(())
    }
}
