use hubtok::bundle::fetch_bundle;

use crate::{disk_cache::DiskCacheArgs, logging::LogArgs, model_selector::ModelSelectorArgs};

/// Args for the list command.
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    model_selector: ModelSelectorArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,

    #[clap(flatten)]
    logging: LogArgs,
}

impl ListArgs {
    /// Run the list command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let options = self.model_selector.fetch_options()?;
        let mut disk_cache = self.disk_cache.init_disk_cache()?;
        let bundle = fetch_bundle(&mut disk_cache, &options)?;

        println!(
            "{}@{}{}",
            bundle.model,
            bundle.revision,
            bundle
                .commit
                .as_deref()
                .map(|c| format!(" ({c})"))
                .unwrap_or_default()
        );
        for file in &bundle.files {
            println!("  {:<20} {}", file.kind.to_string(), file.name);
        }

        Ok(())
    }
}
