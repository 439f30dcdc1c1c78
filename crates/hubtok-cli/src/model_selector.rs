use std::io::{BufRead, Write};

use hubtok::{
    DEFAULT_MODEL_ID,
    ModelId,
    Revision,
    bundle::FetchOptions,
    hub::{DEFAULT_REVISION, HubEndpoint},
};

/// Model selector arg group.
#[derive(clap::Args, Debug)]
pub struct ModelSelectorArgs {
    /// Hub model id; `name` or `namespace/name`.
    #[arg(long, default_value = DEFAULT_MODEL_ID)]
    model: ModelId,

    /// Read the model id from stdin.
    #[arg(long, conflicts_with = "model")]
    prompt: bool,

    /// Branch, tag, or commit.
    #[arg(long, default_value = DEFAULT_REVISION)]
    revision: Revision,

    /// Hub base URL; defaults to `$HF_ENDPOINT`, then the public hub.
    #[arg(long, default_value = None)]
    endpoint: Option<String>,

    /// Only use cached files; never touch the network.
    #[arg(long, conflicts_with = "refresh")]
    offline: bool,

    /// Discard cached files, and download them again.
    #[arg(long)]
    refresh: bool,
}

impl ModelSelectorArgs {
    /// Resolve the model id, prompting for it if requested.
    pub fn model(&self) -> Result<ModelId, Box<dyn std::error::Error>> {
        if !self.prompt {
            return Ok(self.model.clone());
        }
        let stdin = std::io::stdin();
        let mut reader = stdin.lock();
        let mut writer = std::io::stderr();
        prompt_model_id(&mut reader, &mut writer, &self.model)
    }

    /// Build the fetch options.
    pub fn fetch_options(&self) -> Result<FetchOptions, Box<dyn std::error::Error>> {
        Ok(FetchOptions::new(self.model()?)
            .with_revision(self.revision.clone())
            .with_endpoint(HubEndpoint::resolve(self.endpoint.as_deref()))
            .with_download(!self.offline)
            .with_refresh(self.refresh))
    }
}

/// Ask for a model id; an empty answer selects `default`.
pub fn prompt_model_id(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    default: &ModelId,
) -> Result<ModelId, Box<dyn std::error::Error>> {
    write!(writer, "model [{default}]: ")?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    if line.trim().is_empty() {
        return Ok(default.clone());
    }
    Ok(ModelId::parse(&line)?)
}
