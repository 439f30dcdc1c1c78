//! # Saving Bundles

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    bundle::{ArtifactKind, BundleFile, TokenizerBundle},
    errors::{HubtokError, HubtokResult},
    validate::load_tokenizer,
};

/// Options for [`save_bundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Overwrite existing files in the output directory.
    pub clobber: bool,

    /// Re-serialize `tokenizer.json` with indentation.
    pub pretty: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            clobber: true,
            pretty: false,
        }
    }
}

impl SaveOptions {
    /// Set whether existing files are overwritten.
    pub fn with_clobber(
        mut self,
        clobber: bool,
    ) -> Self {
        self.clobber = clobber;
        self
    }

    /// Set whether `tokenizer.json` is pretty-printed.
    pub fn with_pretty(
        mut self,
        pretty: bool,
    ) -> Self {
        self.pretty = pretty;
        self
    }
}

/// The result of [`save_bundle`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedBundle {
    /// The output directory.
    pub dir: PathBuf,

    /// Files written.
    pub written: Vec<PathBuf>,

    /// Existing files left in place.
    pub skipped: Vec<PathBuf>,
}

/// Write every bundle file into `out_dir`, under its repository name.
///
/// `out_dir` is created if it does not exist.
pub fn save_bundle<P: AsRef<Path>>(
    bundle: &TokenizerBundle,
    out_dir: P,
    options: SaveOptions,
) -> HubtokResult<SavedBundle> {
    let out_dir = out_dir.as_ref();
    if bundle.is_empty() {
        return Err(HubtokError::EmptyBundle {
            model: bundle.model.to_string(),
            revision: bundle.revision.to_string(),
        });
    }

    fs::create_dir_all(out_dir)?;

    let mut saved = SavedBundle {
        dir: out_dir.to_path_buf(),
        ..Default::default()
    };

    for file in &bundle.files {
        let target = out_dir.join(&file.name);
        if target.exists() && !options.clobber {
            log::warn!("exists, skipping: {}", target.display());
            saved.skipped.push(target);
            continue;
        }

        write_file(file, &target, options)?;
        log::debug!("wrote: {}", target.display());
        saved.written.push(target);
    }

    log::info!(
        "saved {} file(s) to {}",
        saved.written.len(),
        out_dir.display()
    );
    Ok(saved)
}

fn write_file(
    file: &BundleFile,
    target: &Path,
    options: SaveOptions,
) -> HubtokResult<()> {
    if !file.path.exists() {
        return Err(HubtokError::MissingArtifact(file.path.display().to_string()));
    }

    if options.pretty && file.kind == ArtifactKind::TokenizerJson {
        let tokenizer = load_tokenizer(&file.path)?;
        tokenizer.save(target, true)?;
        return Ok(());
    }

    fs::copy(&file.path, target)?;
    Ok(())
}
