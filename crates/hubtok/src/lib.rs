//! # `hubtok`
//!
//! Fetch a pretrained tokenizer bundle from a model hub, and save it to a
//! local directory.
//!
//! A bundle is every tokenizer file at the root of a hub repository
//! (`tokenizer.json`, `tokenizer_config.json`, `special_tokens_map.json`,
//! vocabularies, merges, `sentencepiece` models, chat templates).
//! Files are copied as-is; their formats are not interpreted, beyond
//! checking that a `tokenizer.json` loads.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hubtok::{
//!     ModelId,
//!     bundle::FetchOptions,
//!     disk_cache::{HubtokDiskCache, HubtokDiskCacheOptions},
//!     save::SaveOptions,
//! };
//!
//! fn example() -> hubtok::HubtokResult<()> {
//!     let mut disk_cache = HubtokDiskCache::new(HubtokDiskCacheOptions::default())?;
//!
//!     let model: ModelId = "elyza/ELYZA-japanese-Llama-2-7b-instruct".parse()?;
//!     let (_bundle, saved) = hubtok::download_tokenizer(
//!         &mut disk_cache,
//!         &FetchOptions::new(model),
//!         "./",
//!         SaveOptions::default(),
//!     )?;
//!
//!     for path in &saved.written {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]

use std::path::Path;

pub mod bundle;
pub mod errors;
pub mod hub;
pub mod save;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use hubtok_disk_cache as disk_cache;

#[doc(inline)]
pub use errors::{HubtokError, HubtokResult};
#[doc(inline)]
pub use hub::{DEFAULT_MODEL_ID, ModelId, Revision};

use crate::{
    bundle::{FetchOptions, TokenizerBundle, fetch_bundle},
    disk_cache::HubtokDiskCache,
    save::{SaveOptions, SavedBundle, save_bundle},
    validate::validate_bundle,
};

/// Fetch the tokenizer bundle for a model, and save it to `out_dir`.
///
/// The bundle is validated before anything is written.
pub fn download_tokenizer<P: AsRef<Path>>(
    disk_cache: &mut HubtokDiskCache,
    fetch_options: &FetchOptions,
    out_dir: P,
    save_options: SaveOptions,
) -> HubtokResult<(TokenizerBundle, SavedBundle)> {
    let bundle = fetch_bundle(disk_cache, fetch_options)?;
    validate_bundle(&bundle)?;
    let saved = save_bundle(&bundle, out_dir, save_options)?;
    Ok((bundle, saved))
}
