//! # Tokenizer Bundles
//!
//! A tokenizer bundle is the set of tokenizer files published at the root
//! of a hub repository. Bundles are fetched through the disk cache:
//!
//! ```text
//! $CACHE/hub/<namespace>/<name>/<revision>/.model_info.json
//! $CACHE/hub/<namespace>/<name>/<revision>/tokenizer.json
//! $CACHE/hub/<namespace>/<name>/<revision>/...
//! ```

mod artifact_kind;

#[doc(inline)]
pub use artifact_kind::*;

use std::path::PathBuf;

use crate::{
    disk_cache::{CacheRequest, HubtokDiskCache},
    errors::{HubtokError, HubtokResult},
    hub::{HubEndpoint, ModelId, RepoListing, Revision},
};

/// Cache file name for the repository listing.
///
/// The leading `.` keeps it clear of repository file names.
pub const LISTING_FILE_NAME: &str = ".model_info.json";

/// Top-level cache directory for hub downloads.
const HUB_KEY: &str = "hub";

/// Options for [`fetch_bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// The repository to fetch from.
    pub model: ModelId,

    /// The revision to fetch.
    pub revision: Revision,

    /// The hub to fetch from.
    pub endpoint: HubEndpoint,

    /// Permit network downloads; when `false`, only the cache is used.
    pub download: bool,

    /// Discard cached copies and download again.
    pub refresh: bool,
}

impl FetchOptions {
    /// Create options for `model` at the default revision.
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            revision: Revision::default(),
            endpoint: HubEndpoint::resolve(None),
            download: true,
            refresh: false,
        }
    }

    /// Set the revision.
    pub fn with_revision(
        mut self,
        revision: Revision,
    ) -> Self {
        self.revision = revision;
        self
    }

    /// Set the hub endpoint.
    pub fn with_endpoint(
        mut self,
        endpoint: HubEndpoint,
    ) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set whether network downloads are permitted.
    pub fn with_download(
        mut self,
        download: bool,
    ) -> Self {
        self.download = download;
        self
    }

    /// Set whether cached copies are discarded.
    pub fn with_refresh(
        mut self,
        refresh: bool,
    ) -> Self {
        self.refresh = refresh;
        self
    }

    /// Whether cached copies should be evicted before fetching.
    ///
    /// A refresh without download permission keeps the cache; evicting
    /// would only lose files that cannot be fetched again.
    pub fn evicts_cache(&self) -> bool {
        if self.refresh && !self.download {
            log::warn!("refresh ignored while downloads are disabled");
        }
        self.refresh && self.download
    }

    /// The cache path context for this model and revision.
    pub fn cache_context(&self) -> Vec<String> {
        let mut context = vec![HUB_KEY.to_string()];
        context.extend(self.model.segments().map(str::to_string));
        context.push(self.revision.cache_key());
        context
    }
}

/// A single file of a [`TokenizerBundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    /// The repository file name.
    pub name: String,

    /// The role of the file.
    pub kind: ArtifactKind,

    /// The local (cached) copy.
    pub path: PathBuf,
}

/// The tokenizer files of a repository at one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerBundle {
    /// The repository.
    pub model: ModelId,

    /// The requested revision.
    pub revision: Revision,

    /// The commit the revision resolved to, if known.
    pub commit: Option<String>,

    /// The bundle files, sorted by name.
    pub files: Vec<BundleFile>,
}

impl TokenizerBundle {
    /// The number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Is the bundle empty?
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The first file of the given kind.
    pub fn file(
        &self,
        kind: ArtifactKind,
    ) -> Option<&BundleFile> {
        self.files.iter().find(|f| f.kind == kind)
    }

    /// The `tokenizer.json` file, if the bundle has one.
    pub fn tokenizer_json(&self) -> Option<&BundleFile> {
        self.file(ArtifactKind::TokenizerJson)
    }
}

/// Select the tokenizer artifacts from a listing, sorted by name.
pub fn select_artifacts(listing: &RepoListing) -> Vec<(String, ArtifactKind)> {
    let mut artifacts: Vec<(String, ArtifactKind)> = listing
        .file_names()
        .filter_map(|name| ArtifactKind::classify(name).map(|kind| (name.to_string(), kind)))
        .collect();
    artifacts.sort();
    artifacts.dedup();
    artifacts
}

/// Load the repository listing through the disk cache.
pub fn fetch_listing(
    disk_cache: &mut HubtokDiskCache,
    options: &FetchOptions,
) -> HubtokResult<RepoListing> {
    let context = options.cache_context();
    if options.evicts_cache() {
        disk_cache.evict(&context, LISTING_FILE_NAME)?;
    }

    let url = options
        .endpoint
        .listing_url(&options.model, &options.revision);
    log::debug!("listing: {url}");
    let path = disk_cache.load_cached_path(&context, LISTING_FILE_NAME, &[url], options.download)?;

    match RepoListing::from_path(&path) {
        Ok(listing) => Ok(listing),
        Err(err) => {
            // A bad listing would otherwise be served from the cache forever.
            disk_cache.evict(&context, LISTING_FILE_NAME)?;
            Err(err)
        }
    }
}

/// Fetch the tokenizer bundle for a model.
///
/// # Errors
/// * [`HubtokError::EmptyBundle`] if the repository has no tokenizer files.
/// * [`HubtokError::Download`] if the listing or any file cannot be loaded.
pub fn fetch_bundle(
    disk_cache: &mut HubtokDiskCache,
    options: &FetchOptions,
) -> HubtokResult<TokenizerBundle> {
    log::info!("fetching tokenizer: {}@{}", options.model, options.revision);

    let listing = fetch_listing(disk_cache, options)?;
    let artifacts = select_artifacts(&listing);
    if artifacts.is_empty() {
        return Err(HubtokError::EmptyBundle {
            model: options.model.to_string(),
            revision: options.revision.to_string(),
        });
    }

    let context = options.cache_context();
    if options.refresh && options.download {
        for (name, _) in &artifacts {
            disk_cache.evict(&context, name)?;
        }
    }

    let requests: Vec<CacheRequest> = artifacts
        .iter()
        .map(|(name, _)| {
            CacheRequest::new(
                name.as_str(),
                vec![
                    options
                        .endpoint
                        .file_url(&options.model, &options.revision, name),
                ],
            )
        })
        .collect();
    let paths = disk_cache.load_cached_paths(&context, &requests, options.download)?;

    let files: Vec<BundleFile> = artifacts
        .into_iter()
        .zip(paths)
        .map(|((name, kind), path)| BundleFile { name, kind, path })
        .collect();

    for file in &files {
        log::debug!("{}: {}", file.kind, file.path.display());
    }
    log::info!("fetched {} tokenizer file(s)", files.len());

    Ok(TokenizerBundle {
        model: options.model.clone(),
        revision: options.revision.clone(),
        commit: listing.sha,
        files,
    })
}
