//! Offline cache fixtures.

use std::fs;

use tempdir::TempDir;

use crate::{
    bundle::{FetchOptions, LISTING_FILE_NAME},
    disk_cache::{HubtokDiskCache, HubtokDiskCacheOptions},
    hub::{HubEndpoint, ModelId},
};

/// A two-token `WordLevel` tokenizer.
pub const MINIMAL_TOKENIZER_JSON: &str = r#"{"version":"1.0","truncation":null,"padding":null,"added_tokens":[],"normalizer":null,"pre_tokenizer":null,"post_processor":null,"decoder":null,"model":{"type":"WordLevel","vocab":{"hello":0,"[UNK]":1},"unk_token":"[UNK]"}}"#;

/// [`MINIMAL_TOKENIZER_JSON`], plus a special `<s>` token.
pub const SPECIAL_TOKENIZER_JSON: &str = r#"{"version":"1.0","truncation":null,"padding":null,"added_tokens":[{"id":2,"content":"<s>","single_word":false,"lstrip":false,"rstrip":false,"normalized":false,"special":true}],"normalizer":null,"pre_tokenizer":null,"post_processor":null,"decoder":null,"model":{"type":"WordLevel","vocab":{"hello":0,"[UNK]":1},"unk_token":"[UNK]"}}"#;

/// A disk cache rooted at `dir/cache`.
pub fn temp_disk_cache(dir: &TempDir) -> HubtokDiskCache {
    HubtokDiskCache::new(
        HubtokDiskCacheOptions::default().with_cache_dir(Some(dir.path().join("cache"))),
    )
    .unwrap()
}

/// Write a listing and the named repository files into the cache.
pub fn populate_cache(
    disk_cache: &HubtokDiskCache,
    options: &FetchOptions,
    sha: Option<&str>,
    files: &[(&str, &str)],
) {
    let context = options.cache_context();

    let siblings: Vec<serde_json::Value> = files
        .iter()
        .map(|(name, _)| serde_json::json!({ "rfilename": name }))
        .collect();
    let listing = serde_json::json!({
        "id": options.model.as_str(),
        "sha": sha,
        "siblings": siblings,
    });

    let listing_path = disk_cache.cache_path(&context, LISTING_FILE_NAME);
    fs::create_dir_all(listing_path.parent().unwrap()).unwrap();
    fs::write(&listing_path, listing.to_string()).unwrap();

    for (name, content) in files {
        fs::write(disk_cache.cache_path(&context, name), content).unwrap();
    }
}

/// An offline cache pre-populated with `files` for `test-org/test-model`.
pub fn offline_fixture(
    dir: &TempDir,
    files: &[(&str, &str)],
) -> (HubtokDiskCache, FetchOptions) {
    let disk_cache = temp_disk_cache(dir);
    let options = FetchOptions::new(ModelId::parse("test-org/test-model").unwrap())
        .with_endpoint(HubEndpoint::new("http://hub.invalid"))
        .with_download(false);
    populate_cache(&disk_cache, &options, None, files);
    (disk_cache, options)
}
