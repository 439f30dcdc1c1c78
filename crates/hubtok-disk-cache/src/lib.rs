//! # hubtok-disk-cache
#![warn(missing_docs)]

use crate::path_resolver::PathResolver;

pub mod disk_cache;
pub mod path_resolver;
pub mod path_utils;

#[cfg(test)]
pub(crate) mod testing;

pub use disk_cache::{CacheRequest, HubtokDiskCache, HubtokDiskCacheOptions};

/// Environment variable key to override the default cache directory.
pub const HUBTOK_CACHE_DIR: &str = "HUBTOK_CACHE_DIR";

/// Default [`PathResolver`] for hubtok.
pub const HUBTOK_CACHE_CONFIG: PathResolver = PathResolver {
    qualifier: "io.crates.hubtok",
    organization: "",
    application: "hubtok",
    cache_env_vars: &[HUBTOK_CACHE_DIR],
};
