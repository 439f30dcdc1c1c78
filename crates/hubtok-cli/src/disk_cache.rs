use hubtok::disk_cache::{HubtokDiskCache, HubtokDiskCacheOptions};

/// Disk cache argument group.
#[derive(clap::Args, Debug)]
pub struct DiskCacheArgs {
    /// Cache directory; defaults to `$HUBTOK_CACHE_DIR`, then the user cache dir.
    #[arg(long, default_value = None)]
    cache_dir: Option<String>,
}

impl DiskCacheArgs {
    /// Initialize the disk cache.
    pub fn init_disk_cache(&self) -> Result<HubtokDiskCache, Box<dyn std::error::Error>> {
        let options = HubtokDiskCacheOptions::default().with_cache_dir(self.cache_dir.as_ref());
        let disk_cache = HubtokDiskCache::new(options)?;
        log::debug!("cache dir: {}", disk_cache.cache_dir().display());
        Ok(disk_cache)
    }
}
