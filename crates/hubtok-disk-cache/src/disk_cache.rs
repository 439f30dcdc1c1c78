//! # Hubtok Disk Cache

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use downloader::{Download, Downloader};

use crate::{HUBTOK_CACHE_CONFIG, path_utils};

/// Options for [`HubtokDiskCache`].
#[derive(Clone, Default, Debug)]
pub struct HubtokDiskCacheOptions {
    /// Optional path to the cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Optional [`Downloader`] builder.
    pub downloader: Option<fn() -> Downloader>,
}

impl HubtokDiskCacheOptions {
    /// Set the cache directory.
    pub fn with_cache_dir<P: AsRef<Path>>(
        mut self,
        cache_dir: Option<P>,
    ) -> Self {
        self.cache_dir = cache_dir.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Set the downloader builder.
    pub fn with_downloader(
        mut self,
        downloader: Option<fn() -> Downloader>,
    ) -> Self {
        self.downloader = downloader;
        self
    }
}

/// A single file to be served from the cache, or fetched into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheRequest {
    /// The file name, relative to the request context.
    pub file_name: String,

    /// Mirror URLs to download the file from, tried in order.
    pub urls: Vec<String>,
}

impl CacheRequest {
    /// Create a new [`CacheRequest`].
    pub fn new<F: Into<String>>(
        file_name: F,
        urls: Vec<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            urls,
        }
    }
}

/// Disk cache for downloaded files.
///
/// Leverages [`Downloader`] for downloading files,
/// and [`PathResolver`](`crate::path_resolver::PathResolver`) for resolving a cache path
/// appropriate for a user/system combo, and any environment overrides.
pub struct HubtokDiskCache {
    /// Cache directory.
    cache_dir: PathBuf,

    /// Connection pool for downloading files.
    downloader: Downloader,
}

impl HubtokDiskCache {
    /// Construct a new [`HubtokDiskCache`].
    pub fn new(options: HubtokDiskCacheOptions) -> anyhow::Result<Self> {
        let cache_dir = HUBTOK_CACHE_CONFIG
            .resolve_cache_dir(options.cache_dir)
            .context("failed to resolve cache directory")?;

        let downloader = match options.downloader {
            Some(builder) => builder(),
            None => Downloader::builder()
                .build()
                .context("failed to build downloader")?,
        };

        Ok(Self {
            cache_dir,
            downloader,
        })
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the downloader.
    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Get the cache path for the given key.
    ///
    /// * Does not check that the path exists.
    /// * Does not initialize the containing directories.
    ///
    /// # Arguments
    /// * `context` - prefix dirs, inserted between `self.cache_dir` and `file`.
    /// * `file` - the final file name.
    pub fn cache_path<C, F>(
        &self,
        context: &[C],
        file: F,
    ) -> PathBuf
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
    {
        path_utils::extend_path(&self.cache_dir, context, file)
    }

    /// Remove a cached file, if present.
    ///
    /// Returns `true` if a file was removed.
    pub fn evict<C, F>(
        &self,
        context: &[C],
        file: F,
    ) -> anyhow::Result<bool>
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
    {
        let path = self.cache_path(context, file);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("failed to evict cached file: {}", path.display()))?;
        log::debug!("evicted: {}", path.display());
        Ok(true)
    }

    /// Loads a cached file, downloading it if it does not exist.
    ///
    /// # Arguments
    /// * `context` - prefix dirs for the cache location.
    /// * `file_name` - the file name under `context`.
    /// * `urls` - mirror URLs for the file.
    /// * `download` - whether a missing file may be downloaded.
    ///
    /// # Errors
    /// * The cached file does not exist and `download` is `false`.
    /// * The download fails.
    pub fn load_cached_path<C, S>(
        &mut self,
        context: &[C],
        file_name: &str,
        urls: &[S],
        download: bool,
    ) -> anyhow::Result<PathBuf>
    where
        C: AsRef<Path>,
        S: AsRef<str>,
    {
        let request = CacheRequest::new(
            file_name,
            urls.iter().map(|s| s.as_ref().to_string()).collect(),
        );
        let mut paths = self.load_cached_paths(context, &[request], download)?;
        paths
            .pop()
            .context("downloader returned no paths for a single request")
    }

    /// Loads a batch of cached files, downloading the missing ones.
    ///
    /// Missing files are handed to the [`Downloader`] in a single call,
    /// which fetches them in parallel.
    ///
    /// Returns the cache paths in request order.
    ///
    /// # Errors
    /// * Any cached file does not exist and `download` is `false`.
    /// * Any download fails, or leaves no file behind.
    pub fn load_cached_paths<C>(
        &mut self,
        context: &[C],
        requests: &[CacheRequest],
        download: bool,
    ) -> anyhow::Result<Vec<PathBuf>>
    where
        C: AsRef<Path>,
    {
        let paths: Vec<PathBuf> = requests
            .iter()
            .map(|r| self.cache_path(context, &r.file_name))
            .collect();

        let mut downloads = Vec::new();
        let mut pending = Vec::new();
        for (request, path) in requests.iter().zip(&paths) {
            if path.exists() {
                log::debug!("cache hit: {}", path.display());
                continue;
            }
            if !download {
                anyhow::bail!("cached file not found: {}", path.display());
            }
            if request.urls.is_empty() {
                anyhow::bail!("no download urls for: {}", request.file_name);
            }

            let parent = path
                .parent()
                .with_context(|| format!("cache path has no parent: {}", path.display()))?;
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create cache dir: {}", parent.display()))?;

            // Downloads land in `<name>.part`; only complete files take the cache name.
            let part = part_path(path);
            if part.exists() {
                fs::remove_file(&part)
                    .with_context(|| format!("failed to remove stale file: {}", part.display()))?;
            }

            let urls: Vec<&str> = request.urls.iter().map(|s| s.as_str()).collect();
            let mut dl = Download::new_mirrored(&urls);
            dl.file_name = part.clone();
            downloads.push(dl);
            pending.push((part, path.clone(), request.urls.join(", ")));
        }

        if downloads.is_empty() {
            return Ok(paths);
        }

        log::info!("downloading {} file(s)", downloads.len());
        if let Err(err) = self.fetch_pending(&downloads, &pending) {
            for (part, _, _) in &pending {
                if part.exists() {
                    let _ = fs::remove_file(part);
                }
            }
            return Err(err);
        }

        Ok(paths)
    }

    /// Run a batch of downloads, and move each completed `.part` file into place.
    ///
    /// The batch fails as a whole; the caller removes any `.part` leftovers.
    fn fetch_pending(
        &mut self,
        downloads: &[Download],
        pending: &[(PathBuf, PathBuf, String)],
    ) -> anyhow::Result<()> {
        let results = self.downloader.download(downloads)?;
        for result in results {
            if let Err(err) = result {
                anyhow::bail!("download failed: {err}");
            }
        }

        for (part, _, urls) in pending {
            if !part.exists() {
                anyhow::bail!("download produced no file: {urls}");
            }
        }
        for (part, path, _) in pending {
            fs::rename(part, path).with_context(|| {
                format!("failed to move {} into the cache", part.display())
            })?;
            log::debug!("downloaded: {}", path.display());
        }
        Ok(())
    }
}

/// The in-flight download path for a cache path.
fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        fs,
        io::Read,
        net::TcpListener,
        path::PathBuf,
        sync::mpsc,
        thread,
        time::Duration,
    };

    use serial_test::serial;
    use tempdir::TempDir;

    use crate::{
        HUBTOK_CACHE_CONFIG,
        HUBTOK_CACHE_DIR,
        disk_cache::{CacheRequest, HubtokDiskCache, HubtokDiskCacheOptions, part_path},
        testing::LoopbackServer,
    };

    fn temp_cache(dir: &TempDir) -> HubtokDiskCache {
        HubtokDiskCache::new(HubtokDiskCacheOptions::default().with_cache_dir(Some(dir.path())))
            .unwrap()
    }

    #[test]
    #[serial]
    fn test_resolve_dirs() {
        let orig_cache_dir = env::var(HUBTOK_CACHE_DIR);

        let pds = HUBTOK_CACHE_CONFIG
            .project_dirs()
            .expect("failed to get project dirs");

        let user_cache_dir = PathBuf::from("/tmp/hubtok/cache");
        let env_cache_dir = PathBuf::from("/tmp/hubtok/env_cache");

        // No env vars
        unsafe {
            env::remove_var(HUBTOK_CACHE_DIR);
        }

        let cache = HubtokDiskCache::new(
            HubtokDiskCacheOptions::default().with_cache_dir(Some(user_cache_dir.clone())),
        )
        .unwrap();
        assert_eq!(&cache.cache_dir(), &user_cache_dir);

        let cache = HubtokDiskCache::new(HubtokDiskCacheOptions::default()).unwrap();
        assert_eq!(&cache.cache_dir(), &pds.cache_dir().to_path_buf());

        // With env var.
        unsafe {
            env::set_var(HUBTOK_CACHE_DIR, env_cache_dir.to_str().unwrap());
        }

        let cache = HubtokDiskCache::new(
            HubtokDiskCacheOptions::default().with_cache_dir(Some(user_cache_dir.clone())),
        )
        .unwrap();
        assert_eq!(&cache.cache_dir(), &user_cache_dir);

        let cache = HubtokDiskCache::new(HubtokDiskCacheOptions::default()).unwrap();
        assert_eq!(&cache.cache_dir(), &env_cache_dir);

        // restore original env var.
        match orig_cache_dir {
            Ok(original) => unsafe { env::set_var(HUBTOK_CACHE_DIR, original) },
            Err(_) => unsafe { env::remove_var(HUBTOK_CACHE_DIR) },
        }
    }

    #[test]
    fn test_cache_path() {
        let dir = TempDir::new("hubtok_cache").unwrap();
        let cache = temp_cache(&dir);
        let path = cache.cache_path(&["prefix"], "file.txt");
        assert_eq!(path, dir.path().join("prefix").join("file.txt"));
    }

    #[test]
    fn test_load_cached_path_hit() {
        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        let expected = cache.cache_path(&["hub", "m"], "vocab.json");
        fs::create_dir_all(expected.parent().unwrap()).unwrap();
        fs::write(&expected, "{}").unwrap();

        // Cache hits never touch the network, even when download is allowed.
        let path = cache
            .load_cached_path(&["hub", "m"], "vocab.json", &["http://invalid.test/vocab.json"], true)
            .unwrap();
        assert_eq!(path, expected);
    }

    #[test]
    fn test_load_cached_path_offline_miss() {
        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        let err = cache
            .load_cached_path(&["hub"], "merges.txt", &["http://invalid.test/merges.txt"], false)
            .unwrap_err();
        assert!(err.to_string().contains("cached file not found"));
    }

    #[test]
    fn test_load_cached_paths_batch_order() {
        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        for name in ["b.txt", "a.txt"] {
            let path = cache.cache_path(&["ctx"], name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, name).unwrap();
        }

        let requests = vec![
            CacheRequest::new("b.txt", vec![]),
            CacheRequest::new("a.txt", vec![]),
        ];
        let paths = cache.load_cached_paths(&["ctx"], &requests, false).unwrap();
        assert_eq!(
            paths,
            vec![
                dir.path().join("ctx").join("b.txt"),
                dir.path().join("ctx").join("a.txt"),
            ]
        );

        let requests = vec![
            CacheRequest::new("a.txt", vec![]),
            CacheRequest::new("missing.txt", vec![]),
        ];
        assert!(cache.load_cached_paths(&["ctx"], &requests, false).is_err());
    }

    #[test]
    fn test_missing_urls() {
        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        let requests = vec![CacheRequest::new("a.txt", vec![])];
        let err = cache
            .load_cached_paths(&["ctx"], &requests, true)
            .unwrap_err();
        assert!(err.to_string().contains("no download urls"));
    }

    #[test]
    fn test_evict() {
        let dir = TempDir::new("hubtok_cache").unwrap();
        let cache = temp_cache(&dir);

        let path = cache.cache_path(&["ctx"], "tokenizer.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{}").unwrap();

        assert!(cache.evict(&["ctx"], "tokenizer.json").unwrap());
        assert!(!path.exists());
        assert!(!cache.evict(&["ctx"], "tokenizer.json").unwrap());
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(&PathBuf::from("/cache/ctx/tokenizer.json")),
            PathBuf::from("/cache/ctx/tokenizer.json.part")
        );
    }

    #[test]
    fn test_download_batch() {
        let server = LoopbackServer::start(&[
            ("/vocab.json", 200, "{\"a\": 0}"),
            ("/merges.txt", 200, "#version: 0.2\n"),
        ]);

        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        let requests = vec![
            CacheRequest::new("vocab.json", vec![server.url("/vocab.json")]),
            CacheRequest::new("merges.txt", vec![server.url("/merges.txt")]),
        ];
        let paths = cache.load_cached_paths(&["ctx"], &requests, true).unwrap();

        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "{\"a\": 0}");
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "#version: 0.2\n");
        for path in &paths {
            assert!(!part_path(path).exists());
        }

        // Now cached; offline loads succeed.
        let offline = cache.load_cached_paths(&["ctx"], &requests, false).unwrap();
        assert_eq!(offline, paths);
    }

    #[test]
    fn test_download_replaces_stale_part() {
        let server = LoopbackServer::start(&[("/tokenizer.json", 200, "{}")]);

        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        let path = cache.cache_path(&["ctx"], "tokenizer.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(part_path(&path), "truncated").unwrap();

        let loaded = cache
            .load_cached_path(&["ctx"], "tokenizer.json", &[server.url("/tokenizer.json")], true)
            .unwrap();
        assert_eq!(loaded, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!part_path(&path).exists());
    }

    #[test]
    fn test_download_error_status_is_not_cached() {
        let server = LoopbackServer::start(&[]);

        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        let url = server.url("/tokenizer_config.json");
        assert!(
            cache
                .load_cached_path(&["ctx"], "tokenizer_config.json", &[&url], true)
                .is_err()
        );

        let path = cache.cache_path(&["ctx"], "tokenizer_config.json");
        assert!(!path.exists());
        assert!(!part_path(&path).exists());

        // The error body must not be served as a cache hit.
        let err = cache
            .load_cached_path(&["ctx"], "tokenizer_config.json", &[&url], false)
            .unwrap_err();
        assert!(err.to_string().contains("cached file not found"));
    }

    #[test]
    fn test_download_partial_batch_failure() {
        let server = LoopbackServer::start(&[("/vocab.json", 200, "{}")]);

        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        let requests = vec![
            CacheRequest::new("vocab.json", vec![server.url("/vocab.json")]),
            CacheRequest::new("merges.txt", vec![server.url("/merges.txt")]),
        ];
        assert!(cache.load_cached_paths(&["ctx"], &requests, true).is_err());

        for name in ["vocab.json", "merges.txt"] {
            let path = cache.cache_path(&["ctx"], name);
            assert!(!path.exists(), "{name} should not be cached");
            assert!(!part_path(&path).exists(), "{name}.part should be removed");
        }
    }

    #[test]
    fn test_https_urls_use_tls() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut first = [0u8; 1];
                if stream.read_exact(&mut first).is_ok() {
                    let _ = tx.send(first[0]);
                }
            }
        });

        let dir = TempDir::new("hubtok_cache").unwrap();
        let mut cache = temp_cache(&dir);

        // The listener speaks no TLS, so the download itself fails.
        let url = format!("https://127.0.0.1:{port}/tokenizer.json");
        assert!(
            cache
                .load_cached_path(&["ctx"], "tokenizer.json", &[&url], true)
                .is_err()
        );

        // A TLS handshake record (0x16) reached the socket.
        let first = rx.recv_timeout(Duration::from_secs(30)).unwrap();
        assert_eq!(first, 0x16);

        let path = cache.cache_path(&["ctx"], "tokenizer.json");
        assert!(!path.exists());
        assert!(!part_path(&path).exists());
    }
}
