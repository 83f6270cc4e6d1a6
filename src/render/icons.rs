use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::scene::GraphScene;

/// Icons are rasterized onto a fixed-size surface before use; the decoded
/// source image is resized to fit.
pub const ICON_WIDTH: u32 = 128;
pub const ICON_HEIGHT: u32 = 96;

/// Source of raw icon bytes for a key. Injected so the cache can be driven
/// without a network in tests.
pub trait IconFetcher: Send + Sync {
    fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}

/// Fetches `<base>/<key>.png` over HTTP.
pub struct HttpIconFetcher {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpIconFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build icon HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client,
        })
    }
}

impl IconFetcher for HttpIconFetcher {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{key}.png", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("icon request failed for {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("icon request for {url} returned {}", response.status()));
        }

        Ok(response
            .bytes()
            .with_context(|| format!("failed to read icon body from {url}"))?
            .to_vec())
    }
}

/// Pre-rendered icon pixels, RGBA row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct IconBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Resolves icon keys to pre-rendered bitmaps, at most one fetch per key.
///
/// Entries are immutable once set and live for the lifetime of the surface;
/// a failed fetch is stored as a permanent "no icon" and never retried.
/// Concurrent requests for the same unresolved key coalesce onto the single
/// in-flight fetch. Built once per visualization surface and shared by
/// reference across backend switches.
pub struct IconCache {
    fetcher: Arc<dyn IconFetcher>,
    entries: HashMap<String, Option<Arc<IconBitmap>>>,
    pending: HashMap<String, Receiver<Option<IconBitmap>>>,
}

impl IconCache {
    pub fn new(fetcher: Arc<dyn IconFetcher>) -> Self {
        Self {
            fetcher,
            entries: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    /// Starts a background fetch for `key` unless it is already resolved or
    /// in flight.
    pub fn request(&mut self, key: &str) {
        if self.entries.contains_key(key) || self.pending.contains_key(key) {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let owned_key = key.to_owned();
        thread::spawn(move || {
            let bitmap = fetch_and_decode(fetcher.as_ref(), &owned_key);
            let _ = tx.send(bitmap);
        });

        self.pending.insert(key.to_owned(), rx);
    }

    /// Warms the cache for every icon-bearing node in the scene.
    pub fn request_all(&mut self, scene: &GraphScene) {
        for key in scene.icon_keys() {
            self.request(key);
        }
    }

    /// Drains finished fetches into the entry map. Returns the keys that
    /// completed during this call. Call once per frame.
    pub fn poll(&mut self) -> Vec<String> {
        let mut completed = Vec::new();
        for (key, rx) in &self.pending {
            match rx.try_recv() {
                Ok(bitmap) => completed.push((key.clone(), bitmap)),
                Err(TryRecvError::Empty) => {}
                // A dropped worker counts as a failed fetch.
                Err(TryRecvError::Disconnected) => completed.push((key.clone(), None)),
            }
        }

        let mut keys = Vec::with_capacity(completed.len());
        for (key, bitmap) in completed {
            self.pending.remove(&key);
            if bitmap.is_none() {
                log::debug!("icon {key} resolved to no icon");
            }
            self.entries.insert(key.clone(), bitmap.map(Arc::new));
            keys.push(key);
        }
        keys
    }

    /// `None` while unresolved; `Some(None)` after a permanent failure.
    pub fn entry(&self, key: &str) -> Option<Option<Arc<IconBitmap>>> {
        self.entries.get(key).cloned()
    }

    pub fn is_resolved(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether every icon key used by the scene has settled.
    pub fn is_warm(&self, scene: &GraphScene) -> bool {
        scene.icon_keys().iter().all(|key| self.is_resolved(key))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.len()
    }
}

fn fetch_and_decode(fetcher: &dyn IconFetcher, key: &str) -> Option<IconBitmap> {
    let bytes = match fetcher.fetch(key) {
        Ok(bytes) => bytes,
        Err(error) => {
            log::warn!("icon fetch failed for {key}: {error:#}");
            return None;
        }
    };

    let decoded = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(error) => {
            log::warn!("icon decode failed for {key}: {error}");
            return None;
        }
    };

    let resized = image::imageops::resize(
        &decoded.to_rgba8(),
        ICON_WIDTH,
        ICON_HEIGHT,
        image::imageops::FilterType::Triangle,
    );
    Some(IconBitmap {
        width: ICON_WIDTH,
        height: ICON_HEIGHT,
        rgba: resized.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Counts fetches and blocks each one until the test releases it.
    struct GatedFetcher {
        fetch_count: AtomicUsize,
        gate: Mutex<mpsc::Receiver<()>>,
        payload: Result<Vec<u8>, String>,
    }

    impl GatedFetcher {
        fn new(payload: Result<Vec<u8>, String>) -> (Arc<Self>, mpsc::Sender<()>) {
            let (tx, rx) = mpsc::channel();
            let fetcher = Arc::new(Self {
                fetch_count: AtomicUsize::new(0),
                gate: Mutex::new(rx),
                payload,
            });
            (fetcher, tx)
        }
    }

    impl IconFetcher for GatedFetcher {
        fn fetch(&self, _key: &str) -> Result<Vec<u8>> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            self.gate
                .lock()
                .unwrap()
                .recv()
                .expect("test keeps the gate sender alive");
            match &self.payload {
                Ok(bytes) => Ok(bytes.clone()),
                Err(message) => Err(anyhow!(message.clone())),
            }
        }
    }

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn poll_until_resolved(cache: &mut IconCache, key: &str) {
        for _ in 0..500 {
            cache.poll();
            if cache.is_resolved(key) {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("icon {key} never resolved");
    }

    #[test]
    fn concurrent_requests_coalesce_to_one_fetch() {
        let (fetcher, gate) = GatedFetcher::new(Ok(png_bytes()));
        let mut cache = IconCache::new(Arc::clone(&fetcher) as Arc<dyn IconFetcher>);

        cache.request("de");
        cache.request("de");
        cache.request("de");
        assert_eq!(cache.pending_count(), 1);

        gate.send(()).unwrap();
        poll_until_resolved(&mut cache, "de");

        assert_eq!(fetcher.fetch_count.load(Ordering::SeqCst), 1);
        let entry = cache.entry("de").unwrap().unwrap();
        assert_eq!(entry.width, ICON_WIDTH);
        assert_eq!(entry.height, ICON_HEIGHT);
        assert_eq!(entry.rgba.len(), (ICON_WIDTH * ICON_HEIGHT * 4) as usize);
    }

    #[test]
    fn failed_fetches_are_permanent() {
        let (fetcher, gate) = GatedFetcher::new(Err("boom".to_owned()));
        let mut cache = IconCache::new(Arc::clone(&fetcher) as Arc<dyn IconFetcher>);

        cache.request("missing");
        gate.send(()).unwrap();
        poll_until_resolved(&mut cache, "missing");

        assert_eq!(cache.entry("missing"), Some(None));

        // Further requests must not refetch a settled failure.
        cache.request("missing");
        assert_eq!(cache.pending_count(), 0);
        assert_eq!(fetcher.fetch_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn undecodable_bytes_resolve_to_no_icon() {
        let (fetcher, gate) = GatedFetcher::new(Ok(vec![0, 1, 2, 3]));
        let mut cache = IconCache::new(fetcher);

        cache.request("garbled");
        gate.send(()).unwrap();
        poll_until_resolved(&mut cache, "garbled");

        assert_eq!(cache.entry("garbled"), Some(None));
    }

    #[test]
    fn unresolved_keys_report_nothing() {
        let (fetcher, _gate) = GatedFetcher::new(Ok(png_bytes()));
        let cache = IconCache::new(fetcher);
        assert_eq!(cache.entry("unknown"), None);
        assert!(!cache.is_resolved("unknown"));
    }
}
