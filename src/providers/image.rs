//! Stock-image fetch chain with a generated placeholder as the last rung.
//!
//! Backends run in relevance order: Google Custom Search (when
//! configured), Pexels, Picsum. Each gets its own timeout so one slow
//! host cannot stall a whole export. The provider owns a bounded
//! recently-used URL cache so consecutive exports do not keep landing on
//! the same search hit.

use std::collections::{HashSet, VecDeque};
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;

use log::{debug, warn};
use md5::{Digest, Md5};
use serde_json::Value;

const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(8);
const PICSUM_TIMEOUT: Duration = Duration::from_secs(3);

/// Tiny responses are error pages, not images.
const MIN_IMAGE_BYTES: usize = 1000;

const RECENT_URL_CAP: usize = 256;

const STOP_WORDS: [&str; 15] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "plus", "minus", "as",
    "of",
];

enum ImageBackend {
    GoogleSearch { api_key: String, engine_id: String },
    Pexels,
    Picsum,
}

impl ImageBackend {
    fn name(&self) -> &'static str {
        match self {
            ImageBackend::GoogleSearch { .. } => "google-search",
            ImageBackend::Pexels => "pexels",
            ImageBackend::Picsum => "picsum",
        }
    }
}

/// Bounded FIFO set of recently returned image URLs.
struct RecentUrls {
    seen: HashSet<String>,
    order: VecDeque<String>,
}

impl RecentUrls {
    fn new() -> Self {
        RecentUrls {
            seen: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    fn record(&mut self, url: &str) {
        if !self.seen.insert(url.to_string()) {
            return;
        }
        self.order.push_back(url.to_string());
        while self.order.len() > RECENT_URL_CAP {
            if let Some(evicted) = self.order.pop_front() {
                self.seen.remove(&evicted);
            }
        }
    }
}

pub struct ImageProvider {
    client: reqwest::Client,
    backends: Vec<ImageBackend>,
    recent: Mutex<RecentUrls>,
}

impl ImageProvider {
    /// Build the backend chain. Google Search joins only when both
    /// `GOOGLE_SEARCH_API_KEY` and `GOOGLE_SEARCH_ENGINE_ID` are set;
    /// the keyless backends are always present.
    pub fn from_env() -> Self {
        let mut backends = Vec::new();
        if let (Ok(api_key), Ok(engine_id)) = (
            std::env::var("GOOGLE_SEARCH_API_KEY"),
            std::env::var("GOOGLE_SEARCH_ENGINE_ID"),
        ) {
            if !api_key.is_empty() && !engine_id.is_empty() {
                backends.push(ImageBackend::GoogleSearch { api_key, engine_id });
            }
        }
        backends.push(ImageBackend::Pexels);
        backends.push(ImageBackend::Picsum);
        ImageProvider {
            client: reqwest::Client::new(),
            backends,
            recent: Mutex::new(RecentUrls::new()),
        }
    }

    /// Fetch an illustrative image for one section. Falls through the
    /// backend chain, then to a generated placeholder; `None` only when
    /// even the placeholder cannot be produced.
    pub async fn section_image(&self, section_title: &str, main_topic: &str) -> Option<Vec<u8>> {
        let query: String = format!("{section_title} {main_topic}")
            .chars()
            .filter(|c| !matches!(c, ':' | '?'))
            .collect();

        for backend in &self.backends {
            match self.fetch(backend, &query).await {
                Some(data) => {
                    debug!("image from {} for '{query}'", backend.name());
                    return Some(data);
                }
                None => debug!("{} returned no image for '{query}'", backend.name()),
            }
        }
        warn!("all image backends failed for '{query}', using placeholder");
        placeholder(section_title)
    }

    async fn fetch(&self, backend: &ImageBackend, query: &str) -> Option<Vec<u8>> {
        match backend {
            ImageBackend::GoogleSearch { api_key, engine_id } => {
                self.google_search(api_key, engine_id, query).await
            }
            ImageBackend::Pexels => self.pexels(query).await,
            ImageBackend::Picsum => self.picsum(query).await,
        }
    }

    async fn google_search(&self, api_key: &str, engine_id: &str, query: &str) -> Option<Vec<u8>> {
        let search_query = keyword_query(query, 4);
        let resp = self
            .client
            .get(GOOGLE_SEARCH_URL)
            .query(&[
                ("key", api_key),
                ("cx", engine_id),
                ("q", &search_query),
                ("searchType", "image"),
                ("num", "3"),
                ("imgSize", "large"),
                ("imgType", "photo"),
                ("safe", "active"),
                ("fileType", "jpg,png"),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .ok()?;
        let data: Value = resp.json().await.ok()?;

        let items = data["items"].as_array()?;
        for item in items.iter().take(3) {
            let Some(url) = item["link"].as_str() else {
                continue;
            };
            if self.recently_used(url) {
                debug!("skipping recently used image url");
                continue;
            }
            let Some(bytes) = self.download(url, DOWNLOAD_TIMEOUT).await else {
                continue;
            };
            self.record_used(url);
            return Some(bytes);
        }
        None
    }

    async fn pexels(&self, query: &str) -> Option<Vec<u8>> {
        // Deterministic photo id per query so different sections get
        // different pictures without any API key.
        let page = query_hash(query) % 50 + 1;
        let id = 1000 + page;
        let url = format!(
            "https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg?auto=compress&cs=tinysrgb&w=800&h=600"
        );
        self.download(&url, DOWNLOAD_TIMEOUT).await
    }

    async fn picsum(&self, query: &str) -> Option<Vec<u8>> {
        let id = query_hash(query) % 900 + 100;
        let url = format!("https://picsum.photos/id/{id}/800/600");
        self.download(&url, PICSUM_TIMEOUT).await
    }

    async fn download(&self, url: &str, timeout: Duration) -> Option<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .ok()?;
        let bytes = resp.bytes().await.ok()?;
        (bytes.len() > MIN_IMAGE_BYTES).then(|| bytes.to_vec())
    }

    fn recently_used(&self, url: &str) -> bool {
        match self.recent.lock() {
            Ok(guard) => guard.contains(url),
            Err(poisoned) => poisoned.into_inner().contains(url),
        }
    }

    fn record_used(&self, url: &str) {
        match self.recent.lock() {
            Ok(mut guard) => guard.record(url),
            Err(poisoned) => poisoned.into_inner().record(url),
        }
    }
}

/// Strip stop words and short tokens, keep the first `max` keywords.
fn keyword_query(query: &str, max: usize) -> String {
    let lower = query.to_lowercase();
    let keywords: Vec<&str> = lower
        .split_whitespace()
        .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w))
        .take(max)
        .collect();
    if keywords.is_empty() {
        query.to_string()
    } else {
        keywords.join(" ")
    }
}

/// Stable per-query hash derived from the MD5 digest prefix.
fn query_hash(query: &str) -> u64 {
    let digest = Md5::digest(query.as_bytes());
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

/// Solid-color 800x600 PNG keyed on the section title, channels floored
/// so the result is never near-black.
fn placeholder(text: &str) -> Option<Vec<u8>> {
    let digest = Md5::digest(text.as_bytes());
    let pixel = image::Rgb([
        digest[0].max(80),
        digest[1].max(80),
        digest[2].max(80),
    ]);
    let img = image::RgbImage::from_pixel(800, 600, pixel);
    let mut out = Cursor::new(Vec::new());
    match img.write_to(&mut out, image::ImageFormat::Png) {
        Ok(()) => Some(out.into_inner()),
        Err(e) => {
            warn!("placeholder encode failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_urls_evict_oldest_at_capacity() {
        let mut recent = RecentUrls::new();
        for i in 0..RECENT_URL_CAP + 10 {
            recent.record(&format!("https://example.com/{i}"));
        }
        assert_eq!(recent.order.len(), RECENT_URL_CAP);
        assert!(!recent.contains("https://example.com/0"));
        assert!(recent.contains(&format!("https://example.com/{}", RECENT_URL_CAP + 9)));
    }

    #[test]
    fn recent_urls_ignore_duplicates() {
        let mut recent = RecentUrls::new();
        recent.record("https://example.com/a");
        recent.record("https://example.com/a");
        assert_eq!(recent.order.len(), 1);
    }

    #[test]
    fn keyword_query_strips_stop_words() {
        assert_eq!(keyword_query("the rise of machine learning", 4), "rise machine learning");
        // All-stop-word input keeps the original query.
        assert_eq!(keyword_query("of the at", 4), "of the at");
    }

    #[test]
    fn query_hash_is_stable() {
        assert_eq!(query_hash("market overview"), query_hash("market overview"));
        assert_ne!(query_hash("market overview"), query_hash("competitors"));
    }

    #[test]
    fn placeholder_is_a_decodable_png() {
        let data = placeholder("Introduction").unwrap();
        assert!(data.starts_with(&[0x89, b'P', b'N', b'G']));
        let img = image::load_from_memory(&data).unwrap();
        assert_eq!((img.width(), img.height()), (800, 600));
        // Same title, same color.
        assert_eq!(data, placeholder("Introduction").unwrap());
    }
}
