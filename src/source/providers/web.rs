//! Downloading a single issue from the comic site.
//!
//! The issue page lists every page image as an `<img>` under
//! `div.reading-content`. Lazy-loading themes move the real address into
//! `data-src` or `data-lazy-src`, so those are checked when `src` is absent.
//!
//! Pages are fetched one at a time with a pause in between to go easy on the
//! site. A page that fails to download or decode is reported and left out;
//! the issue is still compiled from whatever pages did arrive.

use super::ImageProvider;
use crate::source::{Image, ImageSet};
use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use reqwest::blocking::Client;
use reqwest::Url;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const IMAGE_SELECTOR: &str = "div.reading-content img";
const IMAGE_SOURCE_ATTRIBUTES: [&str; 3] = ["src", "data-src", "data-lazy-src"];

/// HTTP settings for talking to the comic site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pause between consecutive page downloads, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Timeout for a single request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}
fn default_delay_ms() -> u64 {
    500
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            user_agent: default_user_agent(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The HTTP session for one run.
///
/// Created once and handed to whatever needs to make requests, so the
/// connection pool and request pacing are shared without any global state.
pub struct FetchContext {
    client: Client,
    delay: Duration,
}

impl FetchContext {
    pub fn new(config: &FetchConfig) -> Result<FetchContext> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .with_context(|| "Failed to create HTTP client")?;
        Ok(FetchContext {
            client,
            delay: Duration::from_millis(config.delay_ms),
        })
    }

    pub fn get_text(&self, url: &Url) -> Result<String> {
        log::debug!("GET {url}");
        self.client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to fetch {url}"))?
            .text()
            .with_context(|| format!("Failed to read response body from {url}"))
    }

    pub fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        log::debug!("GET {url}");
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to fetch {url}"))?
            .bytes()
            .with_context(|| format!("Failed to read response body from {url}"))?;
        Ok(bytes.to_vec())
    }

    /// Wait out the configured delay between requests.
    pub fn pause(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

/// Find the page images on an issue page, in the order they appear.
pub fn extract_image_urls(html: &str, page_url: &Url) -> Result<Vec<Url>> {
    let selector =
        Selector::parse(IMAGE_SELECTOR).map_err(|e| anyhow!("Invalid image selector: {e:?}"))?;
    let document = Html::parse_document(html);

    let mut urls = Vec::new();
    for img in document.select(&selector) {
        let src = IMAGE_SOURCE_ATTRIBUTES
            .iter()
            .filter_map(|attr| img.value().attr(attr))
            .map(str::trim)
            .find(|src| !src.is_empty());
        let Some(src) = src else {
            continue;
        };
        match page_url.join(src) {
            Ok(url) => urls.push(url),
            Err(e) => log::warn!("skipping image with unusable address `{src}`: {e}"),
        }
    }
    Ok(urls)
}

/// One issue page on the comic site.
pub struct WebIssue<'a> {
    context: &'a FetchContext,
    url: Url,
    keep_images: Option<PathBuf>,
}

impl<'a> WebIssue<'a> {
    pub fn new(context: &'a FetchContext, url: Url) -> WebIssue<'a> {
        WebIssue {
            context,
            url,
            keep_images: None,
        }
    }

    /// Also save each downloaded page into `dir` as `0001.jpg`, `0002.png`, ...
    pub fn keep_images_in<P: Into<PathBuf>>(mut self, dir: P) -> WebIssue<'a> {
        self.keep_images = Some(dir.into());
        self
    }

    fn keep(&self, image: &Image, page_number: usize) -> Result<()> {
        let Some(dir) = &self.keep_images else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(format!(
            "{:04}.{}",
            page_number,
            image.format().extension()
        ));
        std::fs::write(&path, image.bytes())
            .with_context(|| format!("Failed to save page to {}", path.display()))
    }

    /// Download and decode every page in `urls` using `fetch`. Pages that fail
    /// are left out and the rest are numbered contiguously.
    fn collect_pages<F>(
        &self,
        urls: &[Url],
        fetch: F,
        progress: &ProgressBar,
    ) -> Result<ImageSet>
    where
        F: Fn(&Url) -> Result<Vec<u8>>,
    {
        progress.set_length(urls.len() as u64);
        let mut images: Vec<Image> = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            if i > 0 {
                self.context.pause();
            }
            progress.set_message(format!("Page {}/{}", i + 1, urls.len()));

            let image = fetch(url).and_then(|bytes| Ok(Image::decode(i, bytes)?));
            match image {
                Ok(image) => {
                    // saved pages are numbered the way they end up in the set
                    if let Err(e) = self.keep(&image, images.len() + 1) {
                        progress.suspend(|| log::warn!("not keeping page {}: {e:#}", i + 1));
                    }
                    images.push(image);
                }
                Err(e) => {
                    progress.suspend(|| log::warn!("skipping page {}: {e:#}", i + 1));
                }
            }
            progress.inc(1);
        }

        if images.is_empty() {
            return Err(anyhow!("None of the {} pages could be downloaded", urls.len()));
        }
        if images.len() < urls.len() {
            log::warn!(
                "only {}/{} pages were downloaded from {}",
                images.len(),
                urls.len(),
                self.url
            );
        }

        // pages that failed leave holes in the numbering
        let set = ImageSet::renumbered(images)?;
        Ok(set)
    }
}

impl ImageProvider for WebIssue<'_> {
    fn load(&self, progress: &ProgressBar) -> Result<ImageSet> {
        progress.set_message(format!("Fetching {}", self.url));
        let html = self.context.get_text(&self.url)?;
        let urls = extract_image_urls(&html, &self.url)?;
        if urls.is_empty() {
            return Err(anyhow!(
                "No images found under `{IMAGE_SELECTOR}` on {}",
                self.url
            ));
        }
        log::info!("found {} images on {}", urls.len(), self.url);

        self.collect_pages(&urls, |url| self.context.get_bytes(url), progress)
    }
}
