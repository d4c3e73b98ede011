//! Favicon source selection and the bulk refresh that caches working sources.
//!
//! Rendering walks a [`FaviconPlan`] with the [`FaviconState`] machine: each
//! failed image load advances to the next candidate, and running out of
//! candidates means drawing a generic glyph in the tile's color.

use async_trait::async_trait;
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::models::Tile;

/// Provider templates, best quality first. `{domain}` is the tile hostname.
pub const FAVICON_PROVIDERS: &[&str] = &[
    "https://www.google.com/s2/favicons?domain={domain}&sz=128",
    "https://{domain}/favicon.ico",
];

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Hostname of `url`, or an empty string when it does not parse.
pub fn hostname(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_default()
}

pub fn provider_urls(domain: &str) -> Vec<String> {
    FAVICON_PROVIDERS
        .iter()
        .map(|template| template.replace("{domain}", domain))
        .collect()
}

/// Ordered image sources to try for one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaviconPlan {
    candidates: Vec<String>,
}

impl FaviconPlan {
    pub fn for_tile(tile: &Tile) -> Self {
        if let Some(custom) = tile.custom_icon() {
            return Self {
                candidates: vec![custom.to_string()],
            };
        }

        let domain = hostname(&tile.url);
        if domain.is_empty() {
            return Self { candidates: Vec::new() };
        }

        let providers = provider_urls(&domain);
        let mut candidates = Vec::with_capacity(providers.len() + 1);
        if let Some(cached) = tile.cached_favicon() {
            candidates.push(cached.to_string());
        }
        for src in providers {
            if !candidates.contains(&src) {
                candidates.push(src);
            }
        }
        Self { candidates }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.candidates.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaviconState {
    Trying(usize),
    Loaded(usize),
    /// Draw the glyph.
    Exhausted,
}

impl FaviconState {
    pub fn start(plan: &FaviconPlan) -> Self {
        if plan.is_empty() {
            FaviconState::Exhausted
        } else {
            FaviconState::Trying(0)
        }
    }

    pub fn on_error(self, plan: &FaviconPlan) -> Self {
        match self {
            FaviconState::Trying(i) if i + 1 < plan.len() => FaviconState::Trying(i + 1),
            FaviconState::Trying(_) => FaviconState::Exhausted,
            terminal => terminal,
        }
    }

    pub fn on_load(self) -> Self {
        match self {
            FaviconState::Trying(i) => FaviconState::Loaded(i),
            terminal => terminal,
        }
    }

    /// Image source to display in this state, `None` for the glyph.
    pub fn source<'p>(&self, plan: &'p FaviconPlan) -> Option<&'p str> {
        match *self {
            FaviconState::Trying(i) | FaviconState::Loaded(i) => plan.get(i),
            FaviconState::Exhausted => None,
        }
    }
}

/// Plan and state for one rendered icon.
#[derive(Debug, Clone)]
pub struct FaviconResolver {
    plan: FaviconPlan,
    state: FaviconState,
}

impl FaviconResolver {
    pub fn new(tile: &Tile) -> Self {
        let plan = FaviconPlan::for_tile(tile);
        let state = FaviconState::start(&plan);
        Self { plan, state }
    }

    pub fn state(&self) -> FaviconState {
        self.state
    }

    pub fn source(&self) -> Option<&str> {
        self.state.source(&self.plan)
    }

    pub fn image_failed(&mut self) {
        self.state = self.state.on_error(&self.plan);
    }

    pub fn image_loaded(&mut self) {
        self.state = self.state.on_load();
    }
}

/// Checks whether an image URL currently serves an image.
#[async_trait]
pub trait FaviconProbe: Send + Sync {
    async fn probe(&self, url: &str) -> bool;
}

pub struct HttpFaviconProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFaviconProbe {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl Default for HttpFaviconProbe {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl FaviconProbe for HttpFaviconProbe {
    async fn probe(&self, url: &str) -> bool {
        let response = match tokio::time::timeout(self.timeout, self.client.get(url).send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!(url, error = %e, "Favicon probe failed");
                return false;
            }
            Err(_) => {
                debug!(url, "Favicon probe timed out");
                return false;
            }
        };

        let is_image = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("image/"));
        response.status().is_success() && is_image
    }
}

async fn refresh_one(tile: &Tile, probe: &dyn FaviconProbe) -> Tile {
    if tile.custom_icon().is_some() {
        return tile.clone();
    }
    let domain = hostname(&tile.url);
    if domain.is_empty() {
        return tile.clone();
    }

    for src in provider_urls(&domain) {
        if probe.probe(&src).await {
            let mut updated = tile.clone();
            updated.cached_favicon = Some(src);
            return updated;
        }
    }
    tile.clone()
}

/// Probes provider sources for every tile without a custom icon and records
/// the first working one as `cached_favicon`. Tiles are probed concurrently,
/// sources within a tile in order. Order of the returned list matches `tiles`.
pub async fn refresh_favicons(tiles: &[Tile], probe: &dyn FaviconProbe) -> Vec<Tile> {
    let refreshed = join_all(tiles.iter().map(|tile| refresh_one(tile, probe))).await;
    let changed = refreshed
        .iter()
        .zip(tiles)
        .filter(|(new, old)| new.cached_favicon != old.cached_favicon)
        .count();
    info!(total = tiles.len(), changed, "Favicon refresh finished");
    refreshed
}
