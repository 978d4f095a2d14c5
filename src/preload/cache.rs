//! Per-session record of pushed preload URLs.
//!
//! The cache is a set of URL hashes. It is rebuilt from the request cookies
//! (`h2pushes_<hash>=1`, one cookie per hash) and every newly recorded hash
//! yields the cookie to send back, so the set survives across requests of the
//! same client.

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::constants::{PRELOAD_COOKIE_PREFIX, PRELOAD_COOKIE_VALUE, PRELOAD_HASH_BYTES};
use crate::response::{RequestCookies, SameSite, SetCookie};

/// Cache key of a URL: truncated SHA-256, lower-case hex.
pub fn hash_url(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(&digest[..PRELOAD_HASH_BYTES])
}

fn is_hash(candidate: &str) -> bool {
    candidate.len() == PRELOAD_HASH_BYTES * 2
        && candidate.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Set of URL hashes already pushed to this client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadCache {
    hashes: BTreeSet<String>,
}

impl PreloadCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the cache from request cookies.
    ///
    /// Cookies whose name carries the preload prefix but no valid hash are ignored.
    pub fn from_cookies(cookies: &RequestCookies) -> Self {
        let hashes = cookies
            .iter()
            .filter_map(|(name, _)| name.strip_prefix(PRELOAD_COOKIE_PREFIX))
            .filter(|hash| is_hash(hash))
            .map(str::to_string)
            .collect::<BTreeSet<_>>();

        if !hashes.is_empty() {
            tracing::trace!("Preload cache restored with {} hash(es)", hashes.len());
        }
        Self { hashes }
    }

    /// Rebuild the cache from a raw `Cookie` header value.
    pub fn from_cookie_header(header: &str) -> Self {
        Self::from_cookies(&RequestCookies::parse(header))
    }

    /// Whether `url` was already pushed.
    pub fn contains_url(&self, url: &str) -> bool {
        self.hashes.contains(&hash_url(url))
    }

    /// Whether `hash` is recorded.
    pub fn contains_hash(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Record `url` as pushed.
    ///
    /// Returns the cookie persisting the entry, `None` if it was already there.
    pub fn record(&mut self, url: &str) -> Option<SetCookie> {
        let hash = hash_url(url);
        if self.hashes.contains(&hash) {
            return None;
        }
        let cookie = Self::cookie_for(&hash);
        self.hashes.insert(hash);
        Some(cookie)
    }

    /// Cookie recording `hash`: session scoped, whole site, secure, HTTP only.
    pub fn cookie_for(hash: &str) -> SetCookie {
        SetCookie::new(format!("{PRELOAD_COOKIE_PREFIX}{hash}"), PRELOAD_COOKIE_VALUE)
            .path("/")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Strict)
    }

    /// Cookies for every recorded hash, in hash order.
    pub fn to_cookies(&self) -> Vec<SetCookie> {
        self.hashes.iter().map(|hash| Self::cookie_for(hash)).collect()
    }

    /// Recorded hashes.
    pub fn hashes(&self) -> impl Iterator<Item = &str> + '_ {
        self.hashes.iter().map(String::as_str)
    }

    /// Number of recorded URLs.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
