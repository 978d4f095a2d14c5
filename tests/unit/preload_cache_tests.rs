//! Preload cache restored from request headers.

use http::header::{COOKIE, HeaderMap, HeaderValue};

use tera_encore::preload::{PreloadCache, hash_url};
use tera_encore::response::RequestCookies;

#[test]
fn test_hash_is_stable_hex() {
    let hash = hash_url("/assets/css/website.css");
    assert_eq!(hash.len(), 32);
    assert!(hash.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    assert_eq!(hash, hash_url("/assets/css/website.css"));
    assert_ne!(hash, hash_url("/assets/css/admin.css"));
}

#[test]
fn test_cache_from_several_cookie_headers() {
    let website = hash_url("/website.css");
    let admin = hash_url("/admin.css");

    let mut headers = HeaderMap::new();
    headers.append(COOKIE, HeaderValue::from_str(&format!("h2pushes_{website}=1; theme=dark")).unwrap());
    headers.append(COOKIE, HeaderValue::from_str(&format!("h2pushes_{admin}=1")).unwrap());

    let cookies = RequestCookies::from_headers(&headers);
    assert_eq!(cookies.len(), 3);
    assert_eq!(cookies.get("theme"), Some("dark"));

    let cache = PreloadCache::from_cookies(&cookies);
    assert_eq!(cache.len(), 2);
    assert!(cache.contains_url("/website.css"));
    assert!(cache.contains_url("/admin.css"));
    assert!(!cache.contains_url("/app.js"));
}

#[test]
fn test_invalid_hashes_ignored() {
    let cache = PreloadCache::from_cookie_header("h2pushes_nothex=1; h2pushes_=1; h2pushes_ABCDEF=1");
    assert!(cache.is_empty());
}

#[test]
fn test_recorded_urls_round_trip_through_cookies() {
    let mut cache = PreloadCache::new();
    let cookie = cache.record("/app.js").expect("first record yields a cookie");
    assert!(cache.record("/app.js").is_none());

    let rendered = cookie.to_string();
    let pair = rendered.split(';').next().unwrap_or_default();
    let restored = PreloadCache::from_cookie_header(pair);
    assert_eq!(restored, cache);
    assert_eq!(cache.to_cookies().len(), 1);
}
