//! Cache key normalization properties.

use tabmonitor::normalize;
use tabmonitor::normalize::normalize_or_raw;

const SAMPLES: &[&str] = &[
    "https://www.nvidia.com/en-us/about-nvidia/?ref=nav#team",
    "https://python.org",
    "http://localhost:5000/stock-research",
    "https://user:pw@example.com:8443/a/b/?q=1",
    "https://apple.com/",
    "https://example.com/%7Euser/docs",
];

#[test]
fn normalization_is_idempotent() {
    for raw in SAMPLES {
        let once = normalize(raw).unwrap();
        let twice = normalize(&once.cache_key).unwrap();
        assert_eq!(once, twice, "not idempotent for {raw}");
    }
}

#[test]
fn query_variants_share_a_key() {
    let a = normalize("https://www.apple.com/iphone?utm_source=x").unwrap();
    let b = normalize("https://www.apple.com/iphone#specs").unwrap();
    let c = normalize("https://www.apple.com/iphone").unwrap();
    assert_eq!(a.cache_key, c.cache_key);
    assert_eq!(b.cache_key, c.cache_key);
}

#[test]
fn distinct_paths_get_distinct_keys() {
    let a = normalize("https://www.nvidia.com/page").unwrap();
    let b = normalize("https://www.nvidia.com/other").unwrap();
    assert_ne!(a.cache_key, b.cache_key);
    assert_eq!(a.domain, b.domain);
}

#[test]
fn domain_excludes_path_and_scheme() {
    let n = normalize("https://docs.python.org/3/library/").unwrap();
    assert_eq!(n.domain, "docs.python.org");
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let n = normalize("  https://python.org/about  ").unwrap();
    assert_eq!(n.cache_key, "https://python.org/about");
}

#[test]
fn malformed_input_degrades_to_raw() {
    let n = normalize_or_raw("definitely not a url");
    assert_eq!(n.cache_key, "definitely not a url");
    assert_eq!(n.domain, "definitely not a url");
}
