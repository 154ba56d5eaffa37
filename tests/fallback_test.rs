//! Canned analysis selection.

use tabmonitor::fallback::{FallbackResponder, GENERIC_TEMPLATE, builtin_rules};
use tabmonitor::{DomainRule, normalize};

fn respond_for(responder: &FallbackResponder, url: &str) -> String {
    let n = normalize(url).unwrap();
    responder.respond(&n.domain, &n.cache_key)
}

#[test]
fn nvidia_page_mentions_ticker_and_exchange() {
    let responder = FallbackResponder::default();
    let text = respond_for(&responder, "https://www.nvidia.com/page?x=1");
    assert!(text.contains("NVDA"));
    assert!(text.contains("NASDAQ"));
    assert!(text.contains("https://www.nvidia.com/page"));
}

#[test]
fn builtin_companies_resolve() {
    let responder = FallbackResponder::default();
    assert!(respond_for(&responder, "https://www.apple.com/iphone/").contains("AAPL"));
    assert!(respond_for(&responder, "https://learn.microsoft.com/").contains("MSFT"));
    assert!(respond_for(&responder, "https://docs.python.org/3/").contains("Python"));
}

#[test]
fn unknown_domain_gets_generic_text() {
    let responder = FallbackResponder::default();
    let text = respond_for(&responder, "https://example.org/about");

    assert!(responder.resolve("example.org").is_none());
    assert!(text.starts_with("## Website Analysis"));
    assert!(text.contains("https://example.org/about"));
    assert!(text.contains("(example.org)"));
    assert!(!text.contains("{url}"));
    assert!(!text.contains("{domain}"));
}

#[test]
fn first_matching_rule_wins() {
    let responder = FallbackResponder::new(vec![
        DomainRule::new("shop.example", "specific {domain}"),
        DomainRule::new("example", "broad {domain}"),
    ]);
    assert_eq!(responder.respond("shop.example.com", "u"), "specific shop.example.com");
    assert_eq!(responder.respond("blog.example.com", "u"), "broad blog.example.com");

    let reversed = FallbackResponder::new(vec![
        DomainRule::new("example", "broad"),
        DomainRule::new("shop.example", "specific"),
    ]);
    assert_eq!(reversed.respond("shop.example.com", "u"), "broad");
}

#[test]
fn matching_is_case_sensitive() {
    let responder = FallbackResponder::default();
    assert!(responder.resolve("WWW.NVIDIA.COM").is_none());
}

#[test]
fn prepended_rules_take_precedence() {
    let responder = FallbackResponder::with_rules_prepended(vec![DomainRule::new(
        "nvidia.com",
        "custom take on {url}",
    )]);
    assert_eq!(responder.rules().len(), builtin_rules().len() + 1);
    assert_eq!(
        responder.respond("www.nvidia.com", "https://www.nvidia.com/"),
        "custom take on https://www.nvidia.com/"
    );
}

#[test]
fn responses_are_deterministic() {
    let responder = FallbackResponder::default();
    for url in ["https://www.nvidia.com/a", "https://example.net/"] {
        let first = respond_for(&responder, url);
        let second = respond_for(&responder, url);
        assert_eq!(first, second);
        assert!(!first.trim().is_empty());
    }
}

#[test]
fn empty_table_uses_generic_template() {
    let responder = FallbackResponder::new(Vec::new());
    let text = responder.respond("a.example", "https://a.example/");
    assert_eq!(
        text,
        GENERIC_TEMPLATE
            .replace("{url}", "https://a.example/")
            .replace("{domain}", "a.example")
    );
}

#[test]
fn rules_deserialize_from_toml_shape() {
    let rule: DomainRule =
        serde_json::from_str(r#"{"pattern": "rust-lang.org", "template": "Rust: {url}"}"#).unwrap();
    assert_eq!(rule, DomainRule::new("rust-lang.org", "Rust: {url}"));
    assert!(rule.matches("www.rust-lang.org"));
}
