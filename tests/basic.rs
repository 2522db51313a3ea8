use ckedit::utils::{StringUtils, UrlUtils};

#[test]
fn test_version() {
    assert!(!ckedit::VERSION.is_empty());
}

#[test]
fn test_url_filter_drops_www() {
    let host = UrlUtils::filter_from_url("www.example.com/login").expect("URL should parse");
    assert_eq!(StringUtils::normalize_filter(&host).as_deref(), Some("example.com"));
}
