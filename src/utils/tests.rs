use super::{FileUtils, StringUtils, UrlUtils};
use crate::error::CkeditError;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn validate_url_adds_scheme() {
    let url = UrlUtils::validate_url("example.com").expect("valid url");
    assert_eq!(url.scheme(), "http");
    assert_eq!(url.host_str(), Some("example.com"));
}

#[test]
fn validate_url_rejects_invalid_input() {
    let err = UrlUtils::validate_url("http://").expect_err("invalid url");
    assert!(matches!(err, CkeditError::InvalidUrl(_)));
}

#[test]
fn filter_from_url_takes_host() {
    let host = UrlUtils::filter_from_url("https://www.example.com/path?q=1").expect("host");
    assert_eq!(host, "www.example.com");
    assert_eq!(
        StringUtils::normalize_filter(&host),
        Some("example.com".to_string())
    );
}

#[test]
fn expand_path_expands_home() {
    let home = dirs::home_dir().expect("home dir");
    let path = FileUtils::expand_path("~/ckedit-test").expect("expanded");
    assert_eq!(path, home.join("ckedit-test"));
}

#[test]
fn expand_path_leaves_non_tilde_unchanged() {
    let path = FileUtils::expand_path("/tmp/ckedit").expect("expanded");
    assert_eq!(path, PathBuf::from("/tmp/ckedit"));
}

#[test]
fn check_file_readable_validates_paths() {
    let temp = tempdir().expect("tempdir");
    let file_path = temp.path().join("cookies.txt");
    fs::write(&file_path, "data").expect("write file");
    FileUtils::check_file_readable(&file_path).expect("readable file");

    let err =
        FileUtils::check_file_readable(&temp.path().join("missing")).expect_err("missing file");
    assert!(matches!(err, CkeditError::FileNotFound(_)));

    let err = FileUtils::check_file_readable(temp.path()).expect_err("dir path");
    assert!(matches!(err, CkeditError::Config(_)));
}

#[test]
fn normalize_filter_strips_first_www_only() {
    assert_eq!(
        StringUtils::normalize_filter(" www.a.www.b "),
        Some("a.www.b".to_string())
    );
    assert_eq!(StringUtils::normalize_filter("www."), None);
    assert_eq!(StringUtils::normalize_filter("   "), None);
}

#[test]
fn parse_millis_parses_suffixes() {
    assert_eq!(
        StringUtils::parse_millis("250").expect("millis"),
        Duration::from_millis(250)
    );
    assert_eq!(
        StringUtils::parse_millis("40ms").expect("millis"),
        Duration::from_millis(40)
    );
    assert_eq!(
        StringUtils::parse_millis("2s").expect("seconds"),
        Duration::from_secs(2)
    );

    let err = StringUtils::parse_millis("5x").expect_err("invalid suffix");
    assert!(matches!(err, CkeditError::Config(_)));

    let err = StringUtils::parse_millis("xs").expect_err("invalid number");
    assert!(matches!(err, CkeditError::Config(_)));
}
