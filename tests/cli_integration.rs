use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use tempfile::tempdir;

const COOKIES_JSON: &str = r#"[
  {"name": "sid", "value": "1", "domain": "a.example.com", "path": "/", "secure": true},
  {"name": "lang", "value": "en", "domain": "a.example.com", "path": "/"},
  {"name": "t", "value": "x", "domain": "b.test.com", "path": "/"}
]"#;

fn write_cookies(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("cookies.json");
    std::fs::write(&path, COOKIES_JSON).expect("write cookie file");
    path
}

#[test]
fn test_cli_help_succeeds() {
    let output = cargo_bin_cmd!("ckedit")
        .arg("--help")
        .output()
        .expect("run ckedit");
    assert!(output.status.success(), "help should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "help should include usage text");
}

#[test]
fn test_cli_list_with_filter() {
    let temp = tempdir().expect("tempdir");
    let path = write_cookies(temp.path());

    let output = cargo_bin_cmd!("ckedit")
        .arg("list")
        .arg("--file")
        .arg(&path)
        .arg("--filter")
        .arg("test")
        .output()
        .expect("run ckedit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Domains: 1 / 2"));
    assert!(stdout.contains("b.test.com"));
    assert!(stdout.contains("    t=x"));
    assert!(!stdout.contains("a.example.com"));
}

#[test]
fn test_cli_list_reports_not_found() {
    let temp = tempdir().expect("tempdir");
    let path = write_cookies(temp.path());

    let output = cargo_bin_cmd!("ckedit")
        .args(["list", "--filter", "nowhere"])
        .arg("--file")
        .arg(&path)
        .output()
        .expect("run ckedit");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Cookie Not Found!"));
}

#[test]
fn test_cli_list_json() {
    let temp = tempdir().expect("tempdir");
    let path = write_cookies(temp.path());

    let output = cargo_bin_cmd!("ckedit")
        .args(["list", "--json", "--url", "https://www.example.com/"])
        .arg("--file")
        .arg(&path)
        .output()
        .expect("run ckedit");

    assert!(output.status.success());
    let view: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(view["total"], 2);
    assert_eq!(view["matched"], 1);
    assert_eq!(view["domains"]["a.example.com"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_cli_delete_writes_file_back() {
    let temp = tempdir().expect("tempdir");
    let path = write_cookies(temp.path());

    let output = cargo_bin_cmd!("ckedit")
        .args(["delete", "--filter", "example"])
        .arg("--file")
        .arg(&path)
        .output()
        .expect("run ckedit");
    assert!(output.status.success());

    let saved = std::fs::read_to_string(&path).expect("read back");
    let cookies: Vec<serde_json::Value> = serde_json::from_str(&saved).expect("JSON list");
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0]["domain"], "b.test.com");
}

#[test]
fn test_cli_set_from_stdin() {
    let temp = tempdir().expect("tempdir");
    let path = write_cookies(temp.path());

    let output = cargo_bin_cmd!("ckedit")
        .args(["set", "a.example.com"])
        .arg("--file")
        .arg(&path)
        .write_stdin("sid=2\nfresh=yes\n")
        .output()
        .expect("run ckedit");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sid=2"));
    assert!(stdout.contains("fresh=yes"));
    assert!(!stdout.contains("lang=en"));

    let saved = std::fs::read_to_string(&path).expect("read back");
    assert!(saved.contains("\"fresh\""));
    assert!(!saved.contains("\"lang\""));
}

#[test]
fn test_cli_set_unknown_domain_fails() {
    let temp = tempdir().expect("tempdir");
    let path = write_cookies(temp.path());

    let output = cargo_bin_cmd!("ckedit")
        .args(["set", "missing.org", "a=1"])
        .arg("--file")
        .arg(&path)
        .output()
        .expect("run ckedit");
    assert_eq!(output.status.code(), Some(6));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.org"));
}

#[test]
fn test_cli_export_netscape() {
    let temp = tempdir().expect("tempdir");
    let path = write_cookies(temp.path());
    let target = temp.path().join("cookies.txt");

    let output = cargo_bin_cmd!("ckedit")
        .args(["export", "--format", "netscape"])
        .arg(&target)
        .arg("--file")
        .arg(&path)
        .output()
        .expect("run ckedit");
    assert!(output.status.success());

    let text = std::fs::read_to_string(&target).expect("exported file");
    assert!(text.starts_with("# Netscape HTTP Cookie File"));
    assert!(text.contains("\na.example.com\tFALSE\t/\tTRUE\t0\tsid\t1"));
}

#[test]
fn test_cli_drops_expired_cookies_on_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("cookies.json");
    std::fs::write(
        &path,
        r#"[
  {"name": "old", "value": "1", "domain": "x.com", "expirationDate": 1.0},
  {"name": "keep", "value": "2", "domain": "x.com", "expirationDate": 32503680000.0}
]"#,
    )
    .expect("write cookie file");

    let output = cargo_bin_cmd!("ckedit")
        .arg("list")
        .arg("--file")
        .arg(&path)
        .output()
        .expect("run ckedit");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("keep=2"));
    assert!(!stdout.contains("old=1"));
}

#[test]
fn test_cli_missing_file_fails() {
    let temp = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("ckedit")
        .arg("list")
        .arg("--file")
        .arg(temp.path().join("absent.json"))
        .output()
        .expect("run ckedit");
    assert_eq!(output.status.code(), Some(37));
}

#[test]
fn test_cli_shell_deletes_filtered_domains() {
    let temp = tempdir().expect("tempdir");
    let path = write_cookies(temp.path());

    let output = cargo_bin_cmd!("ckedit")
        .arg("shell")
        .arg("--file")
        .arg(&path)
        .write_stdin("filter test\ndelete-all\nquit\n")
        .output()
        .expect("run ckedit");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Domains: 1 / 2"));
    assert!(stdout.contains("Cookie Not Found!"));

    let saved = std::fs::read_to_string(&path).expect("read back");
    assert!(!saved.contains("b.test.com"));
    assert!(saved.contains("a.example.com"));
}
