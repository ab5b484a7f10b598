use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PAYLOAD: &str = r#"{
    "highlightedContent": "<tr><td class=\"line\" data-line=\"1\"></td><td class=\"code\">a</td></tr><tr><td class=\"line\" data-line=\"2\"></td><td class=\"code\">b</td></tr><tr><td class=\"line\" data-line=\"3\"></td><td class=\"code\">c</td></tr>",
    "lineWindows": [
        {"startLine": 0, "endLine": 2, "score": 10},
        {"startLine": 1, "endLine": 3, "score": 20}
    ]
}"#;

fn glance(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("glance").expect("binary should compile");
    cmd.current_dir(dir).env_remove("GLANCE_ENDPOINT").env_remove("RUST_LOG");
    cmd
}

fn write_payload(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("payload.json");
    fs::write(&path, PAYLOAD).expect("payload should be written");
    path
}

#[test]
fn scores_csv_from_payload_file() {
    let dir = TempDir::new().expect("temp dir should be created");
    let payload = write_payload(dir.path());

    glance(dir.path())
        .args(["scores", "--format", "csv", "--payload"])
        .arg(&payload)
        .assert()
        .success()
        .stdout("line,average,intensity,windows\n1,10,0,1\n2,15,0.45,2\n3,20,0.9,1\n");
}

#[test]
fn scores_from_payload_dir() {
    let dir = TempDir::new().expect("temp dir should be created");
    fs::create_dir_all(dir.path().join("payloads/src")).expect("dirs should be created");
    fs::write(dir.path().join("payloads/src/lib.rs.json"), PAYLOAD).expect("payload written");

    glance(dir.path())
        .args(["scores", "--format", "json", "--payload-dir", "payloads", "--file", "src/lib.rs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"file\": \"src/lib.rs\""))
        .stdout(predicate::str::contains("\"maxScore\": 20.0"));
}

#[test]
fn render_writes_painted_page() {
    let dir = TempDir::new().expect("temp dir should be created");
    let payload = write_payload(dir.path());
    let output = dir.path().join("out.html");

    glance(dir.path())
        .args(["render", "--no-open", "--file", "src/lib.rs", "--payload"])
        .arg(&payload)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let html = fs::read_to_string(&output).expect("page should exist");
    assert!(html.contains(
        r#"[data-line="2"] + .code { background-color: rgba(255, 180, 255, 0.45); }"#
    ));
    assert!(html.contains("<title>src/lib.rs"));
}

#[test]
fn top_lists_best_window_first() {
    let dir = TempDir::new().expect("temp dir should be created");
    let payload = write_payload(dir.path());

    glance(dir.path())
        .args(["top", "-n", "1", "--payload"])
        .arg(&payload)
        .assert()
        .success()
        .stdout("lines 1-3  score 20.00000\n");
}

#[test]
fn missing_source_fails() {
    let dir = TempDir::new().expect("temp dir should be created");

    glance(dir.path())
        .args(["scores", "--file", "src/lib.rs"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no score source configured"));
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().expect("temp dir should be created");

    glance(dir.path())
        .args(["scores", "--payload-dir", "payloads"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing --file"));
}

#[test]
fn config_file_supplies_payload_dir() {
    let dir = TempDir::new().expect("temp dir should be created");
    fs::create_dir_all(dir.path().join("scores")).expect("dir should be created");
    fs::write(dir.path().join("scores/a.py.json"), PAYLOAD).expect("payload written");
    fs::write(dir.path().join("glance.toml"), "payload_dir = \"scores\"\n")
        .expect("config written");

    glance(dir.path())
        .args(["scores", "--file", "a.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INTENSITY"));
}

#[test]
fn unreachable_endpoint_is_network_error() {
    let dir = TempDir::new().expect("temp dir should be created");
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr");

    glance(dir.path())
        .args(["scores", "--file", "a.py", "--endpoint"])
        .arg(format!("http://{}/glance", addr))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("network error"));
}

#[test]
fn verbose_and_quiet_conflict() {
    let dir = TempDir::new().expect("temp dir should be created");

    glance(dir.path())
        .args(["-v", "-q", "top", "--file", "x"])
        .assert()
        .code(2);
}
