#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rdm(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rdm").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RDM_DEVICE")
        .env("RDM_CONFIG", dir.path().join("rdm.yaml"));
    cmd
}

fn healthy_node(server: &mut mockito::ServerGuard) {
    server
        .mock("GET", "/rdm/portstatus")
        .with_body(
            r#"[{"port":1,"direction":"output","status":"idle"},
                {"port":2,"direction":"input","status":"rdm"}]"#,
        )
        .create();
    server
        .mock("GET", "/rdm/tod?1")
        .with_body(r#"{"tod":["t1a","t1b"]}"#)
        .create();
    server
        .mock("GET", "/rdm/tod?2")
        .with_body(r#"{"tod":["t2a"]}"#)
        .create();
    server
        .mock("GET", "/rdm/queue")
        .with_body(r#"{"uid":["7ff0:00000042"]}"#)
        .create();
}

// ---------------------------------------------------------------------------
// rdm config
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_default_file() {
    let dir = TempDir::new().unwrap();
    rdm(&dir)
        .args(["--device", "http://10.0.0.9/", "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let content = std::fs::read_to_string(dir.path().join("rdm.yaml")).unwrap();
    assert!(content.contains("http://10.0.0.9/"));
    assert!(content.contains("interval_secs: 5"));
}

#[test]
fn config_init_never_overwrites() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rdm.yaml"), "device:\n  url: http://keep.me/\n").unwrap();
    rdm(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(dir.path().join("rdm.yaml")).unwrap();
    assert!(content.contains("http://keep.me/"));
}

#[test]
fn config_validate_accepts_defaults() {
    let dir = TempDir::new().unwrap();
    rdm(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_rejects_bad_url() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rdm.yaml"), "device:\n  url: ftp://node\n").unwrap();
    rdm(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] device.url"));
}

#[test]
fn config_show_json_applies_device_flag() {
    let dir = TempDir::new().unwrap();
    let output = rdm(&dir)
        .args(["--json", "--device", "http://flag.local/", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["device"]["url"], "http://flag.local/");
}

// ---------------------------------------------------------------------------
// rdm refresh
// ---------------------------------------------------------------------------

#[test]
fn refresh_prints_three_fragments() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    healthy_node(&mut server);

    rdm(&dir)
        .args(["--device", &server.url(), "refresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<!-- idCfg -->"))
        .stdout(predicate::str::contains(
            "<tr><td>2</td><td>input</td><td>rdm</td></tr>",
        ))
        .stdout(predicate::str::contains(
            "<tr><td colspan=\"3\">7ff0:00000042</td></tr>",
        ))
        .stdout(predicate::str::contains(
            "<table><tr><th>1</th><th>2</th></tr><tr><td>t1a<br/>t1b<br/></td><td>t2a<br/></td></tr></table>",
        ));
}

#[test]
fn refresh_json_includes_report() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    healthy_node(&mut server);

    let output = rdm(&dir)
        .args(["--json", "--device", &server.url(), "refresh"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["outcome"], "rendered");
    assert_eq!(json["report"]["queue_len"], 1);
    assert!(json["regions"]["idDis"].as_str().unwrap().starts_with("<table>"));
}

#[test]
fn refresh_against_dead_node_is_quiet_success() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server.mock("GET", "/rdm/portstatus").with_status(500).create();

    rdm(&dir)
        .args(["--device", &server.url(), "refresh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("refresh aborted"));
}

// ---------------------------------------------------------------------------
// rdm status
// ---------------------------------------------------------------------------

#[test]
fn status_prints_tables() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    healthy_node(&mut server);

    rdm(&dir)
        .args(["--device", &server.url(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PORT  DIRECTION  STATUS"))
        .stdout(predicate::str::contains("7ff0:00000042"))
        .stdout(predicate::str::contains("PORT 1  PORT 2"));
}

#[test]
fn status_reports_node_failure() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server.mock("GET", "/rdm/portstatus").with_status(503).create();

    rdm(&dir)
        .args(["--device", &server.url(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("port status fetch failed"));
}

// ---------------------------------------------------------------------------
// rdm watch
// ---------------------------------------------------------------------------

#[test]
fn watch_once_writes_region_files() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    healthy_node(&mut server);
    let out = dir.path().join("out");

    rdm(&dir)
        .args(["--device", &server.url(), "watch", "--once", "--out"])
        .arg(&out)
        .assert()
        .success();

    let cfg = std::fs::read_to_string(out.join("idCfg.html")).unwrap();
    assert!(cfg.starts_with("<tr><th>Port</th>"));
    let que = std::fs::read_to_string(out.join("idQue.html")).unwrap();
    assert_eq!(que, "<tr><td colspan=\"3\">7ff0:00000042</td></tr>");
    assert!(out.join("idDis.html").exists());
}

#[test]
fn watch_rejects_zero_interval() {
    let dir = TempDir::new().unwrap();
    rdm(&dir)
        .args(["watch", "--interval", "0", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1 second"));
}
