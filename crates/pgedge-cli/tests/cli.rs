//! cli.rs
//!
//! Drives the `pgedgecli` binary end to end against a temporary home
//! directory. Nothing here needs a running broker: `cluster init` is only
//! exercised on paths that fail before or at connect time.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

fn pgedgecli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pgedgecli").unwrap();
    cmd.env_remove("PGEDGE_BROKER")
        .env_remove("RUST_LOG")
        .env("USER", "tester")
        .arg("--home")
        .arg(home);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.output().unwrap();
    assert!(
        out.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

fn read_cluster(home: &Path, name: &str) -> Value {
    let file = home.join("cluster").join(name).join(format!("{name}.json"));
    serde_json::from_str(&fs::read_to_string(file).unwrap()).unwrap()
}

#[test]
fn version_prints_package_version() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(pgedgecli(home.path()).arg("version"));
    assert_eq!(
        out.trim(),
        format!("pgedgecli version {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn create_json_with_defaults_writes_the_cluster_file() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(pgedgecli(home.path()).args([
        "cluster",
        "create-json",
        "demo",
        "2",
        "mydb",
        "admin",
        "secret",
        "--defaults",
    ]));
    assert!(out.contains("Cluster JSON file created successfully at:"));

    let doc = read_cluster(home.path(), "demo");
    assert_eq!(doc["json_version"], "1.1");
    assert_eq!(doc["cluster_name"], "demo");
    assert_eq!(doc["pgedge"]["pg_version"], "16");
    assert_eq!(doc["pgedge"]["databases"][0]["db_name"], "mydb");
    assert!(!doc["update_date"].as_str().unwrap().is_empty());

    let nodes = doc["node_groups"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["name"], "n1");
    assert_eq!(nodes[0]["port"], "5432");
    assert_eq!(nodes[0]["is_active"], "on");
    assert_eq!(nodes[1]["name"], "n2");
    assert_eq!(nodes[1]["port"], "5433");
    assert_eq!(nodes[1]["public_ip"], "127.0.0.1");
}

#[test]
fn create_json_defaults_honors_version_and_port() {
    let home = TempDir::new().unwrap();
    stdout_of(pgedgecli(home.path()).args([
        "cluster",
        "create-json",
        "east",
        "3",
        "app",
        "owner",
        "pw",
        "--defaults",
        "--pg-version",
        "15",
        "--port",
        "6432",
    ]));

    let doc = read_cluster(home.path(), "east");
    assert_eq!(doc["pgedge"]["pg_version"], "15");
    let ports: Vec<&str> = doc["node_groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["port"].as_str().unwrap())
        .collect();
    assert_eq!(ports, ["6432", "6433", "6434"]);
}

#[test]
fn create_json_interactive_reads_answers_from_stdin() {
    let home = TempDir::new().unwrap();
    let answers = "15\n6000\n\
                   alpha\n10.0.0.1\n\n\nyes\nr1\n10.0.0.9\nno\n\
                   beta\n10.0.0.2\n10.1.0.2\n/data/beta\nno\n";
    stdout_of(
        pgedgecli(home.path())
            .args(["cluster", "create-json", "demo", "2", "mydb", "admin", "secret"])
            .write_stdin(answers),
    );

    let doc = read_cluster(home.path(), "demo");
    assert_eq!(doc["pgedge"]["pg_version"], "15");

    let alpha = &doc["node_groups"][0];
    assert_eq!(alpha["name"], "alpha");
    assert_eq!(alpha["port"], "6000");
    assert_eq!(alpha["private_ip"], "10.0.0.1");
    assert_eq!(
        alpha["path"],
        home.path().join("demo").join("alpha").to_string_lossy().as_ref()
    );
    let replica = &alpha["sub_nodes"][0];
    assert_eq!(replica["name"], "r1");
    assert_eq!(replica["is_active"], "off");
    assert_eq!(replica["port"], "5432");
    assert_eq!(replica["public_ip"], "10.0.0.9");

    let beta = &doc["node_groups"][1];
    assert_eq!(beta["port"], "6001");
    assert_eq!(beta["private_ip"], "10.1.0.2");
    assert_eq!(beta["path"], "/data/beta");
    assert!(beta.get("sub_nodes").is_none());
}

#[test]
fn create_json_fails_when_stdin_runs_out() {
    let home = TempDir::new().unwrap();
    pgedgecli(home.path())
        .args(["cluster", "create-json", "demo", "2", "mydb", "admin", "secret"])
        .write_stdin("16\n5432\n")
        .assert()
        .failure();
    assert!(!home.path().join("cluster").join("demo").exists());
}

#[test]
fn create_json_rejects_empty_credentials() {
    let home = TempDir::new().unwrap();
    let out = pgedgecli(home.path())
        .args(["cluster", "create-json", "demo", "1", "mydb", "", "secret", "--defaults"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("validation error"));
    assert!(!home.path().join("cluster").join("demo").exists());
}

#[test]
fn create_json_rejects_zero_nodes() {
    let home = TempDir::new().unwrap();
    pgedgecli(home.path())
        .args(["cluster", "create-json", "demo", "0", "mydb", "admin", "secret", "--defaults"])
        .assert()
        .failure();
}

#[test]
fn json_flag_emits_a_machine_readable_summary() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(pgedgecli(home.path()).args([
        "--json",
        "cluster",
        "create-json",
        "demo",
        "2",
        "mydb",
        "admin",
        "secret",
        "--defaults",
    ]));

    let summary: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(summary["cluster"], "demo");
    assert_eq!(summary["pg_version"], "16");
    assert_eq!(summary["nodes"][1]["port"], "5433");
    assert!(summary["file"].as_str().unwrap().ends_with("demo.json"));
}

#[test]
fn init_on_missing_cluster_fails() {
    let home = TempDir::new().unwrap();
    let out = pgedgecli(home.path())
        .args(["cluster", "init", "nowhere"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to load cluster JSON"));
}

#[test]
fn init_with_unreachable_broker_fails() {
    let home = TempDir::new().unwrap();
    stdout_of(pgedgecli(home.path()).args([
        "cluster", "create-json", "demo", "1", "mydb", "admin", "secret", "--defaults",
    ]));

    let out = pgedgecli(home.path())
        .args([
            "cluster",
            "init",
            "demo",
            "--broker",
            "tcp://127.0.0.1:1",
            "--connect-timeout",
            "2",
        ])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to connect to MQTT broker"));
}

#[test]
fn init_rejects_bad_broker_url() {
    let home = TempDir::new().unwrap();
    stdout_of(pgedgecli(home.path()).args([
        "cluster", "create-json", "demo", "1", "mydb", "admin", "secret", "--defaults",
    ]));

    pgedgecli(home.path())
        .args(["cluster", "init", "demo", "--broker", "http://localhost:1883"])
        .assert()
        .failure();
}

#[test]
fn node_commands_use_the_placeholder_backend() {
    let home = TempDir::new().unwrap();

    let out = stdout_of(pgedgecli(home.path()).args(["cluster", "add-node", "--node", "n4"]));
    assert_eq!(out.trim(), "Node added successfully.");

    let out = stdout_of(pgedgecli(home.path()).args(["cluster", "remove-node", "--node", "n4"]));
    assert_eq!(out.trim(), "Node removed successfully.");

    let out = stdout_of(pgedgecli(home.path()).args(["cluster", "list-nodes"]));
    assert_eq!(out.trim(), "Nodes in the cluster:\nnode1\nnode2\nnode3");
}

#[test]
fn node_commands_require_a_name() {
    let home = TempDir::new().unwrap();
    pgedgecli(home.path())
        .args(["cluster", "add-node"])
        .assert()
        .failure();
    pgedgecli(home.path())
        .args(["cluster", "remove-node", "--node", ""])
        .assert()
        .failure();

    let out = stdout_of(pgedgecli(home.path()).args(["cluster", "remove-node", "--node", "  "]));
    assert_eq!(out.trim(), "Node removed successfully.");
}

#[test]
fn spock_set_commands() {
    let home = TempDir::new().unwrap();

    let out = stdout_of(pgedgecli(home.path()).args(["spock", "create-set", "--set", "s1"]));
    assert_eq!(out.trim(), "Replication set created successfully.");

    let out = stdout_of(pgedgecli(home.path()).args(["spock", "drop-set", "--set", "s1"]));
    assert_eq!(out.trim(), "Replication set dropped successfully.");

    let out = stdout_of(pgedgecli(home.path()).args(["spock", "check-set", "--set", "s1"]));
    assert_eq!(out.trim(), "Replication set status: active");

    pgedgecli(home.path())
        .args(["spock", "check-set"])
        .assert()
        .failure();
}
