use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("career").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("careergraph-cli"));
    cmd.env_remove("CAREERGRAPH_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn validate_accepts_valid_fixture() {
    let output = cli()
        .args(["validate", fixture("valid.json").to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!([]));
}

#[test]
fn validate_reports_issues_with_exit_code_3() {
    let output = cli()
        .args(["validate", fixture("invalid.json").to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(3));

    let issues = stdout_json(&output);
    let kinds: Vec<(&str, &str)> = issues
        .as_array()
        .expect("array")
        .iter()
        .map(|i| {
            (
                i["entryId"].as_str().unwrap_or_default(),
                i["type"].as_str().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("a", "invalid_date"),
            ("b", "missing_field"),
            ("b", "invalid_parent"),
        ]
    );
}

#[test]
fn validate_flags_both_ends_of_a_cycle() {
    let output = cli()
        .args(["validate", fixture("cycle.json").to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(3));
    let issues = stdout_json(&output);
    let cyclic = issues
        .as_array()
        .expect("array")
        .iter()
        .filter(|i| i["type"] == "circular_reference")
        .count();
    assert_eq!(cyclic, 2);
}

#[test]
fn layout_prints_graph_json() {
    let output = cli()
        .args([
            "layout",
            "--present",
            "2024-06-30",
            fixture("valid.json").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let layout = stdout_json(&output);
    let nodes = layout["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["id"], "acme-eng");
    assert_eq!(nodes[0]["lane"], 1);
    assert_eq!(nodes[1]["lane"], 2);
    assert!(nodes.iter().all(|n| n["labelX"].is_number()));
    assert_eq!(layout["edges"][0]["kind"], "trunk");
}

#[test]
fn layout_reads_stdin_and_honors_config() {
    let text = fs::read_to_string(fixture("valid.json")).expect("read fixture");
    let output = cli()
        .args([
            "layout",
            "--config",
            fixture("config.json").to_string_lossy().as_ref(),
            "-",
        ])
        .write_stdin(text)
        .output()
        .expect("run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let layout = stdout_json(&output);
    assert_eq!(layout["theme"]["mainColor"], "#111827");
    assert_eq!(layout["nodes"][0]["color"], "#0ea5e9");
}

#[test]
fn strict_layout_rejects_invalid_input() {
    cli()
        .args([
            "layout",
            "--strict",
            fixture("cycle.json").to_string_lossy().as_ref(),
        ])
        .assert()
        .code(3);
}

#[test]
fn lenient_layout_draws_cycles_anyway() {
    let output = cli()
        .args(["layout", fixture("cycle.json").to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["nodes"].as_array().map(Vec::len), Some(2));
}

#[test]
fn timeline_orders_by_start_date() {
    let output = cli()
        .args([
            "timeline",
            "--order",
            "oldest",
            fixture("valid.json").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success());
    let items = stdout_json(&output);
    let ids: Vec<&str> = items
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|i| i["id"].as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["acme-eng", "acme-oncall", "acme-guild", "globex", "globex-oss"]
    );
}

#[test]
fn render_writes_svg_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("career.svg");
    cli()
        .args([
            "render",
            "--id",
            "my career",
            "--title",
            "Career",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("valid.json").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with(r#"<svg id="my-career""#));
    assert!(svg.contains("Globex"));
    assert!(svg.contains("Jul 2019 - Present"));
}

#[test]
fn render_png_defaults_next_to_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("career.json");
    fs::copy(fixture("valid.json"), &input).expect("copy fixture");

    cli()
        .args(["render", "--format", "png", input.to_string_lossy().as_ref()])
        .assert()
        .success();

    let bytes = fs::read(input.with_extension("png")).expect("read png");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "output is not a PNG");
}

#[test]
fn bad_arguments_exit_with_usage() {
    cli().args(["render", "--format", "gif"]).assert().code(2);
    cli().args(["layout", "--present", "tomorrow"]).assert().code(2);
}

#[test]
fn malformed_json_fails() {
    cli()
        .args(["validate", "-"])
        .write_stdin("{ not json")
        .assert()
        .code(1);
}
