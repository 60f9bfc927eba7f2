//! End-to-end tests for the ganttline subcommands
//!
//! Every test pins `--now` so the today marker and tick output are stable.

use std::path::PathBuf;
use std::process::{Command, Output};

const NOW: &str = "2024-01-08T00:00:00Z";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn ganttline(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ganttline"))
        .args(args)
        .output()
        .expect("failed to execute ganttline")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "ganttline failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

fn plan() -> String {
    fixture("release_plan.json").display().to_string()
}

#[test]
fn rows_lists_groups_in_first_seen_order() {
    let out = stdout(&ganttline(&["rows", &plan(), "--now", NOW]));
    let expected = "\
domain: 1/1/2024 - 1/20/2024
visible: 1/1/2024 - 1/20/2024
[-] Phase A
    Design (1) 50%
    Build (2) 100%
[-] Phase B
    Build (2) 100%
[-] Not Assigned
    Backlog grooming (3) no dates
";
    assert_eq!(out, expected);
}

#[test]
fn raw_mode_keeps_duplicate_ids() {
    let out = stdout(&ganttline(&["rows", &plan(), "--now", NOW, "--raw"]));
    assert!(out.starts_with("domain: 6/1/2023 - 1/20/2024\n"));
    assert!(out.contains("[-] Phase C\n    Design (duplicate) (1) 0%\n"));
}

#[test]
fn collapse_flag_hides_items() {
    let out = stdout(&ganttline(&["rows", &plan(), "--now", NOW, "--collapse", "Phase A"]));
    assert!(out.contains("[+] Phase A\n[-] Phase B\n"));
    assert!(!out.contains("Design (1)"));
}

#[test]
fn legend_assigns_palette_in_first_seen_order() {
    let out = stdout(&ganttline(&["legend", &plan(), "--now", NOW]));
    assert_eq!(out, "Platform\t#0078d4\nApps\t#e3008c\n");
}

#[test]
fn tooltip_text_and_html() {
    let out = stdout(&ganttline(&["tooltip", &plan(), "--now", NOW, "--task", "1"]));
    assert_eq!(
        out,
        "Design\nPhase: Phase A\nStart: 1/1/2024\nEnd: 1/10/2024\nProgress: 50%\nNote: architecture\nOwner: Alice\nDue: 1/10/2024\n"
    );

    let html = stdout(&ganttline(&["tooltip", &plan(), "--now", NOW, "--task", "3", "--html"]));
    assert!(html.starts_with("<b>Backlog grooming</b><br/>Phase: <br/>Start: <br/>End: <br/>Progress: 0%"));
}

#[test]
fn tooltip_for_unknown_task_fails() {
    let output = ganttline(&["tooltip", &plan(), "--task", "nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no task with id 'nope'"));
}

#[test]
fn click_on_bar_selects_identity() {
    let out = stdout(&ganttline(&["click", &plan(), "--now", NOW, "--x", "500", "--y", "40"]));
    assert_eq!(out, "select row-1 additive=false\n");
}

#[test]
fn context_click_launches_menu() {
    let out = stdout(&ganttline(&[
        "click", &plan(), "--now", NOW, "--x", "500", "--y", "40", "--context",
    ]));
    assert_eq!(out, "context-menu selection-0 at (500, 40)\ndefault menu suppressed\n");
}

#[test]
fn click_on_group_header_collapses_it() {
    let out = stdout(&ganttline(&["click", &plan(), "--now", NOW, "--x", "10", "--y", "5"]));
    assert!(out.contains("[+] Phase A\n[-] Phase B\n"));
}

#[test]
fn click_on_empty_space() {
    let out = stdout(&ganttline(&["click", &plan(), "--now", NOW, "--x", "10", "--y", "40"]));
    assert_eq!(out, "no target at (10, 40)\n");
}

#[test]
fn render_writes_svg_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.svg");
    let output = ganttline(&[
        "render",
        &plan(),
        "--now",
        NOW,
        "--zoom",
        "25:75",
        "-o",
        path.to_str().unwrap(),
    ]);
    stdout(&output);

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Backlog grooming"));
    assert!(svg.contains("1/5/2024"));
}

#[test]
fn render_reads_toml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("chart.toml");
    std::fs::write(
        &config,
        "width = 900\nheight = 400\nlegend_position = \"bottom\"\ncollapsed = [\"Phase B\"]\n",
    )
    .unwrap();

    let out = stdout(&ganttline(&[
        "rows",
        &plan(),
        "--now",
        NOW,
        "--config",
        config.to_str().unwrap(),
    ]));
    assert!(out.contains("[+] Phase B\n[-] Not Assigned\n"));

    let svg = stdout(&ganttline(&[
        "render",
        &plan(),
        "--now",
        NOW,
        "--config",
        config.to_str().unwrap(),
        "--width",
        "1000",
    ]));
    assert!(svg.contains("width=\"1000\""));
}

#[test]
fn bad_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("chart.toml");
    std::fs::write(&config, "zoom = [90, 10]\n").unwrap();

    let output = ganttline(&["rows", &plan(), "--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid zoom window"));
}
