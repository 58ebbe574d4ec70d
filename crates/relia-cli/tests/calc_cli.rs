//! Integration tests for the relia binary

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join(relative)
}

fn copy_demo(target: &Path) -> PathBuf {
    let workbook = target.join("feeder_demo");
    fs::create_dir_all(&workbook).unwrap();
    for sheet in ["主线.csv", "分支.csv"] {
        fs::copy(repo_path("test_data/feeder_demo").join(sheet), workbook.join(sheet)).unwrap();
    }
    workbook
}

#[test]
fn calc_writes_tables_next_to_input() {
    let tmp = tempdir().unwrap();
    let workbook = copy_demo(tmp.path());

    cargo_bin_cmd!("relia")
        .args(["calc", workbook.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("全线路"))
        .stdout(predicate::str::contains("SAIDI"))
        .stderr(predicate::str::contains("Diagnostics: 1 warning"))
        .stderr(predicate::str::contains("[warning:laying]"));

    let out = tmp.path().join("feeder_demo_可靠性计算结果");
    for file in ["主线分段明细.csv", "分支分段明细.csv", "指标汇总.csv", "summary.json"] {
        assert!(out.join(file).exists(), "{file} should be written");
    }
}

#[test]
fn calc_json_summary_with_explicit_output() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("results");

    let assert = cargo_bin_cmd!("relia")
        .args([
            "--log-level",
            "warn",
            "calc",
            repo_path("test_data/feeder_demo").to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let summaries: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let rows = summaries.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2]["scope"], "feeder");
    assert_eq!(rows[2]["total_customers"], 111);
    let asai = rows[2]["asai"].as_f64().unwrap();
    assert!(asai > 0.99 && asai < 1.0);
    assert!(out.join("指标汇总.csv").exists());
}

#[test]
fn calc_uses_settings_file() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("relia.toml");
    fs::write(
        &config,
        r#"
[constants]
repair_minutes = 180.0
remote_switching_minutes = 30.0

[constants.failure_rate]
cable = 0.1
overhead = 0.5
"#,
    )
    .unwrap();
    let workbook = tmp.path().join("wb");
    fs::create_dir_all(&workbook).unwrap();
    fs::write(
        workbook.join("主线.csv"),
        "序号,线路分段,长度(km),用户数量(台),线路型号,起点有无开关,起点是否自动化\n\
         1,M1,1.0,10,JKLYJ-240,无,否\n\
         2,M2,2.0,20,JKLYJ-240,有,否\n",
    )
    .unwrap();

    let assert = cargo_bin_cmd!("relia")
        .args([
            "calc",
            workbook.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
            "-o",
            tmp.path().join("out").to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let summaries: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let saidi = summaries[2]["saidi"].as_f64().unwrap();
    assert!((saidi - 150.0).abs() < 1e-9);
}

#[test]
fn incomplete_constants_fail_with_kind() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("bad.toml");
    fs::write(&config, "[constants]\nrepair_minutes = 180.0\n").unwrap();

    cargo_bin_cmd!("relia")
        .args([
            "calc",
            repo_path("test_data/feeder_demo").to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
            "-o",
            tmp.path().join("out").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ConfigurationError"))
        .stderr(predicate::str::contains("failure_rate"));
}

#[test]
fn missing_workbook_is_io_error() {
    let tmp = tempdir().unwrap();
    cargo_bin_cmd!("relia")
        .args(["calc", tmp.path().join("absent").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IoError"));
}

#[test]
fn zero_customers_is_degenerate() {
    let tmp = tempdir().unwrap();
    let workbook = tmp.path().join("empty_feeder");
    fs::create_dir_all(&workbook).unwrap();
    fs::write(
        workbook.join("主线.csv"),
        "序号,线路分段,长度(km),用户数量(台),线路型号,起点有无开关,起点是否自动化\n\
         1,M1,1.0,0,JKLYJ-240,无,否\n",
    )
    .unwrap();

    cargo_bin_cmd!("relia")
        .args(["calc", workbook.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DegenerateInputError"));
}

#[test]
fn inspect_reports_structure() {
    cargo_bin_cmd!("relia")
        .args([
            "inspect",
            repo_path("test_data/feeder_demo").to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total customers:"))
        .stdout(predicate::str::contains("111"))
        .stdout(predicate::str::contains("支线1"))
        .stdout(predicate::str::contains("主线2段"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("relia.toml");

    cargo_bin_cmd!("relia")
        .args(["config", "init", path.to_str().unwrap()])
        .assert()
        .success();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[constants.failure_rate]"));

    cargo_bin_cmd!("relia")
        .args(["config", "init", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cargo_bin_cmd!("relia")
        .args(["config", "init", path.to_str().unwrap(), "--force"])
        .assert()
        .success();
}
