use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const HEADER: &str = "firstName,lastName,gameId,gameDate,gameType,win,points,assists";

fn fixture(dir: &Path) -> PathBuf {
    let p = dir.join("games.csv");
    let body = format!(
        "{HEADER}\n\
         Ann,Lee,G1,2023-10-15,Regular Season,1,10,2\n\
         Bob,Ray,G1,2023-10-15,Regular Season,0,4,1\n\
         Ann,Lee,G2,2024-03-01,Regular Season,0,4,0\n\
         Bob,Ray,G2,2024-03-01,Regular Season,1,10,3\n\
         Cy,Ng,G2,2024-03-01,Regular Season,1,7,0\n\
         Dee,Ko,G3,2024-04-30,Playoffs,1,99,9\n"
    );
    fs::write(&p, body).unwrap();
    p
}

fn points_only(dir: &Path) -> PathBuf {
    let p = dir.join("weights.json");
    fs::write(&p, r#"{"weights":{"points":1},"win_multiplier":1}"#).unwrap();
    p
}

fn bv() -> Command {
    let mut cmd = Command::cargo_bin("bv").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn full_run_writes_artifacts_and_prints_table() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let w = points_only(dir.path());
    let out = dir.path().join("out");

    bv().arg("--input")
        .arg(&csv)
        .arg("--weights")
        .arg(&w)
        .arg("--out")
        .arg(&out)
        .args(["--render", "text", "json", "--emit-records", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024       1  Bob Ray      5"))
        .stdout(predicate::str::contains("Ann Lee"));

    for name in ["leaderboard.json", "run_record.json", "report.json", "report.txt", "records.csv"] {
        assert!(out.join(name).is_file(), "{name} missing");
    }

    let lb: serde_json::Value = serde_json::from_slice(&fs::read(out.join("leaderboard.json")).unwrap()).unwrap();
    assert_eq!(lb["entries"][0]["player_name"], "Bob Ray");
    assert_eq!(lb["entries"][0]["season_total_votes"], 5);
    assert!(lb["id"].as_str().unwrap().starts_with("LB:"));

    let run: serde_json::Value = serde_json::from_slice(&fs::read(out.join("run_record.json")).unwrap()).unwrap();
    assert_eq!(run["outputs"]["leaderboard_id"], lb["id"]);

    let report = fs::read_to_string(out.join("report.json")).unwrap();
    let summary = report.find("\"summary\"").unwrap();
    let seasons = report.find("\"seasons\":[").unwrap();
    assert!(summary < seasons, "report.json keeps section order");
    let report: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(report["cover"]["title"], "Season vote leaderboard");
    assert_eq!(report["seasons"][0]["rows"][0]["player"], "Bob Ray");

    let records = fs::read_to_string(out.join("records.csv")).unwrap();
    let mut lines = records.lines();
    assert_eq!(
        lines.next(),
        Some("game_id,game_date,season,player_name,win,score,votes,season_total_votes")
    );
    assert_eq!(lines.next(), Some("G1,2023-10-15,2024,Ann Lee,true,10.0,3,4"));
    assert_eq!(records.lines().count(), 6);
}

#[test]
fn leaderboard_is_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let w = points_only(dir.path());
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    for out in [&a, &b] {
        bv().arg("--input").arg(&csv).arg("--weights").arg(&w).arg("--out").arg(out).arg("--quiet")
            .assert()
            .success();
    }
    assert_eq!(
        fs::read(a.join("leaderboard.json")).unwrap(),
        fs::read(b.join("leaderboard.json")).unwrap()
    );
}

#[test]
fn missing_statistic_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    bv().arg("--input")
        .arg(&csv)
        .arg("--out")
        .arg(dir.path().join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing statistic"));
    assert!(!dir.path().join("out").join("leaderboard.json").exists());
}

#[test]
fn validate_only_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out = dir.path().join("out");
    bv().arg("--input")
        .arg(&csv)
        .args(["--weight", "points=1", "--weight", "assists=0.5"])
        .arg("--weights")
        .arg(points_only(dir.path()))
        .arg("--out")
        .arg(&out)
        .arg("--validate-only")
        .assert()
        .success()
        .stderr(predicate::str::contains("validate-only: inputs OK"));
    assert!(!out.exists());
}

#[test]
fn print_defaults_is_a_loadable_weight_file() {
    let output = bv().arg("--print-defaults").assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(v["weights"]["blocks"], 3.0);
    assert_eq!(v["win_multiplier"], 1.25);
}

#[test]
fn url_inputs_are_rejected() {
    bv().args(["--input", "https://example.com/games.csv"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scheme"));
}

#[test]
fn unparseable_date_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("bad.csv");
    fs::write(&csv, format!("{HEADER}\nAnn,Lee,G1,someday,Regular Season,1,10,2\n")).unwrap();
    bv().arg("--input")
        .arg(&csv)
        .arg("--weights")
        .arg(points_only(dir.path()))
        .arg("--out")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("someday"));
}

#[test]
fn out_of_range_weight_warns_but_runs() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    bv().arg("--input")
        .arg(&csv)
        .arg("--weights")
        .arg(points_only(dir.path()))
        .args(["--weight", "points=9", "--out"])
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stderr(predicate::str::contains("outside the usual range"));
}
