//! Integration tests for the pn CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pn() -> Command {
    let mut cmd = Command::cargo_bin("pn").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A command run from an empty directory with no API credentials.
fn pn_isolated(dir: &TempDir) -> Command {
    let mut cmd = pn();
    cmd.current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL");
    cmd
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_candles_and_final_price() {
    pn().args(["simulate", "--ticks", "30", "--candle", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Market Simulation"))
        .stdout(predicate::str::contains("1-10"))
        .stdout(predicate::str::contains("21-30"))
        .stdout(predicate::str::contains("Final price"));
}

#[test]
fn simulate_is_reproducible() {
    let run = || {
        pn().args(["simulate", "--seed", "7", "--trend=0.5@3"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn simulate_writes_json() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("run.json");
    pn().args(["simulate", "--ticks", "25", "--trend=-0.8@5", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["history"].as_array().unwrap().len(), 25);
    assert_eq!(json["injections"][0]["tick"], 5);
    assert_eq!(json["injections"][0]["score"], -0.8);
    assert_eq!(json["last"]["tick"], 25);
    assert_eq!(json["market"]["volatility"], 10.0);
    assert!(json["history"].as_array().unwrap().iter().all(|p| p.as_f64().unwrap() >= 0.0));
}

#[test]
fn simulate_sustained_sell_off_goes_bankrupt() {
    pn().args([
        "simulate",
        "--ticks",
        "10",
        "--initial-price",
        "0",
        "--trend=-1@0",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("BANKRUPT"));
}

#[test]
fn simulate_rejects_bad_trend() {
    pn().args(["simulate", "--trend", "up"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid trend"));

    pn().args(["simulate", "--ticks", "5", "--trend=0.5@9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("past the end"));
}

// ---------------------------------------------------------------------------
// crowd / personas
// ---------------------------------------------------------------------------

#[test]
fn crowd_shows_raised_hands() {
    pn().args(["crowd", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30 members"))
        .stdout(predicate::str::contains("5 hands raised"));
}

#[test]
fn crowd_with_everyone_talked_raises_nothing() {
    pn().args(["crowd", "--talked", "0,1,2,3,4,5,6,7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No hands raised"));
}

#[test]
fn crowd_rejects_unknown_persona() {
    pn().args(["crowd", "--talked", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown persona index 9"));
}

#[test]
fn personas_lists_roster() {
    pn().arg("personas")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sophia Harrington"))
        .stdout(predicate::str::contains("Pulse News Network"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn offline_play_session() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("answer.wav");
    fs::write(&wav, pn_dialogue::audio::silent_wav(16_000, 1, 1600)).unwrap();
    let transcript = dir.path().join("transcript.md");

    let script = format!(
        "hands\nask 1\nanswer {}\nstatus\nask 99\nquit\n",
        wav.display()
    );
    pn_isolated(&dir)
        .args(["play", "--offline", "--raw-wav", "--transcript"])
        .arg(&transcript)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("MyPhone"))
        .stdout(predicate::str::contains("Raised hands"))
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("At the microphone"))
        .stdout(predicate::str::contains("no raised hand #99"))
        .stdout(predicate::str::contains("Press conference over"));

    let md = fs::read_to_string(&transcript).unwrap();
    assert!(md.starts_with("# Press Conference Transcript"));
    assert!(md.contains("*(spoken answer)*"));
}

#[test]
fn offline_play_reports_bad_audio_and_continues() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.wav");
    fs::write(&bogus, b"definitely not audio").unwrap();

    pn_isolated(&dir)
        .args(["play", "--offline", "--raw-wav"])
        .write_stdin(format!(
            "answer {}\nask 1\nanswer {}\nquit\n",
            bogus.display(),
            bogus.display()
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("no reporter is at the microphone"))
        .stdout(predicate::str::contains("input error"));
}

#[test]
fn online_play_requires_api_key() {
    let dir = TempDir::new().unwrap();
    pn_isolated(&dir)
        .arg("play")
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn play_rejects_odd_duration() {
    let dir = TempDir::new().unwrap();
    pn_isolated(&dir)
        .args(["play", "--offline", "--duration", "45"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration must be one of"));
}
