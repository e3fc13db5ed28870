use assert_cmd::Command;

use pushworld::data::{Action, Plan};
use pushworld::LoadPuzzle;

#[test]
fn run_trivial() {
    // The exact plan depends on the heuristic and the action order, so the
    // output is validated by replaying it instead of comparing text.
    for &mode in &["RGD", "N+RGD"] {
        let output = Command::cargo_bin("pushworld")
            .unwrap()
            .args(&[mode, "puzzles/trivial.pwp"])
            .output()
            .unwrap();
        assert!(output.status.success());
        assert!(output.stderr.is_empty());

        let stdout = String::from_utf8(output.stdout).unwrap();
        let plan: Plan = stdout
            .trim()
            .chars()
            .map(|c| Action::from_char(c).expect("the plan contains only L R U D"))
            .collect();

        let puzzle = "puzzles/trivial.pwp".load_puzzle().unwrap();
        assert!(puzzle.is_valid_plan(&plan));
    }
}

#[test]
fn run_no_solution() {
    Command::cargo_bin("pushworld")
        .unwrap()
        .args(&["RGD", "puzzles/no_solution.pwp"])
        .assert()
        .success()
        .stdout("NO SOLUTION\n")
        .stderr("");
}

#[test]
fn run_unknown_mode() {
    Command::cargo_bin("pushworld")
        .unwrap()
        .args(&["GBFS", "puzzles/trivial.pwp"])
        .assert()
        .failure()
        .stdout("");
}

#[test]
fn run_missing_puzzle() {
    Command::cargo_bin("pushworld")
        .unwrap()
        .args(&["RGD", "puzzles/does-not-exist.pwp"])
        .assert()
        .failure()
        .stdout("");
}

#[test]
fn run_bad_usage() {
    Command::cargo_bin("pushworld")
        .unwrap()
        .assert()
        .failure()
        .stdout("");
}
