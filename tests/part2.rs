use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn part2_output_right_answer() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("inputs.txt");

    cmd.assert()
        .success()
        .stdout(str::contains("part 2: 236539226447469"));
}

#[test]
fn part2_output_right_answer_for_example() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/inputs/quine_example.txt");

    cmd.assert()
        .success()
        .stdout(str::contains("part 2: 117440"));
}

#[test]
fn part2_linear_search_output_right_answer_for_example() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/inputs/quine_example.txt")
        .arg("--strategy")
        .arg("linear");

    cmd.assert()
        .success()
        .stdout(str::contains("part 2: 117440"));
}

#[test]
fn part2_gives_up_after_max_candidates() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/inputs/quine_example.txt")
        .arg("--strategy")
        .arg("linear")
        .arg("--max-candidates")
        .arg("1000");

    cmd.assert()
        .failure()
        .stderr(str::contains("Can't find any value of register A"));
}

#[test]
fn part2_fails_for_program_without_quine() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/inputs/example.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("Can't find any value of register A"));
}
