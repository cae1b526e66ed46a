use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use test_case::test_case;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn validate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_validate"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("could not run the validate binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test_case("clash", "extended"; "extended profile")]
#[test_case("clash_basic", "basic"; "basic profile")]
fn text_report_matches_golden_output(name: &str, profile: &str) {
    let basename = fixture(name);
    let output = validate(&[basename.to_str().unwrap(), "--profile", profile]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let expected = fs::read_to_string(fixture(&format!("{name}.expected"))).unwrap();
    assert_eq!(stdout(&output), expected);
}

#[test]
fn feasible_timetable() {
    let output = validate(&[fixture("feasible").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("This solution file gives a valid timetable"), "{text}");
    assert!(text.contains("Number of room clashes = 0"));
    assert!(text.contains("Total soft constraint penalty = 1"));
}

#[test]
fn unplaced_event_is_reported_not_failed() {
    let output = validate(&[fixture("unplaced").to_str().unwrap(), "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(json.get("stats").is_none(), "stats only appear with --stats");
    let report = &json["report"];
    assert_eq!(report["hard"]["unplaced"], 1);
    assert_eq!(report["hard"]["roomClashes"], 0);
    assert_eq!(report["soft"]["endOfDay"], 0);
    assert_eq!(report["totalPenalty"], 0);
    assert_eq!(report["feasible"], true);
    assert_eq!(report["violations"][0]["message"], "Event 0 does not have a timeslot assigned");
}

#[test]
fn csv_and_stats() {
    let output = validate(&[fixture("clash").to_str().unwrap(), "--format", "csv"]);
    assert_eq!(
        stdout(&output),
        "df,pv,nr,unplaced,rooms,slots,students,roomClashes,1d,lt,3+,total,feasible\n\
         0,0,0,0,0,1,1,1,2,1,0,3,false\n"
    );

    let output = validate(&[fixture("clash").to_str().unwrap(), "--stats"]);
    let text = stdout(&output);
    assert!(text.starts_with("Instance: 3 events, 2 rooms, 1 features, 3 students, 1 precedences"), "{text}");
    assert!(text.contains("Average available slots per event = 44.67"));

    let output = validate(&[fixture("clash").to_str().unwrap(), "--stats", "--format", "json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["stats"]["events"], 3);
    assert_eq!(json["report"]["totalPenalty"], 3);
}

#[test_case(&["missing"], 3, "Couldn't open the file"; "missing files")]
#[test_case(&["truncated"], 4, "Malformed instance"; "truncated instance")]
#[test_case(&["short_solution"], 5, "Malformed solution"; "short solution")]
#[test_case(&[], 2, "BASENAME"; "no basename")]
fn failures_exit_nonzero_without_report(args: &[&str], code: i32, message: &str) {
    let args: Vec<String> = args.iter().map(|name| fixture(name).to_string_lossy().into_owned()).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let output = validate(&args);
    assert_eq!(output.status.code(), Some(code));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains(message), "{}", stderr(&output));
}

#[test]
fn missing_file_names_the_instance_path() {
    let output = validate(&[fixture("missing").to_str().unwrap()]);
    assert!(stderr(&output).contains("missing.tim"));
}
