use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Fresh output directory for one test, removed when dropped
fn out_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("moodgraph-{}-", name))
        .tempdir()
        .expect("Failed to create temp dir")
}

/// Helper function to run moodgraph with arguments and optional stdin
fn run_moodgraph(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_moodgraph"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn process");

    if let Some(mut handle) = child.stdin.take() {
        if let Some(input) = stdin {
            handle
                .write_all(input.as_bytes())
                .expect("Failed to write to stdin");
        }
    }

    child.wait_with_output().expect("Failed to wait for process")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_end_to_end_svg_charts() {
    let dir = out_dir("svg");
    let out = dir.path();
    let output = run_moodgraph(
        &["test/mental-health.csv", "--out", out.to_str().unwrap()],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    for chart in ["histogram", "pie", "parallel"] {
        let svg = fs::read_to_string(out.join(format!("{}.svg", chart)))
            .unwrap_or_else(|_| panic!("Missing {}.svg", chart));
        assert!(svg.contains("<svg"), "{}.svg is not an SVG document", chart);
    }

    let histogram = fs::read_to_string(out.join("histogram.svg")).unwrap();
    assert!(histogram.contains("Distribution of GPA Among Students"));
    let pie = fs::read_to_string(out.join("pie.svg")).unwrap();
    assert!(pie.contains("GPA Distribution"));
}

#[test]
fn test_end_to_end_reads_stdin() {
    let dir = out_dir("stdin");
    let out = dir.path();
    let csv = fs::read_to_string("test/mental-health.csv").expect("Failed to read test CSV");
    let output = run_moodgraph(
        &["--out", out.to_str().unwrap(), "--attribute", "year"],
        Some(&csv),
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    let histogram = fs::read_to_string(out.join("histogram.svg")).unwrap();
    assert!(histogram.contains("Distribution of Year Among Students"));
    assert!(histogram.contains("Year 1"));
}

#[test]
fn test_end_to_end_html_with_events() {
    let dir = out_dir("events");
    let out = dir.path();
    let output = run_moodgraph(
        &[
            "test/mental-health.csv",
            "--out",
            out.to_str().unwrap(),
            "--format",
            "html",
            "--events",
            "test/linked.events",
        ],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    let html = fs::read_to_string(out.join("dashboard.html")).unwrap();
    assert!(html.contains("<option value='gender' selected>Gender</option>"));
    assert!(html.contains("value='year' /> "));
    assert!(html.contains("Female: 4 (100.0%)"));
    assert!(html.contains("width=\"640\""));
    assert_eq!(html.matches("<svg").count(), 3);
}

#[test]
fn test_end_to_end_summary() {
    let dir = out_dir("summary");
    let out = dir.path();
    let output = run_moodgraph(
        &[
            "test/mental-health.csv",
            "--out",
            out.to_str().unwrap(),
            "--attribute",
            "gender",
            "--summary",
        ],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("12 records, 5 with depression"));
    assert!(stdout.contains("Gender\tFemale\t7"));
    assert!(stdout.contains("Gender\tMale\t5"));
}

#[test]
fn test_end_to_end_png_sizes() {
    let dir = out_dir("png");
    let out = dir.path();
    let output = run_moodgraph(
        &[
            "test/mental-health.csv",
            "--out",
            out.to_str().unwrap(),
            "--format",
            "png",
            "--width",
            "320",
            "--height",
            "240",
        ],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    for chart in ["histogram", "pie", "parallel"] {
        let bytes = fs::read(out.join(format!("{}.png", chart))).unwrap();
        assert!(is_valid_png(&bytes), "{}.png is not a valid PNG", chart);
    }
}

#[test]
fn test_end_to_end_unknown_attribute() {
    let dir = out_dir("bad-attribute");
    let out = dir.path();
    let output = run_moodgraph(
        &["test/mental-health.csv", "--out", out.to_str().unwrap(), "--attribute", "course"],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown attribute 'course'"));
}

#[test]
fn test_end_to_end_missing_column_html_failure_page() {
    let dir = out_dir("missing-column");
    let out = dir.path();
    let output = run_moodgraph(
        &["--out", out.to_str().unwrap(), "--format", "html"],
        Some("Age,Choose your gender\n19,Female\n"),
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not found"));

    let html = fs::read_to_string(out.join("dashboard.html")).unwrap();
    assert!(html.contains("Could not load the dataset"));
    assert!(!html.contains("<svg"));
}

#[test]
fn test_end_to_end_empty_csv() {
    let dir = out_dir("empty");
    let out = dir.path();
    let output = run_moodgraph(
        &["--out", out.to_str().unwrap()],
        Some("Do you have Depression?,Age\n"),
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("at least one data row"));
}

#[test]
fn test_end_to_end_malformed_event_script() {
    let dir = out_dir("bad-script");
    let out = dir.path();
    let script = out.join("bad.events");
    fs::write(&script, "select gpa\nbrush depression up down\n").unwrap();
    let output = run_moodgraph(
        &[
            "test/mental-health.csv",
            "--out",
            out.to_str().unwrap(),
            "--events",
            script.to_str().unwrap(),
        ],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("line 2"));
}

#[test]
fn test_end_to_end_unchecking_depression_rejected() {
    let dir = out_dir("depression-locked");
    let out = dir.path();
    let output = run_moodgraph(
        &["test/mental-health.csv", "--out", out.to_str().unwrap(), "--uncheck", "depression"],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot be unchecked"));
}
