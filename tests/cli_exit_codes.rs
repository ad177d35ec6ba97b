//! Binary-level behavior: header row, flag syntax and exit codes.

mod common;

use common::{TestProject, rows};

const GOOD: &str = "void f() noexcept {}\nint main() {\n  f();\n}\n";

#[test]
fn test_success_with_header_row() {
    let project = TestProject::new();
    project.add_file("main.cpp", GOOD);

    let output = project.run_cli(&["--csv-header", "main.cpp"]);
    assert_eq!(output.code, 0, "stderr: {}", output.stderr);

    let mut lines = output.stdout.lines();
    assert_eq!(
        lines.next(),
        Some("file,line,col,kind,qualified-name,noexcept,signature,callee-source")
    );
    assert_eq!(
        lines.next(),
        Some("\"main.cpp\",3,3,\"call\",\"f\",noexcept,\"void f() noexcept\",\"f()\"")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn test_zero_rows_is_success() {
    let project = TestProject::new();
    project.add_file("main.cpp", "int main() { return 0; }\n");

    let output = project.run_cli(&["main.cpp"]);
    assert_eq!(output.code, 0);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_numeric_only_std_flag() {
    let project = TestProject::new();
    project.add_file("util.h", "namespace util {\nvoid helper();\n}\n");
    project.add_file(
        "main.cpp",
        "#include \"util.h\"\nvoid run() {\n    std::vector<int> v;\n    v.push_back(1);\n    util::helper();\n}\n",
    );

    let output = project.run_cli(&["--only-std=1", "main.cpp"]);
    assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    let rows = rows(&output.stdout);
    assert!(rows.iter().any(|row| row[4] == "std::vector<int>::push_back"));
    assert!(rows.iter().all(|row| row[4].starts_with("std::")));

    let output = project.run_cli(&["--only-std=0", "main.cpp"]);
    assert!(rows_named(&output.stdout, "util::helper"));
}

fn rows_named(stdout: &str, name: &str) -> bool {
    rows(stdout).iter().any(|row| row[4] == name)
}

#[test]
fn test_missing_source_is_a_parse_error() {
    let project = TestProject::new();
    project.add_file("main.cpp", GOOD);

    let output = project.run_cli(&["absent.cpp", "main.cpp"]);
    assert_eq!(output.code, 4);
    assert!(output.stderr.contains("absent.cpp"));
    // Later units are still scanned
    assert!(rows_named(&output.stdout, "f"));
}

#[test]
fn test_syntax_error_is_a_parse_error() {
    let project = TestProject::new();
    project.add_file("broken.cpp", "void f() noexcept {}\nvoid g() {\n  f();\n  int x = ;\n}\n");

    let output = project.run_cli(&["broken.cpp"]);
    assert_eq!(output.code, 4);
    assert!(output.stderr.contains("broken.cpp:"));
}

#[test]
fn test_missing_config_file_is_a_config_error() {
    let project = TestProject::new();
    project.add_file("main.cpp", GOOD);

    let output = project.run_cli(&["--config", "nope.toml", "main.cpp"]);
    assert_eq!(output.code, 6);
    assert!(output.stdout.is_empty());
    assert!(output.stderr.contains("Error [CONFIG_ERROR]:"), "stderr: {}", output.stderr);
    assert!(output.stderr.contains("  - Check the syntax of .callscan/settings.toml"));
}

#[test]
fn test_workspace_settings_are_picked_up() {
    let project = TestProject::new();
    project.add_file(".callscan/settings.toml", "[output]\ncsv_header = true\n");
    project.add_file("main.cpp", GOOD);

    let output = project.run_cli(&["main.cpp"]);
    assert_eq!(output.code, 0);
    assert!(output.stdout.starts_with("file,line,col,"));

    // CLI flags win over the settings file
    let output = project.run_cli(&["--csv-header=0", "main.cpp"]);
    assert!(output.stdout.starts_with("\"main.cpp\""));
}

#[test]
fn test_compile_commands_include_paths() {
    let project = TestProject::new();
    project.add_file("include/api.h", "namespace api {\nint ping() noexcept;\n}\n");
    project.add_file("src/main.cpp", "#include <api.h>\nint run() { return api::ping(); }\n");
    let root = project.path().display().to_string();
    project.add_file(
        "build/compile_commands.json",
        &format!(
            r#"[{{"directory": "{root}", "file": "src/main.cpp", "arguments": ["c++", "-Iinclude", "-c", "src/main.cpp"]}}]"#
        ),
    );

    let output = project.run_cli(&["-p", "build", "src/main.cpp"]);
    assert_eq!(output.code, 0, "stderr: {}", output.stderr);
    let rows = rows(&output.stdout);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][4], "api::ping");
    assert_eq!(rows[0][5], "noexcept");
    assert_eq!(rows[0][6], "int ping() noexcept");
}

#[test]
fn test_source_outside_database_is_a_parse_error() {
    let project = TestProject::new();
    project.add_file("build/compile_commands.json", "[]");
    project.add_file("main.cpp", GOOD);

    let output = project.run_cli(&["-p", "build", "main.cpp"]);
    assert_eq!(output.code, 4);
    assert!(output.stdout.is_empty());
}
