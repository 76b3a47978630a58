//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::Command;

const MODEL: &str = "package: org.zoo
classes:
  - name: Keeper
    attributes:
      - { name: name, type: String }
  - name: Animal
    attributes:
      - { name: species, type: String }
associations:
  - { class: Keeper, role: animals, cardinality: many, other_class: Animal, other_role: keeper, other_cardinality: one }
";

fn run_classgen(dir: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_classgen");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("CLASSGEN_TEMPLATES")
        .output()
        .expect("failed to run classgen binary")
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("model.yaml"), MODEL).unwrap();
    dir
}

#[test]
fn generate_writes_sources_and_summary() {
    let dir = workspace();
    let output = run_classgen(dir.path(), &["generate", "model.yaml"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("wrote src/main/java/org/zoo/Keeper.java"));
    assert!(stdout.contains("2 written, 0 unchanged, 0 deleted, 0 failed"));
    let keeper = std::fs::read_to_string(dir.path().join("src/main/java/org/zoo/Keeper.java")).unwrap();
    assert!(keeper.contains("public Keeper withAnimals(Animal... value)"));
}

#[test]
fn generate_twice_reports_unchanged_files() {
    let dir = workspace();
    run_classgen(dir.path(), &["generate", "model.yaml"]);
    let output = run_classgen(dir.path(), &["generate", "model.yaml"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("0 written, 2 unchanged, 0 deleted, 0 failed"));
}

#[test]
fn generate_with_tables_flag_writes_table_classes() {
    let dir = workspace();
    let output = run_classgen(dir.path(), &["generate", "model.yaml", "--tables"]);

    assert!(output.status.success());
    assert!(dir.path().join("src/main/java/org/zoo/tables/KeeperTable.java").exists());
}

#[test]
fn diff_lists_elements_to_purge() {
    let dir = workspace();
    let first = run_classgen(dir.path(), &["diff", "model.yaml"]);
    assert!(first.status.success());
    assert!(String::from_utf8_lossy(&first.stdout).contains("No snapshot at"));

    run_classgen(dir.path(), &["generate", "model.yaml"]);
    std::fs::write(dir.path().join("model.yaml"), MODEL.replace("species, type: String", "species, type: int"))
        .unwrap();
    let output = run_classgen(dir.path(), &["diff", "model.yaml"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("attribute Animal.species"));
}

#[test]
fn fragments_lists_keys_of_a_source_file() {
    let dir = workspace();
    run_classgen(dir.path(), &["generate", "model.yaml"]);
    let output = run_classgen(dir.path(), &["fragments", "src/main/java/org/zoo/Animal.java"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("    1  package"));
    assert!(stdout.contains("attribute:species"));
    assert!(stdout.contains("method:setKeeper(Keeper)"));
    assert!(stdout.contains("classEnd"));
}

#[test]
fn missing_model_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_classgen(dir.path(), &["generate", "missing.yaml"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read model definition"));
}

#[test]
fn unknown_subcommand_shows_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_classgen(dir.path(), &["frobnicate"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unrecognized subcommand"));
}
