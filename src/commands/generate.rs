//! `classgen generate` command.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::generate::{ClassFileGenerator, FileGenerator, Regenerator, TableFileGenerator};

/// Execute the `generate` command.
///
/// # Errors
///
/// Returns an error string if the model cannot be loaded or any file fails.
pub fn run(model_path: &Path, templates: Option<PathBuf>, tables: bool) -> Result<(), String> {
    let settings = Settings::resolve(templates, tables);
    let ctx = ServiceContext::live(settings).map_err(|e| format!("failed to load templates: {e}"))?;
    let summary = run_with_context(&ctx, model_path)?;
    println!("{summary}");
    Ok(())
}

/// Regenerates every output kind enabled in `ctx.settings` and returns the
/// printed summary.
///
/// # Errors
///
/// Returns an error string if the model cannot be loaded or any file fails.
pub fn run_with_context(ctx: &ServiceContext, model_path: &Path) -> Result<String, String> {
    let model = super::load_model(ctx, model_path)?;

    let mut generators: Vec<Box<dyn FileGenerator>> = vec![Box::new(ClassFileGenerator)];
    if ctx.settings.tables {
        generators.push(Box::new(TableFileGenerator));
    }

    let mut lines = Vec::new();
    let mut failures = 0;
    for generator in generators {
        let report = Regenerator::new(ctx, generator).run(&model);
        failures += report.failures.len();
        lines.push(report.to_string());
    }

    let summary = lines.join("\n");
    if failures > 0 {
        return Err(format!("{summary}\ngeneration finished with {failures} failure(s)"));
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    const MODEL: &str = "package: org.zoo\nclasses:\n  - name: Keeper\n    attributes:\n      - { name: name, type: String }\n";

    fn context(tables: bool) -> ServiceContext {
        let mut ctx = ServiceContext::with_fs(Box::new(MemoryFileSystem::new()));
        ctx.settings.tables = tables;
        ctx.fs.write(Path::new("model.yaml"), MODEL).unwrap();
        ctx
    }

    #[test]
    fn writes_class_file_and_snapshot() {
        let ctx = context(false);
        let summary = run_with_context(&ctx, Path::new("model.yaml")).unwrap();

        assert!(summary.contains("wrote src/main/java/org/zoo/Keeper.java"));
        assert!(ctx.fs.exists(Path::new("src/main/java/org/zoo/classModel.yaml")));
        assert!(!ctx.fs.exists(Path::new("src/main/java/org/zoo/tables")));
    }

    #[test]
    fn tables_flag_adds_table_classes() {
        let ctx = context(true);
        run_with_context(&ctx, Path::new("model.yaml")).unwrap();

        assert!(ctx.fs.exists(Path::new("src/main/java/org/zoo/tables/KeeperTable.java")));
        assert!(ctx.fs.exists(Path::new("src/main/java/org/zoo/tablesClassModel.yaml")));
    }

    #[test]
    fn second_run_reports_unchanged() {
        let ctx = context(false);
        run_with_context(&ctx, Path::new("model.yaml")).unwrap();
        let summary = run_with_context(&ctx, Path::new("model.yaml")).unwrap();
        assert_eq!(summary, "0 written, 1 unchanged, 0 deleted, 0 failed");
    }
}
