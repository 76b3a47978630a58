//! `classgen diff` command.

use std::path::Path;

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::generate::{ClassFileGenerator, FileGenerator};
use crate::model::diff::{format_summary, mark_modified};
use crate::model::snapshot;

/// Execute the `diff` command.
///
/// # Errors
///
/// Returns an error string if the model definition cannot be loaded.
pub fn run(model_path: &Path) -> Result<(), String> {
    let ctx = ServiceContext::live(Settings::default()).map_err(|e| e.to_string())?;
    println!("{}", run_with_context(&ctx, model_path)?);
    Ok(())
}

/// Compares the model against the last snapshot without touching any file.
///
/// # Errors
///
/// Returns an error string if the model definition cannot be loaded.
pub fn run_with_context(ctx: &ServiceContext, model_path: &Path) -> Result<String, String> {
    let current = super::load_model(ctx, model_path)?;
    let path = snapshot::snapshot_path(&current, ClassFileGenerator.snapshot_file_name());

    let Some(mut previous) = snapshot::load(ctx, &path) else {
        return Ok(format!(
            "No snapshot at {}; the next run generates everything from scratch.",
            path.display()
        ));
    };
    let summary = mark_modified(&mut previous, &current);
    Ok(format_summary(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::commands::generate;

    fn context() -> ServiceContext {
        let ctx = ServiceContext::with_fs(Box::new(MemoryFileSystem::new()));
        ctx.fs
            .write(
                Path::new("model.yaml"),
                "package: p\nclasses:\n  - name: A\n    attributes:\n      - { name: x, type: int }\n",
            )
            .unwrap();
        ctx
    }

    #[test]
    fn first_run_has_no_snapshot() {
        let ctx = context();
        let out = run_with_context(&ctx, Path::new("model.yaml")).unwrap();
        assert!(out.starts_with("No snapshot at src/main/java/p/classModel.yaml"));
    }

    #[test]
    fn lists_elements_that_would_be_purged() {
        let ctx = context();
        generate::run_with_context(&ctx, Path::new("model.yaml")).unwrap();
        assert_eq!(
            run_with_context(&ctx, Path::new("model.yaml")).unwrap(),
            "No changes since last generation."
        );

        ctx.fs
            .write(
                Path::new("model.yaml"),
                "package: p\nclasses:\n  - name: A\n    attributes:\n      - { name: x, type: long }\n",
            )
            .unwrap();
        let out = run_with_context(&ctx, Path::new("model.yaml")).unwrap();
        assert!(out.contains("  - attribute A.x"));
        assert!(ctx.fs.read_to_string(Path::new("src/main/java/p/A.java")).unwrap().contains("int x"));
    }
}
