//! Command dispatch and handlers.

pub mod diff;
pub mod fragments;
pub mod generate;

use std::path::Path;

use crate::cli::Command;
use crate::context::ServiceContext;
use crate::model::definition::ModelDefinition;
use crate::model::ClassModel;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Generate { model, templates, tables } => {
            generate::run(model, templates.clone(), *tables)
        }
        Command::Diff { model } => diff::run(model),
        Command::Fragments { file } => fragments::run(file),
    }
}

/// Reads and builds the model definition at `path`.
pub(crate) fn load_model(ctx: &ServiceContext, path: &Path) -> Result<ClassModel, String> {
    let text = ctx
        .fs
        .read_to_string(path)
        .map_err(|e| format!("failed to read model definition {}: {e}", path.display()))?;
    ModelDefinition::from_yaml(&text)
        .and_then(|definition| definition.build())
        .map_err(|e| format!("invalid model definition {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    #[test]
    fn load_model_reports_missing_file() {
        let ctx = ServiceContext::with_fs(Box::new(MemoryFileSystem::new()));
        let err = load_model(&ctx, Path::new("/model.yaml")).unwrap_err();
        assert!(err.contains("failed to read model definition"));
    }

    #[test]
    fn load_model_reports_invalid_names() {
        let ctx = ServiceContext::with_fs(Box::new(MemoryFileSystem::new()));
        ctx.fs.write(Path::new("/model.yaml"), "package: p\nclasses:\n  - name: class\n").unwrap();
        let err = load_model(&ctx, Path::new("/model.yaml")).unwrap_err();
        assert!(err.contains("invalid model definition"));
    }
}
