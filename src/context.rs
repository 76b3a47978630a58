//! Service context bundling the filesystem port, templates, and settings.

use crate::adapters::live::LiveFileSystem;
use crate::config::Settings;
use crate::error::Result;
use crate::ports::filesystem::FileSystem;
use crate::templates::TemplateRenderer;

/// Everything a generator run needs from the outside world.
///
/// Constructors wire up different filesystem adapters; the generator code
/// only ever talks to the trait object.
pub struct ServiceContext {
    /// Filesystem holding generated sources and snapshots.
    pub fs: Box<dyn FileSystem>,
    /// Templates generated code is rendered from.
    pub templates: TemplateRenderer,
    /// Settings for this run.
    pub settings: Settings,
}

impl ServiceContext {
    /// Creates a context on the real filesystem, loading custom templates
    /// named by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom templates file cannot be read or compiled.
    pub fn live(settings: Settings) -> Result<Self> {
        let fs: Box<dyn FileSystem> = Box::new(LiveFileSystem);
        let templates = TemplateRenderer::load(fs.as_ref(), settings.templates_path.as_deref())?;
        Ok(Self { fs, templates, settings })
    }

    /// Creates a context over `fs` with built-in templates and default settings.
    ///
    /// # Panics
    ///
    /// Panics if the built-in templates fail to compile.
    #[must_use]
    pub fn with_fs(fs: Box<dyn FileSystem>) -> Self {
        let templates = TemplateRenderer::builtin().expect("built-in templates compile");
        Self { fs, templates, settings: Settings::default() }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    #[test]
    fn with_fs_uses_builtin_templates() {
        let ctx = ServiceContext::with_fs(Box::new(MemoryFileSystem::new()));
        assert!(ctx.templates.has_template(crate::templates::java::CLASS_DECL));
        assert!(!ctx.settings.tables);
    }

    #[test]
    fn live_context_fails_on_missing_templates_file() {
        let settings = Settings { templates_path: Some(PathBuf::from("/no/such/templates.yaml")), tables: false };
        assert!(ServiceContext::live(settings).is_err());
        assert!(!Path::new("/no/such/templates.yaml").exists());
    }
}
