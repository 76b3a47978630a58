//! Template rendering for generated code.
//!
//! Templates are Handlebars strings registered by name. The built-in set
//! lives in [`java`]; a custom YAML file mapping names to templates can
//! replace any of them.

pub mod java;

use std::collections::BTreeMap;
use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::error::{GenError, Result};
use crate::ports::filesystem::FileSystem;

/// Named Handlebars templates with HTML escaping disabled and strict
/// variable lookup.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.registry.get_templates().keys().collect();
        names.sort();
        f.debug_struct("TemplateRenderer").field("templates", &names).finish()
    }
}

impl TemplateRenderer {
    /// Creates a renderer holding only the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Template`] if a built-in template fails to compile.
    pub fn builtin() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        let mut renderer = Self { registry };
        for (name, template) in java::BUILTIN {
            renderer.register(name, template)?;
        }
        Ok(renderer)
    }

    /// Creates a renderer whose built-ins are overridden by a YAML document
    /// mapping template names to template text.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a string map or a template
    /// fails to compile.
    pub fn with_overrides_yaml(text: &str) -> Result<Self> {
        let overrides: BTreeMap<String, String> = serde_yaml::from_str(text)?;
        let mut renderer = Self::builtin()?;
        for (name, template) in &overrides {
            debug!(template = %name, "overriding built-in template");
            renderer.register(name, template)?;
        }
        Ok(renderer)
    }

    /// Loads overrides from `path`, or only the built-ins when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its templates are invalid.
    pub fn load(fs: &dyn FileSystem, path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::builtin();
        };
        let text = fs.read_to_string(path).map_err(|e| GenError::fs(path, e.as_ref()))?;
        Self::with_overrides_yaml(&text)
    }

    fn register(&mut self, name: &str, template: &str) -> Result<()> {
        self.registry.register_template_string(name, template).map_err(|e| GenError::Template {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns `true` if a template named `name` is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    /// Renders the template `name` with `bindings`.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Template`] if the template is unknown or references
    /// a binding that was not supplied.
    pub fn render<T: Serialize>(&self, name: &str, bindings: &T) -> Result<String> {
        self.registry.render(name, bindings).map_err(|e| GenError::Template {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use serde_json::json;

    #[test]
    fn class_decl_renders_optional_superclass() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let plain = renderer.render(java::CLASS_DECL, &json!({"name": "Dog", "superClass": null})).unwrap();
        assert_eq!(plain, "public class Dog\n{");

        let derived =
            renderer.render(java::CLASS_DECL, &json!({"name": "Dog", "superClass": "Animal"})).unwrap();
        assert_eq!(derived, "public class Dog extends Animal\n{");
    }

    #[test]
    fn generic_types_are_not_escaped() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let text = renderer
            .render(java::ATTR_GET, &json!({"type": "List<String>", "name": "tags", "capName": "Tags"}))
            .unwrap();
        assert_eq!(text, "   public List<String> getTags()\n   {\n      return this.tags;\n   }");
    }

    #[test]
    fn bean_setter_fires_property_change() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let bindings = |bean: bool| {
            json!({"className": "Person", "type": "String", "name": "name", "capName": "Name", "bean": bean})
        };
        let pojo = renderer.render(java::ATTR_SET, &bindings(false)).unwrap();
        let bean = renderer.render(java::ATTR_SET, &bindings(true)).unwrap();

        assert!(!pojo.contains("firePropertyChange"));
        assert!(bean.contains("      this.firePropertyChange(PROPERTY_name, oldValue, value);\n      return this;"));
    }

    #[test]
    fn missing_binding_is_an_error_in_strict_mode() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let err = renderer.render(java::ATTR_GET, &json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, GenError::Template { .. }));
    }

    #[test]
    fn overrides_replace_builtins_by_name() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/templates.yaml");
        fs.write(path, "classEnd: \"} // end\"\n").unwrap();

        let renderer = TemplateRenderer::load(&fs, Some(path)).unwrap();

        assert_eq!(renderer.render(java::CLASS_END, &json!({})).unwrap(), "} // end");
        assert!(renderer.has_template(java::PACKAGE));
    }

    #[test]
    fn missing_override_file_is_a_filesystem_error() {
        let fs = MemoryFileSystem::new();
        let err = TemplateRenderer::load(&fs, Some(Path::new("/nope.yaml"))).unwrap_err();
        assert!(matches!(err, GenError::FileSystem { .. }));
    }
}
