//! YAML model definitions consumed by the CLI.
//!
//! ```yaml
//! package: org.example.uni
//! source_folder: src/main/java
//! classes:
//!   - name: University
//!     attributes:
//!       - { name: name, type: String }
//!   - name: Student
//!     extends: Person
//!     attributes:
//!       - { name: matNo, type: int, init: "0", style: Bean }
//!     methods:
//!       - declaration: public int credits(int semester)
//!         body: return semester * 30;
//! associations:
//!   - { class: University, role: students, cardinality: many,
//!       other_class: Student, other_role: uni, other_cardinality: one }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::model::builder::{ClassModelBuilder, DEFAULT_SOURCE_FOLDER};
use crate::model::{Cardinality, ClassModel};

/// Top-level model definition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Java package of the generated classes.
    pub package: String,
    /// Source root; defaults to `src/main/java`.
    #[serde(default = "default_source_folder")]
    pub source_folder: String,
    /// Default property style (`POJO` or `Bean`).
    #[serde(default)]
    pub property_style: Option<String>,
    /// Default collection type for to-many roles.
    #[serde(default)]
    pub role_type: Option<String>,
    /// Class definitions.
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
    /// Association definitions.
    #[serde(default)]
    pub associations: Vec<AssociationDefinition>,
}

/// One class in a model definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Class name.
    pub name: String,
    /// Superclass name.
    #[serde(default, rename = "extends")]
    pub super_class: Option<String>,
    /// Attributes of the class.
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    /// Hand-declared methods of the class.
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
}

/// One attribute in a class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Attribute name.
    pub name: String,
    /// Declared Java type.
    #[serde(rename = "type")]
    pub attr_type: String,
    /// Initializer expression.
    #[serde(default)]
    pub init: Option<String>,
    /// Property style override.
    #[serde(default)]
    pub style: Option<String>,
}

/// One method in a class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    /// Declaration header.
    pub declaration: String,
    /// Method body.
    #[serde(default)]
    pub body: String,
}

/// One association in a model definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationDefinition {
    /// Source class.
    pub class: String,
    /// Role under which `class` reaches `other_class`.
    pub role: String,
    /// Cardinality of `role`.
    pub cardinality: Cardinality,
    /// Target class.
    pub other_class: String,
    /// Reverse role; omit for a one-way association.
    #[serde(default)]
    pub other_role: Option<String>,
    /// Cardinality of the reverse role.
    #[serde(default = "default_cardinality")]
    pub other_cardinality: Cardinality,
}

fn default_source_folder() -> String {
    DEFAULT_SOURCE_FOLDER.to_string()
}

fn default_cardinality() -> Cardinality {
    Cardinality::One
}

impl ModelDefinition {
    /// Parses a definition from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Snapshot`] if the YAML is malformed.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Builds the class model described by this definition.
    ///
    /// Classes are created before associations, so associations may refer
    /// to classes declared later in the document.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid names, unknown classes, or superclasses
    /// that are not part of the model.
    pub fn build(&self) -> Result<ClassModel> {
        let mut mb = ClassModelBuilder::with_source_folder(&self.package, &self.source_folder)?;
        if let Some(style) = &self.property_style {
            mb.set_default_property_style(style);
        }
        if let Some(role_type) = &self.role_type {
            mb.set_default_role_type(role_type);
        }

        for class in &self.classes {
            let mut builder = mb.build_class(&class.name)?;
            for attr in &class.attributes {
                builder = match &attr.init {
                    Some(init) => builder.build_attribute_with_init(&attr.name, &attr.attr_type, init)?,
                    None => builder.build_attribute(&attr.name, &attr.attr_type)?,
                };
                if let Some(style) = &attr.style {
                    builder = builder.with_property_style(style);
                }
            }
            for method in &class.methods {
                builder = builder.build_method(&method.declaration, &method.body)?;
            }
            if let Some(super_class) = &class.super_class {
                builder.set_super_class(super_class)?;
            }
        }

        let model = mb.model();
        for clazz in &model.classes {
            if let Some(super_class) = &clazz.super_class {
                if model.super_class_of(clazz).is_none() {
                    return Err(GenError::Definition(format!(
                        "class {} extends unknown class {super_class}",
                        clazz.name
                    )));
                }
            }
        }

        for assoc in &self.associations {
            match &assoc.other_role {
                Some(other_role) => mb.build_association(
                    &assoc.class,
                    &assoc.role,
                    assoc.cardinality,
                    &assoc.other_class,
                    other_role,
                    assoc.other_cardinality,
                )?,
                None => mb.build_one_way_association(
                    &assoc.class,
                    &assoc.role,
                    assoc.cardinality,
                    &assoc.other_class,
                )?,
            };
        }

        Ok(mb.finish())
    }
}
