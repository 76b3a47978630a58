//! Fluent construction of class models.
//!
//! ```
//! use classgen::model::builder::ClassModelBuilder;
//! use classgen::model::Cardinality;
//!
//! let mut mb = ClassModelBuilder::new("org.example.uni").unwrap();
//! mb.build_class("University").unwrap().build_attribute("name", "String").unwrap();
//! mb.build_class("Student").unwrap().build_attribute("matNo", "int").unwrap();
//! mb.build_association("University", "students", Cardinality::Many, "Student", "uni", Cardinality::One)
//!     .unwrap();
//! let model = mb.finish();
//! assert_eq!(model.classes.len(), 2);
//! ```

use crate::error::{GenError, Result};
use crate::model::names;
use crate::model::{AssocRole, Attribute, Cardinality, ClassModel, Clazz, FMethod, RoleRef};

/// Default source root for generated classes.
pub const DEFAULT_SOURCE_FOLDER: &str = "src/main/java";

/// Builds a [`ClassModel`], validating every name on the way in.
#[derive(Debug)]
pub struct ClassModelBuilder {
    model: ClassModel,
}

/// Adds members to one class of a model under construction.
#[derive(Debug)]
pub struct ClassBuilder<'a> {
    model: &'a mut ClassModel,
    index: usize,
}

impl ClassModelBuilder {
    /// Starts a model for `package_name` under [`DEFAULT_SOURCE_FOLDER`].
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidName`] if the package name is not a valid
    /// qualified identifier.
    pub fn new(package_name: &str) -> Result<Self> {
        Self::with_source_folder(package_name, DEFAULT_SOURCE_FOLDER)
    }

    /// Starts a model for `package_name` under `source_folder`.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidName`] if the package name is invalid.
    pub fn with_source_folder(package_name: &str, source_folder: &str) -> Result<Self> {
        names::check_qualified_name(package_name)?;
        Ok(Self { model: ClassModel::new(package_name, source_folder) })
    }

    /// Sets the property style used by elements built after this call.
    pub fn set_default_property_style(&mut self, style: &str) -> &mut Self {
        self.model.default_property_style = style.to_string();
        self
    }

    /// Sets the collection type used by to-many roles built after this call.
    pub fn set_default_role_type(&mut self, role_type: &str) -> &mut Self {
        self.model.default_role_type = role_type.to_string();
        self
    }

    /// Returns a builder for class `name`, creating the class if needed.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidName`] for invalid names or names that
    /// clash with `java.lang` classes.
    pub fn build_class(&mut self, name: &str) -> Result<ClassBuilder<'_>> {
        let index = match self.model.classes.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                names::check_simple_name(name)?;
                names::check_java_lang_clash(name)?;
                self.model.classes.push(Clazz::new(name));
                self.model.classes.len() - 1
            }
        };
        Ok(ClassBuilder { model: &mut self.model, index })
    }

    /// Connects two classes with a bidirectional association.
    ///
    /// `role` is the name under which `class` reaches `other_class`;
    /// `other_role` is the reverse direction.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::UnknownClass`] if either class has not been built
    /// and [`GenError::InvalidName`] for invalid role names.
    pub fn build_association(
        &mut self,
        class: &str,
        role: &str,
        cardinality: Cardinality,
        other_class: &str,
        other_role: &str,
        other_cardinality: Cardinality,
    ) -> Result<&mut Self> {
        names::check_simple_name(other_role)?;
        self.associate(class, role, cardinality, other_class, Some(other_role), other_cardinality)
    }

    /// Connects two classes with an association navigable only from `class`.
    ///
    /// The reverse side exists but is unnamed, so no code is generated for it.
    ///
    /// # Errors
    ///
    /// Same as [`ClassModelBuilder::build_association`].
    pub fn build_one_way_association(
        &mut self,
        class: &str,
        role: &str,
        cardinality: Cardinality,
        other_class: &str,
    ) -> Result<&mut Self> {
        self.associate(class, role, cardinality, other_class, None, Cardinality::One)
    }

    fn associate(
        &mut self,
        class: &str,
        role: &str,
        cardinality: Cardinality,
        other_class: &str,
        other_role: Option<&str>,
        other_cardinality: Cardinality,
    ) -> Result<&mut Self> {
        names::check_simple_name(role)?;
        for name in [class, other_class] {
            if self.model.class(name).is_none() {
                return Err(GenError::UnknownClass(name.to_string()));
            }
        }
        self.check_free_member_name(class, role)?;
        if let Some(other_role) = other_role {
            // A symmetric self-association names both sides the same.
            if class != other_class || role != other_role {
                self.check_free_member_name(other_class, other_role)?;
            }
        }

        let this_index = self.model.class(class).map_or(0, |c| c.roles.len());
        let other_index = if class == other_class {
            this_index + 1
        } else {
            self.model.class(other_class).map_or(0, |c| c.roles.len())
        };

        let this_role = self.new_role(
            Some(role),
            cardinality,
            RoleRef { class: other_class.to_string(), index: other_index },
        );
        let reverse_role = self.new_role(
            other_role,
            other_cardinality,
            RoleRef { class: class.to_string(), index: this_index },
        );

        if let Some(c) = self.model.class_mut(class) {
            c.roles.push(this_role);
        }
        if let Some(c) = self.model.class_mut(other_class) {
            c.roles.push(reverse_role);
        }
        Ok(self)
    }

    /// Attributes and named roles share fragment keys, so their names must
    /// not collide within a class.
    fn check_free_member_name(&self, class: &str, name: &str) -> Result<()> {
        let taken = self
            .model
            .class(class)
            .is_some_and(|c| c.attribute(name).is_some() || c.role(Some(name)).is_some());
        if taken {
            return Err(GenError::InvalidName(format!("'{name}' is already a member of class {class}")));
        }
        Ok(())
    }

    fn new_role(&self, name: Option<&str>, cardinality: Cardinality, other: RoleRef) -> AssocRole {
        AssocRole {
            name: name.map(str::to_string),
            cardinality,
            role_type: self.model.default_role_type.clone(),
            property_style: self.model.default_property_style.clone(),
            other: Some(other),
            modified: false,
        }
    }

    /// Read access to the model built so far.
    #[must_use]
    pub fn model(&self) -> &ClassModel {
        &self.model
    }

    /// Finishes building and returns the model.
    #[must_use]
    pub fn finish(self) -> ClassModel {
        self.model
    }
}

impl ClassBuilder<'_> {
    fn clazz(&mut self) -> &mut Clazz {
        &mut self.model.classes[self.index]
    }

    /// Adds an attribute without initializer.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidName`] for invalid or duplicate names.
    pub fn build_attribute(self, name: &str, attr_type: &str) -> Result<Self> {
        self.push_attribute(name, attr_type, None)
    }

    /// Adds an attribute with an initializer expression.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidName`] for invalid or duplicate names.
    pub fn build_attribute_with_init(self, name: &str, attr_type: &str, init: &str) -> Result<Self> {
        self.push_attribute(name, attr_type, Some(init))
    }

    fn push_attribute(mut self, name: &str, attr_type: &str, init: Option<&str>) -> Result<Self> {
        names::check_simple_name(name)?;
        let clazz = &self.model.classes[self.index];
        if clazz.attribute(name).is_some() || clazz.role(Some(name)).is_some() {
            return Err(GenError::InvalidName(format!(
                "duplicate attribute '{name}' in class {}",
                clazz.name
            )));
        }
        let property_style = self.model.default_property_style.clone();
        self.clazz().attributes.push(Attribute {
            name: name.to_string(),
            attr_type: attr_type.to_string(),
            initialization: init.map(str::to_string),
            property_style,
            modified: false,
        });
        Ok(self)
    }

    /// Overrides the property style of the most recently added attribute.
    #[must_use]
    pub fn with_property_style(mut self, style: &str) -> Self {
        if let Some(attr) = self.clazz().attributes.last_mut() {
            attr.property_style = style.to_string();
        }
        self
    }

    /// Adds a hand-declared method.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidName`] if a method with the same signature
    /// already exists in the class.
    pub fn build_method(mut self, declaration: &str, body: &str) -> Result<Self> {
        let method =
            FMethod { declaration: declaration.to_string(), body: body.to_string(), modified: false };
        if self.model.classes[self.index].methods.iter().any(|m| m.signature_matches(&method)) {
            return Err(GenError::InvalidName(format!(
                "duplicate method '{}' in class {}",
                method.signature(),
                self.model.classes[self.index].name
            )));
        }
        self.clazz().methods.push(method);
        Ok(self)
    }

    /// Declares the superclass by name; it is resolved lazily.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidName`] if the name is not an identifier.
    pub fn set_super_class(mut self, name: &str) -> Result<Self> {
        names::check_simple_name(name)?;
        self.clazz().super_class = Some(name.to_string());
        Ok(self)
    }

    /// Name of the class being built.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.model.classes[self.index].name
    }
}
