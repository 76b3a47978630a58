//! Class model: classes, attributes, associations, and methods.
//!
//! Association roles form mutual pairs. Instead of holding pointers to each
//! other, a role stores a [`RoleRef`] (owning class name plus position) that
//! is resolved through the owning [`ClassModel`].

pub mod builder;
pub mod definition;
pub mod diff;
pub mod names;
pub mod snapshot;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signature::{self, Signature};

/// Property style producing plain fields and accessors.
pub const POJO: &str = "POJO";
/// Property style whose setters fire property-change events.
pub const BEAN: &str = "Bean";
/// Default collection type used for to-many roles.
pub const DEFAULT_ROLE_TYPE: &str = "ArrayList";

/// Multiplicity of one side of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// At most one partner object.
    One,
    /// Any number of partner objects.
    Many,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("one"),
            Self::Many => f.write_str("many"),
        }
    }
}

/// Stable address of an association role: owning class and role position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleRef {
    /// Name of the class owning the role.
    pub class: String,
    /// Position of the role within the class's role list.
    pub index: usize,
}

/// Root of a model: package, output location, defaults, and classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassModel {
    /// Java package the classes belong to.
    pub package_name: String,
    /// Source root the package folder lives under (e.g. `src/main/java`).
    pub main_java_dir: String,
    /// Collection type used for to-many roles unless overridden.
    pub default_role_type: String,
    /// Property style used for attributes and roles unless overridden.
    pub default_property_style: String,
    /// Classes in declaration order; names are unique.
    #[serde(default)]
    pub classes: Vec<Clazz>,
}

/// A generated class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clazz {
    /// Class name, unique within the model.
    pub name: String,
    /// Name of the superclass, resolved lazily through the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_class: Option<String>,
    /// Attributes in declaration order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Association roles in declaration order.
    #[serde(default)]
    pub roles: Vec<AssocRole>,
    /// Hand-declared methods in declaration order.
    #[serde(default)]
    pub methods: Vec<FMethod>,
    /// Set by the differ when the class's generated code must be purged.
    #[serde(skip)]
    pub modified: bool,
}

/// A typed attribute of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, unique within its class.
    pub name: String,
    /// Declared Java type.
    #[serde(rename = "type")]
    pub attr_type: String,
    /// Optional initializer expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialization: Option<String>,
    /// Property representation style (`POJO` or `Bean`).
    pub property_style: String,
    /// Set by the differ when the attribute's generated code must be purged.
    #[serde(skip)]
    pub modified: bool,
}

/// One side of a bidirectional association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssocRole {
    /// Role name; `None` marks a suppressed side that is never generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// How many partners this side holds.
    pub cardinality: Cardinality,
    /// Collection type for to-many roles.
    pub role_type: String,
    /// Property representation style (`POJO` or `Bean`).
    pub property_style: String,
    /// Counterpart role on the other side of the association.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<RoleRef>,
    /// Set by the differ when the role's generated code must be purged.
    #[serde(skip)]
    pub modified: bool,
}

/// A hand-declared method with a verbatim body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FMethod {
    /// Declaration header, e.g. `public int add(int a, int b)`.
    pub declaration: String,
    /// Method body without surrounding braces.
    #[serde(default)]
    pub body: String,
    /// Set by the differ when the method's generated code must be purged.
    #[serde(skip)]
    pub modified: bool,
}

impl ClassModel {
    /// Creates an empty model for `package_name` rooted at `main_java_dir`.
    #[must_use]
    pub fn new(package_name: impl Into<String>, main_java_dir: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            main_java_dir: main_java_dir.into(),
            default_role_type: DEFAULT_ROLE_TYPE.to_string(),
            default_property_style: POJO.to_string(),
            classes: Vec::new(),
        }
    }

    /// Folder holding the package's sources: `main_java_dir/<package path>`.
    #[must_use]
    pub fn package_src_folder(&self) -> String {
        format!("{}/{}", self.main_java_dir, self.package_name.replace('.', "/"))
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Clazz> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Looks up a class by name for mutation.
    pub fn class_mut(&mut self, name: &str) -> Option<&mut Clazz> {
        self.classes.iter_mut().find(|c| c.name == name)
    }

    /// Adds a class unless one with the same name already exists.
    ///
    /// Returns `true` when the class was inserted.
    pub fn add_class(&mut self, clazz: Clazz) -> bool {
        if self.class(&clazz.name).is_some() {
            return false;
        }
        self.classes.push(clazz);
        true
    }

    /// Removes a class and unlinks every role whose counterpart lived in it.
    pub fn remove_class(&mut self, name: &str) -> Option<Clazz> {
        let pos = self.classes.iter().position(|c| c.name == name)?;
        let removed = self.classes.remove(pos);
        for clazz in &mut self.classes {
            for role in &mut clazz.roles {
                if role.other.as_ref().is_some_and(|o| o.class == name) {
                    role.other = None;
                }
            }
        }
        Some(removed)
    }

    /// Resolves a role reference.
    #[must_use]
    pub fn role(&self, role_ref: &RoleRef) -> Option<&AssocRole> {
        self.class(&role_ref.class)?.roles.get(role_ref.index)
    }

    /// Resolves a role reference for mutation.
    pub fn role_mut(&mut self, role_ref: &RoleRef) -> Option<&mut AssocRole> {
        self.class_mut(&role_ref.class)?.roles.get_mut(role_ref.index)
    }

    /// Returns the counterpart of `role`, if it is linked.
    #[must_use]
    pub fn other_role(&self, role: &AssocRole) -> Option<&AssocRole> {
        role.other.as_ref().and_then(|r| self.role(r))
    }

    /// Returns the superclass of `clazz`, if declared and present.
    #[must_use]
    pub fn super_class_of(&self, clazz: &Clazz) -> Option<&Clazz> {
        clazz.super_class.as_deref().and_then(|name| self.class(name))
    }
}

impl Clazz {
    /// Creates an empty class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_class: None,
            attributes: Vec::new(),
            roles: Vec::new(),
            methods: Vec::new(),
            modified: false,
        }
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Looks up a role by name; `None` finds the first unnamed role.
    #[must_use]
    pub fn role(&self, name: Option<&str>) -> Option<&AssocRole> {
        self.roles.iter().find(|r| r.name.as_deref() == name)
    }

    /// Roles that take part in generation, one per name.
    ///
    /// Both sides of a symmetric self-association carry the same name and
    /// yield a single entry.
    pub fn named_roles(&self) -> impl Iterator<Item = (&str, &AssocRole)> {
        let mut seen = HashSet::new();
        self.roles
            .iter()
            .filter_map(|r| r.name.as_deref().map(|n| (n, r)))
            .filter(move |(n, _)| seen.insert(*n))
    }

    /// Returns `true` when the class has no attributes, named roles, or methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.named_roles().next().is_none() && self.methods.is_empty()
    }

    /// Flags the class and everything it owns for purging.
    pub fn mark_as_modified(&mut self) {
        self.modified = true;
        for attr in &mut self.attributes {
            attr.modified = true;
        }
        for role in &mut self.roles {
            role.modified = true;
        }
        for method in &mut self.methods {
            method.modified = true;
        }
    }
}

impl AssocRole {
    /// Returns `true` for to-many roles.
    #[must_use]
    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

impl FMethod {
    /// Structural identity of the method: name and parameter types.
    ///
    /// A declaration without a parameter list yields a signature named after
    /// the whole trimmed declaration with no parameters.
    #[must_use]
    pub fn signature(&self) -> Signature {
        signature::parse_declaration(&self.declaration)
            .unwrap_or_else(|| Signature::new(self.declaration.trim(), Vec::<String>::new()))
    }

    /// Returns `true` if both methods have the same name and parameter types.
    #[must_use]
    pub fn signature_matches(&self, other: &FMethod) -> bool {
        self.signature() == other.signature()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str, other_class: &str, other_index: usize) -> AssocRole {
        AssocRole {
            name: Some(name.to_string()),
            cardinality: Cardinality::One,
            role_type: DEFAULT_ROLE_TYPE.to_string(),
            property_style: POJO.to_string(),
            other: Some(RoleRef { class: other_class.to_string(), index: other_index }),
            modified: false,
        }
    }

    #[test]
    fn package_src_folder_joins_package_path() {
        let model = ClassModel::new("org.example.shop", "src/main/java");
        assert_eq!(model.package_src_folder(), "src/main/java/org/example/shop");
    }

    #[test]
    fn add_class_deduplicates_by_name() {
        let mut model = ClassModel::new("p", "src");
        assert!(model.add_class(Clazz::new("A")));
        assert!(!model.add_class(Clazz::new("A")));
        assert_eq!(model.classes.len(), 1);
    }

    #[test]
    fn remove_class_unlinks_partner_roles() {
        let mut model = ClassModel::new("p", "src");
        let mut a = Clazz::new("A");
        a.roles.push(role("b", "B", 0));
        let mut b = Clazz::new("B");
        b.roles.push(role("a", "A", 0));
        model.add_class(a);
        model.add_class(b);

        let removed = model.remove_class("B").unwrap();
        assert_eq!(removed.name, "B");
        assert!(model.class("A").unwrap().roles[0].other.is_none());
    }

    #[test]
    fn method_signature_ignores_body_and_parameter_names() {
        let one = FMethod {
            declaration: "public int add(int a, int b)".into(),
            body: "return a + b;".into(),
            modified: false,
        };
        let two = FMethod {
            declaration: "public int add(int x, int y)".into(),
            body: "return 0;".into(),
            modified: false,
        };
        let overload = FMethod {
            declaration: "public int add(int a)".into(),
            body: String::new(),
            modified: false,
        };
        assert!(one.signature_matches(&two));
        assert!(!one.signature_matches(&overload));
    }

    #[test]
    fn empty_class_ignores_unnamed_roles() {
        let mut clazz = Clazz::new("A");
        let mut unnamed = role("x", "B", 0);
        unnamed.name = None;
        clazz.roles.push(unnamed);
        assert!(clazz.is_empty());
    }

    #[test]
    fn symmetric_self_association_is_listed_once() {
        let mut clazz = Clazz::new("Person");
        clazz.roles.push(role("partner", "Person", 1));
        clazz.roles.push(role("partner", "Person", 0));
        clazz.roles.push(role("friends", "Person", 2));

        let names: Vec<&str> = clazz.named_roles().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["partner", "friends"]);
    }
}
