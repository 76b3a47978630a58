//! Cross-run model differencing.
//!
//! Compares the snapshot of the previous run against the current model and
//! flags every previous element whose generated code is stale. Nothing is
//! added or deleted here; the regeneration driver acts on the flags.

use std::collections::HashSet;
use std::fmt;

use tracing::info;

use crate::model::{AssocRole, Attribute, ClassModel, Clazz, FMethod, RoleRef};

/// A previous-run element that was flagged as modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkedElement {
    /// A class that vanished or was emptied.
    Class(String),
    /// An attribute that vanished or changed type or style.
    Attribute {
        /// Owning class.
        class: String,
        /// Attribute name.
        name: String,
    },
    /// A role that vanished or changed shape, or whose counterpart did.
    Role {
        /// Owning class.
        class: String,
        /// Role name; `None` for the unnamed side of an association.
        name: Option<String>,
    },
    /// A method whose signature no longer exists.
    Method {
        /// Owning class.
        class: String,
        /// Normalised signature, e.g. `add(int,int)`.
        signature: String,
    },
}

impl fmt::Display for MarkedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => write!(f, "class {name}"),
            Self::Attribute { class, name } => write!(f, "attribute {class}.{name}"),
            Self::Role { class, name } => {
                write!(f, "role {class}.{}", name.as_deref().unwrap_or("<unnamed>"))
            }
            Self::Method { class, signature } => write!(f, "method {class}.{signature}"),
        }
    }
}

/// Everything [`mark_modified`] flagged, in discovery order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffSummary {
    /// Flagged elements.
    pub marked: Vec<MarkedElement>,
}

impl DiffSummary {
    /// Returns `true` if nothing was flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    fn push(&mut self, element: MarkedElement) {
        info!(element = %element, "marked as modified");
        self.marked.push(element);
    }
}

/// Flags every element of `previous` whose generated code must be purged
/// given `current`.
///
/// - A class missing from `current` is flagged together with all its members.
/// - A class still present but emptied of members is flagged so its file can
///   be deleted.
/// - Attributes are flagged when missing or their type or property style
///   changed; roles when missing or their cardinality, property style, or
///   partner class changed; methods when no current method shares their
///   signature.
/// - A flagged role always takes its counterpart role with it.
///
/// Named roles are matched by name. An unnamed role is matched by its partner
/// class and the name of its counterpart, so a class on the far end of several
/// one-way associations keeps each of them apart.
pub fn mark_modified(previous: &mut ClassModel, current: &ClassModel) -> DiffSummary {
    let stale = stale_roles(previous, current);
    let mut summary = DiffSummary::default();
    let mut partners: Vec<RoleRef> = Vec::new();

    for old_class in &mut previous.classes {
        let Some(new_class) = current.class(&old_class.name) else {
            old_class.mark_as_modified();
            summary.push(MarkedElement::Class(old_class.name.clone()));
            partners.extend(old_class.roles.iter().filter_map(|r| r.other.clone()));
            continue;
        };

        if !old_class.is_empty() && new_class.is_empty() {
            old_class.modified = true;
            summary.push(MarkedElement::Class(old_class.name.clone()));
        }

        let class_name = old_class.name.clone();
        for attr in &mut old_class.attributes {
            if attribute_changed(attr, new_class) {
                attr.modified = true;
                summary.push(MarkedElement::Attribute {
                    class: class_name.clone(),
                    name: attr.name.clone(),
                });
            }
        }

        for (index, role) in old_class.roles.iter_mut().enumerate() {
            if stale.contains(&RoleRef { class: class_name.clone(), index }) {
                role.modified = true;
                summary.push(MarkedElement::Role { class: class_name.clone(), name: role.name.clone() });
                partners.extend(role.other.clone());
            }
        }

        for method in &mut old_class.methods {
            if method_changed(method, new_class) {
                method.modified = true;
                summary.push(MarkedElement::Method {
                    class: class_name.clone(),
                    signature: method.signature().to_string(),
                });
            }
        }
    }

    for partner in partners {
        if let Some(role) = previous.role_mut(&partner) {
            if !role.modified {
                role.modified = true;
                summary.push(MarkedElement::Role { class: partner.class.clone(), name: role.name.clone() });
            }
        }
    }

    summary
}

fn attribute_changed(old: &Attribute, new_class: &Clazz) -> bool {
    new_class.attribute(&old.name).map_or(true, |new| {
        old.attr_type != new.attr_type || old.property_style != new.property_style
    })
}

/// Roles of surviving classes in `previous` that have no unchanged match in
/// `current`.
fn stale_roles(previous: &ClassModel, current: &ClassModel) -> HashSet<RoleRef> {
    let mut stale = HashSet::new();
    for old_class in &previous.classes {
        let Some(new_class) = current.class(&old_class.name) else {
            continue;
        };
        for (index, old) in old_class.roles.iter().enumerate() {
            let changed = matching_role(previous, old, current, new_class).map_or(true, |new| {
                old.cardinality != new.cardinality
                    || old.property_style != new.property_style
                    || partner_class(old) != partner_class(new)
            });
            if changed {
                stale.insert(RoleRef { class: old_class.name.clone(), index });
            }
        }
    }
    stale
}

fn matching_role<'a>(
    previous: &ClassModel,
    old: &AssocRole,
    current: &'a ClassModel,
    new_class: &'a Clazz,
) -> Option<&'a AssocRole> {
    if old.name.is_some() {
        return new_class.role(old.name.as_deref());
    }
    let counterpart = counterpart_name(previous, old);
    new_class.roles.iter().find(|new| {
        new.name.is_none()
            && partner_class(new) == partner_class(old)
            && counterpart_name(current, new) == counterpart
    })
}

fn partner_class(role: &AssocRole) -> Option<&str> {
    role.other.as_ref().map(|o| o.class.as_str())
}

fn counterpart_name<'a>(model: &'a ClassModel, role: &AssocRole) -> Option<&'a str> {
    model.other_role(role).and_then(|o| o.name.as_deref())
}

fn method_changed(old: &FMethod, new_class: &Clazz) -> bool {
    !new_class.methods.iter().any(|new| old.signature_matches(new))
}

/// Formats a summary for human-readable display.
#[must_use]
pub fn format_summary(summary: &DiffSummary) -> String {
    if summary.is_empty() {
        return "No changes since last generation.".to_string();
    }
    let mut lines = vec!["Stale generated code to be removed:".to_string()];
    for element in &summary.marked {
        lines.push(format!("  - {element}"));
    }
    lines.join("\n")
}
