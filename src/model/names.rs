//! Identifier checks for model element and package names.

use crate::error::{GenError, Result};

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null", "var", "record", "yield",
];

const JAVA_LANG_CLASSES: &[&str] = &[
    "Boolean", "Byte", "Character", "Class", "ClassLoader", "Double", "Enum", "Error",
    "Exception", "Float", "Integer", "Iterable", "Long", "Math", "Number", "Object", "Override",
    "Process", "Record", "Runnable", "Runtime", "RuntimeException", "Short", "String",
    "StringBuilder", "System", "Thread", "Throwable", "Void",
];

/// Returns `true` if `name` is a Java identifier that is not a keyword.
#[must_use]
pub fn is_simple_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !JAVA_KEYWORDS.contains(&name)
}

/// Returns `true` if `name` is a dot-separated sequence of simple names.
#[must_use]
pub fn is_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_simple_name)
}

/// Fails unless `name` is a valid simple identifier.
///
/// # Errors
///
/// Returns [`GenError::InvalidName`] for empty names, keywords, and names
/// with characters Java does not accept.
pub fn check_simple_name(name: &str) -> Result<()> {
    if is_simple_name(name) {
        Ok(())
    } else {
        Err(GenError::InvalidName(format!("'{name}' is not a valid Java identifier")))
    }
}

/// Fails unless `name` is a valid qualified (package) name.
///
/// # Errors
///
/// Returns [`GenError::InvalidName`] if any segment is not a simple name.
pub fn check_qualified_name(name: &str) -> Result<()> {
    if is_qualified_name(name) {
        Ok(())
    } else {
        Err(GenError::InvalidName(format!("'{name}' is not a valid qualified Java identifier")))
    }
}

/// Fails if a generated class named `name` would shadow a `java.lang` class.
///
/// # Errors
///
/// Returns [`GenError::InvalidName`] on a clash.
pub fn check_java_lang_clash(name: &str) -> Result<()> {
    if JAVA_LANG_CLASSES.contains(&name) {
        return Err(GenError::InvalidName(format!("name clash with java.lang.{name}")));
    }
    Ok(())
}
