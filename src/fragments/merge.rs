//! Text-level merging of regenerated fragments into existing ones.
//!
//! There is no Java parser behind this: class declarations and attributes
//! are merged around fixed textual anchors, first match wins.

use std::sync::OnceLock;

use regex::Regex;

use crate::fragments::KeyCategory;

/// A fragment containing this text is never regenerated or removed.
pub const PROTECTION_MARKER: &str = "// no";

/// New text containing this character carries its own annotations and
/// replaces the stored text verbatim.
pub const ANNOTATION_MARKER: char = '@';

/// Attribute declarations are spliced at the first occurrence of this keyword.
pub const VISIBILITY_ANCHOR: &str = "public";

fn class_decl_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"class\s+(\w+)\s*(extends\s+[^\s]+)?").expect("valid class declaration regex")
    })
}

/// Merges `new_text` into the stored `old_text` of the fragment `key`.
///
/// The result is always trimmed.
#[must_use]
pub fn merge_text(key: &str, old_text: &str, new_text: &str) -> String {
    let annotated = new_text.contains(ANNOTATION_MARKER);
    let merged = match KeyCategory::of(key) {
        KeyCategory::Class if !annotated => merge_class_decl(old_text, new_text),
        KeyCategory::Attribute if !annotated => merge_attribute(old_text, new_text),
        _ => new_text.to_string(),
    };
    merged.trim().to_string()
}

/// Takes the class name and `extends` clause from `new_text`, keeping the
/// old text's leading comments/annotations and its `implements` clause.
///
/// Falls back to `new_text` when either anchor is missing.
#[must_use]
pub fn merge_class_decl(old_text: &str, new_text: &str) -> String {
    let Some(caps) = class_decl_pattern().captures(new_text) else {
        return new_text.to_string();
    };
    let class_name = &caps[1];
    let extends_clause = caps.get(2).map(|m| m.as_str());

    let Some(old_pos) = old_text.find(&format!("class {class_name}")) else {
        return new_text.to_string();
    };

    let mut merged = String::with_capacity(old_text.len() + new_text.len());
    merged.push_str(&old_text[..old_pos]);
    merged.push_str("class ");
    merged.push_str(class_name);
    if let Some(extends_clause) = extends_clause {
        merged.push(' ');
        merged.push_str(extends_clause);
    }
    match old_text.find("implements") {
        Some(implements_pos) => {
            merged.push(' ');
            merged.push_str(&old_text[implements_pos..]);
        }
        None => merged.push_str("\n{"),
    }
    merged
}

/// Keeps whatever precedes the visibility keyword in `old_text` (hand-added
/// annotations, comments, modifiers) and takes the rest from `new_text`.
#[must_use]
pub fn merge_attribute(old_text: &str, new_text: &str) -> String {
    match (new_text.find(VISIBILITY_ANCHOR), old_text.find(VISIBILITY_ANCHOR)) {
        (Some(new_pos), Some(old_pos)) => {
            format!("{}{}", &old_text[..old_pos], &new_text[new_pos..])
        }
        _ => new_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_decl_keeps_comments_and_implements_clause() {
        let old = "/** A person. */\npublic class Person implements Comparable<Person>\n{";
        let new = "public class Person extends Base\n{";
        assert_eq!(
            merge_class_decl(old, new),
            "/** A person. */\npublic class Person extends Base implements Comparable<Person>\n{"
        );
    }

    #[test]
    fn class_decl_drops_removed_extends() {
        let old = "public class Person extends Base\n{";
        let new = "public class Person\n{";
        assert_eq!(merge_class_decl(old, new), "public class Person\n{");
    }

    #[test]
    fn class_decl_without_old_anchor_takes_new_text() {
        let new = "public class Person\n{";
        assert_eq!(merge_class_decl("interface Person {", new), new);
        assert_eq!(merge_class_decl("x", "no declaration here"), "no declaration here");
    }

    #[test]
    fn attribute_keeps_text_before_visibility_keyword() {
        let old = "@Deprecated\n   public static final String PROPERTY_name = \"name\";\n\n   private String name;";
        let new = "public static final String PROPERTY_name = \"name\";\n\n   private int name;";
        assert_eq!(
            merge_attribute(old, new),
            "@Deprecated\n   public static final String PROPERTY_name = \"name\";\n\n   private int name;"
        );
    }

    #[test]
    fn attribute_without_anchor_is_replaced() {
        assert_eq!(merge_attribute("private int a;", "private long a;"), "private long a;");
    }

    #[test]
    fn annotated_new_text_wins_verbatim() {
        let old = "// hand comment\npublic static final String PROPERTY_x = \"x\";";
        let new = "@Id\npublic static final String PROPERTY_x = \"x\";\n";
        assert_eq!(merge_text("attribute:x", old, new), new.trim());
    }

    #[test]
    fn other_keys_are_replaced_and_trimmed() {
        assert_eq!(merge_text("method:a()", "old", "  new body \n"), "new body");
        assert_eq!(merge_text("package", "package a;", "package b;"), "package b;");
    }
}
