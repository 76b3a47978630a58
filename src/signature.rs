//! Method signatures and their normalised fragment-key form.
//!
//! Both the generator and the reverse parser derive method and constructor
//! keys through this module, so a member keyed during one run is found again
//! by the parser on the next.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Name and ordered parameter types of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Method name.
    pub name: String,
    /// Normalised parameter types in declaration order.
    pub param_types: Vec<String>,
}

impl Signature {
    /// Builds a signature from a name and raw parameter types.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, param_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            param_types: param_types.into_iter().map(|t| normalize_type(t.as_ref())).collect(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.param_types.join(","))
    }
}

/// Removes all whitespace from a type so `Map<String, X>` and `Map<String,X>`
/// produce the same key.
#[must_use]
pub fn normalize_type(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Splits a parameter list at commas that are not nested in generics,
/// parentheses, or array brackets.
#[must_use]
pub fn split_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in params.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(params[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = params[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

fn annotation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"@[\w.]+(\([^)]*\))?").expect("valid annotation regex"))
}

/// Extracts the type of a single parameter declaration such as
/// `final List<String> names` or `Object... values`.
#[must_use]
pub fn param_type(param: &str) -> String {
    let stripped = annotation_pattern().replace_all(param, "");
    let mut rest = stripped.trim();
    while let Some(after) = rest.strip_prefix("final") {
        if !after.starts_with(char::is_whitespace) {
            break;
        }
        rest = after.trim_start();
    }

    let name_start = rest
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == '$')
        .last()
        .map_or(rest.len(), |(i, _)| i);
    let ty = rest[..name_start].trim();
    if ty.is_empty() {
        normalize_type(rest)
    } else {
        normalize_type(ty)
    }
}

/// Parses the signature out of a declaration such as
/// `public Person withFriends(Person... value)`.
///
/// Returns `None` when the text contains no parameter list.
#[must_use]
pub fn parse_declaration(declaration: &str) -> Option<Signature> {
    let open = declaration.find('(')?;
    let head = declaration[..open].trim_end();
    let name: String = head
        .chars()
        .rev()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if name.is_empty() {
        return None;
    }

    let mut depth = 0i32;
    let mut close = None;
    for (i, c) in declaration[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let params = &declaration[open + 1..close?];
    let param_types: Vec<String> = split_params(params).into_iter().map(param_type).collect();
    Some(Signature { name, param_types })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_declaration() {
        let sig = parse_declaration("public int add(int a, int b)").unwrap();
        assert_eq!(sig.name, "add");
        assert_eq!(sig.param_types, vec!["int", "int"]);
        assert_eq!(sig.to_string(), "add(int,int)");
    }

    #[test]
    fn generics_and_varargs_are_normalised() {
        let sig =
            parse_declaration("public void put(final Map<String, List<Integer>> m, Object... rest)")
                .unwrap();
        assert_eq!(sig.to_string(), "put(Map<String,List<Integer>>,Object...)");
    }

    #[test]
    fn annotations_are_dropped_from_parameters() {
        let sig = parse_declaration("void f(@NotNull(msg = \"x\") String s)").unwrap();
        assert_eq!(sig.param_types, vec!["String"]);
    }

    #[test]
    fn no_parameters_yields_empty_list() {
        let sig = parse_declaration("public String toString()").unwrap();
        assert!(sig.param_types.is_empty());
        assert_eq!(sig.to_string(), "toString()");
    }

    #[test]
    fn missing_parameter_list_is_none() {
        assert!(parse_declaration("private String name").is_none());
    }

    #[test]
    fn bare_types_are_kept() {
        assert_eq!(param_type("String..."), "String...");
        assert_eq!(Signature::new("setName", ["String"]).to_string(), "setName(String)");
    }
}
