//! Reverse parser: turns an existing Java source file back into fragments.
//!
//! Only structural anchors are recognised: file header, package, imports,
//! the class declaration, body members, and the closing brace. Everything
//! between them is kept verbatim as gaps or unclassified text, so the
//! concatenation of the fragments always reproduces the input exactly.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::context::ServiceContext;
use crate::error::{GenError, Result};
use crate::fragments::{
    attribute_key, constructor_key, import_key, method_key, CodeFragment, FragmentMap, KeyCategory,
    CLASS, CLASS_END, GAP, PACKAGE, START, TEXT,
};
use crate::signature;

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "strictfp",
    "default",
];

const TYPE_KEYWORDS: &[&str] = &["class", "interface", "enum", "record"];

/// Prefix of the name constant generated attributes declare next to their field.
const PROPERTY_PREFIX: &str = "PROPERTY_";

/// Parses the file at `path`, or returns an empty store if it does not exist.
///
/// # Errors
///
/// Returns [`GenError::FileSystem`] if the file exists but cannot be read.
pub fn parse_file(ctx: &ServiceContext, path: &Path) -> Result<FragmentMap> {
    if !ctx.fs.exists(path) {
        return Ok(FragmentMap::new());
    }
    let source = ctx.fs.read_to_string(path).map_err(|e| GenError::fs(path, e.as_ref()))?;
    Ok(parse(&source))
}

/// Splits Java source into fragments keyed the way the generator keys them.
#[must_use]
pub fn parse(source: &str) -> FragmentMap {
    let mut parser = Parser { src: source, bytes: source.as_bytes(), out: Vec::new() };
    parser.run();
    FragmentMap::from_fragments(parser.out)
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    out: Vec<CodeFragment>,
}

impl Parser<'_> {
    fn run(&mut self) {
        self.out.push(CodeFragment::new(START, ""));
        let Some(body_start) = self.parse_header() else {
            return;
        };
        self.parse_body(body_start);
    }

    /// Parses everything up to and including the class declaration's `{`.
    ///
    /// Returns the position after the brace, or `None` if the input ended.
    fn parse_header(&mut self) -> Option<usize> {
        let len = self.bytes.len();
        let mut pos = 0;
        loop {
            let ws_end = self.skip_whitespace(pos);
            if ws_end == len {
                self.push_gap(pos, len);
                return None;
            }

            let (comments_end, stmt_start) = self.skip_comments(ws_end);
            let is_statement =
                self.starts_with_word(stmt_start, "package") || self.starts_with_word(stmt_start, "import");
            if !is_statement {
                self.push_gap(pos, ws_end);
                let Some(brace) = self.find_top_level(ws_end, b'{') else {
                    self.out.push(CodeFragment::new(TEXT, &self.src[ws_end..]));
                    return None;
                };
                self.out.push(CodeFragment::new(CLASS, &self.src[ws_end..=brace]));
                return Some(brace + 1);
            }

            if comments_end > ws_end {
                let comment = &self.src[ws_end..comments_end];
                if self.out.len() == 1 && self.out[0].text.is_empty() && pos == 0 {
                    self.out[0].text = self.src[..comments_end].to_string();
                } else {
                    self.push_gap(pos, ws_end);
                    self.out.push(CodeFragment::new(TEXT, comment));
                }
                self.push_gap(comments_end, stmt_start);
            } else {
                self.push_gap(pos, stmt_start);
            }

            let stmt_end = self.find_top_level(stmt_start, b';').map_or(len, |semi| semi + 1);
            let stmt = &self.src[stmt_start..stmt_end];
            let key = if self.starts_with_word(stmt_start, "package") {
                PACKAGE.to_string()
            } else {
                let name = stmt.trim_start_matches("import").trim_end_matches(';');
                import_key(&name.split_whitespace().collect::<Vec<_>>().join(" "))
            };
            self.out.push(CodeFragment::new(key, stmt));
            pos = stmt_end;
        }
    }

    fn parse_body(&mut self, mut pos: usize) {
        let len = self.bytes.len();
        loop {
            let ws_end = self.skip_whitespace(pos);
            self.push_gap(pos, ws_end);
            if ws_end == len {
                return;
            }

            if self.bytes[ws_end] == b'}' {
                self.out.push(CodeFragment::new(CLASS_END, "}"));
                let rest_start = ws_end + 1;
                let rest_ws_end = self.skip_whitespace(rest_start);
                self.push_gap(rest_start, rest_ws_end);
                if rest_ws_end < len {
                    self.out.push(CodeFragment::new(TEXT, &self.src[rest_ws_end..]));
                }
                return;
            }

            let end = self.scan_member(ws_end);
            let end = if end == ws_end { ws_end + 1 } else { end };
            let text = &self.src[ws_end..end];
            let key = classify_member(text);
            self.push_member(key, text);
            pos = end;
        }
    }

    /// Appends a member, folding a `PROPERTY_x` constant into the field `x`
    /// that directly follows it.
    fn push_member(&mut self, key: String, text: &str) {
        if KeyCategory::of(&key) == KeyCategory::Attribute {
            let name = &key[crate::fragments::ATTRIBUTE.len()..];
            let n = self.out.len();
            if n >= 2 && self.out[n - 1].key == GAP {
                let constant = attribute_key(&format!("{PROPERTY_PREFIX}{name}"));
                if self.out[n - 2].key == constant {
                    let gap = self.out.pop().map(|g| g.text).unwrap_or_default();
                    if let Some(prev) = self.out.last_mut() {
                        prev.key = key;
                        prev.text.push_str(&gap);
                        prev.text.push_str(text);
                    }
                    return;
                }
            }
        }
        self.out.push(CodeFragment::new(key, text));
    }

    fn push_gap(&mut self, from: usize, to: usize) {
        if to > from {
            self.out.push(CodeFragment::new(GAP, &self.src[from..to]));
        }
    }

    fn skip_whitespace(&self, mut pos: usize) -> usize {
        while pos < self.bytes.len() && self.bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    }

    /// Skips comments and whitespace starting at `pos`.
    ///
    /// Returns the end of the last comment (or `pos` if there was none) and
    /// the position of the next token.
    fn skip_comments(&self, pos: usize) -> (usize, usize) {
        let mut comments_end = pos;
        let mut cursor = pos;
        while let Some(end) = self.comment_end(cursor) {
            comments_end = end;
            cursor = self.skip_whitespace(end);
        }
        (comments_end, cursor)
    }

    fn comment_end(&self, pos: usize) -> Option<usize> {
        let rest = &self.bytes[pos..];
        if rest.starts_with(b"//") {
            Some(self.src[pos..].find('\n').map_or(self.bytes.len(), |nl| pos + nl))
        } else if rest.starts_with(b"/*") {
            Some(self.src[pos + 2..].find("*/").map_or(self.bytes.len(), |end| pos + 2 + end + 2))
        } else {
            None
        }
    }

    fn literal_end(&self, pos: usize) -> Option<usize> {
        let rest = &self.bytes[pos..];
        if rest.starts_with(b"\"\"\"") {
            return Some(self.src[pos + 3..].find("\"\"\"").map_or(self.bytes.len(), |e| pos + 3 + e + 3));
        }
        let quote = match rest.first() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return None,
        };
        let mut i = pos + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => return Some(i),
                c if c == quote => return Some(i + 1),
                _ => i += 1,
            }
        }
        Some(self.bytes.len())
    }

    /// Skips a comment or literal at `pos`, if there is one.
    fn skip_trivia(&self, pos: usize) -> Option<usize> {
        self.comment_end(pos).or_else(|| self.literal_end(pos))
    }

    /// Finds `target` outside comments, literals, and parentheses.
    fn find_top_level(&self, mut pos: usize, target: u8) -> Option<usize> {
        let mut parens = 0i32;
        while pos < self.bytes.len() {
            if let Some(end) = self.skip_trivia(pos) {
                pos = end;
                continue;
            }
            match self.bytes[pos] {
                b'(' => parens += 1,
                b')' => parens -= 1,
                c if c == target && parens == 0 => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Returns the position after the matching `}` of the brace at `open`.
    fn skip_block(&self, open: usize) -> usize {
        let mut depth = 0i32;
        let mut pos = open;
        while pos < self.bytes.len() {
            if let Some(end) = self.skip_trivia(pos) {
                pos = end;
                continue;
            }
            match self.bytes[pos] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return pos + 1;
                    }
                }
                _ => {}
            }
            pos += 1;
        }
        self.bytes.len()
    }

    /// Returns the end of the member starting at `start`: after its `;`, or
    /// after its body block when it has one.
    fn scan_member(&self, start: usize) -> usize {
        let mut pos = start;
        let mut parens = 0i32;
        let mut initializer = false;
        while pos < self.bytes.len() {
            if let Some(end) = self.skip_trivia(pos) {
                pos = end;
                continue;
            }
            match self.bytes[pos] {
                b'(' => parens += 1,
                b')' => parens -= 1,
                b'=' if parens == 0 => initializer = true,
                b';' if parens == 0 => return pos + 1,
                b'{' if parens == 0 => {
                    let after = self.skip_block(pos);
                    if !initializer {
                        return after;
                    }
                    pos = after;
                    continue;
                }
                b'}' if parens == 0 => return pos,
                _ => {}
            }
            pos += 1;
        }
        self.bytes.len()
    }

    fn starts_with_word(&self, pos: usize, word: &str) -> bool {
        self.src[pos..].starts_with(word)
            && self.bytes.get(pos + word.len()).map_or(true, |c| !is_ident_byte(*c))
    }
}

fn is_ident_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

fn annotation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"@[\w.]+(\s*\([^)]*\))?").expect("valid annotation regex"))
}

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("valid comment regex"))
}

/// Header of a member: text before its body, initializer, or terminator,
/// with comments and annotations removed.
fn member_header(text: &str) -> (String, bool) {
    let code = comment_pattern().replace_all(text, " ");
    let code = annotation_pattern().replace_all(&code, " ");
    let mut parens = 0i32;
    for (i, c) in code.char_indices() {
        match c {
            '(' => parens += 1,
            ')' => parens -= 1,
            '{' if parens == 0 => return (code[..i].trim().to_string(), true),
            '=' | ';' if parens == 0 => return (code[..i].trim().to_string(), false),
            _ => {}
        }
    }
    (code.trim().to_string(), false)
}

/// Derives the fragment key of one class-body member.
fn classify_member(text: &str) -> String {
    let (header, has_block) = member_header(text);
    let before_params = header.split('(').next().unwrap_or_default();
    if before_params.split_whitespace().any(|w| TYPE_KEYWORDS.contains(&w)) {
        return TEXT.to_string();
    }

    if header.contains('(') {
        let Some(sig) = signature::parse_declaration(&header) else {
            return TEXT.to_string();
        };
        let head = before_params.trim_end();
        let prefix = head.strip_suffix(sig.name.as_str()).unwrap_or(head);
        let only_modifiers = prefix
            .split_whitespace()
            .all(|w| MODIFIERS.contains(&w) || (w.starts_with('<') && w.ends_with('>')));
        return if only_modifiers { constructor_key(&sig) } else { method_key(&sig) };
    }

    if has_block {
        return TEXT.to_string();
    }
    match header.split_whitespace().last() {
        Some(name) if name.bytes().all(is_ident_byte) && header.split_whitespace().count() >= 2 => {
            attribute_key(name)
        }
        _ => TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = r#"/* License header */
package org.example;

import java.util.ArrayList;
import java.util.List;

/**
 * A person.
 */
@Entity
public class Person extends Base implements Comparable<Person>
{

   public static final String PROPERTY_name = "name";

   private String name;

   private List<Dog> dogs = new ArrayList<>();

   public Person()
   {
   }

   public String getName()
   {
      return this.name; // see { brace in comment
   }

   public Person setName(String value)
   {
      this.name = "}" + value;
      return this;
   }

   public Person withDogs(Object... value)
   {
      return this;
   }

   static
   {
      System.out.println("init");
   }

   enum Kind { A, B }
}
"#;

    fn non_gap_keys(map: &FragmentMap) -> Vec<String> {
        map.keys().filter(|k| *k != GAP).map(str::to_string).collect()
    }

    #[test]
    fn concatenation_reproduces_input() {
        assert_eq!(parse(PERSON).render(), PERSON);
    }

    #[test]
    fn recognises_structural_fragments() {
        let map = parse(PERSON);
        assert_eq!(
            non_gap_keys(&map),
            vec![
                "start:",
                "package",
                "import:java.util.ArrayList",
                "import:java.util.List",
                "class",
                "attribute:name",
                "attribute:dogs",
                "constructor:Person()",
                "method:getName()",
                "method:setName(String)",
                "method:withDogs(Object...)",
                "text:",
                "text:",
                "classEnd",
            ]
        );
        assert_eq!(map.fragments()[0].text, "/* License header */");
    }

    #[test]
    fn class_declaration_keeps_leading_comments_and_annotations() {
        let map = parse(PERSON);
        let class = &map.get(CLASS).unwrap().text;
        assert!(class.starts_with("/**\n * A person.\n */\n@Entity\npublic class Person"));
        assert!(class.ends_with("implements Comparable<Person>\n{"));
    }

    #[test]
    fn property_constant_is_folded_into_attribute() {
        let map = parse(PERSON);
        assert_eq!(
            map.get("attribute:name").unwrap().text,
            "public static final String PROPERTY_name = \"name\";\n\n   private String name;"
        );
    }

    #[test]
    fn gaps_carry_indentation() {
        let map = parse(PERSON);
        let fragments = map.fragments();
        let pos = fragments.iter().position(|f| f.key == "method:getName()").unwrap();
        assert_eq!(fragments[pos - 1].text, "\n\n   ");
    }

    #[test]
    fn empty_input_yields_start_fragment_only() {
        let map = parse("");
        assert_eq!(non_gap_keys(&map), vec!["start:"]);
        assert!(map.is_class_body_empty());
    }

    #[test]
    fn unterminated_class_is_kept_verbatim() {
        let source = "package a;\n\npublic class A\n{\n   int x;\n";
        let map = parse(source);
        assert_eq!(map.render(), source);
        assert!(map.get("attribute:x").is_some());
        assert!(map.get(CLASS_END).is_none());
    }

    #[test]
    fn classify_handles_fields_and_generic_methods() {
        assert_eq!(classify_member("private int[] values = {1, 2};"), "attribute:values");
        assert_eq!(
            classify_member("public <T> List<T> copy(List<T> in) { return in; }"),
            "method:copy(List<T>)"
        );
        assert_eq!(classify_member("Person(String name) {}"), "constructor:Person(String)");
        assert_eq!(classify_member("{ init(); }"), TEXT);
    }

    #[test]
    fn parse_file_of_missing_path_is_empty_store() {
        let ctx = ServiceContext::with_fs(Box::new(crate::adapters::memory::MemoryFileSystem::new()));
        let map = parse_file(&ctx, Path::new("/missing/A.java")).unwrap();
        assert_eq!(map.render(), "");
    }
}
