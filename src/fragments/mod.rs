//! Fragment store: a generated file as an ordered list of keyed text spans.
//!
//! The ordered list is authoritative for output (the file text is the
//! concatenation of all fragments); the key index is derived from it and is
//! rebuilt after every structural change so the two never disagree.

pub mod merge;
pub mod parser;

use std::collections::HashMap;

use tracing::debug;

use crate::signature::Signature;

/// Key of the empty fragment every store starts with.
pub const START: &str = "start:";
/// Key of the package declaration.
pub const PACKAGE: &str = "package";
/// Key prefix of import lines.
pub const IMPORT: &str = "import:";
/// Key of the class declaration.
pub const CLASS: &str = "class";
/// Key prefix of constructors.
pub const CONSTRUCTOR: &str = "constructor:";
/// Key prefix of attribute declarations.
pub const ATTRIBUTE: &str = "attribute:";
/// Key prefix of methods.
pub const METHOD: &str = "method:";
/// Key of the closing brace of the class body.
pub const CLASS_END: &str = "classEnd";
/// Key of blank-line gaps.
pub const GAP: &str = "gap:";
/// Key of hand-written text the parser could not classify.
pub const TEXT: &str = "text:";

/// Category of a fragment, derived from its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCategory {
    /// Start-of-file fragment (file header).
    Start,
    /// Package declaration.
    Package,
    /// Import line.
    Import,
    /// Class declaration up to the opening brace.
    Class,
    /// Constructor.
    Constructor,
    /// Attribute declaration.
    Attribute,
    /// Method.
    Method,
    /// Closing brace of the class body.
    ClassEnd,
    /// Whitespace between fragments.
    Gap,
    /// Unclassified hand-written text.
    Text,
}

impl KeyCategory {
    /// Classifies a fragment key.
    #[must_use]
    pub fn of(key: &str) -> Self {
        match key {
            PACKAGE => Self::Package,
            CLASS => Self::Class,
            CLASS_END => Self::ClassEnd,
            GAP => Self::Gap,
            START => Self::Start,
            _ if key.starts_with(IMPORT) => Self::Import,
            _ if key.starts_with(ATTRIBUTE) => Self::Attribute,
            _ if key.starts_with(METHOD) => Self::Method,
            _ if key.starts_with(CONSTRUCTOR) => Self::Constructor,
            _ => Self::Text,
        }
    }

    /// Members are placed inside the class body.
    #[must_use]
    pub fn is_member(self) -> bool {
        matches!(self, Self::Attribute | Self::Method | Self::Constructor)
    }

    /// Only uniquely keyed categories are reachable through the index.
    #[must_use]
    pub fn is_indexed(self) -> bool {
        !matches!(self, Self::Start | Self::Gap | Self::Text)
    }
}

/// Key of the import of `qualified_name`.
#[must_use]
pub fn import_key(qualified_name: &str) -> String {
    format!("{IMPORT}{qualified_name}")
}

/// Key of the attribute declaration named `name`.
#[must_use]
pub fn attribute_key(name: &str) -> String {
    format!("{ATTRIBUTE}{name}")
}

/// Key of a method with the given signature.
#[must_use]
pub fn method_key(signature: &Signature) -> String {
    format!("{METHOD}{signature}")
}

/// Key of a constructor with the given signature.
#[must_use]
pub fn constructor_key(signature: &Signature) -> String {
    format!("{CONSTRUCTOR}{signature}")
}

/// A keyed span of file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFragment {
    /// Fragment key.
    pub key: String,
    /// Raw text, emitted verbatim.
    pub text: String,
}

impl CodeFragment {
    /// Creates a fragment.
    #[must_use]
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self { key: key.into(), text: text.into() }
    }

    /// Creates a gap of `blank_lines` newlines.
    #[must_use]
    pub fn gap(blank_lines: usize) -> Self {
        Self::new(GAP, "\n".repeat(blank_lines))
    }

    /// Category of this fragment.
    #[must_use]
    pub fn category(&self) -> KeyCategory {
        KeyCategory::of(&self.key)
    }
}

/// Ordered fragments of one file plus a key index.
#[derive(Debug, Clone)]
pub struct FragmentMap {
    fragments: Vec<CodeFragment>,
    index: HashMap<String, usize>,
}

impl Default for FragmentMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentMap {
    /// Creates a store holding only the empty start fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fragments(vec![CodeFragment::new(START, "")])
    }

    /// Creates a store from fragments in file order.
    ///
    /// When a unique key occurs more than once, the first occurrence wins.
    #[must_use]
    pub fn from_fragments(fragments: Vec<CodeFragment>) -> Self {
        let mut map = Self { fragments, index: HashMap::new() };
        map.reindex();
        map
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, fragment) in self.fragments.iter().enumerate() {
            if fragment.category().is_indexed() {
                self.index.entry(fragment.key.clone()).or_insert(pos);
            }
        }
    }

    /// Fragments in file order.
    #[must_use]
    pub fn fragments(&self) -> &[CodeFragment] {
        &self.fragments
    }

    /// Looks up a fragment by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CodeFragment> {
        self.index.get(key).map(|&pos| &self.fragments[pos])
    }

    /// Keys of all fragments in file order, gaps included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|f| f.key.as_str())
    }

    /// Reconciles freshly generated `new_text` with the fragment under `key`.
    ///
    /// - Missing fragment: inserted (with a trailing gap of `blank_lines`
    ///   newlines) unless `force_remove` is set, in which case nothing happens.
    /// - Protected fragment (contains [`merge::PROTECTION_MARKER`]): returned
    ///   unchanged, even when `force_remove` is set.
    /// - `force_remove`: the fragment and a directly preceding gap are deleted;
    ///   the removed fragment is returned.
    /// - Otherwise the texts are merged in place (see [`merge::merge_text`]).
    pub fn upsert(
        &mut self,
        key: &str,
        new_text: &str,
        blank_lines: usize,
        force_remove: bool,
    ) -> Option<CodeFragment> {
        let Some(pos) = self.index.get(key).copied() else {
            if force_remove {
                return None;
            }
            return Some(self.insert_new(key, new_text, blank_lines));
        };

        if self.fragments[pos].text.contains(merge::PROTECTION_MARKER) {
            debug!(key, "protected fragment left untouched");
            return Some(self.fragments[pos].clone());
        }

        if force_remove {
            let removed = self.fragments.remove(pos);
            if pos > 0 && self.fragments[pos - 1].key == GAP {
                self.fragments.remove(pos - 1);
            }
            self.reindex();
            debug!(key, "removed stale fragment");
            return Some(removed);
        }

        let merged = merge::merge_text(key, &self.fragments[pos].text, new_text);
        self.fragments[pos].text = merged;
        Some(self.fragments[pos].clone())
    }

    fn insert_new(&mut self, key: &str, text: &str, blank_lines: usize) -> CodeFragment {
        let fragment = CodeFragment::new(key, text);
        let gap = CodeFragment::gap(blank_lines);
        let category = KeyCategory::of(key);

        let anchor = if category.is_member() {
            self.index.get(CLASS_END).copied()
        } else if category == KeyCategory::Import {
            self.index.get(CLASS).map(|&pos| pos.saturating_sub(1))
        } else {
            None
        };

        match (category, anchor) {
            (KeyCategory::Import, Some(pos)) => {
                self.fragments.insert(pos, gap);
                self.fragments.insert(pos + 1, fragment.clone());
            }
            (_, Some(pos)) => {
                self.fragments.insert(pos, fragment.clone());
                self.fragments.insert(pos + 1, gap);
            }
            (_, None) => {
                self.fragments.push(fragment.clone());
                self.fragments.push(gap);
            }
        }
        self.reindex();
        debug!(key, "inserted new fragment");
        fragment
    }

    /// Returns `true` if nothing but gaps lies between the class declaration
    /// and the end of the class body, or if either anchor is missing.
    #[must_use]
    pub fn is_class_body_empty(&self) -> bool {
        let (Some(&start), Some(&end)) = (self.index.get(CLASS), self.index.get(CLASS_END)) else {
            return true;
        };
        if end <= start {
            return true;
        }
        self.fragments[start + 1..end].iter().all(|f| f.key == GAP)
    }

    /// Concatenates all fragments into the file text.
    #[must_use]
    pub fn render(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}
