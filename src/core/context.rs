//! Context databases
//!
//! A context database maps a *kind* (macro, environment or specials) and a
//! key (the name, or the literal token for specials) to an entry. The walker
//! uses a database of [`Specification`](crate::core::walker::spec::Specification)s
//! to learn argument shapes; the converter uses a database of
//! [`TextSpec`](crate::core::latex2text::rule::TextSpec)s to learn how to
//! render nodes.
//!
//! Entries live in named categories. Categories form an ordered list and
//! lookups scan it front to back, so a category placed earlier masks the
//! entries of the categories after it. This is how a vocabulary is layered on
//! top of the defaults without touching them:
//!
//! ```
//! use texwalk::core::context::{Category, Placement, SpecKind};
//! use texwalk::core::walker::{spec::Specification, ParsingDb};
//!
//! let mut db = ParsingDb::new();
//! db.add_category(
//!     Category::new("base").with_entries([Specification::macro_spec("emph", "{").unwrap()]),
//!     Placement::Append,
//! ).unwrap();
//! db.add_category(
//!     Category::new("custom").with_entries([Specification::macro_spec("emph", "[{").unwrap()]),
//!     Placement::Prepend,
//! ).unwrap();
//!
//! let spec = db.lookup(SpecKind::Macro, "emph").unwrap();
//! assert_eq!(spec.signature().to_string(), "[{");
//! ```

use std::fmt;

use fxhash::FxHashMap;
use indexmap::IndexMap;

use crate::utils::error::ConfigError;

/// What a database key names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SpecKind {
    Macro,
    Environment,
    Specials,
}

impl SpecKind {
    pub const ALL: [SpecKind; 3] = [SpecKind::Macro, SpecKind::Environment, SpecKind::Specials];

    fn index(self) -> usize {
        match self {
            SpecKind::Macro => 0,
            SpecKind::Environment => 1,
            SpecKind::Specials => 2,
        }
    }
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecKind::Macro => write!(f, "macro"),
            SpecKind::Environment => write!(f, "environment"),
            SpecKind::Specials => write!(f, "specials"),
        }
    }
}

/// An entry that can be stored in a [`ContextDb`]
pub trait ContextEntry {
    fn kind(&self) -> SpecKind;
    /// Macro/environment name, or the literal specials token
    fn key(&self) -> &str;
}

/// Where a category goes relative to the ones already registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// In front of every category (highest precedence)
    Prepend,
    /// Behind every category (lowest precedence)
    Append,
    /// Immediately in front of the named category
    Before(String),
    /// Immediately behind the named category
    After(String),
}

/// A named, ordered group of entries
#[derive(Debug, Clone)]
pub struct Category<T> {
    name: String,
    entries: Vec<T>,
    // Per kind: key -> index into `entries`. A repeated key points at the
    // last entry pushed with it.
    index: [FxHashMap<String, usize>; 3],
    max_specials_len: usize,
}

impl<T: ContextEntry> Category<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            index: Default::default(),
            max_specials_len: 0,
        }
    }

    /// Add entries, keeping their order
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = T>) -> Self {
        for entry in entries {
            self.push(entry);
        }
        self
    }

    pub fn push(&mut self, entry: T) {
        let kind = entry.kind();
        let key = entry.key().to_string();
        if kind == SpecKind::Specials {
            self.max_specials_len = self.max_specials_len.max(key.len());
        }
        self.index[kind.index()].insert(key, self.entries.len());
        self.entries.push(entry);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, kind: SpecKind, key: &str) -> Option<&T> {
        self.index[kind.index()]
            .get(key)
            .and_then(|&i| self.entries.get(i))
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered collection of categories with first-match lookup
#[derive(Debug, Clone)]
pub struct ContextDb<T> {
    categories: IndexMap<String, Category<T>>,
    unknown: FxHashMap<SpecKind, T>,
    max_specials_len: usize,
}

impl<T> Default for ContextDb<T> {
    fn default() -> Self {
        Self {
            categories: IndexMap::new(),
            unknown: FxHashMap::default(),
            max_specials_len: 0,
        }
    }
}

impl<T: ContextEntry> ContextDb<T> {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category. A category with the same name is replaced.
    pub fn add_category(
        &mut self,
        category: Category<T>,
        placement: Placement,
    ) -> Result<(), ConfigError> {
        if let Placement::Before(anchor) | Placement::After(anchor) = &placement {
            if anchor == category.name() || !self.categories.contains_key(anchor.as_str()) {
                return Err(ConfigError::UnknownCategory(anchor.clone()));
            }
        }

        let name = category.name().to_string();
        if self.categories.shift_remove(name.as_str()).is_some() {
            log::debug!("replacing context category '{}'", name);
        }

        let index = match &placement {
            Placement::Prepend => 0,
            Placement::Append => self.categories.len(),
            Placement::Before(anchor) => self.anchor_index(anchor)?,
            Placement::After(anchor) => self.anchor_index(anchor)? + 1,
        };
        self.categories.shift_insert(index, name, category);
        self.refresh_specials_len();
        Ok(())
    }

    /// Non-mutating [`add_category`](Self::add_category)
    pub fn extended_with(
        &self,
        category: Category<T>,
        placement: Placement,
    ) -> Result<Self, ConfigError>
    where
        T: Clone,
    {
        let mut db = self.clone();
        db.add_category(category, placement)?;
        Ok(db)
    }

    pub fn remove_category(&mut self, name: &str) -> Option<Category<T>> {
        let removed = self.categories.shift_remove(name);
        if removed.is_some() {
            self.refresh_specials_len();
        }
        removed
    }

    /// A copy holding only some categories, in the same order.
    ///
    /// An empty `keep` keeps everything not listed in `exclude`.
    pub fn filtered(&self, keep: &[&str], exclude: &[&str]) -> Self
    where
        T: Clone,
    {
        let mut db = Self {
            categories: self
                .categories
                .iter()
                .filter(|(name, _)| keep.is_empty() || keep.contains(&name.as_str()))
                .filter(|(name, _)| !exclude.contains(&name.as_str()))
                .map(|(name, category)| (name.clone(), category.clone()))
                .collect(),
            unknown: self.unknown.clone(),
            max_specials_len: 0,
        };
        db.refresh_specials_len();
        db
    }

    /// First entry for `(kind, key)` in category order
    pub fn lookup(&self, kind: SpecKind, key: &str) -> Option<&T> {
        self.categories
            .values()
            .find_map(|category| category.get(kind, key))
    }

    /// [`lookup`](Self::lookup), falling back to the entry set with
    /// [`set_unknown`](Self::set_unknown)
    pub fn lookup_or_unknown(&self, kind: SpecKind, key: &str) -> Option<&T> {
        self.lookup(kind, key).or_else(|| self.unknown(kind))
    }

    /// Longest registered specials token that prefixes `text`.
    ///
    /// Returns the entry together with the token's byte length.
    pub fn lookup_specials_at(&self, text: &str) -> Option<(&T, usize)> {
        let mut len = self.max_specials_len.min(text.len());
        while len > 0 {
            if text.is_char_boundary(len) {
                if let Some(entry) = self.lookup(SpecKind::Specials, &text[..len]) {
                    return Some((entry, len));
                }
            }
            len -= 1;
        }
        None
    }

    /// Entry used for names of `kind` that no category defines
    pub fn set_unknown(&mut self, kind: SpecKind, entry: T) {
        self.unknown.insert(kind, entry);
    }

    pub fn clear_unknown(&mut self, kind: SpecKind) -> Option<T> {
        self.unknown.remove(&kind)
    }

    pub fn unknown(&self, kind: SpecKind) -> Option<&T> {
        self.unknown.get(&kind)
    }

    pub fn category(&self, name: &str) -> Option<&Category<T>> {
        self.categories.get(name)
    }

    /// Category names, highest precedence first
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn anchor_index(&self, anchor: &str) -> Result<usize, ConfigError> {
        self.categories
            .get_index_of(anchor)
            .ok_or_else(|| ConfigError::UnknownCategory(anchor.to_string()))
    }

    fn refresh_specials_len(&mut self) {
        self.max_specials_len = self
            .categories
            .values()
            .map(|category| category.max_specials_len)
            .max()
            .unwrap_or(0);
    }
}
