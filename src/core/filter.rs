//! Name matching primitives
//!
//! Wildcard patterns, the search query, include-type filters and the
//! exclusion rule set. All matching is done on lower-cased text.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use super::FileType;
use crate::error::RequestError;

/// Returns true if the text contains a `*` or `?` wildcard.
pub fn has_wildcard(text: &str) -> bool {
    text.contains(['*', '?'])
}

/// A shell-style wildcard pattern (`*`, `?`, `[...]`), case-insensitive.
///
/// `*` also matches path separators and braces are taken literally.
#[derive(Clone)]
pub struct WildcardPattern {
    source: String,
    matcher: GlobMatcher,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Result<Self, RequestError> {
        let source = pattern.trim().to_lowercase();
        let escaped = escape_literals(&source);

        let glob = GlobBuilder::new(&escaped)
            .case_insensitive(true)
            .literal_separator(false)
            .backslash_escape(false)
            .build()
            .map_err(|e| RequestError::InvalidPattern {
                pattern: source.clone(),
                source: e,
            })?;

        Ok(Self {
            source,
            matcher: glob.compile_matcher(),
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Rewrite `pattern` so globset reads braces and unclosed `[` literally.
///
/// A class runs from `[` to the next `]`, where a `]` directly after `[` or
/// `[!` belongs to the class.
fn escape_literals(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            '[' => {
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                match chars[j.min(chars.len())..].iter().position(|&c| c == ']') {
                    Some(offset) => {
                        let end = j + offset;
                        out.extend(&chars[i..=end]);
                        i = end + 1;
                        continue;
                    }
                    None => out.push_str("[[]"),
                }
            }
            c => out.push(c),
        }
        i += 1;
    }
    out
}

impl fmt::Debug for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WildcardPattern").field(&self.source).finish()
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// The file-name query of a scan.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NameQuery {
    /// Empty query: every name matches.
    #[default]
    Any,
    /// Case-insensitive substring containment.
    Substring(String),
    /// Wildcard match against the whole lower-cased name.
    Wildcard(WildcardPattern),
}

impl NameQuery {
    pub fn parse(query: &str) -> Result<Self, RequestError> {
        let query = query.trim();
        if query.is_empty() {
            Ok(NameQuery::Any)
        } else if has_wildcard(query) {
            Ok(NameQuery::Wildcard(WildcardPattern::new(query)?))
        } else {
            Ok(NameQuery::Substring(query.to_lowercase()))
        }
    }

    /// `name` must already be lower-cased.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameQuery::Any => true,
            NameQuery::Substring(needle) => name.contains(needle.as_str()),
            NameQuery::Wildcard(pattern) => pattern.is_match(name),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, NameQuery::Any)
    }
}

/// One entry of the include-type filter set.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeFilter {
    /// Bare extension, stored lower-cased without the leading dot.
    Extension(String),
    Pattern(WildcardPattern),
    Kind(FileType),
}

impl TypeFilter {
    /// Parse `".pdf"`, `"pdf"` or a wildcard such as `"*.tar.gz"`.
    pub fn parse(filter: &str) -> Result<Self, RequestError> {
        let filter = filter.trim();
        if has_wildcard(filter) {
            Ok(TypeFilter::Pattern(WildcardPattern::new(filter)?))
        } else {
            Ok(TypeFilter::Extension(
                filter.trim_start_matches('.').to_lowercase(),
            ))
        }
    }

    /// `name` and `extension` must already be lower-cased.
    pub fn matches(&self, name: &str, extension: &str) -> bool {
        match self {
            TypeFilter::Extension(ext) => ext == extension,
            TypeFilter::Pattern(pattern) => pattern.is_match(name),
            TypeFilter::Kind(kind) => FileType::from_extension(extension) == *kind,
        }
    }
}

/// Built-in folder tokens that can be toggled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Version-control metadata (`.git`).
    Git,
    /// Dependency cache (`node_modules`).
    NodeModules,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Git, Preset::NodeModules];

    pub fn token(&self) -> &'static str {
        match self {
            Preset::Git => ".git",
            Preset::NodeModules => "node_modules",
        }
    }
}

/// Folder-token set OR name-pattern set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionRules {
    folder_tokens: BTreeSet<String>,
    name_patterns: Vec<WildcardPattern>,
}

impl ExclusionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules with every preset switched on.
    pub fn with_presets() -> Self {
        let mut rules = Self::new();
        for preset in Preset::ALL {
            rules.set_preset(preset, true);
        }
        rules
    }

    /// Add a folder token; returns false for blanks and repeats.
    pub fn add_folder_token(&mut self, token: &str) -> bool {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return false;
        }
        self.folder_tokens.insert(token)
    }

    pub fn remove_folder_token(&mut self, token: &str) -> bool {
        self.folder_tokens.remove(&token.trim().to_lowercase())
    }

    pub fn add_name_pattern(&mut self, pattern: &str) -> Result<bool, RequestError> {
        if pattern.trim().is_empty() {
            return Ok(false);
        }
        let pattern = WildcardPattern::new(pattern)?;
        if self.name_patterns.contains(&pattern) {
            return Ok(false);
        }
        self.name_patterns.push(pattern);
        Ok(true)
    }

    pub fn remove_name_pattern(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim().to_lowercase();
        let before = self.name_patterns.len();
        self.name_patterns.retain(|p| p.as_str() != pattern);
        self.name_patterns.len() != before
    }

    pub fn set_preset(&mut self, preset: Preset, enabled: bool) {
        if enabled {
            self.add_folder_token(preset.token());
        } else {
            self.remove_folder_token(preset.token());
        }
    }

    pub fn has_preset(&self, preset: Preset) -> bool {
        self.folder_tokens.contains(preset.token())
    }

    /// True if the lower-cased directory path contains any folder token.
    pub fn excludes_dir(&self, dir: &Path) -> bool {
        if self.folder_tokens.is_empty() {
            return false;
        }
        let lower = dir.to_string_lossy().to_lowercase();
        self.contains_token(&lower)
    }

    /// Folder tokens are tested against the full path, name patterns
    /// against the lower-cased file name.
    pub fn excludes_file(&self, path: &Path, name_lower: &str) -> bool {
        if self.excludes_dir(path) {
            return true;
        }
        self.name_patterns.iter().any(|p| p.is_match(name_lower))
    }

    fn contains_token(&self, lower: &str) -> bool {
        self.folder_tokens.iter().any(|tok| lower.contains(tok.as_str()))
    }

    pub fn folder_tokens(&self) -> impl Iterator<Item = &str> {
        self.folder_tokens.iter().map(String::as_str)
    }

    pub fn name_patterns(&self) -> impl Iterator<Item = &str> {
        self.name_patterns.iter().map(WildcardPattern::as_str)
    }

    pub fn len(&self) -> usize {
        self.folder_tokens.len() + self.name_patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Comma-separated, sorted list of every rule, for status lines.
    pub fn summary(&self) -> String {
        let mut items: Vec<&str> = self.folder_tokens().chain(self.name_patterns()).collect();
        items.sort_unstable();
        items.join(", ")
    }
}
