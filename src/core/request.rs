//! ScanRequest - immutable input snapshot for either engine

use std::path::{Component, Path, PathBuf};

use super::filter::{ExclusionRules, NameQuery, Preset, TypeFilter};
use crate::error::RequestError;

/// Lower-cased path fragments of OS-managed locations that duplicate scans
/// skip by default.
pub const SYSTEM_SKIP_TOKENS: &[&str] = &[
    "\\windows",
    "\\program files",
    "\\program files (x86)",
    "\\programdata",
    "\\appdata",
    "\\$recycle.bin",
    "\\system volume information",
];

/// Parse a user-entered depth limit.
///
/// Blank, non-numeric and negative input all mean "unbounded".
pub fn parse_depth(input: &str) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match input.parse::<i64>() {
        Ok(depth) if depth >= 0 => usize::try_from(depth).ok(),
        _ => {
            tracing::warn!("Ignoring depth limit {:?}; scanning without a limit", input);
            None
        }
    }
}

/// Absolute, lexically clean form of a user-selected root.
///
/// `.` and `..` components are folded away so that two spellings of the same
/// folder compare equal. Symlinks are left alone.
pub fn normalize_root(root: impl Into<PathBuf>) -> PathBuf {
    let root = root.into();
    let absolute = std::path::absolute(&root).unwrap_or(root);

    let mut clean = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    clean.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    clean.pop();
                }
            }
            other => clean.push(other.as_os_str()),
        }
    }
    clean
}

/// Everything a scan reads, captured once when the scan starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    roots: Vec<PathBuf>,
    query: NameQuery,
    include: Vec<TypeFilter>,
    exclusions: ExclusionRules,
    max_depth: Option<usize>,
    recursive: bool,
    skip_system_dirs: bool,
}

impl ScanRequest {
    pub fn builder() -> ScanRequestBuilder {
        ScanRequestBuilder::default()
    }

    /// Roots in selection order, without repeats.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn query(&self) -> &NameQuery {
        &self.query
    }

    pub fn include(&self) -> &[TypeFilter] {
        &self.include
    }

    pub fn exclusions(&self) -> &ExclusionRules {
        &self.exclusions
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn skip_system_dirs(&self) -> bool {
        self.skip_system_dirs
    }

    /// Depth handed to the walker; non-recursive scans list roots only.
    pub fn effective_depth(&self) -> Option<usize> {
        if self.recursive {
            self.max_depth
        } else {
            Some(0)
        }
    }

    /// True if the walker must not enter `dir`.
    pub fn prunes_dir(&self, dir: &Path) -> bool {
        if self.exclusions.excludes_dir(dir) {
            return true;
        }
        if self.skip_system_dirs {
            let lower = dir.to_string_lossy().to_lowercase();
            return SYSTEM_SKIP_TOKENS.iter().any(|tok| lower.contains(tok));
        }
        false
    }

    /// True if the file passes the include-type filters (none = all pass).
    pub fn includes_type(&self, name_lower: &str, extension: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|f| f.matches(name_lower, extension))
    }

    pub(crate) fn require_roots(&self) -> Result<(), RequestError> {
        if self.roots.is_empty() {
            Err(RequestError::NoRoots)
        } else {
            Ok(())
        }
    }
}

/// Collects raw user input and validates it into a [`ScanRequest`].
#[derive(Debug, Clone)]
pub struct ScanRequestBuilder {
    roots: Vec<PathBuf>,
    query: String,
    include: Vec<String>,
    kinds: Vec<super::FileType>,
    exclusions: ExclusionRules,
    exclude_names: Vec<String>,
    max_depth: Option<usize>,
    recursive: bool,
    skip_system_dirs: bool,
}

impl Default for ScanRequestBuilder {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            query: String::new(),
            include: Vec::new(),
            kinds: Vec::new(),
            exclusions: ExclusionRules::new(),
            exclude_names: Vec::new(),
            max_depth: None,
            recursive: true,
            skip_system_dirs: false,
        }
    }
}

impl ScanRequestBuilder {
    /// Add a root; repeats (after [`normalize_root`]) are ignored.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = normalize_root(root);
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
        self
    }

    pub fn roots<I, P>(self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        roots.into_iter().fold(self, |b, r| b.root(r))
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Extension (`"pdf"`, `".pdf"`) or wildcard (`"*.tar.gz"`).
    pub fn include_type(mut self, filter: impl Into<String>) -> Self {
        self.include.push(filter.into());
        self
    }

    pub fn include_kind(mut self, kind: super::FileType) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    /// Replace the exclusion rules wholesale (e.g. from config).
    pub fn exclusions(mut self, rules: ExclusionRules) -> Self {
        self.exclusions = rules;
        self
    }

    pub fn exclude_folder(mut self, token: &str) -> Self {
        self.exclusions.add_folder_token(token);
        self
    }

    pub fn exclude_name(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_names.push(pattern.into());
        self
    }

    pub fn preset(mut self, preset: Preset, enabled: bool) -> Self {
        self.exclusions.set_preset(preset, enabled);
        self
    }

    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Depth from free text; see [`parse_depth`].
    pub fn max_depth_str(self, input: &str) -> Self {
        self.max_depth(parse_depth(input))
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn skip_system_dirs(mut self, skip: bool) -> Self {
        self.skip_system_dirs = skip;
        self
    }

    pub fn build(self) -> Result<ScanRequest, RequestError> {
        let query = NameQuery::parse(&self.query)?;

        let mut include = self
            .include
            .iter()
            .filter(|f| !f.trim().is_empty())
            .map(|f| TypeFilter::parse(f))
            .collect::<Result<Vec<_>, _>>()?;
        include.extend(self.kinds.into_iter().map(TypeFilter::Kind));

        let mut exclusions = self.exclusions;
        for pattern in &self.exclude_names {
            exclusions.add_name_pattern(pattern)?;
        }

        Ok(ScanRequest {
            roots: self.roots,
            query,
            include,
            exclusions,
            max_depth: self.max_depth,
            recursive: self.recursive,
            skip_system_dirs: self.skip_system_dirs,
        })
    }
}
