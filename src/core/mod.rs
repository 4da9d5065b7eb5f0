//! Core module - The heart of FileHound
//!
//! Contains the walker, filters, scan requests, the search engine and the
//! background engine shared with duplicate detection.

pub(crate) mod candidates;
mod engine;
mod filter;
mod page;
mod progress;
mod request;
mod search;
mod walker;

pub use engine::{Engine, ScanHandle, ScanKind, STATUS_CHANNEL_CAPACITY};
pub use filter::{has_wildcard, ExclusionRules, NameQuery, Preset, TypeFilter, WildcardPattern};
pub use page::{ResultPages, DEFAULT_PAGE_SIZE};
pub use progress::{
    CancelToken, ChannelSink, NullSink, ScanContext, ScanEvent, ScanOutcome, ScanReport,
    StatusSink, Stopped,
};
pub use request::{
    normalize_root, parse_depth, ScanRequest, ScanRequestBuilder, SYSTEM_SKIP_TOKENS,
};
pub use search::{search, sort_matches, MatchRecord, Search};
pub use walker::{BoundedWalker, DirVisit};

use serde::{Deserialize, Serialize};

/// Background file-name search engine.
pub type SearchEngine = Engine<Search>;

/// File type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Code,
    Executable,
    Database,
    Other,
}

impl FileType {
    /// Determine file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" | "ico" | "svg" | "tiff" | "tif"
            | "raw" | "cr2" | "nef" | "arw" | "dng" | "heic" | "heif" => FileType::Image,

            "mp4" | "avi" | "mkv" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpeg" | "mpg"
            | "3gp" | "vob" => FileType::Video,

            "mp3" | "flac" | "wav" | "aac" | "ogg" | "m4a" | "wma" | "aiff" | "opus" | "alac" => {
                FileType::Audio
            }

            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "odt" | "ods" | "odp"
            | "txt" | "md" | "rtf" | "csv" | "epub" | "mobi" => FileType::Document,

            "zip" | "tar" | "gz" | "7z" | "rar" | "bz2" | "xz" | "lz" | "lzma" | "cab" | "iso"
            | "dmg" => FileType::Archive,

            "rs" | "py" | "js" | "ts" | "jsx" | "tsx" | "c" | "cpp" | "h" | "hpp" | "java"
            | "go" | "rb" | "php" | "swift" | "kt" | "scala" | "cs" | "fs" | "html" | "css"
            | "scss" | "sass" | "less" | "json" | "yaml" | "yml" | "toml" | "xml" | "sql"
            | "sh" | "bash" | "ps1" | "bat" | "cmd" => FileType::Code,

            "exe" | "dll" | "so" | "dylib" | "app" | "msi" | "deb" | "rpm" | "apk" => {
                FileType::Executable
            }

            "db" | "sqlite" | "sqlite3" | "mdb" | "accdb" => FileType::Database,

            _ => FileType::Other,
        }
    }

    /// Get emoji icon
    pub fn icon(&self) -> &'static str {
        match self {
            FileType::Image => "🖼 ",
            FileType::Video => "🎬",
            FileType::Audio => "🎵",
            FileType::Document => "📄",
            FileType::Archive => "📦",
            FileType::Code => "💻",
            FileType::Executable => "⚡",
            FileType::Database => "🗃 ",
            FileType::Other => "📁",
        }
    }
}
