//! CLI module - Command line interface definitions and handlers

pub mod commands;
pub mod interactive;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::FileType;

/// FileHound - Folder search and duplicate finder
///
/// Searches chosen folders by file name and finds files with identical
/// content. Deletion only happens on explicit confirmation in interactive
/// mode.
#[derive(Parser, Debug)]
#[command(name = "filehound")]
#[command(version)]
#[command(about = "🔍 Folder search and content-hash duplicate finder", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find files whose names match a query
    Search(SearchArgs),

    /// Find files with identical content
    Dupes(DupesArgs),

    /// Inspect or create the config file
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct SearchArgs {
    /// Name query: substring, or wildcard with * and ? (e.g. "*.pdf")
    #[arg(required = true)]
    pub query: String,

    /// Folders to search
    #[arg(required = true, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Include only these types: extensions or wildcards (e.g. pdf,.docx,*.tar.gz)
    #[arg(long = "type", short = 't', value_delimiter = ',')]
    pub types: Vec<String>,

    /// Include only these file categories
    #[arg(long, value_enum, value_delimiter = ',')]
    pub kind: Vec<KindArg>,

    #[command(flatten)]
    pub scan: ScanArgs,
}

#[derive(Debug, Clone, Parser)]
pub struct DupesArgs {
    /// Folders to scan
    #[arg(required = true, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Only consider files whose names match this query
    #[arg(long)]
    pub name: Option<String>,

    /// Hashing threads (0 = one per CPU, 1 = sequential)
    #[arg(long, short)]
    pub workers: Option<usize>,

    /// Also scan OS system folders (Program Files, AppData, ...)
    #[arg(long)]
    pub include_system: bool,

    /// In interactive mode, report deletions without removing anything
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub scan: ScanArgs,
}

/// Options shared by every scan.
#[derive(Debug, Clone, Default, Args)]
pub struct ScanArgs {
    /// Skip folders whose path contains this text
    #[arg(long = "exclude", short = 'x')]
    pub exclude_folders: Vec<String>,

    /// Skip files whose names match this wildcard (e.g. "*.tmp")
    #[arg(long = "exclude-name", short = 'n')]
    pub exclude_names: Vec<String>,

    /// Do not skip .git folders
    #[arg(long)]
    pub no_git: bool,

    /// Do not skip node_modules folders
    #[arg(long)]
    pub no_node_modules: bool,

    /// Maximum folder depth below each root (empty or invalid = unlimited)
    #[arg(long, short = 'd')]
    pub depth: Option<String>,

    /// Only look at files directly inside each root
    #[arg(long)]
    pub no_recursive: bool,

    /// Results revealed per "show more"
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Print results as JSON
    #[arg(long, conflicts_with = "interactive")]
    pub json: bool,

    /// Browse results interactively (open files, delete duplicates)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Images (jpg, png, gif, webp, etc.)
    Image,
    /// Videos (mp4, avi, mkv, etc.)
    Video,
    /// Audio (mp3, flac, wav, etc.)
    Audio,
    /// Documents (pdf, doc, txt, etc.)
    Document,
    /// Archives (zip, tar, 7z, etc.)
    Archive,
    /// Code files (rs, py, js, etc.)
    Code,
    /// Executables (exe, dll, so, etc.)
    Executable,
    /// Databases (db, sqlite, etc.)
    Database,
}

impl From<KindArg> for FileType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Image => FileType::Image,
            KindArg::Video => FileType::Video,
            KindArg::Audio => FileType::Audio,
            KindArg::Document => FileType::Document,
            KindArg::Archive => FileType::Archive,
            KindArg::Code => FileType::Code,
            KindArg::Executable => FileType::Executable,
            KindArg::Database => FileType::Database,
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Write a commented sample config if none exists
    Init,
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "filehound", "search", "*.pdf", "/a", "/b", "-t", "pdf,.docx", "--kind", "image",
            "-x", "target", "-d", "2", "--no-git",
        ])
        .unwrap();

        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "*.pdf");
                assert_eq!(args.roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
                assert_eq!(args.types, vec!["pdf", ".docx"]);
                assert_eq!(args.kind, vec![KindArg::Image]);
                assert_eq!(args.scan.exclude_folders, vec!["target"]);
                assert_eq!(args.scan.depth.as_deref(), Some("2"));
                assert!(args.scan.no_git);
                assert!(!args.scan.no_node_modules);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_dupes() {
        let cli = Cli::try_parse_from(["filehound", "dupes", "/data", "-w", "4", "--json"]).unwrap();
        match cli.command {
            Commands::Dupes(args) => {
                assert_eq!(args.workers, Some(4));
                assert!(args.scan.json);
                assert!(args.name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_type_filters_are_search_only() {
        assert!(Cli::try_parse_from(["filehound", "dupes", "/data", "-t", "pdf"]).is_err());
        assert!(Cli::try_parse_from(["filehound", "dupes", "/data", "--kind", "image"]).is_err());
    }

    #[test]
    fn test_search_requires_root() {
        assert!(Cli::try_parse_from(["filehound", "search", "report"]).is_err());
    }
}
