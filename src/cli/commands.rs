//! Command handlers - run an engine in the background and present its results

use anyhow::{Context, Result};
use colored::Colorize;

use super::{ConfigAction, ConfigArgs, DupesArgs, ScanArgs, SearchArgs};
use crate::actions::{DryRunDeleter, FileDeleter, FsDeleter};
use crate::config::Config;
use crate::core::{
    parse_depth, Engine, MatchRecord, Preset, ScanKind, ScanReport, ScanRequest,
    ScanRequestBuilder, Search, SearchEngine,
};
use crate::dedup::{DuplicateEngine, DuplicateGroup, Duplicates};
use crate::spinner::{
    format_duration, format_size, print_header, print_info, print_kv, print_subheader, ScanSpinner,
    StatusIcons,
};

/// Apply config defaults, then command-line overrides, to a request builder.
pub fn apply_scan_args(
    mut builder: ScanRequestBuilder,
    args: &ScanArgs,
    config: &Config,
) -> ScanRequestBuilder {
    builder = builder
        .exclusions(config.exclusion_rules())
        .recursive(config.scan.recursive && !args.no_recursive);

    builder = match &args.depth {
        Some(depth) => builder.max_depth(parse_depth(depth)),
        None => builder.max_depth(config.max_depth()),
    };

    if args.no_git {
        builder = builder.preset(Preset::Git, false);
    }
    if args.no_node_modules {
        builder = builder.preset(Preset::NodeModules, false);
    }
    for token in &args.exclude_folders {
        builder = builder.exclude_folder(token);
    }
    for pattern in &args.exclude_names {
        builder = builder.exclude_name(pattern.as_str());
    }
    builder
}

/// Build the search request for `args`.
pub fn search_request(engine: &SearchEngine, args: &SearchArgs, config: &Config) -> Result<ScanRequest> {
    for root in &args.roots {
        engine.add_root(root.clone());
    }
    let mut builder = engine.request().query(args.query.as_str());
    for filter in &args.types {
        builder = builder.include_type(filter.as_str());
    }
    for kind in &args.kind {
        builder = builder.include_kind((*kind).into());
    }
    apply_scan_args(builder, &args.scan, config)
        .build()
        .context("Invalid search")
}

/// Build the duplicate-scan request for `args`.
pub fn dupes_request(engine: &DuplicateEngine, args: &DupesArgs, config: &Config) -> Result<ScanRequest> {
    for root in &args.roots {
        engine.add_root(root.clone());
    }
    let mut builder = engine
        .request()
        .skip_system_dirs(config.scan.skip_system_dirs && !args.include_system);
    if let Some(name) = &args.name {
        builder = builder.query(name.as_str());
    }
    apply_scan_args(builder, &args.scan, config)
        .build()
        .context("Invalid duplicate scan")
}

fn page_size(args: &ScanArgs, config: &Config) -> usize {
    args.page_size.unwrap_or(config.scan.page_size).max(1)
}

/// Start `request` on `engine` and block until it reports, mirroring status
/// updates on a spinner.
fn run_engine<K: ScanKind>(
    engine: &Engine<K>,
    request: ScanRequest,
    title: &str,
    quiet: bool,
) -> Result<ScanReport<K::Item>> {
    let spinner = if quiet {
        ScanSpinner::hidden()
    } else {
        ScanSpinner::new(title)
    };

    let handle = engine.start(request)?;
    let report = handle.wait_with(|status| spinner.set_message(status));

    let line = format!("{} ({})", report.summary, format_duration(report.elapsed));
    if report.outcome.is_stopped() {
        spinner.warn(&line);
    } else {
        spinner.success(&line);
    }
    Ok(report)
}

/// `filehound search`
pub fn run_search(args: &SearchArgs, config: &Config) -> Result<()> {
    let engine = SearchEngine::new(Search);
    let request = search_request(&engine, args, config)?;

    if !args.scan.json {
        print_header(&format!("{} FileHound Search", StatusIcons::SCAN));
        print_kv("Query", &args.query);
        print_request(&request);
    }

    let report = run_engine(&engine, request, "Searching...", args.scan.json)?;
    let Some(records) = report.outcome.into_results() else {
        return Ok(());
    };

    if args.scan.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if args.scan.interactive {
        super::interactive::browse_matches(records, page_size(&args.scan, config))?;
    } else {
        print_matches(&records);
    }
    Ok(())
}

/// `filehound dupes`
pub fn run_dupes(args: &DupesArgs, config: &Config) -> Result<()> {
    let workers = args.workers.unwrap_or(config.scan.hash_workers);
    let engine = DuplicateEngine::new(Duplicates::with_workers(workers));
    let request = dupes_request(&engine, args, config)?;

    if !args.scan.json {
        print_header(&format!("{} FileHound Duplicates", StatusIcons::DUPES));
        print_request(&request);
        print_kv(
            "Hash workers",
            &if workers == 0 {
                "auto".to_string()
            } else {
                workers.to_string()
            },
        );
    }

    let report = run_engine(&engine, request, "Indexing...", args.scan.json)?;
    let Some(groups) = report.outcome.into_results() else {
        return Ok(());
    };

    if args.scan.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else if args.scan.interactive {
        let deleter: &dyn FileDeleter = if args.dry_run {
            &DryRunDeleter
        } else {
            &FsDeleter
        };
        super::interactive::browse_duplicates(groups, page_size(&args.scan, config), deleter)?;
    } else {
        print_groups(&groups);
    }
    Ok(())
}

/// `filehound config`
pub fn run_config(args: &ConfigArgs, config: &Config) -> Result<()> {
    let path = Config::default_path();
    match args.action {
        ConfigAction::Init => {
            if Config::init_at(&path)? {
                println!("{} Created {}", StatusIcons::SUCCESS.green(), path.display());
            } else {
                print_info(&format!("Config already exists at {}", path.display()));
            }
        }
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_request(request: &ScanRequest) {
    let roots: Vec<String> = request
        .roots()
        .iter()
        .map(|r| r.display().to_string())
        .collect();
    print_kv("Folders", &roots.join(", "));

    let depth = match request.effective_depth() {
        Some(d) => d.to_string(),
        None => "unlimited".to_string(),
    };
    print_kv("Depth", &depth);

    if !request.exclusions().is_empty() {
        print_kv("Excluding", &request.exclusions().summary());
    }
    println!();
}

/// One search result row.
pub fn format_match(record: &MatchRecord) -> String {
    let size = match record.size {
        Some(bytes) => format_size(bytes),
        None => "?".to_string(),
    };
    format!(
        "{} {}  {}  {}",
        record.file_type.icon(),
        record.name.bright_white(),
        size.bright_black(),
        record.folder.display().to_string().bright_black()
    )
}

fn print_matches(records: &[MatchRecord]) {
    for record in records {
        println!("  {}", format_match(record));
    }
}

fn print_groups(groups: &[DuplicateGroup]) {
    let wasted: u64 = groups.iter().map(DuplicateGroup::wasted_bytes).sum();

    for group in groups {
        print_subheader(&format!("{} · {}", group.label(), format_size(group.size)));
        for path in &group.paths {
            println!("  {}", path.display());
        }
    }

    if !groups.is_empty() {
        println!();
        print_kv("Reclaimable", &format_size(wasted));
    }
}
