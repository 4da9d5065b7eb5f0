//! Interactive Mode - page through results, open files, delete duplicates
//!
//! Results are revealed a page at a time; "Show more" reveals the next page
//! without re-running the scan.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect, Select};

use super::commands::format_match;
use crate::actions::{open_containing_folder, open_with_default, FileDeleter};
use crate::core::{MatchRecord, ResultPages};
use crate::dedup::{DuplicateGroup, DuplicateSet, MemberRemoval};
use crate::spinner::{format_size, print_error, print_info, print_success, print_warning};

/// One row of a browse menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Item(usize),
    ShowMore,
    Quit,
}

/// Menu rows for the rendered items plus the trailing controls.
fn menu(labels: Vec<String>, remaining: usize) -> (Vec<String>, Vec<Pick>) {
    let mut rows = Vec::with_capacity(labels.len() + 2);
    let mut picks = Vec::with_capacity(labels.len() + 2);

    for (i, label) in labels.into_iter().enumerate() {
        rows.push(label);
        picks.push(Pick::Item(i));
    }
    if remaining > 0 {
        rows.push(format!("{} Show more ({} remaining)", "▼".bright_cyan(), remaining));
        picks.push(Pick::ShowMore);
    }
    rows.push(format!("{} Done", "✗".bright_red()));
    picks.push(Pick::Quit);

    (rows, picks)
}

fn choose(prompt: &str, rows: &[String], picks: &[Pick]) -> Result<Pick> {
    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(rows)
        .default(0)
        .interact_on_opt(&Term::stderr())?;

    Ok(selection
        .and_then(|i| picks.get(i).copied())
        .unwrap_or(Pick::Quit))
}

/// Browse search results.
pub fn browse_matches(records: Vec<MatchRecord>, page_size: usize) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut pages = ResultPages::new(records, page_size);
    pages.next_page();

    loop {
        let labels = pages.rendered().iter().map(format_match).collect();
        let (rows, picks) = menu(labels, pages.remaining());

        match choose("Select a file", &rows, &picks)? {
            Pick::Item(i) => {
                if let Some(record) = pages.get(i) {
                    file_actions(&record.path)?;
                }
            }
            Pick::ShowMore => {
                pages.next_page();
            }
            Pick::Quit => break,
        }
    }
    Ok(())
}

fn file_actions(path: &Path) -> Result<()> {
    let actions = ["Open file", "Open containing folder", "Back"];
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(path.display().to_string())
        .items(&actions)
        .default(0)
        .interact_on_opt(&Term::stderr())?;

    let result = match choice {
        Some(0) => open_with_default(path),
        Some(1) => open_containing_folder(path),
        _ => return Ok(()),
    };
    if let Err(e) = result {
        print_error(&e.to_string());
    }
    Ok(())
}

/// Browse duplicate groups, with deletion of individual members.
pub fn browse_duplicates(
    groups: Vec<DuplicateGroup>,
    page_size: usize,
    deleter: &dyn FileDeleter,
) -> Result<()> {
    if groups.is_empty() {
        return Ok(());
    }

    let mut set = DuplicateSet::new(groups, page_size);
    set.pages_mut().next_page();

    loop {
        if set.is_empty() {
            print_info("No duplicate sets left.");
            break;
        }

        let labels = set
            .pages()
            .rendered()
            .iter()
            .map(|g| format!("{}  {}", g.label(), format_size(g.size).bright_black()))
            .collect();
        let (rows, picks) = menu(labels, set.pages().remaining());

        match choose("Select a duplicate set", &rows, &picks)? {
            Pick::Item(i) => {
                if let Some(group) = set.pages().get(i).cloned() {
                    browse_group(&mut set, group, deleter)?;
                }
            }
            Pick::ShowMore => {
                set.pages_mut().next_page();
            }
            Pick::Quit => break,
        }
    }

    if set.is_empty() {
        return Ok(());
    }
    println!(
        "\n{} {} set(s) remain, {} reclaimable",
        "ℹ".cyan(),
        set.len(),
        format_size(set.wasted_bytes())
    );
    Ok(())
}

fn browse_group(
    set: &mut DuplicateSet,
    group: DuplicateGroup,
    deleter: &dyn FileDeleter,
) -> Result<()> {
    let hash = group.hash;
    let mut members: Vec<PathBuf> = group.paths;

    loop {
        let labels = members.iter().map(|p| p.display().to_string()).collect();
        let (rows, picks) = menu(labels, 0);

        let path = match choose(&format!("{} copies", members.len()), &rows, &picks)? {
            Pick::Item(i) => match members.get(i) {
                Some(path) => path.clone(),
                None => continue,
            },
            Pick::ShowMore | Pick::Quit => return Ok(()),
        };

        let actions = ["Open file", "Open containing folder", "Delete", "Back"];
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(path.display().to_string())
            .items(&actions)
            .default(0)
            .interact_on_opt(&Term::stderr())?;

        match choice {
            Some(0) => {
                if let Err(e) = open_with_default(&path) {
                    print_error(&e.to_string());
                }
            }
            Some(1) => {
                if let Err(e) = open_containing_folder(&path) {
                    print_error(&e.to_string());
                }
            }
            Some(2) => {
                let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("Permanently delete {}?", path.display()))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    continue;
                }

                match set.delete_member(&hash, &path, deleter) {
                    Ok(MemberRemoval::Removed { remaining }) => {
                        print_success(&format!("Deleted. {} copies left.", remaining));
                        members.retain(|p| p != &path);
                    }
                    Ok(MemberRemoval::GroupDissolved) => {
                        print_success("Deleted. Set no longer has duplicates.");
                        return Ok(());
                    }
                    Err(e) => print_warning(&e.to_string()),
                }
            }
            _ => {}
        }
    }
}
