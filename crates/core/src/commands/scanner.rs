//! Read-mostly registry commands: unhide, search and listing

use std::collections::BTreeMap;
use std::fmt::Write;

use super::{CommandArgs, CommandError, ConsoleOutput, CVAR_UNHIDE_ALL, FIND_ALL};
use crate::registry::{
    flags_description, flags_summary, CvarFlags, CvarRegistry, EntryKind, RegistryEntry,
};

/// Default width of the name column in `cvarlist_all`
pub const LIST_NAME_WIDTH: usize = 41;

/// Remove the hidden and development-only flags from every entry
///
/// Returns how many entries had at least one of them set.
pub fn unhide_all(registry: &mut CvarRegistry, out: &mut dyn ConsoleOutput) -> usize {
    let mut unhidden = 0;

    for entry in registry.iter_mut() {
        if entry.is_flag_set(CvarFlags::HIDDEN_MASK) {
            entry.remove_flags(CvarFlags::HIDDEN_MASK);
            unhidden += 1;
        }
    }

    tracing::debug!("{}: unhid {} entries", CVAR_UNHIDE_ALL, unhidden);
    out.msg(&format!(
        "{}: Removed FCVAR_DEVELOPMENTONLY and FCVAR_HIDDEN from {} ConVars",
        CVAR_UNHIDE_ALL, unhidden
    ));
    unhidden
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Entries whose name or help text contains `needle`, ignoring case, sorted by name
pub fn find_matches<'a>(registry: &'a CvarRegistry, needle: &str) -> Vec<&'a RegistryEntry> {
    let needle = needle.to_lowercase();
    let mut matches: Vec<_> = registry
        .iter()
        .filter(|e| {
            contains_ignore_case(e.name(), &needle) || contains_ignore_case(e.help(), &needle)
        })
        .collect();
    matches.sort_by(|a, b| a.name().cmp(b.name()));
    matches
}

/// Full console description of an entry, one string per line
pub fn describe(entry: &RegistryEntry) -> Vec<String> {
    let mut line = match entry.kind() {
        EntryKind::Variable(var) => {
            let mut line = format!(
                "\"{}\" = \"{}\" ( def. \"{}\" )",
                entry.name(),
                var.string_value(),
                var.default_value()
            );
            if let Some(min) = var.min() {
                let _ = write!(line, " min. {:.6}", min);
            }
            if let Some(max) = var.max() {
                let _ = write!(line, " max. {:.6}", max);
            }
            line
        }
        EntryKind::Command(_) => format!("\"{}\"", entry.name()),
    };

    let flags = flags_description(entry.flags());
    if !flags.is_empty() {
        line.push(' ');
        line.push_str(&flags);
    }

    let mut lines = vec![line];
    if !entry.help().is_empty() {
        lines.push(format!(" - {}", single_line(entry.help())));
    }
    lines
}

/// Search every entry, hidden ones included, and print matches
pub fn find_all(
    registry: &CvarRegistry,
    args: &CommandArgs,
    out: &mut dyn ConsoleOutput,
) -> Result<usize, CommandError> {
    if args.arg_count() != 2 {
        return Err(CommandError::usage(FIND_ALL, "<search>"));
    }

    let matches = find_matches(registry, args.arg(1));
    for entry in &matches {
        for line in describe(entry) {
            out.msg(&line);
        }
    }
    Ok(matches.len())
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// One row of the listing table
pub fn format_row(entry: &RegistryEntry, name_width: usize) -> String {
    format!(
        "{:<name_width$} | {:<8} | {:<16} | {}",
        entry.name(),
        entry.value_string().unwrap_or("cmd"),
        flags_summary(entry.flags()),
        single_line(entry.help()),
    )
}

/// Entries keyed by name, optionally only the hidden ones
pub fn collect_sorted(
    registry: &CvarRegistry,
    hidden_only: bool,
) -> BTreeMap<&str, &RegistryEntry> {
    registry
        .iter()
        .filter(|e| !hidden_only || e.flags().is_hidden())
        .map(|e| (e.name(), e))
        .collect()
}

/// Print every entry as a table sorted by name
///
/// Passing `hidden` as any argument restricts the listing to hidden and
/// development-only entries. Returns the number of rows printed.
pub fn list_all(
    registry: &CvarRegistry,
    args: &CommandArgs,
    name_width: usize,
    out: &mut dyn ConsoleOutput,
) -> usize {
    let entries = collect_sorted(registry, args.find_arg("hidden"));

    out.msg("Name | Value | Flags | Description");
    out.msg("---- | ----- | ----- | -----------");
    for entry in entries.values() {
        out.msg(&format_row(entry, name_width));
    }

    entries.len()
}
