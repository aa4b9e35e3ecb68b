/*
 * Botdesk - Admin Console for a Discord Bot
 * File Path: src/commands.rs
 * Responsibility: Extract slash-command records from the bot's commands.js
 */

use crate::scanner::{self, Declaration};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Option kind used when a declaration omits `type` (Discord's STRING).
pub const DEFAULT_OPTION_KIND: u32 = 3;

// The closing quote must match the opening one, so `"bot's status"` survives intact.
static NAME_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name:\s*(?:"([^"]+)"|'([^']+)')"#).unwrap());
static DESCRIPTION_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"description:\s*(?:"([^"]+)"|'([^']+)')"#).unwrap());
static TYPE_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"type:\s*(\d+)").unwrap());
static REQUIRED_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"required:\s*(true|false)").unwrap());
static OPTIONS_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"options:\s*\[([^\]]*)\]").unwrap());
static OPTION_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\},\s*\{").unwrap());
static ACTIVE_SET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:(?:export\s+)?(?:const|let|var)\s+)?ALL_COMMANDS\s*=\s*\[([^\]]+)\]")
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub name: String,
    pub description: String,
    pub active: bool,
    pub options: Vec<OptionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: u32,
    pub required: bool,
}

/// Where an identifier stands in the `ALL_COMMANDS` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Active,
    /// Listed, but behind a `//` comment.
    Excluded,
    Absent,
}

impl Activation {
    pub fn is_active(self) -> bool {
        matches!(self, Activation::Active)
    }
}

/// First match of `re`, taking whichever capture group participated.
fn capture_first(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    caps.iter().skip(1).flatten().next().map(|m| m.as_str().to_string())
}

/// Pull `name` and `description` out of one declaration block.
pub fn extract_fields(block: &str) -> Option<(String, String)> {
    let name = capture_first(&NAME_FIELD, block)?;
    let description = capture_first(&DESCRIPTION_FIELD, block)?;
    Some((name, description))
}

/// Parse the `options: [ ... ]` list of a declaration block, if any.
///
/// Entries are split on `}, {` boundaries, so an entry whose own fields nest
/// further objects will be cut in the wrong place.
pub fn extract_options(block: &str) -> Vec<OptionRecord> {
    let Some(caps) = OPTIONS_LIST.captures(block) else {
        return Vec::new();
    };

    OPTION_BOUNDARY
        .split(&caps[1])
        .filter_map(|candidate| {
            let entry = candidate
                .trim()
                .trim_start_matches('{')
                .trim_end_matches('}')
                .trim();
            if entry.is_empty() {
                return None;
            }
            let (name, description) = extract_fields(entry)?;
            let kind = capture_first(&TYPE_FIELD, entry)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_OPTION_KIND);
            let required = capture_first(&REQUIRED_FIELD, entry).is_some_and(|raw| raw == "true");
            Some(OptionRecord { name, description, kind, required })
        })
        .collect()
}

fn lists_identifier(entries: &str, identifier: &str) -> bool {
    entries.split(',').any(|entry| entry.trim() == identifier)
}

/// Decide whether `identifier` is enabled in the `ALL_COMMANDS` list of `full_text`.
///
/// A commented-out occurrence anywhere in the list wins over a live one.
pub fn resolve_activation(full_text: &str, identifier: &str) -> Activation {
    let Some(caps) = ACTIVE_SET.captures(full_text) else {
        return Activation::Absent;
    };
    let span = &caps[1];

    let mut listed = false;
    for line in span.lines() {
        let (code, comment) = match line.find("//") {
            Some(pos) => (&line[..pos], Some(&line[pos + 2..])),
            None => (line, None),
        };
        if let Some(comment) = comment {
            if code.trim().is_empty() && lists_identifier(comment, identifier) {
                return Activation::Excluded;
            }
        }
        if lists_identifier(code, identifier) {
            listed = true;
        }
    }

    if listed { Activation::Active } else { Activation::Absent }
}

pub fn resolve_active(full_text: &str, identifier: &str) -> bool {
    resolve_activation(full_text, identifier).is_active()
}

fn build_record(declaration: &Declaration, full_text: &str) -> Option<CommandRecord> {
    let (name, description) = extract_fields(&declaration.raw_text)?;
    Some(CommandRecord {
        name,
        description,
        active: resolve_active(full_text, &declaration.identifier),
        options: extract_options(&declaration.raw_text),
    })
}

/// Extract every recognizable command from a commands.js source text.
///
/// Never fails: blocks without `name` and `description` are skipped.
pub fn extract_all_commands(text: &str) -> Vec<CommandRecord> {
    scanner::locate_declarations(text)
        .iter()
        .filter_map(|declaration| {
            let record = build_record(declaration, text);
            if record.is_none() {
                tracing::debug!(identifier = %declaration.identifier, "skipping declaration without name/description");
            }
            record
        })
        .collect()
}

/// Read the commands file at `path` and extract its commands.
pub fn load_commands<P: AsRef<Path>>(path: P) -> Result<Vec<CommandRecord>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read commands file at {:?}", path.as_ref()))?;
    let commands = extract_all_commands(&content);
    tracing::info!(count = commands.len(), path = %path.as_ref().display(), "extracted commands");
    Ok(commands)
}
