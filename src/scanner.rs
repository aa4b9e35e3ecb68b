/*
 * Botdesk - Admin Console for a Discord Bot
 * File Path: src/scanner.rs
 * Responsibility: Locate `*_COMMAND = { ... }` declarations by brace-depth counting
 */

//! Declaration locator.
//!
//! This is a line-oriented heuristic, not a JavaScript parser. A declaration
//! starts on a line like `const TEST_COMMAND = {` and ends on the line where
//! the brace depth returns to zero. Braces inside string literals are counted
//! like any other brace, so a description containing `{` or `}` will skew the
//! depth for that block.

use once_cell::sync::Lazy;
use regex::Regex;

static DECLARATION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?://\s*)?(?:export\s+)?(?:const|let|var)\s+(\w+_COMMAND)\s*=\s*\{").unwrap()
});

/// One raw command declaration as it appears in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub identifier: String,
    pub raw_text: String,
}

enum ScanState {
    Idle,
    Inside {
        identifier: String,
        raw_text: String,
        depth: i64,
    },
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Scan `text` and return every balanced declaration in source order.
///
/// Declarations still open at end of input are dropped. The starting depth is
/// the brace balance of the start line itself rather than a flat 1, so a
/// one-line `const X_COMMAND = { ... };` closes on the line it opens.
pub fn locate_declarations(text: &str) -> Vec<Declaration> {
    let mut found = Vec::new();

    let last = text.lines().fold(ScanState::Idle, |state, line| match state {
        ScanState::Idle => match DECLARATION_START.captures(line) {
            Some(caps) => {
                let identifier = caps[1].to_string();
                let mut raw_text = String::from(line);
                raw_text.push('\n');
                let depth = brace_delta(line);
                if depth <= 0 {
                    found.push(Declaration { identifier, raw_text });
                    ScanState::Idle
                } else {
                    ScanState::Inside { identifier, raw_text, depth }
                }
            }
            None => ScanState::Idle,
        },
        ScanState::Inside { identifier, mut raw_text, depth } => {
            raw_text.push_str(line);
            raw_text.push('\n');
            let depth = depth + brace_delta(line);
            if depth <= 0 {
                found.push(Declaration { identifier, raw_text });
                ScanState::Idle
            } else {
                ScanState::Inside { identifier, raw_text, depth }
            }
        }
    });

    if let ScanState::Inside { identifier, depth, .. } = last {
        tracing::debug!(%identifier, depth, "dropping unterminated declaration");
    }

    found
}
