//! CLI output formatting for the `check` command.
//!
//! Output is a content inventory: the page's identity first, then one entry
//! per slot in render order. Every slot follows the same two-level pattern:
//!
//! 1. **Header line**: positional index, kind, and `[key]` when present
//! 2. **Context lines**: indented one-line summaries of what the slot holds
//!
//! ```text
//! Page Welcome to Argyle (Homepage)
//!     Heading: City of Argyle
//!     Description: Argyle, Minnesota - putting the home in...
//!
//! Slots
//! 001 hero [h1]
//!     Heading: Welcome
//! 002 gallery [g1]
//!     Images: 4
//! 003 mysteryWidget [m1] (unknown)
//!     Payload: {"_key":"m1","_type":"mysteryWidget","foo":1}
//!
//! 3 slots, 1 unknown
//! ```
//!
//! Each `format_*` function returns `Vec<String>` for testability and has a
//! `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::blocks::municipal_group::visible_members;
use crate::slot::{Block, Slot};
use crate::types::Page;

const SUMMARY_MAX: usize = 60;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Slot header: index, kind, key, and an unknown marker.
///
/// ```text
/// 001 hero [h1]
/// 002 (no kind) (unknown)
/// ```
fn slot_header(index: usize, slot: &Slot) -> String {
    let kind = match slot.kind() {
        "" => "(no kind)",
        k => k,
    };
    let mut line = format!("{} {}", format_index(index), kind);
    if let Some(key) = &slot.key {
        line.push_str(&format!(" [{key}]"));
    }
    if slot.is_unknown() {
        line.push_str(" (unknown)");
    }
    line
}

fn slot_details(slot: &Slot) -> Vec<(&'static str, String)> {
    let mut details = Vec::new();
    match &slot.block {
        Block::Hero(p) => {
            if let Some(h) = &p.heading {
                details.push(("Heading", h.clone()));
            }
            if !p.ctas.is_empty() {
                details.push(("Buttons", p.ctas.len().to_string()));
            }
        }
        Block::Gallery(p) => {
            if let Some(t) = &p.title {
                details.push(("Title", t.clone()));
            }
            details.push(("Images", p.images.len().to_string()));
        }
        Block::TextBlock(p) => {
            if let Some(h) = p.heading() {
                details.push(("Heading", h.to_string()));
            }
            details.push(("Layout", p.layout.as_str().to_string()));
        }
        Block::QuickLinksGrid(p) => {
            if let Some(t) = &p.title {
                details.push(("Title", t.clone()));
            }
            details.push(("Links", p.links.len().to_string()));
        }
        Block::MunicipalGroup(p) => {
            if let Some(t) = &p.title {
                details.push(("Title", t.clone()));
            }
            details.push((
                "Members",
                format!(
                    "{} active of {}",
                    visible_members(&p.members).len(),
                    p.members.len()
                ),
            ));
        }
        Block::GoogleMap(p) => {
            details.push(("Address", p.address.clone()));
        }
        Block::Unknown(u) => {
            if let Some(err) = &u.error {
                details.push(("Error", err.clone()));
            }
            details.push(("Payload", u.raw.to_string()));
        }
    }
    details
}

/// Inventory of one page and its slots.
pub fn format_page_inventory(page: &Page) -> Vec<String> {
    let mut lines = Vec::new();

    let title = page.title.as_deref().unwrap_or("(untitled)");
    match &page.slug {
        Some(slug) => lines.push(format!("Page {title} ({slug})")),
        None => lines.push(format!("Page {title}")),
    }
    if let Some(heading) = &page.heading {
        lines.push(format!("{}Heading: {}", indent(1), heading));
    }
    if let Some(desc) = &page.description {
        lines.push(format!(
            "{}Description: {}",
            indent(1),
            truncate_desc(desc, SUMMARY_MAX)
        ));
    }

    lines.push(String::new());
    if page.content_slots.is_empty() {
        lines.push("No slots".to_string());
        return lines;
    }

    lines.push("Slots".to_string());
    for (i, slot) in page.content_slots.iter().enumerate() {
        lines.push(slot_header(i + 1, slot));
        for (label, value) in slot_details(slot) {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                label,
                truncate_desc(&value, SUMMARY_MAX)
            ));
        }
    }

    let unknown = page.content_slots.iter().filter(|s| s.is_unknown()).count();
    let total = page.content_slots.len();
    lines.push(String::new());
    lines.push(format!(
        "{} slot{}, {} unknown",
        total,
        if total == 1 { "" } else { "s" },
        unknown
    ));
    lines
}

pub fn print_page_inventory(page: &Page) {
    for line in format_page_inventory(page) {
        println!("{}", line);
    }
}
