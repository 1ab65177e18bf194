//! Slot rendering.
//!
//! [`render_slots`] maps a page's slot list to one [`Markup`] per slot, in
//! input order. Each known kind is handed to its renderer module; anything
//! else becomes a diagnostic placeholder naming the kind and dumping the raw
//! payload, so content authors can see what the site failed to understand
//! without the rest of the page being affected.
//!
//! Renderers are pure functions of their props and the [`RenderContext`]:
//! no I/O, no shared state, no failure modes. Missing optional fields drop
//! the element they would have produced.
//!
//! | Module | Slot kind |
//! |--------|-----------|
//! | [`hero`] | `hero` |
//! | [`gallery`] | `gallery` |
//! | [`text_block`] (+ [`portable_text`]) | `textBlock` |
//! | [`quick_links`] | `quickLinksGrid` |
//! | [`municipal_group`] | `municipalGroup` |
//! | [`google_map`] | `googleMap` |
//!
//! [`business`] and [`announcements`] render documents that are not slots
//! (directory entries and the notice ticker) but follow the same rules.

pub mod announcements;
pub mod business;
pub mod gallery;
pub mod google_map;
pub mod hero;
pub mod municipal_group;
pub mod portable_text;
pub mod quick_links;
pub mod text_block;

use crate::images::ImageUrlBuilder;
use crate::slot::{Block, Slot, UnknownSlot};
use crate::types::{Align, Cta};
use chrono::{DateTime, Utc};
use maud::{Markup, html};

/// Per-request inputs shared by every renderer.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub images: &'a ImageUrlBuilder,
    /// The home page switches the hero into its decorated mode.
    pub is_home: bool,
    /// Reference time for date-windowed content (notices).
    pub now: DateTime<Utc>,
}

/// Render each slot independently, preserving order. Empty in, empty out.
pub fn render_slots(slots: &[Slot], ctx: &RenderContext) -> Vec<Markup> {
    slots.iter().map(|slot| render_slot(slot, ctx)).collect()
}

pub fn render_slot(slot: &Slot, ctx: &RenderContext) -> Markup {
    match &slot.block {
        Block::Hero(props) => hero::render(props, ctx),
        Block::Gallery(props) => gallery::render(props, ctx),
        Block::TextBlock(props) => text_block::render(props, ctx),
        Block::QuickLinksGrid(props) => quick_links::render(props),
        Block::MunicipalGroup(props) => municipal_group::render(props, ctx),
        Block::GoogleMap(props) => google_map::render(props),
        Block::Unknown(unknown) => unknown_slot(unknown),
    }
}

/// The page body: every slot wrapped with its kind and key. Renders nothing
/// for an empty slot list.
pub fn slot_section(slots: &[Slot], ctx: &RenderContext) -> Markup {
    let rendered = render_slots(slots, ctx);
    html! {
        @if !rendered.is_empty() {
            section.content-slots {
                @for (slot, markup) in slots.iter().zip(rendered) {
                    div.slot data-kind=(slot.kind()) data-key=[slot.key.as_deref()] {
                        (markup)
                    }
                }
            }
        }
    }
}

/// Diagnostic placeholder for slots no renderer accepted.
fn unknown_slot(unknown: &UnknownSlot) -> Markup {
    let kind = unknown.kind.as_deref().unwrap_or("(none)");
    log::warn!("rendering placeholder for unknown slot type {kind:?}");
    let payload =
        serde_json::to_string_pretty(&unknown.raw).unwrap_or_else(|_| unknown.raw.to_string());

    html! {
        div.slot-unknown role="note" {
            p.slot-unknown-label { "Unknown component type: " (kind) }
            @if let Some(error) = &unknown.error {
                p.slot-unknown-error { "Could not read slot: " (error) }
            }
            pre.slot-unknown-payload { (payload) }
        }
    }
}

/// A row of call-to-action buttons; nothing when the list is empty.
pub(crate) fn cta_row(ctas: &[Cta], justify: Align) -> Markup {
    html! {
        @if !ctas.is_empty() {
            div class={ "cta-row justify-" (justify.as_str()) } {
                @for cta in ctas {
                    a class={ "btn btn-" (cta.variant.as_str()) " btn-size-" (cta.size.as_str()) }
                        href=(cta.href) { (cta.text) }
                }
            }
        }
    }
}

/// Inline style or class for an authored background color: `#hex` values
/// become a style, `bg-*` design tokens become a class, anything else is
/// ignored.
pub(crate) fn color_background(color: &str) -> (Option<String>, Option<&str>) {
    if color.starts_with('#') {
        (Some(format!("background-color: {color};")), None)
    } else if color.starts_with("bg-") {
        (None, Some(color))
    } else {
        (None, None)
    }
}
