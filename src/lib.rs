//! # Argyle Web
//!
//! Server-rendered website for a small municipality. Content lives in a
//! hosted headless content store; this crate fetches it per request and
//! renders HTML.
//!
//! # Architecture: Fetch, Classify, Render
//!
//! ```text
//! 1. Fetch     ContentStore   →  Page { contentSlots: [raw JSON, ...] }
//! 2. Classify  Slot::from_value  →  Block::{Hero, Gallery, ..., Unknown}
//! 3. Render    render_slots   →  one Markup per slot, in authored order
//! ```
//!
//! Classification never fails: a slot of an unknown kind, or a known kind
//! whose payload cannot be read, becomes [`slot::Block::Unknown`] and renders
//! as a visible diagnostic placeholder. Rendering is a pure function of the
//! fetched data, so blocks are tested by asserting on their HTML.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Page, Business, Announcement, image references, buttons; lenient field decoding |
//! | [`slot`] | Slot schema: closed set of known kinds plus the `Unknown` catch-all |
//! | [`blocks`] | Slot dispatcher and one renderer per block kind |
//! | [`format`] | Phone numbers, category labels, term years, date windows |
//! | [`images`] | Asset reference → CDN URL with size transforms |
//! | [`content`] | `ContentStore` trait, hosted-store HTTP client, file-backed store |
//! | [`pages`] | Page controllers and the shared layout |
//! | [`contact`] | Contact form validation, message composition, mail delivery |
//! | [`serve`] | Routing, request handling, worker pool |
//! | [`config`] | Layered `site.toml` loading, validation, env overrides, CSS variables |
//! | [`output`] | CLI slot inventory for the `check` command |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a build error, interpolation is auto-escaped (authored content is
//! untrusted), and there is no template directory to ship.
//!
//! ## No Cache
//!
//! Every request fetches fresh from the content store. The hosted store's
//! CDN host (`use_cdn = true`) is the only caching layer.
//!
//! ## Interactive State
//!
//! Lightbox, announcement ticker and navigation menu are driven by a small
//! embedded script. Their navigation rules live in Rust as
//! [`blocks::gallery::Lightbox`] and [`blocks::announcements::Ticker`], which
//! the script mirrors.

pub mod blocks;
pub mod config;
pub mod contact;
pub mod content;
pub mod format;
pub mod images;
pub mod output;
pub mod pages;
pub mod serve;
pub mod slot;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
