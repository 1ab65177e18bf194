//! Shared test utilities.
//!
//! Fixture builders for the rendering tests: a fixed clock, an image URL
//! builder, render contexts, and small constructors for slots, buttons and
//! directory entries.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let images = images();
//! let out = render_slots(&slots(json!([{"_type": "hero"}])), &ctx(&images));
//! ```

use crate::blocks::RenderContext;
use crate::images::ImageUrlBuilder;
use crate::slot::Slot;
use crate::types::{Business, Cta};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// 2026-10-14 12:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
}

pub fn images() -> ImageUrlBuilder {
    ImageUrlBuilder::new("proj", "production")
}

/// Inner-page context at [`fixed_now`].
pub fn ctx(images: &ImageUrlBuilder) -> RenderContext<'_> {
    RenderContext {
        images,
        is_home: false,
        now: fixed_now(),
    }
}

pub fn home_ctx(images: &ImageUrlBuilder) -> RenderContext<'_> {
    RenderContext {
        is_home: true,
        ..ctx(images)
    }
}

/// Classify each element of a JSON array as a slot.
pub fn slots(value: Value) -> Vec<Slot> {
    match value {
        Value::Array(items) => items.into_iter().map(Slot::from_value).collect(),
        other => panic!("expected a JSON array of slots, got {other}"),
    }
}

pub fn cta(text: &str, href: &str) -> Cta {
    Cta {
        text: text.into(),
        href: href.into(),
        variant: Default::default(),
        size: Default::default(),
    }
}

pub fn business(name: &str, slug: &str, featured: bool) -> Business {
    Business {
        name: name.into(),
        slug: Some(slug.into()),
        featured,
        ..Default::default()
    }
}
