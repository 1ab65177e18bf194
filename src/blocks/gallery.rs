//! Image grid with a full-screen lightbox.
//!
//! The grid and a hidden lightbox are rendered server-side; `site.js` wires
//! up the interaction. [`Lightbox`] is the navigation state the script
//! mirrors, kept here so the wrap-around rules have a single tested home.

use super::RenderContext;
use crate::types::{ImageRef, lenient};
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryProps {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub images: Vec<GalleryItem>,
}

/// One gallery entry. Authored either as a bare image or as a
/// `galleryImage` wrapper with a nested `image`.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryItem {
    #[serde(default, rename = "_key", deserialize_with = "lenient::text")]
    pub key: Option<String>,
    #[serde(flatten)]
    pub own: ImageRef,
    #[serde(default, deserialize_with = "lenient::option")]
    pub image: Option<ImageRef>,
}

impl GalleryItem {
    /// The nested image when it carries an asset, otherwise the item itself.
    pub fn image(&self) -> &ImageRef {
        match &self.image {
            Some(nested) if nested.asset.is_some() || nested.url.is_some() => nested,
            _ => &self.own,
        }
    }

    pub fn alt(&self) -> &str {
        self.own
            .alt
            .as_deref()
            .or_else(|| self.image.as_ref().and_then(|i| i.alt.as_deref()))
            .unwrap_or("")
    }
}

struct Resolved<'a> {
    item: &'a GalleryItem,
    thumb: String,
    strip: String,
    full: String,
}

pub fn render(props: &GalleryProps, ctx: &RenderContext) -> Markup {
    let resolved: Vec<Resolved> = props
        .images
        .iter()
        .filter_map(|item| {
            let image = item.image();
            Some(Resolved {
                item,
                thumb: ctx.images.sized(image, 800, 800)?,
                strip: ctx.images.sized(image, 160, 160)?,
                full: ctx.images.sized(image, 1600, 900)?,
            })
        })
        .collect();

    if resolved.is_empty() {
        return html! {};
    }

    html! {
        section.gallery data-count=(resolved.len()) {
            @if let Some(title) = &props.title {
                h2.gallery-title { (title) }
            }
            div.gallery-grid {
                @for (i, r) in resolved.iter().enumerate() {
                    button.gallery-thumb type="button" data-index=(i) data-full=(r.full)
                        aria-label={ "Open image " (i + 1) } {
                        img src=(r.thumb) alt=(r.item.alt()) loading="lazy";
                    }
                }
            }
            div.lightbox hidden role="dialog" aria-modal="true" {
                button.lightbox-close type="button" aria-label="Close" { "×" }
                button.lightbox-prev type="button" aria-label="Previous image" { "‹" }
                figure.lightbox-stage {
                    img.lightbox-image src=(resolved[0].full) alt=(resolved[0].item.alt());
                }
                button.lightbox-next type="button" aria-label="Next image" { "›" }
                div.lightbox-strip {
                    @for (i, r) in resolved.iter().enumerate() {
                        button.lightbox-strip-thumb type="button" data-index=(i) {
                            img src=(r.strip) alt=(r.item.alt());
                        }
                    }
                }
            }
        }
    }
}

/// Lightbox navigation over `len` images. Closed until [`Lightbox::open`];
/// navigating a closed lightbox does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lightbox {
    len: usize,
    active: Option<usize>,
}

impl Lightbox {
    pub fn new(len: usize) -> Self {
        Self { len, active: None }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Open at `index`; out of range indexes are ignored.
    pub fn open(&mut self, index: usize) {
        if index < self.len {
            self.active = Some(index);
        }
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn next(&mut self) {
        if let Some(i) = self.active {
            self.active = Some((i + 1) % self.len);
        }
    }

    pub fn prev(&mut self) {
        if let Some(i) = self.active {
            self.active = Some((i + self.len - 1) % self.len);
        }
    }

    /// Jump from the thumbnail strip. Only meaningful while open.
    pub fn select(&mut self, index: usize) {
        if self.is_open() {
            self.open(index);
        }
    }
}
