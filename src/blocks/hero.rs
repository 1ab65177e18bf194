//! Full-width banner with one background and an optional text overlay.

use super::{RenderContext, color_background, cta_row};
use crate::types::{Align, Cta, ImageRef, lenient};
use maud::{Markup, html};
use serde::Deserialize;

const DEFAULT_BACKGROUND_COLOR: &str = "#111827";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Image,
    Video,
    Color,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroProps {
    #[serde(default, deserialize_with = "lenient::text")]
    pub heading: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subheading: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub background_type: BackgroundType,
    #[serde(default, deserialize_with = "lenient::option")]
    pub background_image: Option<ImageRef>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub background_video_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub ctas: Vec<Cta>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub align: Option<Align>,
}

impl HeroProps {
    /// Text content that needs the darkening overlay to stay legible.
    pub fn has_overlay_content(&self) -> bool {
        self.heading.is_some() || self.subheading.is_some() || !self.ctas.is_empty()
    }
}

pub fn render(props: &HeroProps, ctx: &RenderContext) -> Markup {
    let align = props.align.unwrap_or(Align::Center);

    html! {
        section class={ "hero align-" (align.as_str()) } {
            @if ctx.is_home {
                @for corner in ["top-left", "top-right", "bottom-left", "bottom-right"] {
                    div class={ "hero-corner hero-corner-" (corner) } aria-hidden="true" {}
                }
            }
            (background(props, ctx))
            @if props.has_overlay_content() {
                div.hero-overlay {}
            }
            div.hero-content {
                @if let Some(heading) = &props.heading {
                    h2.hero-heading { (heading) }
                }
                @if let Some(subheading) = &props.subheading {
                    p.hero-subheading { (subheading) }
                }
                (cta_row(&props.ctas, align))
            }
        }
    }
}

/// Only the selected background type renders; fields for the others are
/// ignored.
fn background(props: &HeroProps, ctx: &RenderContext) -> Markup {
    match props.background_type {
        BackgroundType::Image => {
            let src = props
                .background_image
                .as_ref()
                .and_then(|img| ctx.images.sized(img, 1600, 580));
            html! {
                @if let Some(src) = src {
                    img.hero-background src=(src) alt=(props.heading.as_deref().unwrap_or(""));
                }
            }
        }
        BackgroundType::Video => html! {
            @if let Some(url) = &props.background_video_url {
                video.hero-background autoplay muted loop playsinline {
                    source src=(url) type="video/mp4";
                }
            }
        },
        BackgroundType::Color => {
            let color = props
                .background_color
                .as_deref()
                .unwrap_or(DEFAULT_BACKGROUND_COLOR);
            let (style, token) = color_background(color);
            let class = match token {
                Some(token) => format!("hero-background hero-color {token}"),
                None => "hero-background hero-color".to_string(),
            };
            html! {
                div class=(class) style=[style] {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;

    fn hero(value: serde_json::Value) -> HeroProps {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn corners_present_iff_home() {
        let props = hero(json!({"heading": "Argyle"}));
        let images = images();
        let home = render(&props, &home_ctx(&images)).into_string();
        let inner = render(&props, &ctx(&images)).into_string();
        assert_eq!(home.matches("hero-corner ").count(), 4);
        assert!(!inner.contains("hero-corner"));
    }

    #[test]
    fn overlay_only_with_text_content() {
        let images = images();
        let bare = render(&hero(json!({})), &ctx(&images)).into_string();
        assert!(!bare.contains("hero-overlay"));

        for props in [
            json!({"heading": "H"}),
            json!({"subheading": "S"}),
            json!({"ctas": [{"text": "Go", "href": "/go"}]}),
        ] {
            let html = render(&hero(props), &ctx(&images)).into_string();
            assert!(html.contains("hero-overlay"));
        }
    }

    #[test]
    fn only_selected_background_renders() {
        let images = images();
        let props = hero(json!({
            "backgroundType": "video",
            "backgroundVideoUrl": "https://example.org/intro.mp4",
            "backgroundImage": {"asset": {"_ref": "image-abc-10x10-jpg"}},
            "backgroundColor": "#ff0000",
        }));
        let html = render(&props, &ctx(&images)).into_string();
        assert!(html.contains("<video"));
        assert!(html.contains("https://example.org/intro.mp4"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("#ff0000"));
    }

    #[test]
    fn image_is_default_background() {
        let images = images();
        let props = hero(json!({
            "heading": "Welcome",
            "backgroundImage": {"asset": {"_ref": "image-abc-2000x800-jpg"}},
        }));
        let html = render(&props, &ctx(&images)).into_string();
        assert!(html.contains("abc-2000x800.jpg?w=1600&amp;h=580"));
        assert!(html.contains(r#"alt="Welcome""#));
    }

    #[test]
    fn color_background_defaults_and_tokens() {
        let images = images();
        let default = render(&hero(json!({"backgroundType": "color"})), &ctx(&images)).into_string();
        assert!(default.contains("background-color: #111827;"));

        let token = render(
            &hero(json!({"backgroundType": "color", "backgroundColor": "bg-primary"})),
            &ctx(&images),
        )
        .into_string();
        assert!(token.contains("hero-color bg-primary"));
        assert!(!token.contains("style="));
    }

    #[test]
    fn alignment_defaults_to_center() {
        let images = images();
        let html = render(&hero(json!({"heading": "H"})), &ctx(&images)).into_string();
        assert!(html.contains("hero align-center"));
        let left = render(&hero(json!({"heading": "H", "align": "left"})), &ctx(&images));
        assert!(left.into_string().contains("hero align-left"));
        let bogus = render(&hero(json!({"heading": "H", "align": "middle"})), &ctx(&images));
        assert!(bogus.into_string().contains("hero align-center"));
    }

    #[test]
    fn ctas_keep_declaration_order() {
        let images = images();
        let props = hero(json!({"ctas": [
            {"text": "First", "href": "/1"},
            {"text": "Second", "href": "/2", "variant": "secondary"},
        ]}));
        let html = render(&props, &ctx(&images)).into_string();
        assert!(html.find("First").unwrap() < html.find("Second").unwrap());
        assert!(html.contains("btn btn-secondary btn-size-default"));
    }
}
