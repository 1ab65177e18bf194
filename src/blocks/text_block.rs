//! Headed rich-text section with optional background, column layout and CTAs.

use super::{RenderContext, color_background, cta_row, portable_text};
use crate::types::{Align, Cta, ImageRef, lenient};
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBackground {
    #[default]
    None,
    Image,
    Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    Single,
    TwoColumn,
    SidebarLeft,
    SidebarRight,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Single => "single",
            Layout::TwoColumn => "two-column",
            Layout::SidebarLeft => "sidebar-left",
            Layout::SidebarRight => "sidebar-right",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlockProps {
    #[serde(default, deserialize_with = "lenient::text")]
    pub heading: Option<String>,
    /// Older documents use `title` instead of `heading`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subheading: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub content: Vec<Value>,
    /// Legacy markdown body, used only when `content` is empty.
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub background_type: TextBackground,
    #[serde(default, deserialize_with = "lenient::option")]
    pub background_image: Option<ImageRef>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub layout: Layout,
    #[serde(default, deserialize_with = "lenient::option")]
    pub align: Option<Align>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub ctas: Vec<Cta>,
}

impl TextBlockProps {
    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref().or(self.title.as_deref())
    }
}

pub fn render(props: &TextBlockProps, ctx: &RenderContext) -> Markup {
    let align = props.align.unwrap_or(Align::Left);
    let sidebar = matches!(props.layout, Layout::SidebarLeft | Layout::SidebarRight);

    html! {
        section class={ "text-block align-" (align.as_str()) } {
            (background(props, ctx))
            div.text-block-inner {
                @if props.heading().is_some() || props.subheading.is_some() {
                    header.text-block-header {
                        @if let Some(sub) = &props.subheading {
                            p.text-block-eyebrow { (sub) }
                        }
                        @if let Some(heading) = props.heading() {
                            h2 { (heading) }
                        }
                    }
                }
                div class={ "text-block-grid layout-" (props.layout.as_str()) } {
                    @if props.layout == Layout::SidebarLeft {
                        aside.text-block-sidebar {}
                    }
                    div.text-block-body.span-2[sidebar] {
                        (body(props, ctx))
                    }
                    @if props.layout == Layout::SidebarRight {
                        aside.text-block-sidebar {}
                    }
                }
                (cta_row(&props.ctas, align))
            }
        }
    }
}

fn body(props: &TextBlockProps, ctx: &RenderContext) -> Markup {
    if !props.content.is_empty() {
        return html! { div.prose { (portable_text::render(&props.content, ctx)) } };
    }
    match &props.text {
        Some(text) => html! { div.prose { (markdown(text)) } },
        None => html! {},
    }
}

fn background(props: &TextBlockProps, ctx: &RenderContext) -> Markup {
    match props.background_type {
        TextBackground::None => html! {},
        TextBackground::Image => {
            let src = props
                .background_image
                .as_ref()
                .and_then(|img| ctx.images.sized(img, 1600, 800));
            html! {
                @if let Some(src) = src {
                    div.text-block-background {
                        img src=(src) alt="";
                        div.text-block-wash {}
                    }
                }
            }
        }
        TextBackground::Color => {
            let Some(color) = props.background_color.as_deref() else {
                return html! {};
            };
            let (style, token) = color_background(color);
            let class = match token {
                Some(token) => format!("text-block-background {token}"),
                None => "text-block-background".to_string(),
            };
            html! { div class=(class) style=[style] {} }
        }
    }
}

/// Markdown to HTML with embedded raw HTML demoted to text.
fn markdown(source: &str) -> Markup {
    let events = Parser::new(source).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    pulldown_cmark::html::push_html(&mut out, events);
    PreEscaped(out)
}
