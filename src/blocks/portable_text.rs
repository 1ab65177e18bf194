//! Structured rich text.
//!
//! Documents are an ordered list of blocks. Text blocks carry a `style`
//! (`normal`, `h2`..`h4`, `blockquote`), an optional `listItem`, and spans
//! whose `marks` name either a decorator (`strong`, `em`, ...) or the `_key`
//! of an annotation in the block's `markDefs` (links). Image blocks render
//! with their caption. Consecutive list items of one kind are grouped into a
//! single `ul`/`ol`.
//!
//! Anything unrecognised degrades: unknown styles render as paragraphs,
//! unknown marks as plain text, unknown block types as an empty marker.

use super::RenderContext;
use crate::types::{ImageRef, lenient};
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextNode {
    #[serde(default, deserialize_with = "lenient::text")]
    style: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    list_item: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    children: Vec<Span>,
    #[serde(default, deserialize_with = "lenient::vec")]
    mark_defs: Vec<MarkDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Span {
    #[serde(default, deserialize_with = "lenient::or_default")]
    text: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    marks: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MarkDef {
    #[serde(default, rename = "_key", deserialize_with = "lenient::or_default")]
    key: String,
    #[serde(default, rename = "_type", deserialize_with = "lenient::or_default")]
    kind: String,
    #[serde(default, deserialize_with = "lenient::text")]
    href: Option<String>,
}

#[derive(Debug, Clone)]
enum Node {
    Text(TextNode),
    Image(ImageRef),
    Other(Option<String>),
}

impl Node {
    fn from_value(value: &Value) -> Node {
        let kind = value.get("_type").and_then(Value::as_str);
        let decoded = match kind {
            Some("block") => serde_json::from_value(value.clone()).map(Node::Text).ok(),
            Some("image") => serde_json::from_value(value.clone()).map(Node::Image).ok(),
            _ => None,
        };
        decoded.unwrap_or_else(|| Node::Other(kind.map(str::to_owned)))
    }

    fn list_kind(&self) -> Option<ListKind> {
        match self {
            Node::Text(t) => match t.list_item.as_deref() {
                Some("number") => Some(ListKind::Number),
                Some(_) => Some(ListKind::Bullet),
                None => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Number,
}

/// Render a document given as raw block values.
pub fn render(blocks: &[Value], ctx: &RenderContext) -> Markup {
    let nodes: Vec<Node> = blocks.iter().map(Node::from_value).collect();

    // Group runs of list items so each run becomes one list element.
    let mut groups: Vec<(Option<ListKind>, Vec<&Node>)> = Vec::new();
    for node in &nodes {
        let kind = node.list_kind();
        match groups.last_mut() {
            Some((Some(current), items)) if kind == Some(*current) => items.push(node),
            _ => groups.push((kind, vec![node])),
        }
    }

    html! {
        @for (kind, items) in &groups {
            @match kind {
                Some(ListKind::Bullet) => {
                    ul { @for n in items { li { (node_inline(n)) } } }
                }
                Some(ListKind::Number) => {
                    ol { @for n in items { li { (node_inline(n)) } } }
                }
                None => {
                    @for n in items { (node(n, ctx)) }
                }
            }
        }
    }
}

fn node(node: &Node, ctx: &RenderContext) -> Markup {
    match node {
        Node::Text(text) => {
            let inline = spans(text);
            match text.style.as_deref() {
                Some("h2") => html! { h2 { (inline) } },
                Some("h3") => html! { h3 { (inline) } },
                Some("h4") => html! { h4 { (inline) } },
                Some("blockquote") => html! { blockquote { (inline) } },
                _ => html! { p { (inline) } },
            }
        }
        Node::Image(image) => {
            let src = ctx.images.width(image, 800);
            html! {
                @if let Some(src) = src {
                    figure.pt-image {
                        img src=(src) alt=(image.alt.as_deref().unwrap_or("")) loading="lazy";
                        @if let Some(caption) = &image.caption {
                            figcaption { (caption) }
                        }
                    }
                }
            }
        }
        Node::Other(kind) => {
            log::debug!("skipping rich text block of type {kind:?}");
            html! { div.pt-unknown data-type=[kind.as_deref()] {} }
        }
    }
}

fn node_inline(node: &Node) -> Markup {
    match node {
        Node::Text(text) => spans(text),
        _ => html! {},
    }
}

fn spans(text: &TextNode) -> Markup {
    html! {
        @for span in &text.children {
            (marked(&span.text, &span.marks, &text.mark_defs))
        }
    }
}

/// Wrap `text` in its marks, outermost first.
fn marked(text: &str, marks: &[String], defs: &[MarkDef]) -> Markup {
    let Some((mark, rest)) = marks.split_first() else {
        return html! { (text) };
    };
    let inner = marked(text, rest, defs);
    match mark.as_str() {
        "strong" => html! { strong { (inner) } },
        "em" => html! { em { (inner) } },
        "underline" => html! { u { (inner) } },
        "code" => html! { code { (inner) } },
        "strike-through" => html! { s { (inner) } },
        key => match defs.iter().find(|d| d.key == key) {
            Some(def) if def.kind == "link" => link(def.href.as_deref(), inner),
            _ => inner,
        },
    }
}

fn link(href: Option<&str>, inner: Markup) -> Markup {
    let href = href.unwrap_or("#");
    let external = href.starts_with("http");
    html! {
        a href=(href)
            target=[external.then_some("_blank")]
            rel=[external.then_some("noopener noreferrer")] { (inner) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;

    fn render_json(doc: Value) -> String {
        let images = images();
        let blocks = doc.as_array().cloned().unwrap_or_default();
        render(&blocks, &ctx(&images)).into_string()
    }

    fn block(style: &str, text: &str) -> Value {
        json!({"_type": "block", "style": style, "children": [{"_type": "span", "text": text}]})
    }

    #[test]
    fn styles_map_to_elements_in_order() {
        let html = render_json(json!([
            block("h2", "Title"),
            block("normal", "Body"),
            block("blockquote", "Quote"),
            block("h4", "Small"),
        ]));
        assert_eq!(
            html,
            "<h2>Title</h2><p>Body</p><blockquote>Quote</blockquote><h4>Small</h4>"
        );
    }

    #[test]
    fn unknown_style_renders_as_paragraph() {
        assert_eq!(render_json(json!([block("h9", "Odd")])), "<p>Odd</p>");
    }

    #[test]
    fn decorators_nest_in_order() {
        let html = render_json(json!([{
            "_type": "block",
            "children": [
                {"_type": "span", "text": "plain "},
                {"_type": "span", "text": "loud", "marks": ["strong", "em"]},
                {"_type": "span", "text": " mystery", "marks": ["sparkle"]},
            ]
        }]));
        assert_eq!(html, "<p>plain <strong><em>loud</em></strong> mystery</p>");
    }

    #[test]
    fn links_resolve_through_mark_defs() {
        let html = render_json(json!([{
            "_type": "block",
            "markDefs": [
                {"_key": "ext", "_type": "link", "href": "https://mn.gov"},
                {"_key": "int", "_type": "link", "href": "/contact"},
                {"_key": "bad", "_type": "link"},
            ],
            "children": [
                {"_type": "span", "text": "State", "marks": ["ext"]},
                {"_type": "span", "text": "Us", "marks": ["int"]},
                {"_type": "span", "text": "Nowhere", "marks": ["bad"]},
            ]
        }]));
        assert!(html.contains(
            r#"<a href="https://mn.gov" target="_blank" rel="noopener noreferrer">State</a>"#
        ));
        assert!(html.contains(r#"<a href="/contact">Us</a>"#));
        assert!(html.contains(r##"<a href="#">Nowhere</a>"##));
    }

    #[test]
    fn list_items_are_grouped() {
        let item = |kind: &str, text: &str| {
            json!({"_type": "block", "listItem": kind, "children": [{"text": text}]})
        };
        let html = render_json(json!([
            item("bullet", "a"),
            item("bullet", "b"),
            item("number", "one"),
            block("normal", "after"),
        ]));
        assert_eq!(
            html,
            "<ul><li>a</li><li>b</li></ul><ol><li>one</li></ol><p>after</p>"
        );
    }

    #[test]
    fn image_block_with_caption() {
        let html = render_json(json!([{
            "_type": "image",
            "asset": {"_ref": "image-pic-800x600-jpg"},
            "alt": "Main street",
            "caption": "Main street in 1920",
        }]));
        assert!(html.contains("pic-800x600.jpg?w=800"));
        assert!(html.contains(r#"alt="Main street""#));
        assert!(html.contains("<figcaption>Main street in 1920</figcaption>"));
    }

    #[test]
    fn image_without_asset_is_omitted() {
        assert_eq!(render_json(json!([{"_type": "image", "alt": "x"}])), "");
    }

    #[test]
    fn unknown_block_does_not_stop_the_rest() {
        let html = render_json(json!([
            {"_type": "youtube", "url": "https://youtube.com/watch"},
            "not even an object",
            block("normal", "still here"),
        ]));
        assert!(html.contains(r#"data-type="youtube""#));
        assert!(html.ends_with("<p>still here</p>"));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(
            render_json(json!([block("normal", "<b>hi</b>")])),
            "<p>&lt;b&gt;hi&lt;/b&gt;</p>"
        );
    }
}
