//! Card grid of shortcut links.

use crate::types::lenient;
use maud::{Markup, html};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QuickLinksProps {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub links: Vec<QuickLink>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub columns: Option<i64>,
}

impl QuickLinksProps {
    /// 2, 3 or 4; anything else is 3.
    pub fn columns(&self) -> u8 {
        match self.columns {
            Some(2) => 2,
            Some(4) => 4,
            _ => 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLink {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_external: bool,
}

pub fn render(props: &QuickLinksProps) -> Markup {
    html! {
        section.quick-links {
            @if props.title.is_some() || props.description.is_some() {
                header.quick-links-header {
                    @if let Some(title) = &props.title {
                        h2 { (title) }
                    }
                    @if let Some(description) = &props.description {
                        p.lead { (description) }
                    }
                }
            }
            div class={ "quick-links-grid cols-" (props.columns()) } {
                @for link in &props.links {
                    (card(link))
                }
            }
        }
    }
}

fn card(link: &QuickLink) -> Markup {
    let (target, rel, glyph) = if link.is_external {
        ("_blank", Some("noopener noreferrer"), "↗")
    } else {
        ("_self", None, "→")
    };
    html! {
        a.quick-link href=(link.url) target=(target) rel=[rel] {
            @if let Some(icon) = &link.icon {
                span.quick-link-icon role="img" aria-hidden="true" { (icon) }
            }
            span.quick-link-title {
                (link.title)
                " "
                span.quick-link-glyph aria-hidden="true" { (glyph) }
            }
            @if let Some(description) = &link.description {
                small.quick-link-description { (description) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn links(value: serde_json::Value) -> QuickLinksProps {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn external_links_open_in_new_context() {
        let html = render(&links(json!({"links": [
            {"title": "County", "url": "https://co.marshall.mn.us", "isExternal": true},
        ]})))
        .into_string();
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains("↗"));
        assert!(!html.contains("→"));
    }

    #[test]
    fn internal_links_navigate_in_place() {
        let html = render(&links(json!({"links": [
            {"title": "Utilities", "url": "/utilities", "icon": "💧"},
        ]})))
        .into_string();
        assert!(html.contains(r#"target="_self""#));
        assert!(!html.contains("rel="));
        assert!(html.contains("→"));
        assert!(html.contains("💧"));
    }

    #[test]
    fn columns_fall_back_to_three() {
        for (cols, expected) in [
            (json!(2), 2),
            (json!(3), 3),
            (json!(4), 4),
            (json!(5), 3),
            (json!("four"), 3),
            (json!(null), 3),
        ] {
            assert_eq!(links(json!({"columns": cols})).columns(), expected);
        }
        let html = render(&links(json!({"columns": 4}))).into_string();
        assert!(html.contains("quick-links-grid cols-4"));
    }

    #[test]
    fn header_omitted_without_title_or_description() {
        let html = render(&links(json!({"links": []}))).into_string();
        assert!(!html.contains("<header"));
    }
}
