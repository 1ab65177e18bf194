//! Page controllers and the shared site layout.
//!
//! Each route fetches what it needs from the [`ContentStore`], renders its body
//! and wraps it in [`Site::layout`]: head metadata, header navigation, the
//! announcement bar and the footer. A missing document becomes the not-found
//! page; a failing store becomes a 502 page. Neither panics nor renders a
//! partial page.
//!
//! ## Page Structure
//!
//! ```text
//! <head>     title, description, canonical, Open Graph + Twitter tags, CSS
//! <header>   brand link, menu toggle, nav with dropdowns
//! .announcement-bar   current announcements (omitted when none)
//! <main>     h1.sr-only (page heading) + content slots [+ route extras]
//! <footer>   city hall details, link columns, copyright
//! <script>   site.js
//! ```

use crate::blocks::{self, RenderContext, business};
use crate::config::{self, Link, NavLink, SiteConfig};
use crate::content::{BusinessQuery, ContentError, ContentStore};
use crate::images::ImageUrlBuilder;
use crate::types::Page;
use chrono::{DateTime, Datelike, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// A rendered HTML document and the status it should be served with.
#[derive(Debug)]
pub struct Document {
    pub status: u16,
    pub markup: Markup,
}

impl Document {
    fn ok(markup: Markup) -> Self {
        Self { status: 200, markup }
    }
}

/// Head metadata for one document.
#[derive(Debug, Clone)]
pub struct Meta {
    pub title: String,
    pub description: String,
    /// Site-relative path, joined onto `site.domain_url` for the canonical link.
    pub path: String,
    pub og_image: Option<String>,
}

pub struct Site {
    config: SiteConfig,
    store: Box<dyn ContentStore>,
    images: ImageUrlBuilder,
    css: String,
}

impl Site {
    pub fn new(config: SiteConfig, store: Box<dyn ContentStore>) -> Self {
        let images = ImageUrlBuilder::new(&config.content.project_id, &config.content.dataset);
        let css = format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC);
        Self {
            config,
            store,
            images,
            css,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    fn context(&self, is_home: bool, now: DateTime<Utc>) -> RenderContext<'_> {
        RenderContext {
            images: &self.images,
            is_home,
            now,
        }
    }

    // ========================================================================
    // Routes
    // ========================================================================

    /// `/`: the home page document, with the hero in home mode.
    pub fn home(&self, now: DateTime<Utc>) -> Document {
        self.slot_page(&self.config.site.home_slug, "/".into(), true, now)
    }

    /// `/{slug}`
    pub fn page(&self, slug: &str, now: DateTime<Utc>) -> Document {
        self.render_page(slug, false, now)
    }

    /// Any page by slug. `is_home` switches the hero into home mode; the
    /// canonical path is `/` only for the configured home slug.
    pub fn render_page(&self, slug: &str, is_home: bool, now: DateTime<Utc>) -> Document {
        let path = if slug == self.config.site.home_slug {
            "/".into()
        } else {
            format!("/{slug}")
        };
        self.slot_page(slug, path, is_home, now)
    }

    /// `/organizations/{slug}`
    pub fn organization(&self, slug: &str, now: DateTime<Utc>) -> Document {
        self.slot_page(slug, format!("/organizations/{slug}"), false, now)
    }

    fn slot_page(&self, slug: &str, path: String, is_home: bool, now: DateTime<Utc>) -> Document {
        match self.store.page_by_slug(slug) {
            Ok(Some(page)) => {
                let meta = self.page_meta(&page, path);
                let body = self.page_body(&page, is_home, now);
                Document::ok(self.layout(&meta, body, now))
            }
            Ok(None) => self.not_found(now),
            Err(e) => self.store_failure(&e, now),
        }
    }

    /// `/business`: the `business` page followed by the directory.
    pub fn business_index(&self, category: Option<&str>, now: DateTime<Utc>) -> Document {
        let page = match self.store.page_by_slug("business") {
            Ok(Some(page)) => page,
            Ok(None) => return self.not_found(now),
            Err(e) => return self.store_failure(&e, now),
        };
        let query = BusinessQuery {
            category: category.map(str::to_owned),
            ..BusinessQuery::featured_first()
        };
        let businesses = match self.store.businesses(&query) {
            Ok(list) => list,
            Err(e) => return self.store_failure(&e, now),
        };

        let body = html! {
            (self.page_body(&page, false, now))
            (business::directory(&businesses, category, &self.images))
        };
        let meta = self.page_meta(&page, "/business".into());
        Document::ok(self.layout(&meta, body, now))
    }

    /// `/business/{slug}`
    pub fn business_detail(&self, slug: &str, now: DateTime<Utc>) -> Document {
        let entry = match self.store.business_by_slug(slug) {
            Ok(Some(b)) => b,
            Ok(None) => return self.not_found(now),
            Err(e) => return self.store_failure(&e, now),
        };
        let meta = Meta {
            title: format!("{} - Argyle, MN Business Directory", entry.name),
            description: entry.description.clone().unwrap_or_else(|| {
                format!(
                    "Find contact information and details for {} in Argyle, Minnesota.",
                    entry.name
                )
            }),
            path: format!("/business/{slug}"),
            og_image: entry
                .logo
                .as_ref()
                .and_then(|logo| self.images.sized(logo, 1200, 630)),
        };
        Document::ok(self.layout(&meta, business::detail(&entry, &self.images), now))
    }

    /// `/contact`: city hall details and the message form.
    pub fn contact(&self, now: DateTime<Utc>) -> Document {
        let meta = Meta {
            title: format!("Contact Us | {}", self.config.site.name),
            description: self.config.site.default_description.clone(),
            path: "/contact".into(),
            og_image: None,
        };
        Document::ok(self.layout(&meta, self.contact_body(), now))
    }

    pub fn not_found(&self, now: DateTime<Utc>) -> Document {
        let meta = Meta {
            title: format!("Page Not Found | {}", self.config.site.name),
            description: self.config.site.default_description.clone(),
            path: "/".into(),
            og_image: None,
        };
        let body = html! {
            section.status-page {
                h1 { "Page Not Found" }
                p { "The page you are looking for does not exist or has moved." }
                a.btn.btn-primary href="/" { "Return Home" }
            }
        };
        Document {
            status: 404,
            markup: self.layout(&meta, body, now),
        }
    }

    fn store_failure(&self, err: &ContentError, now: DateTime<Utc>) -> Document {
        log::error!("content store failed: {err}");
        let meta = Meta {
            title: format!("Temporarily Unavailable | {}", self.config.site.name),
            description: self.config.site.default_description.clone(),
            path: "/".into(),
            og_image: None,
        };
        let body = html! {
            section.status-page {
                h1 { "Something went wrong" }
                p { "We couldn't load this page right now. Please try again shortly." }
            }
        };
        Document {
            status: 502,
            markup: self.layout(&meta, body, now),
        }
    }

    // ========================================================================
    // Page pieces
    // ========================================================================

    pub fn page_meta(&self, page: &Page, path: String) -> Meta {
        Meta {
            title: page
                .title
                .clone()
                .unwrap_or_else(|| self.config.site.name.clone()),
            description: page
                .description
                .clone()
                .unwrap_or_else(|| self.config.site.default_description.clone()),
            path,
            og_image: page
                .og_image
                .as_ref()
                .and_then(|img| self.images.sized(img, 1200, 630)),
        }
    }

    fn page_body(&self, page: &Page, is_home: bool, now: DateTime<Utc>) -> Markup {
        html! {
            @if let Some(heading) = &page.heading {
                h1.sr-only { (heading) }
            }
            (blocks::slot_section(&page.content_slots, &self.context(is_home, now)))
        }
    }

    fn contact_body(&self) -> Markup {
        let office = &self.config.office;
        html! {
            section.contact-page {
                header.contact-header {
                    h1 { "Contact Us" }
                    p { "Get in touch with the " (self.config.site.name) }
                }
                div.contact-grid {
                    div.contact-card {
                        h2 { "Contact Information" }
                        h3 { "City Hall" }
                        address {
                            @for line in &office.address {
                                div { (line) }
                            }
                        }
                        @if !office.phone.is_empty() {
                            p { a href={ "tel:" (tel_digits(&office.phone)) } { (office.phone) } }
                        }
                        @if !office.email.is_empty() {
                            p { a href={ "mailto:" (office.email) } { (office.email) } }
                        }
                        div.contact-note {
                            h3 { "Office Hours" }
                            p { "Please call ahead to confirm availability or to schedule an appointment." }
                        }
                    }
                    div.contact-card {
                        h2 { "Send us a Message" }
                        p { "Fill up the form below to send us a message." }
                        form id="contact-form" action="/api/contact" method="post" novalidate {
                            div.form-row {
                                (field("firstName", "First Name", "text", true))
                                (field("lastName", "Last Name", "text", true))
                            }
                            (field("email", "Email", "email", true))
                            (field("phone", "Phone", "tel", false))
                            (field("subject", "Subject", "text", false))
                            div.form-field {
                                label for="message" { "Message" }
                                textarea id="message" name="message" rows="6" required {}
                            }
                            p.form-status role="status" aria-live="polite" {}
                            button.btn.btn-primary type="submit" { "Send Message" }
                        }
                    }
                }
            }
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Wrap a body in the full site chrome.
    pub fn layout(&self, meta: &Meta, body: Markup, now: DateTime<Utc>) -> Markup {
        let announcements = match self.store.announcements(true, None) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("announcements unavailable: {e}");
                Vec::new()
            }
        };

        let content = html! {
            a.skip-link href="#main" { "Skip to content" }
            (site_header(&self.config.site.name, &self.config.site.tagline, &self.config.nav))
            (blocks::announcements::bar(&announcements, now))
            main id="main" { (body) }
            (self.site_footer(now))
            script { (PreEscaped(JS)) }
        };
        base_document(meta, &self.config, &self.css, content)
    }

    fn site_footer(&self, now: DateTime<Utc>) -> Markup {
        let office = &self.config.office;
        html! {
            footer.site-footer {
                div.footer-grid {
                    div.footer-office {
                        h2 { (self.config.site.name) }
                        address {
                            @for line in &office.address {
                                div { (line) }
                            }
                            @if !office.phone.is_empty() {
                                div { a href={ "tel:" (tel_digits(&office.phone)) } { (office.phone) } }
                            }
                            @if !office.email.is_empty() {
                                div { a href={ "mailto:" (office.email) } { (office.email) } }
                            }
                        }
                        @if !office.hours.is_empty() {
                            h3 { "City Hall Hours" }
                            @for line in &office.hours {
                                div { (line) }
                            }
                        }
                    }
                    @for group in &self.config.footer {
                        nav.footer-links aria-label=(group.title) {
                            h3 { (group.title) }
                            ul {
                                @for link in &group.links {
                                    li { (nav_anchor(link)) }
                                }
                            }
                        }
                    }
                }
                p.copyright {
                    "© " (now.year()) " " (self.config.site.name) ". All rights reserved."
                }
            }
        }
    }
}

/// Renders the base HTML document structure
fn base_document(meta: &Meta, config: &SiteConfig, css: &str, content: Markup) -> Markup {
    let canonical = format!(
        "{}{}",
        config.site.domain_url.trim_end_matches('/'),
        meta.path
    );
    let og_image = meta.og_image.clone().unwrap_or_else(|| {
        format!(
            "{}/default-og.jpg",
            config.site.domain_url.trim_end_matches('/')
        )
    });

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) }
                meta name="description" content=(meta.description);
                link rel="canonical" href=(canonical);
                meta property="og:type" content="website";
                meta property="og:title" content=(meta.title);
                meta property="og:description" content=(meta.description);
                meta property="og:url" content=(canonical);
                meta property="og:image" content=(og_image);
                meta property="og:image:width" content="1200";
                meta property="og:image:height" content="630";
                meta property="og:image:alt" content=(meta.title);
                meta name="twitter:card" content="summary_large_image";
                meta name="twitter:title" content=(meta.title);
                meta name="twitter:description" content=(meta.description);
                meta name="twitter:image" content=(og_image);
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with brand and navigation
fn site_header(name: &str, tagline: &str, nav: &[NavLink]) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" {
                span.brand-name { (name) }
                span.brand-tagline { (tagline) }
            }
            button.nav-toggle type="button" aria-controls="site-nav" aria-expanded="false"
                aria-label="Toggle navigation" {
                span.hamburger-line {}
                span.hamburger-line {}
                span.hamburger-line {}
            }
            nav.site-nav id="site-nav" aria-label="Main" {
                ul {
                    @for item in nav {
                        (render_nav_item(item))
                    }
                }
            }
        }
    }
}

fn render_nav_item(item: &NavLink) -> Markup {
    html! {
        li.has-dropdown[!item.children.is_empty()] {
            @match &item.href {
                Some(href) => { a href=(href) { (item.label) } }
                None => {
                    button.nav-group type="button" aria-haspopup="true" aria-expanded="false" {
                        (item.label)
                    }
                }
            }
            @if !item.children.is_empty() {
                ul.dropdown {
                    @for child in &item.children {
                        li { (nav_anchor(child)) }
                    }
                }
            }
        }
    }
}

fn nav_anchor(link: &Link) -> Markup {
    html! {
        @if link.is_external() {
            a href=(link.href) target="_blank" rel="noopener noreferrer" { (link.label) }
        } @else {
            a href=(link.href) { (link.label) }
        }
    }
}

fn field(name: &str, label: &str, kind: &str, required: bool) -> Markup {
    html! {
        div.form-field {
            label for=(name) { (label) }
            input id=(name) name=(name) type=(kind) required[required];
        }
    }
}

fn tel_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FileStore;
    use crate::test_helpers::*;
    use serde_json::json;

    fn site(data: serde_json::Value) -> Site {
        let store = FileStore::from_json(&data.to_string()).unwrap();
        Site::new(SiteConfig::default(), Box::new(store))
    }

    fn argyle() -> Site {
        site(json!({
            "pages": [
                {
                    "title": "Welcome to Argyle",
                    "slug": {"current": "Homepage"},
                    "heading": "City of Argyle",
                    "contentSlots": [
                        {"_type": "hero", "_key": "h1", "heading": "Welcome"},
                        {"_type": "mysteryWidget", "_key": "m1", "foo": 1}
                    ]
                },
                {"title": "Business", "slug": {"current": "business"}, "contentSlots": []}
            ],
            "businesses": [
                {"name": "Zed's Bait", "slug": {"current": "zeds"}, "category": "outdoors"},
                {"name": "Argyle Cafe", "slug": {"current": "cafe"}, "featured": true,
                 "description": "Breakfast all day."}
            ],
            "announcements": [
                {"title": "Pool opens Monday", "isActive": true}
            ]
        }))
    }

    #[test]
    fn home_page_renders_layout_and_slots() {
        let doc = argyle().home(fixed_now());
        assert_eq!(doc.status, 200);
        let html = doc.markup.into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Welcome to Argyle</title>"));
        assert!(html.contains(r#"<h1 class="sr-only">City of Argyle</h1>"#));
        assert!(html.contains(r#"class="hero-corner "#));
        assert!(html.contains("Unknown component type: mysteryWidget"));
        assert!(html.contains("Pool opens Monday"));
        assert!(html.contains("428 3rd Avenue NW"));
        assert!(html.contains("--color-primary: #6B1F2D"));
    }

    #[test]
    fn meta_falls_back_to_site_defaults() {
        let html = argyle().home(fixed_now()).markup.into_string();
        assert!(html.contains(
            r#"<meta name="description" content="Argyle, Minnesota - putting the home in Hometown since 1879.">"#
        ));
        assert!(html.contains(r#"<link rel="canonical" href="http://localhost:3000/">"#));
        assert!(html.contains(r#"content="http://localhost:3000/default-og.jpg""#));
        assert!(html.contains(r#"content="summary_large_image""#));
    }

    #[test]
    fn missing_page_is_not_found() {
        let doc = argyle().page("nowhere", fixed_now());
        assert_eq!(doc.status, 404);
        assert!(doc.markup.into_string().contains("Page Not Found"));
    }

    #[test]
    fn business_index_lists_featured_first() {
        let html = argyle().business_index(None, fixed_now()).markup.into_string();
        let cafe = html.find("Argyle Cafe").unwrap();
        let zeds = html.find("Zed's Bait").unwrap();
        assert!(cafe < zeds);
        assert!(html.contains("Showing 2 businesses"));
    }

    #[test]
    fn business_index_filters_by_category() {
        let html = argyle()
            .business_index(Some("outdoors"), fixed_now())
            .markup
            .into_string();
        assert!(html.contains("Showing 1 business in Outdoors"));
        assert!(!html.contains("Argyle Cafe"));
    }

    #[test]
    fn business_detail_meta() {
        let site = argyle();
        let html = site.business_detail("cafe", fixed_now()).markup.into_string();
        assert!(html.contains("<title>Argyle Cafe - Argyle, MN Business Directory</title>"));
        assert!(html.contains(r#"content="Breakfast all day.""#));

        let html = site.business_detail("zeds", fixed_now()).markup.into_string();
        assert!(html.contains("Find contact information and details for"));
        assert_eq!(site.business_detail("gone", fixed_now()).status, 404);
    }

    #[test]
    fn contact_page_has_form_fields() {
        let html = argyle().contact(fixed_now()).markup.into_string();
        for name in ["firstName", "lastName", "email", "phone", "subject", "message"] {
            assert!(html.contains(&format!(r#"name="{name}""#)), "missing {name}");
        }
        assert!(html.contains(r#"href="tel:2184376621""#));
    }

    #[test]
    fn nav_renders_dropdowns_and_external_children() {
        let html = argyle().contact(fixed_now()).markup.into_string();
        assert!(html.contains("has-dropdown"));
        assert!(html.contains(
            r#"<a href="http://www.sac.k12.mn.us/" target="_blank" rel="noopener noreferrer">Stephen-Argyle Central</a>"#
        ));
        assert!(html.contains(r#"<a href="/business">Business</a>"#));
    }

    #[test]
    fn no_announcement_bar_without_current_announcements() {
        let html = site(json!({"pages": [{"slug": {"current": "Homepage"}}]}))
            .home(fixed_now())
            .markup
            .into_string();
        assert!(!html.contains(r#"class="announcement-bar""#));
        assert!(html.contains("<title>City of Argyle</title>"));
    }

    #[test]
    fn any_page_can_render_in_home_mode() {
        let data = json!({"pages": [{
            "title": "History",
            "slug": {"current": "history"},
            "contentSlots": [{"_type": "hero", "_key": "h1", "heading": "Our Story"}]
        }]});
        let home = site(data.clone()).render_page("history", true, fixed_now());
        assert_eq!(home.status, 200);
        let html = home.markup.into_string();
        assert_eq!(html.matches(r#"class="hero-corner "#).count(), 4);
        assert!(html.contains("Our Story"));
        assert!(html.contains(r#"<link rel="canonical" href="http://localhost:3000/history">"#));

        let inner = site(data).render_page("history", false, fixed_now()).markup.into_string();
        assert!(!inner.contains(r#"class="hero-corner "#));
    }
}
