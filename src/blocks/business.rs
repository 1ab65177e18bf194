//! Business directory listing, cards and detail page.

use crate::format::{business_count, category_label, format_phone};
use crate::images::ImageUrlBuilder;
use crate::types::{Address, Business};
use maud::{Markup, html};

pub const EMPTY_MESSAGE: &str = "No businesses found at the moment.";

pub const DIRECTORY_TITLE: &str = "Local Businesses";

/// Directory section over an already ordered list. Featured entries get their
/// own group ahead of the rest; `category` names the filter in the count line.
pub fn directory(businesses: &[Business], category: Option<&str>, images: &ImageUrlBuilder) -> Markup {
    if businesses.is_empty() {
        return html! {
            section.business-directory {
                h2 { (DIRECTORY_TITLE) }
                p.business-empty { (EMPTY_MESSAGE) }
            }
        };
    }

    let (featured, rest): (Vec<&Business>, Vec<&Business>) =
        businesses.iter().partition(|b| b.featured);
    let grouped = !featured.is_empty();

    html! {
        section.business-directory {
            h2 { (DIRECTORY_TITLE) }
            @if grouped {
                div.business-group.business-featured {
                    h3 { "Featured Businesses" }
                    div.business-grid {
                        @for b in &featured { (card(b, images)) }
                    }
                }
            }
            div.business-group {
                @if grouped {
                    h3 { "All Businesses" }
                }
                div.business-grid {
                    @for b in &rest { (card(b, images)) }
                }
            }
            p.business-count {
                "Showing " (business_count(businesses.len()))
                @if let Some(category) = category {
                    " in " (category_label(category))
                }
            }
        }
    }
}

pub fn card(business: &Business, images: &ImageUrlBuilder) -> Markup {
    let logo = business
        .logo
        .as_ref()
        .and_then(|logo| images.width(logo, 128).map(|src| (src, logo.alt.as_deref())));
    let href = business
        .slug
        .as_deref()
        .map(|slug| format!("/business/{slug}"));

    html! {
        a.business-card href=[href] {
            @if let Some((src, alt)) = &logo {
                img.business-logo src=(src)
                    alt=(alt.map_or_else(|| format!("{} logo", business.name), str::to_owned));
            }
            h3.business-name { (business.name) }
            @if let Some(address) = &business.address {
                (address_lines(address))
            }
            @if let Some(description) = &business.description {
                p.business-description { (description) }
            }
            @if let Some(category) = &business.category {
                span.badge.badge-category { (category_label(category)) }
            }
            @if business.featured {
                span.badge.badge-featured { "Featured" }
            }
        }
    }
}

fn address_lines(address: &Address) -> Markup {
    html! {
        address.business-address {
            @if let Some(street) = &address.street {
                div { (street) }
            }
            @if let Some(locality) = address.locality() {
                div { (locality) }
            }
        }
    }
}

/// Full page body for one business.
pub fn detail(business: &Business, images: &ImageUrlBuilder) -> Markup {
    let logo = business
        .logo
        .as_ref()
        .and_then(|logo| images.width(logo, 256).map(|src| (src, logo.alt.as_deref())));

    html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            a href="/" { "Home" }
            span.sep { "/" }
            a href="/business" { "Businesses" }
            span.sep { "/" }
            span aria-current="page" { (business.name) }
        }
        article.business-detail {
            header.business-detail-header {
                @if let Some((src, alt)) = &logo {
                    img.business-logo src=(src)
                        alt=(alt.map_or_else(|| format!("{} logo", business.name), str::to_owned));
                }
                div {
                    h1 { (business.name) }
                    @if let Some(category) = &business.category {
                        span.badge.badge-category { (category_label(category)) }
                    }
                    @if business.featured {
                        span.badge.badge-featured { "Featured" }
                    }
                    @if let Some(description) = &business.description {
                        p.business-description { (description) }
                    }
                }
            }
            div.business-detail-grid {
                section.business-contact {
                    h2 { "Contact Information" }
                    @if let Some(address) = &business.address {
                        (address_lines(address))
                    }
                    @if let Some(phone) = &business.phone {
                        p { a href={ "tel:" (phone) } { (format_phone(phone, None)) } }
                    }
                    @if let Some(website) = &business.website {
                        p { a href=(website) target="_blank" rel="noopener noreferrer" { (website) } }
                    }
                    @if let Some(email) = &business.email {
                        p { a href={ "mailto:" (email) } { (email) } }
                    }
                }
                @if let Some(hours) = &business.hours {
                    section.business-hours {
                        h2 { "Business Hours" }
                        table {
                            @for (day, open) in hours.days() {
                                tr.closed[open.is_none()] {
                                    th scope="row" { (day) }
                                    td { (open.unwrap_or("Closed")) }
                                }
                            }
                        }
                    }
                }
            }
            p.back-link {
                a href="/business" { "← Back to Business Directory" }
            }
        }
    }
}
