//! Embedded map for a free-text address.
//!
//! No geocoding happens here: the address is percent-encoded into the embed
//! URL as written and the map provider deals with whatever it gets.

use crate::types::lenient;
use maud::{Markup, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

const DEFAULT_HEIGHT: u32 = 600;

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleMapProps {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub height: Option<i64>,
}

impl GoogleMapProps {
    pub fn height(&self) -> u32 {
        self.height
            .filter(|h| *h > 0)
            .and_then(|h| u32::try_from(h).ok())
            .unwrap_or(DEFAULT_HEIGHT)
    }
}

pub fn embed_url(address: &str) -> String {
    let encoded = utf8_percent_encode(address, COMPONENT);
    format!("https://www.google.com/maps?q={encoded}&output=embed")
}

pub fn render(props: &GoogleMapProps) -> Markup {
    html! {
        div.map-embed style={ "height: " (props.height()) "px;" } {
            iframe title={ "Map of " (props.address) }
                src=(embed_url(&props.address))
                width="100%" height="100%"
                loading="lazy" allowfullscreen
                referrerpolicy="no-referrer-when-downgrade" {}
        }
    }
}
