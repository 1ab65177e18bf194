//! Content slot schema.
//!
//! A slot is one renderable unit of page content, tagged by its `_type`
//! discriminator and identified within its page by `_key`. The set of kinds
//! this crate knows how to render is closed ([`Block`]); everything else,
//! including slots with no discriminator at all, lands in
//! [`Block::Unknown`] with its raw payload kept for the diagnostic
//! placeholder.
//!
//! Decoding never fails. A slot of a known kind whose payload cannot be read
//! is also kept as `Unknown`, with the decode error attached, so one broken
//! slot never affects its siblings.

use crate::blocks::gallery::GalleryProps;
use crate::blocks::google_map::GoogleMapProps;
use crate::blocks::hero::HeroProps;
use crate::blocks::municipal_group::MunicipalGroupProps;
use crate::blocks::quick_links::QuickLinksProps;
use crate::blocks::text_block::TextBlockProps;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const HERO: &str = "hero";
pub const GALLERY: &str = "gallery";
pub const TEXT_BLOCK: &str = "textBlock";
pub const QUICK_LINKS_GRID: &str = "quickLinksGrid";
pub const MUNICIPAL_GROUP: &str = "municipalGroup";
pub const GOOGLE_MAP: &str = "googleMap";

#[derive(Debug, Clone)]
pub struct Slot {
    /// `_key`: unique within one page's slot list, not globally.
    pub key: Option<String>,
    pub block: Block,
}

#[derive(Debug, Clone)]
pub enum Block {
    Hero(HeroProps),
    Gallery(GalleryProps),
    TextBlock(TextBlockProps),
    QuickLinksGrid(QuickLinksProps),
    MunicipalGroup(MunicipalGroupProps),
    GoogleMap(GoogleMapProps),
    Unknown(UnknownSlot),
}

#[derive(Debug, Clone)]
pub struct UnknownSlot {
    /// The discriminator as authored, `None` if the slot had none.
    pub kind: Option<String>,
    /// Why a known kind could not be read. `None` for genuinely unknown kinds.
    pub error: Option<String>,
    pub raw: Value,
}

impl Slot {
    /// Classify one raw slot record.
    pub fn from_value(raw: Value) -> Slot {
        let kind = raw.get("_type").and_then(Value::as_str).map(str::to_owned);
        let key = raw.get("_key").and_then(Value::as_str).map(str::to_owned);

        let decoded = match kind.as_deref() {
            Some(HERO) => decode(&raw).map(Block::Hero),
            Some(GALLERY) => decode(&raw).map(Block::Gallery),
            Some(TEXT_BLOCK) => decode(&raw).map(Block::TextBlock),
            Some(QUICK_LINKS_GRID) => decode(&raw).map(Block::QuickLinksGrid),
            Some(MUNICIPAL_GROUP) => decode(&raw).map(Block::MunicipalGroup),
            Some(GOOGLE_MAP) => decode(&raw).map(Block::GoogleMap),
            _ => {
                return Slot {
                    key,
                    block: Block::Unknown(UnknownSlot {
                        kind,
                        error: None,
                        raw,
                    }),
                };
            }
        };

        let block = decoded.unwrap_or_else(|e| {
            Block::Unknown(UnknownSlot {
                kind,
                error: Some(e.to_string()),
                raw,
            })
        });
        Slot { key, block }
    }

    /// The discriminator as authored, or `""` when absent.
    pub fn kind(&self) -> &str {
        match &self.block {
            Block::Hero(_) => HERO,
            Block::Gallery(_) => GALLERY,
            Block::TextBlock(_) => TEXT_BLOCK,
            Block::QuickLinksGrid(_) => QUICK_LINKS_GRID,
            Block::MunicipalGroup(_) => MUNICIPAL_GROUP,
            Block::GoogleMap(_) => GOOGLE_MAP,
            Block::Unknown(u) => u.kind.as_deref().unwrap_or(""),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.block, Block::Unknown(_))
    }
}

fn decode<T: DeserializeOwned>(raw: &Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(raw.clone())
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Slot::from_value)
    }
}
