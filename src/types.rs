//! Content documents fetched from the content store.
//!
//! Every field that comes from authored content is treated as optional at the
//! boundary. Values of the wrong shape decode as absent (see [`lenient`]) so a
//! single bad field never takes down the document it belongs to.

use crate::format;
use crate::slot::Slot;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A routable page: metadata plus an ordered list of content slots.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::slug")]
    pub slug: Option<String>,
    /// Rendered as a visually hidden `h1`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub heading: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub og_image: Option<ImageRef>,
    /// Authored order is render order.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub content_slots: Vec<Slot>,
}

/// Reference into the content store's asset pipeline.
///
/// Either `asset._ref` (resolved by [`crate::images::ImageUrlBuilder`]) or a
/// direct `url` on the asset or on the image itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageRef {
    #[serde(default, deserialize_with = "lenient::option")]
    pub asset: Option<AssetRef>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssetRef {
    #[serde(default, rename = "_ref", deserialize_with = "lenient::text")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
}

/// A call-to-action button.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Cta {
    pub text: String,
    pub href: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub variant: CtaVariant,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub size: CtaSize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaVariant {
    #[default]
    Default,
    Link,
    Destructive,
    Outline,
    Secondary,
    Ghost,
}

impl CtaVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            CtaVariant::Default => "default",
            CtaVariant::Link => "link",
            CtaVariant::Destructive => "destructive",
            CtaVariant::Outline => "outline",
            CtaVariant::Secondary => "secondary",
            CtaVariant::Ghost => "ghost",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaSize {
    #[default]
    Default,
    Icon,
    Sm,
    Lg,
}

impl CtaSize {
    pub fn as_str(self) -> &'static str {
        match self {
            CtaSize::Default => "default",
            CtaSize::Icon => "icon",
            CtaSize::Sm => "sm",
            CtaSize::Lg => "lg",
        }
    }
}

/// Horizontal alignment shared by hero and text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

// ============================================================================
// Business directory
// ============================================================================

/// A business directory entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Business {
    #[serde(default, rename = "_id", deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::slug")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub address: Option<Address>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub logo: Option<ImageRef>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub hours: Option<WeeklyHours>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, deserialize_with = "lenient::text")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub zip_code: Option<String>,
}

impl Address {
    /// `City, ST 12345`, skipping whatever parts are missing.
    pub fn locality(&self) -> Option<String> {
        let region = [self.state.as_deref(), self.zip_code.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let line = match (self.city.as_deref(), region.is_empty()) {
            (Some(city), false) => format!("{city}, {region}"),
            (Some(city), true) => city.to_string(),
            (None, false) => region,
            (None, true) => return None,
        };
        Some(line)
    }
}

/// Free-text opening hours keyed by weekday. A missing day means closed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeeklyHours {
    #[serde(default, deserialize_with = "lenient::text")]
    pub monday: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tuesday: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub wednesday: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub thursday: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub friday: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub saturday: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sunday: Option<String>,
}

impl WeeklyHours {
    /// All seven days Monday first, with `None` for closed days.
    pub fn days(&self) -> [(&'static str, Option<&str>); 7] {
        [
            ("Monday", self.monday.as_deref()),
            ("Tuesday", self.tuesday.as_deref()),
            ("Wednesday", self.wednesday.as_deref()),
            ("Thursday", self.thursday.as_deref()),
            ("Friday", self.friday.as_deref()),
            ("Saturday", self.saturday.as_deref()),
            ("Sunday", self.sunday.as_deref()),
        ]
    }
}

// ============================================================================
// Announcements
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub link_text: Option<String>,
    #[serde(default, deserialize_with = "lenient::slug")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub icon: Option<AnnouncementIcon>,
}

impl Announcement {
    /// Active and inside its (possibly open-ended) date window.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && format::within_window(now, self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementIcon {
    Info,
    Alert,
    Calendar,
    Construction,
    Emergency,
}

impl AnnouncementIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            AnnouncementIcon::Info => "ℹ️",
            AnnouncementIcon::Alert => "⚠️",
            AnnouncementIcon::Calendar => "📅",
            AnnouncementIcon::Construction => "🚧",
            AnnouncementIcon::Emergency => "🚨",
        }
    }
}

// ============================================================================
// Lenient field decoding
// ============================================================================

/// `deserialize_with` helpers that never fail on authored content.
///
/// Each helper first buffers the field as a [`serde_json::Value`] and then
/// tries the real type, so a mistyped field degrades to its empty form
/// instead of failing the enclosing record.
pub mod lenient {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(option(deserializer)?.unwrap_or_default())
    }

    /// Non-array values become empty; elements that fail to decode are dropped.
    pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            _ => return Ok(Vec::new()),
        };
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    /// Strings only; empty strings count as absent.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            _ => None,
        })
    }

    /// Slugs arrive either as `{"current": "..."}` or as a bare string.
    pub fn slug<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let slug = match &value {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("current").and_then(Value::as_str),
            _ => None,
        };
        Ok(slug.filter(|s| !s.is_empty()).map(str::to_owned))
    }

    /// RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
    /// Anything unparseable counts as an absent bound.
    pub fn datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(deserializer)?.and_then(|s| parse_datetime(&s)))
    }

    pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    fn iso(dt: DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    #[test]
    fn announcement_inside_window_is_current() {
        let a: Announcement = serde_json::from_value(json!({
            "title": "Road work",
            "isActive": true,
            "startDate": iso(now() - Duration::days(1)),
            "endDate": iso(now() + Duration::days(1)),
        }))
        .unwrap();
        assert!(a.is_current(now()));
    }

    #[test]
    fn announcement_past_end_is_not_current() {
        let a: Announcement = serde_json::from_value(json!({
            "title": "Old news",
            "isActive": true,
            "endDate": iso(now() - Duration::days(1)),
        }))
        .unwrap();
        assert!(!a.is_current(now()));
    }

    #[test]
    fn inactive_announcement_is_never_current() {
        let a: Announcement = serde_json::from_value(json!({
            "title": "Hidden",
            "isActive": false,
            "startDate": iso(now() - Duration::days(1)),
            "endDate": iso(now() + Duration::days(1)),
        }))
        .unwrap();
        assert!(!a.is_current(now()));
    }

    #[test]
    fn announcement_without_dates_is_open_ended() {
        let a: Announcement =
            serde_json::from_value(json!({"title": "Always", "isActive": true})).unwrap();
        assert!(a.is_current(now()));
    }

    #[test]
    fn announcement_unknown_icon_is_dropped() {
        let a: Announcement =
            serde_json::from_value(json!({"title": "x", "icon": "fireworks"})).unwrap();
        assert_eq!(a.icon, None);
        let b: Announcement =
            serde_json::from_value(json!({"title": "x", "icon": "emergency"})).unwrap();
        assert_eq!(b.icon, Some(AnnouncementIcon::Emergency));
    }

    #[test]
    fn date_only_bounds_parse_as_midnight_utc() {
        let dt = lenient::parse_datetime("2026-10-14").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap());
        assert_eq!(lenient::parse_datetime("next tuesday"), None);
    }

    #[test]
    fn business_slug_accepts_object_or_string() {
        let a: Business =
            serde_json::from_value(json!({"name": "Cafe", "slug": {"current": "cafe"}})).unwrap();
        let b: Business = serde_json::from_value(json!({"name": "Cafe", "slug": "cafe"})).unwrap();
        assert_eq!(a.slug.as_deref(), Some("cafe"));
        assert_eq!(b.slug.as_deref(), Some("cafe"));
    }

    #[test]
    fn mistyped_fields_decode_as_absent() {
        let b: Business = serde_json::from_value(json!({
            "name": "Hardware",
            "phone": 2184376621u64,
            "featured": "yes",
            "logo": "not-an-image",
        }))
        .unwrap();
        assert_eq!(b.phone, None);
        assert!(!b.featured);
        assert_eq!(b.logo, None);
    }

    #[test]
    fn address_locality_skips_missing_parts() {
        let full = Address {
            street: None,
            city: Some("Argyle".into()),
            state: Some("MN".into()),
            zip_code: Some("56713".into()),
        };
        assert_eq!(full.locality().as_deref(), Some("Argyle, MN 56713"));

        let city_only = Address {
            city: Some("Argyle".into()),
            ..Default::default()
        };
        assert_eq!(city_only.locality().as_deref(), Some("Argyle"));
        assert_eq!(Address::default().locality(), None);
    }

    #[test]
    fn weekly_hours_lists_seven_days_monday_first() {
        let hours = WeeklyHours {
            monday: Some("8-5".into()),
            ..Default::default()
        };
        let days = hours.days();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], ("Monday", Some("8-5")));
        assert_eq!(days[6], ("Sunday", None));
    }

    #[test]
    fn cta_unknown_variant_falls_back_to_default() {
        let cta: Cta = serde_json::from_value(json!({
            "text": "Go",
            "href": "/go",
            "variant": "sparkly",
            "size": "lg",
        }))
        .unwrap();
        assert_eq!(cta.variant, CtaVariant::Default);
        assert_eq!(cta.size, CtaSize::Lg);
    }
}
