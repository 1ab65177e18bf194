//! Content store access.
//!
//! [`ContentStore`] is the read-only interface the page controllers use.
//! Absence is `Ok(None)`, never an error; errors are reserved for the store
//! itself failing. Two implementations:
//!
//! - [`SanityClient`]: GROQ over HTTP against the hosted store.
//! - [`FileStore`]: an in-memory document set loaded from a JSON file, for
//!   offline development and tests.
//!
//! Every request fetches fresh; nothing is cached here.

use crate::config::ContentConfig;
use crate::types::{Announcement, Business, Page};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BusinessOrder {
    #[default]
    Name,
    /// Featured entries first, each group by name.
    FeaturedFirst,
}

#[derive(Debug, Clone, Default)]
pub struct BusinessQuery {
    pub order: BusinessOrder,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl BusinessQuery {
    pub fn featured_first() -> Self {
        Self {
            order: BusinessOrder::FeaturedFirst,
            ..Self::default()
        }
    }
}

pub trait ContentStore: Send + Sync {
    fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, ContentError>;

    fn businesses(&self, query: &BusinessQuery) -> Result<Vec<Business>, ContentError>;

    fn business_by_slug(&self, slug: &str) -> Result<Option<Business>, ContentError>;

    fn announcements(
        &self,
        active_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Announcement>, ContentError>;
}

/// Open the store described by the config: the fixture file when one is
/// set, the hosted store otherwise.
pub fn open_store(config: &ContentConfig) -> Result<Box<dyn ContentStore>, ContentError> {
    match &config.fixtures {
        Some(path) => {
            log::info!("serving content from {}", path.display());
            Ok(Box::new(FileStore::load(path)?))
        }
        None => Ok(Box::new(SanityClient::new(config)?)),
    }
}

/// Stable sort applying the requested ordering. Names compare
/// case-insensitively.
pub fn order_businesses(businesses: &mut [Business], order: BusinessOrder) {
    let by_name = |a: &Business, b: &Business| a.name.to_lowercase().cmp(&b.name.to_lowercase());
    match order {
        BusinessOrder::Name => businesses.sort_by(by_name),
        BusinessOrder::FeaturedFirst => businesses.sort_by(|a, b| match (a.featured, b.featured) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => by_name(a, b),
        }),
    }
}

/// Decode each element on its own so one bad record drops out of the list
/// instead of failing it.
fn decode_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Non-object results count as absent.
fn decode_one<T: DeserializeOwned>(value: Value) -> Option<T> {
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

// ============================================================================
// Hosted store
// ============================================================================

const PAGE_QUERY: &str = r#"*[_type == "page" && slug.current == $slug][0]{
  title, slug, heading, description, ogImage,
  contentSlots[]{ _type, _key, ... }
}"#;

const BUSINESS_FIELDS: &str =
    "_id, name, slug, address, phone, website, email, description, category, logo, hours, featured";

pub struct SanityClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

impl SanityClient {
    pub fn new(config: &ContentConfig) -> Result<Self, ContentError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: query_endpoint(config),
        })
    }

    fn query(&self, groq: &str, params: &[(&str, Value)]) -> Result<Value, ContentError> {
        log::debug!("content query: {}", groq.split_whitespace().collect::<Vec<_>>().join(" "));
        let response = self
            .http
            .get(&self.endpoint)
            .query(&query_params(groq, params))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ContentError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: QueryResponse = response.json()?;
        Ok(parsed.result)
    }
}

pub fn query_endpoint(config: &ContentConfig) -> String {
    let host = if config.use_cdn { "apicdn" } else { "api" };
    format!(
        "https://{}.{host}.sanity.io/v{}/data/query/{}",
        config.project_id, config.api_version, config.dataset
    )
}

/// `query=<groq>` plus one `$name=<json>` pair per parameter.
pub fn query_params(groq: &str, params: &[(&str, Value)]) -> Vec<(String, String)> {
    let mut pairs = vec![("query".to_string(), groq.to_string())];
    pairs.extend(
        params
            .iter()
            .map(|(name, value)| (format!("${name}"), value.to_string())),
    );
    pairs
}

pub fn businesses_query(query: &BusinessQuery) -> String {
    let filter = if query.category.is_some() {
        r#"_type == "business" && category == $category"#
    } else {
        r#"_type == "business""#
    };
    let order = match query.order {
        BusinessOrder::Name => "name asc",
        BusinessOrder::FeaturedFirst => "featured desc, name asc",
    };
    let slice = query
        .limit
        .map(|n| format!("[0...{n}]"))
        .unwrap_or_default();
    format!("*[{filter}] | order({order}){slice} {{ {BUSINESS_FIELDS} }}")
}

pub fn announcements_query(active_only: bool, limit: Option<usize>) -> String {
    let filter = if active_only {
        r#"_type == "announcement" && isActive == true"#
    } else {
        r#"_type == "announcement""#
    };
    let slice = limit.map(|n| format!("[0...{n}]")).unwrap_or_default();
    format!(
        "*[{filter}] | order(startDate desc){slice} {{ title, isActive, startDate, endDate, link, linkText, slug, icon }}"
    )
}

impl ContentStore for SanityClient {
    fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, ContentError> {
        let result = self.query(PAGE_QUERY, &[("slug", Value::from(slug))])?;
        Ok(decode_one(result))
    }

    fn businesses(&self, query: &BusinessQuery) -> Result<Vec<Business>, ContentError> {
        let params: Vec<(&str, Value)> = query
            .category
            .as_deref()
            .map(|c| ("category", Value::from(c)))
            .into_iter()
            .collect();
        let result = self.query(&businesses_query(query), &params)?;
        let mut businesses = decode_list(result);
        order_businesses(&mut businesses, query.order);
        Ok(businesses)
    }

    fn business_by_slug(&self, slug: &str) -> Result<Option<Business>, ContentError> {
        let groq = format!(
            r#"*[_type == "business" && slug.current == $slug][0] {{ {BUSINESS_FIELDS} }}"#
        );
        let result = self.query(&groq, &[("slug", Value::from(slug))])?;
        Ok(decode_one(result))
    }

    fn announcements(
        &self,
        active_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Announcement>, ContentError> {
        let result = self.query(&announcements_query(active_only, limit), &[])?;
        Ok(decode_list(result))
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// A document set held in memory.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    pages: Vec<Page>,
    businesses: Vec<Business>,
    announcements: Vec<Announcement>,
}

#[derive(Deserialize)]
struct Dataset {
    #[serde(default)]
    pages: Value,
    #[serde(default)]
    businesses: Value,
    #[serde(default)]
    announcements: Value,
}

impl FileStore {
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let dataset: Dataset = serde_json::from_str(json)?;
        Ok(Self {
            pages: decode_list(dataset.pages),
            businesses: decode_list(dataset.businesses),
            announcements: decode_list(dataset.announcements),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl ContentStore for FileStore {
    fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, ContentError> {
        Ok(self
            .pages
            .iter()
            .find(|p| p.slug.as_deref() == Some(slug))
            .cloned())
    }

    fn businesses(&self, query: &BusinessQuery) -> Result<Vec<Business>, ContentError> {
        let mut list: Vec<Business> = self
            .businesses
            .iter()
            .filter(|b| {
                query
                    .category
                    .as_deref()
                    .is_none_or(|c| b.category.as_deref() == Some(c))
            })
            .cloned()
            .collect();
        order_businesses(&mut list, query.order);
        if let Some(limit) = query.limit {
            list.truncate(limit);
        }
        Ok(list)
    }

    fn business_by_slug(&self, slug: &str) -> Result<Option<Business>, ContentError> {
        Ok(self
            .businesses
            .iter()
            .find(|b| b.slug.as_deref() == Some(slug))
            .cloned())
    }

    fn announcements(
        &self,
        active_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Announcement>, ContentError> {
        let mut list: Vec<Announcement> = self
            .announcements
            .iter()
            .filter(|a| !active_only || a.is_active)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        if let Some(limit) = limit {
            list.truncate(limit);
        }
        Ok(list)
    }
}
