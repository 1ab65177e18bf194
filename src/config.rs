//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Stock defaults are
//! the base layer; the user file is merged on top key by key, then a small
//! set of environment variables override individual values (deployment
//! secrets and the listening port).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "City of Argyle"
//! tagline = "The Home in Hometown"
//! domain_url = "http://localhost:3000"   # Canonical links are built from this
//! default_description = "Argyle, Minnesota - putting the home in Hometown since 1879."
//! home_slug = "Homepage"                 # Page served at /
//!
//! [content]
//! project_id = "dtn82a1i"
//! dataset = "production"
//! api_version = "2024-06-01"
//! use_cdn = true
//! timeout_secs = 10
//! # fixtures = "fixtures/dataset.json"  # Serve from a local file instead
//!
//! [mail]
//! api_url = "https://api.resend.com/emails"
//! from = ""                 # or RESEND_FROM
//! to = ""                   # or RESEND_TO
//! subject_prefix = "Argyle"
//! timeout_secs = 10
//!
//! [server]
//! interface = "127.0.0.1"
//! port = 3000               # or PORT
//! workers = 4
//!
//! [colors]
//! primary = "#6B1F2D"
//! accent = "#DAA520"
//! background = "#ffffff"
//! surface = "#f7f3ee"
//! text = "#1f1f1f"
//! text_muted = "#5f5f5f"
//!
//! [office]
//! address = ["428 3rd Avenue NW", "Argyle, MN 56713"]
//! phone = "(218) 437-6621"
//! email = "argyle@wiktel.com"
//! hours = ["Monday - Friday", "9:00 AM - 4:00 PM"]
//!
//! [[nav]]
//! label = "Business"
//! href = "/business"
//!
//! [[footer]]
//! title = "Quick Links"
//! links = [{ label = "Contact Us", href = "/contact" }]
//! ```
//!
//! Arrays (`nav`, `footer`) replace the defaults wholesale rather than
//! merging element by element. Unknown keys are rejected to catch typos early.
//! The email API key is only ever read from `RESEND_API_KEY`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have defaults; a user file need only name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub content: ContentConfig,
    pub mail: MailConfig,
    pub server: ServerConfig,
    pub colors: ColorConfig,
    pub office: OfficeInfo,
    pub nav: Vec<NavLink>,
    pub footer: Vec<FooterGroup>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            content: ContentConfig::default(),
            mail: MailConfig::default(),
            server: ServerConfig::default(),
            colors: ColorConfig::default(),
            office: OfficeInfo::default(),
            nav: default_nav(),
            footer: default_footer(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".into()));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::Validation("server.workers must be at least 1".into()));
        }
        if let Some(link) = self
            .nav
            .iter()
            .find(|l| l.href.is_none() && l.children.is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "nav entry {:?} needs an href or children",
                link.label
            )));
        }
        if let Some((name, _)) = self.colors.entries().iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("colors.{name} must not be empty")));
        }
        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in the
    /// binary and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("RESEND_API_KEY").filter(|v| !v.is_empty()) {
            self.mail.api_key = Some(key);
        }
        if let Some(from) = lookup("RESEND_FROM") {
            self.mail.from = from;
        }
        if let Some(to) = lookup("RESEND_TO") {
            self.mail.to = to;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("PORT {port:?} is not a port number")))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    pub tagline: String,
    /// Base for canonical links, without a trailing slash.
    pub domain_url: String,
    /// Meta description for pages that have none of their own.
    pub default_description: String,
    /// Slug of the page served at `/`.
    pub home_slug: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "City of Argyle".into(),
            tagline: "The Home in Hometown".into(),
            domain_url: "http://localhost:3000".into(),
            default_description: "Argyle, Minnesota - putting the home in Hometown since 1879."
                .into(),
            home_slug: "Homepage".into(),
        }
    }
}

/// Where content comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Query the edge-cached API host instead of the live one.
    pub use_cdn: bool,
    pub timeout_secs: u64,
    /// Serve a local JSON document set instead of querying the hosted store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: "dtn82a1i".into(),
            dataset: "production".into(),
            api_version: "2024-06-01".into(),
            use_cdn: true,
            timeout_secs: 10,
            fixtures: None,
        }
    }
}

/// Outgoing email for the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailConfig {
    pub api_url: String,
    pub from: String,
    pub to: String,
    pub subject_prefix: String,
    pub timeout_secs: u64,
    /// From `RESEND_API_KEY` only.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.resend.com/emails".into(),
            from: String::new(),
            to: String::new(),
            subject_prefix: "Argyle".into(),
            timeout_secs: 10,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub interface: String,
    pub port: u16,
    /// Request-handling threads.
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            interface: "127.0.0.1".into(),
            port: 3000,
            workers: 4,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.interface, self.port)
    }
}

/// Brand palette, emitted as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub primary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_muted: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#6B1F2D".into(),
            accent: "#DAA520".into(),
            background: "#ffffff".into(),
            surface: "#f7f3ee".into(),
            text: "#1f1f1f".into(),
            text_muted: "#5f5f5f".into(),
        }
    }
}

impl ColorConfig {
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("primary", &self.primary),
            ("accent", &self.accent),
            ("background", &self.background),
            ("surface", &self.surface),
            ("text", &self.text),
            ("text_muted", &self.text_muted),
        ]
    }
}

/// City hall details shown in the footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OfficeInfo {
    pub address: Vec<String>,
    pub phone: String,
    pub email: String,
    pub hours: Vec<String>,
}

impl Default for OfficeInfo {
    fn default() -> Self {
        Self {
            address: vec!["428 3rd Avenue NW".into(), "Argyle, MN 56713".into()],
            phone: "(218) 437-6621".into(),
            email: "argyle@wiktel.com".into(),
            hours: vec!["Monday - Friday".into(), "9:00 AM - 4:00 PM".into()],
        }
    }
}

/// A top-level navigation entry: a link, a dropdown, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }

    /// Absolute `http(s)` links leave the site.
    pub fn is_external(&self) -> bool {
        self.href.starts_with("http://") || self.href.starts_with("https://")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterGroup {
    pub title: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

fn default_nav() -> Vec<NavLink> {
    vec![
        NavLink {
            label: "City Services".into(),
            href: None,
            children: vec![Link::new("History of Argyle", "/city-services/history")],
        },
        NavLink {
            label: "Business".into(),
            href: Some("/business".into()),
            children: Vec::new(),
        },
        NavLink {
            label: "Schools".into(),
            href: Some("/schools".into()),
            children: vec![Link::new("Stephen-Argyle Central", "http://www.sac.k12.mn.us/")],
        },
        NavLink {
            label: "Organizations".into(),
            href: None,
            children: vec![Link::new(
                "Argyle Fire Department",
                "/organizations/argyle-fire-department",
            )],
        },
        NavLink {
            label: "Contact Us".into(),
            href: Some("/contact".into()),
            children: Vec::new(),
        },
    ]
}

fn default_footer() -> Vec<FooterGroup> {
    vec![
        FooterGroup {
            title: "Quick Links".into(),
            links: vec![
                Link::new("City Office", "/city-services/city-office"),
                Link::new("City Council", "/city-services/city-council"),
                Link::new("History of Argyle", "/city-services/history"),
                Link::new("Contact Us", "/contact"),
            ],
        },
        FooterGroup {
            title: "Services".into(),
            links: vec![Link::new("Business Resources", "/business")],
        },
        FooterGroup {
            title: "Organizations".into(),
            links: vec![
                Link::new("Community Foundation", "/organizations/community-foundation"),
                Link::new("Fire Department", "/organizations/argyle-fire-department"),
            ],
        },
    ]
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `path` over the stock defaults, then apply environment overrides.
pub fn load_config<F>(path: &Path, env: F) -> Result<SiteConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    let mut config = resolve_config(base, overlay)?;
    config.apply_env(env)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Argyle Web Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Environment variables override the file:
#   RESEND_API_KEY  email API key (never put it in this file)
#   RESEND_FROM     mail.from
#   RESEND_TO       mail.to
#   PORT            server.port

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "City of Argyle"
tagline = "The Home in Hometown"

# Base URL for canonical links (no trailing slash).
domain_url = "http://localhost:3000"

# Meta description for pages without their own.
default_description = "Argyle, Minnesota - putting the home in Hometown since 1879."

# Slug of the page document served at "/".
home_slug = "Homepage"

# ---------------------------------------------------------------------------
# Content store
# ---------------------------------------------------------------------------
[content]
project_id = "dtn82a1i"
dataset = "production"
api_version = "2024-06-01"

# Use the edge-cached API host.
use_cdn = true

# Per-query timeout in seconds.
timeout_secs = 10

# Serve a local JSON document set instead of the hosted store:
#   { "pages": [...], "businesses": [...], "announcements": [...] }
# fixtures = "fixtures/dataset.json"

# ---------------------------------------------------------------------------
# Contact form email
# ---------------------------------------------------------------------------
[mail]
api_url = "https://api.resend.com/emails"
from = ""
to = ""

# Subject lines read "<prefix> | <subject>".
subject_prefix = "Argyle"
timeout_secs = 10

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
interface = "127.0.0.1"
port = 3000

# Request-handling threads.
workers = 4

# ---------------------------------------------------------------------------
# Colors (CSS custom properties)
# ---------------------------------------------------------------------------
[colors]
primary = "#6B1F2D"
accent = "#DAA520"
background = "#ffffff"
surface = "#f7f3ee"
text = "#1f1f1f"
text_muted = "#5f5f5f"

# ---------------------------------------------------------------------------
# City hall details (footer)
# ---------------------------------------------------------------------------
[office]
address = ["428 3rd Avenue NW", "Argyle, MN 56713"]
phone = "(218) 437-6621"
email = "argyle@wiktel.com"
hours = ["Monday - Friday", "9:00 AM - 4:00 PM"]

# ---------------------------------------------------------------------------
# Header navigation. Each entry needs an href, children, or both.
# Setting [[nav]] replaces the whole default menu.
# ---------------------------------------------------------------------------
[[nav]]
label = "City Services"
children = [{ label = "History of Argyle", href = "/city-services/history" }]

[[nav]]
label = "Business"
href = "/business"

[[nav]]
label = "Schools"
href = "/schools"
children = [{ label = "Stephen-Argyle Central", href = "http://www.sac.k12.mn.us/" }]

[[nav]]
label = "Organizations"
children = [{ label = "Argyle Fire Department", href = "/organizations/argyle-fire-department" }]

[[nav]]
label = "Contact Us"
href = "/contact"

# ---------------------------------------------------------------------------
# Footer link columns. Setting [[footer]] replaces all default columns.
# ---------------------------------------------------------------------------
[[footer]]
title = "Quick Links"
links = [
    { label = "City Office", href = "/city-services/city-office" },
    { label = "City Council", href = "/city-services/city-council" },
    { label = "History of Argyle", href = "/city-services/history" },
    { label = "Contact Us", href = "/contact" },
]

[[footer]]
title = "Services"
links = [{ label = "Business Resources", href = "/business" }]

[[footer]]
title = "Organizations"
links = [
    { label = "Community Foundation", href = "/organizations/community-foundation" },
    { label = "Fire Department", href = "/organizations/argyle-fire-department" },
]
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-primary: {primary};
    --color-accent: {accent};
    --color-bg: {background};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {text_muted};
}}"#,
        primary = colors.primary,
        accent = colors.accent,
        background = colors.background,
        surface = colors.surface,
        text = colors.text,
        text_muted = colors.text_muted,
    )
}
