//! HTTP server.
//!
//! [`App::handle`] maps one request (method, URL, body) to a [`Reply`] and
//! touches no sockets, so the whole route table is testable. [`serve`] binds a
//! `tiny_http` server and hands each request to a rayon pool.
//!
//! HEAD gets the same [`Reply`] as GET; only [`serve`] drops the body on the
//! wire, so `Content-Length` still carries the GET length.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET/HEAD | `/` | [`Site::home`] |
//! | GET/HEAD | `/business[?category=c]` | [`Site::business_index`] |
//! | GET/HEAD | `/business/{slug}` | [`Site::business_detail`] |
//! | GET/HEAD | `/organizations/{slug}` | [`Site::organization`] |
//! | GET/HEAD | `/contact` | [`Site::contact`] |
//! | POST | `/api/contact` | [`contact::handle_submission`] |
//! | GET/HEAD | `/{slug}` | [`Site::page`] |

use crate::config::ServerConfig;
use crate::contact::{self, Mailer};
use crate::pages::Site;
use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use serde_json::json;
use std::io::{self, Cursor, Read};
use std::sync::Arc;
use thiserror::Error;
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Contact form bodies are small; anything larger is refused unread.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },
    #[error("failed to create worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Other,
}

impl Method {
    fn is_read(self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }
}

impl From<&tiny_http::Method> for Method {
    fn from(m: &tiny_http::Method) -> Self {
        match m {
            tiny_http::Method::Get => Method::Get,
            tiny_http::Method::Head => Method::Head,
            tiny_http::Method::Post => Method::Post,
            _ => Method::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Page(String),
    BusinessIndex { category: Option<String> },
    BusinessDetail(String),
    Organization(String),
    Contact,
    ContactApi,
    NotFound,
}

/// Resolve a request target. Trailing slashes are ignored and segments are
/// percent-decoded; undecodable paths are not found.
pub fn route(target: &str) -> Route {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let Ok(segments) = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8().map(|c| c.into_owned()))
        .collect::<Result<Vec<String>, _>>()
    else {
        return Route::NotFound;
    };

    match segments.as_slice() {
        [] => Route::Home,
        [one] if one == "business" => Route::BusinessIndex {
            category: query_param(query, "category"),
        },
        [one, slug] if one == "business" => Route::BusinessDetail(slug.clone()),
        [one, slug] if one == "organizations" => Route::Organization(slug.clone()),
        [one] if one == "contact" => Route::Contact,
        [api, contact] if api == "api" && contact == "contact" => Route::ContactApi,
        [slug] => Route::Page(slug.clone()),
        _ => Route::NotFound,
    }
}

/// First non-empty value of `name` in a query string.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| *key == name)
        .filter_map(|(_, value)| {
            percent_decode_str(&value.replace('+', " "))
                .decode_utf8()
                .ok()
                .map(|v| v.into_owned())
        })
        .find(|v| !v.is_empty())
}

/// A complete response, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Value for the `Allow` header on 405 replies.
    pub allow: Option<&'static str>,
}

impl Reply {
    fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: HTML,
            body: body.into_bytes(),
            allow: None,
        }
    }

    fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: JSON,
            body: value.to_string().into_bytes(),
            allow: None,
        }
    }

    fn method_not_allowed(allow: &'static str) -> Self {
        Self {
            allow: Some(allow),
            ..Self::json(405, &json!({ "success": false, "error": "Method not allowed." }))
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct App {
    site: Site,
    mailer: Box<dyn Mailer>,
}

impl App {
    pub fn new(site: Site, mailer: Box<dyn Mailer>) -> Self {
        Self { site, mailer }
    }

    pub fn handle(&self, method: Method, target: &str, body: &[u8], now: DateTime<Utc>) -> Reply {
        let route = route(target);

        if route == Route::ContactApi {
            if method != Method::Post {
                return Reply::method_not_allowed("POST");
            }
            let reply = contact::handle_submission(body, self.mailer.as_ref(), &self.site.config().mail);
            return Reply::json(reply.status, &reply.body);
        }
        if !method.is_read() {
            return Reply::method_not_allowed("GET, HEAD");
        }

        let doc = match &route {
            Route::Home => self.site.home(now),
            Route::Page(slug) => self.site.page(slug, now),
            Route::BusinessIndex { category } => self.site.business_index(category.as_deref(), now),
            Route::BusinessDetail(slug) => self.site.business_detail(slug, now),
            Route::Organization(slug) => self.site.organization(slug, now),
            Route::Contact => self.site.contact(now),
            Route::ContactApi | Route::NotFound => self.site.not_found(now),
        };
        Reply::html(doc.status, doc.markup.into_string())
    }
}

// ============================================================================
// Server loop
// ============================================================================

/// Bind and serve until the process is stopped.
pub fn serve(app: App, config: &ServerConfig) -> Result<(), ServeError> {
    let addr = config.bind_addr();
    let server = Server::http(&addr).map_err(|e| ServeError::Bind {
        addr: addr.clone(),
        message: e.to_string(),
    })?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;
    log::info!("listening on http://{addr} with {} workers", config.workers);

    let app = Arc::new(app);
    for request in server.incoming_requests() {
        let app = Arc::clone(&app);
        pool.spawn(move || {
            if let Err(e) = respond(&app, request) {
                log::warn!("request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn respond(app: &App, mut request: Request) -> Result<(), ServeError> {
    let method = Method::from(request.method());
    let target = request.url().to_string();

    let reply = if request.body_length().is_some_and(|n| n as u64 > MAX_BODY_BYTES) {
        Reply::json(413, &json!({ "success": false, "error": "Request body too large." }))
    } else {
        let mut body = Vec::new();
        request
            .as_reader()
            .take(MAX_BODY_BYTES + 1)
            .read_to_end(&mut body)?;
        if body.len() as u64 > MAX_BODY_BYTES {
            Reply::json(413, &json!({ "success": false, "error": "Request body too large." }))
        } else {
            app.handle(method, &target, &body, Utc::now())
        }
    };

    log::info!("{} {} {}", request.method(), target, reply.status);

    let status = StatusCode(reply.status);
    let headers = reply_headers(&reply);
    let length = reply.body.len();
    if method == Method::Head {
        request.respond(Response::new(status, headers, io::empty(), Some(length), None))?;
    } else {
        request.respond(Response::new(status, headers, Cursor::new(reply.body), Some(length), None))?;
    }
    Ok(())
}

fn reply_headers(reply: &Reply) -> Vec<Header> {
    let mut headers = Vec::new();
    if let Ok(h) = Header::from_bytes("Content-Type", reply.content_type) {
        headers.push(h);
    }
    if let Some(allow) = reply.allow
        && let Ok(h) = Header::from_bytes("Allow", allow)
    {
        headers.push(h);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_resolve() {
        assert_eq!(route("/"), Route::Home);
        assert_eq!(route(""), Route::Home);
        assert_eq!(route("/history"), Route::Page("history".into()));
        assert_eq!(route("/history/"), Route::Page("history".into()));
        assert_eq!(route("/business"), Route::BusinessIndex { category: None });
        assert_eq!(route("/business/cafe"), Route::BusinessDetail("cafe".into()));
        assert_eq!(
            route("/organizations/argyle-fire-department"),
            Route::Organization("argyle-fire-department".into())
        );
        assert_eq!(route("/organizations"), Route::Page("organizations".into()));
        assert_eq!(route("/contact"), Route::Contact);
        assert_eq!(route("/api/contact"), Route::ContactApi);
        assert_eq!(route("/a/b/c"), Route::NotFound);
    }

    #[test]
    fn query_string_is_ignored_except_category() {
        assert_eq!(route("/contact?ref=footer"), Route::Contact);
        assert_eq!(
            route("/business?page=2&category=city%2Dservices"),
            Route::BusinessIndex {
                category: Some("city-services".into())
            }
        );
        assert_eq!(route("/business?category="), Route::BusinessIndex { category: None });
    }

    #[test]
    fn segments_are_percent_decoded() {
        assert_eq!(route("/city%20hall"), Route::Page("city hall".into()));
        assert_eq!(route("/%FF"), Route::NotFound);
    }

    #[test]
    fn reply_headers_carry_content_type_and_allow() {
        let reply = Reply::method_not_allowed("POST");
        let headers: Vec<String> = reply_headers(&reply)
            .iter()
            .map(|h| format!("{}: {}", h.field, h.value))
            .collect();
        assert_eq!(headers, ["Content-Type: application/json", "Allow: POST"]);
    }
}
