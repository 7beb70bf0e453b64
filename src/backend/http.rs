// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Inertia-over-HTTP client for the admin class-fund pages.
//!
//! Page visits send `X-Inertia` and get the page object back as JSON. Form
//! posts answer with a redirect back to the referring page, which reqwest
//! follows, so every mutation also ends in a fresh page object. When the
//! server's asset version moved on it answers 409 and the page is fetched
//! again as plain HTML, reading the `data-page` attribute.

use std::cell::RefCell;

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_DISPOSITION, COOKIE, REFERER};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backend::{
    BulkMarkPaidRequest, CreateMeetingRequest, ExpenseRequest, ExportDocument, ExportRequest,
    KasBackend, MarkPaidRequest, RosterQuery, BULK_MARK_PAID_PATH, CREATE_MEETING_PATH,
    EXPENSE_PATH, EXPORT_PATH, KAS_PATH, MARK_PAID_PATH, ROSTER_PATH,
};
use crate::config::ClientConfig;
use crate::error::{FieldErrors, KasError, KasResult};
use crate::models::{Filters, InertiaPage, KasSnapshot, RosterSnapshot};
use crate::utils::{decode_entities, http_client, lenient_errors};

static DATA_PAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-page="([^"]*)""#).expect("static regex"));
static FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"filename\*?=(?:UTF-8'')?"?([^";]+)"?"#).expect("static regex")
});

/// Pull the page object out of a full HTML response.
pub fn extract_page_json(html: &str) -> Option<String> {
    DATA_PAGE.captures(html).map(|c| decode_entities(&c[1]))
}

pub fn filename_from_disposition(header: &str) -> Option<String> {
    FILENAME
        .captures(header)
        .map(|c| c[1].trim().to_string())
        .filter(|f| !f.is_empty())
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_errors")]
    errors: FieldErrors,
}

pub struct HttpBackend {
    client: Client,
    base: Url,
    cookie: Option<String>,
    xsrf_token: Option<String>,
    version: RefCell<Option<String>>,
    referer: RefCell<Option<String>>,
}

fn parse_base(raw: &str) -> KasResult<Url> {
    let mut text = raw.trim().to_string();
    if !text.ends_with('/') {
        text.push('/');
    }
    Url::parse(&text).map_err(|e| KasError::BadUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

impl HttpBackend {
    pub fn new(cfg: &ClientConfig) -> anyhow::Result<Self> {
        let client = http_client(cfg.timeout_secs)?;
        let base = parse_base(&cfg.base_url)
            .with_context(|| format!("Bad base_url '{}'", cfg.base_url))?;
        Ok(Self {
            client,
            base,
            cookie: cfg.cookie.clone(),
            xsrf_token: cfg.xsrf_token.clone(),
            version: RefCell::new(None),
            referer: RefCell::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Asset version learned from the last page object.
    pub fn version(&self) -> Option<String> {
        self.version.borrow().clone()
    }

    pub fn url(&self, path: &str, query: &[(&'static str, String)]) -> KasResult<Url> {
        let mut url = self.base.join(path).map_err(|e| KasError::BadUrl {
            url: path.to_string(),
            reason: e.to_string(),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn session(&self, mut rb: RequestBuilder) -> RequestBuilder {
        if let Some(c) = &self.cookie {
            rb = rb.header(COOKIE, c);
        }
        if let Some(t) = &self.xsrf_token {
            rb = rb.header("X-XSRF-TOKEN", t);
        }
        rb
    }

    fn inertia(&self, rb: RequestBuilder) -> KasResult<RequestBuilder> {
        let mut rb = rb
            .header("X-Inertia", "true")
            .header("X-Requested-With", "XMLHttpRequest")
            .header(ACCEPT, "text/html, application/xhtml+xml");
        if let Some(v) = self.version.borrow().as_deref() {
            rb = rb.header("X-Inertia-Version", v);
        }
        rb = rb.header(REFERER, self.referer()?);
        Ok(self.session(rb))
    }

    /// Posts redirect back to this page, so it must be the class-fund page.
    fn referer(&self) -> KasResult<String> {
        if let Some(r) = self.referer.borrow().as_ref() {
            return Ok(r.clone());
        }
        Ok(self.url(KAS_PATH, &[])?.to_string())
    }

    fn remember(&self, version: Option<String>) {
        let mut current = self.version.borrow_mut();
        if version.is_some() && *current != version {
            log::debug!("asset version now {:?}", version);
            *current = version;
        }
    }

    fn visit<P: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> KasResult<(Url, P)> {
        let url = self.url(path, query)?;
        log::debug!("GET {}", url);
        let resp = self.inertia(self.client.get(url))?.send()?;
        self.read_page(resp)
    }

    fn submit<P: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> KasResult<P> {
        let url = self.url(path, &[])?;
        log::debug!("POST {}", url);
        let resp = self.inertia(self.client.post(url))?.json(body).send()?;
        self.read_page(resp).map(|(_, props)| props)
    }

    fn read_page<P: DeserializeOwned>(&self, resp: Response) -> KasResult<(Url, P)> {
        let url = resp.url().clone();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text()?;
        match classify_page_response(status, &url, &headers, &body)? {
            PageReply::Page(json) => self.decode_page(&url, &json),
            PageReply::Reload(location) => {
                log::info!("asset version mismatch, reloading {}", location);
                self.reload_html(&location)
            }
        }
    }

    fn reload_html<P: DeserializeOwned>(&self, location: &str) -> KasResult<(Url, P)> {
        let resp = self
            .session(self.client.get(location))
            .header(ACCEPT, "text/html")
            .send()?;
        let url = resp.url().clone();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text()?;
        match classify_page_response(status, &url, &headers, &body)? {
            PageReply::Page(json) => self.decode_page(&url, &json),
            // A second version bump right after a full reload is not retried.
            PageReply::Reload(_) => Err(KasError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }

    fn decode_page<P: DeserializeOwned>(&self, url: &Url, json: &str) -> KasResult<(Url, P)> {
        let page: InertiaPage<P> = serde_json::from_str(json)?;
        log::debug!("{} -> {}", url, page.component);
        self.remember(page.version);
        Ok((url.clone(), page.props))
    }

    fn mutate<B: Serialize>(&self, path: &str, body: &B) -> KasResult<KasSnapshot> {
        check_redirected_page(self.submit(path, body)?)
    }
}

/// What a page response asks the client to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageReply {
    /// Page object JSON, taken from the body or from the HTML `data-page`.
    Page(String),
    /// The asset version changed; fetch this location as a full page.
    Reload(String),
}

/// Sort a page response into a page object, a reload or an error.
pub fn classify_page_response(
    status: StatusCode,
    url: &Url,
    headers: &HeaderMap,
    body: &str,
) -> KasResult<PageReply> {
    if status == StatusCode::CONFLICT {
        let location = headers
            .get("x-inertia-location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string());
        return Ok(PageReply::Reload(location));
    }
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        let body: ValidationBody = serde_json::from_str(body)?;
        if body.errors.is_empty() {
            return Err(KasError::Server(
                body.message.unwrap_or_else(|| "validation failed".into()),
            ));
        }
        return Err(KasError::Validation(body.errors));
    }
    if !status.is_success() {
        return Err(KasError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    if headers.contains_key("x-inertia") {
        return Ok(PageReply::Page(body.to_string()));
    }
    extract_page_json(body)
        .map(PageReply::Page)
        .ok_or_else(|| KasError::MissingPage(url.to_string()))
}

/// Posts end in a redirect back; errors ride on the redirected page.
pub fn check_redirected_page(snapshot: KasSnapshot) -> KasResult<KasSnapshot> {
    if !snapshot.errors.is_empty() {
        return Err(KasError::Validation(snapshot.errors));
    }
    if let Some(msg) = &snapshot.flash.error {
        return Err(KasError::Server(msg.clone()));
    }
    Ok(snapshot)
}

impl KasBackend for HttpBackend {
    fn load(&self, filters: &Filters) -> KasResult<KasSnapshot> {
        let (url, snapshot) = self.visit(KAS_PATH, &filters.query_pairs())?;
        *self.referer.borrow_mut() = Some(url.to_string());
        Ok(snapshot)
    }

    fn mark_paid(&self, req: &MarkPaidRequest) -> KasResult<KasSnapshot> {
        self.mutate(MARK_PAID_PATH, req)
    }

    fn bulk_mark_paid(&self, req: &BulkMarkPaidRequest) -> KasResult<KasSnapshot> {
        self.mutate(BULK_MARK_PAID_PATH, req)
    }

    fn record_expense(&self, req: &ExpenseRequest) -> KasResult<KasSnapshot> {
        self.mutate(EXPENSE_PATH, req)
    }

    fn create_meeting(&self, req: &CreateMeetingRequest) -> KasResult<KasSnapshot> {
        self.mutate(CREATE_MEETING_PATH, req)
    }

    fn export_url(&self, req: &ExportRequest) -> KasResult<String> {
        Ok(self.url(EXPORT_PATH, &req.query_pairs())?.to_string())
    }

    fn download(&self, req: &ExportRequest) -> KasResult<ExportDocument> {
        let url = self.url(EXPORT_PATH, &req.query_pairs())?;
        log::debug!("GET {} (download)", url);
        let resp = self.session(self.client.get(url.clone())).send()?;
        if !resp.status().is_success() {
            return Err(KasError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        let filename = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| req.default_filename());
        let bytes = resp.bytes()?.to_vec();
        Ok(ExportDocument {
            url: url.to_string(),
            filename,
            bytes,
        })
    }

    fn roster(&self, query: &RosterQuery) -> KasResult<RosterSnapshot> {
        self.visit(ROSTER_PATH, &query.query_pairs())
            .map(|(_, snapshot)| snapshot)
    }
}
