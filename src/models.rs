//! Data models shared by the crawl dispatcher, the extractors, and the
//! persistence pipeline:
//!
//! - [`Article`]: an accepted record, ready to be written to the store
//! - [`ArticleDraft`]: an extractor's candidate, before validation
//! - [`CrawlContext`]: metadata threaded between crawl stages
//! - [`Stage`], [`FollowUp`], [`Page`]: the dispatcher's working types
//!
//! An [`Article`] only ever comes into existence by promoting an
//! [`ArticleDraft`] that passed the validation gate; it is never mutated
//! afterwards.

use crate::utils::now_timestamp;
use serde::Serialize;
use url::Url;

/// An extracted newspaper article, accepted for persistence.
///
/// Field names mirror the store's columns (`cType`, `lable` and friends
/// keep their deployed spellings only at the SQL layer; here they get
/// ordinary Rust names).
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// Publication name, stored as `cType`.
    pub category: String,
    /// Wall-clock extraction time, `YYYY-MM-DD HH:MM:SS`.
    pub insert_time: String,
    /// Article headline.
    pub title: String,
    /// Article body text.
    pub body: String,
    /// Source URL the article was extracted from.
    pub href: String,
    /// Digits-only publish-date token recovered from the URL or page.
    pub send_time: String,
    /// Section label; only sites with sub-sections set this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Article {
    /// Promote a validated draft into a record, stamping the extraction
    /// time and the site's publication name.
    pub fn from_accepted(draft: ArticleDraft, category: &str) -> Self {
        Article {
            category: category.to_string(),
            insert_time: now_timestamp(),
            title: draft.title,
            body: draft.body,
            href: draft.href,
            send_time: draft.send_time,
            label: draft.label,
        }
    }
}

/// A candidate record as produced by an extractor's content stage.
///
/// `title` and `body` may be empty here — ad pages and section covers
/// routinely produce empty-ish drafts, and the validation gate is the
/// single place that decides their fate.
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub body: String,
    pub href: String,
    pub send_time: String,
    pub label: Option<String>,
}

/// Metadata carried from one crawl stage to the next.
///
/// Created once per seed request and cloned into every request spawned
/// downstream. A context is never mutated in place — stages that learn
/// something new (a section label, a layout era) extend a copy via the
/// `with_*` builders.
#[derive(Debug, Clone)]
pub struct CrawlContext {
    /// Base URL for relative-link resolution (the seed URL).
    pub base_url: Url,
    /// Section label gathered at the index stage, where the site has one.
    pub label: Option<String>,
    /// Historical URL-layout era, for sites that changed schemes
    /// mid-archive; selected by comparing the issue date against known
    /// cutover dates.
    pub era: Option<u8>,
}

impl CrawlContext {
    pub fn new(base_url: Url) -> Self {
        CrawlContext {
            base_url,
            label: None,
            era: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_era(mut self, era: u8) -> Self {
        self.era = Some(era);
        self
    }
}

/// Crawl stages after the seed request.
///
/// `Index` lists an issue's sections or articles, `Layout` is the
/// optional intermediate section page, `Content` is a single article and
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Index,
    Layout,
    Content,
}

/// A request an extractor asks the dispatcher to schedule next.
#[derive(Debug, Clone)]
pub struct FollowUp {
    pub url: String,
    pub stage: Stage,
    pub ctx: CrawlContext,
}

/// A fetched page, as handed to an extractor.
#[derive(Debug)]
pub struct Page {
    pub url: Url,
    pub body: String,
    pub ctx: CrawlContext,
}

impl Page {
    /// Resolve a possibly-relative link against this page's URL.
    pub fn resolve(&self, href: &str) -> Option<String> {
        self.url.join(href).ok().map(|u| u.to_string())
    }
}
