//! Markup extraction for each supported archive site.
//!
//! This module is the pluggable seam between the generic crawl
//! dispatcher and the per-site selector sets. Each site supplies an
//! [`Extractor`] with one method per crawl stage:
//!
//! 1. **index**: an issue's front page — yields the section ("layout")
//!    pages of that day, or content links directly where the site lists
//!    articles without an intermediate level
//! 2. **layout**: a section page — yields content links
//! 3. **content**: a single article page — yields at most one draft
//!
//! Extractors are looked up by site name in a registry table; the
//! matching crawl plan lives in [`crate::sites`] under the same name.
//!
//! # Supported Sites
//!
//! | Site | Extractor | Shape |
//! |------|-----------|-------|
//! | gmrb, rmrb | [`FounderExtractor`] | index → layout → content |
//! | bj | [`BeijingEveningExtractor`] | three stages, section label threaded through |
//! | szsb | [`ShenzhenLayoutExtractor`] | three stages, compact date URLs |
//! | zqsb | [`StcnExtractor`] | era-dependent: eras 2–4 skip the layout level |

use crate::models::{ArticleDraft, FollowUp, Page};
use once_cell::sync::Lazy;
use scraper::Selector;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

mod bjwb;
mod founder;
mod stcn;
mod sznews;

pub use bjwb::BeijingEveningExtractor;
pub use founder::FounderExtractor;
pub use stcn::StcnExtractor;
pub use sznews::ShenzhenLayoutExtractor;

/// Expected markup was absent from a fetched page.
///
/// This is a per-page condition: the dispatcher logs it and moves on to
/// sibling pages, it never aborts the crawl.
#[derive(Debug)]
pub struct ExtractError(pub String);

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "extraction failed: {}", self.0)
    }
}

impl Error for ExtractError {}

/// What one index or layout page produced: candidate drafts (rare at
/// these stages, but part of the contract) and requests to schedule.
#[derive(Debug, Default)]
pub struct ExtractOutput {
    pub drafts: Vec<ArticleDraft>,
    pub follow_ups: Vec<FollowUp>,
}

impl ExtractOutput {
    pub fn follow_ups(follow_ups: Vec<FollowUp>) -> Self {
        ExtractOutput {
            drafts: Vec::new(),
            follow_ups,
        }
    }
}

/// Site-specific markup logic, one method per crawl stage.
///
/// An extractor holds no mutable state; anything a later stage needs
/// from an earlier one travels in the page's [`crate::models::CrawlContext`].
pub trait Extractor: Send + Sync {
    /// Parse an issue's front page.
    fn index(&self, page: &Page) -> Result<ExtractOutput, ExtractError>;

    /// Parse a section page. Two-stage sites never receive one.
    fn layout(&self, _page: &Page) -> Result<ExtractOutput, ExtractError> {
        Ok(ExtractOutput::default())
    }

    /// Parse an article page into at most one draft.
    ///
    /// A draft with an empty title or a thin body is still returned —
    /// deciding what counts as an article is the validation gate's job,
    /// not the extractor's. `Err` means the page's expected structure was
    /// missing entirely.
    fn content(&self, page: &Page) -> Result<Option<ArticleDraft>, ExtractError>;
}

/// Parse a selector that is a compile-time constant.
fn sel(css: &'static str) -> Selector {
    Selector::parse(css).unwrap()
}

static REGISTRY: Lazy<HashMap<&'static str, Arc<dyn Extractor>>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, Arc<dyn Extractor>> = HashMap::new();
    table.insert("gmrb", Arc::new(FounderExtractor::default()));
    table.insert("rmrb", Arc::new(FounderExtractor::default()));
    table.insert("bj", Arc::new(BeijingEveningExtractor));
    table.insert("szsb", Arc::new(ShenzhenLayoutExtractor));
    table.insert("zqsb", Arc::new(StcnExtractor));
    table
});

/// Look up the extractor registered for a site name.
pub fn extractor_for(name: &str) -> Option<Arc<dyn Extractor>> {
    REGISTRY.get(name).cloned()
}
