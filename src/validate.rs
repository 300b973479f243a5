//! The validation gate between extraction and persistence.
//!
//! Epaper archives are full of pages that parse cleanly but are not
//! articles: full-page ads, section covers, lottery tables, digest
//! listings. The gate drops them on two cheap signals — a missing title
//! and a too-short body — plus per-site denylists of boilerplate titles.
//! Rejection is the expected common case and is not an error.

use crate::models::ArticleDraft;

/// Minimum body length, in characters, for a draft to count as an
/// article. Strictly greater-than: a 100-character body is rejected.
pub const MIN_BODY_CHARS: usize = 100;

/// Boilerplate titles dropped by most metro dailies.
pub const BOILERPLATE_TITLES: &[&str] = &["广告", "本报信息"];

/// Digest/notice titles dropped by the securities daily.
pub const DIGEST_TITLES: &[&str] = &["导读", "今日导读", "特别提示", "今日公告导读"];

/// Title substrings that mark a page as an ad regardless of exact title.
pub const AD_SUBSTRINGS: &[&str] = &["广告"];

/// Per-site acceptance rules for extracted drafts.
#[derive(Debug, Clone, Copy)]
pub struct ValidationPolicy {
    pub min_body_chars: usize,
    /// Titles rejected by exact match.
    pub deny_titles: &'static [&'static str],
    /// Substrings whose presence in the title rejects the draft.
    pub deny_title_substrings: &'static [&'static str],
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::plain()
    }
}

impl ValidationPolicy {
    /// Title and body length checks only.
    pub const fn plain() -> Self {
        ValidationPolicy {
            min_body_chars: MIN_BODY_CHARS,
            deny_titles: &[],
            deny_title_substrings: &[],
        }
    }

    pub const fn deny_titles(titles: &'static [&'static str]) -> Self {
        ValidationPolicy {
            min_body_chars: MIN_BODY_CHARS,
            deny_titles: titles,
            deny_title_substrings: &[],
        }
    }

    pub const fn deny_title_substrings(substrings: &'static [&'static str]) -> Self {
        ValidationPolicy {
            min_body_chars: MIN_BODY_CHARS,
            deny_titles: &[],
            deny_title_substrings: substrings,
        }
    }

    /// Decide whether a draft becomes a record.
    ///
    /// The title check runs first and short-circuits: a draft with no
    /// title is rejected before the body is even looked at. Body length
    /// counts characters, not bytes — the bodies are CJK text and the
    /// threshold has always meant characters.
    pub fn accept(&self, draft: &ArticleDraft) -> bool {
        if draft.title.is_empty() {
            return false;
        }
        if draft.body.chars().count() <= self.min_body_chars {
            return false;
        }
        if self.deny_titles.contains(&draft.title.as_str()) {
            return false;
        }
        !self
            .deny_title_substrings
            .iter()
            .any(|s| draft.title.contains(s))
    }
}
