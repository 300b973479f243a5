//! Extractor for Founder CMS archives (光明日报, 人民日报 and most of the
//! other broadsheets share this exact page structure).
//!
//! The issue's front page links every layout page through `a#pageLink`;
//! each layout page lists its articles in `#titleList`; article pages
//! keep their text in `#articleContent`. The publish date rides in the
//! second `_`-separated segment of the content URL
//! (`nw.D110000gmrb_20190104_1-01.htm`).

use super::{ExtractError, ExtractOutput, Extractor, sel};
use crate::models::{ArticleDraft, FollowUp, Page, Stage};
use crate::utils::digits;
use scraper::Html;

pub struct FounderExtractor {
    title_css: &'static str,
    body_css: &'static str,
    container_css: &'static str,
}

impl Default for FounderExtractor {
    fn default() -> Self {
        FounderExtractor {
            title_css: "h1",
            body_css: "#articleContent p",
            container_css: "#articleContent",
        }
    }
}

impl Extractor for FounderExtractor {
    fn index(&self, page: &Page) -> Result<ExtractOutput, ExtractError> {
        let document = Html::parse_document(&page.body);
        let mut follow_ups = Vec::new();
        for element in document.select(&sel("a#pageLink")) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = page.resolve(href) {
                    follow_ups.push(FollowUp {
                        url,
                        stage: Stage::Layout,
                        ctx: page.ctx.clone(),
                    });
                }
            }
        }
        Ok(ExtractOutput::follow_ups(follow_ups))
    }

    fn layout(&self, page: &Page) -> Result<ExtractOutput, ExtractError> {
        let document = Html::parse_document(&page.body);
        let mut follow_ups = Vec::new();
        for element in document.select(&sel("#titleList ul li a")) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = page.resolve(href) {
                    follow_ups.push(FollowUp {
                        url,
                        stage: Stage::Content,
                        ctx: page.ctx.clone(),
                    });
                }
            }
        }
        Ok(ExtractOutput::follow_ups(follow_ups))
    }

    fn content(&self, page: &Page) -> Result<Option<ArticleDraft>, ExtractError> {
        let document = Html::parse_document(&page.body);

        if document.select(&sel(self.container_css)).next().is_none() {
            return Err(ExtractError(format!(
                "{} missing from {}",
                self.container_css, page.url
            )));
        }

        let title = document
            .select(&sel(self.title_css))
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        // Paragraph text first; some older issues keep bare text nodes
        // directly under the container instead.
        let mut body = document
            .select(&sel(self.body_css))
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
            .replace('\u{a0}', "");
        if body.trim().is_empty() {
            body = document
                .select(&sel(self.container_css))
                .next()
                .map(|c| c.text().collect::<Vec<_>>().join("\n"))
                .unwrap_or_default()
                .replace('\u{a0}', "");
        }

        // nw.D110000gmrb_20190104_1-01.htm -> 20190104
        let send_time = page
            .url
            .as_str()
            .split('_')
            .nth(1)
            .map(digits)
            .unwrap_or_default();

        Ok(Some(ArticleDraft {
            title,
            body: body.trim().to_string(),
            href: page.url.to_string(),
            send_time,
            label: None,
        }))
    }
}
