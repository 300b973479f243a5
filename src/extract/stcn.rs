//! Extractor for 证券时报, whose archive spans four page designs.
//!
//! The layout era is decided from the issue date when the seed request
//! is built (see [`crate::sites`]) and rides in the crawl context. Era 1
//! is a classic three-stage walk; eras 2–4 list article links directly
//! on the issue page, so the index stage yields content follow-ups and
//! the layout stage never runs for them.

use super::{ExtractError, ExtractOutput, Extractor, sel};
use crate::models::{ArticleDraft, FollowUp, Page, Stage};
use crate::utils::digit_date;
use scraper::Html;

pub struct StcnExtractor;

impl StcnExtractor {
    fn era(page: &Page) -> u8 {
        page.ctx.era.unwrap_or(1)
    }
}

impl Extractor for StcnExtractor {
    fn index(&self, page: &Page) -> Result<ExtractOutput, ExtractError> {
        let document = Html::parse_document(&page.body);
        let (selector, stage) = match Self::era(page) {
            1 => ("a#pageLink", Stage::Layout),
            2 | 3 => ("#listWrap ul li a", Stage::Content),
            4 => ("#webtree dl dd ul li a", Stage::Content),
            era => {
                return Err(ExtractError(format!("unknown layout era {era}")));
            }
        };

        let mut follow_ups = Vec::new();
        for element in document.select(&sel(selector)) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = page.resolve(href) {
                    follow_ups.push(FollowUp {
                        url,
                        stage,
                        ctx: page.ctx.clone(),
                    });
                }
            }
        }
        Ok(ExtractOutput::follow_ups(follow_ups))
    }

    fn layout(&self, page: &Page) -> Result<ExtractOutput, ExtractError> {
        // Only era 1 has an intermediate layout level.
        if Self::era(page) != 1 {
            return Ok(ExtractOutput::default());
        }
        let document = Html::parse_document(&page.body);
        let mut follow_ups = Vec::new();
        for element in document.select(&sel(r#"td.default a[href^="content_"]"#)) {
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
        let (title_css, body_css) = match Self::era(page) {
            1 => ("td.font01 strong", "#ozoom"),
            // `mainTiile` is the id the site actually ships.
            2 | 3 => ("#mainTiile h2", "#mainCon founder-content"),
            4 => ("body > div p", "body > div founder-content"),
            era => {
                return Err(ExtractError(format!("unknown layout era {era}")));
            }
        };

        let Some(body_element) = document.select(&sel(body_css)).next() else {
            return Err(ExtractError(format!(
                "{body_css} missing from {}",
                page.url
            )));
        };

        let title = document
            .select(&sel(title_css))
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let body = body_element
            .text()
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string();

        Ok(Some(ArticleDraft {
            title,
            body,
            href: page.url.to_string(),
            send_time: digit_date(page.url.as_str()),
            label: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrawlContext;
    use url::Url;

    fn page(url: &str, body: &str, era: u8) -> Page {
        let url = Url::parse(url).unwrap();
        Page {
            ctx: CrawlContext::new(url.clone()).with_era(era),
            url,
            body: body.to_string(),
        }
    }

    const SEED_URL: &str = "http://epaper.stcn.com/paper/zqsb/html/2019-02/24/node_2.htm";

    #[test]
    fn test_era_one_walks_layout_level() {
        let html = r#"<a id="pageLink" href="node_3.htm">3</a>"#;
        let out = StcnExtractor.index(&page(SEED_URL, html, 1)).unwrap();
        assert_eq!(out.follow_ups.len(), 1);
        assert_eq!(out.follow_ups[0].stage, Stage::Layout);
    }

    #[test]
    fn test_late_eras_yield_content_links_from_index() {
        let html = r#"
            <div id="webtree"><dl><dd><ul>
              <li><a href="content_201902.htm">头条</a></li>
            </ul></dd></dl></div>"#;
        let out = StcnExtractor.index(&page(SEED_URL, html, 4)).unwrap();
        assert_eq!(out.follow_ups.len(), 1);
        assert_eq!(out.follow_ups[0].stage, Stage::Content);
    }

    #[test]
    fn test_layout_is_inert_outside_era_one() {
        let html = r#"<td class="default"><a href="content_1.htm">x</a></td>"#;
        let out = StcnExtractor.layout(&page(SEED_URL, html, 3)).unwrap();
        assert!(out.follow_ups.is_empty());

        let out = StcnExtractor.layout(&page(SEED_URL, html, 1)).unwrap();
        assert_eq!(out.follow_ups.len(), 1);
    }

    #[test]
    fn test_content_selects_by_era() {
        let era1 = r#"
            <table><tr><td class="font01"><strong>旧版标题</strong></td></tr></table>
            <div id="ozoom">BODY</div>"#
            .replace("BODY", &"文".repeat(150));
        let url = "http://epaper.stcn.com/paper/zqsb/html/2010-05/14/content_1.htm";
        let draft = StcnExtractor
            .content(&page(url, &era1, 1))
            .unwrap()
            .unwrap();
        assert_eq!(draft.title, "旧版标题");
        assert_eq!(draft.send_time, "20100514");

        let era3 = r#"
            <div id="mainTiile"><h2>新版标题</h2></div>
            <div id="mainCon"><div><founder-content>BODY</founder-content></div></div>"#
            .replace("BODY", &"文".repeat(150));
        let draft = StcnExtractor
            .content(&page(url, &era3, 3))
            .unwrap()
            .unwrap();
        assert_eq!(draft.title, "新版标题");
    }

    #[test]
    fn test_content_missing_body_container_is_an_error() {
        let result = StcnExtractor.content(&page(SEED_URL, "<html></html>", 1));
        assert!(result.is_err());
    }
}