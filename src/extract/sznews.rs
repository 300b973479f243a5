//! Extractor for the sznews PC layout (深圳商报 and its sister papers).
//!
//! Three stages: `.Therestlist` on the issue page links the layouts
//! (skipping the masked placeholder entries), `.newslist` links the
//! articles, and article text sits in `#ScroLeft` inside a
//! `<founder-content>` element. The URL carries the date as its first
//! eight digits (`/PC/content/201803/22/content_1.html`).

use super::{ExtractError, ExtractOutput, Extractor, sel};
use crate::models::{ArticleDraft, FollowUp, Page, Stage};
use crate::utils::digit_date;
use scraper::Html;

pub struct ShenzhenLayoutExtractor;

impl Extractor for ShenzhenLayoutExtractor {
    fn index(&self, page: &Page) -> Result<ExtractOutput, ExtractError> {
        let document = Html::parse_document(&page.body);
        let mut follow_ups = Vec::new();
        for element in document.select(&sel("div.Therestlist ul li a:not(.restmask)")) {
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
        for element in document.select(&sel("div.newslist ul li h3 a")) {
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

        if document.select(&sel("#ScroLeft")).next().is_none() {
            return Err(ExtractError(format!("#ScroLeft missing from {}", page.url)));
        }

        let title = document
            .select(&sel("#ScroLeft h3"))
            .next()
            .map(|h| h.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let body = document
            .select(&sel("#ScroLeft founder-content p"))
            .map(|p| p.text().collect::<String>())
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

    fn page(url: &str, body: &str) -> Page {
        let url = Url::parse(url).unwrap();
        Page {
            ctx: CrawlContext::new(url.clone()),
            url,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_index_skips_masked_entries() {
        let html = r##"
            <div class="Therestlist"><ul>
              <li><a href="node_A02.html">A02</a></li>
              <li><a class="restmask" href="#">A03</a></li>
              <li><a href="node_A04.html">A04</a></li>
            </ul></div>"##;
        let out = ShenzhenLayoutExtractor
            .index(&page(
                "http://szsb.sznews.com/PC/layout/201803/22/node_A01.html",
                html,
            ))
            .unwrap();

        assert_eq!(out.follow_ups.len(), 2);
        assert!(out.follow_ups.iter().all(|f| f.stage == Stage::Layout));
    }

    #[test]
    fn test_content_takes_date_from_url() {
        let html = r#"
            <div id="ScroLeft">
              <div><h3>商报头条</h3></div>
              <div><founder-content><p>BODY</p></founder-content></div>
            </div>"#;
        let html = html.replace("BODY", &"文".repeat(120));
        let draft = ShenzhenLayoutExtractor
            .content(&page(
                "http://szsb.sznews.com/PC/content/201803/22/content_361034.html",
                &html,
            ))
            .unwrap()
            .unwrap();

        assert_eq!(draft.title, "商报头条");
        assert_eq!(draft.send_time, "20180322");
        assert_eq!(draft.body.chars().count(), 120);
    }
}
