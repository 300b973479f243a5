//! Extractor for 北京晚报.
//!
//! The only site with a third piece of record metadata: the index page
//! lists sections with human-readable names (`北京新闻(4)`), and the
//! section name travels with every request spawned under it, ending up
//! in the record's label field.

use super::{ExtractError, ExtractOutput, Extractor, sel};
use crate::models::{ArticleDraft, FollowUp, Page, Stage};
use crate::utils::{digit_date, strip_parenthesised};
use scraper::Html;

pub struct BeijingEveningExtractor;

impl Extractor for BeijingEveningExtractor {
    fn index(&self, page: &Page) -> Result<ExtractOutput, ExtractError> {
        let document = Html::parse_document(&page.body);
        let mut follow_ups = Vec::new();
        for element in document.select(&sel("div.hidenPage li a")) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(url) = page.resolve(href) else {
                continue;
            };
            // Link text is the section name plus a page count suffix.
            let label = strip_parenthesised(&element.text().collect::<String>());
            follow_ups.push(FollowUp {
                url,
                stage: Stage::Layout,
                ctx: page.ctx.clone().with_label(label),
            });
        }
        Ok(ExtractOutput::follow_ups(follow_ups))
    }

    fn layout(&self, page: &Page) -> Result<ExtractOutput, ExtractError> {
        let document = Html::parse_document(&page.body);
        let mut follow_ups = Vec::new();
        for element in document.select(&sel("#list ul li h2 a")) {
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

        if document.select(&sel("#list")).next().is_none() {
            return Err(ExtractError(format!("#list missing from {}", page.url)));
        }

        let title = document
            .select(&sel("#list h1, #list h2"))
            .map(|h| h.text().collect::<String>())
            .collect::<String>()
            .replace(['\r', '\n', '\t'], "")
            .trim()
            .to_string();

        let body = document
            .select(&sel("div.text"))
            .map(|div| div.text().collect::<Vec<_>>().join("\n"))
            .collect::<Vec<_>>()
            .join("\n")
            .replace('\u{a0}', "")
            .trim()
            .to_string();

        // The publish date is printed on the page (second span of the
        // masthead line), not carried in the URL.
        let date_line = document
            .select(&sel("#list span:nth-of-type(2)"))
            .next()
            .map(|s| s.text().collect::<String>())
            .unwrap_or_default();
        let send_time = digit_date(&date_line);

        Ok(Some(ArticleDraft {
            title,
            body,
            href: page.url.to_string(),
            send_time,
            label: page.ctx.label.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrawlContext;
    use url::Url;

    fn page(url: &str, body: &str, ctx: CrawlContext) -> Page {
        Page {
            url: Url::parse(url).unwrap(),
            body: body.to_string(),
            ctx,
        }
    }

    const SEED_URL: &str = "http://bjwb.bjd.com.cn/html/2019-01/08/node_113.htm";

    fn seed_ctx() -> CrawlContext {
        CrawlContext::new(Url::parse(SEED_URL).unwrap())
    }

    #[test]
    fn test_index_threads_section_labels() {
        let html = r#"
            <div class="hidenPage">
              <li><a href="node_114.htm">北京新闻(4)</a></li>
              <li><a href="node_120.htm">体育(2)</a></li>
            </div>"#;
        let out = BeijingEveningExtractor
            .index(&page(SEED_URL, html, seed_ctx()))
            .unwrap();

        assert_eq!(out.follow_ups.len(), 2);
        assert_eq!(out.follow_ups[0].ctx.label.as_deref(), Some("北京新闻"));
        assert_eq!(out.follow_ups[1].ctx.label.as_deref(), Some("体育"));
        assert_eq!(out.follow_ups[0].stage, Stage::Layout);
    }

    #[test]
    fn test_content_carries_label_and_page_date() {
        let html = r#"
            <div id="list">
              <div><h1>晚报头条</h1>
                <div><span>第01版</span><span>2019年01月08日</span></div>
              </div>
              <div class="text"><p>STRING</p></div>
            </div>"#;
        let html = html.replace("STRING", &"正".repeat(150));
        let ctx = seed_ctx().with_label("北京新闻");
        let url = "http://bjwb.bjd.com.cn/html/2019-01/08/content_570345.htm";
        let draft = BeijingEveningExtractor
            .content(&page(url, &html, ctx))
            .unwrap()
            .unwrap();

        assert_eq!(draft.title, "晚报头条");
        assert_eq!(draft.label.as_deref(), Some("北京新闻"));
        assert_eq!(draft.send_time, "20190108");
        assert_eq!(draft.body.chars().count(), 150);
    }

    #[test]
    fn test_content_without_list_container_is_an_error() {
        let result =
            BeijingEveningExtractor.content(&page(SEED_URL, "<html></html>", seed_ctx()));
        assert!(result.is_err());
    }
}
