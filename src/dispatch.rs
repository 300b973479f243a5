//! The per-site crawl dispatcher.
//!
//! One dispatcher run walks a site's whole archive: the date range
//! becomes seed requests, each seed's index page yields layout pages
//! (or content links directly — both shapes flow through the same
//! queue), and every content page's draft goes through the validation
//! gate into the store.
//!
//! Failure handling is strictly per-page: a fetch or extraction failure
//! is logged and that page abandoned, without touching sibling pages or
//! other dates. Nothing a single page does can abort the crawl.
//!
//! Seed requests are intentionally never deduplicated — with a coarse
//! day step the generator can legitimately revisit nearby dates, and
//! identical seed URLs across tokens are expected traffic.

use crate::dates::date_tokens;
use crate::extract::Extractor;
use crate::fetch::PageFetcher;
use crate::models::{Article, ArticleDraft, CrawlContext, FollowUp, Page, Stage};
use crate::sites::SitePlan;
use crate::store::{PersistOutcome, Store};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Counters for one dispatcher run. Additive across runs.
#[derive(Debug, Default, Clone)]
pub struct CrawlStats {
    pub seeds: u64,
    pub pages_fetched: u64,
    pub fetch_failures: u64,
    pub extract_failures: u64,
    pub rejected: u64,
    pub inserted: u64,
    pub persist_failures: u64,
}

impl CrawlStats {
    pub fn merge(&mut self, other: &CrawlStats) {
        self.seeds += other.seeds;
        self.pages_fetched += other.pages_fetched;
        self.fetch_failures += other.fetch_failures;
        self.extract_failures += other.extract_failures;
        self.rejected += other.rejected;
        self.inserted += other.inserted;
        self.persist_failures += other.persist_failures;
    }
}

/// Drives one site's crawl: seeds from the date range, stage chaining
/// through the site's extractor, accepted records into the store.
pub struct Dispatcher<'a> {
    plan: &'a SitePlan,
    extractor: Arc<dyn Extractor>,
    fetcher: Arc<dyn PageFetcher>,
    /// `None` runs the full pipeline except the final write (dry run).
    store: Option<&'a Store>,
    concurrency: usize,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        plan: &'a SitePlan,
        extractor: Arc<dyn Extractor>,
        fetcher: Arc<dyn PageFetcher>,
        store: Option<&'a Store>,
        concurrency: usize,
    ) -> Self {
        Dispatcher {
            plan,
            extractor,
            fetcher,
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Crawl every issue of `[start, end]`, several dates in flight at
    /// once, and return the merged counters.
    #[instrument(level = "info", skip_all, fields(site = %self.plan.name))]
    pub async fn run(&self, start: NaiveDate, end: NaiveDate) -> CrawlStats {
        let tokens = date_tokens(
            Some(start),
            Some(end),
            self.plan.step_days,
            self.plan.separators,
        );

        let per_issue: Vec<CrawlStats> = stream::iter(tokens)
            .map(|token| self.crawl_issue(token))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut totals = CrawlStats::default();
        for stats in &per_issue {
            totals.merge(stats);
        }
        info!(
            seeds = totals.seeds,
            pages = totals.pages_fetched,
            inserted = totals.inserted,
            rejected = totals.rejected,
            "Site crawl finished"
        );
        totals
    }

    /// One issue: seed the queue, then drain it stage by stage.
    async fn crawl_issue(&self, token: String) -> CrawlStats {
        let mut stats = CrawlStats {
            seeds: 1,
            ..CrawlStats::default()
        };

        let (seed_url, era) = self.plan.seed_url(&token);
        let base = match Url::parse(&seed_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(%seed_url, error = %e, "Unusable seed URL");
                return stats;
            }
        };
        let mut ctx = CrawlContext::new(base);
        if let Some(era) = era {
            ctx = ctx.with_era(era);
        }

        let mut queue = VecDeque::new();
        queue.push_back(FollowUp {
            url: seed_url,
            stage: Stage::Index,
            ctx,
        });

        while let Some(request) = queue.pop_front() {
            let body = match self.fetcher.fetch(&request.url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(url = %request.url, error = %e, "Page fetch failed; skipping");
                    stats.fetch_failures += 1;
                    continue;
                }
            };
            stats.pages_fetched += 1;

            let url = match Url::parse(&request.url) {
                Ok(url) => url,
                Err(e) => {
                    warn!(url = %request.url, error = %e, "Unparseable page URL");
                    stats.extract_failures += 1;
                    continue;
                }
            };
            let page = Page {
                url,
                body,
                ctx: request.ctx,
            };

            match request.stage {
                Stage::Index | Stage::Layout => {
                    let extracted = if request.stage == Stage::Index {
                        self.extractor.index(&page)
                    } else {
                        self.extractor.layout(&page)
                    };
                    match extracted {
                        Ok(output) => {
                            for draft in output.drafts {
                                self.accept(draft, &mut stats).await;
                            }
                            queue.extend(output.follow_ups);
                        }
                        Err(e) => {
                            warn!(url = %page.url, error = %e, "Extraction failed; skipping page");
                            stats.extract_failures += 1;
                        }
                    }
                }
                Stage::Content => match self.extractor.content(&page) {
                    Ok(Some(draft)) => self.accept(draft, &mut stats).await,
                    Ok(None) => {
                        debug!(url = %page.url, "Content page produced no candidate");
                        stats.rejected += 1;
                    }
                    Err(e) => {
                        warn!(url = %page.url, error = %e, "Extraction failed; skipping page");
                        stats.extract_failures += 1;
                    }
                },
            }
        }
        stats
    }

    /// Gate a draft and hand it to the store.
    async fn accept(&self, draft: ArticleDraft, stats: &mut CrawlStats) {
        if !self.plan.validation.accept(&draft) {
            // Expected and frequent: ads, covers, digest pages.
            debug!(href = %draft.href, "Draft rejected by validation gate");
            stats.rejected += 1;
            return;
        }
        let article = Article::from_accepted(draft, self.plan.category);
        match self.store {
            Some(store) => match store.persist(self.plan.name, &article).await {
                PersistOutcome::Inserted => stats.inserted += 1,
                PersistOutcome::Failed { .. } => stats.persist_failures += 1,
            },
            None => {
                debug!(title = %article.title, "Dry run; record not written");
                stats.inserted += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DateSeparators;
    use crate::extract::FounderExtractor;
    use crate::fetch::testing::MapFetcher;
    use crate::sites::SeedTemplate;
    use crate::store::DbConfig;
    use crate::validate::ValidationPolicy;

    fn demo_plan() -> SitePlan {
        SitePlan {
            name: "demo",
            category: "测试日报",
            start_date: day(2019, 1, 4),
            end_date: day(2019, 1, 4),
            step_days: 1,
            separators: DateSeparators::DASH_SLASH,
            seed: SeedTemplate::Fixed("http://paper.test/html/{date}/nbs.D100_01.htm"),
            validation: ValidationPolicy::plain(),
            era: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SEED: &str = "http://paper.test/html/2019-01/04/nbs.D100_01.htm";
    const LAYOUT: &str = "http://paper.test/html/2019-01/04/nbs.D100_02.htm";
    const CONTENT: &str = "http://paper.test/html/2019-01/04/nw.D100_20190104_1-02.htm";

    fn issue_fixtures() -> MapFetcher {
        let article_html = format!(
            r#"<html><body><h1>测试标题</h1>
               <div id="articleContent"><p>{}</p></div></body></html>"#,
            "文".repeat(150)
        );
        MapFetcher::default()
            .with(
                SEED,
                r#"<a id="pageLink" href="nbs.D100_02.htm">二版</a>"#,
            )
            .with(
                LAYOUT,
                r#"<div id="titleList"><ul>
                   <li><a href="nw.D100_20190104_1-02.htm">头条</a></li>
                   </ul></div>"#,
            )
            .with(CONTENT, &article_html)
    }

    async fn memory_store() -> Store {
        let config = DbConfig {
            min_connections: 0,
            max_connections: 1,
            ..DbConfig::default()
        };
        Store::connect("sqlite::memory:", &config).await.unwrap()
    }

    #[tokio::test]
    async fn test_issue_crawl_end_to_end() {
        let store = memory_store().await;
        store.ensure_table("demo").await.unwrap();

        let plan = demo_plan();
        let dispatcher = Dispatcher::new(
            &plan,
            Arc::new(FounderExtractor::default()),
            Arc::new(issue_fixtures()),
            Some(&store),
            4,
        );
        let stats = dispatcher.run(plan.start_date, plan.end_date).await;

        assert_eq!(stats.seeds, 1);
        assert_eq!(stats.pages_fetched, 3);
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.fetch_failures, 0);

        let (href, send_time, category): (String, String, String) = sqlx::query_as(
            "SELECT `href`, `send_time`, `cType` FROM `epaper_demo`",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(href, CONTENT);
        assert_eq!(send_time, "20190104");
        assert_eq!(category, "测试日报");
    }

    #[tokio::test]
    async fn test_failed_seed_does_not_block_other_dates() {
        let store = memory_store().await;
        store.ensure_table("demo").await.unwrap();

        // Fixtures cover 2019-01-04 only; the seed for the 5th 404s.
        let mut plan = demo_plan();
        plan.end_date = day(2019, 1, 5);
        let dispatcher = Dispatcher::new(
            &plan,
            Arc::new(FounderExtractor::default()),
            Arc::new(issue_fixtures()),
            Some(&store),
            2,
        );
        let stats = dispatcher.run(plan.start_date, plan.end_date).await;

        assert_eq!(stats.seeds, 2);
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.inserted, 1);
    }

    #[tokio::test]
    async fn test_thin_article_is_rejected_not_persisted() {
        let store = memory_store().await;
        store.ensure_table("demo").await.unwrap();

        let fetcher = MapFetcher::default()
            .with(SEED, r#"<a id="pageLink" href="nbs.D100_02.htm">x</a>"#)
            .with(
                LAYOUT,
                r#"<div id="titleList"><ul><li>
                   <a href="nw.D100_20190104_1-02.htm">x</a></li></ul></div>"#,
            )
            .with(
                CONTENT,
                r#"<h1>广告位</h1><div id="articleContent"><p>太短</p></div>"#,
            );

        let plan = demo_plan();
        let dispatcher = Dispatcher::new(
            &plan,
            Arc::new(FounderExtractor::default()),
            Arc::new(fetcher),
            Some(&store),
            1,
        );
        let stats = dispatcher.run(plan.start_date, plan.end_date).await;

        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.inserted, 0);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM `epaper_demo`")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_dry_run_counts_without_a_store() {
        let plan = demo_plan();
        let dispatcher = Dispatcher::new(
            &plan,
            Arc::new(FounderExtractor::default()),
            Arc::new(issue_fixtures()),
            None,
            1,
        );
        let stats = dispatcher.run(plan.start_date, plan.end_date).await;
        assert_eq!(stats.inserted, 1);
    }
}
