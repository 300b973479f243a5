//! Per-site crawl plans.
//!
//! A [`SitePlan`] declares everything about a site except its markup:
//! the date bounds of its archive, how dates are written into its URLs,
//! the seed URL template (or two templates split by a cutover date, for
//! sites that changed their URL scheme mid-archive), and the validation
//! policy its articles must pass. The matching markup logic lives in
//! [`crate::extract`] under the same site name.
//!
//! Sites are registered in a lookup table rather than as types of their
//! own; adding a site means adding one entry here and one extractor
//! there.

use crate::dates::DateSeparators;
use crate::utils::numeric_date;
use crate::validate::{AD_SUBSTRINGS, DIGEST_TITLES, ValidationPolicy};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

/// Seed URL construction for one site. `{date}` is replaced by the
/// formatted date token.
#[derive(Debug, Clone, Copy)]
pub enum SeedTemplate {
    Fixed(&'static str),
    /// The site moved to a new URL scheme on `cutover` (`YYYYMMDD` of the
    /// issue date): issues strictly before it use `before`, the rest use
    /// `after`.
    Cutover {
        before: &'static str,
        after: &'static str,
        cutover: u32,
    },
}

/// Everything the dispatcher needs to crawl one site, markup aside.
#[derive(Debug, Clone, Copy)]
pub struct SitePlan {
    /// Unique site key (`[a-z0-9_]`), also the store's table suffix.
    pub name: &'static str,
    /// Publication name, stored with every record as its category.
    pub category: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Days between crawled issues. 1 for every daily; coarser steps
    /// leave gaps and may overshoot the end date (see [`crate::dates`]).
    pub step_days: u32,
    pub separators: DateSeparators,
    pub seed: SeedTemplate,
    pub validation: ValidationPolicy,
    /// For sites whose page markup changed over the life of the archive:
    /// maps the issue date (`YYYYMMDD`) to a layout-era tag that the
    /// extractor branches on.
    pub era: Option<fn(u32) -> u8>,
}

impl SitePlan {
    /// Build the seed URL for one date token, plus the layout era of that
    /// issue where the site has eras.
    pub fn seed_url(&self, token: &str) -> (String, Option<u8>) {
        let ymd = numeric_date(token);
        let template = match self.seed {
            SeedTemplate::Fixed(t) => t,
            SeedTemplate::Cutover {
                before,
                after,
                cutover,
            } => {
                if ymd < cutover {
                    before
                } else {
                    after
                }
            }
        };
        (template.replace("{date}", token), self.era.map(|f| f(ymd)))
    }
}

/// Layout eras of the securities daily: the archive spans four page
/// designs, split at three known cutover dates.
fn stcn_era(ymd: u32) -> u8 {
    if ymd < 20110104 {
        1
    } else if ymd < 20120207 {
        2
    } else if ymd < 20160722 {
        3
    } else {
        4
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The built-in sites.
static SITES: Lazy<Vec<SitePlan>> = Lazy::new(|| {
    vec![
        // 光明日报 — two-level Founder CMS archive.
        SitePlan {
            name: "gmrb",
            category: "光明日报",
            start_date: day(2008, 1, 1),
            end_date: day(2019, 1, 4),
            step_days: 1,
            separators: DateSeparators::DASH_SLASH,
            seed: SeedTemplate::Fixed(
                "http://epaper.gmw.cn/gmrb/html/{date}/nbs.D110000gmrb_01.htm",
            ),
            validation: ValidationPolicy::plain(),
            era: None,
        },
        // 人民日报 — same CMS, shallower archive.
        SitePlan {
            name: "rmrb",
            category: "人民日报",
            start_date: day(2018, 1, 1),
            end_date: day(2019, 1, 4),
            step_days: 1,
            separators: DateSeparators::DASH_SLASH,
            seed: SeedTemplate::Fixed(
                "http://paper.people.com.cn/rmrb/html/{date}/nbs.D110000renmrb_01.htm",
            ),
            validation: ValidationPolicy::plain(),
            era: None,
        },
        // 北京晚报 — three stages; section labels carried from the index
        // page into every record (the one site with a label column).
        SitePlan {
            name: "bj",
            category: "北京晚报",
            start_date: day(2017, 1, 1),
            end_date: day(2019, 1, 21),
            step_days: 1,
            separators: DateSeparators::DASH_SLASH,
            seed: SeedTemplate::Fixed("http://bjwb.bjd.com.cn/html/{date}/node_113.htm"),
            validation: ValidationPolicy::plain(),
            era: None,
        },
        // 深圳商报 — compact date tokens, and the seed URL scheme changed
        // on 2018-03-22.
        SitePlan {
            name: "szsb",
            category: "深圳商报",
            start_date: day(2017, 5, 1),
            end_date: day(2019, 2, 26),
            step_days: 1,
            separators: DateSeparators::NONE_SLASH,
            seed: SeedTemplate::Cutover {
                before: "http://szsb.sznews.com/PC/layout/{date}/colA01.html",
                after: "http://szsb.sznews.com/PC/layout/{date}/node_A01.html",
                cutover: 20180322,
            },
            validation: ValidationPolicy::deny_title_substrings(AD_SUBSTRINGS),
            era: None,
        },
        // 证券时报 — four layout eras over eleven years.
        SitePlan {
            name: "zqsb",
            category: "证券时报",
            start_date: day(2008, 5, 14),
            end_date: day(2019, 2, 24),
            step_days: 1,
            separators: DateSeparators::DASH_SLASH,
            seed: SeedTemplate::Fixed("http://epaper.stcn.com/paper/zqsb/html/{date}/node_2.htm"),
            validation: ValidationPolicy::deny_titles(DIGEST_TITLES),
            era: Some(stcn_era),
        },
    ]
});

/// Look up a site plan by name.
pub fn site_plan(name: &str) -> Option<&'static SitePlan> {
    SITES.iter().find(|plan| plan.name == name)
}

/// All built-in plans, in registration order.
pub fn all_plans() -> &'static [SitePlan] {
    &SITES
}
