//! Small helpers shared by the extractors and the persistence pipeline:
//! timestamp formatting, digit-run date recovery, and label cleanup.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

/// Current wall-clock time as `YYYY-MM-DD HH:MM:SS`.
///
/// This is the `insert_time` stored with every record — the moment of
/// extraction, not the article's publication time.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Every ASCII digit of `s`, in order, with everything else removed.
pub fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// The publish-date token buried in an archive URL or page fragment:
/// the first eight digits of the string, non-digits removed.
///
/// Archive URLs carry their issue date as a digit run
/// (`.../html/2019-01/04/content_123.htm` -> `20190104`), and the sites
/// have always been crawled by substringing it out rather than parsing a
/// real date. The token is stored verbatim as `send_time`; nothing
/// downstream treats it as more than an opaque digit string.
pub fn digit_date(s: &str) -> String {
    digits(s).chars().take(8).collect()
}

/// The digit run of `s` as a comparable `YYYYMMDD` number, or 0 when the
/// string holds no digits. Used for layout-cutover comparisons.
pub fn numeric_date(s: &str) -> u32 {
    digit_date(s).parse().unwrap_or(0)
}

static PARENTHESISED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)|（.*?）").unwrap());

/// Strip parenthesised runs from a section label.
///
/// Index pages list sections as e.g. `北京新闻(4)` where the suffix is a
/// page count; only the bare section name is threaded through the crawl.
pub fn strip_parenthesised(s: &str) -> String {
    PARENTHESISED.replace_all(s, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_timestamp_shape() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits("nw.D110000gmrb_20190104_1-01.htm"), "11000020190104101");
        assert_eq!(digits("no numbers"), "");
    }

    #[test]
    fn test_digit_date_takes_first_eight() {
        assert_eq!(
            digit_date("http://wb.sznews.com/PC/content/201803/22/content_1.html"),
            "20180322"
        );
        assert_eq!(digit_date("abc"), "");
    }

    #[test]
    fn test_numeric_date() {
        assert_eq!(numeric_date("2018-03/22"), 20180322);
        assert_eq!(numeric_date("no digits"), 0);
    }

    #[test]
    fn test_strip_parenthesised() {
        assert_eq!(strip_parenthesised("北京新闻(4)"), "北京新闻");
        assert_eq!(strip_parenthesised("副刊（周末）"), "副刊");
        assert_eq!(strip_parenthesised("要闻"), "要闻");
    }
}
