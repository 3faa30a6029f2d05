//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date for an RSS `pubDate` (RFC 2822)
pub fn rss_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.to_rfc2822()
}

/// Format a date for a sitemap `lastmod` (W3C date)
pub fn sitemap_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_rss_and_sitemap_dates() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(rss_date(&date), "Mon, 15 Jan 2024 10:30:00 +0000");
        assert_eq!(sitemap_date(&date), "2024-01-15");
    }
}
