/// Shared date and string helpers

use chrono::NaiveDate;

/// Parse a publication date as it appears in manifests and the store.
///
/// Accepts ISO dates (`2021-03-15`, with or without a trailing time part)
/// and the European forms `15.03.2021` / `15/03/2021`. Returns None for
/// anything else; callers exclude such rows from date-dependent aggregation
/// instead of substituting a sentinel.
pub fn parse_pub_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    // Timestamps like 2021-03-15T10:00:00 carry the date up front
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }

    None
}

/// Slug for derived project links: lowercase, spaces to dashes, everything
/// that is not alphanumeric or a dash removed.
pub fn slugify(name: &str) -> String {
    name.replace(' ', "-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_pub_date("2021-03-15"),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
        assert_eq!(
            parse_pub_date("  2021-03-15  "),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
    }

    #[test]
    fn test_parse_european_date() {
        assert_eq!(
            parse_pub_date("15.03.2021"),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
        assert_eq!(
            parse_pub_date("15/03/2021"),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
    }

    #[test]
    fn test_parse_timestamp_prefix() {
        assert_eq!(
            parse_pub_date("2021-03-15T10:30:00Z"),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
    }

    #[test]
    fn test_unparseable_dates_yield_none() {
        assert_eq!(parse_pub_date(""), None);
        assert_eq!(parse_pub_date("   "), None);
        assert_eq!(parse_pub_date("March 2021"), None);
        assert_eq!(parse_pub_date("2021"), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Micro Plastics Lab"), "micro-plastics-lab");
        assert_eq!(slugify("C.L.E.A.N. Seas!"), "clean-seas");
        assert_eq!(slugify("already-slugged"), "already-slugged");
    }
}
