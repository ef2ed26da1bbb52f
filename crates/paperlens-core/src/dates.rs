use chrono::NaiveDate;

const DATE_PREFIX_LEN: usize = 10;
const MASKED_SEGMENT: &str = "-00";

/// Resolve a raw metadata date string to a calendar day.
///
/// Only the first ten characters are considered, so trailing time-of-day or
/// free text is ignored. A `-00` month or day (unknown precision) collapses
/// the value to January 1st of the year. Returns `None` for empty input or
/// anything that is not a real `YYYY-MM-DD` date.
pub fn resolve_date(raw: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }
    let mut cleaned: String = raw.chars().take(DATE_PREFIX_LEN).collect();
    if cleaned.contains(MASKED_SEGMENT) {
        let year: String = cleaned.chars().take(4).collect();
        cleaned = format!("{year}-01-01");
    }
    NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_and_prefixed_dates() {
        assert_eq!(resolve_date("2021-03-01"), NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(
            resolve_date("2021-03-01T12:30:00Z"),
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );
        assert_eq!(
            resolve_date("2021-03-01 some trailing note"),
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );
    }

    #[test]
    fn empty_and_blank_dates_are_none() {
        assert_eq!(resolve_date(""), None);
        assert_eq!(resolve_date("   "), None);
        assert_eq!(resolve_date("\t\n"), None);
    }

    #[test]
    fn masked_segments_collapse_to_new_year() {
        assert_eq!(resolve_date("2020-00-00"), resolve_date("2020-01-01"));
        assert_eq!(resolve_date("2020-00-00"), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(resolve_date("1999-07-00"), NaiveDate::from_ymd_opt(1999, 1, 1));
        assert_eq!(resolve_date("1999-00-15"), NaiveDate::from_ymd_opt(1999, 1, 1));
        assert_eq!(resolve_date("abcd-00-00"), None);
    }

    #[test]
    fn malformed_and_impossible_dates_are_none() {
        assert_eq!(resolve_date("2021-02-30"), None);
        assert_eq!(resolve_date("2021-13-01"), None);
        assert_eq!(resolve_date("not a date"), None);
        assert_eq!(resolve_date("2021"), None);
        assert_eq!(resolve_date("2021-03"), None);
        assert_eq!(resolve_date("03/01/2021"), None);
        assert_eq!(resolve_date(" 2021-03-01"), None);
    }

    #[test]
    fn leap_day_resolves() {
        assert_eq!(resolve_date("2020-02-29"), NaiveDate::from_ymd_opt(2020, 2, 29));
        assert_eq!(resolve_date("2021-02-29"), None);
    }
}
