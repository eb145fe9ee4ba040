//! Staleness check for structured records.
//!
//! A host is stale when it was last connected to more than `threshold_days`
//! before the reference date. Missing and unparseable dates count as stale.

use chrono::NaiveDate;

use crate::model::HostRecord;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn is_stale(record: &HostRecord, threshold_days: i64, reference_date: NaiveDate) -> bool {
    is_stale_date(
        record.citrix_last_connection_date.as_deref(),
        threshold_days,
        reference_date,
    )
}

pub fn is_stale_date(
    last_connection: Option<&str>,
    threshold_days: i64,
    reference_date: NaiveDate,
) -> bool {
    let Some(raw) = last_connection.filter(|s| !s.is_empty()) else {
        return true;
    };
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(last) => (reference_date - last).num_days() > threshold_days,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
    }

    fn days_before(n: i64) -> String {
        (reference() - chrono::Duration::days(n))
            .format(DATE_FORMAT)
            .to_string()
    }

    #[test]
    fn missing_date_is_stale() {
        assert!(is_stale_date(None, 14, reference()));
        assert!(is_stale(&HostRecord::default(), 14, reference()));
    }

    #[test]
    fn empty_date_is_stale() {
        assert!(is_stale_date(Some(""), 14, reference()));
    }

    #[test]
    fn exactly_threshold_is_not_stale() {
        assert!(!is_stale_date(Some(&days_before(14)), 14, reference()));
    }

    #[test]
    fn one_past_threshold_is_stale() {
        assert!(is_stale_date(Some(&days_before(15)), 14, reference()));
    }

    #[test]
    fn recent_and_future_are_not_stale() {
        assert!(!is_stale_date(Some(&days_before(0)), 14, reference()));
        assert!(!is_stale_date(Some(&days_before(3)), 14, reference()));
        assert!(!is_stale_date(Some("2026-12-31"), 14, reference()));
    }

    #[test]
    fn unparseable_date_is_stale() {
        for raw in ["yesterday", "03/01/2026", "2026-13-01", "2026-02-30", "2026-03-01T10:00:00"] {
            assert!(is_stale_date(Some(raw), 14, reference()), "{raw}");
        }
    }

    #[test]
    fn threshold_is_respected() {
        let record = HostRecord {
            citrix_last_connection_date: Some(days_before(20)),
            ..HostRecord::default()
        };
        assert!(is_stale(&record, 14, reference()));
        assert!(!is_stale(&record, 30, reference()));
    }
}
