//! Transaction history filtering.

use crate::types::{TransactionRecord, UserId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

/// Query accepted by the transaction listing.
///
/// Dates accept RFC 3339 timestamps or plain `YYYY-MM-DD`. A date that
/// parses as neither is ignored and the corresponding bound is not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Only records with this kind on either leg
    pub account_type: Option<String>,
    /// Inclusive lower bound
    pub start_date: Option<String>,
    /// Inclusive upper bound
    pub end_date: Option<String>,
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_bound(raw: Option<&str>, bound: Bound) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)?,
        };
        return Some(date.and_time(time).and_utc());
    }

    tracing::debug!(value = raw, "Ignoring unparseable date filter");
    None
}

impl TransactionFilter {
    /// Lower bound, if one was supplied and parses.
    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        parse_bound(self.start_date.as_deref(), Bound::Start)
    }

    /// Upper bound, if one was supplied and parses. A bare date covers
    /// the whole day.
    #[must_use]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        parse_bound(self.end_date.as_deref(), Bound::End)
    }

    /// The user's records matching this filter, newest first.
    #[must_use]
    pub fn apply(&self, records: &[TransactionRecord], user: &UserId) -> Vec<TransactionRecord> {
        let start = self.start();
        let end = self.end();
        let account = self
            .account_type
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let mut matched: Vec<TransactionRecord> = records
            .iter()
            .filter(|r| &r.user_id == user)
            .filter(|r| account.is_none_or(|kind| r.touches(kind)))
            .filter(|r| start.is_none_or(|s| r.timestamp >= s))
            .filter(|r| end.is_none_or(|e| r.timestamp <= e))
            .cloned()
            .collect();

        // Later appends win ties on equal timestamps.
        matched.reverse();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched
    }
}
