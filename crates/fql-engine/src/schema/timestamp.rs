use crate::{
    error::{FilterError, Result},
    schema::{FieldKind, compare_values},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::borrow::Cow;
use fql_model::Value;
use fql_syntax::{Operator, OperatorSet, ValueNode};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
const DATE_LEN: usize = 10;

/// Points in time, filtered by quoted `YYYY-MM-DD` dates or RFC 3339 instants.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampKind;

impl TimestampKind {
    /// Dates are taken as midnight UTC.
    ///
    /// Date-times must use the upper-case `T` separator and either an upper-case
    /// `Z` or a `±hh:mm` offset.
    pub fn parse(text: &str) -> std::result::Result<DateTime<Utc>, String> {
        if text.len() == DATE_LEN {
            let date = NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map_err(|e| format!("invalid date, expected YYYY-MM-DD: {e}"))?;
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }

        if text.as_bytes().get(DATE_LEN) != Some(&b'T') {
            return Err("invalid timestamp, expected RFC 3339: missing 'T' separator".to_string());
        }
        let text = match text.strip_suffix('Z') {
            Some(local) => Cow::Owned(format!("{local}+00:00")),
            None => Cow::Borrowed(text),
        };

        DateTime::parse_from_str(&text, DATE_TIME_FORMAT)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| format!("invalid timestamp, expected RFC 3339: {e}"))
    }
}

impl FieldKind for TimestampKind {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn operators(&self) -> OperatorSet {
        OperatorSet::EXISTS | OperatorSet::ORDERING
    }

    fn decode(&self, field: &str, value: &ValueNode) -> Result<Value> {
        let ValueNode::QuotedString(quoted) = value else {
            return Err(FilterError::decode(
                field,
                value,
                "time fields require quoted string filters",
            ));
        };

        let text = quoted
            .unquoted()
            .map_err(|reason| FilterError::decode(field, quoted, reason))?;
        let ts = TimestampKind::parse(&text).map_err(|reason| FilterError::decode(field, quoted, reason))?;
        Ok(Value::Timestamp(ts))
    }

    fn compare(
        &self,
        field: &str,
        decoded: &Value,
        op: Operator,
        candidate: &Value,
    ) -> Result<bool> {
        compare_values(field, "timestamp", decoded, op, candidate)
    }
}
