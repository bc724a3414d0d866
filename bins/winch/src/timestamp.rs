use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use mappings::{Mappable, Rule, Value};

/// Wire layout, offset always written as `+hh:mm`.
pub const LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Written for timestamps that cannot be formatted.
pub const SENTINEL: &str = "0000-01-01T00:00:00+00:00";

/// Point in time with its original offset.
///
/// Converted only through [`rule`]; it has no structural form of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    /// Midnight UTC on 1 January of year 0, what unparsable input becomes.
    pub fn sentinel() -> Self {
        let date = NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or_default();
        Self(date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
    }

    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_str(s, LAYOUT).ok().map(Self)
    }

    pub fn format(&self) -> String {
        self.0.format(LAYOUT).to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self(dt)
    }
}

impl Mappable for Timestamp {}

/// Layout string out; layout string in, anything else becomes the sentinel.
pub fn rule() -> Rule<Timestamp> {
    Rule::new()
        .flatten(|ts: &Timestamp| Value::from(ts.format()))
        .unflatten(|node| {
            node.as_str()
                .and_then(Timestamp::parse)
                .unwrap_or_else(Timestamp::sentinel)
        })
}
