use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// `range_days` used when the caller does not pass one.
pub const DEFAULT_RANGE_DAYS: u32 = 1;

/// How a window's lower bound was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowKind {
    /// Since local midnight of the current calendar day.
    Today,
    /// The trailing `days × 24h` before now, not calendar aligned.
    Trailing { days: u32 },
}

/// Lower-bounded time range over which readings are fetched; open towards now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub kind: WindowKind,
    pub start: DateTime<Utc>,
}

impl TimeWindow {
    /// Resolve a `range_days` request against `now`.
    ///
    /// `range_days <= 1` means "today" in the timezone of `now`; anything larger
    /// is a trailing window.
    pub fn for_range_days<Tz: TimeZone>(range_days: u32, now: &DateTime<Tz>) -> Self {
        if range_days <= 1 {
            return Self {
                kind: WindowKind::Today,
                start: local_midnight(now),
            };
        }

        // No reading predates the Unix epoch; longer spans are clamped to it so
        // the bound stays representable in every store.
        let start = Duration::try_days(i64::from(range_days))
            .and_then(|span| now.with_timezone(&Utc).checked_sub_signed(span))
            .map_or(DateTime::<Utc>::UNIX_EPOCH, |start| {
                start.max(DateTime::<Utc>::UNIX_EPOCH)
            });

        Self {
            kind: WindowKind::Trailing { days: range_days },
            start,
        }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start
    }
}

fn local_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    // A DST transition can skip midnight; fall back to interpreting it as UTC.
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Outcome of a windowed query that succeeded at the transport level.
///
/// An empty window is not an error, but it is also not an empty success: the
/// caller must handle it explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum Windowed<T> {
    Data(T),
    Empty(TimeWindow),
}

impl<T> Windowed<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Windowed<U> {
        match self {
            Windowed::Data(value) => Windowed::Data(f(value)),
            Windowed::Empty(window) => Windowed::Empty(window),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Windowed::Empty(_))
    }

    pub fn data(self) -> Option<T> {
        match self {
            Windowed::Data(value) => Some(value),
            Windowed::Empty(_) => None,
        }
    }
}
