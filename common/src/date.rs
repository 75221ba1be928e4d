//! Calendar date utilities.

use std::{cmp::Ordering, fmt, hash, marker::PhantomData, str::FromStr};

use derive_more::{Display, Error};
use time::{format_description::well_known::Iso8601, Duration, Month};

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date without a time zone.
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Returns the current [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self::from_inner(time::OffsetDateTime::now_utc().date())
    }

    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components do not form a valid date.
    #[must_use]
    pub fn from_calendar_date(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day)
            .ok()
            .map(Self::from_inner)
    }

    /// Wraps the provided [`time::Date`].
    const fn from_inner(inner: time::Date) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }

    /// Returns the calendar year of this [`Date`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    /// Returns the calendar month (`1..=12`) of this [`Date`].
    #[must_use]
    pub fn month(&self) -> u8 {
        u8::from(self.inner.month())
    }

    /// Returns the day of the month of this [`Date`].
    #[must_use]
    pub fn day(&self) -> u8 {
        self.inner.day()
    }

    /// Returns the number of whole days from this [`Date`] until the `other`
    /// one.
    ///
    /// Negative if the `other` [`Date`] is in the past relatively to this one.
    #[must_use]
    pub fn days_until<O: ?Sized>(&self, other: DateOf<O>) -> i64 {
        (other.inner - self.inner).whole_days()
    }

    /// Returns this [`Date`] moved the provided number of days forward.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_add_days(self, days: i64) -> Option<Self> {
        self.inner
            .checked_add(Duration::days(days))
            .map(Self::from_inner)
    }

    /// Returns this [`Date`] moved the provided number of days backward.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_sub_days(self, days: i64) -> Option<Self> {
        self.inner
            .checked_sub(Duration::days(days))
            .map(Self::from_inner)
    }

    /// Coerces one kind of [`Date`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf::from_inner(self.inner)
    }
}

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> hash::Hash for DateOf<Of> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> fmt::Debug for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl<Of: ?Sized> Display for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year(),
            self.month(),
            self.day(),
        )
    }
}

impl<Of: ?Sized> FromStr for DateOf<Of> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, &Iso8601::DATE)
            .map(Self::from_inner)
            .map_err(ParseError)
    }
}

/// Error of parsing [`Date`] from an [ISO 8601] string.
///
/// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid ISO 8601 date: {_0}")]
pub struct ParseError(time::error::Parse);

/// Inclusive range of [`Date`]s.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Period {
    /// First day of this [`Period`].
    start: Date,

    /// Last day of this [`Period`].
    end: Date,
}

impl Period {
    /// Creates a new [`Period`] if the `start` is not after the `end`.
    #[must_use]
    pub fn new<S: ?Sized, E: ?Sized>(
        start: DateOf<S>,
        end: DateOf<E>,
    ) -> Option<Self> {
        let (start, end) = (start.coerce(), end.coerce());
        (start <= end).then_some(Self { start, end })
    }

    /// Returns the first day of this [`Period`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day of this [`Period`].
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Checks whether this [`Period`] shares at least one day with the
    /// `other` one.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.end < other.start || self.start > other.end)
    }

    /// Checks whether this [`Period`] lies completely within the `other`
    /// one.
    #[must_use]
    pub fn is_within(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// Checks whether the provided [`Date`] belongs to this [`Period`].
    #[must_use]
    pub fn contains<Of: ?Sized>(&self, date: DateOf<Of>) -> bool {
        let date = date.coerce();
        self.start <= date && date <= self.end
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::{Date, Period};

    fn date(s: &str) -> Date {
        Date::from_str(s).unwrap()
    }

    #[test]
    fn parses_and_displays_iso_dates() {
        let d = date("2024-03-09");
        assert_eq!(d.year(), 2024);
        assert_eq!(d.month(), 3);
        assert_eq!(d.day(), 9);
        assert_eq!(d.to_string(), "2024-03-09");

        assert!(Date::from_str("2024-02-30").is_err());
        assert!(Date::from_str("09.03.2024").is_err());
    }

    #[test]
    fn counts_days_across_months() {
        assert_eq!(date("2024-01-31").days_until(date("2024-03-01")), 30);
        assert_eq!(date("2024-03-01").days_until(date("2024-01-31")), -30);
        assert_eq!(date("2024-05-05").days_until(date("2024-05-05")), 0);
    }

    #[test]
    fn shifts_by_days() {
        assert_eq!(
            date("2024-03-01").checked_sub_days(14),
            Some(date("2024-02-16")),
        );
        assert_eq!(
            date("2024-12-25").checked_add_days(10),
            Some(date("2025-01-04")),
        );
    }

    #[test]
    fn period_rejects_reversed_bounds() {
        assert!(Period::new(date("2024-05-02"), date("2024-05-01")).is_none());
        assert!(Period::new(date("2024-05-01"), date("2024-05-01")).is_some());
    }

    #[test]
    fn period_overlap_is_inclusive() {
        let a = Period::new(date("2024-05-01"), date("2024-05-10")).unwrap();
        let touching =
            Period::new(date("2024-05-10"), date("2024-05-20")).unwrap();
        let after = Period::new(date("2024-05-11"), date("2024-05-20")).unwrap();
        let inner = Period::new(date("2024-05-03"), date("2024-05-04")).unwrap();

        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&after));
        assert!(a.overlaps(&inner));
        assert!(inner.is_within(&a));
        assert!(!a.is_within(&inner));
        assert!(a.contains(date("2024-05-10")));
        assert!(!a.contains(date("2024-05-11")));
    }
}
