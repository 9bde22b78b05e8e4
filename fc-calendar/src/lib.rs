//! This crate decides how many candles are allowed to be lit on a given date.
//!
//! Candles unlock one per week. Weeks are counted from midnight on January 1 of the current year,
//! in whatever time zone the date is given in, and the first week boundary depends on the weekday
//! that January 1 falls on. See [`WeekBoundary`] for the exact rule.
//!
//! Nothing is revealed in week zero. A candle with [`RevealIndex`] `i` is lit once the unlocked
//! count is strictly greater than `i`, so index 0 lights up at the first week boundary.

use chrono::{DateTime, Datelike, Duration, Local, TimeZone};
use tracing::trace;

/// The number of candles on the table, one for each week of the year.
pub const CANDLE_COUNT: u32 = 52;

/// The number of milliseconds in a day.
///
/// Elapsed days are measured in absolute time, so a daylight saving transition biases the day
/// count by the size of the shift on the day of the transition.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// The index of a candle, which is also the (zero-based) week in which it unlocks.
///
/// Indices are expected to be in `0..CANDLE_COUNT` and unique, but neither is enforced. Two
/// candles with the same index just unlock together, and an index of [`CANDLE_COUNT`] or more
/// never unlocks within a year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevealIndex(u32);

impl RevealIndex {
    /// Create a new index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The one-based week number, for showing to humans.
    pub const fn week_label(self) -> u32 {
        self.0 + 1
    }

    /// Is a candle with this index unlocked when `unlocked` candles are allowed?
    ///
    /// An unknown count (`None`) never unlocks anything.
    pub fn is_unlocked_by(self, unlocked: Option<u32>) -> bool {
        unlocked.is_some_and(|count| self.0 < count)
    }
}

impl From<u32> for RevealIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// The position of a moment in time relative to the week boundaries of its year.
///
/// The week number is `floor((days_elapsed + weekday_index + 1) / 7)`, where `days_elapsed` is
/// the number of whole days since midnight on January 1 and `weekday_index` is the weekday of
/// January 1 counted from Sunday as 0.
#[derive(Clone, Debug, PartialEq)]
pub struct WeekBoundary<Tz: TimeZone> {
    /// Midnight on January 1 of the year.
    first_day_of_year: DateTime<Tz>,

    /// Whole days elapsed since [`Self::first_day_of_year`].
    days_elapsed: i64,
}

impl<Tz: TimeZone> WeekBoundary<Tz> {
    /// Work out the week boundary for the given moment.
    ///
    /// Returns `None` if midnight on January 1 doesn't exist in the time zone of `now`.
    pub fn at(now: &DateTime<Tz>) -> Option<Self> {
        let first_day_of_year = now
            .timezone()
            .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
            .earliest()?;

        let elapsed_millis = now
            .clone()
            .signed_duration_since(first_day_of_year.clone())
            .num_milliseconds();

        Some(Self {
            first_day_of_year,
            days_elapsed: elapsed_millis.div_euclid(MILLIS_PER_DAY),
        })
    }

    /// Midnight on January 1 of the year.
    pub fn first_day_of_year(&self) -> &DateTime<Tz> {
        &self.first_day_of_year
    }

    /// Whole days elapsed since midnight on January 1.
    pub fn days_elapsed(&self) -> i64 {
        self.days_elapsed
    }

    /// The weekday of January 1, with Sunday as 0 and Saturday as 6.
    pub fn weekday_index(&self) -> u32 {
        self.first_day_of_year.weekday().num_days_from_sunday()
    }

    /// The week number, which is also the number of unlocked candles.
    pub fn week_number(&self) -> Option<u32> {
        let weeks = (self.days_elapsed + i64::from(self.weekday_index()) + 1).div_euclid(7);
        u32::try_from(weeks).ok()
    }

    /// The first moment at which the week number goes up by one.
    ///
    /// This can be in the following year, where the count starts again from zero.
    pub fn next_unlock(&self) -> Option<DateTime<Tz>> {
        let next_week = i64::from(self.week_number()?) + 1;
        let days = 7 * next_week - i64::from(self.weekday_index()) - 1;

        self.first_day_of_year
            .clone()
            .checked_add_signed(Duration::milliseconds(days * MILLIS_PER_DAY))
    }
}

/// Return how many candles are unlocked at the given moment.
///
/// Candles with a [`RevealIndex`] below this count are lit. `None` means the count couldn't be
/// worked out, and callers should treat it as "reveal nothing".
pub fn unlocked_count<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<u32> {
    let boundary = WeekBoundary::at(now)?;
    let count = boundary.week_number();
    trace!(
        days_elapsed = boundary.days_elapsed(),
        weekday_index = boundary.weekday_index(),
        ?count,
        "Computed unlocked count"
    );
    count
}

/// Return the next moment at which another candle unlocks.
pub fn next_unlock<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    WeekBoundary::at(now)?.next_unlock()
}

/// Return how many candles are unlocked right now, according to the local clock.
pub fn unlocked_count_now() -> Option<u32> {
    unlocked_count(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc, Weekday};

    fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn first_of_january_is_week_zero() {
        for year in 1990..2100 {
            let midnight = utc(year, 1, 1, 0);
            if midnight.weekday() == Weekday::Sat {
                continue;
            }

            assert_eq!(unlocked_count(&midnight), Some(0), "midnight in {year}");
            assert_eq!(unlocked_count(&utc(year, 1, 1, 23)), Some(0), "late in {year}");
        }
    }

    #[test]
    fn saturday_first_of_january_is_already_week_one() {
        // 2022 started on a Saturday, so (0 + 6 + 1) / 7 rounds down to 1
        let new_year = utc(2022, 1, 1, 0);
        assert_eq!(new_year.weekday(), Weekday::Sat);
        assert_eq!(unlocked_count(&new_year), Some(1));
    }

    #[test]
    fn new_year_2023_has_nothing_unlocked() {
        let now = utc(2023, 1, 1, 0);
        assert_eq!(unlocked_count(&now), Some(0));
        assert!((0..CANDLE_COUNT)
            .map(RevealIndex::new)
            .all(|index| !index.is_unlocked_by(unlocked_count(&now))));
    }

    #[test]
    fn one_week_after_a_sunday_unlocks_one_candle() {
        let now = utc(2023, 1, 8, 0);
        let boundary = WeekBoundary::at(&now).unwrap();
        assert_eq!(boundary.weekday_index(), 0);
        assert_eq!(boundary.days_elapsed(), 7);

        let count = unlocked_count(&now);
        assert_eq!(count, Some(1));
        assert!(RevealIndex::new(0).is_unlocked_by(count));
        assert!(!RevealIndex::new(1).is_unlocked_by(count));
    }

    #[test]
    fn everything_is_unlocked_on_the_last_day_of_2023() {
        let count = unlocked_count(&utc(2023, 12, 31, 12));
        assert_eq!(count, Some(CANDLE_COUNT));
        assert!(RevealIndex::new(CANDLE_COUNT - 1).is_unlocked_by(count));
        assert!(!RevealIndex::new(CANDLE_COUNT).is_unlocked_by(count));
    }

    #[test]
    fn count_never_decreases_within_a_year() {
        for year in [2023, 2024, 2027] {
            let mut previous = 0;
            let mut now = utc(year, 1, 1, 0);

            while now.year() == year {
                let count = unlocked_count(&now).unwrap();
                assert!(count >= previous, "count went down at {now}");
                previous = count;
                now += Duration::hours(5);
            }
        }
    }

    #[test]
    fn uses_the_time_zone_of_the_given_date() {
        let brisbane = FixedOffset::east_opt(10 * 3600).unwrap();

        // Early on January 8 in Brisbane is still January 7 in UTC
        let now = brisbane.with_ymd_and_hms(2023, 1, 8, 0, 30, 0).unwrap();
        let boundary = WeekBoundary::at(&now).unwrap();
        assert_eq!(boundary.days_elapsed(), 7);
        assert_eq!(
            boundary.first_day_of_year(),
            &brisbane.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_unlock_is_the_first_moment_the_count_goes_up() {
        for now in [utc(2023, 1, 1, 0), utc(2023, 3, 15, 9), utc(2024, 6, 30, 23)] {
            let count = unlocked_count(&now).unwrap();
            let next = next_unlock(&now).unwrap();

            assert!(next > now);
            assert_eq!(unlocked_count(&next), Some(count + 1), "at {next}");
            assert_eq!(
                unlocked_count(&(next - Duration::milliseconds(1))),
                Some(count),
                "just before {next}"
            );
        }
    }

    #[test]
    fn unknown_count_unlocks_nothing() {
        assert!(!RevealIndex::new(0).is_unlocked_by(None));
        assert_eq!(RevealIndex::new(0).week_label(), 1);
    }
}
