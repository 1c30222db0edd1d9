// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The proleptic Gregorian calendar and ISO 8601 weeks.
//!
//! The rule counts years from 1 March, so the month field runs from
//! 0 = March to 11 = February and the leap day closes the year. Use
//! [`Gregorian::civil`] and [`Gregorian::from_civil`] for January-based dates.

use once_cell::sync::Lazy;

use super::{civil_to_march, march_to_civil, Calendar, CivilDate, DAY};
use crate::engine::Chronos;
use crate::error::ComposeError;
use crate::rule::{CalendarRule, Ceiling, CycleLevel, FieldSpec};
use crate::timeline::{Timeline, UnixMillis};
use crate::week::{WeekClock, WeekFigures, WeekRule};

/// 0000-03-01 (proleptic Gregorian).
const EPOCH: i64 = -62_162_035_200_000;

const LEVELS: &[CycleLevel] = &[
    CycleLevel::new(146_097 * DAY, Ceiling::Unbounded, 0, 400, "year"),
    CycleLevel::new(36_524 * DAY, Ceiling::Bounded(3), 0, 100, "year"),
    CycleLevel::new(1_461 * DAY, Ceiling::Bounded(24), 0, 4, "year"),
    CycleLevel::flagged(365 * DAY, Ceiling::Bounded(3), 0, 1, "year", "leap"),
    // March to July, August to December, then January and February.
    CycleLevel::new(153 * DAY, Ceiling::Unbounded, 0, 5, "month"),
    CycleLevel::new(61 * DAY, Ceiling::Unbounded, 0, 2, "month"),
    CycleLevel::new(31 * DAY, Ceiling::Unbounded, 0, 1, "month"),
    CycleLevel::new(DAY, Ceiling::Unbounded, 0, 1, "date"),
    CycleLevel::new(3_600_000, Ceiling::Unbounded, 0, 1, "hours"),
    CycleLevel::new(60_000, Ceiling::Unbounded, 0, 1, "minutes"),
    CycleLevel::new(1_000, Ceiling::Unbounded, 0, 1, "seconds"),
    CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "milliseconds"),
];

const CANVAS: &[FieldSpec] = &[
    FieldSpec::new("year", 0),
    FieldSpec::new("month", 0),
    FieldSpec::new("date", 1),
    FieldSpec::new("hours", 0),
    FieldSpec::new("minutes", 0),
    FieldSpec::new("seconds", 0),
    FieldSpec::new("milliseconds", 0),
];

const RULE: CalendarRule = CalendarRule::from_static(EPOCH, LEVELS, CANVAS);

static CHRONOS: Lazy<Chronos> =
    Lazy::new(|| Chronos::new(RULE).expect("valid Gregorian rule"));

static ISO_WEEK: Lazy<WeekClock> =
    Lazy::new(|| WeekClock::new(iso_week_rule()).expect("valid ISO week rule"));

/// ISO 8601 weeks on [`UnixDays`](crate::UnixDays) day indices: weeks start
/// on Monday (weekday 1) and week 1 holds 4 January.
pub fn iso_week_rule() -> WeekRule {
    WeekRule {
        // 1970-01-01 is a Thursday, counting Sunday as 0.
        origin_weekday: 4,
        days_in_year: Gregorian::days_in_year,
        start_of_week: 1,
        charac_week_number: 1,
        day_base: 1,
        week_base: 1,
        week_length: 7,
        week_reset: false,
        uncapped_weeks: &[],
    }
}

/// Gregorian calendar marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Gregorian;

impl Calendar for Gregorian {
    const LABEL: &'static str = "Gregorian";
    type Timeline = UnixMillis;

    #[inline]
    fn chronos() -> &'static Chronos {
        &CHRONOS
    }
}

impl Gregorian {
    /// `true` for years divisible by 4, except centuries not divisible by 400.
    #[inline]
    pub const fn is_leap_year(year: i64) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Days in the January-based `year`.
    #[inline]
    pub fn days_in_year(year: i64) -> i64 {
        if Self::is_leap_year(year) {
            366
        } else {
            365
        }
    }

    /// January-based date of `timestamp`.
    pub fn civil(timestamp: i64) -> CivilDate {
        march_to_civil(&Self::date(timestamp))
    }

    /// Timestamp of midnight at the start of `date`.
    ///
    /// Fails if the month lies outside 1 to 12, or if the instant does not
    /// fit in an `i64` timestamp. Days beyond the month end carry into the
    /// following months.
    pub fn from_civil(date: CivilDate) -> Result<i64, ComposeError> {
        let fields = civil_to_march(date)?;
        Self::chronos().compose(&fields)
    }

    /// ISO 8601 week figures of `timestamp`.
    ///
    /// `year_offset` is relative to the January-based year, so the ISO
    /// week-year is `Gregorian::civil(timestamp).year + year_offset`.
    pub fn iso_week(timestamp: i64) -> WeekFigures {
        let date = Self::civil(timestamp);
        let day = UnixMillis::day_index(timestamp);
        let january_4 = day - Self::ordinal(date) + 3;
        ISO_WEEK.week_figures(day, january_4, date.year)
    }

    /// Days from 1 January to `date`, from 0.
    fn ordinal(date: CivilDate) -> i64 {
        const BEFORE: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
        let leap = date.month > 2 && Self::is_leap_year(date.year);
        BEFORE[(date.month - 1) as usize] + leap as i64 + date.day - 1
    }
}
