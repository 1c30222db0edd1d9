// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Week numbering.
//!
//! A [`WeekClock`] derives `(week number, weekday, week-year offset, weeks in
//! week-year)` from a day index. The calendar year is given by the day index
//! of its *characteristic day*, a day known to fall in week
//! [`charac_week_number`](WeekRule::charac_week_number) of that year (4 January
//! for ISO 8601).
//!
//! Two week-year conventions are supported:
//!
//! - **continuous** weeks run without interruption across year boundaries;
//!   the week-year starts on the first week start at or before the week
//!   containing the characteristic day (ISO 8601).
//! - **reset** weeks restart at each year start, the characteristic day being
//!   the first day of week [`week_base`](WeekRule::week_base). The days left
//!   after the last full week either form a short final week, or are absorbed
//!   by the weeks listed in [`uncapped_weeks`](WeekRule::uncapped_weeks),
//!   whose extra days get weekday numbers beyond the week length (French
//!   décades and their complementary days, the World Calendar's leap day
//!   after week 26).
//!
//! Days outside the given year are rolled into the adjacent week-year and
//! reported with a non-zero [`year_offset`](WeekFigures::year_offset).

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Week-numbering convention of a calendar.
#[derive(Debug, Copy, Clone)]
pub struct WeekRule {
    /// Weekday of day index 0, counted from 0 in the same numbering as
    /// `start_of_week`.
    pub origin_weekday: i64,
    /// Length of a calendar year, in days.
    pub days_in_year: fn(i64) -> i64,
    /// Weekday on which a week starts.
    pub start_of_week: i64,
    /// Week number of the characteristic day.
    pub charac_week_number: i64,
    /// Number given to the first day of a week.
    pub day_base: i64,
    /// Number given to the first week of a week-year.
    pub week_base: i64,
    /// Days per week.
    pub week_length: i64,
    /// Weeks restart at each year start.
    pub week_reset: bool,
    /// Week numbers, in increasing order, that absorb the days left after the
    /// last full week of a reset year.
    ///
    /// Counting back from the last listed week, each takes one extra day
    /// while some remain; the last listed week takes any surplus. Weeks
    /// beyond the year's full weeks are skipped. Empty for a short final
    /// week instead.
    pub uncapped_weeks: &'static [i64],
}

/// Week figures of one day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeekFigures {
    pub week_number: i64,
    /// Day number within the week, from `day_base`.
    pub weekday: i64,
    /// Week-year minus the calendar year passed in.
    pub year_offset: i64,
    /// Weeks in the week-year.
    pub weeks_in_year: i64,
}

/// A validated [`WeekRule`].
#[derive(Debug, Copy, Clone)]
pub struct WeekClock {
    rule: WeekRule,
}

impl WeekClock {
    /// Checks `rule`.
    ///
    /// Fails on a non-positive week length, on uncapped weeks without
    /// yearly reset, or on uncapped weeks out of order or below `week_base`.
    pub fn new(rule: WeekRule) -> Result<Self, RuleError> {
        if rule.week_length <= 0 {
            return Err(RuleError::NonPositiveWeekLength {
                value: rule.week_length,
            });
        }
        if !rule.uncapped_weeks.is_empty() && !rule.week_reset {
            return Err(RuleError::UncappedWithoutReset);
        }
        let mut previous = rule.week_base - 1;
        for &week in rule.uncapped_weeks {
            if week <= previous {
                return Err(RuleError::MisplacedUncappedWeek { week });
            }
            previous = week;
        }
        debug!(
            week_length = rule.week_length,
            reset = rule.week_reset,
            uncapped = rule.uncapped_weeks.len(),
            "week rule compiled"
        );
        Ok(Self { rule })
    }

    #[inline]
    pub fn rule(&self) -> &WeekRule {
        &self.rule
    }

    /// Week figures of `day_index`, given the characteristic day of `year`.
    ///
    /// Each year between `year` and the week-year of `day_index` costs one
    /// call to [`days_in_year`](WeekRule::days_in_year). When `year` is the
    /// calendar year containing `day_index`, as the built-in calendars pass
    /// it, at most one roll to an adjacent year happens.
    pub fn week_figures(&self, day_index: i64, charac_day_index: i64, year: i64) -> WeekFigures {
        let rule = &self.rule;
        let length = rule.week_length;
        let mut charac = charac_day_index;
        let mut year = year;
        let mut days = (rule.days_in_year)(year);
        let mut year_offset = 0;

        loop {
            let start = self.year_start(charac);
            let weeks_in_year = self.weeks_in_year(charac, days);
            let offset = day_index - start;

            if offset < 0 {
                year -= 1;
                days = (rule.days_in_year)(year);
                charac -= days;
                year_offset -= 1;
                continue;
            }
            let beyond = if rule.week_reset {
                offset >= days
            } else {
                offset / length >= weeks_in_year
            };
            if beyond {
                charac += days;
                year += 1;
                days = (rule.days_in_year)(year);
                year_offset += 1;
                continue;
            }

            let (week, position) = if rule.week_reset {
                self.reset_position(offset, days)
            } else {
                (offset / length, self.position_in_week(day_index))
            };

            return WeekFigures {
                week_number: week + rule.week_base,
                weekday: position + rule.day_base,
                year_offset,
                weeks_in_year,
            };
        }
    }

    /// Day index of `weekday` in week `week` of `year`, whose characteristic
    /// day is `charac_day_index`: the inverse of
    /// [`week_figures`](Self::week_figures) for figures with a zero year
    /// offset.
    pub fn day_index(&self, week: i64, weekday: i64, charac_day_index: i64, year: i64) -> i64 {
        let rule = &self.rule;
        let week = week - rule.week_base;
        let absorbed: i64 = if rule.week_reset {
            self.absorbed((rule.days_in_year)(year))
                .take_while(|&(uncapped, _)| uncapped < week)
                .map(|(_, extra)| extra)
                .sum()
        } else {
            0
        };
        self.year_start(charac_day_index)
            + week * rule.week_length
            + absorbed
            + (weekday - rule.day_base)
    }

    /// Position of `day_index` in its week, from 0, in continuous mode.
    #[inline]
    fn position_in_week(&self, day_index: i64) -> i64 {
        let rule = &self.rule;
        (day_index + rule.origin_weekday - rule.start_of_week).rem_euclid(rule.week_length)
    }

    /// First day of week `week_base` of `year`.
    fn year_start(&self, charac: i64) -> i64 {
        let rule = &self.rule;
        let before = (rule.charac_week_number - rule.week_base) * rule.week_length;
        if rule.week_reset {
            charac - before
        } else {
            charac - self.position_in_week(charac) - before
        }
    }

    fn weeks_in_year(&self, charac: i64, days: i64) -> i64 {
        let rule = &self.rule;
        if rule.week_reset {
            let full = days / rule.week_length;
            if days % rule.week_length == 0 || self.absorbed(days).next().is_some() {
                full
            } else {
                full + 1
            }
        } else {
            (self.year_start(charac + days) - self.year_start(charac)) / rule.week_length
        }
    }

    /// Uncapped weeks of a reset year of `days` days, as (week index from 0,
    /// extra days), in week order.
    fn absorbed(&self, days: i64) -> impl Iterator<Item = (i64, i64)> {
        let base = self.rule.week_base;
        let full = days / self.rule.week_length;
        let extra = days - full * self.rule.week_length;
        let weeks = self.rule.uncapped_weeks;
        let count = weeks.iter().filter(|&&week| week - base < full).count() as i64;

        weeks
            .iter()
            .map(move |&week| week - base)
            .filter(move |&week| week < full)
            .enumerate()
            .map(move |(k, week)| {
                let k = k as i64;
                let one = i64::from(count - 1 - k < extra);
                let surplus = if k == count - 1 { (extra - count).max(0) } else { 0 };
                (week, one + surplus)
            })
    }

    /// Week index and position of day `offset` of a reset year.
    fn reset_position(&self, offset: i64, days: i64) -> (i64, i64) {
        let length = self.rule.week_length;
        let mut shift = 0;
        for (week, extra) in self.absorbed(days) {
            let start = week * length + shift;
            if offset < start {
                break;
            }
            if offset < start + length + extra {
                return (week, offset - start);
            }
            shift += extra;
        }
        let offset = offset - shift;
        (offset / length, offset % length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn gregorian_year(year: i64) -> i64 {
        let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
        if leap {
            366
        } else {
            365
        }
    }

    fn iso() -> WeekClock {
        WeekClock::new(WeekRule {
            origin_weekday: 4,
            days_in_year: gregorian_year,
            start_of_week: 1,
            charac_week_number: 1,
            day_base: 1,
            week_base: 1,
            week_length: 7,
            week_reset: false,
            uncapped_weeks: &[],
        })
        .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> i64 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .signed_duration_since(epoch)
            .num_days()
    }

    fn iso_figures(y: i32, m: u32, d: u32) -> (i64, i64, i64, i64) {
        let f = iso().week_figures(day(y, m, d), day(y, 1, 4), y as i64);
        (f.week_number, f.weekday, f.year_offset, f.weeks_in_year)
    }

    fn decade_years(year: i64) -> i64 {
        if year.rem_euclid(4) == 3 {
            366
        } else {
            365
        }
    }

    fn decades(uncapped: &'static [i64]) -> WeekClock {
        WeekClock::new(WeekRule {
            origin_weekday: 0,
            days_in_year: decade_years,
            start_of_week: 0,
            charac_week_number: 1,
            day_base: 1,
            week_base: 1,
            week_length: 10,
            week_reset: true,
            uncapped_weeks: uncapped,
        })
        .unwrap()
    }

    fn figures(clock: &WeekClock, d: i64) -> (i64, i64, i64, i64) {
        let f = clock.week_figures(d, 0, 1);
        (f.week_number, f.weekday, f.year_offset, f.weeks_in_year)
    }

    #[test]
    fn iso_end_of_december_belongs_to_next_week_year() {
        assert_eq!(iso_figures(2024, 12, 30), (1, 1, 1, 52));
        assert_eq!(iso_figures(2024, 12, 29), (52, 7, 0, 52));
    }

    #[test]
    fn iso_early_january_belongs_to_previous_week_year() {
        assert_eq!(iso_figures(2021, 1, 1), (53, 5, -1, 53));
        assert_eq!(iso_figures(2021, 1, 4), (1, 1, 0, 52));
        assert_eq!(iso_figures(2016, 1, 3), (53, 7, -1, 53));
        assert_eq!(iso_figures(2027, 1, 1), (53, 5, -1, 53));
    }

    #[test]
    fn iso_regular_days() {
        assert_eq!(iso_figures(2020, 12, 31), (53, 4, 0, 53));
        assert_eq!(iso_figures(2026, 10, 17), (42, 6, 0, 53));
        assert_eq!(iso_figures(1970, 1, 1), (1, 4, 0, 53));
    }

    #[test]
    fn iso_agrees_with_chrono() {
        use chrono::Datelike;
        let clock = iso();
        let mut date = NaiveDate::from_ymd_opt(1998, 12, 1).unwrap();
        while date.year() < 2031 {
            let y = date.year();
            let f = clock.week_figures(day(y, date.month(), date.day()), day(y, 1, 4), y as i64);
            let expected = date.iso_week();
            assert_eq!(f.week_number, expected.week() as i64, "{date}");
            assert_eq!(y as i64 + f.year_offset, expected.year() as i64, "{date}");
            assert_eq!(f.weekday, date.weekday().number_from_monday() as i64, "{date}");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn uncapped_last_decade_absorbs_complementary_days() {
        let clock = decades(&[36]);
        assert_eq!(figures(&clock, 0), (1, 1, 0, 36));
        assert_eq!(figures(&clock, 359), (36, 10, 0, 36));
        assert_eq!(figures(&clock, 360), (36, 11, 0, 36));
        assert_eq!(figures(&clock, 364), (36, 15, 0, 36));
        assert_eq!(figures(&clock, 365), (1, 1, 1, 36));
        assert_eq!(figures(&clock, -1), (36, 15, -1, 36));
    }

    #[test]
    fn capped_weeks_open_a_short_final_week() {
        let clock = decades(&[]);
        assert_eq!(figures(&clock, 360), (37, 1, 0, 37));
        assert_eq!(figures(&clock, 364), (37, 5, 0, 37));
    }

    #[test]
    fn single_epagomenal_day_gets_weekday_beyond_week_length() {
        let clock = WeekClock::new(WeekRule {
            origin_weekday: 0,
            days_in_year: |_| 365,
            start_of_week: 0,
            charac_week_number: 1,
            day_base: 1,
            week_base: 1,
            week_length: 7,
            week_reset: true,
            uncapped_weeks: &[52],
        })
        .unwrap();
        assert_eq!(figures(&clock, 363), (52, 7, 0, 52));
        assert_eq!(figures(&clock, 364), (52, 8, 0, 52));
        assert_eq!(figures(&clock, 365), (1, 1, 1, 52));
        assert_eq!(figures(&clock, -1), (52, 8, -1, 52));
    }

    #[test]
    fn far_days_roll_over_several_years() {
        let clock = decades(&[36]);
        assert_eq!(figures(&clock, 730), (1, 1, 2, 36));
        // Year 3 is 366 days long.
        assert_eq!(figures(&clock, 1460), (36, 15, 3, 36));
    }

    thread_local! {
        static YEAR_LENGTH_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
    }

    fn counted_gregorian_year(year: i64) -> i64 {
        YEAR_LENGTH_CALLS.with(|calls| calls.set(calls.get() + 1));
        gregorian_year(year)
    }

    fn year_length_calls(f: impl FnOnce()) -> usize {
        YEAR_LENGTH_CALLS.with(|calls| calls.set(0));
        f();
        YEAR_LENGTH_CALLS.with(|calls| calls.get())
    }

    #[test]
    fn each_visited_year_is_measured_once() {
        let clock = WeekClock::new(WeekRule {
            days_in_year: counted_gregorian_year,
            ..*iso().rule()
        })
        .unwrap();

        // 2022-01-01 is in ISO week 2021-W52: one roll back.
        let calls = year_length_calls(|| {
            let f = clock.week_figures(day(2022, 1, 1), day(2022, 1, 4), 2022);
            assert_eq!((f.week_number, f.year_offset), (52, -1));
        });
        assert_eq!(calls, 2);

        let calls = year_length_calls(|| {
            clock.week_figures(day(2022, 6, 15), day(2022, 1, 4), 2022);
        });
        assert_eq!(calls, 1);

        // Four years ahead: 2021 to 2025.
        let calls = year_length_calls(|| {
            let f = clock.week_figures(day(2025, 6, 15), day(2021, 1, 4), 2021);
            assert_eq!(f.year_offset, 4);
        });
        assert_eq!(calls, 5);
    }

    #[test]
    fn day_index_inverts_week_figures() {
        let clock = iso();
        for d in day(2019, 12, 1)..day(2022, 2, 1) {
            let f = clock.week_figures(d, day(2021, 1, 4), 2021);
            let year = 2021 + f.year_offset;
            let charac = day(year as i32, 1, 4);
            assert_eq!(clock.day_index(f.week_number, f.weekday, charac, year), d);
        }

        let clock = decades(&[36]);
        for d in 0..365 {
            let f = clock.week_figures(d, 0, 1);
            assert_eq!(clock.day_index(f.week_number, f.weekday, 0, 1), d);
        }
    }

    #[test]
    fn malformed_week_rules_are_rejected() {
        let mut rule = *iso().rule();
        rule.week_length = 0;
        assert_eq!(
            WeekClock::new(rule).unwrap_err(),
            RuleError::NonPositiveWeekLength { value: 0 }
        );

        let mut rule = *iso().rule();
        rule.uncapped_weeks = &[52];
        assert_eq!(
            WeekClock::new(rule).unwrap_err(),
            RuleError::UncappedWithoutReset
        );

        let mut rule = *world().rule();
        rule.uncapped_weeks = &[52, 26];
        assert_eq!(
            WeekClock::new(rule).unwrap_err(),
            RuleError::MisplacedUncappedWeek { week: 26 }
        );
        rule.uncapped_weeks = &[0];
        assert_eq!(
            WeekClock::new(rule).unwrap_err(),
            RuleError::MisplacedUncappedWeek { week: 0 }
        );
    }

    /// World Calendar: 52 weeks, a day after week 52 every year and a leap
    /// day after week 26.
    fn world() -> WeekClock {
        WeekClock::new(WeekRule {
            origin_weekday: 0,
            days_in_year: gregorian_year,
            start_of_week: 0,
            charac_week_number: 1,
            day_base: 1,
            week_base: 1,
            week_length: 7,
            week_reset: true,
            uncapped_weeks: &[26, 52],
        })
        .unwrap()
    }

    fn world_figures(d: i64, year: i64) -> (i64, i64, i64, i64) {
        let f = world().week_figures(d, 0, year);
        (f.week_number, f.weekday, f.year_offset, f.weeks_in_year)
    }

    #[test]
    fn mid_year_week_absorbs_the_leap_day() {
        assert_eq!(world_figures(181, 2024), (26, 7, 0, 52));
        assert_eq!(world_figures(182, 2024), (26, 8, 0, 52));
        assert_eq!(world_figures(183, 2024), (27, 1, 0, 52));
        assert_eq!(world_figures(364, 2024), (52, 7, 0, 52));
        assert_eq!(world_figures(365, 2024), (52, 8, 0, 52));
        assert_eq!(world_figures(366, 2024), (1, 1, 1, 52));
    }

    #[test]
    fn common_year_only_extends_the_last_week() {
        assert_eq!(world_figures(181, 2023), (26, 7, 0, 52));
        assert_eq!(world_figures(182, 2023), (27, 1, 0, 52));
        assert_eq!(world_figures(363, 2023), (52, 7, 0, 52));
        assert_eq!(world_figures(364, 2023), (52, 8, 0, 52));
        assert_eq!(world_figures(365, 2023), (1, 1, 1, 52));
    }

    #[test]
    fn day_index_skips_absorbed_days() {
        let clock = world();
        for year in [2023, 2024] {
            for d in 0..gregorian_year(year) {
                let f = clock.week_figures(d, 0, year);
                assert_eq!(clock.day_index(f.week_number, f.weekday, 0, year), d);
            }
        }
        assert_eq!(clock.day_index(27, 1, 0, 2024), 183);
        assert_eq!(clock.day_index(27, 1, 0, 2023), 182);
    }
}
