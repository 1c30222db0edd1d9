// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The French Revolutionary (Republican) calendar.
//!
//! Twelve 30-day months (0 = Vendémiaire) followed by a 13th "month" of five
//! or six complementary days. Sextile years are grouped in *franciades*: four
//! years ending with a sextile one, or five years once per 33-year cycle.
//! The sextile years of the Republic's own era (III, VII, XI, XV, XX) are
//! reproduced, and the same scheme is extended both ways.
//!
//! The rule is anchored at year −12 so that its 128- and 33-year cycles line
//! up with year XX, the first franciade of five years.

use once_cell::sync::Lazy;

use super::{built_in_field, compose_built_in, midnight, Calendar, DAY};
use crate::engine::Chronos;
use crate::rule::{CalendarRule, Ceiling, CycleLevel, FieldSpec};
use crate::timeline::{Timeline, UnixMillis};
use crate::week::{WeekClock, WeekFigures, WeekRule};

/// 1 Vendémiaire of year −12.
const EPOCH: i64 = -6_004_454_400_000;

const LEVELS: &[CycleLevel] = &[
    CycleLevel::new(46_751 * DAY, Ceiling::Unbounded, 0, 128, "year"),
    // Three 33-year cycles, then a 29-year one.
    CycleLevel::new(12_053 * DAY, Ceiling::Bounded(3), -1, 33, "year"),
    // Seven four-year franciades, then a five-year one.
    CycleLevel::new(1_461 * DAY, Ceiling::Bounded(7), 1, 4, "year"),
    CycleLevel::flagged(365 * DAY, Ceiling::Bounded(3), 0, 1, "year", "leap"),
    CycleLevel::new(30 * DAY, Ceiling::Unbounded, 0, 1, "month"),
    CycleLevel::new(DAY, Ceiling::Unbounded, 0, 1, "date"),
    CycleLevel::new(3_600_000, Ceiling::Unbounded, 0, 1, "hours"),
    CycleLevel::new(60_000, Ceiling::Unbounded, 0, 1, "minutes"),
    CycleLevel::new(1_000, Ceiling::Unbounded, 0, 1, "seconds"),
    CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "milliseconds"),
];

const CANVAS: &[FieldSpec] = &[
    FieldSpec::new("year", -12),
    FieldSpec::new("month", 0),
    FieldSpec::new("date", 1),
    FieldSpec::new("hours", 0),
    FieldSpec::new("minutes", 0),
    FieldSpec::new("seconds", 0),
    FieldSpec::new("milliseconds", 0),
];

const RULE: CalendarRule = CalendarRule::from_static(EPOCH, LEVELS, CANVAS);

static CHRONOS: Lazy<Chronos> =
    Lazy::new(|| Chronos::new(RULE).expect("valid French Revolutionary rule"));

static DECADES: Lazy<WeekClock> =
    Lazy::new(|| WeekClock::new(decade_rule()).expect("valid décade rule"));

/// Ten-day décades, restarting each 1 Vendémiaire. The complementary days
/// extend the 36th décade with days 11 to 15 (16 in sextile years).
pub fn decade_rule() -> WeekRule {
    WeekRule {
        origin_weekday: 0,
        days_in_year: FrenchRevolutionary::days_in_year,
        start_of_week: 0,
        charac_week_number: 1,
        day_base: 1,
        week_base: 1,
        week_length: 10,
        week_reset: true,
        uncapped_weeks: &[36],
    }
}

/// French Revolutionary calendar marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrenchRevolutionary;

impl Calendar for FrenchRevolutionary {
    const LABEL: &'static str = "French Revolutionary";
    type Timeline = UnixMillis;

    #[inline]
    fn chronos() -> &'static Chronos {
        &CHRONOS
    }
}

impl FrenchRevolutionary {
    /// Timestamp of 1 Vendémiaire of `year`.
    ///
    /// # Panics
    ///
    /// If that instant lies outside the `i64` range, some 290 million years
    /// from now.
    pub fn year_start(year: i64) -> i64 {
        i64::try_from(Self::wide_year_start(year)).expect("year start within the i64 range")
    }

    fn wide_year_start(year: i64) -> i128 {
        compose_built_in(Self::chronos(), &midnight(year, 0, 1))
    }

    /// 366 for sextile years, 365 otherwise.
    pub fn days_in_year(year: i64) -> i64 {
        let next = Self::wide_year_start(year.saturating_add(1));
        ((next - Self::wide_year_start(year)) / DAY as i128) as i64
    }

    /// Décade number and day within the décade of `timestamp`.
    pub fn decade(timestamp: i64) -> WeekFigures {
        let fields = Self::date(timestamp);
        let day = UnixMillis::day_index(timestamp);
        let elapsed =
            built_in_field(&fields, "month") * 30 + built_in_field(&fields, "date") - 1;
        DECADES.week_figures(day, day - elapsed, built_in_field(&fields, "year"))
    }
}
