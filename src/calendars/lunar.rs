// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Mean lunar months and Metonic lunar years.
//!
//! [`MeanLunar`] counts mean synodic months (`lunation`) from the mean new
//! moon of 2000-01-06 18:14 UTC, and whole days since the last mean new moon
//! (`age`). This is the mean moon of the ecclesiastical and lunisolar
//! computi, not the true one: actual new moons stray from it by up to about
//! 14 hours.
//!
//! [`MetonicLunar`] groups the same lunations in years of 12 months, with a
//! 13th embolismic month in years 3, 6, 8, 11, 14, 17 and 19 of each 19-year
//! cycle of 235 lunations. The cycle is an 8-year part followed by an
//! 11-year one, both made of 3-year groups closed by a 2-year one; the last
//! year of every group is embolismic.

use once_cell::sync::Lazy;
use qtty::Days;

use super::{built_in_field, Calendar, CivilDate, Gregorian, DAY};
use crate::engine::Chronos;
use crate::error::{ArithmeticError, ComposeError};
use crate::modular::floor_mod_f64;
use crate::rule::{CalendarRule, Ceiling, CycleLevel, FieldSpec};
use crate::timeline::{Timeline, UnixMillis};

/// Mean synodic month.
pub const SYNODIC_MONTH: Days = Days::new(29.530_588_853);

/// Mean synodic month, rounded to the millisecond.
const LUNATION: i64 = 2_551_442_877;

/// Mean new moon of 2000-01-06 18:14 UTC.
const EPOCH: i64 = 947_182_440_000;

const LEVELS: &[CycleLevel] = &[
    CycleLevel::new(LUNATION, Ceiling::Unbounded, 0, 1, "lunation"),
    CycleLevel::new(DAY, Ceiling::Unbounded, 0, 1, "age"),
    CycleLevel::new(3_600_000, Ceiling::Unbounded, 0, 1, "hours"),
    CycleLevel::new(60_000, Ceiling::Unbounded, 0, 1, "minutes"),
    CycleLevel::new(1_000, Ceiling::Unbounded, 0, 1, "seconds"),
    CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "milliseconds"),
];

const CANVAS: &[FieldSpec] = &[
    FieldSpec::new("lunation", 0),
    FieldSpec::new("age", 0),
    FieldSpec::new("hours", 0),
    FieldSpec::new("minutes", 0),
    FieldSpec::new("seconds", 0),
    FieldSpec::new("milliseconds", 0),
];

const RULE: CalendarRule = CalendarRule::from_static(EPOCH, LEVELS, CANVAS);

static CHRONOS: Lazy<Chronos> =
    Lazy::new(|| Chronos::new(RULE).expect("valid mean lunar rule"));

const METONIC_LEVELS: &[CycleLevel] = &[
    CycleLevel::new(235 * LUNATION, Ceiling::Unbounded, 0, 19, "year"),
    // 8 years, then the 11 remaining ones.
    CycleLevel::new(99 * LUNATION, Ceiling::Bounded(1), 1, 8, "year"),
    // 3-year groups; the last group of each part has 2 years.
    CycleLevel::new(37 * LUNATION, Ceiling::Bounded(2), -1, 3, "year"),
    CycleLevel::flagged(12 * LUNATION, Ceiling::Bounded(2), 1, 1, "year", "embolismic"),
    CycleLevel::new(LUNATION, Ceiling::Bounded(11), 0, 1, "month"),
    CycleLevel::new(DAY, Ceiling::Unbounded, 0, 1, "date"),
    CycleLevel::new(3_600_000, Ceiling::Unbounded, 0, 1, "hours"),
    CycleLevel::new(60_000, Ceiling::Unbounded, 0, 1, "minutes"),
    CycleLevel::new(1_000, Ceiling::Unbounded, 0, 1, "seconds"),
    CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "milliseconds"),
];

const METONIC_CANVAS: &[FieldSpec] = &[
    FieldSpec::new("year", 2000),
    FieldSpec::new("month", 0),
    FieldSpec::new("date", 1),
    FieldSpec::new("hours", 0),
    FieldSpec::new("minutes", 0),
    FieldSpec::new("seconds", 0),
    FieldSpec::new("milliseconds", 0),
];

const METONIC_RULE: CalendarRule = CalendarRule::from_static(EPOCH, METONIC_LEVELS, METONIC_CANVAS);

static METONIC: Lazy<Chronos> =
    Lazy::new(|| Chronos::new(METONIC_RULE).expect("valid Metonic lunar rule"));

/// Mean lunar month marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MeanLunar;

impl Calendar for MeanLunar {
    const LABEL: &'static str = "Mean lunar";
    type Timeline = UnixMillis;

    #[inline]
    fn chronos() -> &'static Chronos {
        &CHRONOS
    }
}

impl MeanLunar {
    /// Timestamp of the mean new moon starting `lunation`.
    #[inline]
    pub fn new_moon(lunation: i64) -> i64 {
        EPOCH + lunation * LUNATION
    }

    /// Mean moon age at a Julian Day (UT), in fractional days.
    ///
    /// Fails with [`ArithmeticError::NotANumber`] for a NaN input.
    pub fn mean_moon_age(jd_ut: Days) -> Result<Days, ArithmeticError> {
        let elapsed = jd_ut - UnixMillis::julian_day(EPOCH);
        floor_mod_f64(elapsed.value(), SYNODIC_MONTH.value()).map(Days::new)
    }
}

/// Metonic lunar year marker.
///
/// Year 2000 starts with the mean new moon of 2000-01-06 and opens a 19-year
/// cycle, so lunar years stay within about a month of the Gregorian years
/// bearing the same number.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MetonicLunar;

impl Calendar for MetonicLunar {
    const LABEL: &'static str = "Metonic lunar";
    type Timeline = UnixMillis;

    #[inline]
    fn chronos() -> &'static Chronos {
        &METONIC
    }
}

impl MetonicLunar {
    /// Epact of Gregorian `year`: age of the mean moon, in whole days, at
    /// 0h UTC on 1 January.
    pub fn epact(year: i64) -> Result<i64, ComposeError> {
        let january_1 = Gregorian::from_civil(CivilDate::new(year, 1, 1))?;
        Ok(built_in_field(&Self::date(january_1), "date") - 1)
    }
}
