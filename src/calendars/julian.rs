// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The proleptic Julian calendar, with years counted from 1 March like
//! [`Gregorian`](super::Gregorian).

use once_cell::sync::Lazy;

use super::{civil_to_march, march_to_civil, Calendar, CivilDate, DAY};
use crate::engine::Chronos;
use crate::error::ComposeError;
use crate::rule::{CalendarRule, Ceiling, CycleLevel, FieldSpec};
use crate::timeline::UnixMillis;

/// 0000-03-01 (proleptic Julian), two days before its Gregorian namesake.
const EPOCH: i64 = -62_162_208_000_000;

const LEVELS: &[CycleLevel] = &[
    CycleLevel::new(1_461 * DAY, Ceiling::Unbounded, 0, 4, "year"),
    CycleLevel::flagged(365 * DAY, Ceiling::Bounded(3), 0, 1, "year", "leap"),
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

static CHRONOS: Lazy<Chronos> = Lazy::new(|| Chronos::new(RULE).expect("valid Julian rule"));

/// Julian calendar marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Julian;

impl Calendar for Julian {
    const LABEL: &'static str = "Julian";
    type Timeline = UnixMillis;

    #[inline]
    fn chronos() -> &'static Chronos {
        &CHRONOS
    }
}

impl Julian {
    #[inline]
    pub const fn is_leap_year(year: i64) -> bool {
        year.rem_euclid(4) == 0
    }

    /// January-based date of `timestamp`.
    pub fn civil(timestamp: i64) -> CivilDate {
        march_to_civil(&Self::date(timestamp))
    }

    /// Timestamp of midnight at the start of `date`; see
    /// [`Gregorian::from_civil`](super::Gregorian::from_civil).
    pub fn from_civil(date: CivilDate) -> Result<i64, ComposeError> {
        let fields = civil_to_march(date)?;
        Self::chronos().compose(&fields)
    }
}
