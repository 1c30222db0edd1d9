// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The Milesian calendar.
//!
//! Twelve months of alternately 30 and 31 days (`1m` to `12m`), starting
//! on the northern winter solstice. Years follow the Gregorian 4/100/400
//! intercalation, with the leap day at the end of the year preceding the
//! Gregorian leap year, plus one common year every 3200 years.
//!
//! Months are counted from 0 and the day of month from 1.

use once_cell::sync::Lazy;

use super::{Calendar, DAY};
use crate::engine::Chronos;
use crate::rule::{CalendarRule, Ceiling, CycleLevel, FieldSpec};
use crate::timeline::UnixMillis;

/// 1 1m −4000, the start of a 3200-year cycle (−4001-12-23 proleptic Gregorian).
const EPOCH: i64 = -188_395_804_800_000;

const LEVELS: &[CycleLevel] = &[
    CycleLevel::new(1_168_775 * DAY, Ceiling::Unbounded, 0, 3200, "year"),
    CycleLevel::new(146_097 * DAY, Ceiling::Bounded(7), 0, 400, "year"),
    CycleLevel::new(36_524 * DAY, Ceiling::Bounded(3), 0, 100, "year"),
    CycleLevel::new(1_461 * DAY, Ceiling::Bounded(24), 0, 4, "year"),
    CycleLevel::flagged(365 * DAY, Ceiling::Bounded(3), 0, 1, "year", "leap"),
    // Two-month blocks of 30 + 31 days; the last 30-day month of the year
    // is capped so that its block absorbs the leap day.
    CycleLevel::new(61 * DAY, Ceiling::Unbounded, 0, 2, "month"),
    CycleLevel::new(30 * DAY, Ceiling::Bounded(1), 0, 1, "month"),
    CycleLevel::new(DAY, Ceiling::Unbounded, 0, 1, "date"),
    CycleLevel::new(3_600_000, Ceiling::Unbounded, 0, 1, "hours"),
    CycleLevel::new(60_000, Ceiling::Unbounded, 0, 1, "minutes"),
    CycleLevel::new(1_000, Ceiling::Unbounded, 0, 1, "seconds"),
    CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "milliseconds"),
];

const CANVAS: &[FieldSpec] = &[
    FieldSpec::new("year", -4000),
    FieldSpec::new("month", 0),
    FieldSpec::new("date", 1),
    FieldSpec::new("hours", 0),
    FieldSpec::new("minutes", 0),
    FieldSpec::new("seconds", 0),
    FieldSpec::new("milliseconds", 0),
];

const RULE: CalendarRule = CalendarRule::from_static(EPOCH, LEVELS, CANVAS);

static CHRONOS: Lazy<Chronos> =
    Lazy::new(|| Chronos::new(RULE).expect("valid Milesian rule"));

/// Milesian calendar marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Milesian;

impl Calendar for Milesian {
    const LABEL: &'static str = "Milesian";
    type Timeline = UnixMillis;

    #[inline]
    fn chronos() -> &'static Chronos {
        &CHRONOS
    }
}
