// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Built-in calendars.
//!
//! Each zero-sized marker carries a `const` [`CalendarRule`] on the
//! [`UnixMillis`](crate::UnixMillis) timeline and a shared [`Chronos`] built
//! on first use.
//!
//! | Marker | Year start | Intercalation |
//! |--------|------------|---------------|
//! | [`Milesian`] | 1 1m (≈ 21 December) | Gregorian leap years shifted to the year end, 3200-year exception |
//! | [`Gregorian`] | 1 March | 4/100/400-year rule |
//! | [`Julian`] | 1 March | every 4th year |
//! | [`FrenchRevolutionary`] | 1 Vendémiaire (≈ 22 September) | franciades of 4 or 5 years, 33 and 128-year cycles |
//! | [`MeanLunar`] | mean new moon | mean synodic month |
//! | [`MetonicLunar`] | mean new moon | 13th embolismic month, 7 times in 19 years |
//!
//! Gregorian and Julian years are counted from 1 March so that the leap day
//! is the last day of the year. [`CivilDate`] re-bases them to January.
//!
//! Every rule ends with the same time-of-day levels: `hours`, `minutes`,
//! `seconds` and `milliseconds`.

mod french_rev;
mod gregorian;
mod julian;
mod lunar;
mod milesian;

pub use french_rev::{decade_rule, FrenchRevolutionary};
pub use gregorian::{iso_week_rule, Gregorian};
pub use julian::Julian;
pub use lunar::{MeanLunar, MetonicLunar, SYNODIC_MONTH};
pub use milesian::Milesian;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::Chronos;
use crate::error::{ArithmeticError, ComposeError};
use crate::fields::DateFields;
use crate::modular::shift_cycle_phase;
use crate::rule::CalendarRule;
use crate::timeline::Timeline;

/// One day, in milliseconds.
pub(crate) const DAY: i64 = 86_400_000;

/// A calendar with a built-in rule table.
pub trait Calendar {
    /// Display name.
    const LABEL: &'static str;

    /// Counter the rule's timestamps are expressed in.
    type Timeline: Timeline;

    /// Shared engine, built on first use.
    fn chronos() -> &'static Chronos;

    /// The rule table.
    #[inline]
    fn rule() -> &'static CalendarRule {
        Self::chronos().rule()
    }

    /// Fields of `timestamp`.
    #[inline]
    fn date(timestamp: i64) -> DateFields {
        Self::chronos().decompose(timestamp)
    }

    /// Fields of a UTC instant.
    fn from_utc(datetime: DateTime<Utc>) -> DateFields {
        Self::date(Self::Timeline::from_utc(datetime))
    }

    /// UTC instant of `fields`.
    fn to_utc(fields: &DateFields) -> Result<DateTime<Utc>, ComposeError> {
        let timestamp = Self::chronos().compose(fields)?;
        Self::Timeline::to_utc(timestamp).ok_or(ComposeError::OutOfRange { timestamp })
    }
}

/// A date with months numbered from 1 = January.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CivilDate {
    pub year: i64,
    /// 1 to 12.
    pub month: i64,
    /// From 1.
    pub day: i64,
}

impl CivilDate {
    pub const fn new(year: i64, month: i64, day: i64) -> Self {
        Self { year, month, day }
    }
}

/// Field of a decomposition produced by a built-in rule.
pub(crate) fn built_in_field(fields: &DateFields, name: &str) -> i64 {
    fields
        .get(name)
        .expect("built-in canvases declare every field read back")
}

/// Civil date of fields decomposed by a March-based rule (month 0 = March).
pub(crate) fn march_to_civil(fields: &DateFields) -> CivilDate {
    let (year, month) = shift_cycle_phase(
        built_in_field(fields, "year"),
        built_in_field(fields, "month"),
        12,
        2,
        0,
    )
    .expect("March-based rules yield months 0 to 11");
    CivilDate::new(year, month + 1, built_in_field(fields, "date"))
}

/// Midnight fields of `date` for a March-based rule.
///
/// The day is not range-checked and carries like any other field.
pub(crate) fn civil_to_march(date: CivilDate) -> Result<DateFields, ArithmeticError> {
    let (year, month) = shift_cycle_phase(date.year, date.month - 1, 12, -2, 0)?;
    Ok(midnight(year, month, date.day))
}

/// Fields of the first millisecond of a day.
pub(crate) fn midnight(year: i64, month: i64, date: i64) -> DateFields {
    DateFields::new()
        .with("year", year)
        .with("month", month)
        .with("date", date)
        .with("hours", 0)
        .with("minutes", 0)
        .with("seconds", 0)
        .with("milliseconds", 0)
}

/// Composes fields of a built-in rule, without narrowing to `i64`.
///
/// Every canvas field is present, and built-in cycle lengths keep the sum
/// far inside `i128` for any `i64` field values.
pub(crate) fn compose_built_in(chronos: &Chronos, fields: &DateFields) -> i128 {
    chronos
        .compose_wide(fields)
        .expect("fields built for a built-in canvas compose")
}
