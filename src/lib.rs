// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Cycle-based calendar computation engine.
//!
//! Calendars are described as data: a [`CalendarRule`] nests fixed-length
//! cycles (400 years, 4 years, one year, a pair of months, a day...) and the
//! generic [`Chronos`] engine converts timestamps to named date fields and
//! back by walking those cycles. Irregular intercalation (the 5-year
//! franciade, the common 3200th Milesian year, the embolismic lunar month)
//! is expressed with ceilings and sub-cycle shifts, never with
//! calendar-specific code.
//!
//! # Core types
//!
//! - [`CalendarRule`]: epoch, [`CycleLevel`]s and canvas of [`FieldSpec`]s.
//! - [`Chronos`]: validated rule with [`decompose`](Chronos::decompose) and
//!   [`compose`](Chronos::compose).
//! - [`DateFields`]: named fields and notify flags of a date.
//! - [`Decomposition`]: fields of a timestamp that may be NaN.
//! - [`WeekClock`]: week number, weekday and week-year of a day index,
//!   following a [`WeekRule`].
//! - [`modular`]: floor-convention modular arithmetic and
//!   [`shift_cycle_phase`](modular::shift_cycle_phase).
//!
//! # Calendars
//!
//! | Marker | Calendar |
//! |--------|----------|
//! | [`Milesian`] | Milesian |
//! | [`Gregorian`] | proleptic Gregorian, years from 1 March, ISO 8601 weeks |
//! | [`Julian`] | proleptic Julian, years from 1 March |
//! | [`FrenchRevolutionary`] | French Republican, with décades |
//! | [`MeanLunar`] | mean synodic months |
//! | [`MetonicLunar`] | lunar years of 12 or 13 mean months, 19-year cycle |
//!
//! All built-in rules count milliseconds on the [`UnixMillis`] timeline.
//!
//! ```
//! use cbcce::{Calendar, CivilDate, Gregorian, Milesian};
//!
//! let t = Gregorian::from_civil(CivilDate::new(2000, 1, 1)).unwrap();
//! let fields = Milesian::date(t);
//! assert_eq!(fields.get("year"), Some(2000));
//! assert_eq!(fields.get("date"), Some(11));
//! ```
//!
//! # ΔT (Delta T)
//!
//! [`delta_t::delta_t`] gives **ΔT = TT − UT** for a Julian Day; each
//! [`Timeline`] exposes it per counter value.

mod calendars;
pub mod delta_t;
mod engine;
mod error;
mod fields;
pub mod modular;
mod rule;
mod timeline;
mod week;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendars::{
    decade_rule, iso_week_rule, Calendar, CivilDate, FrenchRevolutionary, Gregorian, Julian,
    MeanLunar, MetonicLunar, Milesian, SYNODIC_MONTH,
};
pub use engine::Chronos;
pub use error::{ArithmeticError, ComposeError, RuleError};
pub use fields::{DateFields, Decomposition};
pub use rule::{CalendarRule, Ceiling, CycleLevel, FieldSpec};
pub use timeline::{Timeline, UnixDays, UnixMillis};
pub use week::{WeekClock, WeekFigures, WeekRule};
