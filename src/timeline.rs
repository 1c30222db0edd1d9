// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Timeline marker types.
//!
//! A calendar rule counts time in some *elementary unit* from some origin.
//! Each zero-sized marker here names one such counter and relates it to
//! civil UTC time, to the Julian Day and to the day index consumed by the
//! [`WeekClock`](crate::WeekClock).
//!
//! | Marker | Unit | Value at 1970-01-01T00:00:00Z |
//! |--------|------|-------------------------------|
//! | [`UnixMillis`] | millisecond | 0 |
//! | [`UnixDays`] | day | 0 |

use chrono::{DateTime, Utc};
use qtty::{Days, Seconds};

use crate::delta_t::delta_t;

/// Julian Day of 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Marker trait for integer time counters.
///
/// Conversions are provided methods built on the two constants, so a marker
/// only declares its unit.
pub trait Timeline: Copy + Clone + std::fmt::Debug + PartialEq + 'static {
    /// Elementary units in one day.
    const UNITS_PER_DAY: i64;

    /// Counter value of a UTC instant, floored to the unit.
    fn from_utc(datetime: DateTime<Utc>) -> i64 {
        let millis = datetime.timestamp_millis();
        let millis_per_unit = MILLIS_PER_DAY / Self::UNITS_PER_DAY;
        millis.div_euclid(millis_per_unit)
    }

    /// UTC instant at the start of counter value `value`.
    ///
    /// Returns `None` outside chrono's representable range.
    fn to_utc(value: i64) -> Option<DateTime<Utc>> {
        let millis = value.checked_mul(MILLIS_PER_DAY / Self::UNITS_PER_DAY)?;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }

    /// Whole days since 1970-01-01, floored.
    #[inline]
    fn day_index(value: i64) -> i64 {
        value.div_euclid(Self::UNITS_PER_DAY)
    }

    /// Counter value at the start of day `day_index`.
    #[inline]
    fn from_day_index(day_index: i64) -> i64 {
        day_index * Self::UNITS_PER_DAY
    }

    /// Julian Day (UT axis) of counter value `value`.
    fn julian_day(value: i64) -> Days {
        UNIX_EPOCH_JD + Days::new(value as f64 / Self::UNITS_PER_DAY as f64)
    }

    /// **ΔT = TT − UT** at counter value `value`.
    #[inline]
    fn delta_t(value: i64) -> Seconds {
        delta_t(Self::julian_day(value))
    }
}

/// Milliseconds since 1970-01-01T00:00:00Z, the unit of the built-in
/// calendar rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnixMillis;

impl Timeline for UnixMillis {
    const UNITS_PER_DAY: i64 = MILLIS_PER_DAY;
}

/// Days since 1970-01-01.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnixDays;

impl Timeline for UnixDays {
    const UNITS_PER_DAY: i64 = 1;
}
