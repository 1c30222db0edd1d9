// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.
//!
//! Three families, matching the three ways a computation can go wrong:
//!
//! - [`ArithmeticError`]: misuse of a modular-arithmetic primitive.
//! - [`RuleError`]: a malformed calendar or week rule, reported when the
//!   [`Chronos`](crate::Chronos) or [`WeekClock`](crate::WeekClock) is built.
//! - [`ComposeError`]: a field set that cannot be composed into a timestamp.
//!
//! An invalid *input timestamp* is not an error: it flows through
//! [`Decomposition::Invalid`](crate::Decomposition::Invalid).

/// Error returned by the functions of [`modular`](crate::modular).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArithmeticError {
    /// An operand is NaN.
    #[error("operand is not a number")]
    NotANumber,

    /// The divisor (or period) is zero or negative.
    #[error("divisor must be strictly positive, got {divisor}")]
    NonPositiveDivisor {
        /// The rejected divisor.
        divisor: f64,
    },

    /// The phase handed to `shift_cycle_phase` lies outside `[base, base + period)`.
    #[error("phase {phase} outside [{base}, {base} + {period})")]
    PhaseOutOfRange {
        /// The rejected phase.
        phase: i64,
        /// Lowest admissible phase.
        base: i64,
        /// Cycle period.
        period: i64,
    },
}

/// Error returned when a [`CalendarRule`](crate::CalendarRule) or a
/// [`WeekRule`](crate::WeekRule) is malformed.
///
/// These indicate a defect in a rule table, never a runtime data problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The rule declares no cycle level.
    #[error("rule has no cycle level")]
    NoLevels,

    /// A level has a zero or negative cycle length.
    #[error("level {level}: cycle length must be positive, got {value}")]
    NonPositiveCycleLength {
        /// Index of the offending level.
        level: usize,
        /// The rejected length.
        value: i64,
    },

    /// A level has a zero or negative multiplier.
    #[error("level {level}: multiplier must be positive, got {value}")]
    NonPositiveMultiplier {
        /// Index of the offending level.
        level: usize,
        /// The rejected multiplier.
        value: i64,
    },

    /// A level has a bounded ceiling that is zero or negative.
    #[error("level {level}: ceiling must be positive, got {value}")]
    NonPositiveCeiling {
        /// Index of the offending level.
        level: usize,
        /// The rejected ceiling.
        value: i64,
    },

    /// A level has a sub-cycle shift outside `{-1, 0, +1}`.
    #[error("level {level}: sub-cycle shift must be -1, 0 or 1, got {value}")]
    InvalidSubCycleShift {
        /// Index of the offending level.
        level: usize,
        /// The rejected shift.
        value: i64,
    },

    /// A level targets a field that the canvas does not declare.
    #[error("level {level}: target field `{target}` is not declared in the canvas")]
    UnknownTarget {
        /// Index of the offending level.
        level: usize,
        /// The undeclared field name.
        target: String,
    },

    /// The canvas declares the same field twice.
    #[error("field `{name}` is declared more than once")]
    DuplicateField {
        /// The duplicated name.
        name: String,
    },

    /// Some `i64` timestamp would decompose into a value of this field that
    /// does not fit in `i64`.
    #[error("field `{name}` can overflow for timestamps far from the epoch")]
    FieldOutOfRange {
        /// The field name.
        name: String,
    },

    /// A notify flag reuses the name of a canvas field.
    #[error("level {level}: notify flag `{flag}` shadows a canvas field")]
    FlagShadowsField {
        /// Index of the offending level.
        level: usize,
        /// The clashing flag name.
        flag: String,
    },

    /// A week rule has a zero or negative week length.
    #[error("week length must be positive, got {value}")]
    NonPositiveWeekLength {
        /// The rejected week length.
        value: i64,
    },

    /// Uncapped weeks only make sense when weeks restart every year.
    #[error("uncapped weeks require weeks that reset at each year start")]
    UncappedWithoutReset,

    /// Uncapped weeks must be listed in increasing order from `week_base`.
    #[error("uncapped week {week} is out of order or before the first week")]
    MisplacedUncappedWeek {
        /// The offending week number.
        week: i64,
    },
}

/// Error returned by [`Chronos::compose`](crate::Chronos::compose),
/// [`Chronos::compose_values`](crate::Chronos::compose_values) and
/// [`Calendar::to_utc`](crate::Calendar::to_utc).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    /// A canvas field has no value.
    #[error("missing value for field `{name}`")]
    MissingField {
        /// The missing field name.
        name: String,
    },

    /// A field value is NaN, infinite, fractional, or outside `i64`.
    #[error("field `{name}` is not an integer: {value}")]
    NonIntegralField {
        /// The field name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// The fields lie so far from the epoch that the timestamp leaves `i64`.
    #[error("composed timestamp does not fit in 64 bits")]
    TimestampOverflow,

    /// A civil month outside 1 to 12.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// The composed timestamp has no UTC representation.
    #[error("timestamp {timestamp} is outside the representable UTC range")]
    OutOfRange {
        /// The composed timestamp.
        timestamp: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_messages() {
        assert_eq!(
            ArithmeticError::NotANumber.to_string(),
            "operand is not a number"
        );
        assert_eq!(
            ArithmeticError::NonPositiveDivisor { divisor: 0.0 }.to_string(),
            "divisor must be strictly positive, got 0"
        );
        assert_eq!(
            ArithmeticError::PhaseOutOfRange {
                phase: 12,
                base: 0,
                period: 12
            }
            .to_string(),
            "phase 12 outside [0, 0 + 12)"
        );
    }

    #[test]
    fn rule_messages() {
        let e = RuleError::UnknownTarget {
            level: 3,
            target: "month".into(),
        };
        assert_eq!(
            e.to_string(),
            "level 3: target field `month` is not declared in the canvas"
        );
        let e = RuleError::InvalidSubCycleShift { level: 1, value: 2 };
        assert_eq!(
            e.to_string(),
            "level 1: sub-cycle shift must be -1, 0 or 1, got 2"
        );
    }

    #[test]
    fn compose_messages() {
        let e = ComposeError::NonIntegralField {
            name: "date".into(),
            value: 1.5,
        };
        assert_eq!(e.to_string(), "field `date` is not an integer: 1.5");
    }

    #[test]
    fn errors_are_send_sync_std() {
        fn assert_impl<T: std::error::Error + Send + Sync>() {}
        assert_impl::<ArithmeticError>();
        assert_impl::<RuleError>();
        assert_impl::<ComposeError>();
    }
}
