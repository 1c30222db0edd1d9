// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Cycle-based calendar computation engine.
//!
//! [`Chronos`] converts a signed integer timestamp into the fields of a
//! calendar date ([`decompose`](Chronos::decompose)) and back
//! ([`compose`](Chronos::compose)). Both directions walk the rule's cycle
//! levels from the largest to the smallest and thread the sub-cycle shift
//! from one level to the next:
//!
//! ```text
//! remaining = t − epoch
//! for each level:
//!     q         = cycles of `cycle_length` in `remaining`, capped at `ceiling + add_cycle`
//!     add_cycle = sub_cycle_shift if q reached that ceiling, else 0
//!     field[target] += q × multiplier
//! ```
//!
//! Counts below zero are floored, never capped, so dates before the epoch
//! extend the calendar backwards without loss.
//!
//! # Example
//!
//! ```
//! use cbcce::{Calendar, Milesian};
//!
//! let chronos = Milesian::chronos();
//! // 1 January 1970 is the 12th day of the first Milesian month.
//! let fields = chronos.decompose(0);
//! assert_eq!(fields.get("year"), Some(1970));
//! assert_eq!(fields.get("month"), Some(0));
//! assert_eq!(fields.get("date"), Some(12));
//! assert_eq!(chronos.compose(&fields), Ok(0));
//! ```

use std::borrow::Cow;

use tracing::{debug, trace, warn};

use crate::error::{ComposeError, RuleError};
use crate::fields::{DateFields, Decomposition};
use crate::rule::{CalendarRule, Ceiling};

/// Quotient of `remaining` by `cycle_length`, floored when negative and
/// capped at `ceiling` otherwise. Returns the count and the new remainder.
#[inline]
fn capped_div(remaining: i128, cycle_length: i128, ceiling: Ceiling) -> (i128, i128) {
    let q = if remaining < 0 {
        remaining.div_euclid(cycle_length)
    } else {
        ceiling.cap(remaining / cycle_length)
    };
    (q, remaining - q * cycle_length)
}

#[inline]
fn reaches(ceiling: Ceiling, count: i128) -> bool {
    i64::try_from(count).is_ok_and(|count| ceiling.is_reached_by(count))
}

/// Sub-cycle shift threaded from one level to the next.
#[inline]
fn next_add_cycle(ceiling: Ceiling, count: i128, sub_cycle_shift: i64) -> i64 {
    if reaches(ceiling, count) {
        sub_cycle_shift
    } else {
        0
    }
}

/// Fails if some `i64` timestamp would decompose into a field outside `i64`.
///
/// Tracks the range of the remainder handed to each level, starting from
/// `[i64::MIN − epoch, i64::MAX − epoch]`, and the range each field can reach.
fn check_field_range(rule: &CalendarRule, targets: &[usize]) -> Result<(), RuleError> {
    let epoch = rule.epoch as i128;
    let (mut low, mut high) = (i64::MIN as i128 - epoch, i64::MAX as i128 - epoch);
    let mut ranges: Vec<(i128, i128)> = rule
        .canvas()
        .iter()
        .map(|spec| (spec.initial_value as i128, spec.initial_value as i128))
        .collect();
    let mut shift = 0;

    for (level, cycle) in rule.levels().iter().enumerate() {
        let length = cycle.cycle_length as i128;
        let (fewest, most) = if length == 1 {
            (low, high)
        } else {
            let mut most = high.div_euclid(length);
            if let Ceiling::Bounded(n) = cycle.ceiling {
                most = most.min(n.saturating_add(shift.max(0)) as i128);
            }
            (low.div_euclid(length).min(0), most)
        };
        let multiplier = cycle.multiplier as i128;
        let range = &mut ranges[targets[level]];
        range.0 = range.0.saturating_add(fewest.saturating_mul(multiplier));
        range.1 = range.1.saturating_add(most.saturating_mul(multiplier));

        high = match cycle.ceiling {
            _ if length == 1 => 0,
            Ceiling::Unbounded => length - 1,
            Ceiling::Bounded(n) => {
                let lowest = n.saturating_add(shift.min(0)).max(0) as i128;
                high.saturating_sub(lowest.saturating_mul(length)).max(length - 1)
            }
        };
        low = 0;
        shift = cycle.sub_cycle_shift;
    }

    let representable = i64::MIN as i128..=i64::MAX as i128;
    match rule.canvas().iter().zip(&ranges).find(|(_, (low, high))| {
        !representable.contains(low) || !representable.contains(high)
    }) {
        Some((spec, _)) => Err(RuleError::FieldOutOfRange {
            name: spec.name.to_string(),
        }),
        None => Ok(()),
    }
}

/// A validated calendar rule, ready to convert timestamps.
///
/// Built once per calendar with [`Chronos::new`]; holds only immutable data,
/// so it can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Chronos {
    rule: CalendarRule,
    /// Canvas index of each level's target.
    targets: Vec<usize>,
    /// Notify flag names, with the index of the level raising each.
    flags: Vec<(Cow<'static, str>, usize)>,
}

impl Chronos {
    /// Checks `rule` and resolves its field names.
    ///
    /// Fails on a rule without levels, a non-positive cycle length,
    /// multiplier or bounded ceiling, a sub-cycle shift outside `{-1, 0, 1}`,
    /// a target missing from the canvas, a duplicated canvas name, a
    /// notify flag named like a canvas field, or a rule under which some
    /// `i64` timestamp would yield a field outside `i64`.
    pub fn new(rule: CalendarRule) -> Result<Self, RuleError> {
        if rule.levels().is_empty() {
            return Err(RuleError::NoLevels);
        }

        let canvas = rule.canvas();
        for (i, spec) in canvas.iter().enumerate() {
            if canvas[..i].iter().any(|other| other.name == spec.name) {
                return Err(RuleError::DuplicateField {
                    name: spec.name.to_string(),
                });
            }
        }

        let mut targets = Vec::with_capacity(rule.levels().len());
        let mut flags: Vec<(Cow<'static, str>, usize)> = Vec::new();
        for (level, cycle) in rule.levels().iter().enumerate() {
            if cycle.cycle_length <= 0 {
                return Err(RuleError::NonPositiveCycleLength {
                    level,
                    value: cycle.cycle_length,
                });
            }
            if cycle.multiplier <= 0 {
                return Err(RuleError::NonPositiveMultiplier {
                    level,
                    value: cycle.multiplier,
                });
            }
            if let Ceiling::Bounded(n) = cycle.ceiling {
                if n <= 0 {
                    return Err(RuleError::NonPositiveCeiling { level, value: n });
                }
            }
            if !(-1..=1).contains(&cycle.sub_cycle_shift) {
                return Err(RuleError::InvalidSubCycleShift {
                    level,
                    value: cycle.sub_cycle_shift,
                });
            }
            let target = canvas
                .iter()
                .position(|spec| spec.name == cycle.target)
                .ok_or_else(|| RuleError::UnknownTarget {
                    level,
                    target: cycle.target.to_string(),
                })?;
            targets.push(target);

            if let Some(flag) = &cycle.notify {
                if canvas.iter().any(|spec| spec.name == *flag) {
                    return Err(RuleError::FlagShadowsField {
                        level,
                        flag: flag.to_string(),
                    });
                }
                flags.push((flag.clone(), level));
            }
        }

        check_field_range(&rule, &targets)?;

        if rule
            .levels()
            .windows(2)
            .any(|pair| pair[1].cycle_length > pair[0].cycle_length)
        {
            warn!(
                epoch = rule.epoch,
                "cycle levels are not ordered from largest to smallest"
            );
        }

        debug!(
            epoch = rule.epoch,
            levels = rule.levels().len(),
            fields = canvas.len(),
            flags = flags.len(),
            "calendar rule compiled"
        );

        Ok(Self {
            rule,
            targets,
            flags,
        })
    }

    /// The rule this engine was built from.
    #[inline]
    pub fn rule(&self) -> &CalendarRule {
        &self.rule
    }

    /// Timestamp at which every field holds its initial value.
    #[inline]
    pub fn epoch(&self) -> i64 {
        self.rule.epoch
    }

    /// Splits `timestamp` into the rule's fields.
    ///
    /// Every canvas field starts at its initial value and accumulates the
    /// contributions of the levels targeting it. Defined for every `i64`:
    /// [`new`](Self::new) only accepts rules whose fields stay within range.
    pub fn decompose(&self, timestamp: i64) -> DateFields {
        let canvas = self.rule.canvas();
        let mut values: Vec<i128> = canvas
            .iter()
            .map(|spec| spec.initial_value as i128)
            .collect();
        let mut raised = vec![false; self.rule.levels().len()];

        let mut remaining = timestamp as i128 - self.rule.epoch as i128;
        let mut add_cycle = 0;
        for (level, cycle) in self.rule.levels().iter().enumerate() {
            let ceiling = cycle.ceiling.shifted(add_cycle);
            let count = if cycle.cycle_length == 1 {
                std::mem::take(&mut remaining)
            } else {
                let (count, rest) = capped_div(remaining, cycle.cycle_length as i128, ceiling);
                remaining = rest;
                count
            };
            raised[level] = reaches(ceiling, count);
            add_cycle = next_add_cycle(ceiling, count, cycle.sub_cycle_shift);
            values[self.targets[level]] += count * cycle.multiplier as i128;
        }

        let values = canvas
            .iter()
            .zip(values)
            // In range by `check_field_range`.
            .map(|(spec, value)| (spec.name.clone(), value as i64))
            .collect();
        let flags = self
            .flags
            .iter()
            .map(|(name, level)| (name.clone(), raised[*level]))
            .collect();
        DateFields::from_parts(values, flags)
    }

    /// Splits a possibly invalid timestamp.
    ///
    /// NaN, infinities, fractional values and values outside `i64` yield
    /// [`Decomposition::Invalid`] instead of an error, so "no valid date"
    /// can flow through a display pipeline.
    pub fn decompose_value(&self, timestamp: f64) -> Decomposition {
        match as_integer(timestamp) {
            Some(t) => Decomposition::Valid(self.decompose(t)),
            None => {
                trace!(timestamp, "invalid timestamp, decomposition poisoned");
                Decomposition::Invalid
            }
        }
    }

    /// Rebuilds the timestamp of `fields`.
    ///
    /// Every canvas field must be present; other entries are ignored. Values
    /// are not range-checked: an out-of-range field carries into the
    /// enclosing one (month 12 of a 12-month year is month 0 of the next).
    /// Fails with [`ComposeError::TimestampOverflow`] when the result does
    /// not fit in `i64`.
    pub fn compose(&self, fields: &DateFields) -> Result<i64, ComposeError> {
        narrow(self.compose_wide(fields)?)
    }

    /// [`compose`](Self::compose) without narrowing the result to `i64`.
    pub(crate) fn compose_wide(&self, fields: &DateFields) -> Result<i128, ComposeError> {
        let shifted = self
            .rule
            .canvas()
            .iter()
            .map(|spec| {
                fields
                    .get(&spec.name)
                    .map(|value| value as i128 - spec.initial_value as i128)
                    .ok_or_else(|| ComposeError::MissingField {
                        name: spec.name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.compose_shifted(shifted)
    }

    /// [`compose`](Self::compose) for loosely typed input, such as values read
    /// from a form.
    ///
    /// Missing fields and values that are not integers are rejected.
    pub fn compose_values(&self, fields: &[(&str, f64)]) -> Result<i64, ComposeError> {
        let shifted = self
            .rule
            .canvas()
            .iter()
            .map(|spec| {
                let value = fields
                    .iter()
                    .find(|(name, _)| *name == spec.name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| ComposeError::MissingField {
                        name: spec.name.to_string(),
                    })?;
                as_integer(value)
                    .map(|v| v as i128 - spec.initial_value as i128)
                    .ok_or_else(|| ComposeError::NonIntegralField {
                        name: spec.name.to_string(),
                        value,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        narrow(self.compose_shifted(shifted)?)
    }

    /// Core of compose: `shifted[i]` is canvas field `i` minus its initial value.
    fn compose_shifted(&self, shifted: Vec<i128>) -> Result<i128, ComposeError> {
        let mut quantity = self.rule.epoch as i128;
        let mut add_cycle = 0;
        let mut current_target = self.targets[0];
        let mut counter = shifted[current_target];

        for (level, cycle) in self.rule.levels().iter().enumerate() {
            if self.targets[level] != current_target {
                current_target = self.targets[level];
                counter = shifted[current_target];
            }
            let multiplier = cycle.multiplier as i128;
            let ceiling = cycle.ceiling.shifted(add_cycle);
            let count = if cycle.cycle_length == 1 || counter < 0 {
                counter.div_euclid(multiplier)
            } else {
                ceiling.cap(counter / multiplier)
            };
            add_cycle = next_add_cycle(ceiling, count, cycle.sub_cycle_shift);
            counter -= count * multiplier;
            quantity = count
                .checked_mul(cycle.cycle_length as i128)
                .and_then(|span| quantity.checked_add(span))
                .ok_or(ComposeError::TimestampOverflow)?;
        }
        Ok(quantity)
    }
}

#[inline]
fn narrow(timestamp: i128) -> Result<i64, ComposeError> {
    i64::try_from(timestamp).map_err(|_| ComposeError::TimestampOverflow)
}

/// `value` as an `i64`, if it is an integer in range.
fn as_integer(value: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or beyond it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value.fract() == 0.0 && value >= -LIMIT && value < LIMIT {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{CycleLevel, FieldSpec};

    /// A 4-year block of 365-day years whose last year gets the leap day,
    /// split in 30-day months, counted in days.
    fn toy_rule() -> CalendarRule {
        CalendarRule::new(
            100,
            vec![
                CycleLevel::new(1461, Ceiling::Unbounded, 0, 4, "year"),
                CycleLevel::flagged(365, Ceiling::Bounded(3), 0, 1, "year", "leap"),
                CycleLevel::new(30, Ceiling::Unbounded, 0, 1, "month"),
                CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "day"),
            ],
            vec![
                FieldSpec::new("year", 0),
                FieldSpec::new("month", 0),
                FieldSpec::new("day", 1),
            ],
        )
    }

    fn ymd(fields: &DateFields) -> (i64, i64, i64) {
        (
            fields.get("year").unwrap(),
            fields.get("month").unwrap(),
            fields.get("day").unwrap(),
        )
    }

    #[test]
    fn epoch_yields_initial_values() {
        let chronos = Chronos::new(toy_rule()).unwrap();
        let fields = chronos.decompose(100);
        assert_eq!(ymd(&fields), (0, 0, 1));
        assert_eq!(fields.flag("leap"), Some(false));
    }

    #[test]
    fn last_year_of_block_absorbs_leap_day() {
        let chronos = Chronos::new(toy_rule()).unwrap();
        // Day 1460 of the block is the 366th day of year 3.
        let fields = chronos.decompose(100 + 1460);
        assert_eq!(ymd(&fields), (3, 12, 6));
        assert_eq!(fields.flag("leap"), Some(true));
        assert_eq!(ymd(&chronos.decompose(100 + 1461)), (4, 0, 1));
    }

    #[test]
    fn before_epoch_rolls_back() {
        let chronos = Chronos::new(toy_rule()).unwrap();
        let fields = chronos.decompose(99);
        assert_eq!(ymd(&fields), (-1, 12, 6));
        assert_eq!(fields.flag("leap"), Some(true));
        assert_eq!(ymd(&chronos.decompose(100 - 366)), (-1, 0, 1));
        assert_eq!(ymd(&chronos.decompose(100 - 367)), (-2, 12, 5));
    }

    #[test]
    fn compose_inverts_decompose() {
        let chronos = Chronos::new(toy_rule()).unwrap();
        for t in -5_000..5_000 {
            let fields = chronos.decompose(t);
            assert_eq!(chronos.compose(&fields), Ok(t), "t = {t}");
            assert_eq!(chronos.decompose(chronos.compose(&fields).unwrap()), fields);
        }
    }

    #[test]
    fn compose_carries_out_of_range_fields() {
        let chronos = Chronos::new(toy_rule()).unwrap();
        let day_32 = DateFields::new()
            .with("year", 0)
            .with("month", 0)
            .with("day", 32);
        let next_month = DateFields::new()
            .with("year", 0)
            .with("month", 1)
            .with("day", 2);
        assert_eq!(chronos.compose(&day_32), chronos.compose(&next_month));
    }

    #[test]
    fn compose_rejects_missing_and_fractional_fields() {
        let chronos = Chronos::new(toy_rule()).unwrap();
        let partial = DateFields::new().with("year", 0).with("month", 0);
        assert_eq!(
            chronos.compose(&partial),
            Err(ComposeError::MissingField { name: "day".into() })
        );
        assert_eq!(
            chronos.compose_values(&[("year", 1.0), ("month", 0.5), ("day", 1.0)]),
            Err(ComposeError::NonIntegralField {
                name: "month".into(),
                value: 0.5
            })
        );
        assert_eq!(
            chronos.compose_values(&[("day", 1.0), ("year", 0.0), ("month", 0.0)]),
            Ok(100)
        );
    }

    #[test]
    fn nan_timestamp_poisons_all_fields() {
        let chronos = Chronos::new(toy_rule()).unwrap();
        for bad in [f64::NAN, f64::INFINITY, 1.5, 1e19] {
            let d = chronos.decompose_value(bad);
            assert!(!d.is_valid());
            assert!(d.get("year").is_nan());
            assert!(d.get("month").is_nan());
            assert!(d.get("day").is_nan());
        }
        assert_eq!(
            chronos.decompose_value(100.0),
            Decomposition::Valid(chronos.decompose(100))
        );
    }

    #[test]
    fn malformed_rules_fail_fast() {
        let mut rule = toy_rule();
        rule.levels.to_mut()[2].cycle_length = 0;
        assert_eq!(
            Chronos::new(rule),
            Err(RuleError::NonPositiveCycleLength { level: 2, value: 0 })
        );

        let mut rule = toy_rule();
        rule.levels.to_mut()[0].target = "era".into();
        assert_eq!(
            Chronos::new(rule),
            Err(RuleError::UnknownTarget {
                level: 0,
                target: "era".into()
            })
        );

        let mut rule = toy_rule();
        rule.levels.to_mut()[1].sub_cycle_shift = 2;
        assert!(matches!(
            Chronos::new(rule),
            Err(RuleError::InvalidSubCycleShift { level: 1, value: 2 })
        ));

        let mut rule = toy_rule();
        rule.levels.to_mut()[1].notify = Some("month".into());
        assert!(matches!(
            Chronos::new(rule),
            Err(RuleError::FlagShadowsField { level: 1, .. })
        ));

        let mut rule = toy_rule();
        rule.canvas.to_mut().push(FieldSpec::new("year", 0));
        assert!(matches!(
            Chronos::new(rule),
            Err(RuleError::DuplicateField { .. })
        ));

        let rule = CalendarRule::new(0, Vec::new(), vec![FieldSpec::new("day", 0)]);
        assert_eq!(Chronos::new(rule), Err(RuleError::NoLevels));
    }

    #[test]
    fn sub_cycle_shift_lengthens_the_next_level_once() {
        // 9-day blocks of 2-day units; the third block (ceiling reached) lets
        // its units count up to 5 instead of 4.
        let rule = CalendarRule::new(
            0,
            vec![
                CycleLevel::new(9, Ceiling::Bounded(2), 1, 1, "block"),
                CycleLevel::new(2, Ceiling::Bounded(4), 0, 1, "unit"),
                CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "rest"),
            ],
            vec![
                FieldSpec::new("block", 0),
                FieldSpec::new("unit", 0),
                FieldSpec::new("rest", 0),
            ],
        );
        let chronos = Chronos::new(rule).unwrap();
        // In a regular block the unit count stops at 4.
        let f = chronos.decompose(8);
        assert_eq!((f.get("block"), f.get("unit"), f.get("rest")), (Some(0), Some(4), Some(0)));
        // In the third block, starting at day 18, unit 5 exists.
        let f = chronos.decompose(18 + 10);
        assert_eq!((f.get("block"), f.get("unit"), f.get("rest")), (Some(2), Some(5), Some(0)));
        for t in -50..50 {
            assert_eq!(chronos.compose(&chronos.decompose(t)), Ok(t));
        }
    }

    #[test]
    fn extreme_timestamps_round_trip() {
        let chronos = Chronos::new(toy_rule()).unwrap();
        for t in [i64::MIN, i64::MIN + 1, i64::MAX - 1, i64::MAX] {
            let fields = chronos.decompose(t);
            assert_eq!(chronos.compose(&fields), Ok(t));
        }
        let far = DateFields::new()
            .with("year", i64::MAX)
            .with("month", 0)
            .with("day", 1);
        assert_eq!(chronos.compose(&far), Err(ComposeError::TimestampOverflow));
    }

    #[test]
    fn rules_that_overflow_a_field_are_rejected() {
        // A bare counter offset from zero: t = i64::MAX is epoch + 2^63 + 9.
        let counter = |epoch| {
            CalendarRule::new(
                epoch,
                vec![CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "tick")],
                vec![FieldSpec::new("tick", 0)],
            )
        };
        assert!(Chronos::new(counter(0)).is_ok());
        assert_eq!(
            Chronos::new(counter(-10)),
            Err(RuleError::FieldOutOfRange {
                name: "tick".into()
            })
        );
        let chronos = Chronos::new(counter(0)).unwrap();
        assert_eq!(chronos.decompose(i64::MIN).get("tick"), Some(i64::MIN));
    }
}
