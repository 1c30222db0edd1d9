// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Declarative calendar rules.
//!
//! A [`CalendarRule`] describes a calendar's intercalation structure as a
//! nested hierarchy of fixed-length cycles. It is plain data: it is checked
//! and compiled by [`Chronos::new`](crate::Chronos::new), never mutated, and
//! can be shared freely.
//!
//! Built-in tables are `const` values borrowing `'static` slices; rules read
//! from a configuration file own their data. Both are the same type thanks to
//! [`Cow`].
//!
//! ```
//! use cbcce::{CalendarRule, Ceiling, CycleLevel, FieldSpec};
//!
//! // Hours and minutes of a day counted in minutes.
//! const LEVELS: &[CycleLevel] = &[
//!     CycleLevel::new(60, Ceiling::Unbounded, 0, 1, "hours"),
//!     CycleLevel::new(1, Ceiling::Unbounded, 0, 1, "minutes"),
//! ];
//! const CANVAS: &[FieldSpec] = &[FieldSpec::new("hours", 0), FieldSpec::new("minutes", 0)];
//! const CLOCK: CalendarRule = CalendarRule::from_static(0, LEVELS, CANVAS);
//!
//! assert_eq!(CLOCK.levels().len(), 2);
//! ```

use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum count of a cycle within its parent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Ceiling {
    /// At most this many repetitions; the last one absorbs the parent's tail.
    Bounded(i64),
    /// Never capped.
    Unbounded,
}

impl Ceiling {
    /// Ceiling after applying the sub-cycle shift carried from the parent level.
    ///
    /// An unbounded ceiling stays unbounded.
    #[inline]
    pub const fn shifted(self, add_cycle: i64) -> Self {
        match self {
            Ceiling::Bounded(n) => Ceiling::Bounded(n.saturating_add(add_cycle)),
            Ceiling::Unbounded => Ceiling::Unbounded,
        }
    }

    /// `true` if `count` is exactly this ceiling.
    #[inline]
    pub const fn is_reached_by(self, count: i64) -> bool {
        match self {
            Ceiling::Bounded(n) => count == n,
            Ceiling::Unbounded => false,
        }
    }

    /// Caps a non-negative `count` at this ceiling.
    #[inline]
    pub(crate) fn cap(self, count: i128) -> i128 {
        match self {
            Ceiling::Bounded(n) => count.min(n.max(0) as i128),
            Ceiling::Unbounded => count,
        }
    }
}

/// One tier of the nested-cycle hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleLevel {
    /// Duration of one repetition, in the timestamp's elementary unit.
    pub cycle_length: i64,
    /// Maximum count within the parent cycle.
    pub ceiling: Ceiling,
    /// Added to the next level's ceiling when this level hits its ceiling.
    pub sub_cycle_shift: i64,
    /// Units of the target field represented by one repetition.
    pub multiplier: i64,
    /// Output field this level contributes to.
    pub target: Cow<'static, str>,
    /// Optional boolean output set when this level hits its ceiling.
    #[cfg_attr(feature = "serde", serde(default))]
    pub notify: Option<Cow<'static, str>>,
}

impl CycleLevel {
    /// Creates a level without notify flag.
    pub const fn new(
        cycle_length: i64,
        ceiling: Ceiling,
        sub_cycle_shift: i64,
        multiplier: i64,
        target: &'static str,
    ) -> Self {
        Self {
            cycle_length,
            ceiling,
            sub_cycle_shift,
            multiplier,
            target: Cow::Borrowed(target),
            notify: None,
        }
    }

    /// Creates a level whose `flag` output is raised when it reaches its ceiling.
    pub const fn flagged(
        cycle_length: i64,
        ceiling: Ceiling,
        sub_cycle_shift: i64,
        multiplier: i64,
        target: &'static str,
        flag: &'static str,
    ) -> Self {
        Self {
            cycle_length,
            ceiling,
            sub_cycle_shift,
            multiplier,
            target: Cow::Borrowed(target),
            notify: Some(Cow::Borrowed(flag)),
        }
    }
}

/// An output field and its value at the rule's epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSpec {
    pub name: Cow<'static, str>,
    pub initial_value: i64,
}

impl FieldSpec {
    pub const fn new(name: &'static str, initial_value: i64) -> Self {
        Self {
            name: Cow::Borrowed(name),
            initial_value,
        }
    }
}

/// Nested-cycle description of a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarRule {
    /// Timestamp at which every canvas field holds its initial value.
    pub epoch: i64,
    /// Cycle levels, largest first.
    pub levels: Cow<'static, [CycleLevel]>,
    /// Output fields, in display order.
    pub canvas: Cow<'static, [FieldSpec]>,
}

impl CalendarRule {
    /// Builds a rule from `'static` tables, usable in `const` context.
    pub const fn from_static(
        epoch: i64,
        levels: &'static [CycleLevel],
        canvas: &'static [FieldSpec],
    ) -> Self {
        Self {
            epoch,
            levels: Cow::Borrowed(levels),
            canvas: Cow::Borrowed(canvas),
        }
    }

    /// Builds a rule owning its tables.
    pub fn new(epoch: i64, levels: Vec<CycleLevel>, canvas: Vec<FieldSpec>) -> Self {
        Self {
            epoch,
            levels: Cow::Owned(levels),
            canvas: Cow::Owned(canvas),
        }
    }

    #[inline]
    pub fn levels(&self) -> &[CycleLevel] {
        &self.levels
    }

    #[inline]
    pub fn canvas(&self) -> &[FieldSpec] {
        &self.canvas
    }
}
