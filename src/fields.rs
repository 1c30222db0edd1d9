// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Decomposed dates.
//!
//! [`DateFields`] is the engine's output: one integer per canvas field, in
//! canvas order, plus the notify flags raised by the cycle levels. It is a
//! small association list; calendars rarely declare more than a dozen
//! fields, so lookups are linear scans.
//!
//! [`Decomposition`] wraps it for inputs that may not be a valid timestamp at
//! all. An invalid decomposition answers `NaN` for every field, so a display
//! layer can test any single field to detect "no valid date".

use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named integer fields of a decomposed date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateFields {
    values: Vec<(Cow<'static, str>, i64)>,
    #[cfg_attr(feature = "serde", serde(default))]
    flags: Vec<(Cow<'static, str>, bool)>,
}

impl DateFields {
    /// Empty field set; fill it with [`with`](Self::with).
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        values: Vec<(Cow<'static, str>, i64)>,
        flags: Vec<(Cow<'static, str>, bool)>,
    ) -> Self {
        Self { values, flags }
    }

    /// Value of field `name`.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Value of notify flag `name`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Sets field `name`, appending it if absent.
    pub fn set(&mut self, name: impl Into<Cow<'static, str>>, value: i64) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.values.push((name, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: i64) -> Self {
        self.set(name, value);
        self
    }

    /// Fields in canvas order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(n, v)| (n.as_ref(), *v))
    }

    /// Notify flags in level order.
    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(n, v)| (n.as_ref(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for DateFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
            first = false;
        }
        for (name, value) in self.flags() {
            write!(f, ", {name}: {value}")?;
        }
        Ok(())
    }
}

/// Outcome of decomposing a value that may not be a valid timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decomposition {
    Valid(DateFields),
    /// The input was NaN, infinite, fractional, or out of range.
    Invalid,
}

impl Decomposition {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Decomposition::Valid(_))
    }

    /// Value of field `name` as `f64`: `NaN` for an invalid decomposition or
    /// an unknown field.
    pub fn get(&self, name: &str) -> f64 {
        match self {
            Decomposition::Valid(fields) => fields.get(name).map_or(f64::NAN, |v| v as f64),
            Decomposition::Invalid => f64::NAN,
        }
    }

    /// The fields, if valid.
    pub fn valid(self) -> Option<DateFields> {
        match self {
            Decomposition::Valid(fields) => Some(fields),
            Decomposition::Invalid => None,
        }
    }

    /// Borrowing form of [`valid`](Self::valid).
    pub fn as_valid(&self) -> Option<&DateFields> {
        match self {
            Decomposition::Valid(fields) => Some(fields),
            Decomposition::Invalid => None,
        }
    }
}

impl From<DateFields> for Decomposition {
    fn from(fields: DateFields) -> Self {
        Decomposition::Valid(fields)
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decomposition::Valid(fields) => fmt::Display::fmt(fields, f),
            Decomposition::Invalid => f.write_str("invalid date"),
        }
    }
}
