// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Floor-based modular arithmetic.
//!
//! Calendar arithmetic needs the *floor* convention: the remainder always has
//! the sign of the divisor, so that day −1 of a cycle is its last day rather
//! than a negative phase. Rust's `%` truncates toward zero; for the strictly
//! positive divisors accepted here, `div_euclid`/`rem_euclid` coincide with
//! the floor convention and are used directly.
//!
//! Integer variants cannot receive a NaN; the `f64` variants can and report
//! it as [`ArithmeticError::NotANumber`].

use crate::error::ArithmeticError;

#[inline]
fn check_divisor(d: i64) -> Result<(), ArithmeticError> {
    if d <= 0 {
        return Err(ArithmeticError::NonPositiveDivisor { divisor: d as f64 });
    }
    Ok(())
}

/// Remainder of `a` by `d`, in `0..d`.
///
/// ```
/// use cbcce::modular::floor_mod;
///
/// assert_eq!(floor_mod(-1, 7), Ok(6));
/// assert_eq!(floor_mod(15, 7), Ok(1));
/// ```
#[inline]
pub fn floor_mod(a: i64, d: i64) -> Result<i64, ArithmeticError> {
    check_divisor(d)?;
    Ok(a.rem_euclid(d))
}

/// Floor quotient and remainder of `a` by `d`: `a == q * d + r` with `0 <= r < d`.
#[inline]
pub fn floor_div_mod(a: i64, d: i64) -> Result<(i64, i64), ArithmeticError> {
    check_divisor(d)?;
    Ok((a.div_euclid(d), a.rem_euclid(d)))
}

/// [`floor_mod`] for floating-point operands.
///
/// The result lies in `[0, d)`.
pub fn floor_mod_f64(a: f64, d: f64) -> Result<f64, ArithmeticError> {
    floor_div_mod_f64(a, d).map(|(_, r)| r)
}

/// [`floor_div_mod`] for floating-point operands.
///
/// The quotient is an integral `f64`; the remainder lies in `[0, d)`.
pub fn floor_div_mod_f64(a: f64, d: f64) -> Result<(f64, f64), ArithmeticError> {
    if a.is_nan() || d.is_nan() {
        return Err(ArithmeticError::NotANumber);
    }
    if d <= 0.0 {
        return Err(ArithmeticError::NonPositiveDivisor { divisor: d });
    }
    let mut q = (a / d).floor();
    let mut r = a - q * d;
    // Rounding in `a / d` may leave r one divisor off.
    if r < 0.0 {
        q -= 1.0;
        r += d;
    } else if r >= d {
        q += 1.0;
        r -= d;
    }
    Ok((q, r))
}

/// Re-expresses a `(cycle, phase)` pair after moving the cycle boundary by
/// `shift` phase units.
///
/// The phase must lie in `[base, base + period)`. The returned phase lies in
/// the same range, and the cycle is carried by the floor quotient. Typical
/// use: a year counted from 1 March (month 0 = March) becomes a year counted
/// from 1 January with `shift = 2`.
///
/// ```
/// use cbcce::modular::shift_cycle_phase;
///
/// // January of a March-based year 1999 is month 0 of civil year 2000.
/// assert_eq!(shift_cycle_phase(1999, 10, 12, 2, 0), Ok((2000, 0)));
/// // And back.
/// assert_eq!(shift_cycle_phase(2000, 0, 12, -2, 0), Ok((1999, 10)));
/// ```
pub fn shift_cycle_phase(
    cycle: i64,
    phase: i64,
    period: i64,
    shift: i64,
    base: i64,
) -> Result<(i64, i64), ArithmeticError> {
    check_divisor(period)?;
    if phase < base || phase >= base + period {
        return Err(ArithmeticError::PhaseOutOfRange {
            phase,
            base,
            period,
        });
    }
    let (carry, phase) = floor_div_mod(phase - base + shift, period)?;
    Ok((cycle + carry, phase + base))
}
