// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T)
//!
//! **ΔT = TT − UT**, the drift of Earth-rotation time against uniform time.
//! Calendar clocks display civil (UT-based) time while astronomical events
//! (mean new moons, equinoxes) are computed in dynamical time, so the two
//! must be reconciled with this correction.
//!
//! The model is the piecewise one of *Jean Meeus, Astronomical Algorithms
//! (2nd ed. 1998)*, chapter 9:
//!
//! | Range (JD, UT) | Model |
//! |----------------|-------|
//! | before 948 CE | Stephenson & Houlden quadratic |
//! | 948–1600 | second Stephenson & Houlden quadratic |
//! | 1620–1992 | interpolation around the nearest biennial entry |
//! | 1992–2010 | interpolation between the 1990/2000/2010 estimates |
//! | after 2010 | extrapolation, equation (9.1) |
//!
//! ```
//! use cbcce::delta_t::delta_t;
//! use qtty::{Days, Seconds};
//!
//! let dt = delta_t(Days::new(2_451_545.0));
//! assert!((dt - Seconds::new(63.83)).abs() < Seconds::new(0.5));
//! ```

use qtty::{Days, Seconds, Simplify};

/// Biennial entries, 1620 to 1992.
const TERMS: usize = 187;

/// Biennial ΔT table from 1620 to 1992, in seconds (Meeus, table 9.a).
#[rustfmt::skip]
const TABLE: [Seconds; TERMS] = qtty::qtty_vec!(
    Seconds;
    124.0,115.0,106.0, 98.0, 91.0, 85.0, 79.0, 74.0, 70.0, 65.0,
     62.0, 58.0, 55.0, 53.0, 50.0, 48.0, 46.0, 44.0, 42.0, 40.0,
     37.0, 35.0, 33.0, 31.0, 28.0, 26.0, 24.0, 22.0, 20.0, 18.0,
     16.0, 14.0, 13.0, 12.0, 11.0, 10.0,  9.0,  9.0,  9.0,  9.0,
      9.0,  9.0,  9.0,  9.0, 10.0, 10.0, 10.0, 10.0, 10.0, 11.0,
     11.0, 11.0, 11.0, 11.0, 11.0, 11.0, 12.0, 12.0, 12.0, 12.0,
     12.0, 12.0, 13.0, 13.0, 13.0, 13.0, 14.0, 14.0, 14.0, 15.0,
     15.0, 15.0, 15.0, 16.0, 16.0, 16.0, 16.0, 16.0, 17.0, 17.0,
     17.0, 17.0, 17.0, 17.0, 17.0, 17.0, 16.0, 16.0, 15.0, 14.0,
     13.7, 13.1, 12.7, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.3,
     12.0, 11.4, 10.6,  9.6,  8.6,  7.5,  6.6,  6.0,  5.7,  5.6,
      5.7,  5.9,  6.2,  6.5,  6.8,  7.1,  7.3,  7.5,  7.7,  7.8,
      7.9,  7.5,  6.4,  5.4,  2.9,  1.6, -1.0, -2.7, -3.6, -4.7,
     -5.4, -5.2, -5.5, -5.6, -5.8, -5.9, -6.2, -6.4, -6.1, -4.7,
     -2.7,  0.0,  2.6,  5.4,  7.7, 10.5, 13.4, 16.0, 18.2, 20.2,
     21.2, 22.4, 23.5, 23.9, 24.3, 24.0, 23.9, 23.9, 23.7, 24.0,
     24.3, 25.3, 26.2, 27.3, 28.2, 29.1, 30.0, 30.7, 31.4, 32.2,
     33.1, 34.0, 35.0, 36.5, 38.3, 40.2, 42.2, 44.5, 46.5, 48.5,
     50.5, 52.2, 53.8, 54.9, 55.8, 56.9, 58.3,
);

const JULIAN_CENTURY: Days = Days::new(36_525.0);

/// Segment boundaries (JD, UT).
const JD_948: Days = Days::new(2_067_314.5);
const JD_1600: Days = Days::new(2_305_447.5);
const JD_1992: Days = Days::new(2_448_622.5);
const JD_2010: Days = Days::new(2_455_197.5);

/// `c0 + c1·T + c2·T²` seconds, `T` in Julian centuries from `epoch`.
struct Parabola {
    epoch: Days,
    coefficients: [f64; 3],
}

impl Parabola {
    fn at(&self, jd: Days) -> Seconds {
        let t = ((jd - self.epoch) / JULIAN_CENTURY).simplify().value();
        let [c0, c1, c2] = self.coefficients;
        Seconds::new(c0 + t * (c1 + t * c2))
    }
}

/// Stephenson & Houlden, before 948.
const EARLY: Parabola = Parabola {
    epoch: JD_948,
    coefficients: [1_830.0, -405.0, 46.5],
};

/// Stephenson & Houlden, 948 to 1600, centred on 1850.
const MEDIEVAL: Parabola = Parabola {
    epoch: Days::new(2_396_758.5),
    coefficients: [0.0, 0.0, 22.5],
};

/// Equation (9.1), centred on 1810.
const LONG_TERM: Parabola = Parabola {
    epoch: Days::new(2_382_148.0),
    coefficients: [-15.0, 0.0, 32.5],
};

/// Three-point interpolation (Meeus eq. 3.3). `n` is measured in table
/// steps from the middle value `y[1]`.
#[inline]
fn interpolate(y: [Seconds; 3], n: f64) -> Seconds {
    let a = y[1] - y[0];
    let b = y[2] - y[1];
    let c = b - a;
    y[1] + n / 2.0 * (a + b + n * c)
}

/// Interpolation in [`TABLE`] around the entry nearest to `jd`.
fn biennial(jd: Days) -> Seconds {
    const JD_1620: Days = Days::new(2_312_752.5);
    const STEP: Days = Days::new(730.5);

    let steps = ((jd - JD_1620) / STEP).simplify().value();
    let centre = (steps.round().max(1.0) as usize).min(TERMS - 2);
    let n = steps - centre as f64;
    interpolate([TABLE[centre - 1], TABLE[centre], TABLE[centre + 1]], n)
}

/// Between Meeus' estimates for 1990, 2000 and 2010.
fn decadal(jd: Days) -> Seconds {
    const JD_2000: Days = Days::new(2_451_544.5);
    const DECADE: Days = Days::new(3_652.5);
    const ESTIMATES: [Seconds; 3] = [Seconds::new(56.86), Seconds::new(63.83), Seconds::new(70.0)];

    interpolate(ESTIMATES, ((jd - JD_2000) / DECADE).simplify().value())
}

/// **ΔT** for a Julian Day on the UT axis.
pub fn delta_t(jd_ut: Days) -> Seconds {
    match jd_ut {
        jd if jd < JD_948 => EARLY.at(jd),
        jd if jd < JD_1600 => MEDIEVAL.at(jd),
        jd if jd < JD_1992 => biennial(jd),
        jd if jd <= JD_2010 => decadal(jd),
        jd => LONG_TERM.at(jd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Seconds, b: f64) -> bool {
        (a - Seconds::new(b)).abs() < Seconds::new(1e-6)
    }

    #[test]
    fn table_entries_are_hit_exactly() {
        // 1620.0, 1622.0 and 1900.0 (the 140th entry).
        assert!(close(delta_t(Days::new(2_312_752.5)), 124.0));
        assert!(close(delta_t(Days::new(2_313_483.0)), 115.0));
        assert!(close(biennial(Days::new(2_312_752.5 + 140.0 * 730.5)), -2.7));
    }

    #[test]
    fn halfway_between_entries() {
        // 1621.0, between 124 and 115.
        assert!(close(delta_t(Days::new(2_313_117.75)), 119.5));
    }

    #[test]
    fn parabolic_segments() {
        // 1 January of year 1, and a date in 1311.
        assert!(close(delta_t(Days::new(1_721_423.5)), 9_835.485_449_403_588));
        assert!(close(delta_t(Days::new(2_200_000.0)), 652.933_685_637_667_7));
        assert!(close(delta_t(Days::new(2_461_000.5)), 136.472_518_342_522_73));
    }

    #[test]
    fn j2000_matches_iers_value() {
        let dt = delta_t(Days::new(2_451_545.0));
        assert!((dt - Seconds::new(63.83)).abs() < Seconds::new(0.01));
    }

    #[test]
    fn table_joins_the_decadal_estimates() {
        let before = delta_t(JD_1992 - Days::new(0.5));
        let after = delta_t(JD_1992 + Days::new(0.5));
        assert!(close(before, 58.292_577_023_135_4));
        assert!(close(after, 58.318_986_987_712_93));
    }
}
