//! Smoothed Coulomb friction.
//!
//! Lagged IPC friction replaces the non-smooth `|u|` of the Coulomb
//! dissipation potential with a C¹ mollifier `f0` that is cubic below the
//! speed `εv` and linear above it:
//!
//! ```text
//! f0(s) = -s³/(3εv²) + s²/εv + εv/3    |s| < εv
//! f0(s) = s                            |s| ≥ εv
//! ```
//!
//! The force and force-Jacobian assembly need `f1(s)/s` and
//! `(f1'(s)·s - f1(s))/s³` with `f1 = f0'`; both have closed forms that stay
//! finite at `s = 0` inside the smoothing band.
//!
//! `s` is a tangential speed magnitude, so callers pass `s ≥ 0`.

use crate::FrictionParams;

/// Mollified speed `f0(s)`.
#[must_use]
pub fn smooth_friction_f0(s: f64, epsv: f64) -> f64 {
    if s.abs() >= epsv {
        return s;
    }
    s * s * (-s / (3.0 * epsv) + 1.0) / epsv + epsv / 3.0
}

/// `f0'(s) / s`.
#[must_use]
pub fn smooth_friction_f1_over_x(s: f64, epsv: f64) -> f64 {
    if s.abs() >= epsv {
        return 1.0 / s;
    }
    (-s / epsv + 2.0) / epsv
}

/// `(f1'(s)·s - f1(s)) / s³`.
///
/// Inside the band this is `-1/(s·εv²)`, which is unbounded as `s → 0`; the
/// quantity it multiplies vanishes there, so `s = 0` returns 0.
#[must_use]
pub fn smooth_friction_f2_x_minus_f1_over_x3(s: f64, epsv: f64) -> f64 {
    if s.abs() >= epsv {
        return -1.0 / (s * s * s);
    }
    if s == 0.0 {
        return 0.0;
    }
    -1.0 / (s * epsv * epsv)
}

/// Dissipation potential `μ · λ · f0(s)` for a contact with normal force
/// magnitude `normal_force` sliding at tangential speed `s`.
#[must_use]
pub fn smooth_friction_potential(s: f64, normal_force: f64, params: &FrictionParams) -> f64 {
    params.mu * normal_force * smooth_friction_f0(s, params.epsv)
}
