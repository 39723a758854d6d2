//! Log barrier and its composition with squared distances.
//!
//! # Barrier function
//!
//! For a squared-distance argument `d` and activation threshold `t`:
//!
//! ```text
//! b(d, t) = -(d - t)² · ln(d / t)     0 < d < t
//! b(d, t) = 0                         d ≥ t
//! ```
//!
//! `b` is C² at `d = t`, decreasing, and diverges as `d → 0⁺`. Arguments
//! `d ≤ 0` (penetration) evaluate to `+∞`.
//!
//! # Composition
//!
//! Constraints feed squared primitive distances `s(x)`. With clearance `m`
//! and activation distance `d̂` the barrier is evaluated at
//!
//! ```text
//! B(x) = b(s(x) - m², 2·m·d̂ + d̂²)
//! ```
//!
//! so `B` switches on exactly when the unsquared distance drops below
//! `m + d̂`.

use tracing::trace;

use crate::{BarrierParams, MatrixMax12, VectorMax12};

/// Barrier value `b(d, dhat)`.
#[must_use]
pub fn barrier(d: f64, dhat: f64) -> f64 {
    if d <= 0.0 {
        return f64::INFINITY;
    }
    if d >= dhat {
        return 0.0;
    }
    let d_minus_dhat = d - dhat;
    -d_minus_dhat * d_minus_dhat * (d / dhat).ln()
}

/// First derivative `∂b/∂d`.
#[must_use]
pub fn barrier_gradient(d: f64, dhat: f64) -> f64 {
    if d <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if d >= dhat {
        return 0.0;
    }
    (dhat - d) * (2.0 * (d / dhat).ln() - dhat / d + 1.0)
}

/// Second derivative `∂²b/∂d²`. Non-negative wherever it is finite.
#[must_use]
pub fn barrier_hessian(d: f64, dhat: f64) -> f64 {
    if d <= 0.0 {
        return f64::INFINITY;
    }
    if d >= dhat {
        return 0.0;
    }
    let ratio = dhat / d;
    (ratio + 2.0) * ratio - 2.0 * (d / dhat).ln() - 3.0
}

/// Offset barrier argument and threshold for a squared distance.
pub(crate) fn barrier_arguments(distance_sqr: f64, params: &BarrierParams) -> (f64, f64) {
    (
        distance_sqr - params.squared_offset(),
        params.squared_activation(),
    )
}

/// `B = b(s - m², 2·m·d̂ + d̂²)` for a squared distance `s`.
#[must_use]
pub fn barrier_potential(distance_sqr: f64, params: &BarrierParams) -> f64 {
    let (x, t) = barrier_arguments(distance_sqr, params);
    barrier(x, t)
}

/// `∇B = b' · ∇s`.
#[must_use]
pub fn barrier_potential_gradient(
    distance_sqr: f64,
    distance_grad: &VectorMax12,
    params: &BarrierParams,
) -> VectorMax12 {
    let (x, t) = barrier_arguments(distance_sqr, params);
    *distance_grad * barrier_gradient(x, t)
}

/// `∇²B = b'' · ∇s ∇sᵀ + b' · ∇²s`.
///
/// The first term is PSD because `b'' ≥ 0`, so `project_to_psd` only
/// projects the second term.
#[must_use]
pub fn barrier_potential_hessian(
    distance_sqr: f64,
    distance_grad: &VectorMax12,
    distance_hess: &MatrixMax12,
    params: &BarrierParams,
    project_to_psd: bool,
) -> MatrixMax12 {
    let (x, t) = barrier_arguments(distance_sqr, params);
    let grad_b = barrier_gradient(x, t);
    let hess_b = barrier_hessian(x, t);
    debug_assert!(
        hess_b >= 0.0,
        "barrier second derivative must be non-negative, got {hess_b} at {x}"
    );
    trace!(x, t, grad_b, hess_b, "barrier hessian");

    let curvature = *distance_hess * grad_b;
    let curvature = if project_to_psd {
        curvature.project_to_psd()
    } else {
        curvature
    };
    distance_grad.outer(distance_grad) * hess_b + curvature
}
