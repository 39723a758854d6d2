//! Edge-edge squared distance.
//!
//! Two segments are closest either interior-to-interior (the line-line
//! distance), endpoint-to-interior (a point-line distance) or
//! endpoint-to-endpoint (a point-point distance). The classifier follows the
//! clamped segment-segment parametrization.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::line_line::{line_line_distance, line_line_distance_gradient, line_line_distance_hessian};
use crate::point_line::{
    point_line_distance, point_line_distance_gradient, point_line_distance_hessian,
};
use crate::point_point::{
    point_point_distance, point_point_distance_gradient, point_point_distance_hessian,
};
use crate::stencil::{scatter_gradient, scatter_hessian};
use crate::{Matrix12, Vector12};

/// Pairs with `|u × v|² < PARALLEL_THRESHOLD · |u|² |v|²` are treated as parallel.
const PARALLEL_THRESHOLD: f64 = 1.0e-20;

/// Which features of edges `a = (ea0, ea1)` and `b = (eb0, eb1)` are closest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeEdgeDistanceType {
    /// `ea0` to `eb0`.
    Ea0Eb0,
    /// `ea0` to `eb1`.
    Ea0Eb1,
    /// `ea1` to `eb0`.
    Ea1Eb0,
    /// `ea1` to `eb1`.
    Ea1Eb1,
    /// Interior of `a` to `eb0`.
    EaEb0,
    /// Interior of `a` to `eb1`.
    EaEb1,
    /// `ea0` to the interior of `b`.
    Ea0Eb,
    /// `ea1` to the interior of `b`.
    Ea1Eb,
    /// Interior to interior.
    EaEb,
}

/// Classify the closest features of two segments.
///
/// Nearly parallel pairs whose closest points would both be interior are
/// reported as an endpoint-to-interior case instead, so the line-line
/// formula is only used where it is well conditioned.
#[must_use]
pub fn edge_edge_distance_type(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
) -> EdgeEdgeDistanceType {
    use EdgeEdgeDistanceType as T;

    let u = ea1 - ea0;
    let v = eb1 - eb0;
    let w = ea0 - eb0;

    let a = u.norm_squared();
    let b = u.dot(&v);
    let c = v.norm_squared();
    let d = u.dot(&w);
    let e = v.dot(&w);
    let denom = a * c - b * b;

    // Parameters along a and b are s = s_num / denom and t = t_num / t_denom.
    let s_num = b * e - c * d;
    let mut t_denom = denom;
    let t_num;
    let default_case;

    if s_num <= 0.0 {
        t_num = e;
        t_denom = c;
        default_case = T::Ea0Eb;
    } else if s_num >= denom {
        t_num = e + b;
        t_denom = c;
        default_case = T::Ea1Eb;
    } else {
        let interior_t = a * e - b * d;
        if interior_t > 0.0 && interior_t < t_denom && u.cross(&v).norm_squared() < PARALLEL_THRESHOLD * a * c {
            if s_num < denom / 2.0 {
                t_num = e;
                default_case = T::Ea0Eb;
            } else {
                t_num = e + b;
                default_case = T::Ea1Eb;
            }
            t_denom = c;
        } else {
            t_num = interior_t;
            default_case = T::EaEb;
        }
    }

    if t_num <= 0.0 {
        // Clamped to eb0; s = -d / a.
        if -d <= 0.0 {
            T::Ea0Eb0
        } else if -d >= a {
            T::Ea1Eb0
        } else {
            T::EaEb0
        }
    } else if t_num >= t_denom {
        // Clamped to eb1; s = (b - d) / a.
        if b - d <= 0.0 {
            T::Ea0Eb1
        } else if b - d >= a {
            T::Ea1Eb1
        } else {
            T::EaEb1
        }
    } else {
        default_case
    }
}

/// Squared edge-edge distance for the given sub-case.
#[must_use]
pub fn edge_edge_distance(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
    dtype: EdgeEdgeDistanceType,
) -> f64 {
    use EdgeEdgeDistanceType as T;
    match dtype {
        T::Ea0Eb0 => point_point_distance(ea0, eb0),
        T::Ea0Eb1 => point_point_distance(ea0, eb1),
        T::Ea1Eb0 => point_point_distance(ea1, eb0),
        T::Ea1Eb1 => point_point_distance(ea1, eb1),
        T::EaEb0 => point_line_distance(eb0, ea0, ea1),
        T::EaEb1 => point_line_distance(eb1, ea0, ea1),
        T::Ea0Eb => point_line_distance(ea0, eb0, eb1),
        T::Ea1Eb => point_line_distance(ea1, eb0, eb1),
        T::EaEb => line_line_distance(ea0, ea1, eb0, eb1),
    }
}

/// Gradient of [`edge_edge_distance`] with respect to `(ea0, ea1, eb0, eb1)`.
#[must_use]
pub fn edge_edge_distance_gradient(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
    dtype: EdgeEdgeDistanceType,
) -> Vector12 {
    use EdgeEdgeDistanceType as T;
    match dtype {
        T::Ea0Eb0 => scatter_gradient(&point_point_distance_gradient(ea0, eb0), &[0, 2]),
        T::Ea0Eb1 => scatter_gradient(&point_point_distance_gradient(ea0, eb1), &[0, 3]),
        T::Ea1Eb0 => scatter_gradient(&point_point_distance_gradient(ea1, eb0), &[1, 2]),
        T::Ea1Eb1 => scatter_gradient(&point_point_distance_gradient(ea1, eb1), &[1, 3]),
        T::EaEb0 => scatter_gradient(&point_line_distance_gradient(eb0, ea0, ea1), &[2, 0, 1]),
        T::EaEb1 => scatter_gradient(&point_line_distance_gradient(eb1, ea0, ea1), &[3, 0, 1]),
        T::Ea0Eb => scatter_gradient(&point_line_distance_gradient(ea0, eb0, eb1), &[0, 2, 3]),
        T::Ea1Eb => scatter_gradient(&point_line_distance_gradient(ea1, eb0, eb1), &[1, 2, 3]),
        T::EaEb => line_line_distance_gradient(ea0, ea1, eb0, eb1),
    }
}

/// Hessian of [`edge_edge_distance`] with respect to `(ea0, ea1, eb0, eb1)`.
#[must_use]
pub fn edge_edge_distance_hessian(
    ea0: &Vector3<f64>,
    ea1: &Vector3<f64>,
    eb0: &Vector3<f64>,
    eb1: &Vector3<f64>,
    dtype: EdgeEdgeDistanceType,
) -> Matrix12 {
    use EdgeEdgeDistanceType as T;
    match dtype {
        T::Ea0Eb0 => scatter_hessian(&point_point_distance_hessian(ea0, eb0), &[0, 2]),
        T::Ea0Eb1 => scatter_hessian(&point_point_distance_hessian(ea0, eb1), &[0, 3]),
        T::Ea1Eb0 => scatter_hessian(&point_point_distance_hessian(ea1, eb0), &[1, 2]),
        T::Ea1Eb1 => scatter_hessian(&point_point_distance_hessian(ea1, eb1), &[1, 3]),
        T::EaEb0 => scatter_hessian(&point_line_distance_hessian(eb0, ea0, ea1), &[2, 0, 1]),
        T::EaEb1 => scatter_hessian(&point_line_distance_hessian(eb1, ea0, ea1), &[3, 0, 1]),
        T::Ea0Eb => scatter_hessian(&point_line_distance_hessian(ea0, eb0, eb1), &[0, 2, 3]),
        T::Ea1Eb => scatter_hessian(&point_line_distance_hessian(ea1, eb0, eb1), &[1, 2, 3]),
        T::EaEb => line_line_distance_hessian(ea0, ea1, eb0, eb1),
    }
}
