//! Squared distances between mesh primitives, with analytic derivatives.
//!
//! Every `*_distance` function in this crate returns the **squared** Euclidean
//! distance between two primitives, and the matching `*_gradient` and
//! `*_hessian` functions differentiate that squared value with respect to the
//! stacked point coordinates, three entries per point, in argument order.
//! Squared distances are polynomial or rational in the coordinates, so their
//! derivatives stay bounded where the plain distance would not.
//!
//! # Primitive pairs
//!
//! | Pair | Local DOF | Sub-cases |
//! |------|-----------|-----------|
//! | point-point | 6 | - |
//! | point-line | 9 | - |
//! | point-edge | 9 | [`PointEdgeDistanceType`] |
//! | point-plane | 3 | - |
//! | point-triangle | 12 | [`PointTriangleDistanceType`] |
//! | line-line | 12 | - |
//! | edge-edge | 12 | [`EdgeEdgeDistanceType`] |
//!
//! Bounded primitives (edges, triangles) are closest to one of several
//! features. The classifiers (`*_distance_type`) pick the feature, and the
//! dispatching functions evaluate the formula for that feature while keeping
//! the full local layout, so callers always get a fixed-size result.
//!
//! # Edge-edge mollifier
//!
//! The line-line distance is singular for parallel edges. [`edge_edge_mollifier`]
//! provides the C¹ weight that fades an edge-edge potential out as the edges
//! become parallel, together with its gradient and Hessian.
//!
//! # Two-dimensional meshes
//!
//! Points are always [`Vector3`]. Planar callers place points at `z = 0`: the
//! squared distance restricted to a plane is the planar squared distance, and
//! its planar gradient and Hessian are the `x`/`y` sub-blocks of the results.
//!
//! # Example
//!
//! ```
//! use nalgebra::Vector3;
//! use sim_distance::{PointEdgeDistanceType, point_edge_distance, point_edge_distance_type};
//!
//! let p = Vector3::new(0.5, 1.0, 0.0);
//! let e0 = Vector3::new(0.0, 0.0, 0.0);
//! let e1 = Vector3::new(1.0, 0.0, 0.0);
//!
//! let dtype = point_edge_distance_type(&p, &e0, &e1);
//! assert_eq!(dtype, PointEdgeDistanceType::Edge);
//! assert!((point_edge_distance(&p, &e0, &e1, dtype) - 1.0).abs() < 1e-12);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-distance/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn, // Many functions can't be const due to nalgebra
    clippy::many_single_char_names, // Geometry formulas read better with math names
    clippy::similar_names,
)]
#![cfg_attr(test, allow(clippy::float_cmp))]

mod edge_edge;
mod line_line;
mod mollifier;
mod point_edge;
mod point_line;
mod point_plane;
mod point_point;
mod point_triangle;
mod stencil;

pub use edge_edge::{
    EdgeEdgeDistanceType, edge_edge_distance, edge_edge_distance_gradient,
    edge_edge_distance_hessian, edge_edge_distance_type,
};
pub use line_line::{line_line_distance, line_line_distance_gradient, line_line_distance_hessian};
pub use mollifier::{
    EDGE_EDGE_MOLLIFIER_SCALE, edge_edge_cross_squarednorm, edge_edge_cross_squarednorm_gradient,
    edge_edge_cross_squarednorm_hessian, edge_edge_mollifier, edge_edge_mollifier_gradient,
    edge_edge_mollifier_hessian, edge_edge_mollifier_threshold,
};
pub use point_edge::{
    PointEdgeDistanceType, point_edge_distance, point_edge_distance_gradient,
    point_edge_distance_hessian, point_edge_distance_type,
};
pub use point_line::{
    point_line_distance, point_line_distance_gradient, point_line_distance_hessian,
};
pub use point_plane::{
    point_plane_distance, point_plane_distance_gradient, point_plane_distance_hessian,
};
pub use point_point::{
    point_point_distance, point_point_distance_gradient, point_point_distance_hessian,
};
pub use point_triangle::{
    PointTriangleDistanceType, point_triangle_distance, point_triangle_distance_gradient,
    point_triangle_distance_hessian, point_triangle_distance_type,
};

pub use nalgebra::{SMatrix, SVector, Vector3};

/// Gradient of a two-point distance (6 DOF).
pub type Vector6 = SVector<f64, 6>;
/// Gradient of a three-point distance (9 DOF).
pub type Vector9 = SVector<f64, 9>;
/// Gradient of a four-point distance (12 DOF).
pub type Vector12 = SVector<f64, 12>;
/// Hessian of a two-point distance.
pub type Matrix6 = SMatrix<f64, 6, 6>;
/// Hessian of a three-point distance.
pub type Matrix9 = SMatrix<f64, 9, 9>;
/// Hessian of a four-point distance.
pub type Matrix12 = SMatrix<f64, 12, 12>;
