//! Barrier contact potentials for deformable-body collision handling.
//!
//! This crate turns proximate primitive pairs of a surface mesh into a smooth
//! barrier energy, with the gradient and Hessian an implicit integrator or
//! Newton solver needs:
//!
//! - **Barrier**: a C² log barrier on squared distances, offset by a minimum
//!   separation and switched on below an activation distance `dhat`
//! - **Constraints**: vertex-vertex, edge-vertex, edge-edge, face-vertex and
//!   plane-vertex pairs, each evaluated from the current vertex positions
//! - **Mollification**: edge-edge potentials are weighted by a mollifier that
//!   fades them out as the edges become parallel
//! - **PSD projection**: local Hessians can be projected onto the
//!   positive-semidefinite cone
//! - **Friction**: the smoothed Coulomb friction mollifiers used by lagged
//!   friction
//!
//! # Potential
//!
//! For a constraint with squared distance `s(x)`, clearance `m` and
//! activation distance `d̂`:
//!
//! ```text
//! B(x) = b(s(x) - m², 2·m·d̂ + d̂²)
//! ∇B   = b' ∇s
//! ∇²B  = b'' ∇s ∇sᵀ + b' ∇²s
//! ```
//!
//! `b'' ≥ 0`, so only the `b' ∇²s` term can be indefinite; PSD projection is
//! applied to that term alone. Edge-edge constraints multiply `B` by the
//! mollifier and project their whole Hessian.
//!
//! # Local stencils
//!
//! Gradients and Hessians are returned in the constraint's local layout: the
//! vertices from `vertex_indices`, with 2 or 3 coordinates each (the column
//! count of the vertex matrix). [`VectorMax12`] and [`MatrixMax12`] hold up
//! to 12 entries on the stack.
//!
//! # Example
//!
//! ```
//! use nalgebra::DMatrix;
//! use sim_ipc::{BarrierParams, ConstraintSet, VertexVertexConstraint};
//!
//! let vertices = DMatrix::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 0.05, 0.0, 0.0]);
//! let params = BarrierParams::new(0.1);
//!
//! let mut constraints = ConstraintSet::new();
//! constraints.push(VertexVertexConstraint::new(0, 1).with_multiplicity(2)?);
//!
//! let potential = constraints.compute_potential(&vertices, &[], &[], &params);
//! assert!(potential > 0.0);
//!
//! let hessian = constraints
//!     .get(0)?
//!     .compute_potential_hessian(&vertices, &[], &[], &params, true);
//! assert_eq!(hessian.dim(), 6);
//! # Ok::<(), sim_ipc::IpcError>(())
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluate [`ConstraintSet::compute_potential`] with rayon
//! - `serde`: serialization for constraints, sets and parameters

#![doc(html_root_url = "https://docs.rs/sim-ipc/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn, // Many functions can't be const due to nalgebra
    clippy::module_name_repetitions,
    clippy::too_many_arguments,
)]
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod barrier;
pub mod config;
pub mod constraint_set;
pub mod constraints;
pub mod error;
pub mod friction;
pub mod local;

pub use barrier::{
    barrier, barrier_gradient, barrier_hessian, barrier_potential, barrier_potential_gradient,
    barrier_potential_hessian,
};
pub use config::{BarrierParams, FrictionParams};
pub use constraint_set::ConstraintSet;
pub use constraints::{
    CollisionConstraint, ConstraintKind, ConstraintMut, ConstraintRef, EdgeEdgeConstraint,
    EdgeVertexConstraint, FaceVertexConstraint, PlaneVertexConstraint, VertexVertexConstraint,
};
pub use error::{IpcError, Result};
pub use friction::{
    smooth_friction_f0, smooth_friction_f1_over_x, smooth_friction_f2_x_minus_f1_over_x3,
    smooth_friction_potential,
};
pub use local::{MAX_LOCAL_DOF, MatrixMax12, VectorMax12};

// Re-export the distance crate so callers get matching primitive types.
pub use sim_distance;
