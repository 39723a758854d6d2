//! Constraint-set counting and flat indexing.

use nalgebra::Vector3;
use proptest::prelude::*;
use sim_ipc::{
    BarrierParams, CollisionConstraint, ConstraintKind, ConstraintSet, EdgeEdgeConstraint,
    EdgeVertexConstraint, FaceVertexConstraint, IpcError, PlaneVertexConstraint,
    VertexVertexConstraint,
};

use crate::common::Scene;

// =============================================================================
// Strategies
// =============================================================================

/// A constraint of any kind; vertex-vertex and edge-vertex get a random
/// multiplicity in `1..=5`.
fn arb_constraint() -> impl Strategy<Value = CollisionConstraint> {
    (0..5usize, 1..=5u32, 0..4usize).prop_map(|(kind, multiplicity, id)| match kind {
        0 => VertexVertexConstraint::new(id, (id + 1) % 4)
            .with_multiplicity(multiplicity)
            .unwrap()
            .into(),
        1 => EdgeVertexConstraint::new(id % 3, id)
            .with_multiplicity(multiplicity)
            .unwrap()
            .into(),
        2 => EdgeEdgeConstraint::new(0, 1, 1e-3).unwrap().into(),
        3 => FaceVertexConstraint::new(0, id).into(),
        _ => PlaneVertexConstraint::new(Vector3::zeros(), Vector3::z(), id)
            .unwrap()
            .into(),
    })
}

fn build(constraints: &[CollisionConstraint]) -> ConstraintSet {
    let mut set = ConstraintSet::new();
    for c in constraints {
        set.push(c.clone());
    }
    set
}

proptest! {
    #[test]
    fn num_constraints_never_below_len(constraints in prop::collection::vec(arb_constraint(), 0..40)) {
        let set = build(&constraints);
        prop_assert_eq!(set.len(), constraints.len());
        prop_assert!(set.num_constraints() >= set.len());

        let all_single = set.iter().all(|c| c.multiplicity() == 1);
        prop_assert_eq!(set.num_constraints() == set.len(), all_single);

        let expected: usize = constraints
            .iter()
            .map(|c| c.to_ref().multiplicity() as usize)
            .sum();
        prop_assert_eq!(set.num_constraints(), expected);
    }

    #[test]
    fn flat_index_visits_kinds_in_fixed_order(constraints in prop::collection::vec(arb_constraint(), 0..40)) {
        let set = build(&constraints);

        let indexed: Vec<ConstraintKind> = (0..set.len())
            .map(|i| set.get(i).unwrap().kind())
            .collect();
        let iterated: Vec<ConstraintKind> = set.iter().map(|c| c.kind()).collect();
        prop_assert_eq!(&indexed, &iterated);

        // stable partition of the insertion order by kind
        let mut expected = Vec::new();
        for kind in ConstraintKind::ALL {
            expected.extend(constraints.iter().map(CollisionConstraint::kind).filter(|k| *k == kind));
        }
        prop_assert_eq!(&indexed, &expected);

        let past_end = set.get(set.len());
        prop_assert_eq!(past_end, Err(IpcError::IndexOutOfRange { index: set.len(), len: set.len() }));
    }
}

#[test]
fn indexing_within_a_kind_preserves_insertion_order() {
    let mut set = ConstraintSet::new();
    set.push(EdgeVertexConstraint::new(0, 3));
    set.push(VertexVertexConstraint::new(5, 6));
    set.push(EdgeVertexConstraint::new(1, 4));

    assert_eq!(set.len(), 3);
    match (set.get(1).unwrap(), set.get(2).unwrap()) {
        (sim_ipc::ConstraintRef::EdgeVertex(a), sim_ipc::ConstraintRef::EdgeVertex(b)) => {
            assert_eq!((a.edge(), a.vertex()), (0, 3));
            assert_eq!((b.edge(), b.vertex()), (1, 4));
        }
        other => panic!("unexpected order: {other:?}"),
    }
}

#[test]
fn clear_then_rebuild() {
    let mut set = ConstraintSet::new();
    set.push(VertexVertexConstraint::new(0, 1).with_multiplicity(4).unwrap());
    set.push(FaceVertexConstraint::new(0, 0));
    assert_eq!(set.num_constraints(), 5);

    set.clear();
    assert!(set.is_empty());
    assert!(set.get(0).unwrap_err().is_out_of_range());

    set.push(EdgeEdgeConstraint::new(0, 1, 1e-3).unwrap());
    assert_eq!(set.len(), 1);
    assert_eq!(set.get(0).unwrap().kind(), ConstraintKind::EdgeEdge);
}

#[test]
fn global_gradient_is_sum_of_scattered_local_gradients() {
    let scene = Scene::from_rows(&[
        [0.0, 0.0, 0.03],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.2, 0.2, 0.05],
    ]);
    let params = BarrierParams::new(0.1);
    let mut set = ConstraintSet::new();
    set.push(FaceVertexConstraint::new(0, 0));
    set.push(PlaneVertexConstraint::new(Vector3::zeros(), Vector3::z(), 0).unwrap());
    set.push(PlaneVertexConstraint::new(Vector3::zeros(), Vector3::z(), 3).unwrap());

    let global = set.compute_potential_gradient(&scene.vertices, &scene.edges, &scene.faces, &params);
    assert_eq!(global.len(), 12);

    let mut expected = nalgebra::DVector::zeros(12);
    for c in set.iter() {
        let local = scene.gradient(c, &params);
        for (k, &v) in c.vertex_indices(&scene.edges, &scene.faces).iter().enumerate() {
            for d in 0..3 {
                expected[3 * v + d] += local[3 * k + d];
            }
        }
    }
    for i in 0..12 {
        approx::assert_relative_eq!(global[i], expected[i], epsilon = 1e-12);
    }

    let total: f64 = set.iter().map(|c| scene.potential(c, &params)).sum();
    approx::assert_relative_eq!(
        set.compute_potential(&scene.vertices, &scene.edges, &scene.faces, &params),
        total,
        max_relative = 1e-12
    );
}
