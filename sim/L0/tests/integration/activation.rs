//! Barrier activation: zero beyond `min_distance + dhat`, positive inside.

use approx::assert_relative_eq;
use nalgebra::Vector3;
use sim_ipc::{
    BarrierParams, CollisionConstraint, EdgeEdgeConstraint, EdgeVertexConstraint,
    FaceVertexConstraint, PlaneVertexConstraint, VertexVertexConstraint, barrier,
};

use crate::common::{Scene, random_vertices, rng};

fn all_kinds() -> Vec<CollisionConstraint> {
    vec![
        VertexVertexConstraint::new(0, 1).into(),
        EdgeVertexConstraint::new(2, 0).into(),
        EdgeEdgeConstraint::new(0, 1, 1e-3).unwrap().into(),
        FaceVertexConstraint::new(0, 0).into(),
        PlaneVertexConstraint::new(Vector3::new(0.0, 0.0, -5.0), Vector3::z(), 0)
            .unwrap()
            .into(),
    ]
}

#[test]
fn inactive_beyond_activation_distance() {
    for seed in 0..20 {
        let mut rng = rng(seed);
        let scene = Scene::four_points(random_vertices(&mut rng, 4, 3));
        for constraint in all_kinds() {
            let c = constraint.to_ref();
            let d = scene.distance(c).sqrt();
            if d < 1e-3 {
                continue;
            }
            // activation distance strictly below the current distance
            let params = BarrierParams::new(0.4 * d).with_min_distance(0.5 * d);
            let context = format!("{} seed {seed}", c.kind());

            assert_eq!(scene.potential(c, &params), 0.0, "{context}");
            assert_eq!(scene.gradient(c, &params).amax(), 0.0, "{context}");
            assert_eq!(scene.hessian(c, &params, false).amax(), 0.0, "{context}");
            assert_eq!(scene.hessian(c, &params, true).amax(), 0.0, "{context}");
        }
    }
}

#[test]
fn vertex_vertex_multiplicity_scenario() {
    let params = BarrierParams::new(0.5).with_min_distance(0.25);
    let triple = CollisionConstraint::from(VertexVertexConstraint::new(0, 1).with_multiplicity(3).unwrap());
    let single = CollisionConstraint::from(VertexVertexConstraint::new(0, 1));

    // exactly min_distance + dhat apart
    let at_boundary = Scene::from_rows(&[[0.0, 0.0, 0.0], [0.75, 0.0, 0.0]]);
    assert_eq!(at_boundary.potential(triple.to_ref(), &params), 0.0);

    // min_distance + dhat / 2 apart
    let inside = Scene::from_rows(&[[0.0, 0.0, 0.0], [0.5, 0.0, 0.0]]);
    let potential = inside.potential(triple.to_ref(), &params);
    assert!(potential > 0.0);
    assert_relative_eq!(
        potential,
        3.0 * inside.potential(single.to_ref(), &params),
        max_relative = 1e-14
    );
    // b(d² - md², 2·md·dhat + dhat²)
    assert_relative_eq!(
        potential,
        3.0 * barrier(0.25 - 0.0625, 2.0 * 0.25 * 0.5 + 0.25),
        max_relative = 1e-14
    );
}

#[test]
fn potential_grows_toward_contact() {
    let params = BarrierParams::new(0.1);
    let plane = CollisionConstraint::from(PlaneVertexConstraint::new(Vector3::zeros(), Vector3::z(), 0).unwrap());
    let mut previous = 0.0;
    for k in (1..10).rev() {
        let height = 0.01 * f64::from(k);
        let scene = Scene::from_rows(&[[0.0, 0.0, height]]);
        let potential = scene.potential(plane.to_ref(), &params);
        assert!(potential > previous, "height {height}");
        previous = potential;
    }
    let touching = Scene::from_rows(&[[0.0, 0.0, 0.0]]);
    assert_eq!(touching.potential(plane.to_ref(), &params), f64::INFINITY);
}
