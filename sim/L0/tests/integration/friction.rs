//! Smooth friction mollifiers.

use approx::assert_relative_eq;
use sim_ipc::{
    FrictionParams, smooth_friction_f0, smooth_friction_f1_over_x,
    smooth_friction_f2_x_minus_f1_over_x3, smooth_friction_potential,
};

#[test]
fn f0_branch_boundary_and_outside() {
    for epsv in [1e-5, 1e-3, 0.1, 2.0] {
        assert_eq!(smooth_friction_f0(epsv, epsv), epsv);
        assert_eq!(smooth_friction_f0(2.0 * epsv, epsv), 2.0 * epsv);
        // inside formula evaluated at the boundary collapses to epsv
        let s = epsv;
        let inside = -s * s * s / (3.0 * epsv * epsv) + s * s / epsv + epsv / 3.0;
        assert_relative_eq!(inside, epsv, max_relative = 1e-14);
    }
}

#[test]
fn f0_is_smooth_and_increasing() {
    let epsv = 1e-2;
    let mut previous = smooth_friction_f0(0.0, epsv);
    for k in 1..=200 {
        let s = 2.0 * epsv * f64::from(k) / 200.0;
        let value = smooth_friction_f0(s, epsv);
        assert!(value >= previous);
        assert!(smooth_friction_f1_over_x(s, epsv) > 0.0);
        assert!(smooth_friction_f2_x_minus_f1_over_x3(s, epsv) < 0.0);
        previous = value;
    }
}

#[test]
fn mollifiers_are_finite_at_rest() {
    let epsv = 1e-3;
    assert!(smooth_friction_f0(0.0, epsv).is_finite());
    assert!(smooth_friction_f1_over_x(0.0, epsv).is_finite());
    assert!(smooth_friction_f2_x_minus_f1_over_x3(0.0, epsv).is_finite());
}

#[test]
fn potential_uses_friction_params() {
    let params = FrictionParams::default();
    params.validate().unwrap();
    let sliding = smooth_friction_potential(1.0, 10.0, &params);
    assert_relative_eq!(sliding, params.mu * 10.0, max_relative = 1e-15);
    let sticking = smooth_friction_potential(0.0, 10.0, &params);
    assert_relative_eq!(sticking, params.mu * 10.0 * params.epsv / 3.0, max_relative = 1e-14);
}
