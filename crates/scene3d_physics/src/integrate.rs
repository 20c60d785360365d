//! Velocity integration with friction

use scene3d_math::Vec3;

/// Advance `position` by `velocity * dt`, then apply friction to `velocity`
///
/// Friction removes `friction * velocity * dt` from the velocity. Any axis
/// whose remaining speed is smaller than the friction removed on that axis is
/// zeroed, so friction never reverses the direction of motion. The clamp is
/// per axis, not on the vector length.
///
/// A zero velocity is left untouched, as is the velocity when `friction` is 0.
pub fn integrate_velocity(position: &mut Vec3, velocity: &mut Vec3, friction: f32, dt: f32) {
    if velocity.is_zero() {
        return;
    }

    *position += *velocity * dt;

    if friction == 0.0 {
        return;
    }

    let friction_force = *velocity * (friction * dt);
    *velocity -= friction_force;

    if velocity.x.abs() < friction_force.x.abs() {
        velocity.x = 0.0;
    }
    if velocity.y.abs() < friction_force.y.abs() {
        velocity.y = 0.0;
    }
    if velocity.z.abs() < friction_force.z.abs() {
        velocity.z = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_zero_velocity_is_noop() {
        let mut p = Vec3::new(1.0, 2.0, 3.0);
        let mut v = Vec3::ZERO;
        integrate_velocity(&mut p, &mut v, 5.0, 1.0);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_no_friction_keeps_velocity() {
        let mut p = Vec3::ZERO;
        let mut v = Vec3::new(1.0, 0.0, -2.0);
        integrate_velocity(&mut p, &mut v, 0.0, 0.5);
        assert_eq!(p, Vec3::new(0.5, 0.0, -1.0));
        assert_eq!(v, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_friction_zeroes_axis() {
        let mut p = Vec3::ZERO;
        let mut v = Vec3::new(2.0, 0.0, 0.0);
        integrate_velocity(&mut p, &mut v, 1.0, 1.0);
        assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(v.x, 0.0);
    }

    #[test]
    fn test_friction_decays_velocity() {
        let mut p = Vec3::ZERO;
        let mut v = Vec3::new(10.0, 0.0, 0.0);
        integrate_velocity(&mut p, &mut v, 1.0, 0.1);
        // force = 1.0, remaining 9.0 > 1.0
        assert!(approx_eq(v.x, 9.0));
        assert!(approx_eq(p.x, 1.0));
    }

    #[test]
    fn test_friction_never_reverses_direction() {
        let mut p = Vec3::ZERO;
        let mut v = Vec3::new(1.0, -1.0, 0.5);
        integrate_velocity(&mut p, &mut v, 3.0, 1.0);
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_clamp_is_per_axis() {
        let mut p = Vec3::ZERO;
        let mut v = Vec3::new(10.0, 0.1, 0.0);
        integrate_velocity(&mut p, &mut v, 1.0, 0.5);
        // x: force 5, remaining 5 -> not below, kept
        // y: force 0.05, remaining 0.05 -> not below, kept
        assert!(approx_eq(v.x, 5.0));
        assert!(approx_eq(v.y, 0.05));

        integrate_velocity(&mut p, &mut v, 1.5, 1.0);
        // force 1.5*v: remaining -0.5*v, |0.5v| < |1.5v| on every moving axis
        assert_eq!(v, Vec3::ZERO);
    }
}
