use std::f64::consts::TAU;

use foundation::math::Vec3;

/// Idle wandering motion for words awaiting coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitParams {
    /// Horizontal circle radius (scene units).
    pub radius: f64,
    /// Radians per second around the circle.
    pub angular_speed: f64,
    /// Vertical bob amplitude (scene units).
    pub bob_amplitude: f64,
    /// Radians per second of the bob.
    pub bob_speed: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            radius: 0.3,
            angular_speed: 0.6,
            bob_amplitude: 0.15,
            bob_speed: 1.1,
        }
    }
}

/// Offset from the orbit's anchor after `elapsed` seconds.
///
/// The circle passes through the anchor at `elapsed = 0`, so the offset is
/// exactly zero there.
pub fn orbit_offset(elapsed: f64, phase: f64, params: &OrbitParams) -> Vec3 {
    let angle = phase + elapsed * params.angular_speed;
    Vec3::new(
        params.radius * (angle.cos() - phase.cos()),
        params.bob_amplitude * (elapsed * params.bob_speed).sin(),
        params.radius * (angle.sin() - phase.sin()),
    )
}

/// Stable per-word starting angle in `[0, TAU)` so idle words don't move in
/// lockstep.
pub fn phase_for(word: &str) -> f64 {
    // FNV-1a
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in word.bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    (h % 10_000) as f64 / 10_000.0 * TAU
}

#[cfg(test)]
mod tests {
    use super::{OrbitParams, orbit_offset, phase_for};
    use foundation::math::Vec3;
    use std::f64::consts::TAU;

    #[test]
    fn offset_starts_at_anchor() {
        let p = OrbitParams::default();
        for phase in [0.0, 1.0, 2.5, 6.0] {
            assert_eq!(orbit_offset(0.0, phase, &p), Vec3::ZERO);
        }
    }

    #[test]
    fn offset_stays_within_orbit_envelope() {
        let p = OrbitParams::default();
        for i in 0..200 {
            let o = orbit_offset(i as f64 * 0.1, 0.7, &p);
            assert!((o.x * o.x + o.z * o.z).sqrt() <= 2.0 * p.radius + 1e-9);
            assert!(o.y.abs() <= p.bob_amplitude + 1e-9);
        }
    }

    #[test]
    fn phase_is_deterministic_and_in_range() {
        assert_eq!(phase_for("cat"), phase_for("cat"));
        assert_ne!(phase_for("cat"), phase_for("dog"));
        let ph = phase_for("anything");
        assert!((0.0..TAU).contains(&ph));
    }
}
