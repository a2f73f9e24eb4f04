use foundation::math::Vec3;

/// Frames longer than this are clamped to avoid large jumps after a stall.
const MAX_FRAME_DT: f64 = 0.1;

/// Integration substep (seconds).
const SUBSTEP: f64 = 1.0 / 240.0;

/// Damped spring constants shared by every word.
///
/// With the defaults, `friction ≈ 2·sqrt(tension·mass)`: close to critical
/// damping, so transitions settle without visible overshoot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpringParams {
    pub mass: f64,
    pub tension: f64,
    pub friction: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            tension: 170.0,
            friction: 26.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spring {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Spring {
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    /// Advances the spring toward `target` by `dt` seconds using
    /// semi-implicit Euler substeps.
    pub fn step(&mut self, target: Vec3, dt: f64, params: &SpringParams) {
        let inv_mass = 1.0 / params.mass;
        let mut remaining = dt.clamp(0.0, MAX_FRAME_DT);
        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP);
            let force = (self.position - target).scale(-params.tension)
                - self.velocity.scale(params.friction);
            self.velocity += force.scale(inv_mass * h);
            self.position += self.velocity.scale(h);
            remaining -= h;
        }
    }

    pub fn is_settled(&self, target: Vec3, epsilon: f64) -> bool {
        self.position.distance(target) < epsilon && self.velocity.length() < epsilon
    }
}
