use foundation::bounds::Sphere;
use foundation::math::Vec3;

use crate::corpus::Corpus;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FramerParams {
    /// Camera distance per unit of bounding radius.
    pub distance_per_radius: f64,
    /// Closest the camera gets, so tiny clouds don't fill the screen.
    pub min_distance: f64,
    /// Distance used when there is nothing to frame.
    pub empty_distance: f64,
}

impl Default for FramerParams {
    fn default() -> Self {
        Self {
            distance_per_radius: 2.5,
            min_distance: 5.0,
            empty_distance: 10.0,
        }
    }
}

/// Camera placement derived from the active corpus. Never stored; recompute
/// after every corpus change.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFrame {
    /// Point the camera looks at (centroid of the active words).
    pub target: Vec3,
    pub radius: f64,
    /// Eye distance from `target`.
    pub distance: f64,
}

impl CameraFrame {
    /// Eye position, looking down -Z at the target.
    pub fn eye(&self) -> Vec3 {
        self.target + Vec3::new(0.0, 0.0, self.distance)
    }
}

/// Frames the active (non-stale) words of `corpus`, in scene units.
pub fn frame_corpus(corpus: &Corpus, params: &FramerParams) -> CameraFrame {
    frame_points(&corpus.active_world_positions(), params)
}

pub fn frame_points(points: &[Vec3], params: &FramerParams) -> CameraFrame {
    match Sphere::from_points(points.iter().copied()) {
        Some(sphere) => CameraFrame {
            target: sphere.center,
            radius: sphere.radius,
            distance: (sphere.radius * params.distance_per_radius).max(params.min_distance),
        },
        None => CameraFrame {
            target: Vec3::ZERO,
            radius: 0.0,
            distance: params.empty_distance,
        },
    }
}
