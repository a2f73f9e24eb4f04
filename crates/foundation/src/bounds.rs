use crate::math::Vec3;

/// Bounding sphere around a point set: centroid plus the farthest distance
/// from it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    /// Returns `None` for an empty point set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
        I::IntoIter: Clone,
    {
        let iter = points.into_iter();
        let mut sum = Vec3::ZERO;
        let mut count = 0usize;
        for p in iter.clone() {
            sum += p;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let center = sum.scale(1.0 / count as f64);
        let radius = iter.map(|p| p.distance(center)).fold(0.0, f64::max);
        Some(Sphere { center, radius })
    }
}
