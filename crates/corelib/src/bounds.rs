use crate::Vec3;

/// Axis-aligned bounding box accumulator.
///
/// Starts out inverted (`min = +inf`, `max = -inf`) so the first point
/// widened into it becomes both corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    /// True until at least one point has been accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Widen the box componentwise so it contains `p`.
    #[inline]
    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// `max - min`.
    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// `min + extent / 2`.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.min + self.extent() / 2.0
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
