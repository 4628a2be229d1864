use crate::{Aabb, Mat4, Vec3};

/// Edge length of the cube a normalized asset is fitted into.
pub const TARGET_EXTENT: f32 = 10.0;

/// World correction that re-centers an asset on the origin and scales it
/// uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    /// Point moved to the origin.
    pub center: Vec3,
    /// Factor that brings the bounds diagonal down to the target extent.
    pub fit_scale: f32,
    /// Caller-supplied multiplier applied on top of `fit_scale`.
    pub user_scale: f32,
}

impl FitTransform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            center: Vec3::ZERO,
            fit_scale: 1.0,
            user_scale: 1.0,
        }
    }

    /// Derive the correction for `bounds` so that its diagonal spans
    /// `target_extent`. Empty bounds keep the origin and factor 1. A
    /// zero-length diagonal, or one so small the factor overflows, keeps
    /// factor 1; any other size, however tiny, is scaled up.
    pub fn fit(bounds: &Aabb, target_extent: f32, user_scale: f32) -> Self {
        if bounds.is_empty() {
            return Self {
                user_scale,
                ..Self::identity()
            };
        }

        let diagonal = bounds.extent().length();
        let fit_scale = match target_extent / diagonal {
            s if diagonal > 0.0 && s.is_finite() => s,
            _ => 1.0,
        };

        Self {
            center: bounds.center(),
            fit_scale,
            user_scale,
        }
    }

    /// Combined uniform factor.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.fit_scale * self.user_scale
    }

    /// Build matrix = S * T(-center) (column-major Mat4 per glam), i.e. the
    /// translation is applied first.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.scale())) * Mat4::from_translation(-self.center)
    }
}

impl Default for FitTransform {
    fn default() -> Self {
        Self::identity()
    }
}
