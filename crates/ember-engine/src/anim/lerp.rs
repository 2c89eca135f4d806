use crate::coords::{Color, Vec2};

/// Linear blend between two values of an animatable property type.
pub trait Lerp: Copy {
    /// Returns `self` at `t = 0` and `to` at `t = 1`.
    ///
    /// `t` may leave `[0, 1]` for overshooting curves.
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec2::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

impl Lerp for glam::Vec3 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Color {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Color::new(
            self.r.lerp(to.r, t),
            self.g.lerp(to.g, t),
            self.b.lerp(to.b, t),
            self.a.lerp(to.a, t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_endpoints_and_midpoint() {
        assert_eq!(2.0f32.lerp(6.0, 0.0), 2.0);
        assert_eq!(2.0f32.lerp(6.0, 1.0), 6.0);
        assert_eq!(2.0f32.lerp(6.0, 0.5), 4.0);
    }

    #[test]
    fn vec2_blends_per_component() {
        let v = Vec2::new(0.0, 10.0).lerp(Vec2::new(10.0, 20.0), 0.25);
        assert_eq!(v, Vec2::new(2.5, 12.5));
    }

    #[test]
    fn color_blends_alpha_too() {
        let c = Color::TRANSPARENT.lerp(Color::WHITE, 0.5);
        assert_eq!(c, Color::new(0.5, 0.5, 0.5, 0.5));
    }

    #[test]
    fn overshoot_extrapolates() {
        assert_eq!(0.0f32.lerp(10.0, 1.5), 15.0);
    }
}
