use std::f32::consts::PI;

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

/// Easing curve applied to tween progress.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Ease {
    #[default]
    Linear,
    /// Holds the start value and jumps to the end on completion.
    Stepped,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InBack,
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    InOutElastic,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Ease {
    /// Maps `t` (clamped to `[0, 1]`) onto the curve.
    ///
    /// Endpoints are exact: `apply(0) == 0` and `apply(1) == 1` for every curve.
    pub fn apply(self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Self::Linear => t,
            Self::Stepped => 0.0,

            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => in_out(t, |t| 2.0 * t * t, |t| 1.0 - (-2.0 * t + 2.0).powi(2) / 2.0),

            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => in_out(t, |t| 4.0 * t * t * t, |t| 1.0 - (-2.0 * t + 2.0).powi(3) / 2.0),

            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => in_out(t, |t| 8.0 * t.powi(4), |t| 1.0 - (-2.0 * t + 2.0).powi(4) / 2.0),

            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
            Self::InOutQuint => in_out(t, |t| 16.0 * t.powi(5), |t| 1.0 - (-2.0 * t + 2.0).powi(5) / 2.0),

            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,

            Self::InExpo => 2f32.powf(10.0 * t - 10.0),
            Self::OutExpo => 1.0 - 2f32.powf(-10.0 * t),
            Self::InOutExpo => in_out(
                t,
                |t| 2f32.powf(20.0 * t - 10.0) / 2.0,
                |t| (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0,
            ),

            Self::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::OutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Self::InOutCirc => in_out(
                t,
                |t| (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0,
                |t| ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0,
            ),

            Self::InBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Self::OutBack => 1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2),
            Self::InOutBack => in_out(
                t,
                |t| ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0,
                |t| ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2) + 2.0) / 2.0,
            ),

            Self::InElastic => -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin(),
            Self::OutElastic => 2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0,
            Self::InOutElastic => in_out(
                t,
                |t| -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0,
                |t| (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0 + 1.0,
            ),

            Self::InBounce => 1.0 - bounce_out(1.0 - t),
            Self::OutBounce => bounce_out(t),
            Self::InOutBounce => in_out(
                t,
                |t| (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0,
                |t| (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0,
            ),
        }
    }
}

#[inline]
fn in_out(t: f32, first: impl Fn(f32) -> f32, second: impl Fn(f32) -> f32) -> f32 {
    if t < 0.5 { first(t) } else { second(t) }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}
