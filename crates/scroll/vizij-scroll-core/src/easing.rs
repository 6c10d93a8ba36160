//! Easing table: named timing curves remapping progress `t ∈ [0, 1]`.
//!
//! Names match the camelCase keys accepted in instance configs (`"quadInOut"`,
//! `"bounceOut"`, ...). Back/elastic curves overshoot `[0, 1]` on purpose.

use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    SineInOut,
    CircIn,
    CircOut,
    CircInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl Easing {
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    /// Config-facing name of the curve.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadIn => "quadIn",
            Easing::QuadOut => "quadOut",
            Easing::QuadInOut => "quadInOut",
            Easing::CubicIn => "cubicIn",
            Easing::CubicOut => "cubicOut",
            Easing::CubicInOut => "cubicInOut",
            Easing::QuartIn => "quartIn",
            Easing::QuartOut => "quartOut",
            Easing::QuartInOut => "quartInOut",
            Easing::QuintIn => "quintIn",
            Easing::QuintOut => "quintOut",
            Easing::QuintInOut => "quintInOut",
            Easing::SineIn => "sineIn",
            Easing::SineOut => "sineOut",
            Easing::SineInOut => "sineInOut",
            Easing::CircIn => "circIn",
            Easing::CircOut => "circOut",
            Easing::CircInOut => "circInOut",
            Easing::ExpoIn => "expoIn",
            Easing::ExpoOut => "expoOut",
            Easing::ExpoInOut => "expoInOut",
            Easing::ElasticIn => "elasticIn",
            Easing::ElasticOut => "elasticOut",
            Easing::ElasticInOut => "elasticInOut",
            Easing::BackIn => "backIn",
            Easing::BackOut => "backOut",
            Easing::BackInOut => "backInOut",
            Easing::BounceIn => "bounceIn",
            Easing::BounceOut => "bounceOut",
            Easing::BounceInOut => "bounceInOut",
        }
    }

    /// Look a curve up by its config name.
    pub fn lookup(name: &str) -> Option<Easing> {
        Easing::ALL.into_iter().find(|e| e.name() == name)
    }

    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => -t * (t - 2.0),
            Easing::QuadInOut => {
                let t = t / 0.5;
                if t < 1.0 {
                    0.5 * t * t
                } else {
                    let t = t - 1.0;
                    -0.5 * (t * (t - 2.0) - 1.0)
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let f = t - 1.0;
                f * f * f + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    0.5 * (2.0 * t - 2.0).powi(3) + 1.0
                }
            }
            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => (t - 1.0).powi(3) * (1.0 - t) + 1.0,
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    -8.0 * (t - 1.0).powi(4) + 1.0
                }
            }
            Easing::QuintIn => t.powi(5),
            Easing::QuintOut => (t - 1.0).powi(5) + 1.0,
            Easing::QuintInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t.powi(5)
                } else {
                    0.5 * ((t - 2.0).powi(5) + 2.0)
                }
            }
            Easing::SineIn => {
                let v = (t * PI * 0.5).cos();
                if v.abs() < 1e-14 {
                    1.0
                } else {
                    1.0 - v
                }
            }
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -0.5 * ((PI * t).cos() - 1.0),
            Easing::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircOut => {
                let t = t - 1.0;
                (1.0 - t * t).sqrt()
            }
            Easing::CircInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    -0.5 * ((1.0 - t * t).sqrt() - 1.0)
                } else {
                    let t = t - 2.0;
                    0.5 * ((1.0 - t * t).sqrt() + 1.0)
                }
            }
            Easing::ExpoIn => {
                if t == 0.0 {
                    t
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Easing::ExpoOut => {
                if t == 1.0 {
                    t
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Easing::ExpoInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    0.5 * 2f64.powf(20.0 * t - 10.0)
                } else {
                    -0.5 * 2f64.powf(10.0 - t * 20.0) + 1.0
                }
            }
            Easing::ElasticIn => (13.0 * t * PI / 2.0).sin() * 2f64.powf(10.0 * (t - 1.0)),
            Easing::ElasticOut => {
                (-13.0 * (t + 1.0) * PI / 2.0).sin() * 2f64.powf(-10.0 * t) + 1.0
            }
            Easing::ElasticInOut => {
                if t < 0.5 {
                    0.5 * (13.0 * PI / 2.0 * 2.0 * t).sin() * 2f64.powf(10.0 * (2.0 * t - 1.0))
                } else {
                    0.5 * (-13.0 * PI / 2.0 * (2.0 * t - 1.0 + 1.0)).sin()
                        * 2f64.powf(-10.0 * (2.0 * t - 1.0))
                        + 1.0
                }
            }
            Easing::BackIn => {
                let s = 1.70158;
                t * t * ((s + 1.0) * t - s)
            }
            Easing::BackOut => {
                let s = 1.70158;
                let t = t - 1.0;
                t * t * ((s + 1.0) * t + s) + 1.0
            }
            Easing::BackInOut => {
                let s = 1.70158 * 1.525;
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * (t * t * ((s + 1.0) * t - s))
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
                }
            }
            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    0.5 * (1.0 - bounce_out(1.0 - t * 2.0))
                } else {
                    0.5 * bounce_out(t * 2.0 - 1.0) + 0.5
                }
            }
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const A: f64 = 4.0 / 11.0;
    const B: f64 = 8.0 / 11.0;
    const C: f64 = 9.0 / 10.0;
    const CA: f64 = 4356.0 / 361.0;
    const CB: f64 = 35442.0 / 1805.0;
    const CC: f64 = 16061.0 / 1805.0;

    let t2 = t * t;
    if t < A {
        7.5625 * t2
    } else if t < B {
        9.075 * t2 - 9.9 * t + 3.4
    } else if t < C {
        CA * t2 - CB * t + CC
    } else {
        10.8 * t * t - 20.52 * t + 10.72
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown easing '{0}'")]
pub struct UnknownEasing(pub String);

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::lookup(s).ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

/// Caller-supplied timing curve, bypassing the table.
pub type TimingFn = Rc<dyn Fn(f64) -> f64>;

/// Resolved timing of one property: a table entry or a custom function.
#[derive(Clone)]
pub enum Timing {
    Named(Easing),
    Custom(TimingFn),
}

impl Timing {
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Timing::Named(e) => e.apply(t),
            Timing::Custom(f) => f(t),
        }
    }

    /// Name for reporting; custom functions report `"custom"`.
    pub fn name(&self) -> &'static str {
        match self {
            Timing::Named(e) => e.name(),
            Timing::Custom(_) => "custom",
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing::Named(Easing::Linear)
    }
}

impl From<Easing> for Timing {
    fn from(e: Easing) -> Self {
        Timing::Named(e)
    }
}

impl fmt::Debug for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timing::Named(e) => f.debug_tuple("Named").field(e).finish(),
            Timing::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-9, "left={a} right={b}");
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for e in Easing::ALL {
            assert_eq!(Easing::lookup(e.name()), Some(e));
            assert_eq!(e.name().parse::<Easing>(), Ok(e));
        }
        assert_eq!(
            "wobble".parse::<Easing>(),
            Err(UnknownEasing("wobble".into()))
        );
    }

    #[test]
    fn endpoints_are_stable() {
        for e in Easing::ALL {
            approx(e.apply(0.0), 0.0);
            approx(e.apply(1.0), 1.0);
        }
    }

    #[test]
    fn symmetric_curves_hit_half() {
        for e in [
            Easing::Linear,
            Easing::QuadInOut,
            Easing::CubicInOut,
            Easing::QuartInOut,
            Easing::QuintInOut,
            Easing::SineInOut,
            Easing::CircInOut,
            Easing::ExpoInOut,
            Easing::BackInOut,
            Easing::BounceInOut,
        ] {
            approx(e.apply(0.5), 0.5);
        }
    }

    #[test]
    fn back_overshoots() {
        assert!(Easing::BackIn.apply(0.2) < 0.0);
        assert!(Easing::BackOut.apply(0.8) > 1.0);
    }

    #[test]
    fn custom_timing_is_called() {
        let t = Timing::Custom(Rc::new(|t| t * 0.5));
        approx(t.apply(0.8), 0.4);
        assert_eq!(t.name(), "custom");
        assert_eq!(Timing::default().name(), "linear");
    }

    #[test]
    fn serde_uses_config_names() {
        let json = serde_json::to_string(&Easing::QuadInOut).unwrap();
        assert_eq!(json, "\"quadInOut\"");
        let e: Easing = serde_json::from_str("\"bounceOut\"").unwrap();
        assert_eq!(e, Easing::BounceOut);
    }
}
