//! Interpolation: scroll offset → progress → eased, unit-suffixed prop values.
//!
//! Everything here is a pure function of its inputs, so calling it twice with
//! the same scroll offset yields identical output.

use serde::Serialize;

use crate::instance::{PropSpec, Props, ScrollData};
use crate::value::{format_number, round_to};

/// Position of the scroll offset inside an instance's `[from, to]` range, in percent.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Progress {
    /// Unclamped; negative before `from`, above 100 past `to`.
    pub precise: f64,
    /// `precise` clamped to `[0, 100]`.
    pub normalized: f64,
}

impl Progress {
    /// Progress of `scroll_top` between the absolute offsets `from` and `to`.
    ///
    /// A zero-length range counts as already past `to` (`+∞`) unless the
    /// offset lies before `from` (`-∞`).
    pub fn between(from: f64, to: f64, scroll_top: f64) -> Self {
        let total = to - from;
        let current = scroll_top - from;
        let precise = if total == 0.0 {
            if current < 0.0 {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        } else {
            current / (total / 100.0)
        };
        let precise = if precise.is_nan() { f64::INFINITY } else { precise };
        Self {
            precise,
            normalized: precise.clamp(0.0, 100.0),
        }
    }

    /// Inside means `0 ≤ precise ≤ 100`; both endpoints count as inside.
    #[inline]
    pub fn is_inside(&self) -> bool {
        (0.0..=100.0).contains(&self.precise)
    }
}

/// Result of one interpolation step.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub progress: Progress,
    pub props: Props,
}

/// Interpolate a single property at `normalized` percent.
pub fn interpolate(prop: &PropSpec, normalized: f64, precision: u32) -> String {
    let time = prop.timing.apply(normalized / 100.0);
    let from = prop.from.value;
    let to = prop.to.value;
    let value = round_to(from - (from - to) * time, precision);
    let mut out = format_number(value);
    out.push_str(prop.unit());
    out
}

/// Compute progress and every prop value of `data` at `scroll_top`.
pub fn compute<E>(data: &ScrollData<E>, scroll_top: f64, precision: u32) -> Frame {
    let progress = Progress::between(data.from.value, data.to.value, scroll_top);
    let props = data
        .props
        .iter()
        .map(|(key, prop)| (key.clone(), interpolate(prop, progress.normalized, precision)))
        .collect();
    Frame { progress, props }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::{Easing, Timing};
    use crate::value::AnchorValue;

    fn prop(from: &str, to: &str, timing: Easing) -> PropSpec {
        PropSpec {
            from: crate::value::parse_str(from),
            to: crate::value::parse_str(to),
            timing: Timing::Named(timing),
        }
    }

    #[test]
    fn progress_is_clamped_but_precise_is_kept() {
        let p = Progress::between(100.0, 300.0, 400.0);
        assert_eq!(p.precise, 150.0);
        assert_eq!(p.normalized, 100.0);
        assert!(!p.is_inside());

        let p = Progress::between(100.0, 300.0, 50.0);
        assert_eq!(p.precise, -25.0);
        assert_eq!(p.normalized, 0.0);
        assert!(!p.is_inside());

        assert!(Progress::between(100.0, 300.0, 100.0).is_inside());
        assert!(Progress::between(100.0, 300.0, 300.0).is_inside());
    }

    #[test]
    fn reversed_range_runs_backwards() {
        let p = Progress::between(1000.0, 0.0, 250.0);
        assert_eq!(p.precise, 75.0);
    }

    #[test]
    fn zero_length_range_never_yields_nan() {
        let at = Progress::between(500.0, 500.0, 500.0);
        assert_eq!(at.precise, f64::INFINITY);
        assert_eq!(at.normalized, 100.0);
        assert!(!at.is_inside());

        let after = Progress::between(500.0, 500.0, 900.0);
        assert_eq!(after.normalized, 100.0);

        let before = Progress::between(500.0, 500.0, 10.0);
        assert_eq!(before.precise, f64::NEG_INFINITY);
        assert_eq!(before.normalized, 0.0);
    }

    #[test]
    fn interpolates_with_unit_inheritance() {
        let p = prop("0", "100px", Easing::Linear);
        assert_eq!(interpolate(&p, 0.0, 4), "0px");
        assert_eq!(interpolate(&p, 25.0, 4), "25px");
        assert_eq!(interpolate(&p, 100.0, 4), "100px");
    }

    #[test]
    fn rounds_to_precision() {
        let p = prop("0", "1", Easing::Linear);
        assert_eq!(interpolate(&p, 100.0 / 3.0, 4), "0.3333");
        assert_eq!(interpolate(&p, 100.0 / 3.0, 2), "0.33");
    }

    #[test]
    fn eases_before_interpolating() {
        let p = prop("0", "100", Easing::QuadIn);
        assert_eq!(interpolate(&p, 50.0, 4), "25");
        let p = PropSpec {
            from: AnchorValue::new(10.0, "deg"),
            to: AnchorValue::new(-10.0, "deg"),
            timing: Timing::default(),
        };
        assert_eq!(interpolate(&p, 50.0, 4), "0deg");
    }
}
