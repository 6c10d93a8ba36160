//! Config validation: defaults, type rules and anchor resolution.
//!
//! `validate` never mutates the caller's config; it builds a fresh
//! [`ScrollData`] so instances created from one config never share state.

use indexmap::IndexMap;
use thiserror::Error;

use crate::anchor::{AnchorExpr, Rect};
use crate::easing::{Easing, Timing};
use crate::host::Host;
use crate::instance::{noop, InstanceConfig, PropSpec, ScrollData, StyleTarget, TimingInput};
use crate::value::{self, AnchorValue, RawValue};

/// Errors raised while turning an [`InstanceConfig`] into [`ScrollData`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Missing property `from`")]
    MissingFrom,
    #[error("Missing property `to`")]
    MissingTo,
    /// Host-level type check failure (e.g. a JS value of the wrong kind).
    #[error("Property `{field}` must be {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },
    #[error("Property `elem` is required when `direct` is true")]
    DirectWithoutElem,
    #[error("Property `{field}` must be an absolute value when no `elem` has been provided")]
    NotAbsolute { field: &'static str },
    #[error("Property `{field}` has an invalid anchor expression `{expr}` (expected `<top|middle|bottom>-<top|middle|bottom>`)")]
    InvalidAnchor { field: &'static str, expr: String },
    #[error("Property `{field}` of prop `{key}` must be an absolute value")]
    PropNotAbsolute { key: String, field: &'static str },
    #[error("Unknown timing `{name}` for prop `{key}`")]
    UnknownTiming { key: String, name: String },
    #[error("Anchor element is not attached to the document")]
    AnchorDetached,
    #[error("invalid instance config json: {0}")]
    Json(String),
}

/// Validate `config` against the host's current geometry.
pub fn validate<H: Host>(
    config: &InstanceConfig<H::Element>,
    host: &H,
) -> Result<ScrollData<H::Element>, ConfigError> {
    let from = config.from.as_ref().ok_or(ConfigError::MissingFrom)?;
    let to = config.to.as_ref().ok_or(ConfigError::MissingTo)?;

    if matches!(config.direct, StyleTarget::Anchor) && config.elem.is_none() {
        return Err(ConfigError::DirectWithoutElem);
    }

    let mut anchor_box = None;
    let (from, to) = match config.elem.as_ref() {
        None => (absolute("from", from)?, absolute("to", to)?),
        Some(elem) => {
            let mut geometry = Geometry {
                host,
                elem,
                cached: None,
            };
            let from = bound("from", from, &mut geometry)?;
            let to = bound("to", to, &mut geometry)?;
            anchor_box = geometry.cached.map(|(rect, _, _)| rect);
            (from, to)
        }
    };

    let mut props = IndexMap::new();
    if let Some(raw_props) = config.props.as_ref() {
        for (key, prop) in raw_props {
            let from = prop_bound(key, "from", prop.from.as_ref())?;
            let to = prop_bound(key, "to", prop.to.as_ref())?;
            let timing = match prop.timing.as_ref() {
                None => Timing::Named(Easing::Linear),
                Some(TimingInput::Name(name)) => {
                    Timing::Named(Easing::lookup(name).ok_or_else(|| {
                        ConfigError::UnknownTiming {
                            key: key.clone(),
                            name: name.clone(),
                        }
                    })?)
                }
                Some(TimingInput::Function(f)) => Timing::Custom(f.clone()),
            };
            props.insert(key.clone(), PropSpec { from, to, timing });
        }
    }

    Ok(ScrollData {
        from,
        to,
        elem: config.elem.clone(),
        target: config.direct.clone(),
        track: config.track.unwrap_or(true),
        props,
        inside: config.inside.clone().unwrap_or_else(noop),
        outside: config.outside.clone().unwrap_or_else(noop),
        anchor_box,
    })
}

/// Geometry is read at most once per validation, and only if a bound is relative.
struct Geometry<'a, H: Host> {
    host: &'a H,
    elem: &'a H::Element,
    cached: Option<(Rect, f64, f64)>,
}

impl<H: Host> Geometry<'_, H> {
    fn read(&mut self) -> Result<(Rect, f64, f64), ConfigError> {
        if let Some(g) = self.cached {
            return Ok(g);
        }
        let rect = self
            .host
            .bounding_rect(self.elem)
            .ok_or(ConfigError::AnchorDetached)?;
        let g = (rect, self.host.scroll_top(), self.host.viewport_height());
        self.cached = Some(g);
        Ok(g)
    }
}

fn absolute(field: &'static str, raw: &RawValue) -> Result<AnchorValue, ConfigError> {
    let parsed = value::parse(raw);
    if parsed.is_absolute() {
        Ok(parsed)
    } else {
        Err(ConfigError::NotAbsolute { field })
    }
}

fn bound<H: Host>(
    field: &'static str,
    raw: &RawValue,
    geometry: &mut Geometry<'_, H>,
) -> Result<AnchorValue, ConfigError> {
    if !value::is_relative(raw) {
        return absolute(field, raw);
    }
    let RawValue::Text(text) = raw else {
        return absolute(field, raw);
    };
    let expr = AnchorExpr::parse(text).ok_or_else(|| ConfigError::InvalidAnchor {
        field,
        expr: text.clone(),
    })?;
    let (rect, scroll_top, viewport_height) = geometry.read()?;
    Ok(AnchorValue::px(expr.resolve(rect, scroll_top, viewport_height)))
}

fn prop_bound(
    key: &str,
    field: &'static str,
    raw: Option<&RawValue>,
) -> Result<AnchorValue, ConfigError> {
    let err = || ConfigError::PropNotAbsolute {
        key: key.to_string(),
        field,
    };
    let parsed = value::parse(raw.ok_or_else(err)?);
    if parsed.is_absolute() {
        Ok(parsed)
    } else {
        Err(err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StyleSink;
    use crate::instance::PropConfig;
    use std::cell::Cell;

    struct FixedHost {
        rect: Option<Rect>,
        reads: Cell<u32>,
    }

    impl Host for FixedHost {
        type Element = u8;
        fn scroll_top(&self) -> f64 {
            200.0
        }
        fn viewport_height(&self) -> f64 {
            800.0
        }
        fn bounding_rect(&self, _elem: &u8) -> Option<Rect> {
            self.reads.set(self.reads.get() + 1);
            self.rect
        }
        fn set_property(&mut self, _sink: StyleSink<'_, u8>, _key: &str, _value: &str) {}
    }

    fn host() -> FixedHost {
        FixedHost {
            rect: Some(Rect::new(300.0, 200.0)),
            reads: Cell::new(0),
        }
    }

    #[test]
    fn applies_defaults() {
        let data = validate(&InstanceConfig::new("0px", "100px"), &host()).unwrap();
        assert!(data.track);
        assert!(data.props.is_empty());
        assert_eq!(data.target, StyleTarget::DocumentRoot);
        assert_eq!(data.from, AnchorValue::new(0.0, "px"));
        assert_eq!(data.anchor_box, None);
    }

    #[test]
    fn missing_bounds() {
        let mut cfg = InstanceConfig::<u8>::new("0", "1");
        cfg.from = None;
        assert_eq!(validate(&cfg, &host()).unwrap_err(), ConfigError::MissingFrom);
        let mut cfg = InstanceConfig::<u8>::new("0", "1");
        cfg.to = None;
        assert_eq!(validate(&cfg, &host()).unwrap_err(), ConfigError::MissingTo);
    }

    #[test]
    fn direct_requires_elem() {
        let cfg = InstanceConfig::<u8>::new("0", "1").direct(StyleTarget::Anchor);
        assert_eq!(
            validate(&cfg, &host()).unwrap_err(),
            ConfigError::DirectWithoutElem
        );
    }

    #[test]
    fn relative_without_elem_is_rejected() {
        let cfg = InstanceConfig::<u8>::new("top-bottom", "100px");
        assert_eq!(
            validate(&cfg, &host()).unwrap_err(),
            ConfigError::NotAbsolute { field: "from" }
        );
    }

    #[test]
    fn relative_with_elem_resolves_once() {
        let h = host();
        let cfg = InstanceConfig::new("top-bottom", "bottom-top").elem(1u8);
        let data = validate(&cfg, &h).unwrap();
        assert_eq!(data.from, AnchorValue::px(-300.0));
        assert_eq!(data.to, AnchorValue::px(700.0));
        assert_eq!(data.anchor_box, Some(Rect::new(300.0, 200.0)));
        assert_eq!(h.reads.get(), 1);
    }

    #[test]
    fn absolute_with_elem_skips_geometry() {
        let h = FixedHost {
            rect: None,
            reads: Cell::new(0),
        };
        let cfg = InstanceConfig::new("10px", 20.0).elem(1u8);
        let data = validate(&cfg, &h).unwrap();
        assert_eq!(data.to, AnchorValue::new(20.0, ""));
        assert_eq!(h.reads.get(), 0);
    }

    #[test]
    fn bad_anchor_names() {
        let cfg = InstanceConfig::new("top-left", "100px").elem(1u8);
        assert_eq!(
            validate(&cfg, &host()).unwrap_err(),
            ConfigError::InvalidAnchor {
                field: "from",
                expr: "top-left".into()
            }
        );
    }

    #[test]
    fn detached_anchor_element() {
        let h = FixedHost {
            rect: None,
            reads: Cell::new(0),
        };
        let cfg = InstanceConfig::new("top-top", "bottom-top").elem(1u8);
        assert_eq!(validate(&cfg, &h).unwrap_err(), ConfigError::AnchorDetached);
    }

    #[test]
    fn prop_rules() {
        let cfg = InstanceConfig::<u8>::new("0", "1").prop("opacity", PropConfig::new("auto", "1"));
        assert_eq!(
            validate(&cfg, &host()).unwrap_err(),
            ConfigError::PropNotAbsolute {
                key: "opacity".into(),
                field: "from"
            }
        );

        let cfg = InstanceConfig::<u8>::new("0", "1").prop(
            "opacity",
            PropConfig {
                from: Some("0".into()),
                to: None,
                timing: None,
            },
        );
        assert_eq!(
            validate(&cfg, &host()).unwrap_err(),
            ConfigError::PropNotAbsolute {
                key: "opacity".into(),
                field: "to"
            }
        );

        let cfg = InstanceConfig::<u8>::new("0", "1")
            .prop("opacity", PropConfig::new("0", "1").timing("wobble"));
        assert_eq!(
            validate(&cfg, &host()).unwrap_err(),
            ConfigError::UnknownTiming {
                key: "opacity".into(),
                name: "wobble".into()
            }
        );
    }

    #[test]
    fn prop_timing_resolution() {
        let cfg = InstanceConfig::<u8>::new("0", "1")
            .prop("a", PropConfig::new("0", "1"))
            .prop("b", PropConfig::new("0", "1").timing("cubicOut"))
            .prop("c", PropConfig::new("0", "1").timing_fn(|t| t));
        let data = validate(&cfg, &host()).unwrap();
        assert_eq!(data.props["a"].timing.name(), "linear");
        assert_eq!(data.props["b"].timing.name(), "cubicOut");
        assert_eq!(data.props["c"].timing.name(), "custom");
    }

    #[test]
    fn caller_config_is_not_touched() {
        let cfg = InstanceConfig::new("top-bottom", "bottom-top")
            .elem(1u8)
            .prop("x", PropConfig::new("0", "10px"));
        let before = format!("{cfg:?}");
        let _ = validate(&cfg, &host()).unwrap();
        assert_eq!(format!("{cfg:?}"), before);
    }
}
