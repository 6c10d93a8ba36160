//! Instance configuration (user input) and validated per-instance data.
//!
//! `InstanceConfig` is what callers hand to `ScrollEngine::create`; it is kept
//! untouched so it can be re-validated whenever geometry changes.
//! `ScrollData` is the validated, anchor-resolved form the interpolation step
//! reads every frame.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::anchor::Rect;
use crate::easing::{Timing, TimingFn};
use crate::host::StyleSink;
use crate::ids::InstanceId;
use crate::interp::Progress;
use crate::validate::ConfigError;
use crate::value::{AnchorValue, RawValue};

/// Computed styles of one update: property key → ready-to-apply `"<number><unit>"`.
pub type Props = IndexMap<String, String>;

/// Payload handed to `inside` / `outside` callbacks.
#[derive(Debug)]
pub struct BoundaryEvent<'a> {
    pub id: InstanceId,
    /// `progress.precise` is the unclamped percentage; `progress.normalized`
    /// is the clamped one the props were computed from.
    pub progress: Progress,
    pub props: &'a Props,
}

pub type Callback = Rc<dyn Fn(&BoundaryEvent<'_>)>;

pub(crate) fn noop() -> Callback {
    Rc::new(|_: &BoundaryEvent<'_>| {})
}

/// Which element receives the computed styles.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleTarget<E> {
    /// The instance's own anchor element (`direct: true`); requires `elem`.
    Anchor,
    /// An explicit element.
    Element(E),
    /// The document root (`direct: false`, the default).
    DocumentRoot,
}

impl<E> Default for StyleTarget<E> {
    fn default() -> Self {
        StyleTarget::DocumentRoot
    }
}

impl<E> StyleTarget<E> {
    /// Resolve against the instance's anchor element.
    pub fn sink<'a>(&'a self, elem: Option<&'a E>) -> StyleSink<'a, E> {
        match (self, elem) {
            (StyleTarget::Anchor, Some(e)) => StyleSink::Element(e),
            (StyleTarget::Element(e), _) => StyleSink::Element(e),
            _ => StyleSink::Root,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StyleTarget::Anchor => "anchor",
            StyleTarget::Element(_) => "element",
            StyleTarget::DocumentRoot => "root",
        }
    }
}

/// Timing as given by the caller: a table name or a function.
#[derive(Clone)]
pub enum TimingInput {
    Name(String),
    Function(TimingFn),
}

impl fmt::Debug for TimingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingInput::Name(n) => f.debug_tuple("Name").field(n).finish(),
            TimingInput::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

impl<'de> Deserialize<'de> for TimingInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TimingInput::Name)
    }
}

impl From<&str> for TimingInput {
    fn from(name: &str) -> Self {
        TimingInput::Name(name.to_string())
    }
}

/// Configured props keyed by style property, in declaration order.
pub type PropConfigs = IndexMap<String, PropConfig>;

/// One animatable property as configured. Both bounds must be absolute.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PropConfig {
    #[serde(default)]
    pub from: Option<RawValue>,
    #[serde(default)]
    pub to: Option<RawValue>,
    #[serde(default)]
    pub timing: Option<TimingInput>,
}

impl PropConfig {
    pub fn new(from: impl Into<RawValue>, to: impl Into<RawValue>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            timing: None,
        }
    }

    pub fn timing(mut self, timing: impl Into<TimingInput>) -> Self {
        self.timing = Some(timing.into());
        self
    }

    pub fn timing_fn(mut self, f: impl Fn(f64) -> f64 + 'static) -> Self {
        self.timing = Some(TimingInput::Function(Rc::new(f)));
        self
    }
}

/// Raw instance configuration. Unset options take their defaults during validation.
#[derive(Clone)]
pub struct InstanceConfig<E> {
    pub from: Option<RawValue>,
    pub to: Option<RawValue>,
    pub elem: Option<E>,
    pub direct: StyleTarget<E>,
    pub track: Option<bool>,
    pub props: Option<PropConfigs>,
    pub inside: Option<Callback>,
    pub outside: Option<Callback>,
}

impl<E> Default for InstanceConfig<E> {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            elem: None,
            direct: StyleTarget::DocumentRoot,
            track: None,
            props: None,
            inside: None,
            outside: None,
        }
    }
}

impl<E> InstanceConfig<E> {
    pub fn new(from: impl Into<RawValue>, to: impl Into<RawValue>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn elem(mut self, elem: E) -> Self {
        self.elem = Some(elem);
        self
    }

    pub fn direct(mut self, target: StyleTarget<E>) -> Self {
        self.direct = target;
        self
    }

    pub fn track(mut self, track: bool) -> Self {
        self.track = Some(track);
        self
    }

    pub fn prop(mut self, key: impl Into<String>, prop: PropConfig) -> Self {
        self.props
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), prop);
        self
    }

    pub fn inside(mut self, f: impl Fn(&BoundaryEvent<'_>) + 'static) -> Self {
        self.inside = Some(Rc::new(f));
        self
    }

    pub fn outside(mut self, f: impl Fn(&BoundaryEvent<'_>) + 'static) -> Self {
        self.outside = Some(Rc::new(f));
        self
    }

    /// Parse an element-less, callback-less config from JSON:
    /// `{ "from": "0px", "to": 400, "track": false, "props": { "--y": { "from": 0, "to": "1px" } } }`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct JsonConfig {
            #[serde(default)]
            from: Option<RawValue>,
            #[serde(default)]
            to: Option<RawValue>,
            #[serde(default)]
            direct: Option<bool>,
            #[serde(default)]
            track: Option<bool>,
            #[serde(default)]
            props: Option<PropConfigs>,
        }

        let raw: JsonConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        Ok(Self {
            from: raw.from,
            to: raw.to,
            elem: None,
            direct: match raw.direct {
                Some(true) => StyleTarget::Anchor,
                _ => StyleTarget::DocumentRoot,
            },
            track: raw.track,
            props: raw.props,
            inside: None,
            outside: None,
        })
    }
}

impl<E: fmt::Debug> fmt::Debug for InstanceConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceConfig")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("elem", &self.elem)
            .field("direct", &self.direct)
            .field("track", &self.track)
            .field("props", &self.props)
            .field("inside", &self.inside.is_some())
            .field("outside", &self.outside.is_some())
            .finish()
    }
}

/// Validated property: absolute bounds and a resolved timing curve.
#[derive(Clone, Debug)]
pub struct PropSpec {
    pub from: AnchorValue,
    pub to: AnchorValue,
    pub timing: Timing,
}

impl PropSpec {
    /// Unit of `from`, falling back to `to`. Animating `"0"` → `"100px"` yields px throughout.
    pub fn unit(&self) -> &str {
        if self.from.unit.is_empty() {
            &self.to.unit
        } else {
            &self.from.unit
        }
    }
}

/// Validated instance data with anchors resolved to absolute scroll offsets.
#[derive(Clone)]
pub struct ScrollData<E> {
    pub from: AnchorValue,
    pub to: AnchorValue,
    pub elem: Option<E>,
    pub target: StyleTarget<E>,
    pub track: bool,
    pub props: IndexMap<String, PropSpec>,
    pub inside: Callback,
    pub outside: Callback,
    /// Anchor element box captured when relative anchors were last resolved.
    pub anchor_box: Option<Rect>,
}

impl<E> ScrollData<E> {
    /// Serializable view (no element references, no callbacks).
    pub fn snapshot(&self) -> DataSnapshot {
        DataSnapshot {
            from: self.from.clone(),
            to: self.to.clone(),
            direct: self.target.kind(),
            track: self.track,
            anchor_box: self.anchor_box,
            props: self
                .props
                .iter()
                .map(|(key, p)| {
                    (
                        key.clone(),
                        PropSnapshot {
                            from: p.from.clone(),
                            to: p.to.clone(),
                            timing: p.timing.name(),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for ScrollData<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollData")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("elem", &self.elem)
            .field("target", &self.target)
            .field("track", &self.track)
            .field("props", &self.props)
            .field("anchor_box", &self.anchor_box)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropSnapshot {
    pub from: AnchorValue,
    pub to: AnchorValue,
    pub timing: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataSnapshot {
    pub from: AnchorValue,
    pub to: AnchorValue,
    pub direct: &'static str,
    pub track: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_box: Option<Rect>,
    pub props: IndexMap<String, PropSnapshot>,
}

/// Registered instance: the caller's config, its validated data and the run flag.
pub struct Instance<E> {
    pub(crate) config: InstanceConfig<E>,
    pub(crate) data: ScrollData<E>,
    pub(crate) active: bool,
}

impl<E> Instance<E> {
    pub(crate) fn new(config: InstanceConfig<E>, data: ScrollData<E>) -> Self {
        Self {
            config,
            data,
            active: false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &InstanceConfig<E> {
        &self.config
    }

    pub fn data(&self) -> &ScrollData<E> {
        &self.data
    }
}
