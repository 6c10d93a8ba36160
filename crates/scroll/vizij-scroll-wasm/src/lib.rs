use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Object, Reflect};
use log::warn;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use vizij_scroll_core::{
    BoundaryEvent, Callback, Config, ConfigError, DepthLayer as CoreDepthLayer, InstanceConfig,
    InstanceId, PropConfig, PropConfigs, Props, RawValue, ScrollEngine, ScrollError, StyleTarget,
    TimingFn, TimingInput,
};

mod dom;

pub use dom::DomHost;

type Engine = ScrollEngine<DomHost>;
type Shared = Rc<RefCell<Engine>>;
type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type Deferred = Rc<RefCell<Vec<PendingCall>>>;

/// A boundary callback recorded while the engine was borrowed.
struct PendingCall {
    f: Function,
    id: u32,
    precise: f64,
    props: JsValue,
}

/// Invoke queued callbacks once the engine borrow has been released, so they
/// may call back into their `ScrollInstance`.
fn run_deferred(pending: &Deferred, engine: &Weak<RefCell<Engine>>) {
    loop {
        let batch = std::mem::take(&mut *pending.borrow_mut());
        if batch.is_empty() {
            return;
        }
        for call in batch {
            let instance = ScrollInstance {
                id: call.id,
                engine: engine.clone(),
                pending: Rc::downgrade(pending),
            };
            let result = call.f.call3(
                &JsValue::NULL,
                &instance.into(),
                &JsValue::from_f64(call.precise),
                &call.props,
            );
            if let Err(err) = result {
                warn!("scroll callback threw: {err:?}");
            }
        }
    }
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_err(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// Scroll engine bound to `window`: owns the frame loop and the resize listener.
#[wasm_bindgen]
pub struct VizijScroll {
    engine: Shared,
    pending: Deferred,
    _frame: FrameSlot,
    resize: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl VizijScroll {
    /// Create the engine and start its frame loop. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new VizijScroll({ resize_debounce_ms: 100, precision: 2 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijScroll, JsError> {
        #[cfg(feature = "console_error")]
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let host = DomHost::new()?;
        let window = host.window().clone();
        let engine: Shared = Rc::new(RefCell::new(ScrollEngine::with_config(host, cfg)));
        let pending: Deferred = Rc::new(RefCell::new(Vec::new()));

        let frame = start_frame_loop(&window, Rc::downgrade(&engine), Rc::downgrade(&pending))?;

        let weak = Rc::downgrade(&engine);
        let resize = Closure::<dyn FnMut()>::new(move || {
            let Some(engine) = weak.upgrade() else { return };
            match engine.try_borrow_mut() {
                Ok(mut engine) => {
                    let now = engine.host().now();
                    engine.notify_resize(now);
                }
                Err(_) => warn!("resize ignored: scroll engine busy"),
            };
        });
        window
            .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("failed to listen for resize: {e:?}")))?;

        Ok(VizijScroll {
            engine,
            pending,
            _frame: frame,
            resize,
        })
    }

    /// Validate `config` and register a new, stopped instance.
    ///
    /// `config` mirrors the core shape: `{ from, to, elem?, direct?, track?, props?, inside?, outside? }`
    /// where `direct` is a boolean or an element, and each prop is `{ from, to, timing? }` with
    /// `timing` a curve name or a function.
    #[wasm_bindgen]
    pub fn create(&self, config: JsValue) -> Result<ScrollInstance, JsError> {
        let pending = Rc::downgrade(&self.pending);
        let cfg = read_config(&config, &pending).map_err(js_err)?;
        let mut engine = self
            .engine
            .try_borrow_mut()
            .map_err(|_| JsError::new("scroll engine is busy"))?;
        let id = engine.create(cfg).map_err(js_err)?;
        Ok(ScrollInstance {
            id: id.0,
            engine: Rc::downgrade(&self.engine),
            pending,
        })
    }

    /// Read `scrollTop` from `elem` instead of the document's scrolling element.
    #[wasm_bindgen(js_name = setScrollingElement)]
    pub fn set_scrolling_element(&self, elem: Element) -> Result<(), JsError> {
        let mut engine = self
            .engine
            .try_borrow_mut()
            .map_err(|_| JsError::new("scroll engine is busy"))?;
        engine.host_mut().set_scrolling_element(elem);
        Ok(())
    }

    /// Recalculate and update tracked instances now instead of waiting for the debounce.
    #[wasm_bindgen(js_name = flushResize)]
    pub fn flush_resize(&self) -> Result<u32, JsError> {
        let recalculated = self
            .engine
            .try_borrow_mut()
            .map_err(|_| JsError::new("scroll engine is busy"))?
            .handle_resize();
        run_deferred(&self.pending, &Rc::downgrade(&self.engine));
        Ok(recalculated as u32)
    }
}

impl Drop for VizijScroll {
    fn drop(&mut self) {
        if let Ok(engine) = self.engine.try_borrow() {
            let _ = engine
                .host()
                .window()
                .remove_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
        }
    }
}

/// Never-ending `requestAnimationFrame` loop. Stops rescheduling once the engine is dropped.
fn start_frame_loop(
    window: &Window,
    engine: Weak<RefCell<Engine>>,
    pending: Weak<RefCell<Vec<PendingCall>>>,
) -> Result<FrameSlot, JsError> {
    let slot: FrameSlot = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let win = window.clone();

    *slot.borrow_mut() = Some(Closure::new(move |now: f64| {
        let Some(shared) = engine.upgrade() else { return };
        match shared.try_borrow_mut() {
            Ok(mut engine) => {
                engine.tick(now);
            }
            Err(_) => warn!("frame skipped: scroll engine busy"),
        }
        if let Some(pending) = pending.upgrade() {
            run_deferred(&pending, &engine);
        }
        if let Some(cb) = next.borrow().as_ref() {
            if let Err(err) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                warn!("failed to schedule next frame: {err:?}");
            }
        }
    }));

    if let Some(cb) = slot.borrow().as_ref() {
        window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("requestAnimationFrame failed: {e:?}")))?;
    }
    Ok(slot)
}

/// Handle to one registered instance.
#[wasm_bindgen]
pub struct ScrollInstance {
    id: u32,
    engine: Weak<RefCell<Engine>>,
    pending: Weak<RefCell<Vec<PendingCall>>>,
}

impl ScrollInstance {
    fn with_engine<T>(
        &self,
        f: impl FnOnce(&mut Engine, InstanceId) -> Result<T, ScrollError>,
    ) -> Result<T, JsError> {
        let engine = self
            .engine
            .upgrade()
            .ok_or_else(|| JsError::new("scroll engine has been dropped"))?;
        let mut guard = engine
            .try_borrow_mut()
            .map_err(|_| JsError::new("scroll engine is busy"))?;
        let result = f(&mut guard, InstanceId(self.id)).map_err(js_err);
        drop(guard);
        if let Some(pending) = self.pending.upgrade() {
            run_deferred(&pending, &self.engine);
        }
        result
    }
}

#[wasm_bindgen]
impl ScrollInstance {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn start(&self) -> Result<(), JsError> {
        self.with_engine(|e, id| e.start(id))
    }

    pub fn stop(&self) -> Result<(), JsError> {
        self.with_engine(|e, id| e.stop(id))
    }

    /// Interpolate now, write styles, fire the boundary callback. Returns the props object.
    pub fn update(&self) -> Result<JsValue, JsError> {
        let props = self.with_engine(|e, id| e.update(id))?;
        Ok(props_to_js(&props))
    }

    /// Re-resolve anchors against current geometry.
    pub fn calculate(&self) -> Result<(), JsError> {
        self.with_engine(|e, id| e.calculate(id))
    }

    pub fn destroy(&self) -> Result<(), JsError> {
        self.with_engine(|e, id| e.destroy(id))
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> Result<bool, JsError> {
        self.with_engine(|e, id| e.is_active(id))
    }

    /// Validated data as a plain object (`from`, `to`, `direct`, `track`, `props`, ...).
    #[wasm_bindgen(js_name = getData)]
    pub fn get_data(&self) -> Result<JsValue, JsError> {
        let snapshot = self.with_engine(|e, id| e.snapshot(id))?;
        snapshot
            .serialize(&swb::Serializer::json_compatible())
            .map_err(|e| JsError::new(&format!("getData error: {e}")))
    }
}

/// Parallax layer eased toward a progress-derived offset; write `advance()` to `style.transform`.
#[wasm_bindgen]
pub struct DepthLayer {
    inner: CoreDepthLayer,
}

#[wasm_bindgen]
impl DepthLayer {
    #[wasm_bindgen(constructor)]
    pub fn new(depth: u32) -> DepthLayer {
        DepthLayer {
            inner: CoreDepthLayer::new(depth),
        }
    }

    #[wasm_bindgen(js_name = setTargetFromProgress)]
    pub fn set_target_from_progress(&mut self, progress: f64, compact: bool) {
        self.inner.set_target_from_progress(progress, compact);
    }

    /// Next transform string, or `undefined` when nothing changed.
    pub fn advance(&mut self) -> Option<String> {
        self.inner.advance()
    }

    #[wasm_bindgen(getter, js_name = translateY)]
    pub fn translate_y(&self) -> f64 {
        self.inner.translate_y()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

// ---------- JS config conversion ----------

fn invalid(field: impl Into<String>, expected: &'static str) -> ConfigError {
    ConfigError::InvalidType {
        field: field.into(),
        expected,
    }
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn read_raw(value: JsValue, field: &str) -> Result<Option<RawValue>, ConfigError> {
    if jsvalue_is_undefined_or_null(&value) {
        return Ok(None);
    }
    if let Some(n) = value.as_f64() {
        return Ok(Some(RawValue::Number(n)));
    }
    if let Some(s) = value.as_string() {
        return Ok(Some(RawValue::Text(s)));
    }
    Err(invalid(field, "a string or a number"))
}

fn read_config(
    config: &JsValue,
    pending: &Weak<RefCell<Vec<PendingCall>>>,
) -> Result<InstanceConfig<Element>, ConfigError> {
    if !config.is_object() {
        return Err(invalid("config", "an object"));
    }

    let elem = get(config, "elem");
    let elem = if jsvalue_is_undefined_or_null(&elem) {
        None
    } else {
        Some(
            elem.dyn_into::<Element>()
                .map_err(|_| invalid("elem", "an element"))?,
        )
    };

    let direct = get(config, "direct");
    let direct = if jsvalue_is_undefined_or_null(&direct) {
        StyleTarget::DocumentRoot
    } else if let Some(flag) = direct.as_bool() {
        if flag {
            StyleTarget::Anchor
        } else {
            StyleTarget::DocumentRoot
        }
    } else {
        StyleTarget::Element(
            direct
                .dyn_into::<Element>()
                .map_err(|_| invalid("direct", "a boolean or an element"))?,
        )
    };

    let track = get(config, "track");
    let track = if jsvalue_is_undefined_or_null(&track) {
        None
    } else {
        Some(track.as_bool().ok_or_else(|| invalid("track", "a boolean"))?)
    };

    Ok(InstanceConfig {
        from: read_raw(get(config, "from"), "from")?,
        to: read_raw(get(config, "to"), "to")?,
        elem,
        direct,
        track,
        props: read_props(get(config, "props"))?,
        inside: read_callback(get(config, "inside"), "inside", pending)?,
        outside: read_callback(get(config, "outside"), "outside", pending)?,
    })
}

fn read_props(props: JsValue) -> Result<Option<PropConfigs>, ConfigError> {
    if jsvalue_is_undefined_or_null(&props) {
        return Ok(None);
    }
    if !props.is_object() {
        return Err(invalid("props", "an object"));
    }
    let mut out = PropConfigs::new();
    for key in Object::keys(props.unchecked_ref::<Object>()).iter() {
        let Some(key) = key.as_string() else { continue };
        let prop = get(&props, &key);
        if !prop.is_object() {
            return Err(invalid(format!("props.{key}"), "an object"));
        }
        let timing = get(&prop, "timing");
        let timing = if jsvalue_is_undefined_or_null(&timing) {
            None
        } else if let Some(name) = timing.as_string() {
            Some(TimingInput::Name(name))
        } else if let Some(f) = timing.dyn_ref::<Function>() {
            Some(TimingInput::Function(js_timing(f.clone())))
        } else {
            return Err(invalid(format!("props.{key}.timing"), "a string or a function"));
        };
        let entry = PropConfig {
            from: read_raw(get(&prop, "from"), &format!("props.{key}.from"))?,
            to: read_raw(get(&prop, "to"), &format!("props.{key}.to"))?,
            timing,
        };
        out.insert(key, entry);
    }
    Ok(Some(out))
}

/// A throwing or non-numeric timing function falls back to linear progress.
fn js_timing(f: Function) -> TimingFn {
    Rc::new(move |t: f64| match f.call1(&JsValue::NULL, &JsValue::from_f64(t)) {
        Ok(v) => match v.as_f64() {
            Some(eased) if !eased.is_nan() => eased,
            _ => {
                warn!("timing function returned {v:?} for {t}; using linear progress");
                t
            }
        },
        Err(err) => {
            warn!("timing function threw: {err:?}; using linear progress");
            t
        }
    })
}

fn read_callback(
    value: JsValue,
    field: &'static str,
    pending: &Weak<RefCell<Vec<PendingCall>>>,
) -> Result<Option<Callback>, ConfigError> {
    if jsvalue_is_undefined_or_null(&value) {
        return Ok(None);
    }
    let f = value
        .dyn_into::<Function>()
        .map_err(|_| invalid(field, "a function"))?;
    Ok(Some(Rc::new(js_callback(f, pending.clone()))))
}

/// JS callbacks receive `(instance, precisePercentage, props)`. They are
/// queued here and run by `run_deferred` after the frame's style writes.
fn js_callback(
    f: Function,
    pending: Weak<RefCell<Vec<PendingCall>>>,
) -> impl Fn(&BoundaryEvent<'_>) + 'static {
    move |ev| {
        let Some(pending) = pending.upgrade() else { return };
        pending.borrow_mut().push(PendingCall {
            f: f.clone(),
            id: ev.id.0,
            precise: ev.progress.precise,
            props: props_to_js(ev.props),
        });
    }
}

fn props_to_js(props: &Props) -> JsValue {
    let obj = Object::new();
    for (key, value) in props {
        let _ = Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_str(value));
    }
    obj.into()
}
