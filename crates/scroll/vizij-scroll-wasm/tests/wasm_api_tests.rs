#![cfg(target_arch = "wasm32")]
use js_sys::{Function, Reflect};
use vizij_scroll_wasm::{abi_version, DepthLayer, VizijScroll};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

/// Evaluate a JS expression body (`return ...`).
fn js(body: &str) -> JsValue {
    Function::new_no_args(body).call0(&JsValue::NULL).unwrap()
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap()
}

fn root() -> HtmlElement {
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .document_element()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    assert!(VizijScroll::new(JsValue::UNDEFINED).is_ok());
    assert!(VizijScroll::new(js("return { precision: 2 };")).is_ok());
}

/// it should interpolate and write to the document root on update
#[wasm_bindgen_test]
fn update_writes_root_style() {
    let scroll = VizijScroll::new(JsValue::NULL).unwrap();
    let inst = scroll
        .create(js(
            "return { from: '-1000px', to: '1000px', props: { '--vizij-fade': { from: '0', to: '1' } } };",
        ))
        .unwrap();

    let scroll_top = f64::from(
        web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .scrolling_element()
            .unwrap()
            .scroll_top(),
    );
    let props = inst.update().unwrap();
    let value = get(&props, "--vizij-fade").as_string().unwrap();
    let expected = (scroll_top + 1000.0) / 2000.0;
    assert_eq!(value.parse::<f64>().unwrap(), (expected * 10000.0).round() / 10000.0);

    let written = root().style().get_property_value("--vizij-fade").unwrap();
    assert_eq!(written.trim(), value);
}

/// it should call inside/outside with (instance, percentage, props)
#[wasm_bindgen_test]
fn callbacks_receive_instance_percentage_props() {
    let scroll = VizijScroll::new(JsValue::NULL).unwrap();
    js("globalThis.__vizijHits = []; return null;");
    let inst = scroll
        .create(js(
            "return {
                from: '-1000px',
                to: '1000px',
                props: { '--vizij-cb': { from: 0, to: '10px' } },
                inside: (instance, percentage, props) =>
                    globalThis.__vizijHits.push({ id: instance.id, percentage, value: props['--vizij-cb'] }),
            };",
        ))
        .unwrap();

    inst.update().unwrap();
    let hits = js("return globalThis.__vizijHits;");
    assert_eq!(get(&hits, "length").as_f64(), Some(1.0));
    let hit = get(&hits, "0");
    assert_eq!(get(&hit, "id").as_f64(), Some(f64::from(inst.id())));
    assert!(get(&hit, "percentage").as_f64().unwrap() >= 50.0);
    assert!(get(&hit, "value").as_string().unwrap().ends_with("px"));
}

/// it should reject malformed configs before registering anything
#[wasm_bindgen_test]
fn invalid_configs_error() {
    let scroll = VizijScroll::new(JsValue::NULL).unwrap();
    for body in [
        "return 42;",
        "return { to: '10px' };",
        "return { from: '0px', to: 'top-bottom' };",
        "return { from: '0px', to: '10px', direct: true };",
        "return { from: '0px', to: '10px', direct: 'yes' };",
        "return { from: '0px', to: '10px', track: 'no' };",
        "return { from: '0px', to: '10px', inside: 5 };",
        "return { from: '0px', to: '10px', props: { x: { from: 0, to: 1, timing: 'wobble' } } };",
        "return { from: '0px', to: '10px', props: { x: { from: 0, to: 1, timing: 3 } } };",
        "return { from: '0px', to: '10px', props: { x: { from: 'auto', to: 1 } } };",
    ] {
        assert!(scroll.create(js(body)).is_err(), "{body}");
    }
}

/// it should toggle activity and refuse calls after destroy
#[wasm_bindgen_test]
fn lifecycle_and_data() {
    let scroll = VizijScroll::new(JsValue::NULL).unwrap();
    let inst = scroll
        .create(js(
            "return { from: 0, to: '500px', track: false, props: { '--vizij-x': { from: '0', to: '1', timing: 'quadOut' } } };",
        ))
        .unwrap();

    assert!(!inst.is_active().unwrap());
    inst.start().unwrap();
    assert!(inst.is_active().unwrap());
    inst.stop().unwrap();
    assert!(!inst.is_active().unwrap());

    let data = inst.get_data().unwrap();
    assert_eq!(get(&get(&data, "to"), "value").as_f64(), Some(500.0));
    assert_eq!(get(&data, "track").as_bool(), Some(false));
    let prop = get(&get(&data, "props"), "--vizij-x");
    assert_eq!(get(&prop, "timing").as_string().as_deref(), Some("quadOut"));

    inst.destroy().unwrap();
    assert!(inst.start().is_err());
    assert!(inst.update().is_err());
}

/// it should resolve relative anchors against a live element
#[wasm_bindgen_test]
fn relative_anchor_with_element() {
    let scroll = VizijScroll::new(JsValue::NULL).unwrap();
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&el).unwrap();
    Reflect::set(&js("return globalThis;"), &JsValue::from_str("__vizijEl"), &el).unwrap();

    let inst = scroll
        .create(js(
            "return { elem: globalThis.__vizijEl, from: 'top-bottom', to: 'bottom-top', direct: true, props: { '--vizij-a': { from: 0, to: 1 } } };",
        ))
        .unwrap();
    let data = inst.get_data().unwrap();
    assert_eq!(get(&get(&data, "from"), "unit").as_string().as_deref(), Some("px"));
    assert_eq!(get(&data, "direct").as_string().as_deref(), Some("anchor"));

    el.remove();
    assert!(inst.calculate().is_err());
}

/// it should ease depth layers and skip redundant writes
#[wasm_bindgen_test]
fn depth_layer_advances() {
    let mut layer = DepthLayer::new(1);
    layer.set_target_from_progress(0.0, false);
    assert_eq!(layer.advance().as_deref(), Some("translate3d(0, 10.83rem, 0)"));
    assert_eq!(layer.advance(), None);
    assert_eq!(layer.translate_y(), 10.83);
}

/// it should treat null track and props as their defaults
#[wasm_bindgen_test]
fn null_track_and_props_use_defaults() {
    let scroll = VizijScroll::new(JsValue::NULL).unwrap();
    let inst = scroll
        .create(js("return { from: 0, to: 10, track: null, props: null };"))
        .unwrap();
    let data = inst.get_data().unwrap();
    assert_eq!(get(&data, "track").as_bool(), Some(true));
    let props = get(&data, "props");
    assert_eq!(js_sys::Object::keys(props.unchecked_ref()).length(), 0);
}

/// it should let callbacks read their instance
#[wasm_bindgen_test]
fn callbacks_can_use_their_instance() {
    let scroll = VizijScroll::new(JsValue::NULL).unwrap();
    js("globalThis.__vizijSeen = null; return null;");
    let inst = scroll
        .create(js(
            "return {
                from: '-1000px',
                to: '1000px',
                inside: (instance) => {
                    globalThis.__vizijSeen = {
                        active: instance.isActive(),
                        from: instance.getData().from.value,
                    };
                },
            };",
        ))
        .unwrap();

    inst.update().unwrap();
    let seen = js("return globalThis.__vizijSeen;");
    assert_eq!(get(&seen, "active").as_bool(), Some(false));
    assert_eq!(get(&seen, "from").as_f64(), Some(-1000.0));
}

/// it should fall back to linear progress when a timing function misbehaves
#[wasm_bindgen_test]
fn broken_timing_functions_stay_linear() {
    let scroll = VizijScroll::new(JsValue::NULL).unwrap();
    let inst = scroll
        .create(js(
            "return {
                from: '-1000px',
                to: '1000px',
                props: {
                    '--vizij-throws': { from: 0, to: '10px', timing: () => { throw new Error('boom'); } },
                    '--vizij-text': { from: 0, to: '10px', timing: () => 'nope' },
                    '--vizij-linear': { from: 0, to: '10px', timing: 'linear' },
                },
            };",
        ))
        .unwrap();

    let props = inst.update().unwrap();
    let linear = get(&props, "--vizij-linear").as_string().unwrap();
    for key in ["--vizij-throws", "--vizij-text"] {
        let value = get(&props, key).as_string().unwrap();
        assert!(!value.contains("NaN"), "{key}: {value}");
        assert_eq!(value, linear);
    }
}
