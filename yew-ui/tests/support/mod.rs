// Copyright 2025 Security Union LLC
// Licensed under MIT OR Apache-2.0
//
// Shared test harness for viacall-ui component tests.
//
// Provides mount/cleanup helpers, runtime config injection and DOM event
// helpers so that individual test files stay focused on assertions rather
// than boilerplate.
//
// Each test file that does `mod support;` compiles its own copy, so not every
// function is used in every compilation unit.
#![allow(dead_code)]

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// Create a fresh `<div>`, attach it to `<body>`, and return it.
pub fn create_mount_point() -> web_sys::Element {
    let document = gloo_utils::document();
    let div = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

/// Remove the mount-point from `<body>` so subsequent tests start clean.
pub fn cleanup(mount: &web_sys::Element) {
    gloo_utils::document()
        .body()
        .unwrap()
        .remove_child(mount)
        .ok();
}

/// Find the first `<button>` under `mount` whose text contains `label`.
pub fn button_with_text(mount: &web_sys::Element, label: &str) -> Option<web_sys::HtmlButtonElement> {
    let buttons = mount.query_selector_all("button").unwrap();
    (0..buttons.length())
        .filter_map(|i| buttons.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlButtonElement>().ok())
        .find(|button| button.text_content().unwrap_or_default().contains(label))
}

/// Set an input's value and fire a bubbling `input` event, the way typing
/// does.
pub fn type_into(input: &web_sys::HtmlInputElement, value: &str) {
    input.set_value(value);
    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    let event = web_sys::Event::new_with_event_init_dict("input", &init).unwrap();
    input.dispatch_event(&event).unwrap();
}

// ---------------------------------------------------------------------------
// Runtime config injection (integration tests)
// ---------------------------------------------------------------------------

/// Inject a `window.__APP_CONFIG` object with the given hosted SDK settings.
/// Call this before rendering any component that reads the runtime config.
pub fn inject_app_config(app_id: &str, token: Option<&str>, ice_servers: Option<&str>) {
    let config = js_sys::Object::new();
    let set = |key: &str, val: &JsValue| {
        js_sys::Reflect::set(&config, &key.into(), val).unwrap();
    };
    set("appId", &app_id.into());
    set("token", &token.map(JsValue::from).unwrap_or(JsValue::NULL));
    if let Some(ice_servers) = ice_servers {
        set("iceServers", &ice_servers.into());
    }

    let frozen = js_sys::Object::freeze(&config);
    let window = gloo_utils::window();
    js_sys::Reflect::set(&window, &"__APP_CONFIG".into(), &frozen).unwrap();
}

/// Remove `window.__APP_CONFIG` so tests don't leak state.
pub fn remove_app_config() {
    let window = gloo_utils::window();
    let _ = js_sys::Reflect::delete_property(&window.into(), &"__APP_CONFIG".into());
}

/// Polls `ready` between short sleeps until it holds or about two seconds
/// pass. Returns the last answer.
pub async fn wait_until(mut ready: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if ready() {
            return true;
        }
        yew::platform::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    ready()
}

// ---------------------------------------------------------------------------
// Hosted SDK mocking
// ---------------------------------------------------------------------------

/// Install a fake `window.AgoraRTC` whose client joins as uid 1001 and whose
/// local tracks count `close()` calls in `window.__agoraLedger`.
pub fn install_fake_agora() {
    js_sys::eval(
        r#"
        (function () {
            var ledger = { created: 0, closed: 0, joins: 0, leaves: 0 };
            window.__agoraLedger = ledger;
            function track(kind) {
                ledger.created += 1;
                var id = kind + '-' + ledger.created;
                return {
                    getTrackId: function () { return id; },
                    play: function () {},
                    setEnabled: function () { return Promise.resolve(); },
                    close: function () { ledger.closed += 1; }
                };
            }
            window.AgoraRTC = {
                createClient: function () {
                    return {
                        remoteUsers: [],
                        join: function () { ledger.joins += 1; return Promise.resolve(1001); },
                        publish: function () { return Promise.resolve(); },
                        unpublish: function () { return Promise.resolve(); },
                        subscribe: function () { return Promise.resolve(); },
                        leave: function () { ledger.leaves += 1; return Promise.resolve(); },
                        on: function () {},
                        off: function () {}
                    };
                },
                createMicrophoneAudioTrack: function () { return Promise.resolve(track('audio')); },
                createCameraVideoTrack: function () { return Promise.resolve(track('video')); }
            };
        })();
        "#,
    )
    .expect("failed to install fake AgoraRTC");
}

pub fn remove_fake_agora() {
    js_sys::eval("delete window.AgoraRTC; delete window.__agoraLedger;")
        .expect("failed to remove fake AgoraRTC");
}

/// One counter of the fake SDK: `created`, `closed`, `joins` or `leaves`.
pub fn agora_count(counter: &str) -> u32 {
    let ledger = js_sys::Reflect::get(&gloo_utils::window(), &"__agoraLedger".into()).unwrap();
    js_sys::Reflect::get(&ledger, &counter.into())
        .unwrap()
        .as_f64()
        .unwrap_or_default() as u32
}

// ---------------------------------------------------------------------------
// getUserMedia mocking
// ---------------------------------------------------------------------------

/// Replace `navigator.mediaDevices.getUserMedia` with one that hands out
/// canvas streams and remembers them, so tests can see whether the app
/// stopped their tracks.
pub fn install_fake_camera() {
    js_sys::eval(
        r#"
        (function () {
            window.__fakeStreams = [];
            navigator.mediaDevices.getUserMedia = function () {
                var canvas = document.createElement('canvas');
                canvas.width = 64;
                canvas.height = 48;
                canvas.getContext('2d').fillRect(0, 0, 64, 48);
                var stream = canvas.captureStream(1);
                window.__fakeStreams.push(stream);
                return Promise.resolve(stream);
            };
        })();
        "#,
    )
    .expect("failed to mock getUserMedia");
}

pub fn restore_camera() {
    js_sys::eval("delete navigator.mediaDevices.getUserMedia; delete window.__fakeStreams;")
        .expect("failed to restore getUserMedia");
}

/// Tracks handed out by the fake camera that are still `live`.
pub fn live_fake_tracks() -> u32 {
    js_sys::eval(
        r#"
        window.__fakeStreams.reduce(function (n, stream) {
            return n + stream.getTracks().filter(function (t) {
                return t.readyState === 'live';
            }).length;
        }, 0)
        "#,
    )
    .expect("failed to count live tracks")
    .as_f64()
    .unwrap_or_default() as u32
}
