// Re-export all public modules so they can be used from main.rs
pub mod logging;
pub mod utils;

// MVC Architecture (rendering is left to the host engine)
pub mod model;
pub mod controller;

pub use controller::{
    ControllerSettings, FrameReport, InputEvent, InputState, KinematicController, MoveIntent, Session,
    StepOutcome,
};
pub use model::{Actor, Camera, CameraRig, Collider, Level, LevelError};

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, Event, KeyboardEvent, Window};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    logging::init();
}

/// Browser-side handle: the host engine calls `tick` from its render loop
/// and reads positions back to place its meshes and camera.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct WebSession {
    session: Rc<RefCell<Session>>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl WebSession {
    /// `scene` is one of "forest", "orbit", "container" or "editor"
    #[wasm_bindgen(constructor)]
    pub fn new(scene: &str) -> Result<WebSession, JsValue> {
        let session = Session::scene(scene).ok_or_else(|| js_error(format!("unknown scene {scene:?}")))?;
        Ok(Self {
            session: Rc::new(RefCell::new(session)),
        })
    }

    /// Feed document keyboard and focus events into the session
    pub fn attach_keyboard(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global `window`"))?;
        let document = window.document().ok_or_else(|| js_error("no document on window"))?;
        setup_input_listeners(&window, &document, self.session.clone())
    }

    /// Advance one frame; `delta_ms` is the engine's frame time in milliseconds
    pub fn tick(&self, delta_ms: f64) {
        self.session.borrow_mut().tick_millis(delta_ms);
    }

    pub fn key_down(&self, key: &str) {
        self.session.borrow_mut().key_down(key);
    }

    pub fn key_up(&self, key: &str) {
        self.session.borrow_mut().key_up(key);
    }

    /// Replace the level from JSON. On failure the current level keeps running.
    pub fn load_level_json(&self, json: &str) -> Result<(), JsValue> {
        match Level::from_json(json) {
            Ok(level) => {
                self.session.borrow_mut().set_level(level);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "error loading level");
                Err(js_error(e.to_string()))
            }
        }
    }

    pub fn level_json(&self) -> Result<String, JsValue> {
        self.session.borrow().level().to_json().map_err(|e| js_error(e.to_string()))
    }

    pub fn player_position(&self) -> js_sys::Float32Array {
        vec3_array(self.session.borrow().actor().position)
    }

    pub fn camera_position(&self) -> js_sys::Float32Array {
        vec3_array(self.session.borrow().camera().eye)
    }

    pub fn camera_target(&self) -> js_sys::Float32Array {
        vec3_array(self.session.borrow().camera().target())
    }

    pub fn grounded(&self) -> bool {
        self.session.borrow().actor().grounded
    }
}

/// Setup keyboard listeners; each one only writes the held-key map
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(window: &Window, document: &Document, session: Rc<RefCell<Session>>) -> Result<(), JsValue> {
    let processor = controller::InputProcessor::new(session.borrow().settings().bindings.clone());

    // Keyboard down
    {
        let session = session.clone();
        let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let key = e.key();
            // Keep arrows and space from scrolling the page
            if processor.is_game_key(&key) {
                e.prevent_default();
            }
            session.borrow_mut().handle_event(&InputEvent::KeyDown(key));
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // Keyboard up
    {
        let session = session.clone();
        let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            session.borrow_mut().handle_event(&InputEvent::KeyUp(e.key()));
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
        keyup.forget();
    }

    // Focus loss - clear all keys
    {
        let session = session.clone();
        let blur = Closure::wrap(Box::new(move |_e: Event| {
            session.borrow_mut().handle_event(&InputEvent::FocusLost);
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();
    }

    // Visibility change - clear all keys
    {
        let doc = document.clone();
        let visibility = Closure::wrap(Box::new(move |_e: Event| {
            let visible = !doc.hidden();
            session.borrow_mut().handle_event(&InputEvent::VisibilityChanged { visible });
        }) as Box<dyn FnMut(Event)>);
        document.add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())?;
        visibility.forget();
    }

    tracing::info!("keyboard listeners attached");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn vec3_array(v: glam::Vec3) -> js_sys::Float32Array {
    js_sys::Float32Array::from(&v.to_array()[..])
}

#[cfg(target_arch = "wasm32")]
fn js_error<E: Into<String>>(msg: E) -> JsValue {
    JsValue::from_str(&msg.into())
}
