//! Crop rectangle overlay on the preview canvas
//!
//! Wires mouse events on the overlay element and its resize handles to the
//! core [`Cropper`] gesture machine, and keeps the four percentage inputs in
//! sync with the rectangle. Handles are child elements carrying a
//! `data-handle` attribute such as `top-left` or `middle-right`.
//!
//! Move and up listeners live on the document only while a gesture is
//! active; [`PointerCapture`] removes them when dropped.

use pdfsplit_core::{CanvasSize, CropMargins, CropRectangle, Cropper, Handle, PointerTarget};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, MouseEvent};

type MouseHandler = Closure<dyn FnMut(MouseEvent)>;

/// Attribute naming the handle an element represents.
const HANDLE_ATTRIBUTE: &str = "data-handle";

/// The four percentage inputs next to the preview
struct MarginFields {
    top: HtmlInputElement,
    bottom: HtmlInputElement,
    left: HtmlInputElement,
    right: HtmlInputElement,
}

impl MarginFields {
    fn all(&self) -> [&HtmlInputElement; 4] {
        [&self.top, &self.bottom, &self.left, &self.right]
    }

    fn show(&self, margins: &CropMargins) {
        self.top.set_value(&format_percent(margins.top));
        self.bottom.set_value(&format_percent(margins.bottom));
        self.left.set_value(&format_percent(margins.left));
        self.right.set_value(&format_percent(margins.right));
        for field in self.all() {
            field.set_custom_validity("");
        }
    }

    /// Current field values; an empty field counts as zero.
    fn read(&self) -> CropMargins {
        let value = |field: &HtmlInputElement| {
            let v = field.value_as_number();
            if v.is_finite() {
                v
            } else {
                0.0
            }
        };
        CropMargins::new(
            value(&self.top),
            value(&self.bottom),
            value(&self.left),
            value(&self.right),
        )
    }
}

/// Document-level move/up listeners held for the length of one gesture
struct PointerCapture {
    target: web_sys::Document,
    on_move: js_sys::Function,
    on_up: js_sys::Function,
}

impl PointerCapture {
    fn acquire(on_move: &js_sys::Function, on_up: &js_sys::Function) -> Result<Self, JsValue> {
        let target = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;

        target.add_event_listener_with_callback("mousemove", on_move)?;
        target.add_event_listener_with_callback("mouseup", on_up)?;

        Ok(Self {
            target,
            on_move: on_move.clone(),
            on_up: on_up.clone(),
        })
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("mousemove", &self.on_move);
        let _ = self
            .target
            .remove_event_listener_with_callback("mouseup", &self.on_up);
    }
}

struct CropperState {
    cropper: Cropper,
    overlay: HtmlElement,
    fields: MarginFields,
    capture: Option<PointerCapture>,
}

impl CropperState {
    fn render(&self) {
        let rect = self.cropper.rect();
        let style = self.overlay.style();
        for (property, value) in rect_style(&rect) {
            let _ = style.set_property(property, &value);
        }
    }

    fn render_all(&self) {
        self.render();
        self.fields.show(&self.cropper.margins());
    }
}

/// Event handlers; dropped together with the widget
struct Listeners {
    on_down: MouseHandler,
    // Kept alive for the document listeners `PointerCapture` registers.
    _on_move: MouseHandler,
    _on_up: MouseHandler,
    on_change: Closure<dyn FnMut(Event)>,
}

/// Interactive crop rectangle bound to an overlay element
#[wasm_bindgen]
pub struct CropperWidget {
    state: Rc<RefCell<CropperState>>,
    listeners: Listeners,
}

#[wasm_bindgen]
impl CropperWidget {
    /// Bind to an overlay element sized to a canvas of `canvas_width` x
    /// `canvas_height` pixels, starting with zero margins.
    #[wasm_bindgen(constructor)]
    pub fn new(
        overlay: HtmlElement,
        top: HtmlInputElement,
        bottom: HtmlInputElement,
        left: HtmlInputElement,
        right: HtmlInputElement,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Result<CropperWidget, JsValue> {
        let state = Rc::new(RefCell::new(CropperState {
            cropper: Cropper::new(CanvasSize::new(canvas_width, canvas_height)),
            overlay,
            fields: MarginFields {
                top,
                bottom,
                left,
                right,
            },
            capture: None,
        }));

        let listeners = Self::listen(&state)?;
        state.borrow().render_all();

        Ok(Self { state, listeners })
    }

    /// Current margins as `{ top, bottom, left, right }`, rounded for display
    pub fn margins(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.current_margins())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Move the rectangle to match the given margins
    #[wasm_bindgen(js_name = setMargins)]
    pub fn set_margins(
        &mut self,
        top: f64,
        bottom: f64,
        left: f64,
        right: f64,
    ) -> Result<(), JsValue> {
        let mut state = self.state.borrow_mut();
        state
            .cropper
            .set_margins(&CropMargins::new(top, bottom, left, right))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        state.render_all();
        Ok(())
    }

    /// Adopt a new canvas size after the preview is re-rendered
    #[wasm_bindgen(js_name = resizeCanvas)]
    pub fn resize_canvas(&mut self, canvas_width: f64, canvas_height: f64) {
        let mut state = self.state.borrow_mut();
        state.capture = None;
        state
            .cropper
            .resize_canvas(CanvasSize::new(canvas_width, canvas_height));
        state.render_all();
    }

    /// Start over for a newly loaded document: zero margins on the new canvas
    pub fn reset(&mut self, canvas_width: f64, canvas_height: f64) {
        let mut state = self.state.borrow_mut();
        state.capture = None;
        state
            .cropper
            .reset(CanvasSize::new(canvas_width, canvas_height));
        state.render_all();
    }

    /// Whether a drag or resize is in progress
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.state.borrow().cropper.is_active()
    }
}

impl CropperWidget {
    pub(crate) fn current_margins(&self) -> CropMargins {
        self.state.borrow().cropper.margins()
    }

    fn listen(state: &Rc<RefCell<CropperState>>) -> Result<Listeners, JsValue> {
        let weak = Rc::downgrade(state);
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            with_state(&weak, |state| {
                let (x, y) = (event.client_x() as f64, event.client_y() as f64);
                if let Some(margins) = state.cropper.pointer_move(x, y) {
                    state.render();
                    state.fields.show(&margins);
                }
            });
        }) as Box<dyn FnMut(_)>);

        let weak = Rc::downgrade(state);
        let on_up = Closure::wrap(Box::new(move |_event: MouseEvent| {
            with_state(&weak, |state| {
                state.cropper.pointer_up();
                state.capture = None;
            });
        }) as Box<dyn FnMut(_)>);

        let weak = Rc::downgrade(state);
        let move_fn: js_sys::Function = on_move.as_ref().unchecked_ref::<js_sys::Function>().clone();
        let up_fn: js_sys::Function = on_up.as_ref().unchecked_ref::<js_sys::Function>().clone();
        let on_down = Closure::wrap(Box::new(move |event: MouseEvent| {
            with_state(&weak, |state| {
                let target = pointer_target(&event);
                let (x, y) = (event.client_x() as f64, event.client_y() as f64);
                if !state.cropper.pointer_down(target, x, y) {
                    return;
                }
                event.prevent_default();
                match PointerCapture::acquire(&move_fn, &up_fn) {
                    Ok(capture) => state.capture = Some(capture),
                    Err(_) => {
                        state.cropper.pointer_up();
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);

        let weak = Rc::downgrade(state);
        let on_change = Closure::wrap(Box::new(move |event: Event| {
            with_state(&weak, |state| {
                let margins = state.fields.read();
                match state.cropper.set_margins(&margins) {
                    Ok(_) => state.render_all(),
                    Err(e) => {
                        if let Some(field) = event
                            .target()
                            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                        {
                            field.set_custom_validity(&e.to_string());
                            field.report_validity();
                        }
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);

        {
            let state = state.borrow();
            state
                .overlay
                .add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
            for field in state.fields.all() {
                field.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
            }
        }

        Ok(Listeners {
            on_down,
            _on_move: on_move,
            _on_up: on_up,
            on_change,
        })
    }
}

impl Drop for CropperWidget {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.capture = None;
        let _ = state.overlay.remove_event_listener_with_callback(
            "mousedown",
            self.listeners.on_down.as_ref().unchecked_ref(),
        );
        for field in state.fields.all() {
            let _ = field.remove_event_listener_with_callback(
                "change",
                self.listeners.on_change.as_ref().unchecked_ref(),
            );
        }
    }
}

fn with_state(weak: &Weak<RefCell<CropperState>>, f: impl FnOnce(&mut CropperState)) {
    if let Some(state) = weak.upgrade() {
        if let Ok(mut state) = state.try_borrow_mut() {
            f(&mut state);
        }
    }
}

/// Resolve the element under the pointer to a handle or the rectangle body.
fn pointer_target(event: &MouseEvent) -> PointerTarget {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.get_attribute(HANDLE_ATTRIBUTE))
        .and_then(|name| name.parse::<Handle>().ok())
        .map_or(PointerTarget::Body, PointerTarget::Handle)
}

fn format_percent(value: f64) -> String {
    format!("{:.2}", value)
}

fn rect_style(rect: &CropRectangle) -> [(&'static str, String); 4] {
    [
        ("left", format!("{}px", rect.left)),
        ("top", format!("{}px", rect.top)),
        ("width", format!("{}px", rect.width)),
        ("height", format!("{}px", rect.height)),
    ]
}
