//! Browser host
//!
//! Mounts a game on a `<canvas>`: a 2D-context [`Surface`], a
//! `requestAnimationFrame` loop driving a [`FrameDriver`], and window key
//! listeners. The returned [`GameHandle`] tears everything down.

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, Window};

use super::{CancelToken, FrameDriver};
use crate::input::{Key, KeyEvent};
use crate::renderer::{Color, Surface, TextStyle};
use crate::settings::ArcadeSettings;
use crate::sim::collision::Rect;
use crate::sim::{BlitzballGame, BreakoutGame, Game};

/// [`Surface`] over a canvas 2D context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        if let Err(e) = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
        {
            log::warn!("arc failed: {:?}", e);
        }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, rect: Rect) {
        self.ctx
            .clear_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        self.circle_path(center, radius);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], fill: Color, outline: Option<(Color, f32)>) {
        self.ctx.begin_path();
        self.ctx.move_to(points[0].x as f64, points[0].y as f64);
        self.ctx.line_to(points[1].x as f64, points[1].y as f64);
        self.ctx.line_to(points[2].x as f64, points[2].y as f64);
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&fill.to_css());
        self.ctx.fill();
        if let Some((color, width)) = outline {
            self.ctx.set_stroke_style_str(&color.to_css());
            self.ctx.set_line_width(width as f64);
            self.ctx.stroke();
        }
    }

    fn text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        self.ctx.set_fill_style_str(&style.color.to_css());
        self.ctx.set_font(&style.font());
        self.ctx.set_text_align(style.align.as_css());
        if let Err(e) = self.ctx.fill_text(text, pos.x as f64, pos.y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Everything a mounted game holds on to
struct Mounted {
    window: Window,
    token: CancelToken,
    raf_id: Rc<Cell<Option<i32>>>,
    frame_callback: FrameCallback,
    listeners: Vec<(&'static str, Closure<dyn FnMut(web_sys::Event)>)>,
}

impl Mounted {
    fn unmount(self) {
        self.token.cancel();
        if let Some(id) = self.raf_id.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        for (kind, listener) in &self.listeners {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove {} listener: {:?}", kind, e);
            }
        }
        // Drops the frame closure and the game it owns
        self.frame_callback.borrow_mut().take();
    }
}

/// Handle to a mounted game; `unmount` (or dropping it) stops the loop and
/// removes the listeners
#[wasm_bindgen]
pub struct GameHandle {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl GameHandle {
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.unmount();
            log::info!("Game unmounted");
        }
    }
}

impl Drop for GameHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn js_error(message: &str) -> JsValue {
    JsValue::from_str(message)
}

fn canvas_context(
    window: &Window,
    canvas_id: &str,
    size: Vec2,
) -> Result<CanvasRenderingContext2d, JsValue> {
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| js_error(&format!("no element with id '{}'", canvas_id)))?
        .dyn_into()
        .map_err(|_| js_error(&format!("'{}' is not a canvas", canvas_id)))?;
    canvas.set_width(size.x as u32);
    canvas.set_height(size.y as u32);

    canvas
        .get_context("2d")?
        .ok_or_else(|| js_error("2d context unavailable"))?
        .dyn_into()
        .map_err(|_| js_error("unexpected 2d context type"))
}

fn mount<G: Game + 'static>(
    canvas_id: &str,
    game: G,
    settings: &ArcadeSettings,
) -> Result<GameHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let ctx = canvas_context(&window, canvas_id, game.arena_size())?;
    let name = game.name();

    let surface = Rc::new(RefCell::new(CanvasSurface::new(ctx)));
    let driver = Rc::new(RefCell::new(FrameDriver::new(game, settings.step_mode)));
    let token = CancelToken::new();
    let raf_id = Rc::new(Cell::new(None));
    let frame_callback: FrameCallback = Rc::new(RefCell::new(None));

    let mut listeners = Vec::new();

    // Key down/up
    for (kind, pressed) in [("keydown", true), ("keyup", false)] {
        let driver = driver.clone();
        let listener = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let Some(key) = Key::from_browser_key(&event.key()) else {
                return;
            };
            let key_event = KeyEvent { key, pressed };
            let response = driver.borrow_mut().game_mut().handle_key(key_event);
            if response.prevent_default {
                event.prevent_default();
            }
        });
        window.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
        listeners.push((kind, listener));
    }

    // Window blur: held keys never see their keyup
    {
        let driver = driver.clone();
        let listener = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            driver.borrow_mut().game_mut().focus_lost();
        });
        window.add_event_listener_with_callback("blur", listener.as_ref().unchecked_ref())?;
        listeners.push(("blur", listener));
    }

    // Animation frame loop
    {
        let window = window.clone();
        let token = token.clone();
        let raf_id = raf_id.clone();
        let next_callback = frame_callback.clone();
        *frame_callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if token.is_cancelled() {
                return;
            }
            driver.borrow_mut().frame(time, &mut *surface.borrow_mut());

            if token.is_cancelled() {
                return;
            }
            if let Some(callback) = next_callback.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => raf_id.set(Some(id)),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }));
    }

    if let Some(callback) = frame_callback.borrow().as_ref() {
        raf_id.set(Some(
            window.request_animation_frame(callback.as_ref().unchecked_ref())?,
        ));
    }

    log::info!("{} mounted on #{}", name, canvas_id);
    Ok(GameHandle {
        mounted: Some(Mounted {
            window,
            token,
            raf_id,
            frame_callback,
            listeners,
        }),
    })
}

fn seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Mount Breakout on the canvas with the given id
#[wasm_bindgen]
pub fn mount_breakout(canvas_id: &str) -> Result<GameHandle, JsValue> {
    let settings = ArcadeSettings::load();
    let game = BreakoutGame::new(settings.breakout.clone(), seed());
    mount(canvas_id, game, &settings)
}

/// Mount Blitzball on the canvas with the given id
#[wasm_bindgen]
pub fn mount_blitzball(canvas_id: &str) -> Result<GameHandle, JsValue> {
    let settings = ArcadeSettings::load();
    let game = BlitzballGame::new(settings.blitzball.clone(), seed());
    mount(canvas_id, game, &settings)
}

/// Validate and store settings for the next mount
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let settings = ArcadeSettings::from_json(json).map_err(|e| js_error(&e.to_string()))?;
    settings.save();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger init failed: {}", e)));
    }
    log::info!("Mini Arcade ready");
}
