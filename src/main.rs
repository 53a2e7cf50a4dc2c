//! Lobshot entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{EventTarget, HtmlCanvasElement, KeyboardEvent, PointerEvent, TouchEvent};

    use lobshot::audio::{AudioService, SoundEffect};
    use lobshot::consts::*;
    use lobshot::levels::LevelRepository;
    use lobshot::persistence::{self, LocalStorageStore};
    use lobshot::platform::{Command, Drag, command_for_key, to_canvas};
    use lobshot::renderer::{self, RenderState, SceneOptions};
    use lobshot::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use lobshot::{Error, Result, Settings};

    const LEVELS_URL: &str = "levels.json";

    thread_local! {
        static RUNNING: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// An attached DOM listener; detaches on drop
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(JsValue)>,
    }

    impl Listener {
        fn attach(target: &EventTarget, kind: &'static str, closure: Closure<dyn FnMut(JsValue)>) -> Self {
            let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            Self {
                target: target.clone(),
                kind,
                closure,
            }
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioService,
        settings: Settings,
        store: LocalStorageStore,
        canvas: HtmlCanvasElement,
        drag: Drag,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        listeners: Vec<Listener>,
        running: bool,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input = TickInput::default();
            }

            self.handle_events();
        }

        /// Sounds and persistence for whatever happened this frame
        fn handle_events(&mut self) {
            let mut new_high = None;
            for event in self.state.take_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    // One high score chime per frame at most
                    if effect != SoundEffect::HighScore || new_high.is_none() {
                        self.audio.play(effect);
                    }
                }
                if let GameEvent::NewHighScore(high) = event {
                    new_high = Some(high);
                }
            }
            if let Some(high) = new_high {
                persistence::save_high_score(&self.store, high);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let options = SceneOptions {
                particles: self.settings.particles,
            };
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = renderer::build(&self.state, options);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn pointer_to_canvas(&self, client_x: f64, client_y: f64) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            to_canvas(
                Vec2::new(client_x as f32, client_y as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
                Vec2::new(rect.width() as f32, rect.height() as f32),
                Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            )
        }

        fn press(&mut self, point: Vec2) {
            self.audio.resume();
            let aim = self.drag.press(LAUNCH_ORIGIN, point);
            self.state.set_aim(aim, js_sys::Date::now());
        }

        fn drag_to(&mut self, point: Vec2) {
            if let Some(aim) = self.drag.movement(LAUNCH_ORIGIN, point) {
                self.state.set_aim(aim, js_sys::Date::now());
            }
        }

        fn release(&mut self) {
            if self.drag.release() {
                self.input.launch = true;
            }
        }

        fn apply_command(&mut self, cmd: Command) {
            self.audio.resume();
            if let Some(aim) = cmd.apply_to(self.state.aim) {
                self.state.set_aim(aim, js_sys::Date::now());
                return;
            }
            match cmd {
                Command::Launch => self.input.launch = true,
                Command::TogglePause => self.input.pause = true,
                Command::Reset => self.input.reset = true,
                Command::ToggleSound => {
                    self.settings.sound_enabled = !self.settings.sound_enabled;
                    self.audio.set_muted(!self.settings.sound_enabled);
                    self.settings.save();
                    log::info!("Sound {}", if self.settings.sound_enabled { "on" } else { "off" });
                }
                _ => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            let state = &self.state;
            set("#hud-score .hud-value", &state.score.current.to_string());
            set("#hud-high .hud-value", &state.score.high.to_string());
            set("#hud-level .hud-value", &state.round.level.to_string());
            set("#hud-tries .hud-value", &state.round.tries_left.to_string());
            set("#hud-angle .hud-value", &format!("{:.0}°", state.aim.angle_degrees()));
            set("#hud-power .hud-value", &format!("{:.0}", state.aim.power()));

            let status = match &state.phase {
                GamePhase::Playing => state.level_name.clone(),
                GamePhase::Paused => "Paused".to_string(),
                GamePhase::LevelComplete { .. } => "Level complete!".to_string(),
                GamePhase::OutOfTries { .. } => "Out of tries, retrying...".to_string(),
                GamePhase::GameWon { .. } => format!("You win! Final score {}", state.score.current),
                GamePhase::LevelError { .. } => "Error loading level".to_string(),
            };
            set("#hud-status", &status);
        }

        /// Remove listeners and stop the frame loop
        fn shutdown(&mut self) {
            self.running = false;
            self.listeners.clear();
            log::info!("Lobshot stopped");
        }
    }

    async fn fetch_text(url: &str) -> Result<String> {
        let unavailable = |what: &str, e: JsValue| Error::LevelDataUnavailable(format!("{what}: {e:?}"));
        let window = web_sys::window().ok_or_else(|| Error::LevelDataUnavailable("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| unavailable("fetch", e))?;
        let response: web_sys::Response = response.dyn_into().map_err(|e| unavailable("response", e))?;
        if !response.ok() {
            return Err(Error::LevelDataUnavailable(format!("HTTP {}", response.status())));
        }
        let text = response.text().map_err(|e| unavailable("body", e))?;
        let text = JsFuture::from(text).await.map_err(|e| unavailable("body", e))?;
        text.as_string()
            .ok_or_else(|| Error::LevelDataUnavailable("body is not text".into()))
    }

    async fn init_renderer(canvas: &HtmlCanvasElement) -> Result<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| Error::RendererUnavailable(format!("surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::RendererUnavailable(format!("adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, canvas.width(), canvas.height()).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Lobshot starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document; cannot start");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element; cannot start");
            return;
        };
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let levels = LevelRepository::load_or_fallback(fetch_text(LEVELS_URL).await);
        let store = LocalStorageStore;
        let high_score = persistence::load_high_score(&store);
        let settings = Settings::load();

        let mut audio = AudioService::detect();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(!settings.sound_enabled);

        let mut state = GameState::new(levels, high_score);
        state.set_show_preview(settings.trajectory_preview);

        let render_state = match init_renderer(&canvas).await {
            Ok(rs) => Some(rs),
            Err(e) => {
                log::error!("{e}; running without drawing");
                None
            }
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game {
            state,
            render_state,
            audio,
            settings,
            store,
            canvas: canvas.clone(),
            drag: Drag::default(),
            accumulator: 0.0,
            last_time: 0.0,
            input: TickInput::default(),
            listeners: Vec::new(),
            running: true,
        }));

        let listeners = setup_input_handlers(&canvas, &game);
        game.borrow_mut().listeners = listeners;
        RUNNING.with(|r| *r.borrow_mut() = Some(game.clone()));

        // Start game loop
        request_animation_frame(game);

        log::info!("Lobshot running!");
    }

    /// Stop the running game, if any
    pub fn teardown() {
        if let Some(game) = RUNNING.with(|r| r.borrow_mut().take()) {
            game.borrow_mut().shutdown();
        }
    }

    fn listener<E: JsCast>(
        target: &EventTarget,
        kind: &'static str,
        game: &Rc<RefCell<Game>>,
        mut handler: impl FnMut(&mut Game, E) + 'static,
    ) -> Listener {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            if let Ok(event) = event.dyn_into::<E>() {
                handler(&mut game.borrow_mut(), event);
            }
        });
        Listener::attach(target, kind, closure)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: &Rc<RefCell<Game>>) -> Vec<Listener> {
        let mut listeners = Vec::new();
        let target: &EventTarget = canvas.as_ref();

        listeners.push(listener(target, "pointerdown", game, |g, event: PointerEvent| {
            let point = g.pointer_to_canvas(event.client_x() as f64, event.client_y() as f64);
            g.press(point);
        }));
        listeners.push(listener(target, "pointermove", game, |g, event: PointerEvent| {
            let point = g.pointer_to_canvas(event.client_x() as f64, event.client_y() as f64);
            g.drag_to(point);
        }));
        listeners.push(listener(target, "pointerup", game, |g, _event: PointerEvent| {
            g.release();
        }));

        // Touch start/move/end
        listeners.push(listener(target, "touchstart", game, |g, event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().get(0) {
                let point = g.pointer_to_canvas(touch.client_x() as f64, touch.client_y() as f64);
                g.press(point);
            }
        }));
        listeners.push(listener(target, "touchmove", game, |g, event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().get(0) {
                let point = g.pointer_to_canvas(touch.client_x() as f64, touch.client_y() as f64);
                g.drag_to(point);
            }
        }));
        listeners.push(listener(target, "touchend", game, |g, event: TouchEvent| {
            event.prevent_default();
            g.release();
        }));

        // Keyboard
        if let Some(window) = web_sys::window() {
            listeners.push(listener(window.as_ref(), "keydown", game, |g, event: KeyboardEvent| {
                if let Some(cmd) = command_for_key(&event.key()) {
                    event.prevent_default();
                    g.apply_command(cmd);
                }
            }));
        }

        listeners
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if !g.running {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Detach input listeners and stop the frame loop
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn teardown() {
    wasm_game::teardown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lobshot (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    let levels = lobshot::levels::LevelRepository::fallback();
    let state = lobshot::sim::GameState::new(levels, 0);
    log::info!(
        "Level {} \"{}\" with {} tries",
        state.round.level,
        state.level_name,
        state.round.tries_left
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
