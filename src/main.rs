//! Survivor Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent};

    use survivor_arena::platform::{KeyCommand, Scheduler, key_command};
    use survivor_arena::renderer::{
        HudText, OVERLAY_IDS, RenderState, build_scene, option_glyph, overlay_for,
    };
    use survivor_arena::sim::{Bounds, Direction, GamePhase, GameState, InputState, TickInput, tick};
    use survivor_arena::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        tuning: Tuning,
        settings: Settings,
        render_state: Option<RenderState>,
        input: InputState,
        /// One-shot commands and the autopilot flag; directions are filled per frame
        commands: TickInput,
        // FPS tracking
        frame_times: [f32; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, bounds: Bounds, tuning: Tuning, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, bounds, tuning.clone()),
                tuning,
                settings,
                render_state: None,
                input: InputState::new(),
                commands: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Ready,
            }
        }

        /// Run one simulation step
        fn update(&mut self, dt: f32) {
            let mut input = self.commands.clone();
            input.directions = self.input.snapshot();
            tick(&mut self.state, &input, dt);

            // Clear one-shot inputs after processing
            self.commands.start = false;
            self.commands.pause = false;
            self.commands.choose = None;

            // Track frame times for FPS
            self.frame_times[self.frame_index] = dt;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();
            let total: f32 = self.frame_times.iter().sum();
            if total > 0.0 {
                self.fps = (self.frame_times.len() as f32 * 1000.0 / total).round() as u32;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state, &self.settings);
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
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let hud = HudText::from_state(&self.state);
            set_text(document, "hud-level", &hud.level);
            set_text(document, "hud-score", &hud.score);
            set_text(document, "hud-time", &hud.time);
            set_text(document, "hud-health", &hud.health);
            if self.settings.show_fps {
                set_text(document, "hud-fps", &self.fps.to_string());
            }

            let phase = self.state.phase;
            let overlay = overlay_for(phase);
            for id in OVERLAY_IDS {
                show(document, id, overlay == Some(id));
            }

            if phase != self.last_phase {
                match phase {
                    GamePhase::LevelingUp => self.fill_level_up_options(document),
                    GamePhase::GameOver => {
                        set_text(document, "final-score", &hud.score);
                        set_text(document, "final-level", &hud.level);
                        set_text(document, "final-time", &hud.time);
                    }
                    _ => {}
                }
                self.last_phase = phase;
            }
        }

        /// One button per offered option; clicks are handled by a delegated listener
        fn fill_level_up_options(&self, document: &Document) {
            let Some(container) = document.get_element_by_id("level-up-options") else {
                return;
            };
            container.set_inner_html("");
            for (index, option) in self.state.level_up_options.iter().enumerate() {
                let Ok(button) = document.create_element("button") else {
                    continue;
                };
                let _ = button.set_attribute("class", "level-up-option");
                let _ = button.set_attribute("data-index", &index.to_string());
                let _ = button.set_attribute("data-option", &option.id());
                button.set_text_content(Some(&format!(
                    "{} {} - {}",
                    option_glyph(option.icon),
                    option.name,
                    option.description
                )));
                let _ = container.append_child(&button);
            }
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed, self.state.bounds, self.tuning.clone());
            self.commands = TickInput {
                autopilot: self.commands.autopilot,
                start: true,
                ..Default::default()
            };
            self.input.clear();
            self.last_phase = GamePhase::Ready;
        }

        fn handle_command(&mut self, command: KeyCommand) {
            match command {
                KeyCommand::Start => {
                    if self.state.phase == GamePhase::GameOver {
                        let seed = js_sys::Date::now() as u64;
                        self.restart(seed);
                        log::info!("Game restarted with seed: {}", seed);
                    } else {
                        self.commands.start = true;
                    }
                }
                KeyCommand::Pause => self.commands.pause = true,
                KeyCommand::ToggleAutopilot => {
                    self.commands.autopilot = !self.commands.autopilot;
                    log::info!("Autopilot: {}", self.commands.autopilot);
                }
                KeyCommand::ToggleDebugOverlay => {
                    self.settings.show_debug_overlay = !self.settings.show_debug_overlay;
                    self.settings.save();
                }
                KeyCommand::Choose(index) => self.commands.choose = Some(index),
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Toggle only the `hidden` class; other classes (e.g. `overlay`) stay
    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// CSS size of the canvas, and its backing store size in physical pixels
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (Bounds, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        (Bounds::new(client_w as f32, client_h as f32), width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Survivor Arena starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        show(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (bounds, width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            bounds,
            Tuning::default(),
            settings,
        )));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, window.device_pixel_ratio() as f32)
                .await
                .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        setup_dpad(&window, &document, game.clone());
        setup_level_up_buttons(&document, game.clone());
        setup_restart_button(&document, game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(game.clone());

        show(&document, "hud", true);

        // Start game loop
        let scheduler = Scheduler::new({
            let game = game.clone();
            move |dt| {
                let mut g = game.borrow_mut();
                g.update(dt);
                g.render();
                g.update_hud(&document);
            }
        });
        scheduler.start();
        // The loop runs for the lifetime of the page
        std::mem::forget(scheduler);

        log::info!("Survivor Arena running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: movement first, then commands
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.input.key_down(&key) {
                    event.prevent_default();
                    return;
                }
                if event.repeat() {
                    return;
                }
                if let Some(command) = key_command(&key) {
                    event.prevent_default();
                    g.handle_command(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen D-pad: each button holds its direction while pressed
    fn setup_dpad(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        let touch_device = window.navigator().max_touch_points() > 0;
        let visible = game.borrow().settings.controller.visible(touch_device);
        show(document, "dpad", visible);
        if !visible {
            return;
        }

        let buttons = [
            ("dpad-up", Direction::Up),
            ("dpad-down", Direction::Down),
            ("dpad-left", Direction::Left),
            ("dpad-right", Direction::Right),
        ];
        for (id, dir) in buttons {
            let Some(button) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, pressed) in [
                ("touchstart", true),
                ("touchend", false),
                ("touchcancel", false),
                ("mousedown", true),
                ("mouseup", false),
                ("mouseleave", false),
            ] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    game.borrow_mut().input.set_virtual(dir, pressed);
                });
                let _ = button
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Delegated click handler for the level-up option buttons
    fn setup_level_up_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(container) = document.get_element_by_id("level-up-options") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let index = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("button").ok().flatten())
                .and_then(|button| button.get_attribute("data-index"))
                .and_then(|attr| attr.parse::<usize>().ok());
            if let Some(index) = index {
                game.borrow_mut().commands.choose = Some(index);
            }
        });
        let _ =
            container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Keep the simulation bounds and the surface in step with the viewport
    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (bounds, width, height) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.state.resize(bounds.width, bounds.height);
            if let Some(ref mut render_state) = g.render_state {
                render_state.pixel_ratio = window.device_pixel_ratio() as f32;
                render_state.resize(width, height);
            }
            log::info!("Resized to {}x{}", bounds.width, bounds.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.clear();
                    if g.state.phase == GamePhase::Running {
                        g.commands.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.clear();
                if g.state.phase == GamePhase::Running {
                    g.commands.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(err) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", err);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use survivor_arena::sim::Bounds;
    use survivor_arena::{RunSummary, Tuning, run_autopilot};

    /// Five minutes at the nominal frame rate
    const HEADLESS_FRAMES: u32 = 18_750;

    env_logger::init();
    log::info!("Survivor Arena (native) starting...");
    log::info!("Native mode runs a headless autopilot game - run with `trunk serve` for web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(err) => {
                log::error!("{}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let state = run_autopilot(seed, Bounds::new(800.0, 600.0), tuning, HEADLESS_FRAMES);

    match serde_json::to_string_pretty(&RunSummary::from_state(&state)) {
        Ok(json) => log::info!("Run summary:\n{}", json),
        Err(err) => log::error!("Failed to serialize run summary: {}", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
