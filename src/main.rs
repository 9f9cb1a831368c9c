//! Asteroid Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent};

    use asteroid_arena::consts::SIM_DT;
    use asteroid_arena::renderer::{RenderState, viewport_to_arena};
    use asteroid_arena::{FrameDriver, Settings, Tuning};

    /// Mouse buttons that fire (primary | secondary)
    const FIRE_BUTTONS: u16 = 0b11;

    /// Game instance holding all state
    struct Game {
        driver: FrameDriver,
        settings: Settings,
        render_state: Option<RenderState>,
        last_time: f64,
        /// Canvas size in CSS pixels (pointer coordinates)
        client_size: (f32, f32),
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Whether the game-over panel is currently shown
        showing_game_over: bool,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
            Self {
                driver: FrameDriver::new(seed, tuning),
                settings,
                render_state: None,
                last_time: 0.0,
                client_size: (1.0, 1.0),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                showing_game_over: false,
            }
        }

        fn arena_size(&self) -> (f32, f32) {
            let t = self.driver.tuning();
            (t.arena_width, t.arena_height)
        }

        /// Convert a pointer position on the canvas to an arena aim point
        fn set_aim(&mut self, x: f32, y: f32) {
            let (ax, ay) = viewport_to_arena(x, y, self.arena_size(), self.client_size);
            self.driver.input.aim = glam::Vec2::new(ax, ay);
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.driver.advance(dt);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let snapshot = self.driver.snapshot();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&snapshot, &self.settings) {
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
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let arena = &self.driver.arena;

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&arena.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                el.set_text_content(Some(&arena.lives.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                let best = self.driver.high_scores.top_score().unwrap_or(0);
                el.set_text_content(Some(&best.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }

            // Only touch the game-over panel on transitions
            let game_over = self.driver.is_game_over();
            if game_over == self.showing_game_over {
                return;
            }
            self.showing_game_over = game_over;

            if let Some(el) = document.get_element_by_id("game-over") {
                if game_over {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&arena.score.to_string()));
                    }
                    if let Some(rank_el) = document.get_element_by_id("final-rank") {
                        let text = match self.driver.last_rank() {
                            Some(rank) => format!("Rank #{}", rank),
                            None => String::new(),
                        };
                        rank_el.set_text_content(Some(&text));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Start a fresh arena (only from the game-over screen)
        fn restart(&mut self) {
            if self.driver.is_game_over() {
                let seed = js_sys::Date::now() as u64;
                self.driver.restart(seed);
            }
        }

        /// Drop every held input (focus lost, keys may never see keyup)
        fn release_input(&mut self) {
            let aim = self.driver.input.aim;
            self.driver.input = Default::default();
            self.driver.input.aim = aim;
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Asteroid Arena starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Optional configuration carried on the canvas element
        let settings = canvas
            .get_attribute("data-settings")
            .map(|json| Settings::from_json_or_default(&json))
            .unwrap_or_default();
        let tuning = match canvas.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::error!("Bad tuning, using defaults: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, settings)));
        game.borrow_mut().client_size = (client_w as f32, client_h as f32);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let arena_size = game.borrow().arena_size();
        let mut render_state = RenderState::new(surface, &adapter, width, height, arena_size).await;
        render_state.set_clear_color(game.borrow().settings.palette().background);
        game.borrow_mut().render_state = Some(render_state);

        load_background(&canvas, game.clone());

        // Set up input handlers
        setup_input_handlers(&canvas, game.clone());

        // Set up restart button
        setup_restart_button(game.clone());

        // Release held keys when focus goes away
        setup_focus_release(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Asteroid Arena running!");
    }

    /// Show the configured background image behind a transparent clear.
    /// Any failure leaves the flat fill in place.
    fn load_background(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(url) = game.borrow().settings.background_url.clone() else {
            return;
        };
        let Ok(img) = HtmlImageElement::new() else {
            log::warn!("Cannot create image element, keeping flat background");
            return;
        };

        {
            let game = game.clone();
            let canvas = canvas.clone();
            let url = url.clone();
            let onload = Closure::<dyn FnMut()>::new(move || {
                let style = canvas.style();
                let _ = style.set_property("background-image", &format!("url(\"{}\")", url));
                let _ = style.set_property("background-size", "100% 100%");
                if let Some(ref mut rs) = game.borrow_mut().render_state {
                    rs.set_clear_color([0.0; 4]);
                }
                log::info!("Background loaded: {}", url);
            });
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
        }
        {
            let url = url.clone();
            let onerror = Closure::<dyn FnMut()>::new(move || {
                log::warn!("Background {} failed to load, using flat fill", url);
            });
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }
        img.set_src(&url);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - absolute position becomes the aim point
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.client_size = (
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                g.set_aim(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse buttons - fire while either button is held
        for kind in ["mousedown", "mouseup"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().driver.input.fire = event.buttons() & FIRE_BUTTONS != 0;
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Right button fires, so keep the context menu away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - movement is held, the rest are one-shots
        let window = web_sys::window().unwrap();
        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.driver.input.movement.up = pressed,
                    "ArrowDown" | "s" | "S" => g.driver.input.movement.down = pressed,
                    "ArrowLeft" | "a" | "A" => g.driver.input.movement.left = pressed,
                    "ArrowRight" | "d" | "D" => g.driver.input.movement.right = pressed,
                    "r" | "R" if pressed => g.restart(),
                    "i" | "I" if pressed => {
                        g.driver.toggle_autopilot();
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_release(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            game.borrow_mut().release_input();
            log::info!("Input released (window blur)");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Asteroid Arena (native) starting...");
    log::info!("Native mode runs headless autopilot sessions - run with `trunk serve` to play");

    // asteroid-arena [seed] [sessions] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let sessions: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    let tuning = args.next().map(|path| load_tuning(&path)).unwrap_or_default();

    native::run_demo(seed, sessions.max(1), tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> asteroid_arena::Tuning {
    use asteroid_arena::Tuning;

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Cannot read tuning {}: {}; using defaults", path, e);
            return Tuning::default();
        }
    };
    Tuning::from_json(&json).unwrap_or_else(|e| {
        log::error!("Bad tuning in {}: {}; using defaults", path, e);
        Tuning::default()
    })
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use asteroid_arena::consts::SIM_DT;
    use asteroid_arena::{FrameDriver, Tuning};

    /// Ten minutes of play; an unkillable autopilot gets cut off here
    const MAX_SESSION_TICKS: u64 = 60 * 60 * 10;

    /// Play `sessions` autopilot games back to back and print the board
    pub fn run_demo(seed: u64, sessions: u32, tuning: Tuning) {
        let mut driver = FrameDriver::new(seed, tuning);
        driver.autopilot = true;

        loop {
            driver.advance(SIM_DT);

            let timed_out = driver.arena.time_ticks >= MAX_SESSION_TICKS;
            if !driver.is_game_over() && !timed_out {
                continue;
            }
            // Cut-off runs go on the board too
            driver.record_result();

            let arena = &driver.arena;
            println!(
                "session {}: score {} in {} ticks{}",
                driver.sessions(),
                arena.score,
                arena.time_ticks,
                if timed_out { " (time limit)" } else { "" }
            );

            if driver.sessions() >= sessions {
                break;
            }
            driver.restart(seed.wrapping_add(u64::from(driver.sessions())));
        }

        match serde_json::to_string_pretty(&driver.high_scores) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Cannot serialize high scores: {}", e),
        }
    }
}
