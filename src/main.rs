//! Grid Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell as Flag, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement};

    use grid_snake::audio::AudioManager;
    use grid_snake::highscores::{format_date, rank_label};
    use grid_snake::input::map_key;
    use grid_snake::persistence::{JsonScoreStore, LocalStorage};
    use grid_snake::renderer::{RenderState, build_scene};
    use grid_snake::settings::{Difficulty, GRID_SIZE_CHOICES, KeyboardLayout};
    use grid_snake::{SchedulerState, Session, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        /// Settings live next to the scores but are owned by the front-end
        settings_storage: LocalStorage,
        render_state: Option<RenderState>,
        last_time: f64,
        /// Set by the game-over callback; the leaderboard is redrawn once
        scores_changed: Rc<Flag<bool>>,
    }

    impl Game {
        fn new() -> Self {
            let settings_storage = LocalStorage::new();
            let settings = Settings::load(&settings_storage);

            let store = JsonScoreStore::new(LocalStorage::new());
            let mut session = Session::new(
                Box::new(store),
                Box::new(AudioManager::new(settings.sound_enabled)),
            );
            session.set_difficulty_label(settings.difficulty.as_str());

            let scores_changed = Rc::new(Flag::new(true));
            {
                let scores_changed = scores_changed.clone();
                session.on_game_over(move |summary| {
                    log::info!(
                        "Game over ({}): score {}, level {}, length {}",
                        summary.cause.as_str(),
                        summary.score,
                        summary.level,
                        summary.length
                    );
                    scores_changed.set(true);
                });
            }

            Self {
                session,
                settings,
                settings_storage,
                render_state: None,
                last_time: 0.0,
                scores_changed,
            }
        }

        /// Start a fresh run with the current settings
        fn start(&mut self) {
            if let Err(e) = self.session.start_session(self.settings.game_config()) {
                log::error!("Cannot start session: {}", e);
            }
        }

        /// Store new settings and restart with them
        fn apply_settings(&mut self, settings: Settings) {
            if settings.sound_enabled != self.settings.sound_enabled {
                self.session
                    .set_sound(Box::new(AudioManager::new(settings.sound_enabled)));
            }
            self.session
                .set_difficulty_label(settings.difficulty.as_str());
            settings.save(&mut self.settings_storage);
            self.settings = settings;
            self.start();
        }

        /// Run due ticks for the elapsed frame time
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;
            self.session.advance(dt);
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(state) = self.session.state() else {
                return;
            };
            if let Some(ref mut render_state) = self.render_state {
                render_state.set_grid_size(state.grid.size());
                let vertices = build_scene(state);
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
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(state) = self.session.state() {
                set_text(&document, "#hud-score .hud-value", &state.score().to_string());
                set_text(&document, "#hud-level .hud-value", &state.level().to_string());
            }
            set_text(
                &document,
                "#hud-high-score .hud-value",
                &self.session.high_score().to_string(),
            );

            set_visible(
                &document,
                "pause-overlay",
                self.session.scheduler_state() == SchedulerState::Paused,
            );

            // Show/hide game over
            let ended = self
                .session
                .state()
                .is_some_and(|state| state.run.is_ended());
            match self.session.last_game_over().filter(|_| ended) {
                Some(summary) => {
                    set_visible(&document, "game-over", true);
                    set_text(&document, "#final-score", &summary.score.to_string());
                    set_text(&document, "#final-level", &summary.level.to_string());
                    set_text(&document, "#final-length", &summary.length.to_string());
                    set_text(&document, "#final-cause", summary.cause.as_str());
                    set_visible(&document, "new-record", summary.new_high_score);
                }
                None => set_visible(&document, "game-over", false),
            }

            if self.scores_changed.replace(false) {
                self.render_leaderboard(&document);
            }
        }

        fn render_leaderboard(&self, document: &Document) {
            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            let leaderboard = self.session.leaderboard();
            if leaderboard.is_empty() {
                list.set_inner_html("<li class=\"empty\">No scores yet</li>");
                return;
            }
            let rows: String = leaderboard
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    format!(
                        "<li><span class=\"rank\">{}</span><span class=\"score\">{}</span>\
                         <span class=\"details\">lvl {} - {} - {}</span>\
                         <span class=\"date\">{}</span></li>",
                        rank_label(i + 1),
                        entry.score,
                        entry.level,
                        entry.length,
                        entry.difficulty,
                        format_date(entry.timestamp)
                    )
                })
                .collect();
            list.set_inner_html(&rows);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    /// Toggle only the `hidden` class, leaving the element's other classes alone
    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Grid Snake starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new()));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let grid_size = game.borrow().settings.grid_size;
        let render_state = RenderState::new(surface, &adapter, width, height, grid_size)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(game.clone());
        setup_restart_button(game.clone());
        setup_settings_form(&document, game.clone());
        setup_clear_scores_button(game.clone());
        setup_pause_controls(game.clone());
        setup_auto_pause(game.clone());

        set_visible(&document, "hud", true);

        game.borrow_mut().start();
        request_animation_frame(game);

        log::info!("Grid Snake running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            // Leave form fields alone
            let in_form = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "SELECT"));
            if in_form {
                return;
            }

            let mut g = game.borrow_mut();
            if let Some(command) = map_key(&event.key(), g.settings.keyboard_layout) {
                event.prevent_default();
                g.session.handle_command(command);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
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
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause/resume buttons, quit to the main menu and start from it
    fn setup_pause_controls(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.toggle_pause();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("quit-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.quit();
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    set_visible(&document, "hud", false);
                    set_visible(&document, "main-menu", true);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    set_visible(&document, "main-menu", false);
                    set_visible(&document, "hud", true);
                }
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_clear_scores_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("clear-scores-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.clear_scores();
                g.scores_changed.set(true);
                log::info!("Scores cleared");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn select(document: &Document, id: &str) -> Option<HtmlSelectElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn checkbox(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Fill the settings form from stored values and apply it on save
    fn setup_settings_form(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let g = game.borrow();
            let s = &g.settings;
            if let Some(el) = select(document, "setting-difficulty") {
                el.set_value(s.difficulty.as_str());
            }
            if let Some(el) = select(document, "setting-grid-size") {
                el.set_value(&s.grid_size.to_string());
            }
            if let Some(el) = select(document, "setting-layout") {
                el.set_value(s.keyboard_layout.as_str());
            }
            if let Some(el) = checkbox(document, "setting-walls") {
                el.set_checked(s.walls_enabled);
            }
            if let Some(el) = checkbox(document, "setting-sound") {
                el.set_checked(s.sound_enabled);
            }
            if let Some(el) = checkbox(document, "setting-obstacles") {
                el.set_checked(s.obstacle_growth);
            }
        }

        let Some(btn) = document.get_element_by_id("save-settings-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let mut settings = game.borrow().settings.clone();

            if let Some(d) = select(&document, "setting-difficulty")
                .and_then(|el| Difficulty::from_str(&el.value()))
            {
                settings.difficulty = d;
            }
            if let Some(size) = select(&document, "setting-grid-size")
                .and_then(|el| el.value().parse::<u32>().ok())
                .filter(|size| GRID_SIZE_CHOICES.contains(size))
            {
                settings.grid_size = size;
            }
            if let Some(layout) = select(&document, "setting-layout")
                .and_then(|el| KeyboardLayout::from_str(&el.value()))
            {
                settings.keyboard_layout = layout;
            }
            if let Some(el) = checkbox(&document, "setting-walls") {
                settings.walls_enabled = el.checked();
            }
            if let Some(el) = checkbox(&document, "setting-sound") {
                settings.sound_enabled = el.checked();
            }
            if let Some(el) = checkbox(&document, "setting-obstacles") {
                settings.obstacle_growth = el.checked();
            }

            log::info!("Applying settings: {:?}", settings);
            game.borrow_mut().apply_settings(settings);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && game.borrow_mut().session.pause()
                {
                    log::info!("Auto-paused (tab hidden)");
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
                if game.borrow_mut().session.pause() {
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
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Grid Snake (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run steered by a greedy food-seeking policy
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use grid_snake::Session;
    use grid_snake::audio::Silent;
    use grid_snake::persistence::{JsonScoreStore, MemoryStorage};
    use grid_snake::sim::{Cell, Direction, GameConfig, GameState};

    /// Stop even if the snake never dies
    const MAX_TICKS: u32 = 5_000;

    pub fn run() {
        let mut session = Session::new(
            Box::new(JsonScoreStore::new(MemoryStorage::new())),
            Box::new(Silent),
        );
        session.set_difficulty_label("demo");
        session.on_game_over(|summary| {
            log::info!(
                "Demo over ({}): score {}, level {}, length {}",
                summary.cause.as_str(),
                summary.score,
                summary.level,
                summary.length
            );
        });

        let config = GameConfig::default();
        if let Err(e) = session.start_session(config) {
            log::error!("Cannot start demo: {}", e);
            return;
        }

        for _ in 0..MAX_TICKS {
            let Some(state) = session.state() else {
                break;
            };
            if state.run.is_ended() {
                break;
            }
            let dir = choose_direction(state);
            session.on_direction_input(dir);
            // Exactly one interval of "frame time" per step
            session.advance(session.interval_ms() as f64);
        }

        if let Some(state) = session.state() {
            log::info!(
                "Demo finished after {} ticks: score {}, level {}, {} obstacles",
                state.time_ticks,
                state.score(),
                state.level(),
                state.obstacles.len()
            );
        }
        for (i, entry) in session.leaderboard().entries.iter().enumerate() {
            log::info!("#{} {} (level {})", i + 1, entry.score, entry.level);
        }
    }

    /// Safe move that brings the head closest to the food
    fn choose_direction(state: &GameState) -> Direction {
        let head = state.snake.head();
        let current = state.run.direction;

        [Direction::UP, Direction::DOWN, Direction::LEFT, Direction::RIGHT]
            .into_iter()
            .filter(|dir| !dir.is_opposite(current))
            .filter_map(|dir| {
                let next = landing_cell(state, head, dir)?;
                (!state.is_blocked(next)).then(|| (distance(next, state.food), dir))
            })
            .min_by_key(|(d, _)| *d)
            .map(|(_, dir)| dir)
            .unwrap_or(current)
    }

    fn landing_cell(state: &GameState, head: Cell, dir: Direction) -> Option<Cell> {
        let next = head.step(dir);
        if state.grid.in_bounds(next) {
            Some(next)
        } else if state.config.walls_enabled {
            None
        } else {
            Some(state.grid.wrap(next))
        }
    }

    fn distance(a: Cell, b: Cell) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }
}
