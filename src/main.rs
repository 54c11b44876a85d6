//! Chroma Breakout entry point
//!
//! The browser build drives the game from `requestAnimationFrame` and draws on
//! a 2D canvas. The native build is a headless demo played by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement};

    use chroma_breakout::audio::AudioManager;
    use chroma_breakout::consts::*;
    use chroma_breakout::renderer::{CanvasRenderer, build_scene};
    use chroma_breakout::sim::GamePhase;
    use chroma_breakout::{Game, Settings};

    /// Game plus its canvas backend
    struct App {
        game: Game<AudioManager>,
        renderer: CanvasRenderer,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            self.game.frame(time);
            self.renderer.render(&build_scene(self.game.state()));
        }

        /// Pause on focus loss; key-ups are never delivered while unfocused
        fn auto_pause(&mut self, reason: &str) {
            let input = self.game.input_mut();
            input.release_all();
            if self.game.state().phase == GamePhase::Playing {
                self.game.input_mut().request_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Chroma Breakout starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = Rc::new(RefCell::new(Settings::default()));
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, settings, AudioManager::new()),
            renderer: CanvasRenderer::new(ctx),
        }));

        setup_input_handlers(&document, app.clone())?;
        setup_settings_panel(&document, app.clone())?;
        setup_auto_pause(&document, app.clone())?;

        request_animation_frame(app);

        log::info!("Chroma Breakout running!");
        Ok(())
    }

    fn setup_input_handlers(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                if a.game.input_mut().key_down(&event.key(), event.repeat()) {
                    event.prevent_default();
                    // First key press doubles as the user gesture audio needs
                    a.game.sound().resume();
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                app.borrow_mut().game.input_mut().key_up(&event.key());
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Bind the range inputs to the shared settings
    fn setup_settings_panel(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let initial = app.borrow().game.settings().borrow().clone();

        bind_slider(document, "ballSpeed", f64::from(initial.ball_speed), app.clone(), |a, v| {
            a.game.settings().borrow_mut().set_ball_speed(v as f32);
        })?;
        bind_slider(
            document,
            "paddleWidth",
            f64::from(initial.paddle_width),
            app.clone(),
            |a, v| {
                a.game.settings().borrow_mut().set_paddle_width(v as f32);
            },
        )?;
        bind_slider(document, "colorCount", initial.color_count as f64, app, |a, v| {
            a.game.settings().borrow_mut().set_color_count(v as usize);
            a.game.restart();
        })?;

        Ok(())
    }

    /// Wire one `<input type="range">` and its `<id>Value` label. A missing
    /// element just leaves that tunable at its default.
    fn bind_slider(
        document: &Document,
        id: &str,
        initial: f64,
        app: Rc<RefCell<App>>,
        apply: fn(&mut App, f64),
    ) -> Result<(), JsValue> {
        let Some(element) = document.get_element_by_id(id) else {
            log::warn!("No #{} slider, keeping default", id);
            return Ok(());
        };
        let input: HtmlInputElement = element.dyn_into()?;
        input.set_value(&initial.to_string());

        let label = document.get_element_by_id(&format!("{id}Value"));
        if let Some(label) = &label {
            label.set_text_content(Some(&initial.to_string()));
        }

        let slider = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let value = slider.value_as_number();
            if value.is_nan() {
                return;
            }
            apply(&mut app.borrow_mut(), value);
            if let Some(label) = &label {
                label.set_text_content(Some(&value.to_string()));
            }
        });
        input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().auto_pause("tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().auto_pause("window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::rc::Rc;

    use clap::Parser;

    use chroma_breakout::autopilot::Autopilot;
    use chroma_breakout::{Game, Settings, SoundCue};

    /// Display frames per simulated second
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Headless Chroma Breakout, played by a simple autopilot
    #[derive(Parser, Debug)]
    #[command(name = "chroma-breakout", version, about)]
    pub struct Args {
        /// JSON settings file (ball_speed, paddle_width, color_count)
        #[arg(long)]
        pub settings: Option<PathBuf>,
        /// RNG seed for the block grid and item drops
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Maximum number of frames to simulate
        #[arg(long, default_value_t = 3600)]
        pub frames: u64,
        /// Print the final game state as JSON
        #[arg(long)]
        pub json: bool,
    }

    pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let settings = match &args.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        log::info!("Settings: {:?}", settings);

        let settings = Rc::new(RefCell::new(settings));
        let mut game = Game::new(args.seed, settings, Vec::<SoundCue>::new());
        let mut pilot = Autopilot::new();

        let mut elapsed = 0;
        while elapsed < args.frames {
            let (state, input) = game.state_and_input();
            pilot.drive(state, input);
            game.frame(elapsed as f64 * FRAME_MS);
            elapsed += 1;

            for event in &game.state().events {
                log::debug!("frame {}: {:?}", elapsed, event);
            }
            if game.state().phase.is_terminal() {
                break;
            }
        }

        let state = game.state();
        let total = state.blocks.len();
        println!("seed:      {}", args.seed);
        println!("frames:    {}", elapsed);
        println!("phase:     {:?}", state.phase);
        println!(
            "blocks:    {} of {} destroyed",
            total - state.active_block_count(),
            total
        );

        let mut cues: BTreeMap<String, usize> = BTreeMap::new();
        for cue in game.sound() {
            *cues.entry(format!("{cue:?}")).or_default() += 1;
        }
        println!("sounds:    {:?}", cues);

        if args.json {
            println!("{}", serde_json::to_string_pretty(state)?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    log::info!("Chroma Breakout (native) starting...");

    match headless::run(headless::Args::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
