//! Brick Breaker entry point
//!
//! On the web: canvas 2D rendering, keyboard input and a requestAnimationFrame
//! loop around a `Session`. On native: a headless autopilot run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PageTransitionEvent,
    };

    use brick_breaker::consts::SIM_DT;
    use brick_breaker::platform::{BrowserStore, key_from_name};
    use brick_breaker::sim::{RoundPhase, Snapshot};
    use brick_breaker::{GameConfig, LocalLeaderboard, Session};

    type BrowserSession = Session<LocalLeaderboard<BrowserStore>>;

    /// Game instance holding the session and canvas
    struct Game {
        session: BrowserSession,
        config: GameConfig,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
        /// Bumped whenever a new animation loop starts; older loops exit
        loop_id: u32,
    }

    fn new_session(config: GameConfig) -> Result<BrowserSession, JsValue> {
        let store = BrowserStore::local().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let leaderboard = LocalLeaderboard::open(store);
        Session::new(config, leaderboard).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    impl Game {
        /// Run simulation ticks for the elapsed frame time
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.session.frame(dt);
        }

        /// Render the current frame
        fn render(&self) {
            draw(&self.ctx, &self.session.snapshot());
        }
    }

    /// Draw a snapshot; a pure function of the snapshot
    fn draw(ctx: &CanvasRenderingContext2d, snap: &Snapshot) {
        ctx.clear_rect(0.0, 0.0, snap.field.x as f64, snap.field.y as f64);

        ctx.set_fill_style_str("#0095dd");
        for brick in snap.bricks.iter().filter(|b| b.visible) {
            ctx.fill_rect(
                brick.pos.x as f64,
                brick.pos.y as f64,
                brick.size.x as f64,
                brick.size.y as f64,
            );
        }

        if snap.paddle.visible {
            ctx.fill_rect(
                snap.paddle.pos.x as f64,
                snap.paddle.pos.y as f64,
                snap.paddle.width as f64,
                snap.paddle.height as f64,
            );
        }

        if snap.ball.visible {
            ctx.begin_path();
            let _ = ctx.arc(
                snap.ball.pos.x as f64,
                snap.ball.pos.y as f64,
                snap.ball.radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }

        ctx.set_font("20px Arial");
        let _ = ctx.fill_text(&format!("Score: {}", snap.score), 30.0, 30.0);
        let best = if snap.best_name.is_empty() {
            format!("Best: {}", snap.best_score)
        } else {
            format!("Best: {} ({})", snap.best_score, snap.best_name)
        };
        let _ = ctx.fill_text(&best, snap.field.x as f64 - 220.0, 30.0);

        if snap.phase == RoundPhase::Waiting {
            let _ = ctx.fill_text(
                "Press Space to start",
                snap.field.x as f64 / 2.0 - 95.0,
                snap.field.y as f64 / 2.0,
            );
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Brick Breaker starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = GameConfig::load();
        canvas.set_width(config.field_width as u32);
        canvas.set_height(config.field_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let session = new_session(config.clone())?;

        let game = Rc::new(RefCell::new(Game {
            session,
            config,
            ctx,
            last_time: 0.0,
            loop_id: 0,
        }));

        prompt_for_name(&window, &game);
        setup_input_handlers(&window, game.clone());
        setup_teardown(&window, game.clone());
        setup_restore(&window, game.clone());

        request_animation_frame(game, 0);

        log::info!("Brick Breaker running!");
        Ok(())
    }

    /// Name-entry overlay: gameplay input is suppressed while it is open
    fn prompt_for_name(window: &web_sys::Window, game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        if !g.session.leaderboard().player_name().is_empty() {
            return;
        }

        g.session.set_overlay(true);
        if let Ok(Some(name)) = window.prompt_with_message("Enter your name for the leaderboard")
        {
            if !name.trim().is_empty() {
                if let Err(e) = g.session.with_leaderboard(|board| board.set_player_name(&name)) {
                    log::warn!("Could not save player name: {}", e);
                }
            }
        }
        g.session.set_overlay(false);
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_name(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().session.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_name(&event.key()) {
                    game.borrow_mut().session.key_up(key);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Cancel the pending reset and stop the loop when the page goes away
    fn setup_teardown(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().session.teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// A page restored from the back-forward cache gets a fresh session and loop
    fn setup_restore(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            if !event.persisted() {
                return;
            }

            let loop_id = {
                let mut g = game.borrow_mut();
                if !g.session.is_torn_down() {
                    return;
                }
                match new_session(g.config.clone()) {
                    Ok(session) => g.session = session,
                    Err(e) => {
                        log::error!("Could not restart after page restore: {:?}", e);
                        return;
                    }
                }
                g.last_time = 0.0;
                g.loop_id = g.loop_id.wrapping_add(1);
                g.loop_id
            };

            log::info!("Page restored, game loop restarted");
            request_animation_frame(game.clone(), loop_id);
        });
        let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, loop_id: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, loop_id, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, loop_id: u32, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.loop_id != loop_id {
                return;
            }
            if g.session.is_torn_down() {
                log::info!("Game loop stopped");
                return;
            }
            g.update(time);
            g.render();
        }

        request_animation_frame(game, loop_id);
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
mod native {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;

    use brick_breaker::platform::FileStore;
    use brick_breaker::sim::{Direction, GameEvent, Key, RoundOutcome, RoundPhase, Snapshot};
    use brick_breaker::{GameConfig, LocalLeaderboard, Session};

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Headless Brick Breaker autopilot run", long_about = None)]
    pub struct Args {
        /// Number of simulation ticks to run
        #[arg(long, default_value_t = 20_000)]
        ticks: u64,
        /// JSON config overrides
        #[arg(long)]
        config: Option<PathBuf>,
        /// Leaderboard file
        #[arg(long, default_value = "brick_breaker_scores.json")]
        scores: PathBuf,
        /// Player name to record scores under (defaults to the stored one)
        #[arg(long)]
        player: Option<String>,
    }

    /// Which way to steer so the paddle sits under the ball
    fn autopilot(snap: &Snapshot) -> Option<Direction> {
        let offset = snap.ball.pos.x - (snap.paddle.pos.x + snap.paddle.width / 2.0);
        let dead_zone = snap.paddle.width / 4.0;
        if offset > dead_zone {
            Some(Direction::Right)
        } else if offset < -dead_zone {
            Some(Direction::Left)
        } else {
            None
        }
    }

    pub fn run(args: Args) -> anyhow::Result<()> {
        let config = match &args.config {
            Some(path) => GameConfig::load_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => GameConfig::default(),
        };

        let mut leaderboard = LocalLeaderboard::open(FileStore::new(&args.scores));
        if let Some(name) = &args.player {
            leaderboard
                .set_player_name(name)
                .context("saving player name")?;
        }
        if leaderboard.player_name().is_empty() {
            log::warn!("No player name set; scores will not be recorded (use --player)");
        }

        let mut session = Session::new(config, leaderboard).context("invalid config")?;
        let mut steering: Option<Direction> = None;
        let (mut cleared, mut missed) = (0u32, 0u32);

        for _ in 0..args.ticks {
            let snap = session.snapshot();
            if snap.phase == RoundPhase::Waiting {
                session.key_down(Key::Start);
            }

            let wanted = autopilot(&snap);
            if wanted != steering {
                if let Some(old) = steering {
                    session.key_up(Key::Move(old));
                }
                if let Some(new) = wanted {
                    session.key_down(Key::Move(new));
                }
                steering = wanted;
            }

            for event in session.step() {
                match event {
                    GameEvent::RoundEnded { outcome, score } => {
                        log::info!("Round over: {:?}, score {}", outcome, score);
                        match outcome {
                            RoundOutcome::Cleared => cleared += 1,
                            RoundOutcome::Missed => missed += 1,
                        }
                    }
                    GameEvent::BrickDestroyed { column, row } => {
                        log::debug!("Brick ({}, {}) destroyed", column, row);
                    }
                    _ => {}
                }
            }
        }
        session.teardown();

        println!(
            "{} ticks: {} rounds cleared, {} missed, current score {}",
            args.ticks,
            cleared,
            missed,
            session.snapshot().score
        );
        println!("High scores ({}):", args.scores.display());
        let board = session.leaderboard();
        if board.scores().is_empty() {
            println!("  No scores yet!");
        }
        for (rank, entry) in board.scores().entries().iter().enumerate() {
            println!("  {:>2}. {:<16} {}", rank + 1, entry.name, entry.score);
        }
        if let Some(rank) = board.scores().rank_of(board.player_name()) {
            println!("{} is ranked #{}", board.player_name(), rank);
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Brick Breaker (native) starting...");
    native::run(native::Args::parse())
}
