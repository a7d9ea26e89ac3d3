//! Pussel Magi entry point
//!
//! Web: wires DOM input to the game core and renders its snapshots.
//! Native: plays a few levels headless and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent, PointerEvent};

    use pussel_magi::audio::{AudioManager, SoundEffect};
    use pussel_magi::board::{BoardRect, PuzzleInstance};
    use pussel_magi::consts::TICK_INTERVAL_MS;
    use pussel_magi::persistence::LocalStore;
    use pussel_magi::platform::{Interval, clock_seed};
    use pussel_magi::praise::{self, PraiseConfig};
    use pussel_magi::{ChallengeOutcome, Game, GameEvent, LEVELS, Screen, Theme};

    /// Everything the page keeps alive
    struct App {
        game: Game<LocalStore>,
        audio: AudioManager,
        /// Tick source of the running puzzle, tagged with its session
        clock: Option<(u64, Interval)>,
        praise_config: PraiseConfig,
        /// Session whose piece elements are on the board
        rendered_session: Option<u64>,
    }

    type Shared = Rc<RefCell<App>>;

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn by_id(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn board_rect() -> Option<BoardRect> {
        let rect = by_id("board")?.get_bounding_client_rect();
        Some(BoardRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn client_pos(event: &MouseEvent) -> Vec2 {
        Vec2::new(event.client_x() as f32, event.client_y() as f32)
    }

    fn event_element(event: &web_sys::Event) -> Option<Element> {
        event.target()?.dyn_into::<Element>().ok()
    }

    fn closest(el: &Element, selector: &str) -> Option<Element> {
        el.closest(selector).ok().flatten()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Pussel Magi starting...");

        let seed = clock_seed();
        let game = Game::new(LocalStore::open(), seed);
        let mut audio = AudioManager::new();
        audio.set_volume(game.settings().effective_volume());

        let app = Rc::new(RefCell::new(App {
            game,
            audio,
            clock: None,
            praise_config: PraiseConfig::default(),
            rendered_session: None,
        }));

        if app.borrow().praise_config.api_key.is_none() {
            log::info!("No praise API key configured, canned praise only");
        }

        setup_click_handler(app.clone());
        setup_challenge_input(app.clone());
        setup_board_pointer(app.clone());
        setup_image_ready(app.clone());

        render(&app);
        log::info!("Pussel Magi running with seed {seed}");
    }

    // === Event plumbing ===

    /// Play cues, dispatch async work and redraw after any state change
    fn after_update(app: &Shared) {
        let (events, praise_request) = {
            let mut a = app.borrow_mut();
            let events = a.game.drain_events();
            let request = a.game.take_praise_request();

            // Stop the clock once its puzzle is solved or replaced
            let stale = a
                .clock
                .as_ref()
                .is_some_and(|(session, _)| !a.game.clock_running(*session));
            if stale {
                a.clock = None;
            }

            let volume = a.game.settings().effective_volume();
            a.audio.set_volume(volume);
            (events, request)
        };

        for event in &events {
            handle_event(app, event);
        }

        if let Some(request) = praise_request {
            let app = app.clone();
            let config = app.borrow().praise_config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = praise::fetch_praise(&config, &request).await;
                app.borrow_mut().game.deliver_praise(request.session, outcome);
                after_update(&app);
            });
        }

        render(app);
    }

    fn handle_event(app: &Shared, event: &GameEvent) {
        match event {
            GameEvent::PieceSnapped { .. } => {
                let haptics = app.borrow().game.settings().haptics;
                if haptics {
                    if let Some(window) = web_sys::window() {
                        let _ = window.navigator().vibrate_with_duration(50);
                    }
                }
            }
            // The unlock fanfare waits for the win jingle
            GameEvent::LevelUnlocked { .. } => {
                let app = app.clone();
                let delayed = Closure::once_into_js(move || {
                    app.borrow_mut().audio.play(SoundEffect::Unlock);
                });
                if let Some(window) = web_sys::window() {
                    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                        delayed.unchecked_ref(),
                        1000,
                    );
                }
                return;
            }
            GameEvent::LevelStarted { .. } => {
                app.borrow_mut().clock = None;
            }
            _ => {}
        }

        if let Some(effect) = SoundEffect::for_event(event) {
            app.borrow_mut().audio.play(effect);
        }
    }

    fn setup_click_handler(app: Shared) {
        let Some(document) = document() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event_element(&event) else { return };
            on_click(&app, &target);
        });
        let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(app: &Shared, target: &Element) {
        if let Some(el) = closest(target, "[data-level]") {
            let Some(index) = el
                .get_attribute("data-level")
                .and_then(|v| v.parse::<usize>().ok())
            else {
                return;
            };
            {
                let mut a = app.borrow_mut();
                let theme = a.game.theme();
                if let Err(err) = a.game.select_level(theme, index) {
                    log::warn!("Ignoring level button: {err}");
                }
            }
            if let Some(input) = by_id("challenge-answer").and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) {
                input.set_value("");
                let _ = input.focus();
            }
            after_update(app);
            return;
        }

        if let Some(el) = closest(target, "[data-theme]") {
            if let Some(theme) = el.get_attribute("data-theme").and_then(|v| Theme::from_str(&v)) {
                app.borrow_mut().game.choose_theme(theme);
                after_update(app);
            }
            return;
        }

        let Some(button) = closest(target, "button[id]") else { return };
        {
            let mut a = app.borrow_mut();
            match button.id().as_str() {
                "play-btn" => a.game.open_theme_select(),
                "menu-btn" => a.game.back_to_menu(),
                "play-again-btn" => {
                    a.game.play_again();
                }
                "hint-btn" => {
                    a.game.toggle_hint();
                }
                "mute-btn" => {
                    a.game.toggle_mute();
                }
                "challenge-cancel" => a.game.cancel_challenge(),
                "challenge-submit" => {
                    drop(a);
                    submit_answer(app);
                    return;
                }
                _ => return,
            }
        }
        after_update(app);
    }

    fn submit_answer(app: &Shared) {
        let Some(input) = by_id("challenge-answer").and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        let outcome = app.borrow_mut().game.submit_challenge(&input.value());
        if outcome == ChallengeOutcome::Wrong {
            input.set_value("");
        }
        after_update(app);
    }

    fn setup_challenge_input(app: Shared) {
        let Some(input) = by_id("challenge-answer") else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                submit_answer(&app);
            }
        });
        let _ = input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_board_pointer(app: Shared) {
        let Some(board) = by_id("board") else { return };

        // Pointer down on a piece
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let Some(target) = event_element(&event) else { return };
                let Some(piece_el) = closest(&target, "[data-piece]") else { return };
                let Some(id) = piece_el
                    .get_attribute("data-piece")
                    .and_then(|v| v.parse::<u32>().ok())
                else {
                    return;
                };

                let started = {
                    let mut a = app.borrow_mut();
                    a.game.set_board_rect(board_rect());
                    a.game.pointer_down(id, client_pos(&event))
                };
                if started {
                    event.prevent_default();
                    let _ = piece_el.set_pointer_capture(event.pointer_id());
                    after_update(&app);
                }
            });
            let _ = board.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let moved = app.borrow_mut().game.pointer_move(client_pos(&event));
                if moved.is_some() {
                    event.prevent_default();
                    render(&app);
                }
            });
            let _ = board.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaving the board releases the piece
        for kind in ["pointerup", "pointerleave"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pointer = client_pos(&event);
                let released = {
                    let mut a = app.borrow_mut();
                    if kind == "pointerleave" {
                        a.game.pointer_leave(pointer)
                    } else {
                        a.game.pointer_up(pointer)
                    }
                };
                if released.is_some() {
                    after_update(&app);
                }
            });
            let _ = board.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Load and error both start the game
    fn setup_image_ready(app: Shared) {
        let Some(image) = by_id("board-image") else { return };
        for kind in ["load", "error"] {
            let app = app.clone();
            let image_el = image.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(session) = image_el
                    .get_attribute("data-session")
                    .and_then(|v| v.parse::<u64>().ok())
                else {
                    return;
                };
                if kind == "error" {
                    log::warn!("Puzzle image failed to load, playing without it");
                }
                let started = app.borrow_mut().game.image_ready(session);
                if started {
                    start_clock(&app, session);
                }
                after_update(&app);
            });
            let _ = image.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start_clock(app: &Shared, session: u64) {
        let tick_app = app.clone();
        let interval = Interval::start(TICK_INTERVAL_MS, move || {
            let ticked = tick_app.borrow_mut().game.tick(session);
            if ticked {
                if let Some(puzzle) = tick_app.borrow().game.puzzle() {
                    set_text("timer", &format!("{}s", puzzle.elapsed_secs));
                }
            }
        });
        // Replacing the old interval clears it
        app.borrow_mut().clock = interval.map(|i| (session, i));
    }

    // === Rendering ===

    fn render(app: &Shared) {
        let mut a = app.borrow_mut();
        let snapshot = a.game.snapshot();

        set_hidden("menu-screen", snapshot.screen != Screen::Menu);
        set_hidden("theme-screen", snapshot.screen != Screen::ThemeSelect);
        set_hidden(
            "game-screen",
            !matches!(snapshot.screen, Screen::Playing | Screen::Won),
        );
        set_hidden("win-screen", snapshot.screen != Screen::Won);
        set_hidden("unlock-banner", !snapshot.just_unlocked);
        set_hidden("hint-image", !snapshot.show_hint);

        set_text("stats-score", &snapshot.stats.total_score.to_string());
        set_text("stats-stars", &snapshot.stats.stars.to_string());
        set_text("mute-btn", if snapshot.settings.muted { "🔇" } else { "🔊" });

        for (index, level) in LEVELS.iter().enumerate() {
            let selector = format!("[data-level=\"{index}\"]");
            if let Some(el) = document().and_then(|d| d.query_selector(&selector).ok().flatten()) {
                let locked = !snapshot.stats.is_unlocked(index);
                let _ = el.class_list().toggle_with_force("locked", locked);
                el.set_text_content(Some(&format!("{} ({})", level.label, level.id)));
            }
        }

        set_hidden("challenge-modal", snapshot.challenge_question.is_none());
        if let Some(question) = &snapshot.challenge_question {
            set_text("challenge-question", &format!("{question} = ?"));
        }

        if let Some(result) = &snapshot.last_result {
            set_text("round-score", &format!("+{}", result.round_score));
            set_text("round-stars", &"⭐".repeat(result.stars as usize));
        }
        let praise_text = match (&snapshot.praise, snapshot.praise_loading) {
            (Some(text), _) => text.as_str(),
            (None, true) => "…",
            (None, false) => "",
        };
        set_text("praise", praise_text);

        if let Some(puzzle) = &snapshot.puzzle {
            set_text("timer", &format!("{}s", puzzle.elapsed_secs));
            if a.rendered_session != Some(puzzle.session) {
                build_board(puzzle);
                a.rendered_session = Some(puzzle.session);
            }
            place_pieces(puzzle, snapshot.dragging);
        } else {
            a.rendered_session = None;
        }
    }

    /// Create one element per piece and point the picture at the session image
    fn build_board(puzzle: &PuzzleInstance) {
        let (Some(document), Some(board)) = (document(), by_id("board")) else {
            return;
        };

        if let Some(image) = by_id("board-image") {
            let _ = image.set_attribute("data-session", &puzzle.session.to_string());
            let _ = image.set_attribute("src", &puzzle.image.url);
        }
        if let Some(hint) = by_id("hint-image") {
            let _ = hint.set_attribute("src", &puzzle.image.url);
        }

        if let Ok(old) = board.query_selector_all("[data-piece]") {
            for i in 0..old.length() {
                if let Some(node) = old.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    node.remove();
                }
            }
        }

        let size = puzzle.grid.piece_size();
        let (rows, cols) = (puzzle.grid.rows, puzzle.grid.cols);
        for piece in &puzzle.pieces {
            let Ok(el) = document.create_element("div") else { continue };
            let Ok(el) = el.dyn_into::<HtmlElement>() else { continue };
            let _ = el.set_attribute("data-piece", &piece.id.to_string());
            el.set_class_name("piece");

            let (row, col) = piece.cell(&puzzle.grid);
            let bg_x = if cols > 1 { col as f32 * 100.0 / (cols - 1) as f32 } else { 0.0 };
            let bg_y = if rows > 1 { row as f32 * 100.0 / (rows - 1) as f32 } else { 0.0 };
            let style = el.style();
            let _ = style.set_property("width", &format!("{}%", size.x));
            let _ = style.set_property("height", &format!("{}%", size.y));
            let _ = style.set_property("background-image", &format!("url({})", puzzle.image.url));
            let _ = style.set_property("background-size", &format!("{}% {}%", cols * 100, rows * 100));
            let _ = style.set_property("background-position", &format!("{bg_x}% {bg_y}%"));
            let _ = board.append_child(&el);
        }
    }

    fn place_pieces(puzzle: &PuzzleInstance, dragging: Option<u32>) {
        let Some(board) = by_id("board") else { return };
        for piece in &puzzle.pieces {
            let Ok(Some(el)) = board.query_selector(&format!("[data-piece=\"{}\"]", piece.id)) else {
                continue;
            };
            let Ok(el) = el.dyn_into::<HtmlElement>() else { continue };
            let style = el.style();
            let _ = style.set_property("left", &format!("{}%", piece.current.x));
            let _ = style.set_property("top", &format!("{}%", piece.current.y));
            let _ = el.class_list().toggle_with_force("placed", piece.is_placed);
            let _ = el
                .class_list()
                .toggle_with_force("dragging", dragging == Some(piece.id));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pussel Magi (native) starting...");
    log::info!("Native mode plays a scripted session - run with `trunk serve` for the web version");

    demo::play_through(3);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use pussel_magi::board::BoardRect;
    use pussel_magi::persistence::MemoryStore;
    use pussel_magi::platform::clock_seed;
    use pussel_magi::praise::PraiseError;
    use pussel_magi::{ChallengeOutcome, Game, LevelSelection, Theme};

    /// Board rendered at 800x800 px: 1 board unit = 8 px
    const BOARD_PX: f32 = 800.0;

    fn to_client(pos: Vec2) -> Vec2 {
        pos * (BOARD_PX / 100.0)
    }

    /// Solve the first `levels` levels (with a jump over the frontier at the
    /// end to exercise the challenge gate)
    pub fn play_through(levels: usize) {
        let mut game = Game::new(MemoryStore::new(), clock_seed());
        game.set_board_rect(Some(BoardRect::new(0.0, 0.0, BOARD_PX, BOARD_PX)));
        let themes = Theme::ALL;

        for index in 0..levels {
            let theme = themes[index % themes.len()];
            if !play_level(&mut game, theme, index) {
                return;
            }
        }

        // Skip ahead: the next-but-one level is locked
        let target = (levels + 1).min(pussel_magi::LEVELS.len() - 1);
        play_level(&mut game, Theme::Fantasy, target);

        let stats = game.stats();
        println!(
            "\nDone: {} puzzles, {} points, {} stars, frontier at level {}",
            stats.completed_puzzles, stats.total_score, stats.stars, stats.highest_unlocked_level_index
        );
    }

    fn play_level(game: &mut Game<MemoryStore>, theme: Theme, index: usize) -> bool {
        let session = match game.select_level(theme, index) {
            Ok(LevelSelection::Started { session }) => session,
            Ok(LevelSelection::ChallengeRequired { question }) => {
                let Some(answer) = game.challenge().map(|c| c.expected_answer()) else {
                    return false;
                };
                println!("Level {index} is locked: {question} = {answer}");
                match game.submit_challenge(&answer.to_string()) {
                    ChallengeOutcome::Passed { session } => session,
                    other => {
                        log::error!("Challenge not passed: {other:?}");
                        return false;
                    }
                }
            }
            Err(err) => {
                log::error!("{err}");
                return false;
            }
        };

        game.image_ready(session);
        let pieces: Vec<_> = game
            .puzzle()
            .map(|p| p.pieces.iter().map(|p| (p.id, p.current, p.correct)).collect())
            .unwrap_or_default();

        for (id, current, correct) in pieces {
            // Two seconds per piece on the clock
            game.tick(session);
            game.tick(session);
            game.pointer_down(id, to_client(current));
            game.pointer_move(to_client((current + correct) / 2.0));
            game.pointer_up(to_client(correct));
        }

        let Some(result) = game.last_result().copied() else {
            log::error!("Level {index} did not finish");
            return false;
        };

        // No HTTP client natively: always the canned praise
        if let Some(request) = game.take_praise_request() {
            let offline = PraiseError::Transport("native demo is offline".into());
            game.deliver_praise(request.session, Err(offline));
        }

        println!(
            "Level {index} ({}): {}s, +{} points, {} stars{} - {}",
            theme.label(),
            result.elapsed_secs,
            result.round_score,
            result.stars,
            if result.unlocked_level.is_some() { ", next level unlocked" } else { "" },
            game.praise().unwrap_or_default()
        );
        for event in game.drain_events() {
            log::debug!("{event:?}");
        }
        true
    }
}
