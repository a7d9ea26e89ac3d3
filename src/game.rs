//! Top-level game state machine
//!
//! Owns the puzzle instance, the player's progression and the pending
//! challenge. Hosts feed discrete input events in, drain [`GameEvent`]s for
//! sound/celebration cues and read [`GameSnapshot`]s to render. Every
//! operation runs to completion before the next one; nothing here blocks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::board::{BoardRect, DragController, GridConfig, PuzzleInstance, SnapOutcome};
use crate::catalog::{self, Theme};
use crate::challenge::Challenge;
use crate::persistence::KeyValueStore;
use crate::praise::{self, PraiseError, PraiseRequest};
use crate::progress::{PlayerStats, RoundResult};
use crate::settings::Settings;

/// Which screen the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    ThemeSelect,
    Playing,
    Won,
}

/// Cues for the presentation layer (sound, haptics, confetti)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted {
        session: u64,
        level_index: usize,
        theme: Theme,
    },
    ChallengeIssued {
        target_level_index: usize,
        question: String,
    },
    ChallengeFailed,
    ChallengePassed {
        level_index: usize,
    },
    DragStarted {
        piece_id: u32,
    },
    PieceSnapped {
        piece_id: u32,
    },
    PuzzleSolved(RoundResult),
    LevelUnlocked {
        level_index: usize,
    },
    PraiseReady {
        session: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("no level with index {0}")]
    UnknownLevel(usize),
}

/// Result of picking a level on the level screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSelection {
    /// The level was unlocked and a puzzle started
    Started { session: u64 },
    /// The level is locked; answer the question to enter
    ChallengeRequired { question: String },
}

/// Result of submitting a challenge answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// There was no challenge to answer
    NoChallenge,
    /// Wrong answer; the same question stays open
    Wrong,
    /// Levels unlocked through the target and the target started
    Passed { session: u64 },
}

/// Read-only view of everything the presentation layer renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub screen: Screen,
    pub theme: Theme,
    pub stats: PlayerStats,
    pub settings: Settings,
    pub puzzle: Option<PuzzleInstance>,
    pub dragging: Option<u32>,
    pub challenge_question: Option<String>,
    pub challenge_target: Option<usize>,
    pub show_hint: bool,
    pub just_unlocked: bool,
    pub last_result: Option<RoundResult>,
    pub praise: Option<String>,
    pub praise_loading: bool,
}

pub struct Game<S: KeyValueStore> {
    store: S,
    rng: Pcg32,
    stats: PlayerStats,
    settings: Settings,
    screen: Screen,
    theme: Theme,
    puzzle: Option<PuzzleInstance>,
    drag: DragController,
    board: Option<BoardRect>,
    challenge: Option<Challenge>,
    show_hint: bool,
    just_unlocked: bool,
    last_result: Option<RoundResult>,
    /// Praise request not yet handed to the host
    praise_request: Option<PraiseRequest>,
    praise: Option<String>,
    next_session: u64,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore> Game<S> {
    /// Load progress and settings from `store`
    pub fn new(store: S, seed: u64) -> Self {
        let stats = PlayerStats::load(&store);
        let settings = Settings::load(&store);
        log::info!(
            "Progress: {} puzzles, {} points, frontier at level {}",
            stats.completed_puzzles,
            stats.total_score,
            stats.highest_unlocked_level_index
        );
        Self {
            store,
            rng: Pcg32::seed_from_u64(seed),
            stats,
            settings,
            screen: Screen::Menu,
            theme: Theme::default(),
            puzzle: None,
            drag: DragController::new(),
            board: None,
            challenge: None,
            show_hint: false,
            just_unlocked: false,
            last_result: None,
            praise_request: None,
            praise: None,
            next_session: 1,
            events: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn puzzle(&self) -> Option<&PuzzleInstance> {
        self.puzzle.as_ref()
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn dragging(&self) -> Option<u32> {
        self.drag.active().map(|d| d.piece_id)
    }

    pub fn praise(&self) -> Option<&str> {
        self.praise.as_deref()
    }

    pub fn just_unlocked(&self) -> bool {
        self.just_unlocked
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn show_hint(&self) -> bool {
        self.show_hint
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take all cues produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            screen: self.screen,
            theme: self.theme,
            stats: self.stats,
            settings: self.settings.clone(),
            puzzle: self.puzzle.clone(),
            dragging: self.dragging(),
            challenge_question: self.challenge.as_ref().map(Challenge::question),
            challenge_target: self.challenge.as_ref().map(|c| c.target_level_index),
            show_hint: self.show_hint,
            just_unlocked: self.just_unlocked,
            last_result: self.last_result,
            praise: self.praise.clone(),
            praise_loading: self.awaiting_praise(),
        }
    }

    // === Navigation ===

    pub fn open_theme_select(&mut self) {
        self.screen = Screen::ThemeSelect;
    }

    pub fn choose_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Leave the board; the puzzle (and its clock) is discarded
    pub fn back_to_menu(&mut self) {
        self.puzzle = None;
        self.drag.cancel();
        self.challenge = None;
        self.praise_request = None;
        self.screen = Screen::Menu;
    }

    // === Progression ===

    /// Pick a level. Unlocked levels start right away; locked ones open a
    /// challenge first.
    pub fn select_level(
        &mut self,
        theme: Theme,
        level_index: usize,
    ) -> Result<LevelSelection, GameError> {
        if catalog::level(level_index).is_none() {
            return Err(GameError::UnknownLevel(level_index));
        }
        self.theme = theme;

        if self.stats.is_unlocked(level_index) {
            let session = self.start_level(theme, level_index)?;
            return Ok(LevelSelection::Started { session });
        }

        let challenge = Challenge::generate(theme, level_index, &mut self.rng);
        let question = challenge.question();
        log::info!("Level {level_index} is locked, asking {question}");
        self.events.push(GameEvent::ChallengeIssued {
            target_level_index: level_index,
            question: question.clone(),
        });
        self.challenge = Some(challenge);
        Ok(LevelSelection::ChallengeRequired { question })
    }

    /// Answer the open challenge
    pub fn submit_challenge(&mut self, answer: &str) -> ChallengeOutcome {
        let Some(challenge) = self.challenge.as_ref() else {
            return ChallengeOutcome::NoChallenge;
        };

        if !challenge.verify(answer) {
            log::debug!("Wrong answer {answer:?} to {}", challenge.question());
            self.events.push(GameEvent::ChallengeFailed);
            return ChallengeOutcome::Wrong;
        }

        let target = challenge.target_level_index;
        let theme = challenge.theme;
        self.challenge = None;

        if self.stats.unlock_through(target) {
            self.persist_stats();
        }
        self.events.push(GameEvent::ChallengePassed {
            level_index: target,
        });

        match self.start_level(theme, target) {
            Ok(session) => ChallengeOutcome::Passed { session },
            // Targets are validated when the challenge is issued
            Err(err) => {
                log::error!("Challenge target vanished: {err}");
                ChallengeOutcome::NoChallenge
            }
        }
    }

    pub fn cancel_challenge(&mut self) {
        self.challenge = None;
    }

    /// Restart the current level with freshly scattered pieces
    pub fn play_again(&mut self) -> Option<u64> {
        let (theme, level_index) = self
            .puzzle
            .as_ref()
            .map(|p| (p.theme, p.level_index))?;
        self.start_level(theme, level_index).ok()
    }

    fn start_level(&mut self, theme: Theme, level_index: usize) -> Result<u64, GameError> {
        let level = catalog::level(level_index).ok_or(GameError::UnknownLevel(level_index))?;
        let session = self.next_session;
        self.next_session += 1;

        let grid = GridConfig::new(level.rows, level.cols);
        let puzzle = PuzzleInstance::generate(session, theme, level_index, grid, &mut self.rng);
        log::info!(
            "Starting {} {} (session {session}), image {}",
            theme.as_str(),
            level.id,
            puzzle.image.url
        );

        self.theme = theme;
        self.puzzle = Some(puzzle);
        self.drag.cancel();
        self.challenge = None;
        self.show_hint = false;
        self.just_unlocked = false;
        self.last_result = None;
        self.praise_request = None;
        self.praise = None;
        self.screen = Screen::Playing;
        self.events.push(GameEvent::LevelStarted {
            session,
            level_index,
            theme,
        });
        Ok(session)
    }

    // === Clock ===

    /// The puzzle picture loaded or failed to load; both start play.
    /// Returns true if the clock should start now.
    pub fn image_ready(&mut self, session: u64) -> bool {
        let Some(puzzle) = self.current_puzzle_mut(session) else {
            return false;
        };
        if !puzzle.image_ready() {
            return false;
        }
        self.evaluate_win();
        true
    }

    /// One second elapsed on the clock of `session`
    pub fn tick(&mut self, session: u64) -> bool {
        self.current_puzzle_mut(session)
            .is_some_and(PuzzleInstance::tick)
    }

    /// Whether the host's tick source for `session` should keep running
    pub fn clock_running(&self, session: u64) -> bool {
        self.puzzle
            .as_ref()
            .is_some_and(|p| p.session == session && p.is_active())
    }

    fn current_puzzle_mut(&mut self, session: u64) -> Option<&mut PuzzleInstance> {
        self.puzzle.as_mut().filter(|p| p.session == session)
    }

    // === Pointer input ===

    /// Record where the board currently sits on screen
    pub fn set_board_rect(&mut self, rect: Option<BoardRect>) {
        self.board = rect;
    }

    pub fn pointer_down(&mut self, piece_id: u32, pointer: Vec2) -> bool {
        let Some(puzzle) = self.puzzle.as_ref().filter(|p| !p.is_solved()) else {
            return false;
        };
        let started = self
            .drag
            .begin(&puzzle.pieces, self.board.as_ref(), piece_id, pointer);
        if started {
            self.events.push(GameEvent::DragStarted { piece_id });
        }
        started
    }

    pub fn pointer_move(&mut self, pointer: Vec2) -> Option<Vec2> {
        let puzzle = self.puzzle.as_mut()?;
        self.drag
            .drag_to(&mut puzzle.pieces, &puzzle.grid, self.board.as_ref(), pointer)
    }

    /// Release (or pointer left the board)
    pub fn pointer_up(&mut self, pointer: Vec2) -> Option<SnapOutcome> {
        let puzzle = self.puzzle.as_mut()?;
        let outcome = self
            .drag
            .end(&mut puzzle.pieces, &puzzle.grid, self.board.as_ref(), pointer)?;

        if outcome.snapped {
            log::debug!("Piece {} snapped", outcome.piece_id);
            self.events.push(GameEvent::PieceSnapped {
                piece_id: outcome.piece_id,
            });
            self.evaluate_win();
        }
        Some(outcome)
    }

    pub fn pointer_leave(&mut self, pointer: Vec2) -> Option<SnapOutcome> {
        self.pointer_up(pointer)
    }

    fn evaluate_win(&mut self) {
        let Some(puzzle) = self.puzzle.as_mut() else {
            return;
        };
        if !puzzle.check_win() {
            return;
        }

        let session = puzzle.session;
        let level_index = puzzle.level_index;
        let elapsed = puzzle.elapsed_secs;
        let request = PraiseRequest {
            session,
            theme: puzzle.theme,
            elapsed_secs: elapsed,
            rows: puzzle.grid.rows,
            cols: puzzle.grid.cols,
        };

        self.drag.cancel();
        let result = self.stats.record_win(level_index, elapsed);
        self.persist_stats();

        self.just_unlocked = result.unlocked_level.is_some();
        self.last_result = Some(result);
        self.screen = Screen::Won;
        self.events.push(GameEvent::PuzzleSolved(result));
        if let Some(level_index) = result.unlocked_level {
            self.events.push(GameEvent::LevelUnlocked { level_index });
        }
        self.praise_request = Some(request);
    }

    // === Praise ===

    /// Hand the praise request of a freshly solved puzzle to the host
    pub fn take_praise_request(&mut self) -> Option<PraiseRequest> {
        self.praise_request.take()
    }

    fn awaiting_praise(&self) -> bool {
        self.praise.is_none() && self.puzzle.as_ref().is_some_and(PuzzleInstance::is_solved)
    }

    /// Deliver the service outcome for `session`. Failures become canned
    /// praise. Returns false when the answer belongs to an old puzzle.
    pub fn deliver_praise(&mut self, session: u64, outcome: Result<String, PraiseError>) -> bool {
        let current = self.puzzle.as_ref().map(|p| p.session);
        if current != Some(session) || !self.awaiting_praise() {
            log::debug!("Dropping praise for stale session {session}");
            return false;
        }
        self.praise = Some(praise::resolve(outcome, &mut self.rng));
        self.events.push(GameEvent::PraiseReady { session });
        true
    }

    // === Preferences ===

    pub fn toggle_hint(&mut self) -> bool {
        self.show_hint = !self.show_hint;
        self.show_hint
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.settings.muted = !self.settings.muted;
        self.persist_settings();
        self.settings.muted
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.settings.set_master_volume(vol);
        self.persist_settings();
    }

    fn persist_stats(&mut self) {
        if let Err(err) = self.stats.save(&mut self.store) {
            log::warn!("Could not save progress: {err}");
        }
    }

    fn persist_settings(&mut self) {
        if let Err(err) = self.settings.save(&mut self.store) {
            log::warn!("Could not save settings: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STATS_KEY;
    use crate::persistence::MemoryStore;
    use crate::praise::FALLBACK_PRAISE;

    /// 1000x1000 px board at the origin: 1 board unit = 10 px
    fn board() -> BoardRect {
        BoardRect::new(0.0, 0.0, 1000.0, 1000.0)
    }

    fn to_client(pos: Vec2) -> Vec2 {
        pos * 10.0
    }

    fn new_game() -> Game<MemoryStore> {
        let mut game = Game::new(MemoryStore::new(), 2024);
        game.set_board_rect(Some(board()));
        game
    }

    /// Every level already reachable
    fn unlocked_game() -> Game<MemoryStore> {
        let store = MemoryStore::with_entry(STATS_KEY, r#"{"highestUnlockedLevelIndex":7}"#);
        let mut game = Game::new(store, 77);
        game.set_board_rect(Some(board()));
        game
    }

    fn start(game: &mut Game<MemoryStore>, level_index: usize) -> u64 {
        match game.select_level(Theme::Animals, level_index).unwrap() {
            LevelSelection::Started { session } => session,
            other => panic!("expected start, got {other:?}"),
        }
    }

    /// Drag a piece from where it lies onto its slot
    fn solve_piece(game: &mut Game<MemoryStore>, piece_id: u32) -> Option<SnapOutcome> {
        let piece = game.puzzle().unwrap().piece(piece_id).unwrap().clone();
        assert!(game.pointer_down(piece_id, to_client(piece.current)));
        game.pointer_move(to_client(piece.correct));
        game.pointer_up(to_client(piece.correct))
    }

    fn solve_all(game: &mut Game<MemoryStore>) {
        let ids: Vec<u32> = game.puzzle().unwrap().pieces.iter().map(|p| p.id).collect();
        for id in ids {
            assert!(solve_piece(game, id).unwrap().snapped);
        }
    }

    fn answer(game: &Game<MemoryStore>) -> String {
        game.challenge().unwrap().expected_answer().to_string()
    }

    #[test]
    fn test_unlocked_level_starts_directly() {
        let mut game = new_game();
        let session = start(&mut game, 0);

        assert_eq!(game.screen(), Screen::Playing);
        let puzzle = game.puzzle().unwrap();
        assert_eq!(puzzle.session, session);
        assert_eq!(puzzle.pieces.len(), 4);
        assert!(!puzzle.is_active());
        assert!(matches!(
            game.drain_events().as_slice(),
            [GameEvent::LevelStarted { level_index: 0, .. }]
        ));
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let mut game = new_game();
        assert_eq!(
            game.select_level(Theme::Space, 99),
            Err(GameError::UnknownLevel(99))
        );
        assert!(game.puzzle().is_none());
    }

    #[test]
    fn test_locked_level_requires_challenge() {
        let mut game = new_game();
        let selection = game.select_level(Theme::Space, 2).unwrap();
        assert!(matches!(selection, LevelSelection::ChallengeRequired { .. }));
        assert!(game.puzzle().is_none());
        assert_eq!(game.stats().highest_unlocked_level_index, 0);

        let question = game.challenge().unwrap().question();
        assert_eq!(game.submit_challenge("not a number"), ChallengeOutcome::Wrong);
        assert_eq!(game.submit_challenge("1000"), ChallengeOutcome::Wrong);
        assert_eq!(game.challenge().unwrap().question(), question);
        assert!(game.puzzle().is_none());

        let correct = answer(&game);
        let outcome = game.submit_challenge(&correct);
        assert!(matches!(outcome, ChallengeOutcome::Passed { .. }));
        assert!(game.challenge().is_none());
        assert_eq!(game.stats().highest_unlocked_level_index, 2);

        let puzzle = game.puzzle().unwrap();
        assert_eq!(puzzle.level_index, 2);
        assert_eq!(puzzle.theme, Theme::Space);
        assert_eq!(puzzle.pieces.len(), 9);

        // Frontier persisted immediately
        assert_eq!(PlayerStats::load(game.store()).highest_unlocked_level_index, 2);
    }

    #[test]
    fn test_cancel_challenge_keeps_level_locked() {
        let mut game = new_game();
        game.select_level(Theme::Space, 3).unwrap();
        game.cancel_challenge();
        assert!(game.challenge().is_none());
        assert_eq!(game.submit_challenge("42"), ChallengeOutcome::NoChallenge);
        assert_eq!(game.stats().highest_unlocked_level_index, 0);
    }

    #[test]
    fn test_full_round_scores_and_unlocks() {
        let mut game = new_game();
        let session = start(&mut game, 0);
        assert!(game.image_ready(session));
        for _ in 0..12 {
            assert!(game.tick(session));
        }
        game.drain_events();

        solve_all(&mut game);

        assert_eq!(game.screen(), Screen::Won);
        assert!(game.just_unlocked());
        assert!(!game.clock_running(session));

        let result = *game.last_result().unwrap();
        // 2x2: reward 10, bonus 88, par 20s
        assert_eq!(result.round_score, 98);
        assert_eq!(result.stars, 3);
        assert_eq!(result.unlocked_level, Some(1));

        let stats = *game.stats();
        assert_eq!(stats.highest_unlocked_level_index, 1);
        assert_eq!(stats.completed_puzzles, 1);
        assert_eq!(stats.total_score, 98);
        assert_eq!(PlayerStats::load(game.store()), stats);

        let events = game.drain_events();
        let solved = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PuzzleSolved(_)))
            .count();
        assert_eq!(solved, 1);
        assert!(events.contains(&GameEvent::LevelUnlocked { level_index: 1 }));
    }

    #[test]
    fn test_win_not_signalled_before_last_piece() {
        let mut game = unlocked_game();
        let session = start(&mut game, 1);
        game.image_ready(session);
        game.drain_events();

        let ids: Vec<u32> = game.puzzle().unwrap().pieces.iter().map(|p| p.id).collect();
        let (last, rest) = ids.split_last().unwrap();
        for &id in rest {
            solve_piece(&mut game, id);
            assert_eq!(game.screen(), Screen::Playing);
        }
        assert!(game.last_result().is_none());

        solve_piece(&mut game, *last);
        assert_eq!(game.screen(), Screen::Won);

        // Re-evaluation after the win does nothing
        assert!(!game.image_ready(session));
        assert!(!game.tick(session));
        assert_eq!(game.stats().completed_puzzles, 1);
    }

    #[test]
    fn test_replay_does_not_unlock_again() {
        let mut game = new_game();
        let session = start(&mut game, 0);
        game.image_ready(session);
        solve_all(&mut game);
        assert_eq!(game.stats().highest_unlocked_level_index, 1);

        let session = start(&mut game, 0);
        game.image_ready(session);
        solve_all(&mut game);

        assert!(!game.just_unlocked());
        assert_eq!(game.last_result().unwrap().unlocked_level, None);
        assert_eq!(game.stats().highest_unlocked_level_index, 1);
        assert_eq!(game.stats().completed_puzzles, 2);
    }

    #[test]
    fn test_play_again_builds_fresh_instance() {
        let mut game = unlocked_game();
        let first = start(&mut game, 2);
        game.toggle_hint();
        let before = game.puzzle().unwrap().clone();

        let second = game.play_again().unwrap();
        assert_ne!(first, second);
        let after = game.puzzle().unwrap();
        assert_eq!(after.level_index, 2);
        assert_ne!(before.image.seed, after.image.seed);
        assert_ne!(
            before.pieces.iter().map(|p| p.current).collect::<Vec<_>>(),
            after.pieces.iter().map(|p| p.current).collect::<Vec<_>>()
        );
        assert!(!game.show_hint());

        // Ticks from the old session are ignored
        assert!(!game.image_ready(first));
        assert!(!game.tick(first));
    }

    #[test]
    fn test_drag_without_board_is_noop() {
        let mut game = new_game();
        start(&mut game, 0);
        game.set_board_rect(None);
        assert!(!game.pointer_down(0, Vec2::new(10.0, 10.0)));
        assert!(game.pointer_move(Vec2::new(10.0, 10.0)).is_none());
        assert!(game.pointer_up(Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_placed_piece_cannot_be_picked_up() {
        let mut game = unlocked_game();
        let session = start(&mut game, 2);
        game.image_ready(session);

        assert!(solve_piece(&mut game, 4).unwrap().snapped);
        let placed = game.puzzle().unwrap().piece(4).unwrap().clone();
        assert!(!game.pointer_down(4, to_client(placed.current)));
        game.pointer_move(Vec2::new(0.0, 0.0));
        game.pointer_leave(Vec2::new(0.0, 0.0));
        assert_eq!(game.puzzle().unwrap().piece(4), Some(&placed));
    }

    #[test]
    fn test_pieces_placed_while_loading_win_on_image_ready() {
        let mut game = new_game();
        let session = start(&mut game, 0);
        solve_all(&mut game);
        assert_eq!(game.screen(), Screen::Playing);

        assert!(game.image_ready(session));
        assert_eq!(game.screen(), Screen::Won);
        assert_eq!(game.last_result().unwrap().elapsed_secs, 0);
    }

    #[test]
    fn test_praise_failure_uses_fallback() {
        let mut game = new_game();
        let session = start(&mut game, 0);
        game.image_ready(session);
        solve_all(&mut game);

        let request = game.take_praise_request().unwrap();
        assert_eq!(request.session, session);
        assert!(game.take_praise_request().is_none());
        assert!(game.snapshot().praise_loading);

        assert!(game.deliver_praise(session, Err(PraiseError::Status(500))));
        assert!(FALLBACK_PRAISE.contains(&game.praise().unwrap()));
        assert!(!game.snapshot().praise_loading);

        // A second answer for the same puzzle is ignored
        assert!(!game.deliver_praise(session, Ok("Igen!".into())));
    }

    #[test]
    fn test_stale_praise_is_dropped() {
        let mut game = new_game();
        let session = start(&mut game, 0);
        game.image_ready(session);
        solve_all(&mut game);
        let request = game.take_praise_request().unwrap();

        let next = game.play_again().unwrap();
        assert!(!game.deliver_praise(request.session, Ok("Toppen!".into())));
        assert!(game.praise().is_none());
        assert_eq!(game.puzzle().unwrap().session, next);
    }

    #[test]
    fn test_stats_loaded_from_older_record() {
        let store = MemoryStore::with_entry(
            STATS_KEY,
            r#"{"totalScore":50,"stars":4,"completedPuzzles":2}"#,
        );
        let mut game = Game::new(store, 1);
        assert_eq!(game.stats().total_score, 50);
        assert!(matches!(
            game.select_level(Theme::Nature, 1),
            Ok(LevelSelection::ChallengeRequired { .. })
        ));
    }

    #[test]
    fn test_mute_is_persisted() {
        let mut game = new_game();
        assert!(game.toggle_mute());
        assert!(Settings::load(game.store()).muted);
    }

    #[test]
    fn test_back_to_menu_discards_puzzle() {
        let mut game = new_game();
        let session = start(&mut game, 0);
        game.image_ready(session);
        game.back_to_menu();
        assert_eq!(game.screen(), Screen::Menu);
        assert!(game.puzzle().is_none());
        assert!(!game.tick(session));
        assert!(!game.clock_running(session));
    }
}
