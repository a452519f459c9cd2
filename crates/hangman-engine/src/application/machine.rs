//! The game state machine.
//!
//! [`GameStateMachine`] owns the [`GameState`] and is the only thing that
//! mutates it. Every operation either completes or leaves the state as it
//! found it; persistence runs afterwards and its failures are only logged.

use std::sync::Arc;

use hangman_core::clock::Clock;
use hangman_core::error::GameError;
use hangman_core::event::{EventMetadata, EventSink};
use hangman_core::rng::DeterministicRng;
use hangman_core::store::{
    ACHIEVEMENTS_KEY, BEST_TIMES_KEY, PRACTICE_PROGRESS_KEY, PersistenceStore, STATISTICS_KEY,
};
use hangman_words::domain::catalog::{Difficulty, WordCatalog};
use hangman_words::domain::selector::{MAX_SELECTION_ATTEMPTS, WordSelector};
use tracing::{debug, info, instrument, warn};

use crate::application::persistence::PersistenceGateway;
use crate::application::queries::GameView;
use crate::domain::achievements::{AchievementEvaluator, Achievements, RoundFacts};
use crate::domain::events::{GameEvent, GameEventKind};
use crate::domain::multiplayer::{MultiplayerResult, MultiplayerState, Player};
use crate::domain::practice::{PracticeMode, PracticeProgress, PracticeSettings};
use crate::domain::scoring::{RoundOutcome, TimedFinish, calculate_score};
use crate::domain::state::{
    DEFAULT_MAX_INCORRECT_GUESSES, GameState, GameStatus, GuessOutcome, parse_letter,
};
use crate::domain::statistics::{BestTimes, RoundRecord, Statistics};
use crate::domain::timed::{DEFAULT_TICK_MS, TickOutcome, TimedModeController, TimerToken};

/// Collaborators injected into the engine.
pub struct EngineContext {
    /// Time source for round timing and unlock timestamps.
    pub clock: Arc<dyn Clock>,
    /// Randomness for word picks and hints.
    pub rng: Box<dyn DeterministicRng>,
    /// Blob store for statistics, achievements and progress.
    pub store: Arc<dyn PersistenceStore>,
    /// Receiver of game notifications.
    pub sink: Arc<dyn EventSink<GameEvent>>,
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext").finish_non_exhaustive()
    }
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Difficulty of the first round.
    pub difficulty: Difficulty,
    /// Category of the first round.
    pub category: String,
    /// Mistakes allowed per round outside practice overrides.
    pub max_incorrect_guesses: u32,
    /// Countdown deducted per timer tick.
    pub tick_interval_ms: u64,
    /// Substitutions word selection may make before giving up.
    pub max_selection_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            category: "animals".to_owned(),
            max_incorrect_guesses: DEFAULT_MAX_INCORRECT_GUESSES,
            tick_interval_ms: DEFAULT_TICK_MS,
            max_selection_attempts: MAX_SELECTION_ATTEMPTS,
        }
    }
}

/// What [`GameStateMachine::next_turn`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Play passed to the named player and a new round began.
    Advanced {
        /// The player now up.
        player: String,
    },
    /// The last rotation finished and the game ended.
    Ended(MultiplayerResult),
}

/// Orchestrates rounds, modes and the rules that run when a round ends.
pub struct GameStateMachine {
    state: GameState,
    catalog: WordCatalog,
    selector: WordSelector,
    timer: TimedModeController,
    statistics: Statistics,
    achievements: Achievements,
    best_times: BestTimes,
    practice_progress: PracticeProgress,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    rng: Box<dyn DeterministicRng>,
    sink: Arc<dyn EventSink<GameEvent>>,
    persistence: PersistenceGateway,
    sequence: u64,
}

impl std::fmt::Debug for GameStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStateMachine")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GameStateMachine {
    /// Loads persisted progress and starts the first round.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SelectionExhausted` if `catalog` cannot supply a
    /// word.
    pub fn new(
        ctx: EngineContext,
        config: EngineConfig,
        catalog: WordCatalog,
    ) -> Result<Self, GameError> {
        let EngineContext {
            clock,
            mut rng,
            store,
            sink,
        } = ctx;
        let selector = WordSelector::with_max_attempts(config.max_selection_attempts);
        let selection = selector.select(
            &catalog,
            config.difficulty,
            &config.category,
            None,
            rng.as_mut(),
        )?;
        let persistence = PersistenceGateway::new(store);
        let state = GameState::new(selection, config.max_incorrect_guesses, clock.now());

        info!(
            difficulty = %state.difficulty,
            category = %state.category,
            words = catalog.word_count(),
            "game engine ready"
        );

        Ok(Self {
            statistics: persistence.load_or_default(STATISTICS_KEY),
            achievements: persistence.load_or_default(ACHIEVEMENTS_KEY),
            best_times: persistence.load_or_default(BEST_TIMES_KEY),
            practice_progress: persistence.load_or_default(PRACTICE_PROGRESS_KEY),
            state,
            catalog,
            selector,
            timer: TimedModeController::new(),
            config,
            clock,
            rng,
            sink,
            persistence,
            sequence: 0,
        })
    }

    // ----- Round play -----

    /// Guesses one letter.
    ///
    /// Rejected without any change if the input is not a single letter
    /// `a`–`z`, the round is not in play, or the letter was already guessed.
    #[instrument(skip(self))]
    pub fn make_guess(&mut self, input: &str) -> GuessOutcome {
        let letter = match parse_letter(input) {
            Ok(letter) => letter,
            Err(reason) => {
                debug!(%reason, "guess rejected");
                return GuessOutcome::Rejected(reason);
            }
        };

        let outcome = self.state.guess(letter);
        if let GuessOutcome::Rejected(reason) = outcome {
            debug!(%letter, %reason, "guess rejected");
            return outcome;
        }

        self.emit(GameEventKind::GuessMade {
            letter,
            correct: outcome.is_correct(),
        });
        self.settle_round();
        outcome
    }

    /// Reveals one random hidden letter, returning it.
    ///
    /// `None` unless the round is in play. In practice mode the hint lowers
    /// the round's score multiplier.
    #[instrument(skip(self))]
    pub fn get_hint(&mut self) -> Option<char> {
        if self.state.game_status != GameStatus::Playing {
            return None;
        }
        let hidden = self.state.hidden_letters();
        let letter = *hidden.get(self.rng.pick_index(hidden.len())?)?;

        self.state.guessed_letters.insert(letter);
        self.state.reveal(letter);
        self.state.hints_this_round += 1;
        if self.state.practice.enabled {
            self.state.practice.record_hint();
            self.practice_progress.hints_used += 1;
        }

        self.emit(GameEventKind::HintRevealed { letter });
        self.settle_round();
        Some(letter)
    }

    /// Pauses a round in play and stops its countdown.
    pub fn pause_game(&mut self) -> bool {
        let paused = self.state.pause(self.clock.now());
        if paused {
            self.timer.stop();
            debug!("round paused");
        }
        paused
    }

    /// Resumes a paused round and re-arms its countdown.
    pub fn resume_game(&mut self) -> bool {
        let resumed = self.state.resume(self.clock.now());
        if resumed {
            if self.state.timed_mode {
                self.timer.arm();
            }
            debug!("round resumed");
        }
        resumed
    }

    /// Starts a new round, keeping score, difficulty and category.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SelectionExhausted` if no word can be selected,
    /// in which case nothing changes.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) -> Result<(), GameError> {
        let selection = self.selector.select(
            &self.catalog,
            self.state.difficulty,
            &self.state.category,
            self.state.practice.selection(),
            self.rng.as_mut(),
        )?;

        self.timer.stop();
        let max_incorrect = self
            .state
            .practice
            .max_incorrect_guesses(self.config.max_incorrect_guesses);
        self.state.begin_round(selection, max_incorrect, self.clock.now());
        if self.state.timed_mode {
            self.timer.arm();
        }
        if self.state.practice.enabled {
            self.save_practice_progress();
        }

        info!(
            difficulty = %self.state.difficulty,
            category = %self.state.category,
            length = self.state.hidden_word.len(),
            "round started"
        );
        Ok(())
    }

    /// Delivers a countdown tick.
    ///
    /// Ticks for a stopped or superseded countdown are ignored. Running out
    /// of time loses the round.
    pub fn tick_timer(&mut self, token: TimerToken) -> TickOutcome {
        if !self.state.timed_mode || self.state.game_status != GameStatus::Playing {
            return TickOutcome::Ignored;
        }
        let outcome = self.timer.tick(
            token,
            &mut self.state.time_remaining_ms,
            self.config.tick_interval_ms,
        );
        if outcome == TickOutcome::Expired {
            info!("time is up");
            self.emit(GameEventKind::TimeUp);
            self.finish_round(false);
        }
        outcome
    }

    // ----- Modes and settings -----

    /// Switches to `difficulty` and starts a new round.
    ///
    /// # Errors
    ///
    /// Returns the selection error if no word can be found; the previous
    /// round stays in place.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.reconfigure(|state| {
            state.difficulty = difficulty;
            if state.practice.locked_difficulty.is_some() {
                state.practice.locked_difficulty = Some(difficulty);
            }
        })
    }

    /// Switches to `category` and starts a new round.
    ///
    /// # Errors
    ///
    /// Returns `GameError::UnknownCategory` if no difficulty has it, or the
    /// selection error if no word can be found.
    pub fn set_category(&mut self, category: &str) -> Result<(), GameError> {
        let category = category.trim().to_lowercase();
        if !self.catalog.all_categories().contains(category.as_str()) {
            return Err(GameError::UnknownCategory(category));
        }
        self.reconfigure(|state| state.category = category)
    }

    /// Turns practice mode on and starts a new round under its rules.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` for contradictory settings, or the
    /// selection error if no word can be found.
    pub fn enable_practice_mode(&mut self, settings: PracticeSettings) -> Result<(), GameError> {
        settings.validate()?;
        let seen = self.practice_progress.seen_words_by_key.clone();
        self.reconfigure(|state| {
            state.practice = PracticeMode::enabled_with(settings, seen);
            if let Some(locked) = settings.locked_difficulty {
                state.difficulty = locked;
            }
        })?;
        info!(?settings, "practice mode enabled");
        Ok(())
    }

    /// Turns practice mode off and starts a normal round.
    ///
    /// # Errors
    ///
    /// Returns the selection error if no word can be found.
    pub fn disable_practice_mode(&mut self) -> Result<(), GameError> {
        if self.state.practice.enabled {
            self.save_practice_progress();
        }
        self.reconfigure(|state| state.practice = PracticeMode::default())?;
        info!("practice mode disabled");
        Ok(())
    }

    /// Puts rounds on a countdown of `limit_ms`, restarting the current
    /// round's clock.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if `limit_ms` is zero.
    pub fn enable_timed_mode(&mut self, limit_ms: u64) -> Result<(), GameError> {
        if limit_ms == 0 {
            return Err(GameError::Validation(
                "time limit must be positive".to_owned(),
            ));
        }
        self.timer.stop();
        self.state.timed_mode = true;
        self.state.time_limit_ms = limit_ms;
        self.state.time_remaining_ms = limit_ms;
        if self.state.game_status == GameStatus::Playing {
            self.timer.arm();
        }
        info!(limit_ms, "timed mode enabled");
        Ok(())
    }

    /// Removes the countdown.
    pub fn disable_timed_mode(&mut self) {
        self.timer.stop();
        self.state.timed_mode = false;
        self.state.time_remaining_ms = 0;
        info!("timed mode disabled");
    }

    /// Starts a multiplayer game for `names` and a fresh round for the first
    /// player.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` for a bad roster, or the selection
    /// error if no word can be found.
    pub fn enable_multiplayer<S: AsRef<str>>(
        &mut self,
        names: &[S],
        total_rounds: Option<u32>,
    ) -> Result<(), GameError> {
        let multiplayer = MultiplayerState::start(names, total_rounds)?;
        self.reconfigure(|state| state.multiplayer = multiplayer)?;
        info!(players = names.len(), ?total_rounds, "multiplayer started");
        Ok(())
    }

    /// Counts the turn, passes play on and starts the next player's round.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` outside multiplayer, or the selection
    /// error if no word can be found (the turn is then not counted).
    pub fn advance_to_next_player(&mut self) -> Result<String, GameError> {
        self.require_multiplayer()?;
        self.reconfigure(|state| {
            state.multiplayer.advance();
        })?;
        let player = self
            .state
            .multiplayer
            .current_player()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        info!(%player, rounds_played = self.state.multiplayer.rounds_played, "next player");
        self.emit(GameEventKind::PlayerAdvanced {
            player: player.clone(),
        });
        Ok(player)
    }

    /// Ends the game if the last rotation is done, otherwise advances.
    ///
    /// # Errors
    ///
    /// As [`Self::advance_to_next_player`].
    pub fn next_turn(&mut self) -> Result<TurnOutcome, GameError> {
        self.require_multiplayer()?;
        if self.state.multiplayer.should_end_after_advance() {
            self.end_multiplayer_game().map(TurnOutcome::Ended)
        } else {
            self.advance_to_next_player()
                .map(|player| TurnOutcome::Advanced { player })
        }
    }

    /// Ranks the players and leaves multiplayer mode.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` outside multiplayer.
    pub fn end_multiplayer_game(&mut self) -> Result<MultiplayerResult, GameError> {
        self.require_multiplayer()?;
        let result = self.state.multiplayer.finish();
        info!(winners = ?result.winners, "multiplayer finished");
        self.emit(GameEventKind::MultiplayerEnded {
            winners: result.winners.clone(),
        });
        Ok(result)
    }

    // ----- Queries -----

    /// The full game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// A renderer-facing snapshot.
    #[must_use]
    pub fn view(&self) -> GameView {
        GameView::from_state(&self.state)
    }

    /// Lifetime statistics.
    #[must_use]
    pub fn get_statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Achievement unlock states.
    #[must_use]
    pub fn get_achievements(&self) -> &Achievements {
        &self.achievements
    }

    /// The multiplayer participant whose turn it is.
    #[must_use]
    pub fn get_current_player(&self) -> Option<&Player> {
        self.state.multiplayer.current_player()
    }

    /// Multiplayer participants in turn order.
    #[must_use]
    pub fn get_multiplayer_scores(&self) -> &[Player] {
        &self.state.multiplayer.players
    }

    /// Fastest winning round at `difficulty`, in milliseconds.
    #[must_use]
    pub fn get_best_time(&self, difficulty: Difficulty) -> Option<u64> {
        self.best_times.get(difficulty)
    }

    /// Practice history across sessions.
    #[must_use]
    pub fn practice_progress(&self) -> &PracticeProgress {
        &self.practice_progress
    }

    /// Token of the live countdown, for the driver's next tick.
    #[must_use]
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    /// The catalog words are drawn from.
    #[must_use]
    pub fn catalog(&self) -> &WordCatalog {
        &self.catalog
    }

    // ----- Internals -----

    fn emit(&mut self, kind: GameEventKind) {
        self.sequence += 1;
        let event = GameEvent {
            metadata: EventMetadata::new(kind.type_name(), self.sequence, self.clock.as_ref()),
            kind,
        };
        debug!(event_type = %event.metadata.event_type, "publishing event");
        self.sink.publish(&event);
    }

    fn require_multiplayer(&self) -> Result<(), GameError> {
        if self.state.multiplayer.enabled {
            Ok(())
        } else {
            Err(GameError::Validation("multiplayer is not enabled".to_owned()))
        }
    }

    /// Applies `change` and starts a new round, or restores the previous
    /// state if no word can be selected.
    fn reconfigure(&mut self, change: impl FnOnce(&mut GameState)) -> Result<(), GameError> {
        let previous = self.state.clone();
        change(&mut self.state);
        if let Err(e) = self.reset_game() {
            warn!(error = %e, "new settings left no playable word; keeping previous round");
            self.state = previous;
            return Err(e);
        }
        Ok(())
    }

    fn settle_round(&mut self) {
        if self.state.is_solved() {
            self.finish_round(true);
        } else if self.state.is_out_of_guesses() {
            self.finish_round(false);
        }
    }

    fn finish_round(&mut self, won: bool) {
        let now = self.clock.now();
        self.timer.stop();
        let elapsed_ms = self.state.elapsed_ms(now);
        self.state.finish(won);

        let difficulty = self.state.difficulty;
        let practice = self.state.practice.enabled;
        let incorrect_guesses =
            u32::try_from(self.state.incorrect_guesses.len()).unwrap_or(u32::MAX);

        let score = if won {
            calculate_score(&RoundOutcome {
                difficulty,
                max_incorrect_guesses: self.state.max_incorrect_guesses,
                incorrect_guesses,
                timed: self.state.timed_mode.then_some(TimedFinish {
                    remaining_ms: self.state.time_remaining_ms,
                    limit_ms: self.state.time_limit_ms,
                }),
                elapsed_ms,
                penalty_multiplier: self.state.practice.penalty_multiplier(),
            })
        } else {
            0
        };
        self.state.score = self.state.score.saturating_add(score);
        self.state.last_round_score = Some(score);

        info!(won, score, elapsed_ms, word = %self.state.current_word, "round finished");
        let word = self.state.current_word.clone();
        self.emit(if won {
            GameEventKind::RoundWon {
                word: word.clone(),
                score,
                elapsed_ms,
            }
        } else {
            GameEventKind::RoundLost { word: word.clone() }
        });

        self.statistics.record(RoundRecord {
            word,
            difficulty,
            category: self.state.category.clone(),
            won,
            score,
            incorrect_guesses,
            elapsed_ms,
            practice,
            played_at: now,
        });
        let new_best = won && !practice && self.best_times.record(difficulty, elapsed_ms);

        if won {
            let hold = self.state.practice.holds_difficulty();
            if let Some(next) = self.state.progression.record_win(difficulty, hold) {
                info!(from = %difficulty, to = %next, "difficulty promoted");
                self.state.difficulty = next;
                self.emit(GameEventKind::DifficultyChanged {
                    from: difficulty,
                    to: next,
                });
            }
        } else {
            self.state.progression.record_loss();
        }

        let unlocked = if practice {
            Vec::new()
        } else {
            let facts = RoundFacts {
                statistics: &self.statistics,
                won,
                incorrect_guesses,
                elapsed_ms,
                difficulty,
                session_score: self.state.score,
            };
            AchievementEvaluator.evaluate(&mut self.achievements, &facts, now)
        };
        for key in &unlocked {
            info!(%key, "achievement unlocked");
            self.emit(GameEventKind::AchievementUnlocked { key: *key });
        }

        if self.state.multiplayer.enabled {
            self.state.multiplayer.record_round(won, score);
        }

        self.persistence.save(STATISTICS_KEY, &self.statistics);
        if new_best {
            self.persistence.save(BEST_TIMES_KEY, &self.best_times);
        }
        if !unlocked.is_empty() {
            self.persistence.save(ACHIEVEMENTS_KEY, &self.achievements);
        }
        if practice {
            self.practice_progress.rounds_played += 1;
            self.save_practice_progress();
        }

        if practice && self.state.practice.endless && !self.state.multiplayer.enabled {
            if let Err(e) = self.reset_game() {
                warn!(error = %e, "could not start the next practice round");
            }
        }
    }

    fn save_practice_progress(&mut self) {
        self.practice_progress.seen_words_by_key = self.state.practice.seen_words_by_key.clone();
        self.persistence
            .save(PRACTICE_PROGRESS_KEY, &self.practice_progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangman_core::event::NullSink;
    use hangman_test_support::{FixedClock, MemoryStore, MockRng};

    fn machine() -> GameStateMachine {
        let mut catalog = WordCatalog::new();
        catalog.insert(Difficulty::Easy, "animals", ["cat"]);
        catalog.insert(Difficulty::Easy, "colors", ["red"]);
        let ctx = EngineContext {
            clock: Arc::new(FixedClock::default()),
            rng: Box::new(MockRng),
            store: Arc::new(MemoryStore::new()),
            sink: Arc::new(NullSink),
        };
        GameStateMachine::new(ctx, EngineConfig::default(), catalog).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_catalog() {
        let ctx = EngineContext {
            clock: Arc::new(FixedClock::default()),
            rng: Box::new(MockRng),
            store: Arc::new(MemoryStore::new()),
            sink: Arc::new(NullSink),
        };
        let err =
            GameStateMachine::new(ctx, EngineConfig::default(), WordCatalog::new()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_set_category_rejects_unknown_name() {
        let mut game = machine();
        match game.set_category("dinosaurs").unwrap_err() {
            GameError::UnknownCategory(name) => assert_eq!(name, "dinosaurs"),
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
        assert_eq!(game.state().category, "animals");
    }

    #[test]
    fn test_set_category_starts_new_round() {
        let mut game = machine();
        game.make_guess("z");

        game.set_category(" Colors ").unwrap();

        assert_eq!(game.state().category, "colors");
        assert_eq!(game.state().current_word, "red");
        assert!(game.state().incorrect_guesses.is_empty());
    }

    #[test]
    fn test_failed_reconfigure_restores_state() {
        let mut game = machine();
        game.make_guess("c");
        game.catalog = WordCatalog::new();
        let before = game.state().clone();

        assert!(game.set_difficulty(Difficulty::Medium).is_err());

        assert_eq!(game.state(), &before);
        assert_eq!(game.state().guessed_letters.len(), 1);
    }

    #[test]
    fn test_multiplayer_operations_require_multiplayer() {
        let mut game = machine();
        assert!(matches!(
            game.advance_to_next_player(),
            Err(GameError::Validation(_))
        ));
        assert!(matches!(game.next_turn(), Err(GameError::Validation(_))));
        assert!(matches!(
            game.end_multiplayer_game(),
            Err(GameError::Validation(_))
        ));
    }

    #[test]
    fn test_timed_mode_rejects_zero_limit() {
        let mut game = machine();
        assert!(game.enable_timed_mode(0).is_err());
        assert!(!game.state().timed_mode);
        assert!(game.timer_token().is_none());
    }

    #[test]
    fn test_hint_refused_when_paused() {
        let mut game = machine();
        game.pause_game();
        assert_eq!(game.get_hint(), None);
        assert!(game.state().guessed_letters.is_empty());
    }
}
