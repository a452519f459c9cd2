//! Applies player commands and countdown ticks to the engine.

use hangman_engine::GameStateMachine;
use hangman_engine::application::machine::TurnOutcome;
use hangman_engine::domain::state::GuessOutcome;
use hangman_engine::domain::timed::TickOutcome;
use tracing::{debug, warn};

use crate::commands::{Command, HELP};
use crate::render::{
    render_achievements, render_result, render_scores, render_statistics, render_view,
};

/// What the driver should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the text and keep reading.
    Continue(String),
    /// Print the text and exit.
    Quit(String),
}

/// One interactive game.
#[derive(Debug)]
pub struct Session {
    game: GameStateMachine,
}

impl Session {
    /// Wraps a running engine.
    #[must_use]
    pub fn new(game: GameStateMachine) -> Self {
        Self { game }
    }

    /// The engine being driven.
    #[must_use]
    pub fn game(&self) -> &GameStateMachine {
        &self.game
    }

    /// Banner and first board.
    #[must_use]
    pub fn greeting(&self) -> String {
        format!(
            "hangman: guess the word one letter at a time (`help` for commands)\n{}",
            render_view(&self.game.view())
        )
    }

    /// Parses and applies one input line.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        match line.parse::<Command>() {
            Ok(command) => self.handle(command),
            Err(e) => Reply::Continue(e.to_string()),
        }
    }

    /// Applies `command`.
    ///
    /// Engine errors are reported back to the player; none of them end the
    /// session.
    pub fn handle(&mut self, command: Command) -> Reply {
        debug!(?command, "handling command");
        let text = match command {
            Command::Quit => return Reply::Quit("bye".to_owned()),
            Command::Help => HELP.to_owned(),
            Command::Guess(letter) => match self.game.make_guess(&letter) {
                GuessOutcome::Rejected(reason) => reason.to_string(),
                GuessOutcome::Correct | GuessOutcome::Incorrect => self.board(),
            },
            Command::Hint => match self.game.get_hint() {
                Some(_) => self.board(),
                None => "no hint available right now".to_owned(),
            },
            Command::Pause => {
                let paused = self.game.pause_game();
                self.toggled(paused, "nothing to pause")
            }
            Command::Resume => {
                let resumed = self.game.resume_game();
                self.toggled(resumed, "nothing to resume")
            }
            Command::NewRound => self.after(|game| game.reset_game()),
            Command::Difficulty(difficulty) => self.after(|game| game.set_difficulty(difficulty)),
            Command::Category(name) => self.after(|game| game.set_category(&name)),
            Command::Categories => self
                .game
                .catalog()
                .all_categories()
                .into_iter()
                .collect::<Vec<_>>()
                .join(", "),
            Command::PracticeOn(settings) => {
                self.after(|game| game.enable_practice_mode(settings))
            }
            Command::PracticeOff => self.after(GameStateMachine::disable_practice_mode),
            Command::TimedOn(limit_ms) => self.after(|game| game.enable_timed_mode(limit_ms)),
            Command::TimedOff => {
                self.game.disable_timed_mode();
                self.board()
            }
            Command::Multiplayer { players, rounds } => {
                self.after(|game| game.enable_multiplayer(players.as_slice(), rounds))
            }
            Command::NextTurn => match self.game.next_turn() {
                Ok(TurnOutcome::Advanced { .. }) => self.board(),
                Ok(TurnOutcome::Ended(result)) => render_result(&result),
                Err(e) => e.to_string(),
            },
            Command::EndMultiplayer => match self.game.end_multiplayer_game() {
                Ok(result) => render_result(&result),
                Err(e) => e.to_string(),
            },
            Command::Stats => {
                let mut text = render_statistics(self.game.get_statistics());
                let scores = self.game.get_multiplayer_scores();
                if self.game.state().multiplayer.enabled && !scores.is_empty() {
                    text.push_str("\nplayers:\n");
                    text.push_str(&render_scores(scores));
                }
                text
            }
            Command::Achievements => render_achievements(self.game.get_achievements()),
            Command::Status => self.board(),
        };
        Reply::Continue(text)
    }

    /// Delivers a countdown tick, returning text to print if the round
    /// ended.
    pub fn tick(&mut self) -> Option<String> {
        let token = self.game.timer_token()?;
        match self.game.tick_timer(token) {
            TickOutcome::Expired => Some(self.board()),
            TickOutcome::Running { .. } | TickOutcome::Ignored => None,
        }
    }

    fn board(&self) -> String {
        render_view(&self.game.view())
    }

    fn toggled(&self, changed: bool, refusal: &str) -> String {
        if changed {
            self.board()
        } else {
            refusal.to_owned()
        }
    }

    fn after<E: std::fmt::Display>(
        &mut self,
        action: impl FnOnce(&mut GameStateMachine) -> Result<(), E>,
    ) -> String {
        match action(&mut self.game) {
            Ok(()) => self.board(),
            Err(e) => {
                warn!(error = %e, "command failed");
                e.to_string()
            }
        }
    }
}
